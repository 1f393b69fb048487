// Copyright (c) 2022 MASSA LABS <info@massa.net>

use super::tools::*;
use crate::{BlockExecutor, CancellationScope, WarpManager};
use assert_matches::assert_matches;
use morpheus_execution_exports::test_exports::StaticRules;
use morpheus_execution_exports::{
    ExecutionConfig, ExecutionError, MockWarpMessageSource, Transaction,
};
use morpheus_models::config::{MAX_WARP_MESSAGES, MAX_WARP_MESSAGE_SIZE};
use morpheus_models::{
    OutgoingWarpRecordDeserializer, StateKey, UnsignedWarpMessage, WarpMessage,
};
use morpheus_serialization::{DeserializeError, Deserializer};
use morpheus_state_exports::test_exports::MemoryStore;
use morpheus_state_exports::SetOrDelete;
use serial_test::serial;

fn run(
    config: ExecutionConfig,
    txs: &[TestTransaction],
) -> Result<morpheus_execution_exports::BlockExecutionOutput, ExecutionError> {
    BlockExecutor::new(config).unwrap().execute_block(
        &block(1),
        &StaticRules::default(),
        &MemoryStore::default(),
        txs,
        &CancellationScope::default(),
    )
}

fn distinct_emitters(count: u64) -> Vec<TestTransaction> {
    let rules = StaticRules::default();
    (0..count)
        .map(|i| {
            let message = warp_message(&rules, i.to_be_bytes().to_vec());
            scripted_tx(i, pk(1), ScriptedAction::emitter(message))
        })
        .collect()
}

#[test]
#[serial]
fn emitted_message_leaves_an_outgoing_record() {
    init_tracing();
    let message = warp_message(&StaticRules::default(), b"hello".to_vec());
    let txs = vec![scripted_tx(0, pk(1), ScriptedAction::emitter(message.clone()))];
    let output = run(ExecutionConfig::for_tests(), &txs).unwrap();

    assert_eq!(output.results[0].warp_message, Some(message.clone()));
    assert_eq!(output.warp_messages, vec![(tx_id(0), message.clone())]);

    let key = StateKey::outgoing_warp(&tx_id(0));
    let Some(SetOrDelete::Set(raw)) = output.state_changes.get(&key) else {
        panic!("no outgoing record stored");
    };
    let (rest, record) = OutgoingWarpRecordDeserializer::new()
        .deserialize::<DeserializeError>(raw)
        .unwrap();
    assert!(rest.is_empty());
    assert_eq!(record.message_id, message.id());
    assert_eq!(record.source_chain_id, message.source_chain_id);
    assert_eq!(record.payload_len, 5);
}

#[test]
#[serial]
fn block_message_count_is_bounded() {
    init_tracing();
    let output = run(
        ExecutionConfig::for_tests(),
        &distinct_emitters(MAX_WARP_MESSAGES as u64),
    )
    .unwrap();
    assert_eq!(output.warp_messages.len(), MAX_WARP_MESSAGES);

    let result = run(
        ExecutionConfig::for_tests(),
        &distinct_emitters(MAX_WARP_MESSAGES as u64 + 1),
    );
    assert_matches!(
        result,
        Err(ExecutionError::TooManyWarpMessages { count, max })
            if count == MAX_WARP_MESSAGES + 1 && max == MAX_WARP_MESSAGES
    );
}

#[test]
#[serial]
fn identical_messages_count_per_transaction() {
    init_tracing();
    let message = warp_message(&StaticRules::default(), b"same".to_vec());
    let emitters = |count: u64| -> Vec<TestTransaction> {
        (0..count)
            .map(|i| scripted_tx(i, pk(1), ScriptedAction::emitter(message.clone())))
            .collect()
    };
    let output = run(
        ExecutionConfig::for_tests(),
        &emitters(MAX_WARP_MESSAGES as u64),
    )
    .unwrap();
    assert_eq!(output.warp_messages.len(), MAX_WARP_MESSAGES);

    let result = run(
        ExecutionConfig::for_tests(),
        &emitters(MAX_WARP_MESSAGES as u64 + 1),
    );
    assert_matches!(
        result,
        Err(ExecutionError::TooManyWarpMessages { count, max })
            if count == MAX_WARP_MESSAGES + 1 && max == MAX_WARP_MESSAGES
    );
}

#[test]
#[serial]
fn undeclared_emission_aborts_the_block() {
    init_tracing();
    let action = ScriptedAction {
        outputs_warp: false,
        ..ScriptedAction::emitter(warp_message(&StaticRules::default(), vec![1]))
    };
    let result = run(ExecutionConfig::for_tests(), &[scripted_tx(0, pk(1), action)]);
    assert_matches!(result, Err(ExecutionError::WarpViolation { .. }));
}

#[test]
#[serial]
fn oversized_emission_aborts_the_block() {
    init_tracing();
    let rules = StaticRules::default();
    let fits = ScriptedAction::emitter(warp_message(&rules, vec![0; MAX_WARP_MESSAGE_SIZE]));
    assert!(run(ExecutionConfig::for_tests(), &[scripted_tx(0, pk(1), fits)]).is_ok());

    let too_big = ScriptedAction::emitter(warp_message(&rules, vec![0; MAX_WARP_MESSAGE_SIZE + 1]));
    let result = run(ExecutionConfig::for_tests(), &[scripted_tx(0, pk(1), too_big)]);
    assert_matches!(result, Err(ExecutionError::WarpViolation { .. }));
}

#[test]
#[serial]
fn failed_emitter_drops_its_message() {
    init_tracing();
    let action = ScriptedAction {
        success: false,
        ..ScriptedAction::emitter(warp_message(&StaticRules::default(), vec![1]))
    };
    let output = run(ExecutionConfig::for_tests(), &[scripted_tx(0, pk(1), action)]).unwrap();
    assert!(!output.results[0].success);
    assert_eq!(output.results[0].warp_message, None);
    assert!(output.warp_messages.is_empty());
    assert!(output.state_changes.is_empty());
}

#[test]
#[serial]
fn outgoing_storage_bounds_are_enforced() {
    init_tracing();
    let emitter = || {
        scripted_tx(
            0,
            pk(1),
            ScriptedAction::emitter(warp_message(&StaticRules::default(), vec![1])),
        )
    };

    let disabled = ExecutionConfig {
        max_outgoing_warp_chunks: 0,
        ..ExecutionConfig::for_tests()
    };
    assert_matches!(
        run(disabled, &[emitter()]),
        Err(ExecutionError::DeclarationViolation { .. })
    );

    // the record takes two chunks
    let too_small = ExecutionConfig {
        max_outgoing_warp_chunks: 1,
        ..ExecutionConfig::for_tests()
    };
    assert_matches!(
        run(too_small, &[emitter()]),
        Err(ExecutionError::WarpViolation { .. })
    );
}

#[test]
#[serial]
fn oversized_attached_message_is_refused() {
    init_tracing();
    let rules = StaticRules::default();
    let mut tx: TestTransaction = Transaction::new(
        tx_id(0),
        pk(1),
        Box::new(ScriptedAction::default()),
    );
    tx.warp_message = Some(WarpMessage {
        unsigned: warp_message(&rules, vec![0; MAX_WARP_MESSAGE_SIZE + 1]),
        signature: vec![],
    });
    tx.warp_verified = true;
    assert_matches!(
        run(ExecutionConfig::for_tests(), &[tx]),
        Err(ExecutionError::DeclarationViolation { .. })
    );
}

fn signed(payload: Vec<u8>) -> WarpMessage {
    WarpMessage {
        unsigned: UnsignedWarpMessage {
            network_id: 1337,
            source_chain_id: StaticRules::default().chain_id,
            payload,
        },
        signature: vec![9; 96],
    }
}

#[test]
#[serial]
fn incoming_messages_are_not_cached_by_default() {
    let manager = WarpManager::new(&ExecutionConfig::for_tests());
    let mut source = MockWarpMessageSource::new();
    source
        .expect_verified_message()
        .times(2)
        .returning(|_| Ok(Some(signed(vec![1]))));
    for _ in 0..2 {
        assert_eq!(
            manager.incoming_message(&source, &tx_id(0)).unwrap(),
            Some(signed(vec![1]))
        );
    }
}

#[test]
#[serial]
fn incoming_messages_are_cached_when_storage_is_enabled() {
    let manager = WarpManager::new(&ExecutionConfig {
        max_incoming_warp_chunks: 2,
        ..ExecutionConfig::for_tests()
    });
    let mut source = MockWarpMessageSource::new();
    source
        .expect_verified_message()
        .times(1)
        .returning(|_| Ok(Some(signed(vec![1]))));
    for _ in 0..3 {
        assert_eq!(
            manager.incoming_message(&source, &tx_id(0)).unwrap(),
            Some(signed(vec![1]))
        );
    }
}

#[test]
#[serial]
fn incoming_messages_above_the_chunk_bound_are_not_cached() {
    let manager = WarpManager::new(&ExecutionConfig {
        max_incoming_warp_chunks: 1,
        ..ExecutionConfig::for_tests()
    });
    let mut source = MockWarpMessageSource::new();
    // 40 bytes of header and 100 of payload take three chunks
    source
        .expect_verified_message()
        .times(2)
        .returning(|_| Ok(Some(signed(vec![1; 100]))));
    for _ in 0..2 {
        assert!(manager.incoming_message(&source, &tx_id(0)).unwrap().is_some());
    }
}

#[test]
#[serial]
fn outgoing_record_is_refused_when_storage_is_disabled() {
    let manager = WarpManager::new(&ExecutionConfig {
        max_outgoing_warp_chunks: 0,
        ..ExecutionConfig::for_tests()
    });
    let message = warp_message(&StaticRules::default(), vec![1]);
    assert_matches!(
        manager.outgoing_record(&tx_id(0), &message),
        Err(ExecutionError::WarpViolation { .. })
    );
    let manager = WarpManager::new(&ExecutionConfig::for_tests());
    let (key, value) = manager.outgoing_record(&tx_id(0), &message).unwrap();
    assert_eq!(key, StateKey::outgoing_warp(&tx_id(0)));
    assert_eq!(value.len(), 68);
}
