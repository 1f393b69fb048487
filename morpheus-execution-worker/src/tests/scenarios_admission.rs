// Copyright (c) 2022 MASSA LABS <info@massa.net>

use super::tools::*;
use crate::{declared_keys, validate_transaction};
use assert_matches::assert_matches;
use morpheus_actions::balance_key;
use morpheus_execution_exports::test_exports::StaticRules;
use morpheus_execution_exports::{AdmissionError, ExecutionConfig, Transaction};
use morpheus_models::config::MAX_WARP_MESSAGE_SIZE;
use morpheus_models::{StateKey, WarpMessage};
use serial_test::serial;

fn check(action: ScriptedAction, timestamp: i64) -> Result<(), AdmissionError> {
    validate_transaction(
        &scripted_tx(0, pk(1), action),
        &StaticRules::default(),
        timestamp,
        &ExecutionConfig::for_tests(),
    )
}

#[test]
#[serial]
fn transfer_declares_both_balances() {
    let tx = transfer_tx(0, pk(1), pk(2), 5);
    let declared = declared_keys(&tx, &ExecutionConfig::for_tests());
    assert_eq!(declared.keys, vec![balance_key(&pk(1)), balance_key(&pk(2))]);
    assert_eq!(declared.max_chunks, vec![1, 1]);
    assert!(validate_transaction(&tx, &StaticRules::default(), 0, &ExecutionConfig::for_tests()).is_ok());
}

#[test]
#[serial]
fn warp_output_declares_the_outgoing_key() {
    let config = ExecutionConfig::for_tests();
    let tx = scripted_tx(
        3,
        pk(1),
        ScriptedAction::emitter(warp_message(&StaticRules::default(), vec![1])),
    );
    let declared = declared_keys(&tx, &config);
    assert_eq!(declared.keys, vec![StateKey::outgoing_warp(&tx_id(3))]);
    assert_eq!(declared.max_chunks, vec![config.max_outgoing_warp_chunks]);
}

#[test]
#[serial]
fn key_and_chunk_lists_must_match() {
    let action = ScriptedAction {
        keys: vec![StateKey::new(vec![1]), StateKey::new(vec![2])],
        chunks: vec![1],
        ..Default::default()
    };
    assert_eq!(
        check(action, 0),
        Err(AdmissionError::KeyChunkMismatch { keys: 2, chunks: 1 })
    );
}

#[test]
#[serial]
fn chunk_bounds_must_be_positive_and_bounded() {
    let max = ExecutionConfig::for_tests().max_key_chunks;
    let with_chunks = |chunks: u16| ScriptedAction {
        keys: vec![StateKey::new(vec![1])],
        chunks: vec![chunks],
        ..Default::default()
    };
    assert_matches!(
        check(with_chunks(0), 0),
        Err(AdmissionError::InvalidChunkBound { index: 0, chunks: 0, .. })
    );
    assert!(check(with_chunks(max), 0).is_ok());
    assert_matches!(
        check(with_chunks(max + 1), 0),
        Err(AdmissionError::InvalidChunkBound { .. })
    );
}

#[test]
#[serial]
fn duplicate_keys_are_accepted() {
    let key = StateKey::new(vec![1]);
    let action = ScriptedAction {
        keys: vec![key.clone(), key],
        chunks: vec![1, 2],
        ..Default::default()
    };
    assert!(check(action, 0).is_ok());
}

#[test]
#[serial]
fn valid_range_bounds_are_inclusive() {
    let ranged = |range| ScriptedAction {
        range,
        ..Default::default()
    };
    assert!(check(ranged((100, 200)), 100).is_ok());
    assert!(check(ranged((100, 200)), 200).is_ok());
    assert_matches!(
        check(ranged((100, 200)), 99),
        Err(AdmissionError::OutsideValidRange { .. })
    );
    assert_matches!(
        check(ranged((100, 200)), 201),
        Err(AdmissionError::OutsideValidRange { .. })
    );
    // a negative bound is open
    assert!(check(ranged((-1, 200)), 0).is_ok());
    assert!(check(ranged((100, -1)), i64::MAX).is_ok());
    assert!(check(ranged((-1, -1)), 12345).is_ok());
}

#[test]
#[serial]
fn attached_message_size_is_bounded() {
    let rules = StaticRules::default();
    let attach = |size: usize| {
        let mut tx: TestTransaction =
            Transaction::new(tx_id(0), pk(1), Box::new(ScriptedAction::default()));
        tx.warp_message = Some(WarpMessage {
            unsigned: warp_message(&rules, vec![0; size]),
            signature: vec![],
        });
        validate_transaction(&tx, &rules, 0, &ExecutionConfig::for_tests())
    };
    assert!(attach(MAX_WARP_MESSAGE_SIZE).is_ok());
    assert_eq!(
        attach(MAX_WARP_MESSAGE_SIZE + 1),
        Err(AdmissionError::WarpMessageTooLarge {
            size: MAX_WARP_MESSAGE_SIZE + 1,
            max: MAX_WARP_MESSAGE_SIZE,
        })
    );
}

#[test]
#[serial]
fn warp_output_needs_outgoing_storage() {
    let tx = scripted_tx(
        0,
        pk(1),
        ScriptedAction::emitter(warp_message(&StaticRules::default(), vec![1])),
    );
    let config = ExecutionConfig {
        max_outgoing_warp_chunks: 0,
        ..ExecutionConfig::for_tests()
    };
    assert_eq!(
        validate_transaction(&tx, &StaticRules::default(), 0, &config),
        Err(AdmissionError::WarpOutputDisabled)
    );
}
