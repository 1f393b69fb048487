// Copyright (c) 2022 MASSA LABS <info@massa.net>

use super::tools::*;
use crate::{BlockExecutor, CancellationScope};
use assert_matches::assert_matches;
use morpheus_execution_exports::test_exports::StaticRules;
use morpheus_execution_exports::{Action, ExecutionConfig, ExecutionError};
use morpheus_models::StateKey;
use morpheus_state_exports::test_exports::MemoryStore;
use morpheus_state_exports::{MockStateReader, StateChanges, StateError, StateStore};
use serial_test::serial;
use std::time::Duration;

fn executor() -> BlockExecutor {
    BlockExecutor::new(ExecutionConfig::for_tests()).unwrap()
}

fn key(b: u8) -> StateKey {
    StateKey::new(vec![0xee, b])
}

#[test]
#[serial]
fn empty_block_has_no_change() {
    init_tracing();
    let output = executor()
        .execute_block::<Box<dyn Action>>(
            &block(1),
            &StaticRules::default(),
            &MemoryStore::default(),
            &[],
            &CancellationScope::default(),
        )
        .unwrap();
    assert!(output.results.is_empty());
    assert_eq!(output.wave_count, 0);
    assert!(output.state_changes.is_empty());
    assert_eq!(output.changes_digest, StateChanges::new().hash());
    assert_eq!(output.total_fees, 0);
}

#[test]
#[serial]
fn disjoint_transfers_run_in_one_wave() {
    init_tracing();
    let mut store = funded_store(&[(pk(1), 100), (pk(3), 100), (pk(5), 100)]);
    let txs = vec![
        transfer_tx(0, pk(1), pk(2), 10),
        transfer_tx(1, pk(3), pk(4), 20),
        transfer_tx(2, pk(5), pk(6), 30),
    ];
    let output = executor()
        .execute_block(
            &block(5),
            &StaticRules::default(),
            &store,
            &txs,
            &CancellationScope::default(),
        )
        .unwrap();
    assert_eq!(output.wave_count, 1);
    assert_eq!(output.results.len(), 3);
    assert!(output.results.iter().all(|result| result.success));
    assert!(output.results.iter().all(|result| result.fee == 5));
    assert_eq!(output.total_fees, 15);
    assert_eq!(output.fee_ledger.get(&pk(3)), Some(&5));

    store.apply(&output.state_changes).unwrap();
    assert_eq!(balance_of(&store, &pk(1)), Some(90));
    assert_eq!(balance_of(&store, &pk(2)), Some(10));
    assert_eq!(balance_of(&store, &pk(4)), Some(20));
    assert_eq!(balance_of(&store, &pk(6)), Some(30));
}

#[test]
#[serial]
fn conflicting_transfers_keep_submission_order() {
    init_tracing();
    let mut store = funded_store(&[(pk(1), 10)]);
    let txs = vec![
        transfer_tx(0, pk(1), pk(2), 7),
        transfer_tx(1, pk(1), pk(3), 7),
    ];
    let output = executor()
        .execute_block(
            &block(1),
            &StaticRules::default(),
            &store,
            &txs,
            &CancellationScope::default(),
        )
        .unwrap();
    assert_eq!(output.wave_count, 2);
    assert!(output.results[0].success);
    assert!(!output.results[1].success);
    assert_eq!(
        String::from_utf8(output.results[1].output.clone()).unwrap(),
        "invalid balance: could not subtract balance (bal=3, amount=7)"
    );
    // the failed transfer is still charged
    assert_eq!(output.results[1].fee, 1);
    assert_eq!(output.fee_ledger.get(&pk(1)), Some(&2));

    store.apply(&output.state_changes).unwrap();
    assert_eq!(balance_of(&store, &pk(1)), Some(3));
    assert_eq!(balance_of(&store, &pk(2)), Some(7));
    assert_eq!(balance_of(&store, &pk(3)), None);
}

#[test]
#[serial]
fn later_waves_see_earlier_changes() {
    init_tracing();
    let mut store = funded_store(&[(pk(1), 5)]);
    // pk(2) only gets funds from the first transfer
    let txs = vec![
        transfer_tx(0, pk(1), pk(2), 5),
        transfer_tx(1, pk(2), pk(3), 4),
    ];
    let output = executor()
        .execute_block(
            &block(1),
            &StaticRules::default(),
            &store,
            &txs,
            &CancellationScope::default(),
        )
        .unwrap();
    assert_eq!(output.wave_count, 2);
    assert!(output.results.iter().all(|result| result.success));
    store.apply(&output.state_changes).unwrap();
    assert_eq!(balance_of(&store, &pk(1)), None);
    assert_eq!(balance_of(&store, &pk(2)), Some(1));
    assert_eq!(balance_of(&store, &pk(3)), Some(4));
}

#[test]
#[serial]
fn disjoint_transactions_commute() {
    init_tracing();
    let store = funded_store(&[(pk(1), 50), (pk(3), 50)]);
    let a = || transfer_tx(0, pk(1), pk(2), 10);
    let b = || transfer_tx(1, pk(3), pk(4), 15);
    let executor = executor();
    let rules = StaticRules::default();
    let forward = executor
        .execute_block(
            &block(1),
            &rules,
            &store,
            &[a(), b()],
            &CancellationScope::default(),
        )
        .unwrap();
    let backward = executor
        .execute_block(&block(1), &rules, &store, &[b(), a()], &CancellationScope::default())
        .unwrap();
    assert_eq!(forward.changes_digest, backward.changes_digest);
    assert_eq!(forward.state_changes, backward.state_changes);
}

#[test]
#[serial]
fn results_do_not_depend_on_the_pool_size() {
    init_tracing();
    let accounts: Vec<_> = (1..=8).map(|b| (pk(b), 1_000)).collect();
    let store = funded_store(&accounts);
    let txs: Vec<_> = (0..40u64)
        .map(|i| {
            let from = pk((i * 7 % 8) as u8 + 1);
            let to = pk(((i * 3 + 1) % 8) as u8 + 1);
            transfer_tx(i, from, to, i * 13 % 50)
        })
        .collect();
    let rules = StaticRules::default();

    let mut outputs = Vec::new();
    for worker_count in [1, 4] {
        let executor = BlockExecutor::new(ExecutionConfig {
            worker_count,
            ..ExecutionConfig::for_tests()
        })
        .unwrap();
        outputs.push(
            executor
                .execute_block(&block(2), &rules, &store, &txs, &CancellationScope::default())
                .unwrap(),
        );
    }
    assert_eq!(outputs[0].changes_digest, outputs[1].changes_digest);
    assert_eq!(outputs[0].results, outputs[1].results);
    assert_eq!(outputs[0].wave_count, outputs[1].wave_count);

    // transfers only move funds around
    let mut store = store;
    store.apply(&outputs[0].state_changes).unwrap();
    let supply: u64 = (1..=8).filter_map(|b| balance_of(&store, &pk(b))).sum();
    assert_eq!(supply, 8_000);
}

#[test]
#[serial]
fn failed_action_leaves_no_change() {
    init_tracing();
    let store = MemoryStore::default();
    let action = ScriptedAction {
        success: false,
        units: 1,
        ..ScriptedAction::writer(key(1), vec![1, 2, 3])
    };
    let output = executor()
        .execute_block(
            &block(3),
            &StaticRules::default(),
            &store,
            &[scripted_tx(0, pk(1), action)],
            &CancellationScope::default(),
        )
        .unwrap();
    assert!(!output.results[0].success);
    assert_eq!(output.results[0].output, b"scripted failure".to_vec());
    assert_eq!(output.results[0].fee, 3);
    assert!(output.state_changes.is_empty());
}

#[test]
#[serial]
fn undeclared_write_aborts_the_block() {
    init_tracing();
    let action = ScriptedAction {
        writes: vec![(key(9), vec![0])],
        ..ScriptedAction::writer(key(1), vec![1])
    };
    let expected = tx_id(0);
    let result = executor().execute_block(
        &block(1),
        &StaticRules::default(),
        &MemoryStore::default(),
        &[scripted_tx(0, pk(1), action)],
        &CancellationScope::default(),
    );
    assert_matches!(
        result,
        Err(ExecutionError::DeclarationViolation { tx_id: id, .. }) if id == expected
    );
}

#[test]
#[serial]
fn ignored_undeclared_access_aborts_the_block() {
    init_tracing();
    // the action drops the errors and reports success
    let action = ScriptedAction {
        reads: vec![key(9)],
        writes: vec![(key(1), vec![1]), (key(9), vec![0])],
        ignore_errors: true,
        ..ScriptedAction::writer(key(1), vec![1])
    };
    let expected = tx_id(0);
    let result = executor().execute_block(
        &block(1),
        &StaticRules::default(),
        &MemoryStore::default(),
        &[scripted_tx(0, pk(1), action)],
        &CancellationScope::default(),
    );
    assert_matches!(
        result,
        Err(ExecutionError::DeclarationViolation { tx_id: id, reason }) if id == expected
            && reason.contains("not declared")
    );
}

#[test]
#[serial]
fn ignored_chunk_overflow_aborts_the_block() {
    init_tracing();
    let action = ScriptedAction {
        ignore_errors: true,
        ..ScriptedAction::writer(key(1), vec![7; 65])
    };
    let result = executor().execute_block(
        &block(1),
        &StaticRules::default(),
        &MemoryStore::default(),
        &[scripted_tx(0, pk(1), action)],
        &CancellationScope::default(),
    );
    assert_matches!(result, Err(ExecutionError::DeclarationViolation { .. }));
}

#[test]
#[serial]
fn oversized_write_aborts_the_block() {
    init_tracing();
    // 65 bytes take two chunks, one declared
    let action = ScriptedAction::writer(key(1), vec![7; 65]);
    let result = executor().execute_block(
        &block(1),
        &StaticRules::default(),
        &MemoryStore::default(),
        &[scripted_tx(0, pk(1), action)],
        &CancellationScope::default(),
    );
    assert_matches!(result, Err(ExecutionError::DeclarationViolation { .. }));
}

#[test]
#[serial]
fn compute_units_above_declaration_abort_the_block() {
    init_tracing();
    let action = ScriptedAction {
        units: 10,
        max_units: 3,
        ..Default::default()
    };
    let expected = tx_id(4);
    let result = executor().execute_block(
        &block(1),
        &StaticRules::default(),
        &MemoryStore::default(),
        &[scripted_tx(4, pk(1), action)],
        &CancellationScope::default(),
    );
    assert_matches!(
        result,
        Err(ExecutionError::DeclarationViolation { tx_id: id, .. }) if id == expected
    );
}

#[test]
#[serial]
fn first_failure_in_submission_order_is_reported() {
    init_tracing();
    let undeclared = ScriptedAction {
        writes: vec![(key(9), vec![0])],
        ..ScriptedAction::writer(key(2), vec![1])
    };
    let greedy = ScriptedAction {
        units: 5,
        ..ScriptedAction::writer(key(3), vec![1])
    };
    let txs = vec![
        scripted_tx(0, pk(1), ScriptedAction::writer(key(1), vec![1])),
        scripted_tx(1, pk(1), undeclared),
        scripted_tx(2, pk(1), greedy.clone()),
        scripted_tx(3, pk(1), greedy),
    ];
    let expected = tx_id(1);
    let executor = executor();
    for _ in 0..10 {
        let result = executor.execute_block(
            &block(1),
            &StaticRules::default(),
            &MemoryStore::default(),
            &txs,
            &CancellationScope::default(),
        );
        assert_matches!(
            result,
            Err(ExecutionError::DeclarationViolation { tx_id: id, .. }) if id == expected
        );
    }
}

#[test]
#[serial]
fn store_errors_abort_the_block() {
    init_tracing();
    let mut reader = MockStateReader::new();
    reader
        .expect_get()
        .returning(|_| Err(StateError::StoreError("disk unavailable".into())));
    let result = executor().execute_block(
        &block(1),
        &StaticRules::default(),
        &reader,
        &[transfer_tx(0, pk(1), pk(2), 1)],
        &CancellationScope::default(),
    );
    assert_matches!(
        result,
        Err(ExecutionError::StateError(StateError::StoreError(_)))
    );
}

#[test]
#[serial]
fn future_block_is_refused() {
    init_tracing();
    let mut context = block(1);
    context.timestamp += 60_000;
    let result = executor().execute_block(
        &context,
        &StaticRules::default(),
        &funded_store(&[(pk(1), 10)]),
        &[transfer_tx(0, pk(1), pk(2), 1)],
        &CancellationScope::default(),
    );
    assert_matches!(result, Err(ExecutionError::FutureTimestamp { .. }));
}

#[test]
#[serial]
fn cancelled_build_yields_nothing() {
    init_tracing();
    let store = funded_store(&[(pk(1), 10)]);
    let txs = vec![transfer_tx(0, pk(1), pk(2), 1)];
    let scope = CancellationScope::default();
    scope.cancel();
    let result =
        executor().execute_block(&block(1), &StaticRules::default(), &store, &txs, &scope);
    assert_matches!(result, Err(ExecutionError::Cancelled));

    let scope = CancellationScope::new(Some(Duration::ZERO));
    let result =
        executor().execute_block(&block(1), &StaticRules::default(), &store, &txs, &scope);
    assert_matches!(result, Err(ExecutionError::DeadlineExceeded));
}

#[test]
#[serial]
fn invalid_declaration_is_refused_before_running() {
    init_tracing();
    let action = ScriptedAction {
        keys: vec![key(1)],
        chunks: vec![],
        ..Default::default()
    };
    let result = executor().execute_block(
        &block(1),
        &StaticRules::default(),
        &MemoryStore::default(),
        &[scripted_tx(0, pk(1), action)],
        &CancellationScope::default(),
    );
    assert_matches!(result, Err(ExecutionError::DeclarationViolation { .. }));
}
