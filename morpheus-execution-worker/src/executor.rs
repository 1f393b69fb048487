// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Block execution.
//!
//! A block is split into waves of key-disjoint transactions. The transactions
//! of a wave run in parallel, each against its own `ActionState` over the
//! committed state and the changes of the previous waves. Once the wave is
//! over, the changes of its transactions are merged in submission order.
//! Any fatal error aborts the whole build and discards its output.

use crate::admission::{declared_keys, validate_transaction, DeclaredKeys};
use crate::cancellation::CancellationScope;
use crate::fees::fee_for;
use crate::scheduler::{partition_waves, Wave};
use crate::warp::WarpManager;
use morpheus_execution_exports::{
    Action, ActionContext, BlockContext, BlockExecutionOutput, ExecutionConfig, ExecutionError,
    ExecutionResult, Rules, Transaction,
};
use morpheus_logging::morpheus_trace;
use morpheus_models::{PublicKey, TxId, UnsignedWarpMessage};
use morpheus_state_exports::{ActionState, StateChanges, StateReader};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// What one transaction leaves behind
struct TxOutcome {
    result: ExecutionResult,
    changes: StateChanges,
}

/// Builds blocks on a bounded worker pool
pub struct BlockExecutor {
    config: ExecutionConfig,
    pool: rayon::ThreadPool,
    warp_manager: WarpManager,
}

impl BlockExecutor {
    /// Creates a new `BlockExecutor` and its worker pool
    pub fn new(config: ExecutionConfig) -> Result<Self, ExecutionError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|index| format!("execution-worker-{}", index))
            .build()
            .map_err(|err| ExecutionError::PoolError(err.to_string()))?;
        let warp_manager = WarpManager::new(&config);
        Ok(BlockExecutor {
            config,
            pool,
            warp_manager,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Warp bounds in use
    pub fn warp_manager(&self) -> &WarpManager {
        &self.warp_manager
    }

    /// Executes `txs` on top of `state`
    ///
    /// # Arguments
    /// * `block`: timestamp and unit price of the block
    /// * `rules`: chain rules in force
    /// * `state`: committed state, left untouched
    /// * `txs`: transactions in submission order
    /// * `cancel`: scope of this build
    ///
    /// # Returns
    /// The per transaction results in submission order and the changes to apply
    pub fn execute_block<A: Action>(
        &self,
        block: &BlockContext,
        rules: &dyn Rules,
        state: &dyn StateReader,
        txs: &[Transaction<A>],
        cancel: &CancellationScope,
    ) -> Result<BlockExecutionOutput, ExecutionError> {
        let now = now_millis();
        if block.timestamp > now.saturating_add(self.config.future_bound) {
            return Err(ExecutionError::FutureTimestamp {
                timestamp: block.timestamp,
                now,
            });
        }

        let mut declarations = Vec::with_capacity(txs.len());
        for tx in txs {
            validate_transaction(tx, rules, block.timestamp, &self.config).map_err(|err| {
                ExecutionError::DeclarationViolation {
                    tx_id: tx.tx_id,
                    reason: err.to_string(),
                }
            })?;
            declarations.push(declared_keys(tx, &self.config));
        }
        let key_sets: Vec<BTreeSet<_>> = declarations.iter().map(DeclaredKeys::key_set).collect();
        let waves = partition_waves(&key_sets);
        debug!(
            "executing block at {}: {} transactions in {} waves",
            block.timestamp,
            txs.len(),
            waves.len()
        );

        let mut block_changes = StateChanges::new();
        let mut results: Vec<Option<ExecutionResult>> = vec![None; txs.len()];
        for (wave_index, wave) in waves.iter().enumerate() {
            cancel.check()?;
            let outcomes =
                self.execute_wave(wave, block, rules, state, &block_changes, txs, &declarations, cancel);
            // the lowest failing position decides the reported error
            if let Some(err) = outcomes
                .iter()
                .find_map(|outcome| outcome.as_ref().and_then(|res| res.as_ref().err()))
            {
                warn!("block build aborted in wave {}: {}", wave_index, err);
                return Err(err.clone());
            }
            for (index, outcome) in wave.indices.iter().zip(outcomes) {
                let Some(Ok(outcome)) = outcome else {
                    return Err(ExecutionError::Cancelled);
                };
                block_changes.apply(outcome.changes);
                results[*index] = Some(outcome.result);
            }
            debug!("wave {} done: {} transactions", wave_index, wave.indices.len());
        }

        let results = results
            .into_iter()
            .map(|result| result.ok_or(ExecutionError::Cancelled))
            .collect::<Result<Vec<_>, _>>()?;

        let warp_messages: Vec<(TxId, UnsignedWarpMessage)> = txs
            .iter()
            .zip(results.iter())
            .filter_map(|(tx, result)| {
                result
                    .warp_message
                    .as_ref()
                    .map(|message| (tx.tx_id, message.clone()))
            })
            .collect();
        self.warp_manager.check_block(&warp_messages)?;

        let mut fee_ledger: BTreeMap<PublicKey, u64> = BTreeMap::new();
        let mut total_fees: u64 = 0;
        for (tx, result) in txs.iter().zip(results.iter()) {
            let owed = fee_ledger.entry(tx.actor).or_insert(0);
            *owed = owed.saturating_add(result.fee);
            total_fees = total_fees.saturating_add(result.fee);
        }

        let changes_digest = block_changes.hash();
        debug!(
            "block at {} built: {} changes, digest {}, fees {}",
            block.timestamp,
            block_changes.len(),
            changes_digest,
            total_fees
        );
        Ok(BlockExecutionOutput {
            results,
            state_changes: block_changes,
            changes_digest,
            wave_count: waves.len(),
            fee_ledger,
            total_fees,
            warp_messages,
        })
    }

    /// Runs the transactions of `wave` in parallel.
    /// Returns one entry per transaction of the wave, `None` when it was
    /// skipped because a transaction placed before it in the wave failed.
    /// Transactions placed before a failure always run, so the failure
    /// reported for the wave does not depend on worker timing.
    #[allow(clippy::too_many_arguments)]
    fn execute_wave<A: Action>(
        &self,
        wave: &Wave,
        block: &BlockContext,
        rules: &dyn Rules,
        state: &dyn StateReader,
        block_changes: &StateChanges,
        txs: &[Transaction<A>],
        declarations: &[DeclaredKeys],
        cancel: &CancellationScope,
    ) -> Vec<Option<Result<TxOutcome, ExecutionError>>> {
        let first_failure = AtomicUsize::new(usize::MAX);
        self.pool.install(|| {
            wave.indices
                .par_iter()
                .map(|&index| {
                    if index > first_failure.load(Ordering::Acquire) {
                        return None;
                    }
                    let outcome = cancel.check().and_then(|_| {
                        self.execute_transaction(
                            block,
                            rules,
                            state,
                            block_changes,
                            &txs[index],
                            &declarations[index],
                        )
                    });
                    if outcome.is_err() {
                        first_failure.fetch_min(index, Ordering::AcqRel);
                    }
                    Some(outcome)
                })
                .collect()
        })
    }

    fn execute_transaction<A: Action>(
        &self,
        block: &BlockContext,
        rules: &dyn Rules,
        state: &dyn StateReader,
        block_changes: &StateChanges,
        tx: &Transaction<A>,
        declared: &DeclaredKeys,
    ) -> Result<TxOutcome, ExecutionError> {
        let mut action_state =
            ActionState::new(state, block_changes, &declared.keys, &declared.max_chunks);
        let ctx = ActionContext {
            rules,
            timestamp: block.timestamp,
            actor: tx.actor,
            tx_id: tx.tx_id,
            warp_verified: tx.warp_verified,
            warp_message: tx.warp_message.as_ref(),
        };
        let output = tx.action.execute(&ctx, &mut action_state);
        // an ignored out of declaration access still aborts the block
        if let Some(violation) = action_state.take_violation() {
            return Err(ExecutionError::DeclarationViolation {
                tx_id: tx.tx_id,
                reason: violation.to_string(),
            });
        }
        let output = output?;

        let max_units = tx.action.max_compute_units(rules);
        if output.units_consumed > max_units {
            return Err(ExecutionError::DeclarationViolation {
                tx_id: tx.tx_id,
                reason: format!(
                    "consumed {} compute units, declared at most {}",
                    output.units_consumed, max_units
                ),
            });
        }
        self.warp_manager.check_emitted(
            &tx.tx_id,
            tx.action.outputs_warp_message(),
            output.warp_message.as_ref(),
        )?;

        let fee = fee_for(output.units_consumed, block.unit_price);
        morpheus_trace!("execution.tx", {
            "tx_id": tx.tx_id.to_string(),
            "type_id": tx.action.type_id(),
            "success": output.success,
            "units": output.units_consumed,
            "fee": fee,
        });

        if !output.success {
            // dropping the action state discards whatever the action wrote
            return Ok(TxOutcome {
                result: ExecutionResult {
                    success: false,
                    units_consumed: output.units_consumed,
                    output: output.output,
                    warp_message: None,
                    fee,
                },
                changes: StateChanges::new(),
            });
        }

        if let Some(message) = &output.warp_message {
            let (key, value) = self.warp_manager.outgoing_record(&tx.tx_id, message)?;
            action_state.put(key, value)?;
        }
        Ok(TxOutcome {
            result: ExecutionResult {
                success: true,
                units_consumed: output.units_consumed,
                output: output.output,
                warp_message: output.warp_message,
                fee,
            },
            changes: action_state.commit(),
        })
    }
}

impl std::fmt::Debug for BlockExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockExecutor")
            .field("config", &self.config)
            .field("workers", &self.pool.current_num_threads())
            .field("warp_manager", &self.warp_manager)
            .finish()
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
