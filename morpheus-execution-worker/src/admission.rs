// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Checks run on a transaction before it may be scheduled

use crate::warp::check_incoming_size;
use morpheus_execution_exports::{Action, AdmissionError, ExecutionConfig, Rules, Transaction};
use morpheus_models::config::ALWAYS_VALID;
use morpheus_models::StateKey;
use std::collections::BTreeSet;

/// Keys a transaction may touch, with their chunk bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredKeys {
    /// declared keys, action keys first
    pub keys: Vec<StateKey>,
    /// chunk bound of each key, same order
    pub max_chunks: Vec<u16>,
}

impl DeclaredKeys {
    /// Declared keys as a set, used for conflict detection
    pub fn key_set(&self) -> BTreeSet<StateKey> {
        self.keys.iter().cloned().collect()
    }
}

/// Keys declared by `tx`: the keys of its action, plus the outgoing warp
/// record key of the transaction when the action may emit a warp message.
pub fn declared_keys<A: Action>(tx: &Transaction<A>, config: &ExecutionConfig) -> DeclaredKeys {
    let mut keys = tx.action.state_keys(&tx.actor, &tx.tx_id);
    let mut max_chunks = tx.action.state_keys_max_chunks();
    if tx.action.outputs_warp_message() {
        keys.push(StateKey::outgoing_warp(&tx.tx_id));
        max_chunks.push(config.max_outgoing_warp_chunks);
    }
    DeclaredKeys { keys, max_chunks }
}

/// Refuses a transaction that cannot be scheduled at `timestamp`
///
/// # Arguments
/// * `tx`: transaction to check
/// * `rules`: chain rules in force
/// * `timestamp`: timestamp of the block the transaction would be part of
/// * `config`: execution configuration
pub fn validate_transaction<A: Action>(
    tx: &Transaction<A>,
    rules: &dyn Rules,
    timestamp: i64,
    config: &ExecutionConfig,
) -> Result<(), AdmissionError> {
    let keys = tx.action.state_keys(&tx.actor, &tx.tx_id);
    let max_chunks = tx.action.state_keys_max_chunks();
    if keys.len() != max_chunks.len() {
        return Err(AdmissionError::KeyChunkMismatch {
            keys: keys.len(),
            chunks: max_chunks.len(),
        });
    }
    // duplicate keys are fine: conflicts are computed on the key set
    for (index, chunks) in max_chunks.iter().enumerate() {
        if *chunks == 0 || *chunks > config.max_key_chunks {
            return Err(AdmissionError::InvalidChunkBound {
                index,
                chunks: *chunks,
                max: config.max_key_chunks,
            });
        }
    }

    let (start, end) = tx.action.valid_range(rules);
    if (start, end) != ALWAYS_VALID
        && ((start >= 0 && timestamp < start) || (end >= 0 && timestamp > end))
    {
        return Err(AdmissionError::OutsideValidRange {
            timestamp,
            start,
            end,
        });
    }

    if let Some(message) = &tx.warp_message {
        check_incoming_size(message, config.max_warp_message_size)?;
    }

    if tx.action.outputs_warp_message() && config.max_outgoing_warp_chunks == 0 {
        return Err(AdmissionError::WarpOutputDisabled);
    }
    Ok(())
}
