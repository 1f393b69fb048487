// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This file exports useful types used to interact with the execution worker

use crate::action::Action;
use morpheus_models::{Hash, PublicKey, TxId, UnsignedWarpMessage, WarpMessage};
use morpheus_state_exports::StateChanges;
use std::collections::BTreeMap;

/// A transaction whose signature was already checked
#[derive(Debug, Clone)]
pub struct Transaction<A> {
    /// id of the transaction
    pub tx_id: TxId,
    /// signer of the transaction
    pub actor: PublicKey,
    /// action to run
    pub action: A,
    /// attached incoming warp message
    pub warp_message: Option<WarpMessage>,
    /// whether the attached warp message was verified
    pub warp_verified: bool,
}

impl<A: Action> Transaction<A> {
    /// Creates a transaction without attached warp message
    pub fn new(tx_id: TxId, actor: PublicKey, action: A) -> Self {
        Transaction {
            tx_id,
            actor,
            action,
            warp_message: None,
            warp_verified: false,
        }
    }
}

/// Information about the block being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    /// block timestamp, milliseconds
    pub timestamp: i64,
    /// price of one compute unit in this block
    pub unit_price: u64,
}

/// Information about a past transaction block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxBlockInfo {
    /// unit price charged by that block
    pub unit_price: u64,
}

/// Information about the block the node builds on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootBlockInfo {
    /// last transaction block of the chain, if any
    pub last_tx_block: Option<TxBlockInfo>,
}

/// Result of one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// whether the action took effect
    pub success: bool,
    /// compute units consumed, reported even on failure
    pub units_consumed: u64,
    /// empty on success, diagnostic on failure
    pub output: Vec<u8>,
    /// emitted warp message
    pub warp_message: Option<UnsignedWarpMessage>,
    /// fee charged to the actor
    pub fee: u64,
}

/// Output of a block build
#[derive(Debug, Clone)]
pub struct BlockExecutionOutput {
    /// per transaction results, in submission order
    pub results: Vec<ExecutionResult>,
    /// changes to apply to the state
    pub state_changes: StateChanges,
    /// digest of `state_changes`
    pub changes_digest: Hash,
    /// number of waves the block was split into
    pub wave_count: usize,
    /// fees owed by each actor
    pub fee_ledger: BTreeMap<PublicKey, u64>,
    /// sum of the fees of the block
    pub total_fees: u64,
    /// emitted warp messages with their emitting transaction, in submission order
    pub warp_messages: Vec<(TxId, UnsignedWarpMessage)>,
}
