// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module exports the read-only interfaces the execution core expects
//! from the surrounding chain

use crate::error::ChainError;
use crate::types::RootBlockInfo;
use morpheus_models::{ChainId, TxId, WarpMessage};

/// Chain rules, possibly changing with time
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
pub trait Rules: Send + Sync {
    /// Lowest unit price accepted at `timestamp` (milliseconds)
    fn min_unit_price(&self, timestamp: i64) -> u64;

    /// Id of the network
    fn network_id(&self) -> u32;

    /// Id of this chain, source of the emitted warp messages
    fn chain_id(&self) -> ChainId;
}

/// Access to the chain being extended
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
pub trait ChainReader: Send + Sync {
    /// Block the node currently builds on
    fn preferred_block(&self) -> Result<RootBlockInfo, ChainError>;
}

/// Access to the incoming warp messages verified by the framework
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
pub trait WarpMessageSource: Send + Sync {
    /// Verified warp message attached to `tx_id`, if any
    fn verified_message(&self, tx_id: &TxId) -> Result<Option<WarpMessage>, ChainError>;
}
