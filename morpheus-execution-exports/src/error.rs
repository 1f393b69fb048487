// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! this file defines all possible execution error categories

use displaydoc::Display;
use morpheus_models::TxId;
use morpheus_state_exports::StateError;
use thiserror::Error;

/// Errors aborting a block build. The partially built block is discarded.
#[non_exhaustive]
#[derive(Clone, Display, Error, Debug)]
pub enum ExecutionError {
    /// State error: {0}
    StateError(#[from] StateError),

    /// Transaction {tx_id} violated its declaration: {reason}
    DeclarationViolation {
        /// faulty transaction
        tx_id: TxId,
        /// what was violated
        reason: String,
    },

    /// Warp violation by transaction {tx_id}: {reason}
    WarpViolation {
        /// faulty transaction
        tx_id: TxId,
        /// what was violated
        reason: String,
    },

    /// Block carries {count} warp messages, at most {max} allowed
    TooManyWarpMessages {
        /// emitted messages in the block
        count: usize,
        /// allowed maximum
        max: usize,
    },

    /// Block timestamp {timestamp} is too far in the future (now: {now})
    FutureTimestamp {
        /// block timestamp, milliseconds
        timestamp: i64,
        /// local clock, milliseconds
        now: i64,
    },

    /// Block build was cancelled
    Cancelled,

    /// Block build deadline exceeded
    DeadlineExceeded,

    /// Worker pool error: {0}
    PoolError(String),

    /// Serialization error: {0}
    SerializeError(String),

    /// Chain error: {0}
    ChainError(#[from] ChainError),
}

/// Reasons to refuse a transaction before scheduling it
#[non_exhaustive]
#[derive(Clone, Display, Error, Debug, PartialEq, Eq)]
pub enum AdmissionError {
    /// {keys} state keys declared with {chunks} chunk bounds
    KeyChunkMismatch {
        /// number of declared keys
        keys: usize,
        /// number of declared bounds
        chunks: usize,
    },

    /// State key {index} declares {chunks} chunks, expected between 1 and {max}
    InvalidChunkBound {
        /// position of the key
        index: usize,
        /// declared bound
        chunks: u16,
        /// allowed maximum
        max: u16,
    },

    /// Timestamp {timestamp} outside of the validity window [{start}, {end}]
    OutsideValidRange {
        /// block timestamp
        timestamp: i64,
        /// window start
        start: i64,
        /// window end
        end: i64,
    },

    /// Attached warp message of {size} bytes, at most {max} allowed
    WarpMessageTooLarge {
        /// payload size
        size: usize,
        /// allowed maximum
        max: usize,
    },

    /// Action emits warp messages but outgoing warp storage is disabled
    WarpOutputDisabled,
}

/// Errors of the chain collaborators
#[non_exhaustive]
#[derive(Clone, Display, Error, Debug, PartialEq, Eq)]
pub enum ChainError {
    /// Chain read error: {0}
    ReadError(String),

    /// Missing block: {0}
    MissingBlock(String),
}
