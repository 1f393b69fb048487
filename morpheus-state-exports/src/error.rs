// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use morpheus_models::StateKey;
use thiserror::Error;

/// Errors raised while reading or writing state
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// State store error: {0}
    StoreError(String),
    /// Key {0} was not declared by the running action
    UndeclaredKey(StateKey),
    /// Value of {size} bytes for key {key} exceeds the declared bound of {max_chunks} chunks
    ChunkOverflow {
        /// written key
        key: StateKey,
        /// size of the written value
        size: usize,
        /// declared bound
        max_chunks: u16,
    },
    /// Corrupted value under key {key}: {reason}
    CorruptedValue {
        /// read key
        key: StateKey,
        /// what is wrong with the value
        reason: String,
    },
}
