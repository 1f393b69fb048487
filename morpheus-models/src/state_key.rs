// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! State keys and chunk accounting

use crate::config::CHUNK_SIZE;
use crate::ids::TxId;
use serde::{Deserialize, Serialize};

/// Leading byte of balance keys
pub const BALANCE_PREFIX: u8 = 0x0;
/// Leading byte of the outgoing warp record keys
pub const OUTGOING_WARP_PREFIX: u8 = 0x1;

/// Number of `CHUNK_SIZE` chunks needed to store `len` bytes.
///
/// ```
/// use morpheus_models::num_chunks;
///
/// assert_eq!(num_chunks(0), 0);
/// assert_eq!(num_chunks(64), 1);
/// assert_eq!(num_chunks(65), 2);
/// ```
pub fn num_chunks(len: usize) -> usize {
    len.div_ceil(CHUNK_SIZE)
}

/// An opaque key in the state store.
///
/// Keys are compared bytewise, two actions conflict when they declare an
/// equal key.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct StateKey(Vec<u8>);

impl StateKey {
    /// Wraps raw key bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        StateKey(bytes)
    }

    /// Builds a key from a one byte prefix and a body
    pub fn with_prefix(prefix: u8, body: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(prefix);
        bytes.extend_from_slice(body);
        StateKey(bytes)
    }

    /// Key of the record left by a transaction that emitted a warp message
    pub fn outgoing_warp(tx_id: &TxId) -> Self {
        StateKey::with_prefix(OUTGOING_WARP_PREFIX, tx_id.to_bytes())
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for StateKey {
    fn from(bytes: Vec<u8>) -> Self {
        StateKey(bytes)
    }
}

impl AsRef<[u8]> for StateKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl std::fmt::Debug for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "StateKey({})", self)
    }
}
