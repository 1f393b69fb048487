// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module provides the structures used to provide configuration parameters to the execution system

use morpheus_models::config::{
    FUTURE_BOUND_MILLIS, MAX_INCOMING_WARP_CHUNKS, MAX_KEY_CHUNKS, MAX_OUTGOING_WARP_CHUNKS,
    MAX_WARP_MESSAGES, MAX_WARP_MESSAGE_SIZE,
};
use serde::Deserialize;

/// Execution module configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// number of workers executing a wave, 0 for one per available core
    pub worker_count: usize,
    /// maximum number of warp-emitting transactions in a block
    pub max_warp_messages: usize,
    /// maximum size of a warp message payload, in bytes
    pub max_warp_message_size: usize,
    /// maximum number of chunks of an outgoing warp record, 0 disables warp output
    pub max_outgoing_warp_chunks: u16,
    /// maximum number of chunks of a cached incoming warp message, 0 disables the cache
    pub max_incoming_warp_chunks: u16,
    /// number of incoming warp messages kept in cache
    pub incoming_warp_cache_size: u32,
    /// upper bound of the chunk count declared on a state key
    pub max_key_chunks: u16,
    /// how far ahead of the local clock a block timestamp may be, in milliseconds
    pub future_bound: i64,
    /// time allowed to build a block, in milliseconds
    pub block_deadline: Option<u64>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            worker_count: 0,
            max_warp_messages: MAX_WARP_MESSAGES,
            max_warp_message_size: MAX_WARP_MESSAGE_SIZE,
            max_outgoing_warp_chunks: MAX_OUTGOING_WARP_CHUNKS,
            max_incoming_warp_chunks: MAX_INCOMING_WARP_CHUNKS,
            incoming_warp_cache_size: 1024,
            max_key_chunks: MAX_KEY_CHUNKS,
            future_bound: FUTURE_BOUND_MILLIS,
            block_deadline: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn missing_fields_take_protocol_defaults() {
        let config: ExecutionConfig =
            serde_json::from_str(r#"{"worker_count": 4, "block_deadline": 250}"#).unwrap();
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.block_deadline, Some(250));
        assert_eq!(config.max_warp_messages, 64);
        assert_eq!(config.max_warp_message_size, 262_144);
        assert_eq!(config.max_outgoing_warp_chunks, 4);
        assert_eq!(config.max_incoming_warp_chunks, 0);
        assert_eq!(config.future_bound, 1_000);
    }
}
