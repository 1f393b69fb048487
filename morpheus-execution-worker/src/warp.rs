// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Warp message attachment.
//!
//! Outgoing: an action emitting a warp message must have declared it, the
//! payload is bounded, a record of the message is stored under the outgoing
//! warp key of the transaction and a block carries a bounded number of
//! emitting transactions.
//! Incoming: the attached message is bounded at admission, and verified
//! messages fetched from the framework may be cached when incoming storage
//! is enabled.

use morpheus_execution_exports::{
    AdmissionError, ChainError, ExecutionConfig, ExecutionError, WarpMessageSource,
};
use morpheus_models::{
    num_chunks, OutgoingWarpRecord, OutgoingWarpRecordSerializer, StateKey, TxId,
    UnsignedWarpMessage, WarpMessage,
};
use morpheus_serialization::Serializer;
use parking_lot::Mutex;
use schnellru::{ByLength, LruMap};
use tracing::debug;

/// Refuses an attached warp message whose payload exceeds `max_size`
pub(crate) fn check_incoming_size(
    message: &WarpMessage,
    max_size: usize,
) -> Result<(), AdmissionError> {
    let size = message.unsigned.payload.len();
    if size > max_size {
        return Err(AdmissionError::WarpMessageTooLarge {
            size,
            max: max_size,
        });
    }
    Ok(())
}

/// Enforces the warp bounds of the configuration
pub struct WarpManager {
    max_warp_messages: usize,
    max_warp_message_size: usize,
    max_outgoing_warp_chunks: u16,
    max_incoming_warp_chunks: u16,
    /// verified incoming messages, only when incoming storage is enabled
    incoming_cache: Option<Mutex<LruMap<TxId, WarpMessage>>>,
    record_serializer: OutgoingWarpRecordSerializer,
}

impl WarpManager {
    /// Creates a new `WarpManager`
    pub fn new(config: &ExecutionConfig) -> Self {
        let incoming_cache = (config.max_incoming_warp_chunks > 0
            && config.incoming_warp_cache_size > 0)
            .then(|| Mutex::new(LruMap::new(ByLength::new(config.incoming_warp_cache_size))));
        WarpManager {
            max_warp_messages: config.max_warp_messages,
            max_warp_message_size: config.max_warp_message_size,
            max_outgoing_warp_chunks: config.max_outgoing_warp_chunks,
            max_incoming_warp_chunks: config.max_incoming_warp_chunks,
            incoming_cache,
            record_serializer: OutgoingWarpRecordSerializer::new(),
        }
    }

    /// Checks the warp output of an executed action
    ///
    /// # Arguments
    /// * `tx_id`: emitting transaction
    /// * `outputs_warp`: what the action declared
    /// * `message`: what the action emitted
    pub fn check_emitted(
        &self,
        tx_id: &TxId,
        outputs_warp: bool,
        message: Option<&UnsignedWarpMessage>,
    ) -> Result<(), ExecutionError> {
        let Some(message) = message else {
            return Ok(());
        };
        if !outputs_warp {
            return Err(ExecutionError::WarpViolation {
                tx_id: *tx_id,
                reason: "emitted a warp message without declaring it".into(),
            });
        }
        if message.payload.len() > self.max_warp_message_size {
            return Err(ExecutionError::WarpViolation {
                tx_id: *tx_id,
                reason: format!(
                    "warp payload of {} bytes, at most {} allowed",
                    message.payload.len(),
                    self.max_warp_message_size
                ),
            });
        }
        Ok(())
    }

    /// Checks the number of messages emitted by a block, one per emitting transaction
    pub fn check_block(
        &self,
        messages: &[(TxId, UnsignedWarpMessage)],
    ) -> Result<(), ExecutionError> {
        if messages.len() > self.max_warp_messages {
            return Err(ExecutionError::TooManyWarpMessages {
                count: messages.len(),
                max: self.max_warp_messages,
            });
        }
        Ok(())
    }

    /// Key and value of the record left by `tx_id` for the emitted `message`
    pub fn outgoing_record(
        &self,
        tx_id: &TxId,
        message: &UnsignedWarpMessage,
    ) -> Result<(StateKey, Vec<u8>), ExecutionError> {
        if self.max_outgoing_warp_chunks == 0 {
            return Err(ExecutionError::WarpViolation {
                tx_id: *tx_id,
                reason: "outgoing warp storage is disabled".into(),
            });
        }
        let payload_len =
            u32::try_from(message.payload.len()).map_err(|_| ExecutionError::WarpViolation {
                tx_id: *tx_id,
                reason: "warp payload length does not fit a u32".into(),
            })?;
        let record = OutgoingWarpRecord {
            message_id: message.id(),
            source_chain_id: message.source_chain_id,
            payload_len,
        };
        let mut value = Vec::new();
        self.record_serializer
            .serialize(&record, &mut value)
            .map_err(|err| ExecutionError::SerializeError(err.to_string()))?;
        let chunks = num_chunks(value.len());
        if chunks > self.max_outgoing_warp_chunks as usize {
            return Err(ExecutionError::WarpViolation {
                tx_id: *tx_id,
                reason: format!(
                    "outgoing record takes {} chunks, at most {} allowed",
                    chunks, self.max_outgoing_warp_chunks
                ),
            });
        }
        Ok((StateKey::outgoing_warp(tx_id), value))
    }

    /// Checks a message attached to an incoming transaction
    pub fn check_incoming(&self, message: &WarpMessage) -> Result<(), AdmissionError> {
        check_incoming_size(message, self.max_warp_message_size)
    }

    /// Verified warp message attached to `tx_id`.
    /// Served from the cache when incoming storage is enabled and the message fits it.
    pub fn incoming_message(
        &self,
        source: &dyn WarpMessageSource,
        tx_id: &TxId,
    ) -> Result<Option<WarpMessage>, ChainError> {
        let Some(cache) = &self.incoming_cache else {
            return source.verified_message(tx_id);
        };
        if let Some(message) = cache.lock().get(tx_id) {
            return Ok(Some(message.clone()));
        }
        let message = source.verified_message(tx_id)?;
        if let Some(message) = &message {
            if message.unsigned.chunks() <= self.max_incoming_warp_chunks as usize {
                cache.lock().insert(*tx_id, message.clone());
            } else {
                debug!(
                    "incoming warp message of tx {} takes {} chunks, not cached",
                    tx_id,
                    message.unsigned.chunks()
                );
            }
        }
        Ok(message)
    }
}

impl std::fmt::Debug for WarpManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarpManager")
            .field("max_warp_messages", &self.max_warp_messages)
            .field("max_warp_message_size", &self.max_warp_message_size)
            .field("max_outgoing_warp_chunks", &self.max_outgoing_warp_chunks)
            .field("max_incoming_warp_chunks", &self.max_incoming_warp_chunks)
            .field("incoming_cache", &self.incoming_cache.is_some())
            .finish()
    }
}
