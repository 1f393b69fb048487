// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Cross-chain warp message envelopes.
//!
//! The signature of a `WarpMessage` is an opaque blob checked by the
//! surrounding framework, the execution core only sees whether it verified.

use crate::config::{HASH_SIZE_BYTES, MAX_WARP_MESSAGE_SIZE, MAX_WARP_SIGNATURE_SIZE};
use crate::hash::{Hash, HashDeserializer, HashSerializer};
use crate::ids::{ChainId, ChainIdDeserializer, ChainIdSerializer};
use crate::state_key::num_chunks;
use morpheus_serialization::{
    BytesDeserializer, BytesSerializer, Deserializer, SerializeError, Serializer,
    U32Deserializer, U32Serializer, U32_LEN,
};
use nom::error::{context, ContextError, ParseError};
use nom::sequence::tuple;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use std::ops::Bound::Included;

/// A warp message before signature
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedWarpMessage {
    /// network the message originates from
    pub network_id: u32,
    /// chain the message originates from
    pub source_chain_id: ChainId,
    /// opaque payload
    pub payload: Vec<u8>,
}

impl UnsignedWarpMessage {
    /// Size of the serialized message
    pub fn serialized_size(&self) -> usize {
        U32_LEN + HASH_SIZE_BYTES + U32_LEN + self.payload.len()
    }

    /// Message id: blake3 digest of the serialized message.
    /// Two messages with the same id are the same message.
    pub fn id(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.network_id.to_be_bytes());
        hasher.update(self.source_chain_id.to_bytes());
        // payloads longer than u32::MAX are refused by the serializer
        hasher.update(&(self.payload.len() as u32).to_be_bytes());
        hasher.update(&self.payload);
        Hash::from_bytes(hasher.finalize().as_bytes())
    }

    /// Number of storage chunks taken by the serialized message
    pub fn chunks(&self) -> usize {
        num_chunks(self.serialized_size())
    }
}

/// A warp message with its signature blob
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpMessage {
    /// signed content
    pub unsigned: UnsignedWarpMessage,
    /// aggregated signature, verified outside of execution
    pub signature: Vec<u8>,
}

impl WarpMessage {
    /// Id of the signed content
    pub fn id(&self) -> Hash {
        self.unsigned.id()
    }

    /// Size of the serialized signed message
    pub fn serialized_size(&self) -> usize {
        self.unsigned.serialized_size() + U32_LEN + self.signature.len()
    }
}

/// Record stored under the outgoing warp key of the emitting transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingWarpRecord {
    /// id of the emitted message
    pub message_id: Hash,
    /// chain the message was emitted from
    pub source_chain_id: ChainId,
    /// length of the emitted payload
    pub payload_len: u32,
}

/// Serializer for `UnsignedWarpMessage`
#[derive(Default, Clone, Copy)]
pub struct UnsignedWarpMessageSerializer {
    u32_serializer: U32Serializer,
    chain_id_serializer: ChainIdSerializer,
    bytes_serializer: BytesSerializer,
}

impl UnsignedWarpMessageSerializer {
    /// Creates a new `UnsignedWarpMessageSerializer`
    pub const fn new() -> Self {
        Self {
            u32_serializer: U32Serializer::new(),
            chain_id_serializer: ChainIdSerializer::new(),
            bytes_serializer: BytesSerializer::new(),
        }
    }
}

impl Serializer<UnsignedWarpMessage> for UnsignedWarpMessageSerializer {
    fn serialize(
        &self,
        value: &UnsignedWarpMessage,
        buffer: &mut Vec<u8>,
    ) -> Result<(), SerializeError> {
        self.u32_serializer.serialize(&value.network_id, buffer)?;
        self.chain_id_serializer
            .serialize(&value.source_chain_id, buffer)?;
        self.bytes_serializer.serialize(&value.payload, buffer)?;
        Ok(())
    }
}

/// Deserializer for `UnsignedWarpMessage`
#[derive(Clone, Copy)]
pub struct UnsignedWarpMessageDeserializer {
    u32_deserializer: U32Deserializer,
    chain_id_deserializer: ChainIdDeserializer,
    payload_deserializer: BytesDeserializer,
}

impl UnsignedWarpMessageDeserializer {
    /// Creates a new `UnsignedWarpMessageDeserializer`
    ///
    /// # Arguments
    /// * `max_payload_size`: longest accepted payload
    pub const fn new(max_payload_size: u32) -> Self {
        Self {
            u32_deserializer: U32Deserializer::new(Included(0), Included(u32::MAX)),
            chain_id_deserializer: ChainIdDeserializer::new(),
            payload_deserializer: BytesDeserializer::new(max_payload_size),
        }
    }
}

impl Default for UnsignedWarpMessageDeserializer {
    fn default() -> Self {
        Self::new(MAX_WARP_MESSAGE_SIZE as u32)
    }
}

impl Deserializer<UnsignedWarpMessage> for UnsignedWarpMessageDeserializer {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], UnsignedWarpMessage, E> {
        context(
            "Failed UnsignedWarpMessage deserialization",
            tuple((
                context("Failed network_id deserialization", |input| {
                    self.u32_deserializer.deserialize::<E>(input)
                }),
                context("Failed source_chain_id deserialization", |input| {
                    self.chain_id_deserializer.deserialize::<E>(input)
                }),
                context("Failed payload deserialization", |input| {
                    self.payload_deserializer.deserialize::<E>(input)
                }),
            )),
        )
        .map(
            |(network_id, source_chain_id, payload)| UnsignedWarpMessage {
                network_id,
                source_chain_id,
                payload,
            },
        )
        .parse(buffer)
    }
}

/// Serializer for `WarpMessage`
#[derive(Default, Clone, Copy)]
pub struct WarpMessageSerializer {
    unsigned_serializer: UnsignedWarpMessageSerializer,
    bytes_serializer: BytesSerializer,
}

impl WarpMessageSerializer {
    /// Creates a new `WarpMessageSerializer`
    pub const fn new() -> Self {
        Self {
            unsigned_serializer: UnsignedWarpMessageSerializer::new(),
            bytes_serializer: BytesSerializer::new(),
        }
    }
}

impl Serializer<WarpMessage> for WarpMessageSerializer {
    /// ```
    /// use morpheus_models::{ChainId, UnsignedWarpMessage, WarpMessage, WarpMessageSerializer};
    /// use morpheus_serialization::Serializer;
    ///
    /// let message = WarpMessage {
    ///     unsigned: UnsignedWarpMessage {
    ///         network_id: 1,
    ///         source_chain_id: ChainId::from_bytes(&[2; 32]),
    ///         payload: vec![3, 4],
    ///     },
    ///     signature: vec![5],
    /// };
    /// let mut buffer = Vec::new();
    /// WarpMessageSerializer::new().serialize(&message, &mut buffer).unwrap();
    /// assert_eq!(buffer.len(), message.serialized_size());
    /// ```
    fn serialize(&self, value: &WarpMessage, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.unsigned_serializer.serialize(&value.unsigned, buffer)?;
        self.bytes_serializer.serialize(&value.signature, buffer)?;
        Ok(())
    }
}

/// Deserializer for `WarpMessage`
#[derive(Clone, Copy)]
pub struct WarpMessageDeserializer {
    unsigned_deserializer: UnsignedWarpMessageDeserializer,
    signature_deserializer: BytesDeserializer,
}

impl WarpMessageDeserializer {
    /// Creates a new `WarpMessageDeserializer`
    ///
    /// # Arguments
    /// * `max_payload_size`: longest accepted payload
    pub const fn new(max_payload_size: u32) -> Self {
        Self {
            unsigned_deserializer: UnsignedWarpMessageDeserializer::new(max_payload_size),
            signature_deserializer: BytesDeserializer::new(MAX_WARP_SIGNATURE_SIZE),
        }
    }
}

impl Default for WarpMessageDeserializer {
    fn default() -> Self {
        Self::new(MAX_WARP_MESSAGE_SIZE as u32)
    }
}

impl Deserializer<WarpMessage> for WarpMessageDeserializer {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], WarpMessage, E> {
        context(
            "Failed WarpMessage deserialization",
            tuple((
                |input| self.unsigned_deserializer.deserialize::<E>(input),
                context("Failed signature deserialization", |input| {
                    self.signature_deserializer.deserialize::<E>(input)
                }),
            )),
        )
        .map(|(unsigned, signature)| WarpMessage {
            unsigned,
            signature,
        })
        .parse(buffer)
    }
}

/// Serializer for `OutgoingWarpRecord`
#[derive(Default, Clone, Copy)]
pub struct OutgoingWarpRecordSerializer {
    hash_serializer: HashSerializer,
    chain_id_serializer: ChainIdSerializer,
    u32_serializer: U32Serializer,
}

impl OutgoingWarpRecordSerializer {
    /// Creates a new `OutgoingWarpRecordSerializer`
    pub const fn new() -> Self {
        Self {
            hash_serializer: HashSerializer::new(),
            chain_id_serializer: ChainIdSerializer::new(),
            u32_serializer: U32Serializer::new(),
        }
    }
}

impl Serializer<OutgoingWarpRecord> for OutgoingWarpRecordSerializer {
    fn serialize(
        &self,
        value: &OutgoingWarpRecord,
        buffer: &mut Vec<u8>,
    ) -> Result<(), SerializeError> {
        self.hash_serializer.serialize(&value.message_id, buffer)?;
        self.chain_id_serializer
            .serialize(&value.source_chain_id, buffer)?;
        self.u32_serializer.serialize(&value.payload_len, buffer)?;
        Ok(())
    }
}

/// Deserializer for `OutgoingWarpRecord`
#[derive(Default, Clone, Copy)]
pub struct OutgoingWarpRecordDeserializer {
    hash_deserializer: HashDeserializer,
    chain_id_deserializer: ChainIdDeserializer,
    u32_deserializer: U32Deserializer,
}

impl OutgoingWarpRecordDeserializer {
    /// Creates a new `OutgoingWarpRecordDeserializer`
    pub const fn new() -> Self {
        Self {
            hash_deserializer: HashDeserializer::new(),
            chain_id_deserializer: ChainIdDeserializer::new(),
            u32_deserializer: U32Deserializer::new(
                Included(0),
                Included(MAX_WARP_MESSAGE_SIZE as u32),
            ),
        }
    }
}

impl Deserializer<OutgoingWarpRecord> for OutgoingWarpRecordDeserializer {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], OutgoingWarpRecord, E> {
        context(
            "Failed OutgoingWarpRecord deserialization",
            tuple((
                |input| self.hash_deserializer.deserialize::<E>(input),
                |input| self.chain_id_deserializer.deserialize::<E>(input),
                |input| self.u32_deserializer.deserialize::<E>(input),
            )),
        )
        .map(
            |(message_id, source_chain_id, payload_len)| OutgoingWarpRecord {
                message_id,
                source_chain_id,
                payload_len,
            },
        )
        .parse(buffer)
    }
}
