// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Transaction and chain identifiers

use crate::config::HASH_SIZE_BYTES;
use crate::error::ModelsError;
use crate::hash::{Hash, HashDeserializer, HashSerializer};
use morpheus_serialization::{Deserializer, SerializeError, Serializer};
use nom::error::{context, ContextError, ParseError};
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Transaction id: digest of the signed transaction bytes
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub struct TxId(Hash);

impl TxId {
    /// Computes the id of a transaction from its signed bytes
    pub fn compute_from(signed_bytes: &[u8]) -> Self {
        TxId(Hash::compute_from(signed_bytes))
    }

    /// tx id from its raw bytes
    pub const fn from_bytes(data: &[u8; HASH_SIZE_BYTES]) -> TxId {
        TxId(Hash::from_bytes(data))
    }

    /// tx id to bytes
    pub fn to_bytes(&self) -> &[u8; HASH_SIZE_BYTES] {
        self.0.to_bytes()
    }

    /// underlying hash
    pub fn hash(&self) -> Hash {
        self.0
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TxId {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TxId(Hash::from_str(s)?))
    }
}

/// Identifier of a chain, source of warp messages
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub struct ChainId(Hash);

impl ChainId {
    /// chain id from its raw bytes
    pub const fn from_bytes(data: &[u8; HASH_SIZE_BYTES]) -> ChainId {
        ChainId(Hash::from_bytes(data))
    }

    /// chain id to bytes
    pub fn to_bytes(&self) -> &[u8; HASH_SIZE_BYTES] {
        self.0.to_bytes()
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serializer for `TxId`
#[derive(Default, Clone, Copy)]
pub struct TxIdSerializer {
    hash_serializer: HashSerializer,
}

impl TxIdSerializer {
    /// Creates a new `TxIdSerializer`
    pub const fn new() -> Self {
        Self {
            hash_serializer: HashSerializer::new(),
        }
    }
}

impl Serializer<TxId> for TxIdSerializer {
    fn serialize(&self, value: &TxId, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.hash_serializer.serialize(&value.0, buffer)
    }
}

/// Deserializer for `TxId`
#[derive(Default, Clone, Copy)]
pub struct TxIdDeserializer {
    hash_deserializer: HashDeserializer,
}

impl TxIdDeserializer {
    /// Creates a new `TxIdDeserializer`
    pub const fn new() -> Self {
        Self {
            hash_deserializer: HashDeserializer::new(),
        }
    }
}

impl Deserializer<TxId> for TxIdDeserializer {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], TxId, E> {
        context("Failed TxId deserialization", |input| {
            self.hash_deserializer.deserialize::<E>(input)
        })
        .map(TxId)
        .parse(buffer)
    }
}

/// Serializer for `ChainId`
#[derive(Default, Clone, Copy)]
pub struct ChainIdSerializer {
    hash_serializer: HashSerializer,
}

impl ChainIdSerializer {
    /// Creates a new `ChainIdSerializer`
    pub const fn new() -> Self {
        Self {
            hash_serializer: HashSerializer::new(),
        }
    }
}

impl Serializer<ChainId> for ChainIdSerializer {
    fn serialize(&self, value: &ChainId, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.hash_serializer.serialize(&value.0, buffer)
    }
}

/// Deserializer for `ChainId`
#[derive(Default, Clone, Copy)]
pub struct ChainIdDeserializer {
    hash_deserializer: HashDeserializer,
}

impl ChainIdDeserializer {
    /// Creates a new `ChainIdDeserializer`
    pub const fn new() -> Self {
        Self {
            hash_deserializer: HashDeserializer::new(),
        }
    }
}

impl Deserializer<ChainId> for ChainIdDeserializer {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], ChainId, E> {
        context("Failed ChainId deserialization", |input| {
            self.hash_deserializer.deserialize::<E>(input)
        })
        .map(ChainId)
        .parse(buffer)
    }
}
