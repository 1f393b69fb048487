// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! blake3 digests, displayed as bs58 with checksum

use crate::config::HASH_SIZE_BYTES;
use crate::error::ModelsError;
use morpheus_serialization::{
    Deserializer, FixedBytesDeserializer, FixedBytesSerializer, SerializeError, Serializer,
};
use nom::error::{context, ContextError, ParseError};
use nom::{IResult, Parser};
use serde::Deserialize as _;
use std::str::FromStr;

/// A 32 bytes blake3 digest
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default)]
pub struct Hash([u8; HASH_SIZE_BYTES]);

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_bs58_check())
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_bs58_check())
    }
}

impl Hash {
    /// Compute a hash from data.
    ///
    /// # Example
    ///  ```
    /// # use morpheus_models::hash::Hash;
    /// let hash = Hash::compute_from(&"hello world".as_bytes());
    /// ```
    pub fn compute_from(data: &[u8]) -> Self {
        Hash(*blake3::hash(data).as_bytes())
    }

    /// Serialize a Hash using bs58 encoding with checksum.
    pub fn to_bs58_check(&self) -> String {
        bs58::encode(self.0).with_check().into_string()
    }

    /// Serialize a Hash as bytes.
    pub fn to_bytes(&self) -> &[u8; HASH_SIZE_BYTES] {
        &self.0
    }

    /// Convert into bytes.
    pub fn into_bytes(self) -> [u8; HASH_SIZE_BYTES] {
        self.0
    }

    /// Build a Hash from raw bytes.
    pub const fn from_bytes(data: &[u8; HASH_SIZE_BYTES]) -> Hash {
        Hash(*data)
    }

    /// Deserialize using bs58 encoding with checksum.
    ///
    /// # Example
    ///  ```
    /// # use morpheus_models::hash::Hash;
    /// let hash = Hash::compute_from(&"hello world".as_bytes());
    /// let serialized: String = hash.to_bs58_check();
    /// let deserialized: Hash = Hash::from_bs58_check(&serialized).unwrap();
    /// assert_eq!(hash, deserialized);
    /// ```
    pub fn from_bs58_check(data: &str) -> Result<Hash, ModelsError> {
        let decoded = bs58::decode(data)
            .with_check(None)
            .into_vec()
            .map_err(|err| ModelsError::ParsingError(format!("{}", err)))?;
        let got = decoded.len();
        let bytes: [u8; HASH_SIZE_BYTES] =
            decoded.try_into().map_err(|_| ModelsError::WrongLength {
                expected: HASH_SIZE_BYTES,
                got,
            })?;
        Ok(Hash(bytes))
    }
}

impl FromStr for Hash {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_bs58_check(s)
    }
}

impl ::serde::Serialize for Hash {
    /// Human readable formats get the bs58 check form, binary formats get raw bytes
    fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.collect_str(&self.to_bs58_check())
        } else {
            s.serialize_bytes(self.to_bytes())
        }
    }
}

impl<'de> ::serde::Deserialize<'de> for Hash {
    fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<Hash, D::Error> {
        if d.is_human_readable() {
            let s = String::deserialize(d)?;
            Hash::from_bs58_check(&s).map_err(::serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(d)?;
            let got = bytes.len();
            let bytes: [u8; HASH_SIZE_BYTES] = bytes.try_into().map_err(|_| {
                ::serde::de::Error::custom(ModelsError::WrongLength {
                    expected: HASH_SIZE_BYTES,
                    got,
                })
            })?;
            Ok(Hash(bytes))
        }
    }
}

/// Serializer for `Hash`
#[derive(Default, Clone, Copy)]
pub struct HashSerializer {
    bytes_serializer: FixedBytesSerializer<HASH_SIZE_BYTES>,
}

impl HashSerializer {
    /// Creates a serializer for `Hash`
    pub const fn new() -> Self {
        Self {
            bytes_serializer: FixedBytesSerializer::new(),
        }
    }
}

impl Serializer<Hash> for HashSerializer {
    fn serialize(&self, value: &Hash, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.bytes_serializer.serialize(value.to_bytes(), buffer)
    }
}

/// Deserializer for `Hash`
#[derive(Default, Clone, Copy)]
pub struct HashDeserializer {
    bytes_deserializer: FixedBytesDeserializer<HASH_SIZE_BYTES>,
}

impl HashDeserializer {
    /// Creates a deserializer for `Hash`
    pub const fn new() -> Self {
        Self {
            bytes_deserializer: FixedBytesDeserializer::new(),
        }
    }
}

impl Deserializer<Hash> for HashDeserializer {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], Hash, E> {
        context("Failed hash deserialization", |input| {
            self.bytes_deserializer.deserialize::<E>(input)
        })
        .map(Hash)
        .parse(buffer)
    }
}
