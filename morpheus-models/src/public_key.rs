// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Raw ed25519 public keys.
//! Signatures are verified outside of the execution core: a key is only an
//! identity here.

use crate::config::PUBLIC_KEY_SIZE_BYTES;
use crate::error::ModelsError;
use morpheus_serialization::{
    Deserializer, FixedBytesDeserializer, FixedBytesSerializer, SerializeError, Serializer,
};
use nom::error::{context, ContextError, ErrorKind, ParseError};
use nom::IResult;
use serde::Deserialize as _;
use std::str::FromStr;

/// An ed25519 public key
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE_BYTES]);

impl PublicKey {
    /// The all-zero key. No private key maps to it, so anything sent there is burnt.
    pub const EMPTY: PublicKey = PublicKey([0u8; PUBLIC_KEY_SIZE_BYTES]);

    /// Wraps raw key bytes
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE_BYTES]) -> Self {
        PublicKey(bytes)
    }

    /// Raw key bytes
    pub fn to_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE_BYTES] {
        &self.0
    }

    /// Whether this is the unspendable all-zero key
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// bs58 with checksum
    pub fn to_bs58_check(&self) -> String {
        bs58::encode(self.0).with_check().into_string()
    }

    /// Parses a bs58 with checksum key
    pub fn from_bs58_check(data: &str) -> Result<Self, ModelsError> {
        let decoded = bs58::decode(data)
            .with_check(None)
            .into_vec()
            .map_err(|err| ModelsError::ParsingError(format!("{}", err)))?;
        let got = decoded.len();
        let bytes: [u8; PUBLIC_KEY_SIZE_BYTES] =
            decoded.try_into().map_err(|_| ModelsError::WrongLength {
                expected: PUBLIC_KEY_SIZE_BYTES,
                got,
            })?;
        Ok(PublicKey(bytes))
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_bs58_check())
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_bs58_check())
    }
}

impl FromStr for PublicKey {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PublicKey::from_bs58_check(s)
    }
}

impl ::serde::Serialize for PublicKey {
    fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.collect_str(&self.to_bs58_check())
        } else {
            s.serialize_bytes(self.to_bytes())
        }
    }
}

impl<'de> ::serde::Deserialize<'de> for PublicKey {
    fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<PublicKey, D::Error> {
        if d.is_human_readable() {
            let s = String::deserialize(d)?;
            PublicKey::from_bs58_check(&s).map_err(::serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(d)?;
            let got = bytes.len();
            let bytes: [u8; PUBLIC_KEY_SIZE_BYTES] = bytes.try_into().map_err(|_| {
                ::serde::de::Error::custom(ModelsError::WrongLength {
                    expected: PUBLIC_KEY_SIZE_BYTES,
                    got,
                })
            })?;
            Ok(PublicKey(bytes))
        }
    }
}

/// Serializer for `PublicKey`
#[derive(Default, Clone, Copy)]
pub struct PublicKeySerializer {
    bytes_serializer: FixedBytesSerializer<PUBLIC_KEY_SIZE_BYTES>,
}

impl PublicKeySerializer {
    /// Creates a new `PublicKeySerializer`
    pub const fn new() -> Self {
        Self {
            bytes_serializer: FixedBytesSerializer::new(),
        }
    }
}

impl Serializer<PublicKey> for PublicKeySerializer {
    fn serialize(&self, value: &PublicKey, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.bytes_serializer.serialize(value.to_bytes(), buffer)
    }
}

/// Deserializer for `PublicKey`
#[derive(Clone, Copy)]
pub struct PublicKeyDeserializer {
    bytes_deserializer: FixedBytesDeserializer<PUBLIC_KEY_SIZE_BYTES>,
    allow_empty: bool,
}

impl PublicKeyDeserializer {
    /// Creates a new `PublicKeyDeserializer`
    ///
    /// # Arguments
    /// * `allow_empty`: whether the all-zero key is accepted
    pub const fn new(allow_empty: bool) -> Self {
        Self {
            bytes_deserializer: FixedBytesDeserializer::new(),
            allow_empty,
        }
    }
}

impl Deserializer<PublicKey> for PublicKeyDeserializer {
    /// ```
    /// use morpheus_models::{PublicKey, PublicKeyDeserializer, PublicKeySerializer};
    /// use morpheus_serialization::{DeserializeError, Deserializer, Serializer};
    ///
    /// let mut buffer = Vec::new();
    /// PublicKeySerializer::new().serialize(&PublicKey::EMPTY, &mut buffer).unwrap();
    /// assert!(PublicKeyDeserializer::new(false).deserialize::<DeserializeError>(&buffer).is_err());
    /// let (_, key) = PublicKeyDeserializer::new(true).deserialize::<DeserializeError>(&buffer).unwrap();
    /// assert!(key.is_empty());
    /// ```
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], PublicKey, E> {
        context("Failed public key deserialization", |input: &'a [u8]| {
            let (rest, bytes) = self.bytes_deserializer.deserialize::<E>(input)?;
            let key = PublicKey(bytes);
            if !self.allow_empty && key.is_empty() {
                return Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Verify)));
            }
            Ok((rest, key))
        })(buffer)
    }
}
