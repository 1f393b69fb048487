// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Raw byte arrays and length-prefixed byte strings

use crate::fixed::{U32Deserializer, U32Serializer};
use crate::{Deserializer, SerializeError, Serializer};
use nom::bytes::complete::take;
use nom::error::{context, ContextError, ParseError};
use nom::IResult;
use std::ops::Bound::Included;

/// Serializer for `[u8; N]`, written as is
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedBytesSerializer<const N: usize>;

impl<const N: usize> FixedBytesSerializer<N> {
    /// Creates a new `FixedBytesSerializer`
    pub const fn new() -> Self {
        Self
    }
}

impl<const N: usize> Serializer<[u8; N]> for FixedBytesSerializer<N> {
    fn serialize(&self, value: &[u8; N], buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        buffer.extend_from_slice(value);
        Ok(())
    }
}

/// Deserializer for `[u8; N]`
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedBytesDeserializer<const N: usize>;

impl<const N: usize> FixedBytesDeserializer<N> {
    /// Creates a new `FixedBytesDeserializer`
    pub const fn new() -> Self {
        Self
    }
}

impl<const N: usize> Deserializer<[u8; N]> for FixedBytesDeserializer<N> {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], [u8; N], E> {
        context("Failed fixed bytes deserialization", |input: &'a [u8]| {
            let (rest, raw) = take::<usize, &'a [u8], E>(N)(input)?;
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(raw);
            Ok((rest, bytes))
        })(buffer)
    }
}

/// Serializer for byte strings: a `u32` big endian length followed by the bytes
#[derive(Clone, Copy, Debug, Default)]
pub struct BytesSerializer {
    len_serializer: U32Serializer,
}

impl BytesSerializer {
    /// Creates a new `BytesSerializer`
    pub const fn new() -> Self {
        Self {
            len_serializer: U32Serializer::new(),
        }
    }
}

impl Serializer<Vec<u8>> for BytesSerializer {
    /// ```
    /// use morpheus_serialization::{BytesSerializer, Serializer};
    ///
    /// let mut buffer = Vec::new();
    /// BytesSerializer::new().serialize(&vec![7, 8], &mut buffer).unwrap();
    /// assert_eq!(buffer, vec![0, 0, 0, 2, 7, 8]);
    /// ```
    fn serialize(&self, value: &Vec<u8>, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        let len: u32 = value.len().try_into().map_err(|err| {
            SerializeError::BytesTooLong(format!("{} bytes: {}", value.len(), err))
        })?;
        self.len_serializer.serialize(&len, buffer)?;
        buffer.extend_from_slice(value);
        Ok(())
    }
}

/// Deserializer for length-prefixed byte strings with a maximum length
#[derive(Clone, Copy, Debug)]
pub struct BytesDeserializer {
    len_deserializer: U32Deserializer,
}

impl BytesDeserializer {
    /// Creates a new `BytesDeserializer` accepting at most `max_length` bytes
    pub const fn new(max_length: u32) -> Self {
        Self {
            len_deserializer: U32Deserializer::new(Included(0), Included(max_length)),
        }
    }
}

impl Deserializer<Vec<u8>> for BytesDeserializer {
    /// ```
    /// use morpheus_serialization::{BytesDeserializer, BytesSerializer, DeserializeError, Deserializer, Serializer};
    ///
    /// let mut buffer = Vec::new();
    /// BytesSerializer::new().serialize(&vec![1, 2, 3], &mut buffer).unwrap();
    /// let (rest, bytes) = BytesDeserializer::new(16)
    ///     .deserialize::<DeserializeError>(&buffer)
    ///     .unwrap();
    /// assert!(rest.is_empty());
    /// assert_eq!(bytes, vec![1, 2, 3]);
    /// ```
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], Vec<u8>, E> {
        context("Failed bytes deserialization", |input: &'a [u8]| {
            let (rest, len) = self.len_deserializer.deserialize::<E>(input)?;
            let (rest, data) = take::<usize, &'a [u8], E>(len as usize)(rest)?;
            Ok((rest, data.to_vec()))
        })(buffer)
    }
}
