// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Deterministic binary encoding primitives.
//!
//! Every value is written with a fixed layout: integers are fixed-width big
//! endian, byte arrays are written raw and byte strings carry a `u32` length
//! prefix. Decoding never panics on attacker-controlled input: truncated
//! buffers and out-of-bounds values are reported through nom errors.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod bytes;
mod fixed;

pub use bytes::{
    BytesDeserializer, BytesSerializer, FixedBytesDeserializer, FixedBytesSerializer,
};
pub use fixed::{
    I64Deserializer, I64Serializer, U16Deserializer, U16Serializer, U32Deserializer,
    U32Serializer, U64Deserializer, U64Serializer, U8Deserializer, U8Serializer,
};

use displaydoc::Display;
use nom::error::{ContextError, ErrorKind, ParseError};
use nom::IResult;
use std::fmt;
use thiserror::Error;

/// Size in bytes of an encoded `u8`
pub const U8_LEN: usize = 1;
/// Size in bytes of an encoded `u16`
pub const U16_LEN: usize = 2;
/// Size in bytes of an encoded `u32`
pub const U32_LEN: usize = 4;
/// Size in bytes of an encoded `u64` or `i64`
pub const U64_LEN: usize = 8;

#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// Number {0} is too big to be serialized
    NumberTooBig(String),
    /// Byte string too long: {0}
    BytesTooLong(String),
    /// General error {0}
    GeneralError(String),
}

/// Trait implemented by every serializer of the workspace.
/// A serializer appends the encoding of `value` to `buffer`.
pub trait Serializer<T> {
    /// Appends the encoding of `value` at the end of `buffer`
    fn serialize(&self, value: &T, buffer: &mut Vec<u8>) -> Result<(), SerializeError>;
}

/// Trait implemented by every deserializer of the workspace.
pub trait Deserializer<T> {
    /// Reads a `T` at the beginning of `buffer` and returns the remaining bytes.
    ///
    /// The error type is generic so that callers can pick between the cheap
    /// `nom::error::Error` and the descriptive [`DeserializeError`].
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], T, E>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ErrorEntry {
    Kind(ErrorKind),
    Context(&'static str),
}

/// Descriptive nom error: keeps the failing error kinds and every context
/// label that was crossed while unwinding, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserializeError<'a> {
    entries: Vec<(&'a [u8], ErrorEntry)>,
}

impl<'a> DeserializeError<'a> {
    /// Context labels crossed by the error, innermost first
    pub fn contexts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().filter_map(|(_, entry)| match entry {
            ErrorEntry::Context(ctx) => Some(*ctx),
            ErrorEntry::Kind(_) => None,
        })
    }

    /// Kind of the innermost error
    pub fn kind(&self) -> Option<ErrorKind> {
        self.entries.iter().find_map(|(_, entry)| match entry {
            ErrorEntry::Kind(kind) => Some(*kind),
            ErrorEntry::Context(_) => None,
        })
    }

    /// Number of input bytes left when the innermost error was raised
    pub fn remaining_len(&self) -> usize {
        self.entries.first().map(|(input, _)| input.len()).unwrap_or(0)
    }
}

impl<'a> ParseError<&'a [u8]> for DeserializeError<'a> {
    fn from_error_kind(input: &'a [u8], kind: ErrorKind) -> Self {
        DeserializeError {
            entries: vec![(input, ErrorEntry::Kind(kind))],
        }
    }

    fn append(input: &'a [u8], kind: ErrorKind, mut other: Self) -> Self {
        other.entries.push((input, ErrorEntry::Kind(kind)));
        other
    }
}

impl<'a> ContextError<&'a [u8]> for DeserializeError<'a> {
    fn add_context(input: &'a [u8], ctx: &'static str, mut other: Self) -> Self {
        other.entries.push((input, ErrorEntry::Context(ctx)));
        other
    }
}

impl<'a> fmt::Display for DeserializeError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (input, entry) in self.entries.iter().rev() {
            if !first {
                write!(f, " / ")?;
            }
            first = false;
            match entry {
                ErrorEntry::Context(ctx) => write!(f, "{}", ctx)?,
                ErrorEntry::Kind(kind) => write!(
                    f,
                    "{} with {} bytes left",
                    kind.description(),
                    input.len()
                )?,
            }
        }
        Ok(())
    }
}
