// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Result alias of the models crate
pub type ModelsResult<T, E = ModelsError> = core::result::Result<T, E>;

/// Errors raised while building or parsing models
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelsError {
    /// Serialization error: {0}
    SerializeError(String),
    /// Deserialization error: {0}
    DeserializeError(String),
    /// bs58 parsing error: {0}
    ParsingError(String),
    /// Wrong length: expected {expected} bytes, got {got}
    WrongLength {
        /// expected length
        expected: usize,
        /// actual length
        got: usize,
    },
}

impl From<morpheus_serialization::SerializeError> for ModelsError {
    fn from(err: morpheus_serialization::SerializeError) -> Self {
        ModelsError::SerializeError(err.to_string())
    }
}
