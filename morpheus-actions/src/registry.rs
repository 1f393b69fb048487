// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Type id table and action codec.
//!
//! An encoded action is its type id byte followed by the fields of the action.
//! The registry maps every accepted type id to the function decoding its fields.

use crate::error::ActionError;
use crate::kind::{ActionKind, ActionTypeId};
use crate::transfer::TransferDeserializer;
use morpheus_execution_exports::Action;
use morpheus_models::WarpMessage;
use morpheus_serialization::{
    DeserializeError, Deserializer, SerializeError, Serializer, U8Serializer,
};
use nom::error::{context, ContextError, ErrorKind, ParseError};
use nom::{IResult, Parser};
use std::collections::BTreeMap;

/// Decodes the fields of an action, given the warp message attached to its transaction
pub type ActionDecoder = for<'a> fn(
    &'a [u8],
    Option<&WarpMessage>,
) -> IResult<&'a [u8], ActionKind, DeserializeError<'a>>;

/// What the registry knows about an action type
#[derive(Clone, Copy)]
pub struct ActionDescriptor {
    /// human readable name
    pub name: &'static str,
    /// field decoder
    pub decoder: ActionDecoder,
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

fn decode_transfer<'a>(
    buffer: &'a [u8],
    _warp_message: Option<&WarpMessage>,
) -> IResult<&'a [u8], ActionKind, DeserializeError<'a>> {
    TransferDeserializer::new()
        .deserialize::<DeserializeError>(buffer)
        .map(|(rest, transfer)| (rest, ActionKind::Transfer(transfer)))
}

/// Table of the accepted action types
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    descriptors: BTreeMap<u8, ActionDescriptor>,
}

impl ActionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in action
    pub fn with_builtin() -> Self {
        let mut descriptors = BTreeMap::new();
        descriptors.insert(
            ActionTypeId::Transfer.into(),
            ActionDescriptor {
                name: "transfer",
                decoder: decode_transfer,
            },
        );
        ActionRegistry { descriptors }
    }

    /// Registers a new action type
    pub fn register(
        &mut self,
        type_id: u8,
        descriptor: ActionDescriptor,
    ) -> Result<(), ActionError> {
        if self.descriptors.contains_key(&type_id) {
            return Err(ActionError::DuplicateTypeId(type_id));
        }
        self.descriptors.insert(type_id, descriptor);
        Ok(())
    }

    /// Descriptor of `type_id`, if registered
    pub fn get(&self, type_id: u8) -> Option<&ActionDescriptor> {
        self.descriptors.get(&type_id)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no type is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Serializer for any action: type id then fields
#[derive(Default, Clone, Copy)]
pub struct ActionSerializer {
    u8_serializer: U8Serializer,
}

impl ActionSerializer {
    /// Creates a new `ActionSerializer`
    pub const fn new() -> Self {
        Self {
            u8_serializer: U8Serializer::new(),
        }
    }
}

impl<A: Action> Serializer<A> for ActionSerializer {
    fn serialize(&self, value: &A, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.u8_serializer.serialize(&value.type_id(), buffer)?;
        value.serialize(buffer)
    }
}

/// Decodes actions through a registry
#[derive(Debug, Clone)]
pub struct ActionDeserializer {
    registry: ActionRegistry,
}

impl ActionDeserializer {
    /// Creates a new `ActionDeserializer` accepting the types of `registry`
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    /// Reads an action at the beginning of `buffer` and returns the remaining bytes
    pub fn deserialize<'a>(
        &self,
        buffer: &'a [u8],
        warp_message: Option<&WarpMessage>,
    ) -> IResult<&'a [u8], ActionKind, DeserializeError<'a>> {
        context("Failed action deserialization", |input: &'a [u8]| {
            let Some((&type_id, rest)) = input.split_first() else {
                return Err(nom::Err::Error(DeserializeError::from_error_kind(
                    input,
                    ErrorKind::Eof,
                )));
            };
            let Some(descriptor) = self.registry.get(type_id) else {
                return Err(nom::Err::Error(DeserializeError::add_context(
                    input,
                    "Unknown action type id",
                    DeserializeError::from_error_kind(input, ErrorKind::Tag),
                )));
            };
            (descriptor.decoder)(rest, warp_message)
        })
        .parse(buffer)
    }

    /// Decodes a whole buffer into an action
    ///
    /// ```
    /// use morpheus_actions::{ActionDeserializer, ActionError, ActionRegistry};
    ///
    /// let deserializer = ActionDeserializer::new(ActionRegistry::with_builtin());
    /// assert_eq!(deserializer.decode_action(&[42], None), Err(ActionError::UnknownTypeId(42)));
    /// assert_eq!(deserializer.decode_action(&[0, 1, 2], None), Err(ActionError::Truncated));
    /// ```
    pub fn decode_action(
        &self,
        buffer: &[u8],
        warp_message: Option<&WarpMessage>,
    ) -> Result<ActionKind, ActionError> {
        let Some(&type_id) = buffer.first() else {
            return Err(ActionError::Truncated);
        };
        if self.registry.get(type_id).is_none() {
            return Err(ActionError::UnknownTypeId(type_id));
        }
        match self.deserialize(buffer, warp_message) {
            Ok((rest, _)) if !rest.is_empty() => Err(ActionError::TrailingBytes(rest.len())),
            Ok((_, action)) => Ok(action),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                if err.kind() == Some(ErrorKind::Eof) {
                    Err(ActionError::Truncated)
                } else {
                    Err(ActionError::Malformed(err.to_string()))
                }
            }
            Err(nom::Err::Incomplete(_)) => Err(ActionError::Truncated),
        }
    }
}
