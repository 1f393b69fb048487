// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Value transfer between two accounts

use crate::balance::{add_balance, balance_key, sub_balance, BALANCE_CHUNKS};
use crate::error::ActionError;
use crate::kind::ActionTypeId;
use morpheus_execution_exports::{Action, ActionContext, ActionOutput, Rules};
use morpheus_models::config::ALWAYS_VALID;
use morpheus_models::{PublicKey, PublicKeyDeserializer, PublicKeySerializer, StateKey, TxId};
use morpheus_serialization::{
    Deserializer, SerializeError, Serializer, U64Deserializer, U64Serializer,
};
use morpheus_state_exports::{ActionState, StateError};
use nom::error::{context, ContextError, ParseError};
use nom::sequence::tuple;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

/// Compute units consumed by a transfer, whatever its outcome
pub const TRANSFER_COMPUTE_UNITS: u64 = 1;

/// Diagnostic of a transfer of nothing
pub const OUTPUT_VALUE_ZERO: &str = "value is zero";

/// Moves `value` from the actor to `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// recipient, may be the unspendable empty key
    pub to: PublicKey,
    /// amount moved
    pub value: u64,
}

impl Action for Transfer {
    fn type_id(&self) -> u8 {
        ActionTypeId::Transfer.into()
    }

    fn state_keys(&self, actor: &PublicKey, _tx_id: &TxId) -> Vec<StateKey> {
        vec![balance_key(actor), balance_key(&self.to)]
    }

    fn state_keys_max_chunks(&self) -> Vec<u16> {
        vec![BALANCE_CHUNKS, BALANCE_CHUNKS]
    }

    fn outputs_warp_message(&self) -> bool {
        false
    }

    fn max_compute_units(&self, _rules: &dyn Rules) -> u64 {
        TRANSFER_COMPUTE_UNITS
    }

    fn valid_range(&self, _rules: &dyn Rules) -> (i64, i64) {
        ALWAYS_VALID
    }

    fn execute(
        &self,
        ctx: &ActionContext<'_>,
        state: &mut ActionState<'_>,
    ) -> Result<ActionOutput, StateError> {
        if self.value == 0 {
            return Ok(ActionOutput::failure(
                TRANSFER_COMPUTE_UNITS,
                OUTPUT_VALUE_ZERO,
            ));
        }
        match sub_balance(state, &ctx.actor, self.value) {
            Ok(()) => {}
            Err(ActionError::State(err)) => return Err(err),
            Err(err) => {
                return Ok(ActionOutput::failure(
                    TRANSFER_COMPUTE_UNITS,
                    err.to_string(),
                ))
            }
        }
        // the total supply fits in a u64, an overflow here means the state is corrupted
        match add_balance(state, &self.to, self.value, true) {
            Ok(()) => Ok(ActionOutput::success(TRANSFER_COMPUTE_UNITS)),
            Err(ActionError::State(err)) => Err(err),
            Err(err) => Err(StateError::CorruptedValue {
                key: balance_key(&self.to),
                reason: err.to_string(),
            }),
        }
    }

    fn serialize(&self, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        TransferSerializer::new().serialize(self, buffer)
    }
}

/// Serializer for `Transfer`: the recipient key then the value as a big endian `u64`
#[derive(Default, Clone, Copy)]
pub struct TransferSerializer {
    public_key_serializer: PublicKeySerializer,
    u64_serializer: U64Serializer,
}

impl TransferSerializer {
    /// Creates a new `TransferSerializer`
    pub const fn new() -> Self {
        Self {
            public_key_serializer: PublicKeySerializer::new(),
            u64_serializer: U64Serializer::new(),
        }
    }
}

impl Serializer<Transfer> for TransferSerializer {
    fn serialize(&self, value: &Transfer, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.public_key_serializer.serialize(&value.to, buffer)?;
        self.u64_serializer.serialize(&value.value, buffer)?;
        Ok(())
    }
}

/// Deserializer for `Transfer`
#[derive(Clone, Copy)]
pub struct TransferDeserializer {
    public_key_deserializer: PublicKeyDeserializer,
    u64_deserializer: U64Deserializer,
}

impl TransferDeserializer {
    /// Creates a new `TransferDeserializer`.
    /// Transfers to the empty key and of a zero value decode, execution rejects the latter.
    pub const fn new() -> Self {
        Self {
            public_key_deserializer: PublicKeyDeserializer::new(true),
            u64_deserializer: U64Deserializer::new(
                std::ops::Bound::Included(0),
                std::ops::Bound::Included(u64::MAX),
            ),
        }
    }
}

impl Default for TransferDeserializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deserializer<Transfer> for TransferDeserializer {
    fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
        &self,
        buffer: &'a [u8],
    ) -> IResult<&'a [u8], Transfer, E> {
        context(
            "Failed Transfer deserialization",
            tuple((
                context("Failed recipient deserialization", |input| {
                    self.public_key_deserializer.deserialize::<E>(input)
                }),
                context("Failed value deserialization", |input| {
                    self.u64_deserializer.deserialize::<E>(input)
                }),
            )),
        )
        .map(|(to, value)| Transfer { to, value })
        .parse(buffer)
    }
}
