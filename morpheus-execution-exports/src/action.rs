// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! The contract every state transition implements

use crate::controller_traits::Rules;
use morpheus_models::{PublicKey, StateKey, TxId, UnsignedWarpMessage, WarpMessage};
use morpheus_serialization::SerializeError;
use morpheus_state_exports::{ActionState, StateError};

/// Everything a running action may know about its surroundings
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    /// chain rules in force
    pub rules: &'a dyn Rules,
    /// timestamp of the block being built, in milliseconds
    pub timestamp: i64,
    /// identity that signed the transaction
    pub actor: PublicKey,
    /// id of the transaction
    pub tx_id: TxId,
    /// whether the attached warp message was verified
    pub warp_verified: bool,
    /// attached warp message, if any
    pub warp_message: Option<&'a WarpMessage>,
}

/// What an action reports once executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutput {
    /// whether the action took effect
    pub success: bool,
    /// compute units consumed, reported even on failure
    pub units_consumed: u64,
    /// empty on success, human readable diagnostic on failure
    pub output: Vec<u8>,
    /// message emitted for other chains
    pub warp_message: Option<UnsignedWarpMessage>,
}

impl ActionOutput {
    /// Successful output without warp message
    pub fn success(units_consumed: u64) -> Self {
        ActionOutput {
            success: true,
            units_consumed,
            output: Vec::new(),
            warp_message: None,
        }
    }

    /// Failed output carrying a diagnostic
    pub fn failure(units_consumed: u64, diagnostic: impl Into<Vec<u8>>) -> Self {
        ActionOutput {
            success: false,
            units_consumed,
            output: diagnostic.into(),
            warp_message: None,
        }
    }
}

/// A state transition submitted by a user.
///
/// Declared keys and chunk bounds must be pure functions of the action fields
/// and of the invoking identity: the scheduler computes them before anything
/// runs, and the state handle given to `execute` refuses any other key.
pub trait Action: Send + Sync {
    /// Stable tag of the action variant
    fn type_id(&self) -> u8;

    /// Keys the action may read or write
    fn state_keys(&self, actor: &PublicKey, tx_id: &TxId) -> Vec<StateKey>;

    /// Maximum number of chunks of each key returned by `state_keys`, same order
    fn state_keys_max_chunks(&self) -> Vec<u16>;

    /// Whether `execute` may emit a warp message
    fn outputs_warp_message(&self) -> bool;

    /// Upper bound of the compute units `execute` reports
    fn max_compute_units(&self, rules: &dyn Rules) -> u64;

    /// Validity window `[start, end]` in milliseconds, `(-1, -1)` for always valid
    fn valid_range(&self, rules: &dyn Rules) -> (i64, i64);

    /// Runs the action.
    ///
    /// A user level failure is an `Ok` output with `success == false`.
    /// An `Err` aborts the whole block build.
    fn execute(
        &self,
        ctx: &ActionContext<'_>,
        state: &mut ActionState<'_>,
    ) -> Result<ActionOutput, StateError>;

    /// Appends the fields of the action to `buffer`, without the type id
    fn serialize(&self, buffer: &mut Vec<u8>) -> Result<(), SerializeError>;
}

impl<A: Action + ?Sized> Action for Box<A> {
    fn type_id(&self) -> u8 {
        (**self).type_id()
    }

    fn state_keys(&self, actor: &PublicKey, tx_id: &TxId) -> Vec<StateKey> {
        (**self).state_keys(actor, tx_id)
    }

    fn state_keys_max_chunks(&self) -> Vec<u16> {
        (**self).state_keys_max_chunks()
    }

    fn outputs_warp_message(&self) -> bool {
        (**self).outputs_warp_message()
    }

    fn max_compute_units(&self, rules: &dyn Rules) -> u64 {
        (**self).max_compute_units(rules)
    }

    fn valid_range(&self, rules: &dyn Rules) -> (i64, i64) {
        (**self).valid_range(rules)
    }

    fn execute(
        &self,
        ctx: &ActionContext<'_>,
        state: &mut ActionState<'_>,
    ) -> Result<ActionOutput, StateError> {
        (**self).execute(ctx, state)
    }

    fn serialize(&self, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        (**self).serialize(buffer)
    }
}
