// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! The closed set of actions known by the chain

use crate::transfer::Transfer;
use morpheus_execution_exports::{Action, ActionContext, ActionOutput, Rules};
use morpheus_models::{PublicKey, StateKey, TxId};
use morpheus_serialization::SerializeError;
use morpheus_state_exports::{ActionState, StateError};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Type ids of the built-in actions. Never reuse a retired id.
#[derive(IntoPrimitive, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, TryFromPrimitive)]
#[repr(u8)]
pub enum ActionTypeId {
    /// value transfer
    Transfer = 0,
}

/// Any built-in action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// value transfer
    Transfer(Transfer),
}

impl ActionKind {
    fn inner(&self) -> &dyn Action {
        match self {
            ActionKind::Transfer(transfer) => transfer,
        }
    }
}

impl From<Transfer> for ActionKind {
    fn from(transfer: Transfer) -> Self {
        ActionKind::Transfer(transfer)
    }
}

impl Action for ActionKind {
    fn type_id(&self) -> u8 {
        self.inner().type_id()
    }

    fn state_keys(&self, actor: &PublicKey, tx_id: &TxId) -> Vec<StateKey> {
        self.inner().state_keys(actor, tx_id)
    }

    fn state_keys_max_chunks(&self) -> Vec<u16> {
        self.inner().state_keys_max_chunks()
    }

    fn outputs_warp_message(&self) -> bool {
        self.inner().outputs_warp_message()
    }

    fn max_compute_units(&self, rules: &dyn Rules) -> u64 {
        self.inner().max_compute_units(rules)
    }

    fn valid_range(&self, rules: &dyn Rules) -> (i64, i64) {
        self.inner().valid_range(rules)
    }

    fn execute(
        &self,
        ctx: &ActionContext<'_>,
        state: &mut ActionState<'_>,
    ) -> Result<ActionOutput, StateError> {
        self.inner().execute(ctx, state)
    }

    fn serialize(&self, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        self.inner().serialize(buffer)
    }
}
