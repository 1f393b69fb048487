// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Built-in actions of the chain.
//!
//! * `transfer.rs`: value transfer between two accounts
//! * `balance.rs`: storage layout of account balances
//! * `kind.rs`: closed set of the known actions and their type ids
//! * `registry.rs`: type id table used to decode actions from transaction bytes

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod balance;
mod error;
mod kind;
mod registry;
mod transfer;

pub use balance::{add_balance, balance_key, get_balance, sub_balance, BALANCE_CHUNKS};
pub use error::ActionError;
pub use kind::{ActionKind, ActionTypeId};
pub use registry::{
    ActionDecoder, ActionDescriptor, ActionDeserializer, ActionRegistry, ActionSerializer,
};
pub use transfer::{
    Transfer, TransferDeserializer, TransferSerializer, OUTPUT_VALUE_ZERO,
    TRANSFER_COMPUTE_UNITS,
};
