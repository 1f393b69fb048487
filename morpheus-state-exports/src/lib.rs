// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! # General description
//!
//! Interface between the execution core and the key-value state store.
//!
//! The store itself lives outside of the execution core: it is only reached
//! through [`StateReader`] and [`StateStore`]. Actions never touch the store
//! directly, they run against an [`ActionState`], a transaction scoped to one
//! action that only sees the keys the action declared, and whose writes are
//! kept aside until the executor commits them.
//!
//! # Test exports
//!
//! With the `test-exports` feature, an in-memory [`test_exports::MemoryStore`]
//! and the `MockStateReader` mock are available.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod action_state;
mod changes;
mod controller_traits;
mod error;

pub use action_state::ActionState;
pub use changes::{SetOrDelete, StateChanges};
pub use controller_traits::{StateReader, StateStore};
pub use error::StateError;

#[cfg(any(test, feature = "test-exports"))]
pub use controller_traits::MockStateReader;

#[cfg(any(test, feature = "test-exports"))]
pub mod test_exports;
