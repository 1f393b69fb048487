// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Traits implemented by the state store collaborator

use crate::changes::StateChanges;
use crate::error::StateError;
use morpheus_models::StateKey;

/// Read access to the committed state.
/// Shared between the workers of a wave, so it must be `Sync`.
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
pub trait StateReader: Send + Sync {
    /// Value stored under `key`, `None` if absent
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError>;
}

/// Write access to the state: applies the changes of a whole block at once.
pub trait StateStore: StateReader {
    /// Applies `changes`. Either every change is applied or none is.
    fn apply(&mut self, changes: &StateChanges) -> Result<(), StateError>;
}
