// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::changes::{SetOrDelete, StateChanges};
use crate::controller_traits::{StateReader, StateStore};
use crate::error::StateError;
use morpheus_models::StateKey;
use std::collections::BTreeMap;

/// In-memory state store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<StateKey, Vec<u8>>,
}

impl MemoryStore {
    /// Creates a store holding `entries`
    pub fn with_entries<I: IntoIterator<Item = (StateKey, Vec<u8>)>>(entries: I) -> Self {
        MemoryStore {
            entries: entries.into_iter().collect(),
        }
    }

    /// Every stored entry, in key order
    pub fn entries(&self) -> &BTreeMap<StateKey, Vec<u8>> {
        &self.entries
    }
}

impl StateReader for MemoryStore {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(key).cloned())
    }
}

impl StateStore for MemoryStore {
    fn apply(&mut self, changes: &StateChanges) -> Result<(), StateError> {
        for (key, change) in changes.iter() {
            match change {
                SetOrDelete::Set(value) => {
                    self.entries.insert(key.clone(), value.clone());
                }
                SetOrDelete::Delete => {
                    self.entries.remove(key);
                }
            }
        }
        Ok(())
    }
}
