// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Pending state modifications

use morpheus_models::{Hash, StateKey};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A set/delete change on a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOrDelete<T: Clone> {
    /// sets a new absolute value T
    Set(T),
    /// deletes the value
    Delete,
}

impl<T: Clone> SetOrDelete<T> {
    /// The value this change leaves behind
    pub fn as_value(&self) -> Option<&T> {
        match self {
            SetOrDelete::Set(value) => Some(value),
            SetOrDelete::Delete => None,
        }
    }
}

/// Ordered list of changes to apply to the state.
///
/// Keys are kept sorted so that iteration, and therefore the digest, does not
/// depend on the order the changes were made in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChanges(BTreeMap<StateKey, SetOrDelete<Vec<u8>>>);

impl StateChanges {
    /// Creates an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`
    pub fn set(&mut self, key: StateKey, value: Vec<u8>) {
        self.0.insert(key, SetOrDelete::Set(value));
    }

    /// Deletes `key`
    pub fn delete(&mut self, key: StateKey) {
        self.0.insert(key, SetOrDelete::Delete);
    }

    /// Change recorded for `key`, if any
    pub fn get(&self, key: &StateKey) -> Option<&SetOrDelete<Vec<u8>>> {
        self.0.get(key)
    }

    /// Applies `other` on top of `self`: changes of `other` win
    pub fn apply(&mut self, other: StateChanges) {
        self.0.extend(other.0);
    }

    /// Number of changed keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no key changed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the changes in key order
    pub fn iter(&self) -> btree_map::Iter<'_, StateKey, SetOrDelete<Vec<u8>>> {
        self.0.iter()
    }

    /// blake3 digest of the change set.
    ///
    /// Each entry contributes its key length (u32 BE), its key, a tag
    /// (0 = set, 1 = delete) and for sets the value length (u32 BE) and the value.
    pub fn hash(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        for (key, change) in self.0.iter() {
            hasher.update(&(key.as_bytes().len() as u32).to_be_bytes());
            hasher.update(key.as_bytes());
            match change {
                SetOrDelete::Set(value) => {
                    hasher.update(&[0u8]);
                    hasher.update(&(value.len() as u32).to_be_bytes());
                    hasher.update(value);
                }
                SetOrDelete::Delete => {
                    hasher.update(&[1u8]);
                }
            }
        }
        Hash::from_bytes(hasher.finalize().as_bytes())
    }
}

impl IntoIterator for StateChanges {
    type Item = (StateKey, SetOrDelete<Vec<u8>>);
    type IntoIter = btree_map::IntoIter<StateKey, SetOrDelete<Vec<u8>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
