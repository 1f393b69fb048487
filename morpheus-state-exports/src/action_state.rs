// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! The action state is the view of the state given to one running action.
//! It never writes to the store: reads go through the changes added by the
//! action, then the changes of the block so far, then the committed state,
//! and writes are kept in `added_changes` until the executor commits them.
//! Dropping an `ActionState` without committing discards every change.
//! The first access outside the declaration is recorded, so that the
//! executor sees it even if the action ignored the returned error.

use crate::changes::StateChanges;
use crate::controller_traits::StateReader;
use crate::error::StateError;
use morpheus_models::{num_chunks, StateKey};
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// State handle restricted to the keys declared by one action
pub struct ActionState<'a> {
    /// committed state, for reading only
    base: &'a dyn StateReader,

    /// changes of the previous waves of the block, for reading only
    block_changes: &'a StateChanges,

    /// declared keys and their chunk bound
    declared: BTreeMap<StateKey, u16>,

    /// changes made by the action since the creation of the handle
    added_changes: StateChanges,

    /// first access outside the declaration
    violation: OnceCell<StateError>,
}

impl<'a> ActionState<'a> {
    /// Creates a new `ActionState`
    ///
    /// # Arguments
    /// * `base`: committed state
    /// * `block_changes`: changes already made by the block being built
    /// * `keys`: keys declared by the action
    /// * `max_chunks`: chunk bound of each declared key, in the order of `keys`
    ///
    /// A key declared twice keeps its largest bound.
    pub fn new(
        base: &'a dyn StateReader,
        block_changes: &'a StateChanges,
        keys: &[StateKey],
        max_chunks: &[u16],
    ) -> Self {
        let mut declared: BTreeMap<StateKey, u16> = BTreeMap::new();
        for (key, chunks) in keys.iter().zip(max_chunks.iter()) {
            let bound = declared.entry(key.clone()).or_insert(*chunks);
            *bound = (*bound).max(*chunks);
        }
        ActionState {
            base,
            block_changes,
            declared,
            added_changes: StateChanges::new(),
            violation: OnceCell::new(),
        }
    }

    fn record_violation(&self, err: StateError) -> StateError {
        let _ = self.violation.set(err.clone());
        err
    }

    fn check_declared(&self, key: &StateKey) -> Result<u16, StateError> {
        match self.declared.get(key) {
            Some(max_chunks) => Ok(*max_chunks),
            None => Err(self.record_violation(StateError::UndeclaredKey(key.clone()))),
        }
    }

    /// Gets the value stored under `key`
    ///
    /// # Returns
    /// `Some(value)` if the key exists, `None` otherwise
    pub fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        self.check_declared(key)?;
        // try to read from added changes > block changes > committed state
        if let Some(change) = self.added_changes.get(key) {
            return Ok(change.as_value().cloned());
        }
        if let Some(change) = self.block_changes.get(key) {
            return Ok(change.as_value().cloned());
        }
        self.base.get(key)
    }

    /// Stores `value` under `key`.
    /// Fails if the key was not declared or if the value does not fit the
    /// declared chunk bound.
    pub fn put(&mut self, key: StateKey, value: Vec<u8>) -> Result<(), StateError> {
        let max_chunks = self.check_declared(&key)?;
        if num_chunks(value.len()) > max_chunks as usize {
            return Err(self.record_violation(StateError::ChunkOverflow {
                key,
                size: value.len(),
                max_chunks,
            }));
        }
        self.added_changes.set(key, value);
        Ok(())
    }

    /// Removes `key`
    pub fn delete(&mut self, key: StateKey) -> Result<(), StateError> {
        self.check_declared(&key)?;
        self.added_changes.delete(key);
        Ok(())
    }

    /// Takes the first undeclared access or chunk overflow, if any
    pub fn take_violation(&mut self) -> Option<StateError> {
        self.violation.take()
    }

    /// Whether the action changed anything so far
    pub fn is_dirty(&self) -> bool {
        !self.added_changes.is_empty()
    }

    /// Consumes the handle and returns the changes made through it
    pub fn commit(self) -> StateChanges {
        self.added_changes
    }
}

impl<'a> std::fmt::Debug for ActionState<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionState")
            .field("declared", &self.declared)
            .field("added_changes", &self.added_changes)
            .field("violation", &self.violation.get())
            .finish()
    }
}
