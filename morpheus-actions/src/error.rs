// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use morpheus_state_exports::StateError;
use thiserror::Error;

/// Errors of the built-in actions and of the action registry
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// State error: {0}
    State(#[from] StateError),
    /// invalid balance: could not subtract balance (bal={balance}, amount={amount})
    InsufficientBalance {
        /// current balance
        balance: u64,
        /// amount to subtract
        amount: u64,
    },
    /// invalid balance: could not add balance (bal={balance}, amount={amount})
    BalanceOverflow {
        /// current balance
        balance: u64,
        /// amount to add
        amount: u64,
    },
    /// account not found
    AccountNotFound,
    /// Type id {0} is already registered
    DuplicateTypeId(u8),
    /// Unknown action type id {0}
    UnknownTypeId(u8),
    /// Action bytes are truncated
    Truncated,
    /// Malformed action: {0}
    Malformed(String),
    /// {0} trailing bytes after action
    TrailingBytes(usize),
}
