// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Account balances.
//!
//! A balance is stored under `BALANCE_PREFIX | public key` as a big endian
//! `u64`. An absent key is a zero balance and a balance reaching zero is
//! removed from the state.

use crate::error::ActionError;
use morpheus_models::{PublicKey, StateKey, BALANCE_PREFIX};
use morpheus_serialization::{DeserializeError, Deserializer, Serializer, U64Deserializer, U64Serializer};
use morpheus_state_exports::{ActionState, StateError};

/// Chunks taken by a balance entry
pub const BALANCE_CHUNKS: u16 = 1;

/// State key holding the balance of `pk`
pub fn balance_key(pk: &PublicKey) -> StateKey {
    StateKey::with_prefix(BALANCE_PREFIX, pk.to_bytes())
}

/// Balance of `pk`, 0 if the account does not exist
pub fn get_balance(state: &ActionState<'_>, pk: &PublicKey) -> Result<u64, StateError> {
    Ok(get_balance_entry(state, pk)?.unwrap_or(0))
}

fn get_balance_entry(state: &ActionState<'_>, pk: &PublicKey) -> Result<Option<u64>, StateError> {
    let key = balance_key(pk);
    let Some(raw) = state.get(&key)? else {
        return Ok(None);
    };
    match U64Deserializer::default().deserialize::<DeserializeError>(&raw) {
        Ok((rest, balance)) if rest.is_empty() => Ok(Some(balance)),
        Ok((rest, _)) => Err(StateError::CorruptedValue {
            key,
            reason: format!("{} trailing bytes after balance", rest.len()),
        }),
        Err(err) => Err(StateError::CorruptedValue {
            key,
            reason: err.to_string(),
        }),
    }
}

fn set_balance(state: &mut ActionState<'_>, pk: &PublicKey, balance: u64) -> Result<(), StateError> {
    let key = balance_key(pk);
    if balance == 0 {
        return state.delete(key);
    }
    let mut buffer = Vec::with_capacity(8);
    U64Serializer::new()
        .serialize(&balance, &mut buffer)
        .map_err(|err| StateError::CorruptedValue {
            key: key.clone(),
            reason: err.to_string(),
        })?;
    state.put(key, buffer)
}

/// Removes `amount` from the balance of `pk`.
/// Nothing is written if the balance is too low.
pub fn sub_balance(
    state: &mut ActionState<'_>,
    pk: &PublicKey,
    amount: u64,
) -> Result<(), ActionError> {
    let balance = get_balance(state, pk)?;
    let new_balance = balance
        .checked_sub(amount)
        .ok_or(ActionError::InsufficientBalance { balance, amount })?;
    set_balance(state, pk, new_balance)?;
    Ok(())
}

/// Adds `amount` to the balance of `pk`.
///
/// # Arguments
/// * `create`: whether a missing account may be created
pub fn add_balance(
    state: &mut ActionState<'_>,
    pk: &PublicKey,
    amount: u64,
    create: bool,
) -> Result<(), ActionError> {
    let balance = match get_balance_entry(state, pk)? {
        Some(balance) => balance,
        None if create => 0,
        None => return Err(ActionError::AccountNotFound),
    };
    let new_balance = balance
        .checked_add(amount)
        .ok_or(ActionError::BalanceOverflow { balance, amount })?;
    set_balance(state, pk, new_balance)?;
    Ok(())
}
