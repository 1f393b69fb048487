// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! # General description
//!
//! The execution worker builds blocks out of admitted transactions.
//!
//! Each transaction declares up front the state keys its action may touch.
//! Transactions are split in waves of pairwise key-disjoint transactions:
//! a wave runs in parallel on a bounded worker pool, waves run one after the
//! other, and the changes of each transaction are merged in submission order.
//! Results are therefore identical on every node whatever the scheduling of
//! the workers.
//!
//! # Architecture
//!
//! ## admission.rs
//! Checks run on a transaction before it may be scheduled.
//!
//! ## scheduler.rs
//! Splits a block into conflict-free waves.
//!
//! ## executor.rs
//! Runs the waves, enforces the declarations and assembles the block output.
//!
//! ## cancellation.rs
//! Stops a block build on demand or when its deadline expires.
//!
//! ## fees.rs
//! Unit price suggestion and fee computation.
//!
//! ## warp.rs
//! Bounds on emitted and attached warp messages.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod admission;
mod cancellation;
mod executor;
mod fees;
mod scheduler;
mod warp;

pub use admission::{declared_keys, validate_transaction, DeclaredKeys};
pub use cancellation::CancellationScope;
pub use executor::BlockExecutor;
pub use fees::{damped_unit_price, fee_for, FeeEngine};
pub use scheduler::{partition_waves, Wave};
pub use warp::WarpManager;

#[cfg(test)]
mod tests;
