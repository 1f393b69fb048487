// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! # Overview
//!
//! This crate provides everything needed to talk to the execution worker
//! (`morpheus-execution-worker` crate) without depending on it: the contract
//! every action implements, the interfaces of the collaborators the worker
//! queries, the configuration and the shape of the results.
//!
//! # Architecture
//!
//! ## action.rs
//! The `Action` trait, the context given to a running action and its output.
//!
//! ## controller_traits.rs
//! `Rules`, `ChainReader` and `WarpMessageSource`: read-only views on the
//! chain that the execution core relies on.
//!
//! ## error.rs
//! Fatal block build errors, admission errors and chain reader errors.
//!
//! ## settings.rs
//! Configuration of the execution worker.
//!
//! ## types.rs
//! Transactions, per-transaction results and block outputs.
//!
//! ## Test exports
//!
//! When the crate feature `test-exports` is enabled, mocks of the chain
//! interfaces and configuration helpers are exported.
//! See test_exports/mod.rs for details.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod action;
mod controller_traits;
mod error;
mod settings;
mod types;

pub use action::{Action, ActionContext, ActionOutput};
pub use controller_traits::{ChainReader, Rules, WarpMessageSource};
pub use error::{AdmissionError, ChainError, ExecutionError};
pub use settings::ExecutionConfig;
pub use types::{
    BlockContext, BlockExecutionOutput, ExecutionResult, RootBlockInfo, Transaction, TxBlockInfo,
};

#[cfg(any(test, feature = "test-exports"))]
pub use controller_traits::{MockChainReader, MockRules, MockWarpMessageSource};

#[cfg(any(test, feature = "test-exports"))]
pub mod test_exports;
