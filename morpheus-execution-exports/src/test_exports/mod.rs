// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module exposes useful tooling for testing.
//! It is only compiled and exported by the crate if the "test-exports" feature is enabled.
//!
//! # Architecture
//!
//! ## config.rs
//! Provides execution configurations for testing.
//!
//! ## rules.rs
//! Provides fixed chain rules.
//!
//! Mocks of `Rules`, `ChainReader` and `WarpMessageSource` are exported at the
//! root of the crate.

mod config;
mod rules;

pub use config::*;
pub use rules::*;
