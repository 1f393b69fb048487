// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Helpers for testing code that reads or writes state

mod memory_store;

pub use memory_store::MemoryStore;
