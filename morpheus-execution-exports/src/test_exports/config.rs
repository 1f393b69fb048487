// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This file defines testing tools related to the configuration

use crate::ExecutionConfig;

impl ExecutionConfig {
    /// config used for testing: a small fixed pool and no deadline
    pub fn for_tests() -> Self {
        Self {
            worker_count: 4,
            ..Default::default()
        }
    }
}
