// Copyright (c) 2022 MASSA LABS <info@massa.net>

use morpheus_execution_exports::{ExecutionConfig, ExecutionError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Lifetime of one block build: cancelled on demand or once its deadline passed.
/// Workers check it before running each transaction.
#[derive(Debug)]
pub struct CancellationScope {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

impl CancellationScope {
    /// Creates a scope expiring after `timeout`, if any
    pub fn new(timeout: Option<Duration>) -> Self {
        CancellationScope {
            cancelled: AtomicBool::new(false),
            deadline: timeout.map(|timeout| Instant::now() + timeout),
        }
    }

    /// Creates a scope expiring after the configured block deadline
    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.block_deadline.map(Duration::from_millis))
    }

    /// Requests the build to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether `cancel` was called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fails if the build was cancelled or ran past its deadline
    pub fn check(&self) -> Result<(), ExecutionError> {
        if self.is_cancelled() {
            return Err(ExecutionError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ExecutionError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for CancellationScope {
    fn default() -> Self {
        Self::new(None)
    }
}
