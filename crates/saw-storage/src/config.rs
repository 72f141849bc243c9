//! Persistence configuration.

use crate::error::{SawError, SawResult};

/// Default number of worker threads for column I/O.
pub const DEFAULT_WORKER_POOL_SIZE: usize = 10;

/// Configuration for saving and reading tables.
#[derive(Debug, Clone)]
pub struct SawConfig {
    /// Upper bound on concurrent column tasks. Each column is written (or
    /// read) by exactly one worker; a pool never spawns more workers than
    /// there are columns.
    pub worker_pool_size: usize,
}

impl Default for SawConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
        }
    }
}

impl SawConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker pool size.
    #[must_use]
    pub fn with_worker_pool_size(mut self, size: usize) -> Self {
        self.worker_pool_size = size;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SawResult<()> {
        if self.worker_pool_size == 0 {
            return Err(SawError::invalid_argument(
                "worker pool size must be positive",
            ));
        }
        Ok(())
    }
}
