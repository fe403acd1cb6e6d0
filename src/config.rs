//! Synchronization settings.

use thiserror::Error;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A parameter is out of its valid range.
    #[error("invalid synchronization configuration: {0}")]
    InvalidConfiguration(String),
}

/// Parameters of a synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Size of a dedicated merge pool; `None` uses the global rayon pool.
    pub worker_threads: Option<usize>,
    /// Run per-track merges on the worker pool.
    pub parallel: bool,
    /// Turn the first failed track into an error instead of isolating it.
    pub abort_on_failure: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            parallel: true,
            abort_on_failure: false,
        }
    }
}

impl SyncConfig {
    /// Merge every track on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Use a dedicated pool of `threads` workers.
    pub fn with_worker_threads(mut self, threads: usize) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "worker threads must be > 0".to_string(),
            ));
        }
        self.worker_threads = Some(threads);
        self.parallel = true;
        Ok(self)
    }

    /// Choose between failure isolation and fail-fast.
    pub fn with_abort_on_failure(mut self, abort: bool) -> Self {
        self.abort_on_failure = abort;
        self
    }
}
