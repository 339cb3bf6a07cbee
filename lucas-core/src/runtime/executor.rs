//! Tokio runtime executor configuration
//!
//! Workers run as tasks on one multi-threaded runtime, so they execute in
//! parallel across the available cores.

use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use crate::error::{LucasError, Result};

/// Configuration for the lucas runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Number of runtime threads
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get().max(2),
        }
    }
}

/// Runtime executor for worker tasks
pub struct LucasRuntime {
    runtime: Runtime,
    config: RuntimeConfig,
}

impl LucasRuntime {
    /// Create a new runtime with the given configuration
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name("lucas-worker")
            .enable_all()
            .build()
            .map_err(|e| LucasError::RuntimeBuild {
                message: e.to_string(),
            })?;

        Ok(Self { runtime, config })
    }

    /// Spawn a task on the runtime
    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// Run a future, blocking until complete
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Get the runtime handle
    pub fn handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Configuration this runtime was built with
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Shut down without waiting for detached tasks
    pub fn shutdown(self) {
        self.runtime.shutdown_background();
    }
}
