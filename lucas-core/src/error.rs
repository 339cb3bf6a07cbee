//! Error types for lucas-core
//!
//! Configuration errors are rejected before a run starts. Runtime errors
//! cover the few ways the executor itself can fail. Cancellation and
//! work exhaustion are normal terminal paths and never surface here.

use thiserror::Error;

/// Primary error type for all lucas-core operations
#[derive(Debug, Error)]
pub enum LucasError {
    // ========== Configuration Errors ==========

    /// Worker count below one
    #[error("Worker count must be at least 1, got {got}")]
    InvalidWorkerCount { got: usize },

    /// Term count outside the supported range
    #[error("Term count must be between 1 and {max}, got {got}")]
    InvalidTermCount { got: usize, max: usize },

    /// Fault flag that is neither yes nor no
    #[error("Fault flag must be y(es) or n(o), got {got:?}")]
    InvalidFaultFlag { got: String },

    /// A setting could not be parsed
    #[error("Invalid value for {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    // ========== Runtime Errors ==========

    /// Tokio runtime could not be built
    #[error("Failed to build runtime: {message}")]
    RuntimeBuild { message: String },

    /// A worker task panicked before reaching a terminal phase
    #[error("Worker {worker_id} panicked: {message}")]
    WorkerPanicked { worker_id: usize, message: String },
}

impl LucasError {
    /// Returns true if this error was caused by bad configuration
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            LucasError::InvalidWorkerCount { .. }
                | LucasError::InvalidTermCount { .. }
                | LucasError::InvalidFaultFlag { .. }
                | LucasError::InvalidSetting { .. }
        )
    }
}

/// Result type alias for lucas-core operations
pub type Result<T> = std::result::Result<T, LucasError>;
