//! Worker state machine
//!
//! `Running → ClaimedWork → Running …` until the worker ends `Exhausted`
//! (no work left) or `Cancelled` (fault injected).

use serde::Serialize;

/// Worker phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPhase {
    /// Looking for work
    Running,
    /// Holding a claimed index
    ClaimedWork,
    /// Dispenser reported no more work
    Exhausted,
    /// Stopped by a cancellation signal
    Cancelled,
}

/// Final state of a worker, returned when its task ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerExit {
    /// Worker ID (0-indexed)
    pub worker_id: usize,
    /// Terminal phase
    pub phase: WorkerPhase,
    /// Indices computed, in claim order
    pub indices: Vec<usize>,
    /// Logical clock value when the worker stopped
    pub clock: u64,
}

impl WorkerExit {
    /// Number of terms this worker computed
    pub fn terms_computed(&self) -> usize {
        self.indices.len()
    }

    /// Whether the worker was cancelled
    pub fn was_cancelled(&self) -> bool {
        self.phase == WorkerPhase::Cancelled
    }
}
