//! Ordered event log
//!
//! Every log line is composed and emitted under one lock so lines from
//! different workers never interleave, and the in-memory copy keeps the
//! same order the lines were printed in.

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

/// A logged event of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkerEvent {
    /// A worker computed and stored a term
    Computed {
        worker_id: usize,
        index: usize,
        value: u64,
        timestamp: u64,
    },
    /// The coordinator cancelled a worker
    FaultInjected { worker_id: usize },
    /// A worker observed its cancellation and stopped
    Interrupted { worker_id: usize },
}

impl WorkerEvent {
    /// Worker the event concerns
    pub fn worker_id(&self) -> usize {
        match *self {
            WorkerEvent::Computed { worker_id, .. }
            | WorkerEvent::FaultInjected { worker_id }
            | WorkerEvent::Interrupted { worker_id } => worker_id,
        }
    }
}

impl fmt::Display for WorkerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerEvent::Computed {
                worker_id,
                index,
                value,
                timestamp,
            } => write!(
                f,
                "Worker {} - Term {}: {} - Clock {}",
                worker_id, index, value, timestamp
            ),
            WorkerEvent::FaultInjected { worker_id } => write!(f, "Fault on Worker {}", worker_id),
            WorkerEvent::Interrupted { worker_id } => write!(f, "Worker {} interrupted.", worker_id),
        }
    }
}

/// Shared console sink with an ordered in-memory copy
#[derive(Default)]
pub struct EventLog {
    entries: Mutex<Vec<WorkerEvent>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit and keep one event
    pub fn record(&self, event: WorkerEvent) {
        let mut entries = self.entries.lock();
        match event {
            WorkerEvent::Computed { .. } => info!("{}", event),
            WorkerEvent::FaultInjected { .. } | WorkerEvent::Interrupted { .. } => {
                warn!("{}", event)
            }
        }
        entries.push(event);
    }

    /// Copy of every event in emission order
    pub fn entries(&self) -> Vec<WorkerEvent> {
        self.entries.lock().clone()
    }

    /// Number of events recorded
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
