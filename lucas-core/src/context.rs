//! Shared state of a single run
//!
//! Created by the coordinator and handed to every worker behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use crate::buffer::ResultBuffer;
use crate::clock::LamportClockTable;
use crate::coordinator::dispenser::WorkDispenser;
use crate::error::{LucasError, Result};
use crate::events::EventLog;
use crate::metrics::RunMetrics;
use crate::recurrence::MAX_TERMS;

/// Resources shared by every worker of a run
pub struct RunContext {
    /// Hands out term indices
    pub dispenser: WorkDispenser,
    /// Computed terms, one slot per index
    pub results: ResultBuffer,
    /// Logical clock per worker
    pub clocks: LamportClockTable,
    /// Console sink and ordered event record
    pub events: EventLog,
    /// Run metrics
    pub metrics: Arc<RunMetrics>,
    /// Simulated processing time after each term
    pub unit_delay: Duration,
}

impl RunContext {
    /// Allocate state for `workers` workers computing `terms` terms.
    ///
    /// Fails if `terms` exceeds [`MAX_TERMS`], since later terms overflow `u64`.
    pub fn new(workers: usize, terms: usize, unit_delay: Duration) -> Result<Self> {
        Self::with_metrics(workers, terms, unit_delay, Arc::new(RunMetrics::new()))
    }

    /// Allocate state that reports into existing metrics
    pub fn with_metrics(
        workers: usize,
        terms: usize,
        unit_delay: Duration,
        metrics: Arc<RunMetrics>,
    ) -> Result<Self> {
        if terms > MAX_TERMS {
            return Err(LucasError::InvalidTermCount {
                got: terms,
                max: MAX_TERMS,
            });
        }
        Ok(Self {
            dispenser: WorkDispenser::new(terms),
            results: ResultBuffer::new(terms),
            clocks: LamportClockTable::new(workers),
            events: EventLog::new(),
            metrics,
            unit_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_range() {
        let ctx = RunContext::new(2, MAX_TERMS, Duration::ZERO).unwrap();
        assert_eq!(ctx.dispenser.total(), MAX_TERMS);
        assert_eq!(ctx.results.len(), MAX_TERMS);
        assert_eq!(ctx.clocks.len(), 2);
    }

    #[test]
    fn test_rejects_overflowing_terms() {
        let err = RunContext::new(1, MAX_TERMS + 7, Duration::ZERO).err().unwrap();
        assert!(matches!(err, LucasError::InvalidTermCount { got: 100, .. }));
    }
}
