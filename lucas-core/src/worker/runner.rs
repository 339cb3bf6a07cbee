//! Worker loop
//!
//! Each iteration ticks the worker's clock, claims an index, evaluates it,
//! stores it and logs it, then sleeps for the unit delay. Claim, evaluate
//! and store run without a suspension point, so cancellation is only
//! observed at the top of an iteration or during the delay and a claimed
//! index is never left half-written.

use std::sync::Arc;

use tracing::debug;

use super::state::{WorkerExit, WorkerPhase};
use crate::context::RunContext;
use crate::events::WorkerEvent;
use crate::recurrence;
use crate::runtime::CancelListener;

/// One worker of a run
pub struct Worker {
    id: usize,
    ctx: Arc<RunContext>,
    cancel: CancelListener,
    phase: WorkerPhase,
    indices: Vec<usize>,
}

impl Worker {
    /// Create a worker bound to the run's shared state
    pub fn new(id: usize, ctx: Arc<RunContext>, cancel: CancelListener) -> Self {
        Self {
            id,
            ctx,
            cancel,
            phase: WorkerPhase::Running,
            indices: Vec::new(),
        }
    }

    /// Worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Run until no work is left or cancellation is observed
    pub async fn run(mut self) -> WorkerExit {
        let ctx = self.ctx.clone();
        ctx.metrics.active_workers.inc();
        debug!(worker_id = self.id, "Worker started");

        loop {
            if self.cancel.is_cancelled() {
                self.interrupt();
                break;
            }

            if !self.step() {
                self.phase = WorkerPhase::Exhausted;
                debug!(
                    worker_id = self.id,
                    computed = self.indices.len(),
                    "No more work"
                );
                break;
            }

            let cancelled = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => true,
                _ = tokio::time::sleep(ctx.unit_delay) => false,
            };
            if cancelled {
                self.interrupt();
                break;
            }
            self.phase = WorkerPhase::Running;
        }

        ctx.metrics.active_workers.dec();
        WorkerExit {
            worker_id: self.id,
            phase: self.phase,
            clock: ctx.clocks.current(self.id),
            indices: self.indices,
        }
    }

    /// Claim and compute one index. Returns false when no work is left.
    fn step(&mut self) -> bool {
        let ctx = &self.ctx;
        let timestamp = ctx.clocks.tick(self.id);

        let Some(index) = ctx.dispenser.claim_next() else {
            ctx.metrics.claims_rejected.inc();
            return false;
        };
        self.phase = WorkerPhase::ClaimedWork;

        let value = ctx
            .metrics
            .term_compute_duration
            .time(|| recurrence::evaluate(index));
        if !ctx.results.record(index, value) {
            // Slot already held a value; leave it and keep claiming
            return true;
        }
        ctx.events.record(WorkerEvent::Computed {
            worker_id: self.id,
            index,
            value,
            timestamp,
        });
        ctx.metrics.terms_computed.inc();
        self.indices.push(index);
        true
    }

    fn interrupt(&mut self) {
        self.phase = WorkerPhase::Cancelled;
        self.ctx.events.record(WorkerEvent::Interrupted { worker_id: self.id });
        self.ctx.metrics.workers_cancelled.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::CancelSignal;
    use std::time::Duration;

    fn context(workers: usize, terms: usize) -> Arc<RunContext> {
        Arc::new(RunContext::new(workers, terms, Duration::from_millis(1)).unwrap())
    }

    #[tokio::test]
    async fn test_single_worker_computes_everything() {
        let ctx = context(1, 7);
        let signal = CancelSignal::new();
        let exit = Worker::new(0, ctx.clone(), signal.subscribe()).run().await;

        assert_eq!(exit.phase, WorkerPhase::Exhausted);
        assert_eq!(exit.indices, (0..7).collect::<Vec<_>>());
        assert_eq!(ctx.results.snapshot(), vec![2, 1, 3, 4, 7, 11, 18]);
        // Seven claims plus the rejected one
        assert_eq!(exit.clock, 8);
        assert_eq!(ctx.metrics.claims_rejected.get(), 1);
        assert_eq!(ctx.metrics.active_workers.get(), 0);
    }

    #[tokio::test]
    async fn test_timestamps_follow_claims() {
        let ctx = context(1, 3);
        let signal = CancelSignal::new();
        Worker::new(0, ctx.clone(), signal.subscribe()).run().await;

        let stamps: Vec<u64> = ctx
            .events
            .entries()
            .iter()
            .filter_map(|event| match event {
                WorkerEvent::Computed { timestamp, .. } => Some(*timestamp),
                _ => None,
            })
            .collect();
        assert_eq!(stamps, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = context(1, 5);
        let signal = CancelSignal::new();
        signal.cancel();

        let exit = Worker::new(0, ctx.clone(), signal.subscribe()).run().await;

        assert!(exit.was_cancelled());
        assert_eq!(exit.terms_computed(), 0);
        assert_eq!(exit.clock, 0);
        assert_eq!(ctx.results.written(), 0);
        assert_eq!(
            ctx.events.entries(),
            vec![WorkerEvent::Interrupted { worker_id: 0 }]
        );
    }

    #[tokio::test]
    async fn test_cancelled_during_delay() {
        let ctx = Arc::new(RunContext::new(1, 10, Duration::from_secs(60)).unwrap());
        let signal = CancelSignal::new();
        let worker = Worker::new(0, ctx.clone(), signal.subscribe());
        let handle = tokio::spawn(worker.run());

        while ctx.results.written() == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        signal.cancel();
        let exit = handle.await.unwrap();

        assert!(exit.was_cancelled());
        assert_eq!(exit.indices, vec![0]);
        assert_eq!(ctx.results.snapshot()[1..], [0; 9]);
        assert_eq!(ctx.metrics.workers_cancelled.get(), 1);
    }

    #[tokio::test]
    async fn test_no_work_exhausts_immediately() {
        let ctx = context(2, 1);
        ctx.dispenser.claim_next();
        let signal = CancelSignal::new();

        let worker = Worker::new(1, ctx.clone(), signal.subscribe());
        assert_eq!(worker.id(), 1);
        let exit = worker.run().await;

        assert_eq!(exit.phase, WorkerPhase::Exhausted);
        assert!(exit.indices.is_empty());
        assert!(ctx.events.is_empty());
    }

    #[tokio::test]
    async fn test_occupied_slot_is_not_reported() {
        let ctx = context(1, 3);
        ctx.results.record(1, 99);
        let signal = CancelSignal::new();

        let exit = Worker::new(0, ctx.clone(), signal.subscribe()).run().await;

        assert_eq!(exit.indices, vec![0, 2]);
        assert_eq!(ctx.results.snapshot(), vec![2, 99, 3]);
        assert_eq!(ctx.metrics.terms_computed.get(), 2);
        assert!(ctx
            .events
            .entries()
            .iter()
            .all(|e| !matches!(e, WorkerEvent::Computed { index: 1, .. })));
    }
}
