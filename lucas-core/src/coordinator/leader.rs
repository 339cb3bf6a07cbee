//! Coordinator logic
//!
//! Spawns the workers of a run, optionally cancels one of them, waits for
//! all of them and collects the result buffer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::fault::FaultInjector;
use crate::buffer::UNWRITTEN;
use crate::config::RunConfig;
use crate::context::RunContext;
use crate::error::{LucasError, Result};
use crate::events::WorkerEvent;
use crate::metrics::RunMetrics;
use crate::runtime::CancelSignal;
use crate::worker::{Worker, WorkerExit};

/// Outcome of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Result buffer contents; `0` marks a term that was never computed
    pub terms: Vec<u64>,
    /// Final state of each worker, indexed by worker ID
    pub exits: Vec<WorkerExit>,
    /// Worker that received the injected fault
    pub faulted_worker: Option<usize>,
    /// Every logged event, in emission order
    pub events: Vec<WorkerEvent>,
    /// Logical clock of each worker at the end of the run
    pub clocks: Vec<u64>,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl RunReport {
    /// Indices whose slot was never written
    pub fn missing_indices(&self) -> Vec<usize> {
        self.terms
            .iter()
            .enumerate()
            .filter(|(_, &value)| value == UNWRITTEN)
            .map(|(index, _)| index)
            .collect()
    }

    /// Whether every term was computed
    pub fn is_complete(&self) -> bool {
        self.terms.iter().all(|&value| value != UNWRITTEN)
    }

    /// Workers that stopped on cancellation
    pub fn cancelled_workers(&self) -> Vec<usize> {
        self.exits
            .iter()
            .filter(|exit| exit.was_cancelled())
            .map(|exit| exit.worker_id)
            .collect()
    }

    /// Terms separated by spaces
    pub fn series_line(&self) -> String {
        self.terms
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Main coordinator
pub struct Coordinator {
    config: RunConfig,
    injector: Mutex<FaultInjector>,
    metrics: Arc<RunMetrics>,
}

impl Coordinator {
    /// Create a coordinator for the given configuration
    pub fn new(config: RunConfig) -> Self {
        let injector = FaultInjector::new(config.fault_seed);
        Self {
            config,
            injector: Mutex::new(injector),
            metrics: Arc::new(RunMetrics::new()),
        }
    }

    /// Configuration of this coordinator
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Metrics accumulated over every run of this coordinator
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Execute one run and return its report.
    ///
    /// Must be called from within a multi-threaded Tokio runtime for the
    /// workers to run in parallel.
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let RunConfig {
            workers,
            terms,
            inject_fault,
            ..
        } = self.config;

        info!(workers, terms, inject_fault, "Starting run");
        let start = Instant::now();

        let ctx = Arc::new(RunContext::with_metrics(
            workers,
            terms,
            self.config.unit_delay,
            self.metrics.clone(),
        )?);
        let signals: Vec<CancelSignal> = (0..workers).map(|_| CancelSignal::new()).collect();

        let handles: Vec<_> = signals
            .iter()
            .enumerate()
            .map(|(id, signal)| tokio::spawn(Worker::new(id, ctx.clone(), signal.subscribe()).run()))
            .collect();

        let faulted_worker = if inject_fault {
            tokio::time::sleep(self.config.fault_delay).await;
            Some(self.inject_fault(&ctx, &signals))
        } else {
            None
        };

        let exits = join_workers(handles).await?;

        let report = RunReport {
            terms: ctx.results.snapshot(),
            exits,
            faulted_worker,
            events: ctx.events.entries(),
            clocks: ctx.clocks.snapshot(),
            elapsed: start.elapsed(),
        };

        let missing = report.missing_indices();
        if missing.is_empty() {
            info!("Run complete: {} terms in {:?}", terms, report.elapsed);
        } else {
            warn!(
                "Run incomplete: {} of {} terms missing {:?}",
                missing.len(),
                terms,
                missing
            );
        }

        Ok(report)
    }

    /// Cancel one randomly chosen worker. Never blocks, whatever state the
    /// worker is in.
    fn inject_fault(&self, ctx: &RunContext, signals: &[CancelSignal]) -> usize {
        let target = self.injector.lock().pick_target(signals.len());
        ctx.events.record(WorkerEvent::FaultInjected { worker_id: target });
        if !signals[target].cancel() {
            debug!(worker_id = target, "Worker was already cancelled");
        }
        target
    }
}

/// Wait for every worker, even after one has panicked, then report the
/// first panic.
async fn join_workers(handles: Vec<JoinHandle<WorkerExit>>) -> Result<Vec<WorkerExit>> {
    let mut exits = Vec::with_capacity(handles.len());
    let mut first_panic = None;

    for (worker_id, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(exit) => {
                debug!(
                    worker_id,
                    phase = ?exit.phase,
                    computed = exit.terms_computed(),
                    "Worker joined"
                );
                exits.push(exit);
            }
            Err(e) => {
                error!(worker_id, "Worker failed: {}", e);
                first_panic.get_or_insert(LucasError::WorkerPanicked {
                    worker_id,
                    message: e.to_string(),
                });
            }
        }
    }

    match first_panic {
        Some(err) => Err(err),
        None => Ok(exits),
    }
}
