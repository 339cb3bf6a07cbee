//! Lucas Core - Concurrent Lucas series computation
//!
//! This crate provides:
//! - First-come-first-served work dispensing over a shared counter
//! - Per-worker logical clocks for ordering log events
//! - A lock-free result buffer partitioned by claimed index
//! - Fault injection that cancels one worker mid-run

pub mod buffer;
pub mod clock;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod metrics;
pub mod recurrence;
pub mod runtime;
pub mod worker;

pub use config::RunConfig;
pub use coordinator::{Coordinator, RunReport};
pub use error::{LucasError, Result};
pub use runtime::LucasRuntime;

/// Run a computation to completion on a dedicated runtime.
///
/// Blocks the calling thread; do not call from inside an async context.
pub fn run(config: RunConfig) -> Result<RunReport> {
    config.validate()?;
    let runtime = LucasRuntime::new(config.runtime.clone())?;
    let coordinator = Coordinator::new(config);
    let report = runtime.block_on(coordinator.run());
    runtime.shutdown();
    report
}
