//! Worker-side logic
//!
//! Worker phases and the claim/compute/record loop.

pub mod runner;
pub mod state;

pub use runner::Worker;
pub use state::{WorkerExit, WorkerPhase};
