//! Coordinator for a run
//!
//! Handles work dispensing, worker spawning, fault injection and joining.

pub mod dispenser;
pub mod fault;
pub mod leader;

pub use dispenser::WorkDispenser;
pub use fault::FaultInjector;
pub use leader::{Coordinator, RunReport};
