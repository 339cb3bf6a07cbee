//! Async runtime management for lucas-core
//!
//! Provides the multi-threaded Tokio runtime workers run on, and the
//! cooperative cancellation signal used for fault injection.

pub mod cancel;
pub mod executor;

pub use cancel::{CancelListener, CancelSignal};
pub use executor::{LucasRuntime, RuntimeConfig};
