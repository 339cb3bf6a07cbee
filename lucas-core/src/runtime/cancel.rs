//! Cooperative worker cancellation
//!
//! A one-shot signal per worker. The worker checks it at the top of every
//! iteration and races it against the simulated processing delay.

use std::sync::Arc;
use tokio::sync::watch;

/// Cancellation signal held by the coordinator
///
/// Use subscribe() to hand a listener to the worker.
pub struct CancelSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    /// Create a new, unfired signal
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Fire the signal.
    ///
    /// Never blocks, and succeeds even if the listener is gone. Returns
    /// true if this call was the one that fired it.
    pub fn cancel(&self) -> bool {
        !self.sender.send_replace(true)
    }

    /// Whether the signal has fired
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Create a listener for this signal
    pub fn subscribe(&self) -> CancelListener {
        CancelListener {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Clone for CancelSignal {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker-side view of a [`CancelSignal`]
pub struct CancelListener {
    receiver: watch::Receiver<bool>,
}

impl CancelListener {
    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once cancellation is requested.
    ///
    /// If the signal is dropped without firing, this never resolves.
    pub async fn cancelled(&mut self) {
        if self.receiver.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
