//! First-come-first-served index dispenser
//!
//! Hands the next unclaimed term index to whichever worker asks first.

use parking_lot::Mutex;
use tracing::debug;

/// Shared counter of the next unclaimed index
pub struct WorkDispenser {
    /// Total number of indices to hand out
    total: usize,
    /// Next unclaimed index
    next: Mutex<usize>,
}

impl WorkDispenser {
    /// Create a dispenser for indices `0..total`
    pub fn new(total: usize) -> Self {
        Self {
            total,
            next: Mutex::new(0),
        }
    }

    /// Claim the next index.
    ///
    /// The read and the increment happen under one lock, so no index is
    /// handed out twice. Once every index is claimed this returns `None`
    /// and leaves the counter untouched.
    pub fn claim_next(&self) -> Option<usize> {
        let mut next = self.next.lock();
        if *next >= self.total {
            return None;
        }
        let claimed = *next;
        *next += 1;
        drop(next);

        debug!("Claimed index {} of {}", claimed, self.total);
        Some(claimed)
    }

    /// Total number of indices
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of indices handed out so far
    pub fn claimed(&self) -> usize {
        *self.next.lock()
    }

    /// Number of indices not yet claimed
    pub fn remaining(&self) -> usize {
        self.total - self.claimed()
    }
}
