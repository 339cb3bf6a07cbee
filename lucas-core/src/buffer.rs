//! Result buffer
//!
//! Fixed-size slots, one per term. The dispenser hands each index to exactly
//! one worker, so writes never contend and the buffer needs no lock.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::error;

/// Marker for a slot that was never written
pub const UNWRITTEN: u64 = 0;

/// Lock-free buffer of computed terms
#[derive(Debug)]
pub struct ResultBuffer {
    slots: Vec<AtomicU64>,
}

impl ResultBuffer {
    /// Allocate `len` unwritten slots
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| AtomicU64::new(UNWRITTEN)).collect(),
        }
    }

    /// Store the value for a claimed index.
    ///
    /// Returns false if the slot was already written, which would mean the
    /// dispenser handed the same index out twice.
    pub fn record(&self, index: usize, value: u64) -> bool {
        let written = self.slots[index]
            .compare_exchange(UNWRITTEN, value, Ordering::Release, Ordering::Relaxed)
            .is_ok();
        if !written {
            error!("Slot {} written twice", index);
        }
        written
    }

    /// Value at `index`, or `None` if it has not been computed
    pub fn get(&self, index: usize) -> Option<u64> {
        match self.slots.get(index)?.load(Ordering::Acquire) {
            UNWRITTEN => None,
            value => Some(value),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the buffer has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots written so far
    pub fn written(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.load(Ordering::Acquire) != UNWRITTEN)
            .count()
    }

    /// Copy all slots, with [`UNWRITTEN`] for missing terms
    pub fn snapshot(&self) -> Vec<u64> {
        self.slots
            .iter()
            .map(|slot| slot.load(Ordering::Acquire))
            .collect()
    }
}
