//! Per-worker logical clocks
//!
//! A local Lamport-style counter per worker. No timestamps are exchanged
//! between workers, so there is no merge step: the value is only a
//! monotonically increasing sequence number used to tag log lines.

use std::sync::atomic::{AtomicU64, Ordering};

/// Table of logical clocks, one slot per worker.
///
/// Each slot has a single writer (its worker), so `Relaxed` ordering is
/// enough. Other threads only read snapshots for reporting.
#[derive(Debug)]
pub struct LamportClockTable {
    clocks: Vec<AtomicU64>,
}

impl LamportClockTable {
    /// Create a table with every clock at zero
    pub fn new(workers: usize) -> Self {
        Self {
            clocks: (0..workers).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Return the worker's current timestamp and advance its clock.
    ///
    /// # Panics
    ///
    /// Panics if `worker_id` is outside the table.
    pub fn tick(&self, worker_id: usize) -> u64 {
        self.clocks[worker_id].fetch_add(1, Ordering::Relaxed)
    }

    /// Current (next unissued) timestamp for a worker
    pub fn current(&self, worker_id: usize) -> u64 {
        self.clocks[worker_id].load(Ordering::Relaxed)
    }

    /// Number of clocks
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// True if the table has no clocks
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// Copy every clock's current value
    pub fn snapshot(&self) -> Vec<u64> {
        self.clocks
            .iter()
            .map(|clock| clock.load(Ordering::Relaxed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_returns_pre_increment_value() {
        let table = LamportClockTable::new(2);
        assert_eq!(table.tick(0), 0);
        assert_eq!(table.tick(0), 1);
        assert_eq!(table.current(0), 2);
    }

    #[test]
    fn test_clocks_are_independent() {
        let table = LamportClockTable::new(3);
        table.tick(1);
        table.tick(1);
        table.tick(2);
        assert_eq!(table.snapshot(), vec![0, 2, 1]);
    }

    #[test]
    fn test_concurrent_owners() {
        let table = std::sync::Arc::new(LamportClockTable::new(4));
        let handles: Vec<_> = (0..4)
            .map(|id| {
                let table = table.clone();
                std::thread::spawn(move || {
                    let stamps: Vec<u64> = (0..100).map(|_| table.tick(id)).collect();
                    assert!(stamps.windows(2).all(|w| w[1] == w[0] + 1));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(table.snapshot(), vec![100; 4]);
    }
}
