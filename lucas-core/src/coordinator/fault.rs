//! Fault injection target selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks which worker to cancel
pub struct FaultInjector {
    rng: StdRng,
}

impl FaultInjector {
    /// Create an injector. A seed makes the choice reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }

    /// Choose a worker uniformly from `0..workers`
    pub fn pick_target(&mut self, workers: usize) -> usize {
        self.rng.random_range(0..workers)
    }
}
