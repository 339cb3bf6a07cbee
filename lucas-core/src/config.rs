//! Run configuration
//!
//! Values come from defaults, environment variables, or the interactive
//! front end, and are validated before a run starts.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LucasError, Result};
use crate::recurrence::MAX_TERMS;
use crate::runtime::RuntimeConfig;

/// Environment variable for the worker count
pub const ENV_WORKERS: &str = "LUCAS_WORKERS";
/// Environment variable for the term count
pub const ENV_TERMS: &str = "LUCAS_TERMS";
/// Environment variable for the fault flag
pub const ENV_FAULT: &str = "LUCAS_FAULT";
/// Environment variable for the per-term delay in milliseconds
pub const ENV_UNIT_DELAY_MS: &str = "LUCAS_UNIT_DELAY_MS";
/// Environment variable for the delay before fault injection in milliseconds
pub const ENV_FAULT_DELAY_MS: &str = "LUCAS_FAULT_DELAY_MS";
/// Environment variable for the fault target seed
pub const ENV_FAULT_SEED: &str = "LUCAS_FAULT_SEED";
/// Environment variable for the runtime thread count
pub const ENV_RUNTIME_THREADS: &str = "LUCAS_RUNTIME_THREADS";

/// Default simulated processing time per term
pub const DEFAULT_UNIT_DELAY: Duration = Duration::from_millis(500);

/// Default delay between spawning workers and injecting the fault
pub const DEFAULT_FAULT_DELAY: Duration = Duration::from_millis(300);

/// Configuration for a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of workers
    pub workers: usize,
    /// Number of terms to compute
    pub terms: usize,
    /// Cancel one random worker mid-run
    pub inject_fault: bool,
    /// Simulated processing time after each term
    pub unit_delay: Duration,
    /// Time between spawning workers and injecting the fault
    pub fault_delay: Duration,
    /// Seed for picking the faulted worker; random when unset
    pub fault_seed: Option<u64>,
    /// Runtime settings
    pub runtime: RuntimeConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            terms: 1,
            inject_fault: false,
            unit_delay: DEFAULT_UNIT_DELAY,
            fault_delay: DEFAULT_FAULT_DELAY,
            fault_seed: None,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl RunConfig {
    /// Create a config with default timings
    pub fn new(workers: usize, terms: usize, inject_fault: bool) -> Self {
        Self {
            workers,
            terms,
            inject_fault,
            ..Default::default()
        }
    }

    /// Set the per-term delay
    pub fn with_unit_delay(mut self, delay: Duration) -> Self {
        self.unit_delay = delay;
        self
    }

    /// Set the delay before fault injection
    pub fn with_fault_delay(mut self, delay: Duration) -> Self {
        self.fault_delay = delay;
        self
    }

    /// Fix the seed used to pick the faulted worker
    pub fn with_fault_seed(mut self, seed: u64) -> Self {
        self.fault_seed = Some(seed);
        self
    }

    /// Set the runtime thread count
    pub fn with_runtime_threads(mut self, threads: usize) -> Self {
        self.runtime.worker_threads = threads;
        self
    }

    /// Check the worker and term counts
    pub fn validate(&self) -> Result<()> {
        if self.workers < 1 {
            return Err(LucasError::InvalidWorkerCount { got: self.workers });
        }
        if self.terms < 1 || self.terms > MAX_TERMS {
            return Err(LucasError::InvalidTermCount {
                got: self.terms,
                max: MAX_TERMS,
            });
        }
        if self.runtime.worker_threads < 1 {
            return Err(LucasError::InvalidSetting {
                key: ENV_RUNTIME_THREADS.into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Load from the process environment on top of the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup on top of the defaults.
    ///
    /// Missing keys keep their default. The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_WORKERS) {
            config.workers = parse_setting(ENV_WORKERS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TERMS) {
            config.terms = parse_setting(ENV_TERMS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_FAULT) {
            config.inject_fault = parse_fault_flag(&raw)?;
        }
        if let Some(raw) = lookup(ENV_UNIT_DELAY_MS) {
            config.unit_delay = Duration::from_millis(parse_setting(ENV_UNIT_DELAY_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_FAULT_DELAY_MS) {
            config.fault_delay = Duration::from_millis(parse_setting(ENV_FAULT_DELAY_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_FAULT_SEED) {
            config.fault_seed = Some(parse_setting(ENV_FAULT_SEED, &raw)?);
        }
        if let Some(raw) = lookup(ENV_RUNTIME_THREADS) {
            config.runtime.worker_threads = parse_setting(ENV_RUNTIME_THREADS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse a yes/no answer for fault injection.
///
/// Accepts `s`, `si`, `y`, `yes`, `true`, `1` and `n`, `no`, `false`, `0`,
/// ignoring case and surrounding whitespace.
pub fn parse_fault_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "s" | "si" | "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(LucasError::InvalidFaultFlag { got: raw.trim().into() }),
    }
}

/// Parse a numeric setting, naming the key in the error
pub fn parse_setting<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| LucasError::InvalidSetting {
        key: key.into(),
        reason: format!("{:?}: {}", raw.trim(), e),
    })
}
