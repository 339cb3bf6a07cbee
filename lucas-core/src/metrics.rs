//! Run metrics
//!
//! Counters, gauges and histograms rendered in Prometheus text format.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Instant;

/// Counter metric (monotonically increasing)
pub struct Counter {
    value: AtomicU64,
    name: &'static str,
    help: &'static str,
}

impl Counter {
    /// Create a new counter
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            value: AtomicU64::new(0),
            name,
            help,
        }
    }

    /// Increment by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment by delta
    pub fn inc_by(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} counter\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Gauge metric (can go up or down)
pub struct Gauge {
    value: AtomicI64,
    name: &'static str,
    help: &'static str,
}

impl Gauge {
    /// Create a new gauge
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            value: AtomicI64::new(0),
            name,
            help,
        }
    }

    /// Set value
    pub fn set(&self, val: i64) {
        self.value.store(val, Ordering::Relaxed);
    }

    /// Increment by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement by 1
    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} gauge\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Histogram for latency measurements, in seconds
pub struct Histogram {
    buckets: Vec<(f64, AtomicU64)>,
    /// Sum of observations in nanoseconds
    sum_nanos: AtomicU64,
    count: AtomicU64,
    name: &'static str,
    help: &'static str,
}

impl Histogram {
    /// Buckets suited to sub-millisecond term evaluation
    pub const DEFAULT_BOUNDS: [f64; 8] = [1e-7, 1e-6, 1e-5, 1e-4, 1e-3, 1e-2, 0.1, 1.0];

    /// Create with default buckets
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self::with_buckets(name, help, Self::DEFAULT_BOUNDS.to_vec())
    }

    /// Create with custom buckets
    pub fn with_buckets(name: &'static str, help: &'static str, bounds: Vec<f64>) -> Self {
        Self {
            buckets: bounds.into_iter().map(|b| (b, AtomicU64::new(0))).collect(),
            sum_nanos: AtomicU64::new(0),
            count: AtomicU64::new(0),
            name,
            help,
        }
    }

    /// Observe a value in seconds
    pub fn observe(&self, seconds: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_nanos
            .fetch_add((seconds * 1e9) as u64, Ordering::Relaxed);

        for (bound, count) in &self.buckets {
            if seconds <= *bound {
                count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Time a closure and record the duration
    pub fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.observe(start.elapsed().as_secs_f64());
        result
    }

    /// Number of observations
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        let mut output = format!(
            "# HELP {} {}\n# TYPE {} histogram\n",
            self.name, self.help, self.name
        );

        for (bound, count) in &self.buckets {
            let _ = writeln!(
                output,
                "{}_bucket{{le=\"{}\"}} {}",
                self.name,
                bound,
                count.load(Ordering::Relaxed)
            );
        }
        let _ = writeln!(output, "{}_bucket{{le=\"+Inf\"}} {}", self.name, self.count());

        let sum_secs = self.sum_nanos.load(Ordering::Relaxed) as f64 / 1e9;
        let _ = writeln!(output, "{}_sum {}", self.name, sum_secs);
        let _ = writeln!(output, "{}_count {}", self.name, self.count());

        output
    }
}

/// Metrics for one run, shared by the coordinator and its workers
pub struct RunMetrics {
    /// Terms evaluated and stored
    pub terms_computed: Counter,
    /// Claims that found no work left
    pub claims_rejected: Counter,
    /// Workers that stopped on cancellation
    pub workers_cancelled: Counter,
    /// Workers not yet in a terminal phase
    pub active_workers: Gauge,
    /// Time spent evaluating a single term
    pub term_compute_duration: Histogram,
}

impl RunMetrics {
    /// Create zeroed metrics
    pub fn new() -> Self {
        Self {
            terms_computed: Counter::new(
                "lucas_terms_computed_total",
                "Total number of terms computed",
            ),
            claims_rejected: Counter::new(
                "lucas_claims_rejected_total",
                "Claims that found no remaining work",
            ),
            workers_cancelled: Counter::new(
                "lucas_workers_cancelled_total",
                "Workers stopped by fault injection",
            ),
            active_workers: Gauge::new("lucas_active_workers", "Number of running workers"),
            term_compute_duration: Histogram::new(
                "lucas_term_compute_duration_seconds",
                "Term evaluation latency",
            ),
        }
    }

    /// Export all metrics in Prometheus format
    pub fn export(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.terms_computed.to_prometheus());
        output.push_str(&self.claims_rejected.to_prometheus());
        output.push_str(&self.workers_cancelled.to_prometheus());
        output.push_str(&self.active_workers.to_prometheus());
        output.push_str(&self.term_compute_duration.to_prometheus());
        output
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = Counter::new("test_counter", "Test counter");
        assert_eq!(counter.get(), 0);

        counter.inc();
        assert_eq!(counter.get(), 1);

        counter.inc_by(5);
        assert_eq!(counter.get(), 6);
        assert!(counter.to_prometheus().ends_with("test_counter 6\n"));
    }

    #[test]
    fn test_gauge() {
        let gauge = Gauge::new("test_gauge", "Test gauge");
        gauge.set(10);
        gauge.dec();
        assert_eq!(gauge.get(), 9);
    }

    #[test]
    fn test_histogram() {
        let histogram = Histogram::new("test_histogram", "Test histogram");

        histogram.observe(0.001);
        histogram.observe(0.01);
        let value = histogram.time(|| 3);

        assert_eq!(value, 3);
        let prometheus = histogram.to_prometheus();
        assert!(prometheus.contains("test_histogram_count 3"));
        assert!(prometheus.contains("test_histogram_bucket{le=\"+Inf\"} 3"));
    }

    #[test]
    fn test_run_metrics_export() {
        let metrics = RunMetrics::new();
        metrics.terms_computed.inc_by(7);
        let exported = metrics.export();
        assert!(exported.contains("lucas_terms_computed_total 7"));
        assert!(exported.contains("# TYPE lucas_active_workers gauge"));
    }
}
