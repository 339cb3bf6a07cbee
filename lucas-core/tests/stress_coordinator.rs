//! Stress tests for the coordinator under contention
//!
//! Run with: cargo test --release --test stress_coordinator -- --nocapture

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lucas_core::coordinator::WorkDispenser;
use lucas_core::recurrence::{reference_series, MAX_TERMS};
use lucas_core::{Coordinator, RunConfig};

/// Hammer the dispenser from many tasks at once
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn stress_dispenser_claims() {
    let total = 200_000;
    let num_tasks = 64;
    let dispenser = Arc::new(WorkDispenser::new(total));

    let start = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..num_tasks {
        let dispenser = dispenser.clone();
        handles.push(tokio::spawn(async move {
            let mut claimed = Vec::new();
            while let Some(index) = dispenser.claim_next() {
                claimed.push(index);
                if claimed.len() % 1024 == 0 {
                    tokio::task::yield_now().await;
                }
            }
            claimed
        }));
    }

    let mut seen = HashSet::with_capacity(total);
    for handle in handles {
        for index in handle.await.unwrap() {
            assert!(seen.insert(index), "Index {} claimed twice", index);
        }
    }
    let elapsed = start.elapsed();

    println!("Dispenser stress test:");
    println!("  Tasks: {}", num_tasks);
    println!("  Claims: {}", total);
    println!("  Elapsed: {:?}", elapsed);
    println!("  Claims/sec: {:.2}", total as f64 / elapsed.as_secs_f64());

    assert_eq!(seen.len(), total);
}

/// Many workers, full series, no simulated delay
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn stress_many_workers() {
    let num_workers = 200;
    let expected = reference_series(MAX_TERMS);

    let start = Instant::now();
    let config = RunConfig::new(num_workers, MAX_TERMS, false).with_unit_delay(Duration::ZERO);
    let report = Coordinator::new(config).run().await.unwrap();
    let elapsed = start.elapsed();

    let busy = report.exits.iter().filter(|e| !e.indices.is_empty()).count();
    println!("Many-worker stress test:");
    println!("  Workers: {}", num_workers);
    println!("  Terms: {}", MAX_TERMS);
    println!("  Workers with work: {}", busy);
    println!("  Elapsed: {:?}", elapsed);

    assert_eq!(report.terms, expected);
}

/// Repeated runs always agree with the reference series
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn stress_repeated_runs() {
    let runs = 25;
    let terms = 64;
    let expected = reference_series(terms);

    let start = Instant::now();
    for run in 0..runs {
        let workers = 1 + run % 12;
        let config = RunConfig::new(workers, terms, false).with_unit_delay(Duration::ZERO);
        let report = Coordinator::new(config).run().await.unwrap();
        assert_eq!(report.terms, expected, "Run {} with {} workers", run, workers);
    }
    let elapsed = start.elapsed();

    println!("Repeated run stress test:");
    println!("  Runs: {}", runs);
    println!("  Total elapsed: {:?}", elapsed);
    println!("  Avg run time: {:?}", elapsed / runs as u32);
}

/// Fault injection under many workers never deadlocks
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn stress_fault_injection() {
    let runs = 10;

    for seed in 0..runs {
        let config = RunConfig::new(16, MAX_TERMS, true)
            .with_unit_delay(Duration::from_millis(2))
            .with_fault_delay(Duration::from_millis(3))
            .with_fault_seed(seed);

        let report = tokio::time::timeout(Duration::from_secs(30), Coordinator::new(config).run())
            .await
            .expect("run deadlocked")
            .unwrap();

        assert!(report.faulted_worker.is_some());
        assert!(report.cancelled_workers().len() <= 1);
        assert!(report.is_complete(), "Survivors should finish the series");
    }
}
