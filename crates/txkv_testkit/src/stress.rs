//! Stress tests for txkv.
//!
//! These helpers exercise long transaction streams and concurrent access
//! through [`SharedStore`].

use crate::fixtures::TestStore;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use txkv_core::{SharedStore, StoreError};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of transactions (or reads) to perform.
    pub operations: usize,
    /// Number of concurrent threads (for concurrent tests).
    pub threads: usize,
    /// Writes per transaction.
    pub writes_per_transaction: usize,
    /// Number of distinct keys.
    pub key_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 1_000,
            threads: 4,
            writes_per_transaction: 8,
            key_count: 64,
        }
    }
}

/// Error used to force a rollback from inside a scoped transaction.
#[derive(Debug)]
pub enum StressError {
    /// Store rejected an operation.
    Store(StoreError),
    /// The test asked for a rollback.
    Intentional,
}

impl From<StoreError> for StressError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl fmt::Display for StressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Intentional => f.write_str("intentional rollback"),
        }
    }
}

fn stress_key(i: usize, config: &StressConfig) -> String {
    format!("stress_{}", i % config.key_count.max(1))
}

/// Run a sequential stream of committed transactions.
pub fn stress_sequential_transactions(
    store: &mut TestStore,
    config: &StressConfig,
) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for t in 0..config.operations {
        let result = store.transaction(|tx| {
            for w in 0..config.writes_per_transaction {
                tx.put(stress_key(t + w, config), t as i64);
            }
            Ok::<_, StoreError>(())
        });

        match result {
            Ok(()) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a transaction stream where every other transaction rolls back.
///
/// Failed operations count the intentional rollbacks.
pub fn stress_transaction_rollbacks(
    store: &mut TestStore,
    config: &StressConfig,
) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for t in 0..config.operations {
        let should_fail = t % 2 == 0;

        let result = store.transaction(|tx| {
            for w in 0..config.writes_per_transaction {
                tx.put(stress_key(t + w, config), t as i64);
            }
            if should_fail {
                Err(StressError::Intentional)
            } else {
                Ok(())
            }
        });

        match result {
            Ok(()) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run concurrent readers against one committing writer.
///
/// The writer commits rounds that set every key to the round number. Each
/// reader snapshots all keys under one read lock; a snapshot with mixed
/// rounds is a torn commit and counts as a failed operation.
pub fn stress_concurrent_readers(
    store: SharedStore<String, i64>,
    config: &StressConfig,
) -> StressTestResult {
    let keys: Arc<Vec<String>> = Arc::new(
        (0..config.key_count.max(1))
            .map(|i| stress_key(i, config))
            .collect(),
    );

    store
        .transaction(|tx| {
            for key in keys.iter() {
                tx.put(key.clone(), 0);
            }
            Ok::<_, StoreError>(())
        })
        .expect("Failed to seed store");

    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let reads_per_thread = config.operations / config.threads.max(1);

    let start = Instant::now();

    let writer = {
        let store = store.clone();
        let keys = Arc::clone(&keys);
        let rounds = config.operations as i64;
        thread::spawn(move || {
            for round in 1..=rounds {
                let result = store.write(|s| {
                    s.begin_transaction()?;
                    for key in keys.iter() {
                        s.put(key.clone(), round)?;
                    }
                    s.commit()
                });
                if result.is_err() {
                    break;
                }
            }
        })
    };

    let readers: Vec<_> = (0..config.threads)
        .map(|_| {
            let store = store.clone();
            let keys = Arc::clone(&keys);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for _ in 0..reads_per_thread {
                    let consistent = store.read(|s| {
                        let mut values = keys.iter().map(|k| s.get_committed(k.as_str()));
                        let first = values.next().flatten();
                        values.all(|v| v == first)
                    });

                    if consistent {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in readers {
        handle.join().expect("Thread panicked");
    }
    writer.join().expect("Thread panicked");

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run concurrent read-modify-write transactions on one counter key.
///
/// Each scoped transaction holds the store's exclusive lock, so the final
/// counter must equal the number of successful transactions.
pub fn stress_concurrent_increments(
    store: SharedStore<String, i64>,
    config: &StressConfig,
) -> StressTestResult {
    const COUNTER: &str = "counter";

    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_thread = config.operations / config.threads.max(1);

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|_| {
            let store = store.clone();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for _ in 0..ops_per_thread {
                    let result = store.transaction(|tx| {
                        let current = tx.get(COUNTER).copied().unwrap_or(0);
                        tx.put(COUNTER.to_string(), current + 1);
                        Ok::<_, StoreError>(())
                    });

                    match result {
                        Ok(()) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}
