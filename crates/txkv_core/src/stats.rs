//! Store statistics.
//!
//! Counters are informational only; they never influence store semantics.
//!
//! ```rust
//! use txkv_core::TransactionalStore;
//!
//! let mut store: TransactionalStore<String, i64> = TransactionalStore::new();
//! store.begin_transaction()?;
//! store.put("a".to_string(), 1)?;
//! store.commit()?;
//!
//! let stats = store.stats().snapshot();
//! assert_eq!(stats.transactions_committed, 1);
//! assert_eq!(stats.writes_applied, 1);
//! # Ok::<(), txkv_core::StoreError>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Store statistics.
///
/// All counters are atomic so they can be bumped from `&self` read paths and
/// read while a [`SharedStore`](crate::SharedStore) is in use elsewhere.
#[derive(Debug, Default)]
pub struct StoreStats {
    // Operation counters
    /// Total number of `get` calls.
    reads: AtomicU64,
    /// Reads answered from the pending log.
    pending_hits: AtomicU64,
    /// Total number of accepted `put` calls.
    writes: AtomicU64,

    // Transaction counters
    /// Transactions begun.
    transactions_started: AtomicU64,
    /// Transactions committed.
    transactions_committed: AtomicU64,
    /// Transactions rolled back.
    transactions_rolled_back: AtomicU64,

    // Log replay counters
    /// Pending entries replayed into the committed map.
    writes_applied: AtomicU64,
    /// Pending entries dropped by rollback.
    writes_discarded: AtomicU64,

    /// Rejected operations.
    errors: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    // === Increment methods (internal use) ===

    pub(crate) fn record_read(&self, from_pending: bool) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if from_pending {
            self.pending_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_start(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_commit(&self, applied: usize) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
        self.writes_applied
            .fetch_add(applied as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_rollback(&self, discarded: usize) {
        self.transactions_rolled_back
            .fetch_add(1, Ordering::Relaxed);
        self.writes_discarded
            .fetch_add(discarded as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    // === Getter methods (public API) ===

    /// Returns the total number of reads.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of reads resolved by the pending log.
    pub fn pending_hits(&self) -> u64 {
        self.pending_hits.load(Ordering::Relaxed)
    }

    /// Returns the number of accepted writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the number of transactions begun.
    pub fn transactions_started(&self) -> u64 {
        self.transactions_started.load(Ordering::Relaxed)
    }

    /// Returns the number of transactions committed.
    pub fn transactions_committed(&self) -> u64 {
        self.transactions_committed.load(Ordering::Relaxed)
    }

    /// Returns the number of transactions rolled back.
    pub fn transactions_rolled_back(&self) -> u64 {
        self.transactions_rolled_back.load(Ordering::Relaxed)
    }

    /// Returns the number of pending entries replayed by commits.
    pub fn writes_applied(&self) -> u64 {
        self.writes_applied.load(Ordering::Relaxed)
    }

    /// Returns the number of pending entries dropped by rollbacks.
    pub fn writes_discarded(&self) -> u64 {
        self.writes_discarded.load(Ordering::Relaxed)
    }

    /// Returns the number of rejected operations.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads(),
            pending_hits: self.pending_hits(),
            writes: self.writes(),
            transactions_started: self.transactions_started(),
            transactions_committed: self.transactions_committed(),
            transactions_rolled_back: self.transactions_rolled_back(),
            writes_applied: self.writes_applied(),
            writes_discarded: self.writes_discarded(),
            errors: self.errors(),
        }
    }
}

/// A point-in-time snapshot of store statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Total number of reads.
    pub reads: u64,
    /// Reads resolved by the pending log.
    pub pending_hits: u64,
    /// Accepted writes.
    pub writes: u64,
    /// Transactions begun.
    pub transactions_started: u64,
    /// Transactions committed.
    pub transactions_committed: u64,
    /// Transactions rolled back.
    pub transactions_rolled_back: u64,
    /// Pending entries replayed by commits.
    pub writes_applied: u64,
    /// Pending entries dropped by rollbacks.
    pub writes_discarded: u64,
    /// Rejected operations.
    pub errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = StoreStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_reads() {
        let stats = StoreStats::new();

        stats.record_read(true);
        stats.record_read(false);
        stats.record_read(false);

        assert_eq!(stats.reads(), 3);
        assert_eq!(stats.pending_hits(), 1);
    }

    #[test]
    fn record_transactions() {
        let stats = StoreStats::new();

        stats.record_transaction_start();
        stats.record_transaction_start();
        stats.record_transaction_commit(3);
        stats.record_transaction_rollback(2);

        let snap = stats.snapshot();
        assert_eq!(snap.transactions_started, 2);
        assert_eq!(snap.transactions_committed, 1);
        assert_eq!(snap.transactions_rolled_back, 1);
        assert_eq!(snap.writes_applied, 3);
        assert_eq!(snap.writes_discarded, 2);
    }

    #[test]
    fn concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(StoreStats::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let s = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    s.record_read(false);
                    s.record_write();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.reads(), 1000);
        assert_eq!(stats.writes(), 1000);
    }
}
