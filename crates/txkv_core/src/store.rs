//! The transactional key-value store.

use crate::config::StoreConfig;
use crate::error::{Operation, StoreError, StoreResult};
use crate::stats::StoreStats;
use crate::transaction::{PendingWrite, Transaction, TransactionScope, TransactionState};
use crate::types::{SequenceNumber, TransactionId};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// An in-memory key-value store with single-level transactions.
///
/// The store cycles between two states for its whole lifetime:
/// - **Idle**: reads see committed data; writes are rejected
/// - **Active**: writes go to a pending log; reads see the log first
///
/// Committed data only changes on [`commit`](Self::commit), which replays
/// the pending log in the order the writes were made.
///
/// # Example
///
/// ```rust
/// use txkv_core::TransactionalStore;
///
/// let mut store = TransactionalStore::new();
/// assert_eq!(store.get("A"), None);
///
/// store.begin_transaction()?;
/// store.put("A".to_string(), 5)?;
/// store.put("A".to_string(), 6)?;
/// assert_eq!(store.get("A"), Some(&6));
/// assert_eq!(store.get_committed("A"), None);
///
/// store.commit()?;
/// assert_eq!(store.get("A"), Some(&6));
/// # Ok::<(), txkv_core::StoreError>(())
/// ```
pub struct TransactionalStore<K, V> {
    /// Configuration.
    config: StoreConfig,
    /// Committed state.
    committed: HashMap<K, V>,
    /// The open transaction, if any.
    active: Option<Transaction<K, V>>,
    /// ID handed to the next transaction.
    next_txid: TransactionId,
    /// Sequence of the last commit.
    committed_seq: SequenceNumber,
    /// Operation counters.
    stats: StoreStats,
}

impl<K, V> TransactionalStore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty store with a custom configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            committed: HashMap::with_capacity(config.initial_capacity),
            config,
            active: None,
            next_txid: TransactionId::new(1),
            committed_seq: SequenceNumber::default(),
            stats: StoreStats::new(),
        }
    }

    /// Opens a transaction with an empty pending log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransactionConflict`] if a transaction is
    /// already open. The open transaction is left untouched.
    pub fn begin_transaction(&mut self) -> StoreResult<TransactionId> {
        let txn = self.start_transaction()?;
        let txid = txn.id();
        self.active = Some(txn);
        Ok(txid)
    }

    /// Allocates the next transaction without installing it.
    fn start_transaction(&mut self) -> StoreResult<Transaction<K, V>> {
        if let Some(txn) = &self.active {
            self.stats.record_error();
            return Err(StoreError::transaction_conflict(txn.id()));
        }

        let txid = self.next_txid;
        self.next_txid = txid.next();
        self.stats.record_transaction_start();

        Ok(Transaction::new(txid, self.config.read_strategy))
    }

    /// Records a write in the open transaction's pending log.
    ///
    /// Committed data is not touched until [`commit`](Self::commit).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveTransaction`] when idle; writes outside
    /// a transaction are never applied directly.
    pub fn put(&mut self, key: K, value: V) -> StoreResult<()> {
        let Some(txn) = self.active.as_mut() else {
            self.stats.record_error();
            return Err(StoreError::no_active_transaction(Operation::Put));
        };

        txn.record_put(key, value);
        self.stats.record_write();
        Ok(())
    }

    /// Reads a key.
    ///
    /// While a transaction is open the newest pending write for the key
    /// wins; otherwise, or when the log has no entry for it, the committed
    /// value is returned. `None` means the key is absent from both.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        resolve(self.active.as_ref(), &self.committed, &self.stats, key)
    }

    /// Reads a key from committed state only, ignoring pending writes.
    pub fn get_committed<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.committed.get(key)
    }

    /// Applies every pending write, in order, to committed state and closes
    /// the transaction.
    ///
    /// Later writes to the same key overwrite earlier ones, so the committed
    /// value equals what [`get`](Self::get) returned just before the commit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveTransaction`] when idle. Nothing changes.
    pub fn commit(&mut self) -> StoreResult<SequenceNumber> {
        let Some(txn) = self.active.take() else {
            self.stats.record_error();
            return Err(StoreError::no_active_transaction(Operation::Commit));
        };

        Ok(self.apply(txn))
    }

    /// Replays a pending log into committed state, oldest write first.
    fn apply(&mut self, txn: Transaction<K, V>) -> SequenceNumber {
        let applied = txn.write_count();
        for write in txn.into_writes() {
            let (key, value) = write.into_parts();
            self.committed.insert(key, value);
        }

        self.committed_seq = self.committed_seq.next();
        self.stats.record_transaction_commit(applied);
        self.committed_seq
    }

    /// Discards the pending log and closes the transaction.
    ///
    /// Returns the number of writes that were dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveTransaction`] when idle. Nothing changes.
    pub fn rollback(&mut self) -> StoreResult<usize> {
        let Some(txn) = self.active.take() else {
            self.stats.record_error();
            return Err(StoreError::no_active_transaction(Operation::Rollback));
        };

        Ok(self.discard(txn))
    }

    fn discard(&self, txn: Transaction<K, V>) -> usize {
        let discarded = txn.write_count();
        self.stats.record_transaction_rollback(discarded);
        discarded
    }

    /// Runs `f` inside a new transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back if it
    /// returns `Err` or panics. `f` is not called when the transaction
    /// cannot begin.
    ///
    /// ```rust
    /// use txkv_core::{StoreError, TransactionalStore};
    ///
    /// let mut store = TransactionalStore::new();
    /// store.transaction(|tx| {
    ///     tx.put("a", 1);
    ///     tx.put("b", 2);
    ///     Ok::<_, StoreError>(())
    /// })?;
    /// assert_eq!(store.get("b"), Some(&2));
    /// # Ok::<(), StoreError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransactionConflict`] (converted into `E`) when a
    /// transaction is already open, or the error produced by `f`.
    pub fn transaction<F, T, E>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut TransactionScope<'_, K, V>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut txn = self.start_transaction()?;

        let result = {
            let mut guard = RollbackOnUnwind {
                txn: &mut txn,
                stats: &self.stats,
                armed: true,
            };
            let mut scope = TransactionScope::new(&mut *guard.txn, &self.committed, &self.stats);
            let result = f(&mut scope);
            guard.armed = false;
            result
        };

        match result {
            Ok(value) => {
                self.apply(txn);
                Ok(value)
            }
            Err(err) => {
                self.discard(txn);
                Err(err)
            }
        }
    }

    /// Returns the current transaction state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        match &self.active {
            Some(txn) => TransactionState::Active(txn.id()),
            None => TransactionState::Idle,
        }
    }

    /// Checks if a transaction is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the ID of the open transaction.
    #[must_use]
    pub fn current_transaction(&self) -> Option<TransactionId> {
        self.active.as_ref().map(Transaction::id)
    }

    /// Returns the number of writes in the pending log (zero when idle).
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.active.as_ref().map_or(0, Transaction::write_count)
    }

    /// Returns the pending writes in the order they were made.
    pub fn pending_writes(&self) -> impl Iterator<Item = &PendingWrite<K, V>> + '_ {
        self.active
            .as_ref()
            .into_iter()
            .flat_map(Transaction::pending_writes)
    }

    /// Checks if a key has a committed value.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.committed.contains_key(key)
    }

    /// Returns the number of committed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Checks if no key has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Iterates over committed entries in arbitrary order.
    pub fn committed(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.committed.iter()
    }

    /// Returns the sequence number of the last commit.
    #[must_use]
    pub fn committed_seq(&self) -> SequenceNumber {
        self.committed_seq
    }

    /// Returns the store's configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the store's statistics.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }
}

impl<K, V> Default for TransactionalStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for TransactionalStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalStore")
            .field("committed_len", &self.committed.len())
            .field("committed_seq", &self.committed_seq)
            .field("active", &self.active.is_some())
            .finish_non_exhaustive()
    }
}

/// Counts a scoped transaction as rolled back if its closure unwinds.
///
/// The pending log itself is a local of the unwinding frame, so the store
/// is already Idle and nothing reaches committed state.
struct RollbackOnUnwind<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    txn: &'a mut Transaction<K, V>,
    stats: &'a StoreStats,
    armed: bool,
}

impl<K, V> Drop for RollbackOnUnwind<'_, K, V>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        if self.armed {
            self.stats.record_transaction_rollback(self.txn.write_count());
        }
    }
}

/// Resolves a read: newest pending write first, then committed state.
pub(crate) fn resolve<'a, K, V, Q>(
    txn: Option<&'a Transaction<K, V>>,
    committed: &'a HashMap<K, V>,
    stats: &StoreStats,
    key: &Q,
) -> Option<&'a V>
where
    K: Eq + Hash + Clone + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    if let Some(value) = txn.and_then(|txn| txn.log().lookup(key)) {
        stats.record_read(true);
        return Some(value);
    }
    stats.record_read(false);
    committed.get(key)
}
