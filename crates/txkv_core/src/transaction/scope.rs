//! Scoped access to an open transaction.

use crate::stats::StoreStats;
use crate::store::resolve;
use crate::transaction::state::Transaction;
use crate::types::TransactionId;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Handle passed to the closure of
/// [`TransactionalStore::transaction`](crate::TransactionalStore::transaction).
///
/// The transaction is guaranteed open for the scope's lifetime, so writes
/// cannot fail. Commit and rollback are decided by the closure's result.
pub struct TransactionScope<'a, K, V> {
    txn: &'a mut Transaction<K, V>,
    committed: &'a HashMap<K, V>,
    stats: &'a StoreStats,
}

impl<'a, K, V> TransactionScope<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(
        txn: &'a mut Transaction<K, V>,
        committed: &'a HashMap<K, V>,
        stats: &'a StoreStats,
    ) -> Self {
        Self {
            txn,
            committed,
            stats,
        }
    }

    /// Returns the ID of the scoped transaction.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.txn.id()
    }

    /// Records a write in the pending log.
    pub fn put(&mut self, key: K, value: V) {
        self.txn.record_put(key, value);
        self.stats.record_write();
    }

    /// Reads a key, seeing this transaction's own writes first.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        resolve(Some(&*self.txn), self.committed, self.stats, key)
    }

    /// Returns the number of writes recorded so far.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.txn.write_count()
    }
}

impl<K, V> std::fmt::Debug for TransactionScope<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionScope").finish_non_exhaustive()
    }
}
