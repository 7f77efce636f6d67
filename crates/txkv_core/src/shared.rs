//! Thread-safe store handle.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::stats::StatsSnapshot;
use crate::store::TransactionalStore;
use crate::transaction::TransactionScope;
use crate::types::{SequenceNumber, TransactionId};
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

/// A cloneable handle to one [`TransactionalStore`] shared between threads.
///
/// There is still exactly one transaction at a time for the whole store:
/// every clone sees and writes to the same pending log. Reads take a shared
/// lock and everything that changes state takes the exclusive lock, so a
/// commit's replay is never observed half-applied.
pub struct SharedStore<K, V> {
    inner: Arc<RwLock<TransactionalStore<K, V>>>,
}

impl<K, V> SharedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty shared store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(TransactionalStore::new())
    }

    /// Creates an empty shared store with a custom configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self::from_store(TransactionalStore::with_config(config))
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: TransactionalStore<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// See [`TransactionalStore::begin_transaction`].
    pub fn begin_transaction(&self) -> StoreResult<TransactionId> {
        self.inner.write().begin_transaction()
    }

    /// See [`TransactionalStore::put`].
    pub fn put(&self, key: K, value: V) -> StoreResult<()> {
        self.inner.write().put(key, value)
    }

    /// Reads a key and clones its value out of the lock.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().get(key).cloned()
    }

    /// Reads a key from committed state only.
    pub fn get_committed<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().get_committed(key).cloned()
    }

    /// See [`TransactionalStore::commit`].
    pub fn commit(&self) -> StoreResult<SequenceNumber> {
        self.inner.write().commit()
    }

    /// See [`TransactionalStore::rollback`].
    pub fn rollback(&self) -> StoreResult<usize> {
        self.inner.write().rollback()
    }

    /// Runs a scoped transaction while holding the exclusive lock.
    ///
    /// See [`TransactionalStore::transaction`].
    pub fn transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut TransactionScope<'_, K, V>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.inner.write().transaction(f)
    }

    /// Checks if a transaction is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.read().is_active()
    }

    /// Returns the sequence number of the last commit.
    #[must_use]
    pub fn committed_seq(&self) -> SequenceNumber {
        self.inner.read().committed_seq()
    }

    /// Returns a snapshot of the store's statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats().snapshot()
    }

    /// Runs `f` with shared access; no commit can interleave.
    pub fn read<R>(&self, f: impl FnOnce(&TransactionalStore<K, V>) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Runs `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut TransactionalStore<K, V>) -> R) -> R {
        f(&mut *self.inner.write())
    }
}

impl<K, V> Clone for SharedStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for SharedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for SharedStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}
