//! Append-only pending write log.

use crate::config::ReadStrategy;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// A write recorded by `put` inside an open transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite<K, V> {
    key: K,
    value: V,
}

impl<K, V> PendingWrite<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the written key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the written value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Splits the write into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Ordered log of the writes made by the open transaction.
///
/// Entries are only ever appended; the log is consumed whole by commit or
/// dropped whole by rollback.
#[derive(Debug)]
pub(crate) struct PendingLog<K, V> {
    entries: Vec<PendingWrite<K, V>>,
    /// Position of the newest entry per key, kept for `ReadStrategy::Indexed`.
    latest: Option<HashMap<K, usize>>,
}

impl<K, V> PendingLog<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(strategy: ReadStrategy) -> Self {
        let latest = match strategy {
            ReadStrategy::ReverseScan => None,
            ReadStrategy::Indexed => Some(HashMap::new()),
        };
        Self {
            entries: Vec::new(),
            latest,
        }
    }

    pub(crate) fn append(&mut self, key: K, value: V) {
        if let Some(latest) = self.latest.as_mut() {
            latest.insert(key.clone(), self.entries.len());
        }
        self.entries.push(PendingWrite::new(key, value));
    }

    /// Returns the value of the most recent write to `key`, if any.
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.latest {
            Some(latest) => latest
                .get(key)
                .and_then(|&pos| self.entries.get(pos))
                .map(PendingWrite::value),
            None => self
                .entries
                .iter()
                .rev()
                .find(|write| <K as Borrow<Q>>::borrow(&write.key) == key)
                .map(PendingWrite::value),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, PendingWrite<K, V>> {
        self.entries.iter()
    }

    /// Consumes the log, yielding writes in append order.
    pub(crate) fn into_writes(self) -> std::vec::IntoIter<PendingWrite<K, V>> {
        self.entries.into_iter()
    }
}
