//! Transaction state.

use crate::config::ReadStrategy;
use crate::transaction::log::{PendingLog, PendingWrite};
use crate::types::TransactionId;
use std::hash::Hash;

/// Whether the store currently has a transaction open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction is open; writes are rejected.
    Idle,
    /// A transaction is open and collecting writes.
    Active(TransactionId),
}

impl TransactionState {
    /// Checks if a transaction is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// The open transaction: its ID and its pending log.
#[derive(Debug)]
pub(crate) struct Transaction<K, V> {
    id: TransactionId,
    log: PendingLog<K, V>,
}

impl<K, V> Transaction<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(id: TransactionId, strategy: ReadStrategy) -> Self {
        Self {
            id,
            log: PendingLog::new(strategy),
        }
    }

    pub(crate) fn id(&self) -> TransactionId {
        self.id
    }

    pub(crate) fn log(&self) -> &PendingLog<K, V> {
        &self.log
    }

    pub(crate) fn record_put(&mut self, key: K, value: V) {
        self.log.append(key, value);
    }

    pub(crate) fn write_count(&self) -> usize {
        self.log.len()
    }

    pub(crate) fn pending_writes(&self) -> std::slice::Iter<'_, PendingWrite<K, V>> {
        self.log.iter()
    }

    /// Consumes the transaction, yielding its writes in append order.
    pub(crate) fn into_writes(self) -> std::vec::IntoIter<PendingWrite<K, V>> {
        self.log.into_writes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_txn() -> Transaction<String, Vec<u8>> {
        Transaction::new(TransactionId::new(1), ReadStrategy::ReverseScan)
    }

    #[test]
    fn new_transaction_is_empty() {
        let txn = create_txn();
        assert_eq!(txn.id(), TransactionId::new(1));
        assert_eq!(txn.write_count(), 0);
    }

    #[test]
    fn put_records_write() {
        let mut txn = create_txn();
        txn.record_put("k".to_string(), vec![1, 2, 3]);

        assert_eq!(txn.write_count(), 1);
        assert_eq!(txn.log().lookup("k"), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn repeated_put_keeps_both_entries() {
        let mut txn = create_txn();
        txn.record_put("k".to_string(), vec![1]);
        txn.record_put("k".to_string(), vec![2]);

        assert_eq!(txn.write_count(), 2);
        assert_eq!(txn.log().lookup("k"), Some(&vec![2]));
        let values: Vec<_> = txn.pending_writes().map(|w| w.value().clone()).collect();
        assert_eq!(values, vec![vec![1], vec![2]]);
    }

    #[test]
    fn state_activity() {
        assert!(!TransactionState::Idle.is_active());
        assert!(TransactionState::Active(TransactionId::new(4)).is_active());
    }
}
