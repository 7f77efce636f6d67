//! Error types for the transactional store.

use crate::types::TransactionId;
use std::fmt;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Operations that require an open transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `put`
    Put,
    /// `commit`
    Commit,
    /// `rollback`
    Rollback,
}

impl Operation {
    /// Returns the lowercase operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Put => "put",
            Self::Commit => "commit",
            Self::Rollback => "rollback",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Illegal state transitions reported by the store.
///
/// Neither variant leaves the store modified: a failed call is a no-op for
/// the committed map, the pending log and the transaction flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `begin_transaction` was called while a transaction is already open.
    #[error("transaction already in progress ({active})")]
    TransactionConflict {
        /// The transaction that is currently open.
        active: TransactionId,
    },

    /// A write or a transaction terminator was called while idle.
    #[error("no transaction is currently active (cannot {operation})")]
    NoActiveTransaction {
        /// The operation that was rejected.
        operation: Operation,
    },
}

impl StoreError {
    /// Creates a transaction conflict error.
    pub fn transaction_conflict(active: TransactionId) -> Self {
        Self::TransactionConflict { active }
    }

    /// Creates a no-active-transaction error.
    pub fn no_active_transaction(operation: Operation) -> Self {
        Self::NoActiveTransaction { operation }
    }

    /// Returns true for [`StoreError::TransactionConflict`].
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::TransactionConflict { .. })
    }

    /// Returns true for [`StoreError::NoActiveTransaction`].
    #[must_use]
    pub fn is_no_active_transaction(&self) -> bool {
        matches!(self, Self::NoActiveTransaction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = StoreError::transaction_conflict(TransactionId::new(7));
        assert_eq!(err.to_string(), "transaction already in progress (txn:7)");

        let err = StoreError::no_active_transaction(Operation::Rollback);
        assert_eq!(
            err.to_string(),
            "no transaction is currently active (cannot rollback)"
        );
    }

    #[test]
    fn predicates() {
        assert!(StoreError::transaction_conflict(TransactionId::new(1)).is_conflict());
        assert!(StoreError::no_active_transaction(Operation::Put).is_no_active_transaction());
        assert!(!StoreError::no_active_transaction(Operation::Commit).is_conflict());
    }
}
