//! Model-checking harness.
//!
//! [`ModelHarness`] drives a real store and a deliberately naive reference
//! model side by side, asserting after every step that both agree.

use crate::fixtures::{store_with_strategy, TestStore};
use crate::generators::StoreOperation;
use std::collections::HashMap;
use txkv_core::{Operation, ReadStrategy, StoreError};

/// Observable result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The operation succeeded and returned nothing of interest.
    Done,
    /// A read returned this value.
    Value(Option<i64>),
    /// The store rejected the operation.
    Rejected(StoreError),
}

/// Reference model: committed map plus a plain vector for the open log.
#[derive(Debug, Default)]
struct Model {
    committed: HashMap<String, i64>,
    pending: Option<Vec<(String, i64)>>,
}

impl Model {
    fn get(&self, key: &str) -> Option<i64> {
        self.pending
            .iter()
            .flat_map(|log| log.iter().rev())
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
            .or_else(|| self.committed.get(key).copied())
    }
}

/// A test harness that checks a store against a reference model.
pub struct ModelHarness {
    /// The store under test.
    pub store: TestStore,
    model: Model,
    applied: usize,
}

impl ModelHarness {
    /// Creates a harness with a default store.
    pub fn new() -> Self {
        Self::with_strategy(ReadStrategy::default())
    }

    /// Creates a harness whose store uses the given read strategy.
    pub fn with_strategy(strategy: ReadStrategy) -> Self {
        Self {
            store: store_with_strategy(strategy),
            model: Model::default(),
            applied: 0,
        }
    }

    /// Applies one operation to both store and model and checks they agree.
    ///
    /// # Panics
    ///
    /// Panics when the store's outcome or resulting state diverges from the model.
    pub fn apply(&mut self, op: &StoreOperation) -> OperationOutcome {
        let before = self.model.committed.clone();

        let (actual, expected) = match op {
            StoreOperation::Begin => {
                let actual = self.store.begin_transaction().map(|_| ());
                let expected = if self.model.pending.is_some() {
                    Err(())
                } else {
                    self.model.pending = Some(Vec::new());
                    Ok(())
                };
                (actual, expected)
            }
            StoreOperation::Put { key, value } => {
                let actual = self.store.put(key.clone(), *value);
                let expected = match self.model.pending.as_mut() {
                    Some(log) => {
                        log.push((key.clone(), *value));
                        Ok(())
                    }
                    None => Err(()),
                };
                (actual, expected)
            }
            StoreOperation::Get { key } => {
                let actual = self.store.get(key.as_str()).copied();
                let expected = self.model.get(key);
                assert_eq!(actual, expected, "read mismatch for key {key:?}");
                self.applied += 1;
                return OperationOutcome::Value(actual);
            }
            StoreOperation::Commit => {
                let actual = self.store.commit().map(|_| ());
                let expected = match self.model.pending.take() {
                    Some(log) => {
                        self.model.committed.extend(log);
                        Ok(())
                    }
                    None => Err(()),
                };
                (actual, expected)
            }
            StoreOperation::Rollback => {
                let actual = self.store.rollback().map(|_| ());
                let expected = self.model.pending.take().map(|_| ()).ok_or(());
                (actual, expected)
            }
        };

        self.applied += 1;
        match (actual, expected) {
            (Ok(()), Ok(())) => {
                self.verify();
                OperationOutcome::Done
            }
            (Err(err), Err(())) => {
                Self::check_rejection(op, &err);
                assert_eq!(
                    self.model.committed, before,
                    "model changed on a rejected operation"
                );
                self.verify();
                OperationOutcome::Rejected(err)
            }
            (actual, expected) => panic!(
                "outcome mismatch for {op:?}: store {actual:?}, model {}",
                if expected.is_ok() { "ok" } else { "rejected" }
            ),
        }
    }

    /// Applies a whole sequence, returning each outcome.
    pub fn apply_all(&mut self, ops: &[StoreOperation]) -> Vec<OperationOutcome> {
        ops.iter().map(|op| self.apply(op)).collect()
    }

    /// Verifies the store's committed state and transaction flag match the model.
    ///
    /// # Panics
    ///
    /// Panics on any divergence.
    pub fn verify(&self) {
        assert_eq!(
            self.store.len(),
            self.model.committed.len(),
            "committed key count mismatch"
        );
        for (key, expected) in &self.model.committed {
            assert_eq!(
                self.store.get_committed(key.as_str()),
                Some(expected),
                "committed value mismatch for {key:?}"
            );
        }
        assert_eq!(
            self.store.is_active(),
            self.model.pending.is_some(),
            "transaction flag mismatch"
        );
        assert_eq!(
            self.store.pending_count(),
            self.model.pending.as_ref().map_or(0, Vec::len),
            "pending log length mismatch"
        );
    }

    /// Returns the number of operations applied.
    pub fn applied_count(&self) -> usize {
        self.applied
    }

    fn check_rejection(op: &StoreOperation, err: &StoreError) {
        let operation = match op {
            StoreOperation::Begin => {
                assert!(err.is_conflict(), "unexpected error {err:?}");
                return;
            }
            StoreOperation::Put { .. } => Operation::Put,
            StoreOperation::Commit => Operation::Commit,
            StoreOperation::Rollback => Operation::Rollback,
            StoreOperation::Get { .. } => panic!("reads never fail"),
        };
        assert_eq!(err, &StoreError::no_active_transaction(operation));
    }
}

impl Default for ModelHarness {
    fn default() -> Self {
        Self::new()
    }
}
