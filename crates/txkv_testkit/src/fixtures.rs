//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use std::collections::BTreeMap;
use std::hash::Hash;
use txkv_core::{ReadStrategy, StoreConfig, TransactionalStore};

/// The store type used throughout the test suites.
pub type TestStore = TransactionalStore<String, i64>;

/// Both read strategies, for running a check against each.
pub const ALL_READ_STRATEGIES: [ReadStrategy; 2] =
    [ReadStrategy::ReverseScan, ReadStrategy::Indexed];

/// Creates an empty store using the given read strategy.
pub fn store_with_strategy(strategy: ReadStrategy) -> TestStore {
    TransactionalStore::with_config(StoreConfig::new().read_strategy(strategy))
}

/// Runs a test with a fresh default store.
///
/// # Example
///
/// ```rust,ignore
/// use txkv_testkit::with_store;
///
/// #[test]
/// fn my_test() {
///     with_store(|store| {
///         store.begin_transaction().unwrap();
///         // ... test operations
///     });
/// }
/// ```
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut TestStore) -> R,
{
    let mut store = TestStore::new();
    f(&mut store)
}

/// Runs a test once per read strategy, each time with a fresh store.
pub fn with_each_strategy<F>(mut f: F)
where
    F: FnMut(ReadStrategy, &mut TestStore),
{
    for strategy in ALL_READ_STRATEGIES {
        let mut store = store_with_strategy(strategy);
        f(strategy, &mut store);
    }
}

/// Returns the committed state as an ordered map, for whole-store comparisons.
pub fn committed_snapshot<K, V>(store: &TransactionalStore<K, V>) -> BTreeMap<K, V>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
{
    store
        .committed()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Name of the `i`-th key written by [`populated_store`].
    pub fn key_name(i: usize) -> String {
        format!("key_{i}")
    }

    /// Creates a store with `count` committed keys, `key_{i}` -> `i`.
    pub fn populated_store(count: usize) -> TestStore {
        let mut store = TestStore::new();
        store
            .transaction(|tx| {
                for i in 0..count {
                    tx.put(key_name(i), i as i64);
                }
                Ok::<_, txkv_core::StoreError>(())
            })
            .expect("Failed to populate store");
        store
    }

    /// Creates a populated store with a transaction left open that
    /// overwrites every key with its negation.
    pub fn store_with_open_transaction(count: usize) -> TestStore {
        let mut store = populated_store(count);
        store.begin_transaction().expect("Failed to begin transaction");
        for i in 0..count {
            store
                .put(key_name(i), -(i as i64))
                .expect("Failed to put");
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_store() {
        let len = with_store(|store| {
            store.begin_transaction().unwrap();
            store.put("a".to_string(), 1).unwrap();
            store.commit().unwrap();
            store.len()
        });
        assert_eq!(len, 1);
    }

    #[test]
    fn test_each_strategy_gets_fresh_store() {
        let mut seen = Vec::new();
        with_each_strategy(|strategy, store| {
            assert!(store.is_empty());
            assert_eq!(store.config().read_strategy, strategy);
            seen.push(strategy);
        });
        assert_eq!(seen, ALL_READ_STRATEGIES.to_vec());
    }

    #[test]
    fn test_populated_scenario() {
        let store = scenarios::populated_store(10);
        assert_eq!(store.len(), 10);
        assert_eq!(store.get("key_3"), Some(&3));
        assert!(!store.is_active());
    }

    #[test]
    fn test_open_transaction_scenario() {
        let store = scenarios::store_with_open_transaction(4);
        assert!(store.is_active());
        assert_eq!(store.get("key_2"), Some(&-2));
        assert_eq!(store.get_committed("key_2"), Some(&2));
        assert_eq!(committed_snapshot(&store).len(), 4);
    }
}
