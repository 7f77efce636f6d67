//! Property-based test generators using proptest.
//!
//! Keys are drawn from a small alphabet so that generated sequences hit the
//! same keys repeatedly, which is where last-write-wins and shadowing bugs
//! show up.

use proptest::prelude::*;
use txkv_core::ReadStrategy;

/// Strategy for generating keys from a deliberately small key space.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f]").expect("Invalid regex")
}

/// Strategy for generating values.
pub fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Strategy for picking a read strategy.
pub fn read_strategy_strategy() -> impl Strategy<Value = ReadStrategy> {
    prop_oneof![Just(ReadStrategy::ReverseScan), Just(ReadStrategy::Indexed)]
}

/// A single store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    /// `begin_transaction()`
    Begin,
    /// `put(key, value)`
    Put {
        /// Key
        key: String,
        /// Value
        value: i64,
    },
    /// `get(key)`
    Get {
        /// Key
        key: String,
    },
    /// `commit()`
    Commit,
    /// `rollback()`
    Rollback,
}

/// Strategy for generating store operations.
///
/// Writes and reads dominate; terminators are rarer so transactions
/// usually accumulate a few writes before closing.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        2 => Just(StoreOperation::Begin),
        5 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| StoreOperation::Put { key, value }),
        4 => key_strategy().prop_map(|key| StoreOperation::Get { key }),
        1 => Just(StoreOperation::Commit),
        1 => Just(StoreOperation::Rollback),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Strategy for generating the writes of one transaction.
pub fn transaction_writes_strategy(max_writes: usize) -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec((key_strategy(), value_strategy()), 0..max_writes)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
