//! Concurrent access through `SharedStore`.

use txkv_core::{ReadStrategy, SharedStore, StoreConfig};
use txkv_testkit::{stress_concurrent_increments, stress_concurrent_readers, StressConfig};

#[test]
fn readers_never_observe_torn_commits() {
    let config = StressConfig {
        operations: 400,
        threads: 4,
        writes_per_transaction: 1,
        key_count: 32,
    };

    for strategy in [ReadStrategy::ReverseScan, ReadStrategy::Indexed] {
        let store = SharedStore::with_config(StoreConfig::new().read_strategy(strategy));
        let result = stress_concurrent_readers(store.clone(), &config);

        assert_eq!(result.failed_ops, 0, "torn commit observed");
        assert_eq!(result.successful_ops, 400);
        assert_eq!(store.get_committed("stress_0"), Some(400));
        assert!(!store.is_active());
    }
}

#[test]
fn scoped_increments_are_serialized() {
    let config = StressConfig {
        operations: 800,
        threads: 8,
        ..StressConfig::default()
    };
    let store = SharedStore::new();
    let result = stress_concurrent_increments(store.clone(), &config);

    assert_eq!(result.failed_ops, 0);
    assert_eq!(result.successful_ops, 800);
    assert_eq!(store.get("counter"), Some(800));
    assert_eq!(store.stats().transactions_committed, 800);
}
