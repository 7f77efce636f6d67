//! Property tests for transaction semantics.

use proptest::prelude::*;
use std::collections::HashMap;
use txkv_core::StoreError;
use txkv_testkit::prelude::*;

/// Commits `writes` in one transaction.
fn commit_writes(store: &mut TestStore, writes: &[(String, i64)]) {
    store.begin_transaction().unwrap();
    for (k, v) in writes {
        store.put(k.clone(), *v).unwrap();
    }
    store.commit().unwrap();
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    /// Arbitrary operation streams behave exactly like the reference model.
    #[test]
    fn store_matches_model(
        strategy in read_strategy_strategy(),
        ops in operation_sequence_strategy(1, 80),
    ) {
        let mut harness = ModelHarness::with_strategy(strategy);
        harness.apply_all(&ops);
        prop_assert_eq!(harness.applied_count(), ops.len());
    }

    /// Uncommitted writes never reach committed state.
    #[test]
    fn isolation_until_commit(
        strategy in read_strategy_strategy(),
        seed in transaction_writes_strategy(10),
        writes in transaction_writes_strategy(10),
    ) {
        let mut store = store_with_strategy(strategy);
        commit_writes(&mut store, &seed);
        let before = committed_snapshot(&store);

        store.begin_transaction().unwrap();
        for (k, v) in &writes {
            store.put(k.clone(), *v).unwrap();
            prop_assert_eq!(&committed_snapshot(&store), &before);
        }
    }

    /// Reads inside a transaction return the newest pending write.
    #[test]
    fn read_your_writes_last_write_wins(
        strategy in read_strategy_strategy(),
        seed in transaction_writes_strategy(10),
        writes in transaction_writes_strategy(20),
    ) {
        let mut store = store_with_strategy(strategy);
        commit_writes(&mut store, &seed);

        store.begin_transaction().unwrap();
        let mut latest: HashMap<String, i64> = HashMap::new();
        for (k, v) in &writes {
            store.put(k.clone(), *v).unwrap();
            latest.insert(k.clone(), *v);
            prop_assert_eq!(store.get(k.as_str()), Some(v));
        }

        // Values seen just before commit are exactly what commit stores.
        let seen: Vec<_> = latest
            .keys()
            .map(|k| (k.clone(), store.get(k.as_str()).copied()))
            .collect();
        store.commit().unwrap();
        for (k, v) in seen {
            prop_assert_eq!(store.get_committed(k.as_str()).copied(), v);
            prop_assert_eq!(Some(latest[&k]), v);
        }
    }

    /// Rollback restores committed state exactly.
    #[test]
    fn rollback_discards_everything(
        strategy in read_strategy_strategy(),
        seed in transaction_writes_strategy(10),
        writes in transaction_writes_strategy(20),
    ) {
        let mut store = store_with_strategy(strategy);
        commit_writes(&mut store, &seed);
        let before = committed_snapshot(&store);

        store.begin_transaction().unwrap();
        for (k, v) in &writes {
            store.put(k.clone(), *v).unwrap();
        }
        prop_assert_eq!(store.rollback().unwrap(), writes.len());

        prop_assert_eq!(committed_snapshot(&store), before);
        prop_assert!(!store.is_active());
        prop_assert_eq!(store.pending_count(), 0);
    }

    /// Terminators while idle always fail and never touch committed state.
    #[test]
    fn idle_terminators_fail(
        seed in transaction_writes_strategy(10),
        attempts in 1usize..5,
    ) {
        let mut store = TestStore::new();
        commit_writes(&mut store, &seed);
        let before = committed_snapshot(&store);
        let seq = store.committed_seq();

        for _ in 0..attempts {
            prop_assert!(store.commit().unwrap_err().is_no_active_transaction());
            prop_assert!(store.rollback().unwrap_err().is_no_active_transaction());
        }
        prop_assert_eq!(committed_snapshot(&store), before);
        prop_assert_eq!(store.committed_seq(), seq);
    }

    /// Beginning twice fails and leaves the open log untouched.
    #[test]
    fn begin_is_not_reentrant(
        strategy in read_strategy_strategy(),
        writes in transaction_writes_strategy(10),
    ) {
        let mut store = store_with_strategy(strategy);
        let txid = store.begin_transaction().unwrap();
        for (k, v) in &writes {
            store.put(k.clone(), *v).unwrap();
        }
        let pending: Vec<_> = store
            .pending_writes()
            .map(|w| (w.key().clone(), *w.value()))
            .collect();

        prop_assert_eq!(
            store.begin_transaction(),
            Err(StoreError::transaction_conflict(txid))
        );
        prop_assert_eq!(store.current_transaction(), Some(txid));
        let after: Vec<_> = store
            .pending_writes()
            .map(|w| (w.key().clone(), *w.value()))
            .collect();
        prop_assert_eq!(after, pending);
    }

    /// Both read strategies observe identical values at every step.
    #[test]
    fn read_strategies_agree(ops in operation_sequence_strategy(1, 60)) {
        let mut scan = ModelHarness::with_strategy(txkv_core::ReadStrategy::ReverseScan);
        let mut indexed = ModelHarness::with_strategy(txkv_core::ReadStrategy::Indexed);
        for op in &ops {
            prop_assert_eq!(scan.apply(op), indexed.apply(op));
        }
    }
}
