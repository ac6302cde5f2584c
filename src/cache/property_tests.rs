//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the compute-if-absent and stale-fallback
//! correctness properties.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{CacheStore, MAX_KEY_LENGTH};

// == Test Configuration ==
const TEST_TTL: u64 = 300;
const TEST_GRACE: u64 = 30;

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Compute { key: String, value: String },
    FailedCompute { key: String },
    Read { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Compute { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::FailedCompute { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Read { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A computed value with a positive TTL is immediately readable and
    // identical to what the compute produced.
    #[test]
    fn prop_compute_then_read_roundtrip(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new();

        let stored = store
            .get_or_compute(&key, || Some(value.clone()), TEST_TTL, false, 0)
            .unwrap();
        prop_assert_eq!(stored, Some(value.clone()));

        let retrieved = store.read(&key, false).unwrap();
        prop_assert_eq!(retrieved, Some(value), "Round-trip value mismatch");
    }

    // While a live entry exists, compute is never invoked and the stored
    // value keeps being returned.
    #[test]
    fn prop_live_entry_short_circuits_compute(
        key in valid_key_strategy(),
        first in valid_value_strategy(),
        second in valid_value_strategy()
    ) {
        let mut store = CacheStore::new();
        store
            .get_or_compute(&key, || Some(first.clone()), TEST_TTL, false, 0)
            .unwrap();

        let mut calls = 0u32;
        let value = store
            .get_or_compute(
                &key,
                || {
                    calls += 1;
                    Some(second)
                },
                TEST_TTL,
                false,
                0,
            )
            .unwrap();

        prop_assert_eq!(value, Some(first), "Live entry must win over recompute");
        prop_assert_eq!(calls, 0, "Compute ran despite a live entry");
    }

    // A failed refresh on an expired entry serves the original value
    // unchanged when stale fallback is on, and the entry is live again
    // afterwards.
    #[test]
    fn prop_stale_fallback_preserves_value(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new();
        store
            .get_or_compute(&key, || Some(value.clone()), TEST_TTL, false, 0)
            .unwrap();
        store.force_expire(&key);

        let served = store
            .get_or_compute(&key, || None, TEST_TTL, true, TEST_GRACE)
            .unwrap();
        prop_assert_eq!(served, Some(value.clone()), "Stale fallback altered the value");

        let after = store.read(&key, false).unwrap();
        prop_assert_eq!(after, Some(value), "Extended entry should be live");
    }

    // A failed refresh with stale fallback off stores nothing and yields
    // no value, whether or not an expired entry exists.
    #[test]
    fn prop_failed_compute_without_stale_yields_none(
        key in valid_key_strategy(),
        seed in proptest::option::of(valid_value_strategy())
    ) {
        let mut store = CacheStore::new();
        if let Some(value) = &seed {
            store
                .get_or_compute(&key, || Some(value.clone()), TEST_TTL, false, 0)
                .unwrap();
            store.force_expire(&key);
        }

        let served = store
            .get_or_compute(&key, || None, TEST_TTL, false, 0)
            .unwrap();
        prop_assert_eq!(served, None);

        let read = store.read(&key, true).unwrap();
        prop_assert_eq!(read, None, "No live value may exist after a failed refresh");
    }

    // After a remove, reads find nothing.
    #[test]
    fn prop_remove_makes_key_absent(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new();
        store
            .get_or_compute(&key, || Some(value), TEST_TTL, false, 0)
            .unwrap();

        prop_assert!(store.remove(&key).unwrap(), "Entry should exist before remove");
        prop_assert_eq!(store.read(&key, false).unwrap(), None);
        prop_assert!(!store.remove(&key).unwrap(), "Second remove must be a no-op");
    }

    // Statistics track an arbitrary operation sequence exactly, as long as
    // nothing expires mid-run (long TTL).
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut expected_refreshes: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Compute { key, value } => {
                    if model.contains_key(&key) {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                        expected_refreshes += 1;
                        model.insert(key.clone(), value.clone());
                    }
                    store
                        .get_or_compute(&key, || Some(value), TEST_TTL, false, 0)
                        .unwrap();
                }
                CacheOp::FailedCompute { key } => {
                    if model.contains_key(&key) {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                    store
                        .get_or_compute(&key, || None, TEST_TTL, false, 0)
                        .unwrap();
                }
                CacheOp::Read { key } => {
                    if model.contains_key(&key) {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                    store.read(&key, false).unwrap();
                }
                CacheOp::Remove { key } => {
                    model.remove(&key);
                    store.remove(&key).unwrap();
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.refreshes, expected_refreshes, "Refreshes mismatch");
        prop_assert_eq!(stats.total_entries, model.len(), "Total entries mismatch");
        prop_assert_eq!(stats.total_entries, store.len());
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[test]
    fn test_key_length_validation() {
        let mut store: CacheStore<String> = CacheStore::new();
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        let result = store.get_or_compute(&long_key, || Some("value".to_string()), TEST_TTL, false, 0);
        assert!(matches!(result, Err(CacheError::KeyTooLong(_))));
    }

    #[test]
    fn test_empty_value_is_a_usable_value() {
        // An empty payload is not a failure: it is stored and served like
        // any other value, and never confused with the None failure arm.
        let mut store: CacheStore<String> = CacheStore::new();

        let value = store
            .get_or_compute("empty", || Some(String::new()), TEST_TTL, false, 0)
            .unwrap();
        assert_eq!(value, Some(String::new()));
        assert_eq!(store.read("empty", false).unwrap(), Some(String::new()));
    }
}
