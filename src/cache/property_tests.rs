//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the page cache against its expiry and capacity rules.

use proptest::prelude::*;
use std::sync::Arc;

use crate::cache::{index_cache_key, PageCache};
use crate::clock::ManualClock;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_DEFAULT_TTL: u64 = 20;

// == Strategies ==
/// Generates index page keys from raw `?page=` values
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(index_cache_key(None)),
        "[0-9]{1,2}".prop_map(|p| index_cache_key(Some(&p))),
        "[a-z]{1,4}".prop_map(|p| index_cache_key(Some(&p))),
    ]
}

/// Generates rendered page bodies
fn body_strategy() -> impl Strategy<Value = String> {
    "\\{\"page_obj\":[a-z0-9 ]{0,64}\\}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, body: String },
    Get { key: String },
    Delete { key: String },
    Tick { secs: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), body_strategy()).prop_map(|(key, body)| CacheOp::Set { key, body }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
        (0i64..30).prop_map(|secs| CacheOp::Tick { secs }),
    ]
}

fn cache(max_entries: usize) -> (PageCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    (
        PageCache::new(clock.clone(), max_entries, TEST_DEFAULT_TTL),
        clock,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses match what the caller observed, whatever the mix of
    // writes, deletes and elapsed time.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut cache, clock) = cache(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, body } => cache.set(key, body, None),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                }
                CacheOp::Tick { secs } => clock.advance_secs(secs),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, cache.len(), "Total entries mismatch");
    }

    // A stored page is served unchanged for exactly its lifetime.
    #[test]
    fn prop_served_until_ttl_elapses(
        key in key_strategy(),
        body in body_strategy(),
        ttl in 1u64..120,
        before in 0u64..120,
    ) {
        let (mut cache, clock) = cache(TEST_MAX_ENTRIES);
        cache.set(key.clone(), body.clone(), Some(ttl));

        let wait = before % ttl;
        clock.advance_secs(wait as i64);
        prop_assert_eq!(cache.get(&key), Some(body));

        clock.advance_secs((ttl - wait) as i64);
        prop_assert_eq!(cache.get(&key), None);
    }

    // Overwriting a key keeps one entry holding the newest body.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        first in body_strategy(),
        second in body_strategy(),
    ) {
        let (mut cache, _clock) = cache(TEST_MAX_ENTRIES);
        cache.set(key.clone(), first, None);
        cache.set(key.clone(), second.clone(), None);

        prop_assert_eq!(cache.get(&key), Some(second));
        prop_assert_eq!(cache.len(), 1);
    }

    // The cache never holds more pages than its bound.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), body_strategy()), 1..200)
    ) {
        let max_entries = 8;
        let (mut cache, _clock) = cache(max_entries);

        for (key, body) in entries {
            cache.set(key, body, None);
            prop_assert!(
                cache.len() <= max_entries,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_entries
            );
        }
    }

    // After clear nothing is served, whatever was stored.
    #[test]
    fn prop_clear_empties(
        entries in prop::collection::vec((key_strategy(), body_strategy()), 0..30)
    ) {
        let (mut cache, _clock) = cache(TEST_MAX_ENTRIES);
        let keys: Vec<String> = entries.iter().map(|(k, _)| k.clone()).collect();
        for (key, body) in entries {
            cache.set(key, body, None);
        }

        cache.clear();
        prop_assert!(cache.is_empty());
        for key in keys {
            prop_assert_eq!(cache.get(&key), None);
        }
    }
}

// == Concurrency ==
#[test]
fn test_concurrent_access_through_lock() {
    use tokio::sync::RwLock;

    let (cache, _clock) = cache(TEST_MAX_ENTRIES);
    let cache = Arc::new(RwLock::new(cache));

    tokio_test::block_on(async {
        let mut handles = Vec::new();
        for i in 0..10 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let key = index_cache_key(Some(&i.to_string()));
                cache.write().await.set(key.clone(), format!("body {}", i), None);
                cache.write().await.get(&key)
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            let got = handle.await.unwrap();
            assert_eq!(got, Some(format!("body {}", i)));
        }
    });

    assert_eq!(tokio_test::block_on(cache.read()).len(), 10);
}
