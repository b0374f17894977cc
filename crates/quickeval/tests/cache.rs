//! Tests for LRU eviction order

use proptest::prelude::*;
use quickeval::{CalculationResult, CalculationType, ResultCache};

fn results(value: &str) -> Vec<CalculationResult> {
    vec![CalculationResult::success(value, value, CalculationType::Arithmetic)]
}

#[test]
fn test_capacity_plus_one_evicts_oldest() {
    let cache = ResultCache::new(3).unwrap();
    for key in ["a", "b", "c", "d"] {
        cache.set(key, &results(key));
    }
    assert!(cache.try_get("a").is_none());
    for key in ["b", "c", "d"] {
        assert!(cache.try_get(key).is_some(), "{key} was evicted");
    }
}

#[test]
fn test_hit_protects_entry() {
    let cache = ResultCache::new(3).unwrap();
    for key in ["a", "b", "c"] {
        cache.set(key, &results(key));
    }
    cache.try_get("a");
    cache.set("d", &results("d"));
    cache.set("e", &results("e"));
    assert!(cache.try_get("a").is_some());
    assert!(cache.try_get("b").is_none());
    assert!(cache.try_get("c").is_none());
}

#[test]
fn test_shared_across_threads() {
    let cache = std::sync::Arc::new(ResultCache::new(64).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = std::sync::Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..16 {
                    let key = format!("{t}-{i}");
                    cache.set(&key, &results(&key));
                    assert!(cache.try_get(&key).is_some());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.len(), 64);
}

proptest! {
    /// A hit followed by `capacity - 1` fresh inserts never evicts the hit entry
    #[test]
    fn prop_recent_hit_survives(capacity in 2usize..10) {
        let cache = ResultCache::new(capacity).unwrap();
        for i in 0..capacity {
            cache.set(&format!("old-{i}"), &results("x"));
        }
        prop_assert!(cache.try_get("old-0").is_some());
        for i in 0..capacity - 1 {
            cache.set(&format!("new-{i}"), &results("x"));
        }
        prop_assert!(cache.try_get("old-0").is_some());
        for i in 1..capacity {
            let key = format!("old-{i}");
            prop_assert!(cache.try_get(&key).is_none());
        }
    }
}
