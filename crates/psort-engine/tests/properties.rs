//! Property-based tests for psort-engine
//!
//! Sortedness, permutation, stability, idempotence, and agreement between
//! the parallel and sequential paths, over randomly generated inputs.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use proptest::prelude::*;
use psort_engine::{SortConfig, sequential_sort, sequential_sort_all, sort_with_config};

/// Small threshold so most generated inputs take the parallel path
fn parallel_config() -> SortConfig {
    SortConfig::default()
        .with_parallel_threshold(8)
        .with_pool_size(2)
        .with_shutdown_timeout(Duration::from_secs(30))
}

fn counts(values: &[i64]) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Ordered by `key` only; `index` records the input position
#[derive(Debug, Clone, Copy)]
struct Tagged {
    key: i8,
    index: usize,
}

impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tagged {}

impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tagged {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

fn tag(keys: &[i8]) -> Vec<Tagged> {
    keys.iter()
        .enumerate()
        .map(|(index, &key)| Tagged { key, index })
        .collect()
}

fn pairs(tagged: &[Tagged]) -> Vec<(i8, usize)> {
    tagged.iter().map(|t| (t.key, t.index)).collect()
}

// =============================================================================
// Concrete stability scenario
// =============================================================================

#[test]
fn test_stability_scenario() {
    let mut data = tag(&[5, 3, 8, 3, 1]);
    let config = parallel_config().with_parallel_threshold(1);

    sort_with_config(&mut data, &config).unwrap();

    assert_eq!(pairs(&data), vec![(1, 4), (3, 1), (3, 3), (5, 0), (8, 2)]);
}

// =============================================================================
// Sort Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: output is non-decreasing
    #[test]
    fn sort_output_is_sorted(mut values in prop::collection::vec(any::<i64>(), 0..2_000)) {
        sort_with_config(&mut values, &parallel_config()).unwrap();
        prop_assert!(values.is_sorted());
    }

    /// Property: output is a permutation of the input
    #[test]
    fn sort_is_permutation(values in prop::collection::vec(-50i64..50, 0..2_000)) {
        let mut sorted = values.clone();
        sort_with_config(&mut sorted, &parallel_config()).unwrap();
        prop_assert_eq!(sorted.len(), values.len());
        prop_assert_eq!(counts(&sorted), counts(&values));
    }

    /// Property: equal keys keep their input order
    #[test]
    fn sort_is_stable(keys in prop::collection::vec(-4i8..4, 0..1_000)) {
        let mut data = tag(&keys);
        let mut expected = data.clone();
        expected.sort_by_key(|t| t.key);

        sort_with_config(&mut data, &parallel_config()).unwrap();
        prop_assert_eq!(pairs(&data), pairs(&expected));
    }

    /// Property: sorting sorted input changes nothing
    #[test]
    fn sort_is_idempotent(mut values in prop::collection::vec(any::<i64>(), 0..1_000)) {
        values.sort();
        let before = values.clone();
        sort_with_config(&mut values, &parallel_config()).unwrap();
        prop_assert_eq!(values, before);
    }

    /// Property: parallel and sequential paths agree exactly
    #[test]
    fn parallel_matches_sequential(values in prop::collection::vec(any::<i64>(), 0..2_000)) {
        let mut parallel = values.clone();
        let mut sequential = values;
        sort_with_config(&mut parallel, &parallel_config()).unwrap();
        sequential_sort_all(&mut sequential);
        prop_assert_eq!(parallel, sequential);
    }

    /// Property: sequential_sort leaves everything outside its range alone
    #[test]
    fn sequential_subrange_is_confined(
        values in prop::collection::vec(any::<i32>(), 1..500),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let (left, right) = {
            let (x, y) = (a.index(values.len()), b.index(values.len()));
            (x.min(y), x.max(y))
        };
        let mut data = values.clone();
        sequential_sort(&mut data, left, right);

        prop_assert_eq!(&data[..left], &values[..left]);
        prop_assert_eq!(&data[right + 1..], &values[right + 1..]);
        prop_assert!(data[left..=right].is_sorted());
    }
}
