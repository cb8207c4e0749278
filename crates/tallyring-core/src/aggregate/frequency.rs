//! Occurrence counts per distinct key.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tallyring_common::utils::hash::FastIndexMap;

use super::Aggregator;

fn clone_key<T: Clone>(record: &T) -> Option<T> {
    Some(record.clone())
}

/// Counts how often each distinct key occurs.
///
/// Keys are reported in first-seen order. Per-key counts do not depend on
/// record order; the key order does. The empty result is an empty list.
pub struct Frequency<T, K = T, F = fn(&T) -> Option<K>> {
    extract: F,
    counts: FastIndexMap<K, u64>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + Eq + Clone> Frequency<T> {
    /// Creates a frequency table keyed by the records themselves.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fn(clone_key::<T>)
    }
}

impl<T: Hash + Eq + Clone> Default for Frequency<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Hash + Eq, F: Fn(&T) -> Option<K>> Frequency<T, K, F> {
    /// Creates a frequency table keyed by what `extract` takes from each
    /// record.
    pub fn from_fn(extract: F) -> Self {
        Self {
            extract,
            counts: FastIndexMap::default(),
            _marker: PhantomData,
        }
    }

    /// Returns how often `key` occurred.
    #[must_use]
    pub fn count_of(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}

impl<T, K: Hash + Eq + Clone, F: Fn(&T) -> Option<K>> Aggregator<T> for Frequency<T, K, F> {
    type Output = Vec<(K, u64)>;

    fn filter_and_aggregate(&mut self, record: &T) {
        if let Some(key) = (self.extract)(record) {
            *self.counts.entry(key).or_insert(0) += 1;
        }
    }

    fn result(&self) -> Vec<(K, u64)> {
        self.counts.iter().map(|(k, &n)| (k.clone(), n)).collect()
    }

    fn reset(&mut self) {
        self.counts.clear();
    }

    fn has_data(&self) -> bool {
        !self.counts.is_empty()
    }
}

impl<T, K: Clone, F: Clone> Clone for Frequency<T, K, F> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            counts: self.counts.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, K: fmt::Debug, F> fmt::Debug for Frequency<T, K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frequency")
            .field("counts", &self.counts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut freq = Frequency::<&str>::new();
        freq.aggregate_all(&["b", "a", "b", "c", "b"]);

        assert_eq!(freq.result(), vec![("b", 3), ("a", 1), ("c", 1)]);
        assert_eq!(freq.count_of(&"b"), 3);
        assert_eq!(freq.count_of(&"z"), 0);
        assert_eq!(freq.distinct(), 3);
    }

    #[test]
    fn test_extractor_skips_records() {
        let mut parity = Frequency::from_fn(|v: &i32| (*v >= 0).then_some(v % 2 == 0));
        parity.aggregate_all(&[1, 2, 4, -3, 6]);

        assert_eq!(parity.count_of(&true), 3);
        assert_eq!(parity.count_of(&false), 1);
    }

    #[test]
    fn test_empty_and_reset() {
        let mut freq = Frequency::<u8>::new();
        assert!(freq.result().is_empty());

        freq.filter_and_aggregate(&7);
        assert!(freq.has_data());

        freq.reset();
        assert!(freq.result().is_empty());
    }
}
