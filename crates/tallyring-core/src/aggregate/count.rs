//! Record counting.

use std::fmt;
use std::marker::PhantomData;

use super::Aggregator;

/// Counts every record it is fed.
///
/// Combine with [`AggregatorExt::filter`](super::AggregatorExt::filter) to
/// count only relevant records. The empty result is `0`.
pub struct Count<T: ?Sized> {
    count: u64,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Count<T> {
    /// Creates a new counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Default for Count<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Count<T> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Count<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Count").field("count", &self.count).finish()
    }
}

impl<T: ?Sized> Aggregator<T> for Count<T> {
    type Output = u64;

    fn filter_and_aggregate(&mut self, _record: &T) {
        self.count += 1;
    }

    fn result(&self) -> u64 {
        self.count
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn has_data(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        let count = Count::<str>::new();
        assert_eq!(count.result(), 0);
        assert!(!count.has_data());
    }

    #[test]
    fn test_counts_unsized_records() {
        let mut count = Count::<str>::new();
        count.filter_and_aggregate("a");
        count.filter_and_aggregate("b");
        assert_eq!(count.result(), 2);
        assert_eq!(count.result(), count.result());
    }
}
