//! Extremes and most-recent values.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use tallyring_common::types::Numeric;

use super::Aggregator;

/// Keeps `candidate` if it beats `current` in direction `wanted`.
///
/// Values that do not compare equal to themselves (NaN) never replace
/// anything and are never stored.
fn fold_extreme<V: PartialOrd>(current: &mut Option<V>, candidate: V, wanted: Ordering) {
    if candidate.partial_cmp(&candidate) != Some(Ordering::Equal) {
        return;
    }
    let replace = match current {
        Some(existing) => candidate.partial_cmp(existing) == Some(wanted),
        None => true,
    };
    if replace {
        *current = Some(candidate);
    }
}

/// Numeric reading with `-0.0` folded into `0.0`, so ties between zeros
/// cannot depend on record order.
fn canonical_reading<T: Numeric>(record: &T) -> Option<f64> {
    record.to_f64().map(|v| if v == 0.0 { 0.0 } else { v })
}

macro_rules! extreme_aggregator {
    ($name:ident, $wanted:expr, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Records whose extractor returns `None` are skipped, as are values
        /// that are not comparable with themselves. The empty result is
        /// `None`. With [`from_fn`](Self::from_fn), ties keep the earlier
        /// value; [`new`](Self::new) reports zero as `0.0`, never `-0.0`.
        pub struct $name<T: ?Sized, V = f64, F = fn(&T) -> Option<V>> {
            extract: F,
            best: Option<V>,
            _marker: PhantomData<fn(&T)>,
        }

        impl<T: Numeric> $name<T> {
            /// Creates an aggregator over records that are numbers themselves.
            #[must_use]
            pub fn new() -> Self {
                Self::from_fn(canonical_reading::<T>)
            }
        }

        impl<T: Numeric> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T: ?Sized, V: PartialOrd + Clone, F: Fn(&T) -> Option<V>> $name<T, V, F> {
            /// Creates an aggregator over the value `extract` takes from each
            /// record.
            pub fn from_fn(extract: F) -> Self {
                Self {
                    extract,
                    best: None,
                    _marker: PhantomData,
                }
            }
        }

        impl<T: ?Sized, V: PartialOrd + Clone, F: Fn(&T) -> Option<V>> Aggregator<T>
            for $name<T, V, F>
        {
            type Output = Option<V>;

            fn filter_and_aggregate(&mut self, record: &T) {
                if let Some(value) = (self.extract)(record) {
                    fold_extreme(&mut self.best, value, $wanted);
                }
            }

            fn result(&self) -> Option<V> {
                self.best.clone()
            }

            fn reset(&mut self) {
                self.best = None;
            }

            fn has_data(&self) -> bool {
                self.best.is_some()
            }
        }

        impl<T: ?Sized, V: Clone, F: Clone> Clone for $name<T, V, F> {
            fn clone(&self) -> Self {
                Self {
                    extract: self.extract.clone(),
                    best: self.best.clone(),
                    _marker: PhantomData,
                }
            }
        }

        impl<T: ?Sized, V: fmt::Debug, F> fmt::Debug for $name<T, V, F> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("best", &self.best)
                    .finish_non_exhaustive()
            }
        }
    };
}

extreme_aggregator!(Min, Ordering::Less, "Smallest value seen.");
extreme_aggregator!(Max, Ordering::Greater, "Largest value seen.");

fn clone_record<T: Clone>(record: &T) -> Option<T> {
    Some(record.clone())
}

/// The most recently accepted value.
///
/// Order-sensitive: feeding the same records in a different order can change
/// the result. The empty result is `None`.
pub struct Latest<T, V = T, F = fn(&T) -> Option<V>> {
    extract: F,
    latest: Option<V>,
    accepted: u64,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Clone> Latest<T> {
    /// Creates an aggregator that remembers the last record itself.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fn(clone_record::<T>)
    }
}

impl<T: Clone> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V, F: Fn(&T) -> Option<V>> Latest<T, V, F> {
    /// Creates an aggregator that remembers the last value `extract` takes
    /// from a record.
    pub fn from_fn(extract: F) -> Self {
        Self {
            extract,
            latest: None,
            accepted: 0,
            _marker: PhantomData,
        }
    }

    /// Returns how many records were accepted.
    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}

impl<T, V: Clone, F: Fn(&T) -> Option<V>> Aggregator<T> for Latest<T, V, F> {
    type Output = Option<V>;

    fn filter_and_aggregate(&mut self, record: &T) {
        if let Some(value) = (self.extract)(record) {
            self.latest = Some(value);
            self.accepted += 1;
        }
    }

    fn result(&self) -> Option<V> {
        self.latest.clone()
    }

    fn reset(&mut self) {
        self.latest = None;
        self.accepted = 0;
    }

    fn has_data(&self) -> bool {
        self.accepted > 0
    }
}

impl<T, V: Clone, F: Clone> Clone for Latest<T, V, F> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            latest: self.latest.clone(),
            accepted: self.accepted,
            _marker: PhantomData,
        }
    }
}

impl<T, V: fmt::Debug, F> fmt::Debug for Latest<T, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Latest")
            .field("latest", &self.latest)
            .field("accepted", &self.accepted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_empty() {
        assert_eq!(Min::<f64>::new().result(), None);
        assert_eq!(Max::<i32>::new().result(), None);
    }

    #[test]
    fn test_min_max_numbers() {
        let values = [4, -2, 9, 0];
        let mut min = Min::<i32>::new();
        let mut max = Max::<i32>::new();
        min.aggregate_all(&values);
        max.aggregate_all(&values);

        assert_eq!(min.result(), Some(-2.0));
        assert_eq!(max.result(), Some(9.0));
    }

    #[test]
    fn test_nan_is_never_an_extreme() {
        let mut max = Max::from_fn(|v: &f64| Some(*v));
        max.aggregate_all(&[f64::NAN, 1.0, f64::NAN]);
        assert_eq!(max.result(), Some(1.0));

        let mut only_nan = Min::from_fn(|v: &f64| Some(*v));
        only_nan.filter_and_aggregate(&f64::NAN);
        assert_eq!(only_nan.result(), None);
        assert!(!only_nan.has_data());
    }

    #[test]
    fn test_signed_zeros_ignore_order() {
        for values in [[0.0, -0.0], [-0.0, 0.0]] {
            let mut min = Min::<f64>::new();
            let mut max = Max::<f64>::new();
            min.aggregate_all(&values);
            max.aggregate_all(&values);

            assert_eq!(min.result().map(f64::to_bits), Some(0.0f64.to_bits()));
            assert_eq!(max.result().map(f64::to_bits), Some(0.0f64.to_bits()));
        }
    }

    #[test]
    fn test_extremes_over_strings() {
        let mut first = Min::from_fn(|name: &&str| Some(name.to_string()));
        first.aggregate_all(&["pear", "apple", "quince"]);
        assert_eq!(first.result().as_deref(), Some("apple"));
    }

    #[test]
    fn test_latest_most_recent_wins() {
        let mut latest = Latest::<&str>::new();
        assert_eq!(latest.result(), None);

        latest.aggregate_all(&["X", "Y"]);
        assert_eq!(latest.result(), Some("Y"));
        assert_eq!(latest.accepted(), 2);

        let mut reversed = Latest::<&str>::new();
        reversed.aggregate_all(&["Y", "X"]);
        assert_eq!(reversed.result(), Some("X"));
    }

    #[test]
    fn test_latest_skips_rejected() {
        let mut latest = Latest::from_fn(|v: &i32| (*v >= 0).then_some(*v));
        latest.aggregate_all(&[3, 7, -1]);
        assert_eq!(latest.result(), Some(7));

        latest.reset();
        assert!(!latest.has_data());
    }
}
