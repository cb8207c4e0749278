//! Borrowing iterator over a bounded buffer.

use std::iter::FusedIterator;
use std::slice;

/// Iterator over the items of a [`BoundedBuffer`](super::BoundedBuffer),
/// oldest first.
///
/// The ring is stored as two contiguous runs; this walks the older run and
/// then the newer one.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    older: slice::Iter<'a, T>,
    newer: slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(older: &'a [T], newer: &'a [T]) -> Self {
        Self {
            older: older.iter(),
            newer: newer.iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.older.next().or_else(|| self.newer.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.older.len() + self.newer.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.newer.next_back().or_else(|| self.older.next_back())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
