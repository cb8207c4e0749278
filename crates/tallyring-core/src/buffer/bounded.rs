//! Ring-backed bounded buffer.

use std::fmt;
use std::num::NonZeroUsize;

use tallyring_common::utils::error::{Error, Result};

use super::Iter;

/// Smallest number of slots reserved when the buffer first grows.
const MIN_GROWTH: usize = 4;

/// Keeps the `capacity` most recently appended items in arrival order.
///
/// Appending to a full buffer evicts exactly one item: the oldest. The buffer
/// exclusively owns its items and has no interior mutability, so sharing it
/// across threads needs an external lock.
#[derive(Clone)]
pub struct BoundedBuffer<T> {
    /// Ring storage, never longer than `capacity`.
    slots: Vec<T>,
    /// Physical index of the oldest item. Stays 0 until the ring is full.
    head: usize,
    /// Maximum number of retained items.
    capacity: NonZeroUsize,
    /// Items dropped by overflow since construction or the last clear.
    evicted: u64,
}

impl<T> BoundedBuffer<T> {
    /// Creates an empty buffer that retains at most `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or_else(|| {
                Error::invalid_configuration(format!(
                    "buffer capacity must be positive, got {capacity}"
                ))
            })
    }

    /// Creates an empty buffer from an already validated capacity.
    ///
    /// No slots are allocated until the first append.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
            capacity,
            evicted: 0,
        }
    }

    /// Appends a value as the newest item.
    ///
    /// If the buffer was already full, the oldest item is removed and
    /// returned. Always succeeds.
    pub fn append(&mut self, value: T) -> Option<T> {
        let capacity = self.capacity.get();
        if self.slots.len() < capacity {
            self.grow_for_push(capacity);
            self.slots.push(value);
            return None;
        }

        let oldest = std::mem::replace(&mut self.slots[self.head], value);
        self.head = (self.head + 1) % capacity;
        self.evicted += 1;
        Some(oldest)
    }

    /// Reserves room for one more slot without ever reserving past capacity.
    fn grow_for_push(&mut self, capacity: usize) {
        let len = self.slots.len();
        if len == self.slots.capacity() {
            let additional = len.max(MIN_GROWTH).min(capacity - len);
            self.slots.reserve_exact(additional);
        }
    }

    /// Returns a copy of the contents, oldest first.
    ///
    /// The copy is detached from the buffer; mutating it has no effect on the
    /// buffer.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        let (older, newer) = self.as_slices();
        let mut items = Vec::with_capacity(self.slots.len());
        items.extend_from_slice(older);
        items.extend_from_slice(newer);
        items
    }

    /// Removes all items. Capacity is unchanged and the eviction counter
    /// restarts at zero.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
        self.evicted = 0;
    }

    /// Returns the number of items currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Alias of [`len`](Self::len).
    #[must_use]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Returns the maximum number of items the buffer retains.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns true if the buffer holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if the next append will evict.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity.get()
    }

    /// Returns the number of items dropped by overflow since construction or
    /// the last [`clear`](Self::clear).
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Returns the item at logical position `index` (0 is the oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        let len = self.slots.len();
        if index >= len {
            return None;
        }
        self.slots.get((self.head + index) % len)
    }

    /// Returns the oldest item.
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the most recently appended item.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.slots.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// Returns an iterator over the items, oldest first.
    pub fn iter(&self) -> Iter<'_, T> {
        let (older, newer) = self.as_slices();
        Iter::new(older, newer)
    }

    /// Returns the contents as two slices; the first holds the older items.
    ///
    /// The second slice is empty unless the ring has wrapped.
    #[must_use]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (newer, older) = self.slots.split_at(self.head);
        (older, newer)
    }

    /// Rotates the storage so the items are contiguous, oldest first, and
    /// returns them as one slice. Logical contents are unchanged.
    pub fn make_contiguous(&mut self) -> &[T] {
        self.slots.rotate_left(self.head);
        self.head = 0;
        &self.slots
    }

    /// Consumes the buffer and returns its items, oldest first.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<T> {
        self.slots.rotate_left(self.head);
        self.slots
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity)
            .field("items", &self.iter().collect::<Vec<_>>())
            .field("evicted", &self.evicted)
            .finish()
    }
}

impl<T: PartialEq> PartialEq for BoundedBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity
            && self.len() == other.len()
            && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for BoundedBuffer<T> {}

impl<T> Extend<T> for BoundedBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for BoundedBuffer<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a BoundedBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for BoundedBuffer<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
