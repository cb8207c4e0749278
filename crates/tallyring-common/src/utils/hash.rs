//! Hashing aliases.
//!
//! Aggregators that group by key use `ahash` instead of the default SipHash.
//! Iteration order of [`FastIndexMap`] is insertion order, independent of the
//! hasher seed, so results stay deterministic.

/// Hasher builder used throughout Tallyring.
pub type FastHasher = ahash::RandomState;

/// Insertion-ordered map keyed with [`FastHasher`].
pub type FastIndexMap<K, V> = indexmap::IndexMap<K, V, FastHasher>;
