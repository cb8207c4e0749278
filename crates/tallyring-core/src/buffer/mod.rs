//! Fixed-capacity, insertion-ordered buffers.
//!
//! A [`BoundedBuffer`] keeps the `capacity` most recently appended items and
//! drops the single oldest one on overflow.
//!
//! # Layout
//!
//! ```text
//!   capacity = 4, after appending A B C D E F
//!
//!   slots = [E, F, C, D]      head = 2 (oldest)
//!                  ^
//!   logical order: C D E F
//!
//!   append(G): slots[head] = G, head = 3
//!   slots = [E, F, G, D]      logical order: D E F G
//! ```
//!
//! Slots grow lazily up to `capacity`; once full, every append overwrites the
//! oldest slot in place, so append and eviction are O(1) with no shifting.
//!
//! # Usage
//!
//! ```
//! use tallyring_core::buffer::BoundedBuffer;
//!
//! let mut buffer = BoundedBuffer::new(3)?;
//! for reading in ["A", "B", "C", "D"] {
//!     buffer.append(reading);
//! }
//! assert_eq!(buffer.snapshot(), vec!["B", "C", "D"]);
//! # Ok::<(), tallyring_common::Error>(())
//! ```

mod bounded;
mod iter;

pub use bounded::BoundedBuffer;
pub use iter::Iter;
