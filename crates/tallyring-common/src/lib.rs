//! # tallyring-common
//!
//! Foundation layer for Tallyring: record types, errors, and utilities.
//!
//! This crate provides the building blocks shared by all other Tallyring
//! crates. It has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Record types ([`Value`]) and the [`Numeric`] projection
//! - [`utils`] - Utility functions and helpers (hashing, errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{Numeric, Reading, Value};
pub use utils::error::{Error, Result};
