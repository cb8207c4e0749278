//! Core type definitions for Tallyring.
//!
//! This module contains the record types fed into buffers and aggregators:
//! - Dynamically typed records ([`Value`])
//! - Numeric projection of records ([`Numeric`])

mod numeric;
mod value;

pub use numeric::{Numeric, Reading};
pub use value::Value;
