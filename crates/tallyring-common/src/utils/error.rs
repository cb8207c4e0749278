//! Error types shared across Tallyring crates.
//!
//! The taxonomy is intentionally small: only construction can fail. Appending
//! to a buffer, feeding an aggregator and reading a result never return an
//! error; bad records are filtered instead.

use thiserror::Error;

/// Result type alias using the Tallyring error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by Tallyring constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A constructor argument is out of range (zero capacity, unsorted
    /// histogram boundaries, quantile outside `[0, 1]`, ...).
    ///
    /// Not retryable without correcting the argument.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Creates an [`Error::InvalidConfiguration`] with the given message.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::invalid_configuration("capacity must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: capacity must be positive, got 0"
        );
    }
}
