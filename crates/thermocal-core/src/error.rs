//! Error types for the calibration pipeline
//!
//! Provides a unified error type for all thermocal crates.
//!
//! Recoverable data conditions (a malformed timestamp, an empty trailing
//! window, a column with no numeric samples, a stdev over a single sample,
//! a detector run that never returns above threshold) are represented as
//! values — dropped rows, [`Cell::Missing`](crate::Cell::Missing), NaN, or
//! `None` — never as errors. `Error` covers caller contract violations only.

use thiserror::Error;

/// Core error type for calibration operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a duration that must not be negative
    pub fn negative_duration(name: &str) -> Self {
        Self::InvalidParameter(format!("{name} must not be negative"))
    }

    /// Create an error for a fraction that must lie in `[0, 1)`
    pub fn invalid_fraction(name: &str, value: f64) -> Self {
        Self::InvalidParameter(format!("{name} {value} must be in [0, 1)"))
    }

    /// Create an error for empty input
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("window duration must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: window duration must be positive"
        );

        let err = Error::InvalidInput("series has no rows".to_string());
        assert_eq!(err.to_string(), "Invalid input: series has no rows");

        let err = Error::InsufficientData {
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 samples, got 1"
        );
    }

    #[test]
    fn test_error_helpers() {
        match Error::negative_duration("required_above") {
            Error::InvalidParameter(msg) => assert!(msg.contains("required_above")),
            other => panic!("unexpected variant: {other:?}"),
        }

        match Error::invalid_fraction("percent_before", 1.5) {
            Error::InvalidParameter(msg) => assert!(msg.contains("1.5")),
            other => panic!("unexpected variant: {other:?}"),
        }

        match Error::empty_input() {
            Error::InsufficientData { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
