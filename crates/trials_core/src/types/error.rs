//! Error types for structured error handling.
//!
//! All foundation-layer operations report failures through [`CoreError`].
//! Nothing in this crate silently corrects its input.

use thiserror::Error;

/// Categorised foundation errors.
///
/// # Variants
/// - `InvalidArgument`: bad range, non-positive sample index, degenerate domain
/// - `OutOfRange`: a value matched no histogram bin
/// - `EntropyUnavailable`: the operating system refused to provide entropy
///
/// # Examples
/// ```
/// use trials_core::CoreError;
///
/// let err = CoreError::InvalidArgument("min 5 > max 3".to_string());
/// assert_eq!(format!("{}", err), "Invalid argument: min 5 > max 3");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Invalid parameter passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Value exceeds the upper bound of the last histogram bin.
    #[error("Value {value} is beyond the last bin upper bound {upper}")]
    OutOfRange {
        /// Offending value.
        value: f64,
        /// Upper bound of the last bin.
        upper: f64,
    },

    /// Cryptographic entropy source failed.
    #[error("Entropy unavailable: {0}")]
    EntropyUnavailable(String),
}

impl CoreError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Error for an inverted `[min, max]` range.
    pub(crate) fn inverted_range(min: i32, max: i32) -> Self {
        Self::InvalidArgument(format!("min {} > max {}", min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::OutOfRange {
            value: 1.5,
            upper: 1.0,
        };
        assert!(err.to_string().contains("1.5"));
        assert!(err.to_string().contains("upper bound 1"));

        let err = CoreError::inverted_range(7, 2);
        assert_eq!(err.to_string(), "Invalid argument: min 7 > max 2");
    }
}
