//! Error types for the trials CLI.

use thiserror::Error;
use trials_engine::error::{ConfigError, RunError};

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read or a run parameter was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application configuration failed validation
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Trial run failed
    #[error(transparent)]
    Run(#[from] RunError),

    /// Report could not be rendered
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = CliError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Validation errors: a; b");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::invalid_argument("--value requires --source constant");
        assert!(err.to_string().contains("--value"));
    }
}
