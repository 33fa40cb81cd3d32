//! Error types for trial runs.

use thiserror::Error;
use trials_core::CoreError;

use crate::export::ExportError;
use crate::runner::RunReport;

/// Configuration error for trial runs.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// IO error reading a config file
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error in a config file
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
        }
    }
}

/// Trial run error.
#[derive(Debug, Error)]
pub enum RunError {
    /// Run configuration rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid argument or out-of-range value from the numeric layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Operation not allowed in the runner's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Export sink failure.
    #[error("Export failure: {0}")]
    Export(#[from] ExportError),

    /// Worker thread could not be spawned.
    #[error("Failed to spawn run worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// Worker thread panicked.
    #[error("Run worker panicked")]
    WorkerPanicked,

    /// Run stopped by a fatal error; state up to that point is preserved.
    #[error("Run aborted after {} samples: {cause}", .partial.samples_processed)]
    Aborted {
        /// The failure that stopped the run.
        cause: Box<RunError>,
        /// Results as of the last completed sample.
        partial: Box<RunReport>,
    },
}

impl RunError {
    /// Partial results when the run was aborted.
    pub fn partial(&self) -> Option<&RunReport> {
        match self {
            Self::Aborted { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Innermost cause, unwrapping `Aborted`.
    pub fn root(&self) -> &RunError {
        match self {
            Self::Aborted { cause, .. } => cause.root(),
            other => other,
        }
    }

    pub(crate) fn aborted(cause: RunError, partial: RunReport) -> Self {
        Self::Aborted {
            cause: Box::new(cause),
            partial: Box::new(partial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("bins", "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter 'bins': must be positive");
    }

    #[test]
    fn test_run_error_from_core() {
        let err: RunError = CoreError::invalid_argument("bad").into();
        assert!(matches!(err.root(), RunError::Core(CoreError::InvalidArgument(_))));
        assert!(err.partial().is_none());
        assert_eq!(err.to_string(), "Invalid argument: bad");
    }
}
