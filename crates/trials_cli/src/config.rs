//! Application configuration.
//!
//! Loaded from a TOML file with environment variable overrides:
//!
//! ```toml
//! log_level = "info"
//! export_path = "out/"      # file, or directory for a timestamped name
//!
//! [canvas]
//! width = 640
//! height = 480
//!
//! [run]
//! samples = 307200
//! source_min = -40
//! source_max = 60
//! bins = 50
//!
//! [run.source]
//! kind = "linear_congruential"
//! seed = 7
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use trials_engine::config::{RunConfig, RunConfigBuilder};
use trials_engine::error::ConfigError;

use crate::error::CliError;

/// Default configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "trials.toml";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Canvas dimensions
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Export destination; a directory receives a timestamped file name
    #[serde(default)]
    pub export_path: Option<PathBuf>,

    /// Canvas dimensions
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Run parameters, validated when the run is built
    #[serde(default)]
    pub run: RunConfigBuilder,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            export_path: None,
            canvas: CanvasConfig::default(),
            run: RunConfigBuilder::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path` if it exists, otherwise return the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    ///
    /// Unparseable numeric values are ignored.
    pub fn with_env_override(mut self) -> Self {
        if let Some(samples) = env_parse::<u64>("TRIALS_SAMPLES") {
            self.run = self.run.samples(samples);
        }

        if let Some(seed) = env_parse::<u64>("TRIALS_SOURCE_SEED") {
            self.run = self.run.seed(seed);
        }

        if let Ok(log_level) = std::env::var("TRIALS_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Ok(export_path) = std::env::var("TRIALS_EXPORT_PATH") {
            self.export_path = Some(PathBuf::from(export_path));
        }

        self
    }

    /// Sample count used when none is configured: one per pixel
    pub fn default_samples(&self) -> u64 {
        self.canvas.width.saturating_mul(self.canvas.height) as u64
    }

    /// Builds the run configuration, applying `default_samples` if needed
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        self.run.clone().samples_or(self.default_samples()).build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CliError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.canvas.width == 0 || self.canvas.height == 0 {
            errors.push(format!(
                "canvas dimensions must be positive ({}x{})",
                self.canvas.width, self.canvas.height
            ));
        }

        if let Some(path) = &self.export_path {
            if path.as_os_str().is_empty() {
                errors.push("export_path cannot be empty".to_string());
            }
        }

        if let Err(e) = self.run_config() {
            errors.push(format!("run: {}", e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CliError::Validation(errors))
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trials_core::rng::SourceKind;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.canvas, CanvasConfig { width: 640, height: 480 });
        assert_eq!(config.default_samples(), 307_200);
        assert!(config.validate().is_ok());

        let run = config.run_config().unwrap();
        assert_eq!(run.samples(), 307_200);
        assert_eq!(run.bins(), 50);
    }

    #[test]
    fn test_parse_full_file() {
        let config = AppConfig::parse(
            r#"
            log_level = "debug"
            export_path = "out.csv"

            [canvas]
            width = 100
            height = 50

            [run]
            bins = 10

            [run.source]
            kind = "constant"
            value = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.export_path, Some(PathBuf::from("out.csv")));
        let run = config.run_config().unwrap();
        assert_eq!(run.samples(), 5_000);
        assert_eq!(run.bins(), 10);
        assert_eq!(run.source(), SourceKind::Constant { value: 3 });
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        let result = AppConfig::parse("colour = \"red\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trials.toml");
        std::fs::write(&path, "[run]\nsamples = 1234\n").unwrap();

        let config = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(config.run_config().unwrap().samples(), 1_234);
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("TRIALS_SAMPLES", "4321");
        std::env::set_var("TRIALS_SOURCE_SEED", "17");
        let config = AppConfig::default().with_env_override();
        std::env::remove_var("TRIALS_SAMPLES");
        std::env::remove_var("TRIALS_SOURCE_SEED");

        let run = config.run_config().unwrap();
        assert_eq!(run.samples(), 4_321);
        assert_eq!(run.source(), SourceKind::System { seed: Some(17) });
    }

    #[test]
    fn test_validate_collects_errors() {
        let mut config = AppConfig::default();
        config.log_level = "loud".to_string();
        config.canvas.width = 0;

        match config.validate() {
            Err(CliError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("log_level")));
                assert!(errors.iter().any(|e| e.contains("canvas")));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_reports_run_errors() {
        let config = AppConfig::parse("[run]\nbins = 0\n").unwrap();
        match config.validate() {
            Err(CliError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("bins")));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
