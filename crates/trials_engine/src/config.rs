//! Trial run configuration.
//!
//! This module provides the immutable [`RunConfig`] and its builder. The
//! builder applies the two documented auto-corrections (sample count floor,
//! source upper bound bump) and fills in defaults; everything else invalid is
//! rejected.

use serde::{Deserialize, Serialize};
use tracing::warn;
use trials_core::rng::{RandomnessSource, SourceKind};

use crate::error::ConfigError;

/// Smallest sample count a run accepts; smaller requests are raised to it.
pub const MIN_SAMPLES: u64 = 100;

/// Default lower bound of the source domain.
pub const DEFAULT_SOURCE_MIN: i32 = -40;
/// Default upper bound of the source domain.
pub const DEFAULT_SOURCE_MAX: i32 = 60;
/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 50;

/// Configuration of one trial run.
///
/// Use [`RunConfig::builder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use trials_engine::config::RunConfig;
///
/// let config = RunConfig::builder()
///     .samples(10)
///     .source_range(5, 5)
///     .build()
///     .unwrap();
///
/// // Auto-corrected
/// assert_eq!(config.samples(), 100);
/// assert_eq!(config.source_max(), 6);
/// // Midpoint default
/// assert_eq!(config.match_target(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunConfig {
    samples: u64,
    source_min: i32,
    source_max: i32,
    domain_min: f64,
    domain_max: f64,
    bins: usize,
    match_target: i32,
    source: SourceKind,
    progress_every: u64,
}

impl RunConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Number of samples `N`.
    #[inline]
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Source domain lower bound `Lmin`.
    #[inline]
    pub fn source_min(&self) -> i32 {
        self.source_min
    }

    /// Source domain upper bound `Lmax`.
    #[inline]
    pub fn source_max(&self) -> i32 {
        self.source_max
    }

    /// Target domain lower bound `Dmin`.
    #[inline]
    pub fn domain_min(&self) -> f64 {
        self.domain_min
    }

    /// Target domain upper bound `Dmax`.
    #[inline]
    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    /// Histogram bin count.
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Raw value counted as a match.
    #[inline]
    pub fn match_target(&self) -> i32 {
        self.match_target
    }

    /// Selected random source.
    #[inline]
    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Samples between progress events.
    #[inline]
    pub fn progress_every(&self) -> u64 {
        self.progress_every
    }

    /// Builds a fresh source for the selected kind.
    pub fn create_source(&self) -> RandomnessSource {
        RandomnessSource::from_kind(&self.source)
    }

    /// Validates the configuration.
    ///
    /// The target domain is checked where the histogram is constructed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `samples` is below [`MIN_SAMPLES`]
    /// - `source_max <= source_min`
    /// - `bins` or `progress_every` is 0
    /// - `match_target` lies outside the source domain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples < MIN_SAMPLES {
            return Err(ConfigError::invalid(
                "samples",
                format!("{} is below {}", self.samples, MIN_SAMPLES),
            ));
        }
        if self.source_max <= self.source_min {
            return Err(ConfigError::invalid(
                "source_max",
                format!("{} must exceed source_min {}", self.source_max, self.source_min),
            ));
        }
        if self.bins == 0 {
            return Err(ConfigError::invalid("bins", "must be positive"));
        }
        if self.progress_every == 0 {
            return Err(ConfigError::invalid("progress_every", "must be positive"));
        }
        if !(self.source_min..=self.source_max).contains(&self.match_target) {
            return Err(ConfigError::invalid(
                "match_target",
                format!(
                    "{} outside [{}, {}]",
                    self.match_target, self.source_min, self.source_max
                ),
            ));
        }
        Ok(())
    }
}

/// Builder for [`RunConfig`].
///
/// Deserialisable, so a `[run]` table in a config file maps onto it directly;
/// every field is optional there and validated at [`build`](Self::build).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfigBuilder {
    samples: Option<u64>,
    source_min: Option<i32>,
    source_max: Option<i32>,
    domain_min: Option<f64>,
    domain_max: Option<f64>,
    bins: Option<usize>,
    match_target: Option<i32>,
    source: Option<SourceKind>,
    #[serde(skip)]
    seed: Option<u64>,
    progress_every: Option<u64>,
}

impl RunConfigBuilder {
    /// Sets the sample count. Values below [`MIN_SAMPLES`] are raised.
    pub fn samples(mut self, samples: u64) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Sets the sample count only if none was given yet.
    pub fn samples_or(mut self, samples: u64) -> Self {
        self.samples.get_or_insert(samples);
        self
    }

    /// Sets the inclusive source domain `[min, max]`.
    pub fn source_range(mut self, min: i32, max: i32) -> Self {
        self.source_min = Some(min);
        self.source_max = Some(max);
        self
    }

    /// Widest source domain, `[i32::MIN + 1, i32::MAX - 1]`.
    pub fn full_source_range(self) -> Self {
        self.source_range(i32::MIN + 1, i32::MAX - 1)
    }

    /// Sets the target domain `[min, max]`.
    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain_min = Some(min);
        self.domain_max = Some(max);
        self
    }

    /// Sets the histogram bin count.
    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }

    /// Sets the raw value counted as a match.
    pub fn match_target(mut self, target: i32) -> Self {
        self.match_target = Some(target);
        self
    }

    /// Selects the random source.
    pub fn source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    /// Reseeds the selected source (the default source if none was chosen).
    /// Applied at [`build`](Self::build), whatever the call order.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of samples between progress events.
    pub fn progress_every(mut self, every: u64) -> Self {
        self.progress_every = Some(every);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `samples` not set
    /// - `source_min == i32::MAX`, so the upper bound cannot be bumped
    /// - `bins` or `progress_every` is 0
    /// - domain bounds are not finite
    /// - a seed is given to a source that takes none, or does not fit it
    /// - `match_target` lies outside the (corrected) source domain
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let requested = self
            .samples
            .ok_or_else(|| ConfigError::invalid("samples", "must be specified"))?;
        let samples = if requested < MIN_SAMPLES {
            warn!(requested, raised_to = MIN_SAMPLES, "Sample count below minimum");
            MIN_SAMPLES
        } else {
            requested
        };

        let source_min = self.source_min.unwrap_or(DEFAULT_SOURCE_MIN);
        let mut source_max = self.source_max.unwrap_or(DEFAULT_SOURCE_MAX);
        if source_max <= source_min {
            let bumped = source_min.checked_add(1).ok_or_else(|| {
                ConfigError::invalid("source_min", "no room above i32::MAX for source_max")
            })?;
            warn!(source_min, source_max, bumped, "Source upper bound not above lower bound");
            source_max = bumped;
        }

        let domain_min = self.domain_min.unwrap_or(0.0);
        let domain_max = self.domain_max.unwrap_or(1.0);
        if !domain_min.is_finite() || !domain_max.is_finite() {
            return Err(ConfigError::invalid(
                "domain",
                format!("bounds must be finite ([{}, {}])", domain_min, domain_max),
            ));
        }

        let mut source = self.source.unwrap_or_default();
        if let Some(seed) = self.seed {
            source = source
                .with_seed(seed)
                .map_err(|e| ConfigError::invalid("seed", e.to_string()))?;
        }

        let match_target = self
            .match_target
            .unwrap_or_else(|| midpoint(source_min, source_max));

        let config = RunConfig {
            samples,
            source_min,
            source_max,
            domain_min,
            domain_max,
            bins: self.bins.unwrap_or(DEFAULT_BINS),
            match_target,
            source,
            progress_every: self.progress_every.unwrap_or((samples / 100).max(1)),
        };

        config.validate()?;
        Ok(config)
    }
}

/// `(min + max) / 2` truncated toward zero, without overflow.
fn midpoint(min: i32, max: i32) -> i32 {
    ((min as i64 + max as i64) / 2) as i32
}
