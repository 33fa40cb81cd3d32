//! Run results.

use std::time::Duration;

use serde::Serialize;
use trials_core::canvas::{Canvas, MatchCounters};
use trials_core::histogram::Histogram;
use trials_core::stats::RunningStats;

use crate::config::RunConfig;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// All `N` samples processed.
    Completed,
    /// Stopped by the cancellation token.
    Cancelled {
        /// Index of the last processed sample.
        last_index: u64,
    },
    /// Stopped by a fatal error; only seen inside `RunError::Aborted`.
    Aborted {
        /// Index of the sample that failed.
        at_index: u64,
    },
}

/// Final (or partial) artifacts of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Samples fully folded into the statistics.
    pub samples_processed: u64,
    /// Configuration the run used.
    pub config: RunConfig,
    /// Name of the random source.
    pub source: String,
    /// Running mean and variance.
    pub stats: RunningStats,
    /// Frequency histogram of scaled values.
    pub histogram: Histogram,
    /// Match canvas.
    pub canvas: Canvas,
    /// Match counters.
    pub matches: MatchCounters,
    /// Wall time spent in the sampling loop.
    pub elapsed: Duration,
}

impl RunReport {
    /// Samples per second, 0 when no time elapsed.
    pub fn rate(&self) -> f64 {
        sample_rate(self.samples_processed, self.elapsed)
    }

    /// Whether all samples were processed.
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

pub(crate) fn sample_rate(samples: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        samples as f64 / secs
    } else {
        0.0
    }
}
