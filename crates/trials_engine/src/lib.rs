//! # trials_engine: Trial Run Orchestration
//!
//! ## Layer 2 Role
//!
//! trials_engine composes the Layer 1 pieces from `trials_core` into one
//! trial run:
//! - Run configuration with validation and documented auto-corrections (`config`)
//! - The cancellable sampling loop and its state machine (`runner`)
//! - Throttled progress notification (`progress`)
//! - Ordered raw/scaled sample export (`export`)
//!
//! ## Data Flow
//!
//! ```text
//! RandomnessSource -> scale -> Histogram + PixelMapper + RunningStats
//!                           -> ExportSink (optional)
//!                           -> ProgressSink (every `progress_every` samples)
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use trials_engine::prelude::*;
//!
//! let config = RunConfig::builder()
//!     .samples(1_000)
//!     .source(SourceKind::LinearCongruential { seed: 0 })
//!     .build()
//!     .unwrap();
//!
//! let runner = TrialRunner::new(32, 32).unwrap();
//! let report = runner
//!     .run_blocking(&config, config.create_source(), None, None, &CancellationToken::new())
//!     .unwrap();
//!
//! assert_eq!(report.outcome, RunOutcome::Completed);
//! assert_eq!(report.histogram.total(), 1_000);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod progress;
pub mod runner;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{RunConfig, RunConfigBuilder, MIN_SAMPLES};
    pub use crate::error::{ConfigError, RunError};
    pub use crate::export::{
        CsvFileSink, ExportBuffer, ExportError, ExportRecord, ExportSink, MemorySink,
    };
    pub use crate::progress::{
        ChannelProgress, ProgressEvent, ProgressSink, ProgressUpdate, SharedProgress,
    };
    pub use crate::runner::{
        CancellationToken, RunHandle, RunOutcome, RunReport, RunState, TrialRunner,
    };
    pub use trials_core::rng::{RandomSource, RandomnessSource, SourceKind};
}
