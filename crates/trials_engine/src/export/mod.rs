//! Raw/scaled sample export.
//!
//! A run writes one [`ExportRecord`] per sample, in draw order, to an
//! [`ExportSink`] it owns for the run's duration. The sink is opened before
//! the first sample and closed exactly once when the run ends.
//!
//! - [`CsvFileSink`]: `"<raw>;<scaled>\n"` lines, no header
//! - [`MemorySink`]: records kept in memory, shared through a handle

mod csv_sink;
mod memory;

pub use csv_sink::{default_export_file_name, CsvFileSink, DEFAULT_EXPORT_BASENAME};
pub use memory::{ExportBuffer, MemorySink};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One exported sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Raw draw.
    pub raw: i32,
    /// Draw scaled to the target domain.
    pub scaled: f64,
}

/// Export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Underlying I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Write or close before open.
    #[error("Export sink not opened")]
    NotOpen,

    /// Operation after close.
    #[error("Export sink already closed")]
    AlreadyClosed,
}

/// Append-only destination for exported samples.
pub trait ExportSink: Send {
    /// Acquires the destination. Called once, before the first sample.
    fn open(&mut self) -> Result<(), ExportError>;

    /// Appends one record.
    fn write(&mut self, raw: i32, scaled: f64) -> Result<(), ExportError>;

    /// Flushes and releases the destination.
    fn close(&mut self) -> Result<(), ExportError>;
}

/// Lifecycle shared by the bundled sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum SinkPhase {
    #[default]
    New,
    Open,
    Closed,
}

impl SinkPhase {
    pub(crate) fn ensure_open(self) -> Result<(), ExportError> {
        match self {
            Self::New => Err(ExportError::NotOpen),
            Self::Open => Ok(()),
            Self::Closed => Err(ExportError::AlreadyClosed),
        }
    }
}
