//! CSV file export.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Terminator, Writer, WriterBuilder};
use tracing::info;

use super::{ExportError, ExportSink, SinkPhase};

/// Basename used when the caller does not supply one.
pub const DEFAULT_EXPORT_BASENAME: &str = "trials.csv";

/// `"<yyMMdd_HHmm>-<basename>"` for the current local time.
pub fn default_export_file_name(basename: &str) -> String {
    format!("{}-{}", chrono::Local::now().format("%y%m%d_%H%M"), basename)
}

/// Writes `"<raw>;<scaled>\n"` per sample to a file.
///
/// Numbers use Rust's `Display`, which is locale-independent: `.` is always
/// the decimal point.
///
/// # Examples
///
/// ```rust
/// use trials_engine::export::{CsvFileSink, ExportSink};
///
/// let dir = std::env::temp_dir().join("trials_doc_export");
/// std::fs::create_dir_all(&dir).unwrap();
/// let path = dir.join("doc.csv");
///
/// let mut sink = CsvFileSink::new(&path);
/// sink.open().unwrap();
/// sink.write(10, 0.5).unwrap();
/// sink.close().unwrap();
///
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "10;0.5\n");
/// # std::fs::remove_file(path).ok();
/// ```
#[derive(Debug)]
pub struct CsvFileSink {
    destination: PathBuf,
    writer: Option<Writer<File>>,
    phase: SinkPhase,
    written: u64,
}

impl CsvFileSink {
    /// Creates a sink for `destination`. Nothing is touched until `open`.
    pub fn new(destination: impl AsRef<Path>) -> Self {
        Self {
            destination: destination.as_ref().to_path_buf(),
            writer: None,
            phase: SinkPhase::New,
            written: 0,
        }
    }

    /// Target file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Records written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl ExportSink for CsvFileSink {
    fn open(&mut self) -> Result<(), ExportError> {
        match self.phase {
            SinkPhase::New => {}
            SinkPhase::Open => return Ok(()),
            SinkPhase::Closed => return Err(ExportError::AlreadyClosed),
        }

        let writer = WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_path(&self.destination)?;

        self.writer = Some(writer);
        self.phase = SinkPhase::Open;
        Ok(())
    }

    fn write(&mut self, raw: i32, scaled: f64) -> Result<(), ExportError> {
        self.phase.ensure_open()?;
        let writer = self.writer.as_mut().ok_or(ExportError::NotOpen)?;
        writer.write_record([raw.to_string(), scaled.to_string()])?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), ExportError> {
        self.phase.ensure_open()?;
        self.phase = SinkPhase::Closed;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }

        info!(
            path = %self.destination.display(),
            records = self.written,
            "Samples exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let mut sink = CsvFileSink::new(&path);
        sink.open().unwrap();
        sink.write(-40, 0.0).unwrap();
        sink.write(10, 0.5).unwrap();
        sink.write(60, 1.0).unwrap();
        sink.write(7, 0.47).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "-40;0\n10;0.5\n60;1\n7;0.47\n");
        assert_eq!(sink.written(), 4);
    }

    #[test]
    fn test_lifecycle_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvFileSink::new(dir.path().join("x.csv"));

        assert!(matches!(sink.write(1, 0.1), Err(ExportError::NotOpen)));
        assert!(matches!(sink.close(), Err(ExportError::NotOpen)));

        sink.open().unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.close(), Err(ExportError::AlreadyClosed)));
        assert!(matches!(sink.write(1, 0.1), Err(ExportError::AlreadyClosed)));
        assert!(matches!(sink.open(), Err(ExportError::AlreadyClosed)));
    }

    #[test]
    fn test_open_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvFileSink::new(dir.path().join("missing").join("x.csv"));
        assert!(sink.open().is_err());
    }

    #[test]
    fn test_default_file_name() {
        let name = default_export_file_name(DEFAULT_EXPORT_BASENAME);
        assert!(name.ends_with("-trials.csv"));
        // yyMMdd_HHmm
        assert_eq!(name.len(), "000000_0000-trials.csv".len());
        assert_eq!(&name[6..7], "_");
    }
}
