//! In-memory export.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{ExportError, ExportRecord, ExportSink, SinkPhase};

/// Shared view of the records a [`MemorySink`] collected.
#[derive(Debug, Clone, Default)]
pub struct ExportBuffer {
    inner: Arc<Mutex<BufferState>>,
}

#[derive(Debug, Default)]
struct BufferState {
    records: Vec<ExportRecord>,
    closes: u32,
}

impl ExportBuffer {
    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the records written so far.
    pub fn records(&self) -> Vec<ExportRecord> {
        self.lock().records.clone()
    }

    /// Number of records written so far.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// True when nothing was written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the sink was closed.
    pub fn close_count(&self) -> u32 {
        self.lock().closes
    }
}

/// Collects records in memory.
///
/// The sink moves into the run; keep the [`ExportBuffer`] from
/// [`buffer`](Self::buffer) to read the records afterwards.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: ExportBuffer,
    phase: SinkPhase,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the collected records.
    pub fn buffer(&self) -> ExportBuffer {
        self.buffer.clone()
    }
}

impl ExportSink for MemorySink {
    fn open(&mut self) -> Result<(), ExportError> {
        if self.phase == SinkPhase::Closed {
            return Err(ExportError::AlreadyClosed);
        }
        self.phase = SinkPhase::Open;
        Ok(())
    }

    fn write(&mut self, raw: i32, scaled: f64) -> Result<(), ExportError> {
        self.phase.ensure_open()?;
        self.buffer.lock().records.push(ExportRecord { raw, scaled });
        Ok(())
    }

    fn close(&mut self) -> Result<(), ExportError> {
        self.phase.ensure_open()?;
        self.phase = SinkPhase::Closed;
        self.buffer.lock().closes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let mut sink = MemorySink::new();
        let buffer = sink.buffer();

        sink.open().unwrap();
        sink.write(3, 0.3).unwrap();
        sink.write(1, 0.1).unwrap();
        sink.close().unwrap();

        assert_eq!(
            buffer.records(),
            vec![
                ExportRecord { raw: 3, scaled: 0.3 },
                ExportRecord { raw: 1, scaled: 0.1 },
            ]
        );
        assert_eq!(buffer.close_count(), 1);
        assert!(matches!(sink.close(), Err(ExportError::AlreadyClosed)));
        assert_eq!(buffer.close_count(), 1);
    }
}
