//! Progress notification for running trials.
//!
//! The sampling loop publishes a [`ProgressUpdate`] every
//! `progress_every` samples and once more on completion or cancellation.
//! Sinks receive copies; nothing they do can reach the run's state.
//! Publication must return promptly: [`ChannelProgress`] drops updates
//! rather than wait on a full channel.

use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};

use serde::Serialize;

/// Snapshot of a running trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Percentage of samples processed, `0..=100`.
    pub percent_done: u8,
    /// Current mean estimate.
    pub mean: f64,
    /// Current variance estimate.
    pub variance: f64,
    /// Samples per second since the run started.
    pub rate: f64,
    /// Pixel groups matched so far.
    pub matches: u64,
    /// Samples processed so far.
    pub samples_processed: u64,
}

/// Notification delivered to a [`ProgressSink`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ProgressUpdate {
    /// Periodic snapshot.
    Progress(ProgressEvent),
    /// Terminal event of a cancelled run.
    Cancelled {
        /// Index of the last processed sample.
        last_index: u64,
    },
}

/// Receiver of progress updates.
pub trait ProgressSink: Send + Sync {
    /// Delivers one update. Must not block for long.
    fn publish(&self, update: ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    #[inline]
    fn publish(&self, update: ProgressUpdate) {
        self(update)
    }
}

/// Shared progress sink handed to a run.
pub type SharedProgress = Arc<dyn ProgressSink>;

/// Forwards updates into a bounded channel, dropping them when it is full.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<ProgressUpdate>,
}

impl ChannelProgress {
    /// Wraps the sending half of a `crossbeam_channel::bounded` channel.
    pub fn new(sender: Sender<ProgressUpdate>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn publish(&self, update: ProgressUpdate) {
        match self.sender.try_send(update) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Progress channel full, update dropped");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::Mutex;

    fn event(percent_done: u8) -> ProgressEvent {
        ProgressEvent {
            percent_done,
            mean: 0.5,
            variance: 0.1,
            rate: 1000.0,
            matches: 3,
            samples_processed: 10,
        }
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let sink: SharedProgress = Arc::new(move |update: ProgressUpdate| {
            seen_clone.lock().unwrap().push(update);
        });

        sink.publish(ProgressUpdate::Progress(event(1)));
        sink.publish(ProgressUpdate::Cancelled { last_index: 9 });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], ProgressUpdate::Cancelled { last_index: 9 });
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (tx, rx) = bounded(1);
        let sink = ChannelProgress::new(tx);

        sink.publish(ProgressUpdate::Progress(event(1)));
        sink.publish(ProgressUpdate::Progress(event(2)));

        assert_eq!(rx.try_recv().unwrap(), ProgressUpdate::Progress(event(1)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_ignores_disconnected_receiver() {
        let (tx, rx) = bounded(4);
        drop(rx);
        ChannelProgress::new(tx).publish(ProgressUpdate::Cancelled { last_index: 0 });
    }
}
