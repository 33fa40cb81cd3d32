//! Trial run orchestration.
//!
//! [`TrialRunner`] owns the canvas dimensions and the run state machine:
//!
//! ```text
//! Idle -> Running -> { Completed, Cancelled, Failed }
//!           ^                     |
//!           +---------------------+   (any terminal state may start again)
//! ```
//!
//! Per sample `k` in `[0, N)` the loop draws, scales, bins, maps, folds the
//! statistics, exports, checks the cancellation token and finally publishes
//! progress every `progress_every` samples. A histogram overflow or export
//! failure aborts the run with the partial state in [`RunError::Aborted`].
//!
//! [`TrialRunner::run_blocking`] executes on the calling thread;
//! [`TrialRunner::start`] moves the same loop onto a worker thread and hands
//! back a [`RunHandle`].

mod cancel;
mod report;

pub use cancel::CancellationToken;
pub use report::{RunOutcome, RunReport};

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};
use trials_core::canvas::PixelMapper;
use trials_core::histogram::Histogram;
use trials_core::rng::RandomSource;
use trials_core::stats::{scale, RunningStats};
use trials_core::CoreError;

use crate::config::RunConfig;
use crate::error::RunError;
use crate::export::ExportSink;
use crate::progress::{ProgressEvent, ProgressSink, ProgressUpdate, SharedProgress};
use report::sample_rate;

/// Lifecycle of a [`TrialRunner`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RunState {
    /// No run started yet.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// Last run processed all samples.
    Completed,
    /// Last run was cancelled.
    Cancelled,
    /// Last run was aborted by an error.
    Failed,
}

/// Drives trial runs onto a fixed-size canvas, one at a time.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    width: usize,
    height: usize,
    state: Arc<Mutex<RunState>>,
}

impl TrialRunner {
    /// Creates a runner for a `width x height` canvas.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Core` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, RunError> {
        if width == 0 || height == 0 {
            return Err(CoreError::invalid_argument(format!(
                "canvas dimensions must be positive ({}x{})",
                width, height
            ))
            .into());
        }
        Ok(Self {
            width,
            height,
            state: Arc::new(Mutex::new(RunState::Idle)),
        })
    }

    /// Canvas width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        *lock(&self.state)
    }

    /// Runs to completion or cancellation on the calling thread.
    ///
    /// # Errors
    ///
    /// - `RunError::InvalidState` if a run is already active
    /// - `RunError::Config` / `RunError::Core` if the configuration is rejected
    /// - `RunError::Export` if the export sink cannot be opened
    /// - `RunError::Aborted` if the run failed after sampling began
    pub fn run_blocking<S: RandomSource>(
        &self,
        config: &RunConfig,
        source: S,
        progress: Option<SharedProgress>,
        export: Option<Box<dyn ExportSink>>,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunError> {
        let active = self.begin()?;
        let session = match Session::prepare(config, source.name(), self.width, self.height, export) {
            Ok(session) => session,
            Err(e) => {
                active.revert();
                return Err(e);
            }
        };

        let result = session.execute(source, progress.as_deref(), cancel);
        active.settle(&result);
        result
    }

    /// Starts a run on a worker thread.
    ///
    /// Configuration and export sink are checked before the thread is
    /// spawned, so those errors are returned here rather than from
    /// [`RunHandle::join`].
    ///
    /// # Errors
    ///
    /// As [`run_blocking`](Self::run_blocking) for everything detected up
    /// front, plus `RunError::Spawn` if the thread cannot be created.
    pub fn start<S>(
        &self,
        config: &RunConfig,
        source: S,
        progress: Option<SharedProgress>,
        export: Option<Box<dyn ExportSink>>,
    ) -> Result<RunHandle, RunError>
    where
        S: RandomSource + Send + 'static,
    {
        let active = self.begin()?;
        let session = match Session::prepare(config, source.name(), self.width, self.height, export) {
            Ok(session) => session,
            Err(e) => {
                active.revert();
                return Err(e);
            }
        };

        // The worker takes the run out of this slot; a failed spawn leaves it here.
        let pending = Arc::new(Mutex::new(Some((active, session))));
        let worker_pending = Arc::clone(&pending);
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let spawned = std::thread::Builder::new()
            .name("trial-run".to_string())
            .spawn(move || {
                let (active, session) = lock(&worker_pending).take().ok_or_else(|| {
                    RunError::InvalidState("run was reclaimed before the worker started".to_string())
                })?;
                let result = session.execute(source, progress.as_deref(), &worker_token);
                active.settle(&result);
                result
            });

        match spawned {
            Ok(worker) => Ok(RunHandle { token, worker }),
            Err(e) => {
                let reclaimed = lock(&pending).take();
                match reclaimed {
                    Some((active, session)) => Err(reject_spawn(active, session, e)),
                    None => Err(RunError::Spawn(e)),
                }
            }
        }
    }

    fn begin(&self) -> Result<ActiveRun, RunError> {
        let mut state = lock(&self.state);
        if *state == RunState::Running {
            return Err(RunError::InvalidState(
                "a run is already active on this runner".to_string(),
            ));
        }
        let previous = *state;
        *state = RunState::Running;
        Ok(ActiveRun {
            state: Arc::clone(&self.state),
            previous,
            settled: false,
        })
    }
}

/// Handle to a run executing on a worker thread.
#[derive(Debug)]
pub struct RunHandle {
    token: CancellationToken,
    worker: JoinHandle<Result<RunReport, RunError>>,
}

impl RunHandle {
    /// Requests cancellation. The worker stops after its current sample.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The run's cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the run to end.
    ///
    /// # Errors
    ///
    /// The run's own error, or `RunError::WorkerPanicked`.
    pub fn join(self) -> Result<RunReport, RunError> {
        self.worker.join().map_err(|_| RunError::WorkerPanicked)?
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Undoes a start whose worker never ran: closes the opened export and
/// puts the runner back into its previous state.
fn reject_spawn(active: ActiveRun, session: Session, cause: std::io::Error) -> RunError {
    error!(error = %cause, "Failed to spawn trial worker");
    session.discard();
    active.revert();
    RunError::Spawn(cause)
}

/// Holds the runner in `Running`; marks it `Failed` if dropped unsettled.
struct ActiveRun {
    state: Arc<Mutex<RunState>>,
    previous: RunState,
    settled: bool,
}

impl ActiveRun {
    fn settle(mut self, result: &Result<RunReport, RunError>) {
        let next = match result {
            Ok(report) => match report.outcome {
                RunOutcome::Completed => RunState::Completed,
                RunOutcome::Cancelled { .. } => RunState::Cancelled,
                RunOutcome::Aborted { .. } => RunState::Failed,
            },
            Err(_) => RunState::Failed,
        };
        *lock(&self.state) = next;
        self.settled = true;
    }

    fn revert(mut self) {
        *lock(&self.state) = self.previous;
        self.settled = true;
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        if !self.settled {
            *lock(&self.state) = RunState::Failed;
        }
    }
}

/// Mutable state of one run.
struct Session {
    config: RunConfig,
    source: &'static str,
    histogram: Histogram,
    stats: RunningStats,
    mapper: PixelMapper,
    export: Option<Box<dyn ExportSink>>,
}

impl Session {
    fn prepare(
        config: &RunConfig,
        source: &'static str,
        width: usize,
        height: usize,
        mut export: Option<Box<dyn ExportSink>>,
    ) -> Result<Self, RunError> {
        config.validate()?;
        let histogram = Histogram::new(config.bins(), config.domain_min(), config.domain_max())?;
        let mapper = PixelMapper::new(width, height, config.samples(), config.match_target())?;

        if let Some(sink) = export.as_mut() {
            sink.open()?;
        }

        Ok(Self {
            config: config.clone(),
            source,
            histogram,
            stats: RunningStats::new(),
            mapper,
            export,
        })
    }

    fn execute<S: RandomSource>(
        mut self,
        mut source: S,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunError> {
        let samples = self.config.samples();
        let every = self.config.progress_every();
        let started = Instant::now();

        info!(
            samples,
            source = self.source,
            source_min = self.config.source_min(),
            source_max = self.config.source_max(),
            "Trial run started"
        );

        for k in 0..samples {
            let (raw, scaled) = match self.sample(&mut source, k) {
                Ok(pair) => pair,
                Err(cause) => return Err(self.abort(cause, k, k, started.elapsed())),
            };

            let processed = k + 1;
            if let Some(sink) = self.export.as_mut() {
                if let Err(e) = sink.write(raw, scaled) {
                    return Err(self.abort(e.into(), k, processed, started.elapsed()));
                }
            }

            if cancel.is_cancelled() {
                let outcome = RunOutcome::Cancelled { last_index: k };
                info!(last_index = k, "Trial run cancelled");
                if let Some(sink) = progress {
                    sink.publish(ProgressUpdate::Cancelled { last_index: k });
                }
                return self.finish(outcome, processed, started.elapsed());
            }

            if processed % every == 0 && processed < samples {
                if let Some(sink) = progress {
                    let event = self.event(processed, started.elapsed());
                    debug!(percent = event.percent_done, "Progress");
                    sink.publish(ProgressUpdate::Progress(event));
                }
            }
        }

        let elapsed = started.elapsed();
        if let Some(sink) = progress {
            sink.publish(ProgressUpdate::Progress(self.event(samples, elapsed)));
        }
        info!(
            samples,
            mean = self.stats.mean(),
            variance = self.stats.variance(),
            matches = self.mapper.counters().pixels_set,
            elapsed_ms = elapsed.as_millis() as u64,
            "Trial run completed"
        );
        self.finish(RunOutcome::Completed, samples, elapsed)
    }

    /// Steps 1 to 5 for sample `k`. Leaves no trace when the histogram
    /// rejects the value.
    fn sample<S: RandomSource>(&mut self, source: &mut S, k: u64) -> Result<(i32, f64), RunError> {
        let config = &self.config;
        let raw = source.next(config.source_min(), config.source_max())?;
        let scaled = scale(
            raw,
            config.source_min(),
            config.source_max(),
            config.domain_min(),
            config.domain_max(),
        )?;
        self.histogram.add(scaled)?;
        self.mapper.observe(k, raw)?;
        self.stats.push(scaled)?;
        Ok((raw, scaled))
    }

    fn event(&self, processed: u64, elapsed: Duration) -> ProgressEvent {
        let percent = processed.saturating_mul(100) / self.config.samples();
        ProgressEvent {
            percent_done: percent.min(100) as u8,
            mean: self.stats.mean(),
            variance: self.stats.variance(),
            rate: sample_rate(processed, elapsed),
            matches: self.mapper.counters().pixels_set,
            samples_processed: processed,
        }
    }

    /// Closes the export sink and converts the session into its report.
    fn finish(
        mut self,
        outcome: RunOutcome,
        processed: u64,
        elapsed: Duration,
    ) -> Result<RunReport, RunError> {
        let closed = match self.export.take() {
            Some(mut sink) => sink.close(),
            None => Ok(()),
        };
        let report = self.into_report(outcome, processed, elapsed);
        match closed {
            Ok(()) => Ok(report),
            Err(e) => {
                error!(error = %e, "Export sink failed to close");
                Err(RunError::aborted(e.into(), report))
            }
        }
    }

    fn abort(mut self, cause: RunError, k: u64, processed: u64, elapsed: Duration) -> RunError {
        error!(index = k, error = %cause, "Trial run aborted");
        if let Some(mut sink) = self.export.take() {
            if let Err(e) = sink.close() {
                warn!(error = %e, "Export sink failed to close after abort");
            }
        }
        let report = self.into_report(RunOutcome::Aborted { at_index: k }, processed, elapsed);
        RunError::aborted(cause, report)
    }

    /// Closes the export of a session that never sampled.
    fn discard(mut self) {
        if let Some(mut sink) = self.export.take() {
            if let Err(e) = sink.close() {
                warn!(error = %e, "Export sink failed to close");
            }
        }
    }

    fn into_report(self, outcome: RunOutcome, processed: u64, elapsed: Duration) -> RunReport {
        RunReport {
            outcome,
            samples_processed: processed,
            source: self.source.to_string(),
            stats: self.stats,
            histogram: self.histogram,
            matches: self.mapper.counters(),
            canvas: self.mapper.into_canvas(),
            config: self.config,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use trials_core::rng::{ConstantRandom, LinearCongruentialRandom};

    fn config(samples: u64) -> RunConfig {
        RunConfig::builder().samples(samples).build().unwrap()
    }

    #[test]
    fn test_zero_canvas_rejected() {
        assert!(matches!(
            TrialRunner::new(0, 10),
            Err(RunError::Core(CoreError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_state_transitions() {
        let runner = TrialRunner::new(8, 8).unwrap();
        assert_eq!(runner.state(), RunState::Idle);

        let token = CancellationToken::new();
        runner
            .run_blocking(&config(100), LinearCongruentialRandom::new(1), None, None, &token)
            .unwrap();
        assert_eq!(runner.state(), RunState::Completed);

        token.cancel();
        let report = runner
            .run_blocking(&config(100), LinearCongruentialRandom::new(1), None, None, &token)
            .unwrap();
        assert_eq!(report.outcome, RunOutcome::Cancelled { last_index: 0 });
        assert_eq!(runner.state(), RunState::Cancelled);
    }

    #[test]
    fn test_begin_while_running_is_invalid() {
        let runner = TrialRunner::new(4, 4).unwrap();
        let active = runner.begin().unwrap();
        assert!(matches!(runner.begin(), Err(RunError::InvalidState(_))));
        drop(active);
        assert_eq!(runner.state(), RunState::Failed);
        assert!(runner.begin().is_ok());
    }

    #[test]
    fn test_prepare_failure_restores_state() {
        let runner = TrialRunner::new(4, 4).unwrap();
        let inverted = RunConfig::builder()
            .samples(100)
            .domain(1.0, 0.0)
            .build()
            .unwrap();
        let result = runner.run_blocking(
            &inverted,
            ConstantRandom::new(10),
            None,
            None,
            &CancellationToken::new(),
        );
        assert!(matches!(result, Err(RunError::Core(CoreError::InvalidArgument(_)))));
        assert_eq!(runner.state(), RunState::Idle);
    }

    #[test]
    fn test_spawn_failure_restores_state_and_closes_export() {
        let runner = TrialRunner::new(4, 4).unwrap();
        let sink = MemorySink::new();
        let buffer = sink.buffer();

        let active = runner.begin().unwrap();
        let session =
            Session::prepare(&config(100), "custom", 4, 4, Some(Box::new(sink))).unwrap();
        assert_eq!(runner.state(), RunState::Running);

        let cause = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err = reject_spawn(active, session, cause);

        assert!(matches!(err, RunError::Spawn(_)));
        assert_eq!(runner.state(), RunState::Idle);
        assert_eq!(buffer.close_count(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_spawn_failure_keeps_previous_terminal_state() {
        let runner = TrialRunner::new(4, 4).unwrap();
        let token = CancellationToken::new();
        runner
            .run_blocking(&config(100), LinearCongruentialRandom::new(1), None, None, &token)
            .unwrap();

        let active = runner.begin().unwrap();
        let session = Session::prepare(&config(100), "custom", 4, 4, None).unwrap();
        reject_spawn(active, session, std::io::Error::new(std::io::ErrorKind::Other, "spawn"));

        assert_eq!(runner.state(), RunState::Completed);
    }

    #[test]
    fn test_progress_percent() {
        let session = Session::prepare(&config(200), "custom", 4, 4, None).unwrap();
        let event = session.event(50, Duration::from_secs(1));
        assert_eq!(event.percent_done, 25);
        assert_eq!(event.rate, 50.0);
        assert_eq!(session.event(200, Duration::ZERO).percent_done, 100);
    }
}
