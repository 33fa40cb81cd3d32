//! Run command implementation
//!
//! Executes one trial run on a worker thread, logs its progress and prints
//! the final (or partial) report.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;
use crossbeam_channel::bounded;
use serde::Serialize;
use tracing::{info, warn};
use trials_core::histogram::Bin;
use trials_core::rng::SourceKind;
use trials_engine::export::{default_export_file_name, CsvFileSink, DEFAULT_EXPORT_BASENAME};
use trials_engine::prelude::*;

use super::OutputFormat;
use crate::config::AppConfig;
use crate::error::{CliError, Result};

/// Progress updates buffered between the worker and the log.
const PROGRESS_CAPACITY: usize = 64;

/// Width of the histogram bars in table output.
const BAR_WIDTH: u64 = 40;

/// Random source selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// General-purpose pseudo-random generator
    System,
    /// Operating-system entropy
    Cryptographic,
    /// Linear congruential generator
    Lcg,
    /// Fixed value (requires --value)
    Constant,
}

/// Arguments of the run command
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Source override
    pub source: Option<SourceArg>,
    /// Seed override
    pub seed: Option<u64>,
    /// Value for the constant source
    pub value: Option<i32>,
    /// Sample count override
    pub samples: Option<u64>,
    /// Export destination override
    pub export: Option<PathBuf>,
    /// Report format
    pub format: OutputFormat,
    /// Cancel once this many samples are reported processed
    pub stop_after: Option<u64>,
}

impl RunArgs {
    fn source_kind(&self) -> Result<Option<SourceKind>> {
        let kind = match (self.source, self.value) {
            (Some(SourceArg::Constant), Some(value)) => SourceKind::Constant { value },
            (Some(SourceArg::Constant), None) => {
                return Err(CliError::invalid_argument("--source constant requires --value"));
            }
            (_, Some(_)) => {
                return Err(CliError::invalid_argument("--value requires --source constant"));
            }
            (Some(SourceArg::System), None) => SourceKind::System { seed: None },
            (Some(SourceArg::Cryptographic), None) => SourceKind::Cryptographic,
            (Some(SourceArg::Lcg), None) => SourceKind::LinearCongruential { seed: 0 },
            (None, None) => return Ok(None),
        };
        if self.seed.is_some()
            && matches!(kind, SourceKind::Cryptographic | SourceKind::Constant { .. })
        {
            return Err(CliError::invalid_argument(format!(
                "--seed has no effect on the {} source",
                kind
            )));
        }
        Ok(Some(kind))
    }
}

/// Run the run command
pub fn run(app: &AppConfig, args: &RunArgs) -> Result<()> {
    app.validate()?;

    let mut builder = app.run.clone();
    if let Some(kind) = args.source_kind()? {
        builder = builder.source(kind);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(samples) = args.samples {
        builder = builder.samples(samples);
    }
    let config = builder.samples_or(app.default_samples()).build()?;

    let export_path = args
        .export
        .as_deref()
        .or(app.export_path.as_deref())
        .map(resolve_export_path);
    if let Some(path) = &export_path {
        info!(path = %path.display(), "Exporting samples");
    }
    let export = export_path.map(|path| Box::new(CsvFileSink::new(path)) as Box<dyn ExportSink>);

    let runner = TrialRunner::new(app.canvas.width, app.canvas.height)?;
    let (tx, rx) = bounded(PROGRESS_CAPACITY);
    let handle = runner.start(
        &config,
        config.create_source(),
        Some(Arc::new(ChannelProgress::new(tx))),
        export,
    )?;

    // Ends when the worker drops its sender.
    for update in rx.iter() {
        match update {
            ProgressUpdate::Progress(event) => {
                info!(
                    percent = event.percent_done,
                    mean = event.mean,
                    variance = event.variance,
                    rate = event.rate,
                    matches = event.matches,
                    "Progress"
                );
                let cap_reached = args
                    .stop_after
                    .is_some_and(|cap| event.samples_processed >= cap);
                if cap_reached && !handle.token().is_cancelled() {
                    info!(samples = event.samples_processed, "Sample cap reached, cancelling");
                    handle.cancel();
                }
            }
            ProgressUpdate::Cancelled { last_index } => {
                info!(last_index, "Run cancelled");
            }
        }
    }

    let mut stdout = std::io::stdout().lock();
    match handle.join() {
        Ok(report) => render(&report, args.format, &mut stdout),
        Err(err) => {
            if let Some(partial) = err.partial() {
                warn!("Run aborted, partial results follow");
                render(partial, args.format, &mut stdout)?;
            }
            Err(err.into())
        }
    }
}

/// A directory receives a timestamped file name; anything else is used as is.
fn resolve_export_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(default_export_file_name(DEFAULT_EXPORT_BASENAME))
    } else {
        path.to_path_buf()
    }
}

/// Report without the canvas pixels.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    #[serde(flatten)]
    outcome: RunOutcome,
    source: &'a str,
    samples: u64,
    samples_processed: u64,
    mean: f64,
    variance: f64,
    rate: f64,
    pixels_set: u64,
    pixels_tested: u64,
    elapsed_ms: u64,
    bins: &'a [Bin],
}

impl<'a> RunSummary<'a> {
    fn new(report: &'a RunReport) -> Self {
        Self {
            outcome: report.outcome,
            source: &report.source,
            samples: report.config.samples(),
            samples_processed: report.samples_processed,
            mean: report.stats.mean(),
            variance: report.stats.variance(),
            rate: report.rate(),
            pixels_set: report.matches.pixels_set,
            pixels_tested: report.matches.pixels_tested,
            elapsed_ms: report.elapsed.as_millis() as u64,
            bins: report.histogram.bins(),
        }
    }
}

fn render(report: &RunReport, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let summary = RunSummary::new(report);
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &summary)
                .map_err(|e| CliError::Output(e.to_string()))?;
            writeln!(out).map_err(output_error)
        }
        OutputFormat::Table => render_table(&summary, out).map_err(output_error),
    }
}

fn render_table(summary: &RunSummary<'_>, out: &mut impl Write) -> std::io::Result<()> {
    let outcome = match summary.outcome {
        RunOutcome::Completed => "completed".to_string(),
        RunOutcome::Cancelled { last_index } => format!("cancelled at {}", last_index),
        RunOutcome::Aborted { at_index } => format!("aborted at {}", at_index),
    };

    writeln!(out, "┌──────────────────┬──────────────────────────┐")?;
    let rows = [
        ("Outcome", outcome),
        ("Source", summary.source.to_string()),
        (
            "Samples",
            format!("{} / {}", summary.samples_processed, summary.samples),
        ),
        ("Mean", format!("{:.6}", summary.mean)),
        ("Variance", format!("{:.6}", summary.variance)),
        ("Rate (/s)", format!("{:.0}", summary.rate)),
        (
            "Matches",
            format!("{} of {} tested", summary.pixels_set, summary.pixels_tested),
        ),
        ("Elapsed (ms)", summary.elapsed_ms.to_string()),
    ];
    for (name, value) in rows {
        writeln!(out, "│ {:<16} │ {:<24} │", name, value)?;
    }
    writeln!(out, "└──────────────────┴──────────────────────────┘")?;

    let peak = summary.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in summary.bins {
        let bar = "#".repeat((bin.count * BAR_WIDTH / peak) as usize);
        writeln!(
            out,
            "{:>4} [{:>9.4}, {:>9.4}] {:>10} {}",
            bin.label, bin.lower, bin.upper, bin.count, bar
        )?;
    }
    Ok(())
}

fn output_error(e: std::io::Error) -> CliError {
    CliError::Output(e.to_string())
}
