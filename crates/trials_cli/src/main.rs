//! Trials CLI - Command Line Driver for Random-Number Trial Runs
//!
//! # Commands
//!
//! - `trials run` - Execute one trial run and print its report
//! - `trials check` - Validate the configuration and print the resolved run
//!
//! # Architecture
//!
//! Service layer: loads the application config, hands a run to
//! `trials_engine` and renders the outcome. No numeric logic lives here.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;

use commands::run::{RunArgs, SourceArg};
use commands::OutputFormat;
use config::{AppConfig, DEFAULT_CONFIG_FILE};

/// Random-number trial runner
#[derive(Parser)]
#[command(name = "trials")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one trial run
    Run {
        /// Random source
        #[arg(short, long, value_enum)]
        source: Option<SourceArg>,

        /// Seed for the system or lcg source
        #[arg(long)]
        seed: Option<u64>,

        /// Value returned by the constant source
        #[arg(long, allow_negative_numbers = true)]
        value: Option<i32>,

        /// Number of samples (default: one per canvas pixel)
        #[arg(short = 'n', long)]
        samples: Option<u64>,

        /// Export raw/scaled samples to this file or directory
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Cancel the run once this many samples have been reported
        #[arg(long)]
        stop_after: Option<u64>,
    },

    /// Validate the configuration and print the resolved run
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = AppConfig::load_or_default(&cli.config)?.with_env_override();

    let level = if cli.verbose {
        "debug"
    } else {
        app.log_level.as_str()
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("trials={}", level))?,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!(config = %cli.config.display(), "Trials starting");

    match cli.command {
        Commands::Run {
            source,
            seed,
            value,
            samples,
            export,
            format,
            stop_after,
        } => {
            let args = RunArgs {
                source,
                seed,
                value,
                samples,
                export,
                format,
                stop_after,
            };
            commands::run::run(&app, &args)?;
        }
        Commands::Check => commands::check::run(&app)?,
    }

    Ok(())
}
