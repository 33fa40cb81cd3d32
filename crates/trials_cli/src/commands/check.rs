//! Check command implementation
//!
//! Validates the application configuration and prints the resolved run.

use tracing::info;

use crate::config::AppConfig;
use crate::error::{CliError, Result};

/// Run the check command
pub fn run(app: &AppConfig) -> Result<()> {
    app.validate()?;
    let config = app.run_config()?;

    let json = serde_json::to_string_pretty(&config).map_err(|e| CliError::Output(e.to_string()))?;
    println!(
        "Canvas: {}x{}\nExport: {}\n{}",
        app.canvas.width,
        app.canvas.height,
        app.export_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string()),
        json
    );

    info!("Configuration OK");
    Ok(())
}
