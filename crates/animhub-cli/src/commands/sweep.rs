//! One-off retention sweep.

use clap::Args;

use animhub_api::AppState;
use animhub_api::app::build_sweeper;
use animhub_core::config::AppConfig;
use animhub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the sweep command
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Override the maximum file age in seconds
    #[arg(long)]
    pub max_age_seconds: Option<u64>,
}

/// Execute the sweep command
pub async fn execute(
    args: &SweepArgs,
    mut config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if let Some(max_age) = args.max_age_seconds {
        config.retention.max_age_seconds = max_age;
    }

    let state = AppState::from_config(config)?;
    let sweeper = build_sweeper(&state);

    let report = tokio::task::spawn_blocking(move || sweeper.sweep())
        .await
        .map_err(|e| AppError::internal(format!("Sweep task failed: {}", e)))?;

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Swept files older than {}s",
                state.config.retention.max_age_seconds
            ));
            output::print_kv("Files removed", &report.files_removed.to_string());
            output::print_kv("Bytes freed", &report.bytes_freed.to_string());
            output::print_kv("Dirs removed", &report.dirs_removed.to_string());
            output::print_kv("Errors", &report.errors.to_string());
        }
    }
    Ok(())
}
