//! Render a local SVG through the same pipeline the server uses.

use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;
use serde::Serialize;

use animhub_api::AppState;
use animhub_core::config::AppConfig;
use animhub_core::error::{AppError, ErrorKind};
use animhub_render::{RenderParameters, ScaleHint};

use crate::output::{self, OutputFormat};

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// SVG file to animate
    pub svg: PathBuf,

    /// Animation length in seconds
    #[arg(long, default_value_t = 2.0)]
    pub duration: f64,

    /// Background color
    #[arg(long, default_value = "#000000")]
    pub bg_color: String,

    /// Use the enlarged scale factor
    #[arg(long)]
    pub enlarged: bool,
}

#[derive(Debug, Serialize)]
struct RenderSummary {
    file_id: String,
    video_path: String,
    descriptor_path: String,
}

/// Execute the render command
pub async fn execute(
    args: &RenderArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let name = args
        .svg
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("Not a file: {}", args.svg.display())))?
        .to_string();
    let data = tokio::fs::read(&args.svg).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read '{}'", args.svg.display()),
            e,
        )
    })?;

    let state = AppState::from_config(config)?;
    state.layout.ensure_dirs().await?;

    let stored = state.uploads.save_upload(&name, Bytes::from(data)).await?;
    let params = RenderParameters {
        duration: args.duration,
        background_color: args.bg_color.clone(),
        scale_hint: ScaleHint::from(args.enlarged),
        ..Default::default()
    };

    let video = state.pipeline.run(stored.id, &stored.path, &params).await?;

    let summary = RenderSummary {
        file_id: video.id.to_string(),
        video_path: video.video_path.display().to_string(),
        descriptor_path: video.descriptor_path.display().to_string(),
    };

    match format {
        OutputFormat::Json => output::print_json(&summary),
        OutputFormat::Table => {
            output::print_success("Animation rendered");
            output::print_kv("File ID", &summary.file_id);
            output::print_kv("Video", &summary.video_path);
            output::print_kv("Descriptor", &summary.descriptor_path);
        }
    }
    Ok(())
}
