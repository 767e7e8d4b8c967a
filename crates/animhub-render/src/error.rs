//! Error type for the render pipeline.
//!
//! Every variant maps onto one [`ErrorKind`] of the unified taxonomy; renderer
//! output travels along as structured details.

use std::path::PathBuf;

use serde_json::json;
use thiserror::Error;

use animhub_core::error::{AppError, ErrorKind};

/// Hint returned with timeouts.
pub const TIMEOUT_HINT: &str =
    "The video generation took too long. Try with shorter duration or simpler SVG.";

/// Errors raised while generating, rendering, or locating a video.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A presentation parameter cannot be used.
    #[error("Invalid {field}: {reason}")]
    InvalidParameter {
        /// Request field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A path cannot be embedded in a descriptor.
    #[error("Path cannot be embedded in a descriptor: {path}")]
    UnsafePath {
        /// The offending path.
        path: PathBuf,
    },

    /// The renderer could not be started.
    #[error("Failed to start renderer '{command}': {source}")]
    Spawn {
        /// Configured executable.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited unsuccessfully.
    #[error("Rendering failed (exit code {exit_code:?})")]
    Failed {
        /// Exit code, `None` when killed by a signal.
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
        /// Captured standard output.
        stdout: String,
    },

    /// The renderer exceeded its deadline and was killed.
    #[error("Rendering timed out ({timeout_seconds} seconds)")]
    TimedOut {
        /// The configured deadline.
        timeout_seconds: u64,
    },

    /// The renderer reported success but no artifact was found.
    #[error("Generated video not found")]
    OutputMissing {
        /// File name the renderer was told to write.
        expected: String,
    },

    /// The concurrency limiter was closed.
    #[error("Render slots unavailable: {reason}")]
    SemaphoreClosed {
        /// Description of the failure.
        reason: String,
    },

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task failure.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        let message = err.to_string();
        match err {
            RenderError::InvalidParameter { .. } | RenderError::UnsafePath { .. } => {
                AppError::validation(message)
            }
            RenderError::Failed {
                exit_code,
                stderr,
                stdout,
            } => AppError::render_failure(message).with_details(json!({
                "details": stderr,
                "stdout": stdout,
                "exit_code": exit_code,
            })),
            RenderError::TimedOut { timeout_seconds } => AppError::render_timeout(message)
                .with_details(json!({
                    "details": TIMEOUT_HINT,
                    "timeout_seconds": timeout_seconds,
                })),
            RenderError::OutputMissing { expected } => {
                AppError::render_failure(message).with_details(json!({ "expected": expected }))
            }
            RenderError::Io(e) => AppError::with_source(ErrorKind::Storage, message, e),
            RenderError::Spawn { .. }
            | RenderError::SemaphoreClosed { .. }
            | RenderError::Join(_) => AppError::internal(message),
        }
    }
}
