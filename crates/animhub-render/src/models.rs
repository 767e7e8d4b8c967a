//! Render inputs and outcomes.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use animhub_core::types::JobId;

use crate::error::RenderError;

/// Which of the two configured scale factors a descriptor applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleHint {
    /// Regular uploads.
    #[default]
    Standard,
    /// Library assets, which are drawn small.
    Enlarged,
}

impl From<bool> for ScaleHint {
    fn from(enlarged: bool) -> Self {
        if enlarged { Self::Enlarged } else { Self::Standard }
    }
}

/// Presentation parameters of one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParameters {
    /// Display-only title; not part of the descriptor.
    pub title: String,
    /// Length of the draw animation in seconds.
    pub duration: f64,
    /// Accepted for compatibility; not part of the descriptor.
    pub wait_time: f64,
    /// Background color as understood by the renderer.
    pub background_color: String,
    /// Scale factor selector.
    pub scale_hint: ScaleHint,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            title: "Animation".to_string(),
            duration: 2.0,
            wait_time: 2.0,
            background_color: "#000000".to_string(),
            scale_hint: ScaleHint::Standard,
        }
    }
}

impl RenderParameters {
    /// Reject values that cannot be expressed in a descriptor.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(RenderError::InvalidParameter {
                field: "duration",
                reason: format!("must be a positive number, got {}", self.duration),
            });
        }
        if !self.wait_time.is_finite() || self.wait_time < 0.0 {
            return Err(RenderError::InvalidParameter {
                field: "wait_time",
                reason: format!("must be zero or positive, got {}", self.wait_time),
            });
        }
        if self.background_color.is_empty()
            || self.background_color.chars().any(char::is_control)
        {
            return Err(RenderError::InvalidParameter {
                field: "bg_color",
                reason: "must be a non-empty single-line value".to_string(),
            });
        }
        Ok(())
    }
}

/// What a single renderer invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Exit code 0.
    Success {
        /// Always `0`.
        exit_code: i32,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },
    /// Non-zero exit or termination by signal (`exit_code` is `None`).
    Failure {
        /// Exit code, if the process exited normally.
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
        /// Captured standard output.
        stdout: String,
    },
    /// The deadline passed and the process was killed.
    TimedOut {
        /// The deadline that was exceeded.
        elapsed: Duration,
    },
}

impl RenderOutcome {
    /// Whether the renderer exited with status 0.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A finished render whose artifact exists on disk.
#[derive(Debug, Clone)]
pub struct RenderedVideo {
    /// Job the video belongs to.
    pub id: JobId,
    /// Location of the artifact.
    pub video_path: PathBuf,
    /// Descriptor text handed to the renderer.
    pub script_content: String,
    /// Location of the descriptor.
    pub descriptor_path: PathBuf,
}
