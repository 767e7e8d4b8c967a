//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Returned by both upload endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Identifier to pass to `generate`.
    pub file_id: String,
    /// Sanitized file name to pass to `generate`.
    pub filename: String,
    /// Whether the asset came from the library.
    pub is_minecraft_item: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Successful render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Always `true`.
    pub success: bool,
    /// Identifier of the rendered job.
    pub file_id: String,
    /// Absolute path of the located video.
    pub video_path: String,
    /// Descriptor text handed to the renderer.
    pub script_content: String,
    /// Human-readable confirmation.
    pub message: String,
}

/// Liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// `running`.
    pub status: String,
    /// Human-readable banner.
    pub message: String,
    /// `enabled`.
    pub cors: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the state was built.
    pub uptime_seconds: u64,
}
