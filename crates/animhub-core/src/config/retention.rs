//! Retention sweep configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Age-based cleanup of the upload, output, and descriptor directories.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Whether the periodic sweep is scheduled at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between sweeps.
    #[serde(default = "default_interval_seconds")]
    #[validate(range(min = 1))]
    pub interval_seconds: u64,

    /// Files created longer ago than this are removed.
    #[serde(default = "default_max_age_seconds")]
    #[validate(range(min = 1))]
    pub max_age_seconds: u64,

    /// Run one sweep immediately when the scheduler starts.
    #[serde(default = "default_sweep_on_startup")]
    pub sweep_on_startup: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_seconds: default_interval_seconds(),
            max_age_seconds: default_max_age_seconds(),
            sweep_on_startup: default_sweep_on_startup(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_seconds() -> u64 {
    1800
}

fn default_max_age_seconds() -> u64 {
    3600
}

fn default_sweep_on_startup() -> bool {
    true
}
