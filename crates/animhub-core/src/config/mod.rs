//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a default so that an empty file is valid.

pub mod app;
pub mod logging;
pub mod render;
pub mod retention;
pub mod storage;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::app::ServerConfig;
use self::logging::LoggingConfig;
use self::render::RenderConfig;
use self::retention::RetentionConfig;
use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Working directory layout.
    #[serde(default)]
    pub storage: StorageConfig,
    /// External renderer invocation.
    #[serde(default)]
    pub render: RenderConfig,
    /// Periodic cleanup of working files.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, the `config/{env}` overlay, and environment
    /// variables prefixed with `ANIMHUB__` (`ANIMHUB__RENDER__TIMEOUT_SECONDS`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Same as [`AppConfig::load`] with an explicit base file.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ANIMHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("render.extra_args")
                    .with_list_parse_key("storage.allowed_extensions"),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check field ranges and cross-section constraints.
    ///
    /// A sweep must never reclaim the files of a render that is still within
    /// its deadline, so the retention age has to exceed the render timeout.
    pub fn validate(&self) -> Result<(), AppError> {
        self.render.validate()?;
        self.retention.validate()?;

        if self.retention.max_age_seconds <= self.render.timeout_seconds {
            return Err(AppError::configuration(format!(
                "retention.max_age_seconds ({}) must be greater than render.timeout_seconds ({})",
                self.retention.max_age_seconds, self.render.timeout_seconds
            )));
        }

        if self.storage.allowed_extensions.is_empty() {
            return Err(AppError::configuration(
                "storage.allowed_extensions must not be empty",
            ));
        }

        Ok(())
    }
}
