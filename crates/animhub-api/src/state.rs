//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use animhub_core::config::AppConfig;
use animhub_core::result::AppResult;
use animhub_render::RenderPipeline;
use animhub_storage::{AssetLibrary, JobLeases, StorageLayout, UploadStore};

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Effective configuration.
    pub config: Arc<AppConfig>,
    /// Resolved working directories.
    pub layout: Arc<StorageLayout>,
    /// Upload intake.
    pub uploads: Arc<UploadStore>,
    /// Read-only item and block library.
    pub library: Arc<AssetLibrary>,
    /// Descriptor, dispatch, and lookup for renders.
    pub pipeline: Arc<RenderPipeline>,
    /// Jobs currently rendering; consulted by the retention sweep.
    pub leases: JobLeases,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Build the state over an already resolved layout.
    pub fn new(config: AppConfig, layout: StorageLayout) -> AppResult<Self> {
        let leases = JobLeases::new();
        let pipeline = RenderPipeline::new(&config.render, &layout, leases.clone())?;

        Ok(Self {
            uploads: Arc::new(UploadStore::new(
                layout.uploads.clone(),
                config.storage.allowed_extensions.clone(),
            )),
            library: Arc::new(AssetLibrary::new(
                layout.items.clone(),
                layout.blocks.clone(),
            )),
            pipeline: Arc::new(pipeline),
            leases,
            layout: Arc::new(layout),
            config: Arc::new(config),
            started_at: Instant::now(),
        })
    }

    /// Resolve the layout from `config` and build the state.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let layout = StorageLayout::from_config(&config.storage)?;
        Self::new(config, layout)
    }
}
