//! Render pipeline: descriptor, dispatch, and artifact lookup for one job.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use animhub_core::config::render::RenderConfig;
use animhub_core::types::JobId;
use animhub_storage::{ArtifactLocator, JobLeases, StorageLayout};

use crate::descriptor::DescriptorGenerator;
use crate::error::RenderError;
use crate::executor::RenderDispatcher;
use crate::models::{RenderOutcome, RenderParameters, RenderedVideo};

/// Orchestrates the render of one uploaded asset.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    descriptors: DescriptorGenerator,
    dispatcher: RenderDispatcher,
    locator: ArtifactLocator,
    leases: JobLeases,
    limiter: Arc<Semaphore>,
    timeout: Duration,
}

impl RenderPipeline {
    /// Build the pipeline over the resolved working directories.
    pub fn new(
        config: &RenderConfig,
        layout: &StorageLayout,
        leases: JobLeases,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            descriptors: DescriptorGenerator::new(&layout.descriptors, config)?,
            dispatcher: RenderDispatcher::new(config),
            locator: ArtifactLocator::new(&layout.outputs, &config.video_extension),
            leases,
            limiter: Arc::new(Semaphore::new(config.max_concurrent)),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// Locator over the same output root the renderer writes to.
    pub fn locator(&self) -> &ArtifactLocator {
        &self.locator
    }

    /// Render `asset_path` for `id`.
    ///
    /// The job stays leased for the whole call so the retention sweep does
    /// not reclaim its upload or descriptor mid-render. Succeeds only when a
    /// non-empty artifact exists.
    #[instrument(skip(self, asset_path, params), fields(job_id = %id))]
    pub async fn run(
        &self,
        id: JobId,
        asset_path: &Path,
        params: &RenderParameters,
    ) -> Result<RenderedVideo, RenderError> {
        params.validate()?;
        let _lease = self.leases.acquire(id);

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| RenderError::SemaphoreClosed {
                reason: "render limiter closed".to_string(),
            })?;

        let (descriptor_path, script_content) =
            self.descriptors.write(&id, asset_path, params).await?;

        let outcome = self
            .dispatcher
            .dispatch(&descriptor_path, &id, self.locator.root(), self.timeout)
            .await?;

        match outcome {
            RenderOutcome::Success { .. } => {}
            RenderOutcome::Failure {
                exit_code,
                stderr,
                stdout,
            } => {
                return Err(RenderError::Failed {
                    exit_code,
                    stderr,
                    stdout,
                });
            }
            RenderOutcome::TimedOut { elapsed } => {
                warn!(elapsed_ms = elapsed.as_millis() as u64, "Renderer killed at deadline");
                return Err(RenderError::TimedOut {
                    timeout_seconds: self.timeout.as_secs(),
                });
            }
        }

        let expected = self.locator.file_name(&id);
        let Some(video_path) = self.locator.locate(&id).await.map_err(|e| {
            warn!(error = %e, "Artifact lookup failed");
            RenderError::OutputMissing {
                expected: expected.clone(),
            }
        })?
        else {
            warn!(expected = %expected, "Renderer succeeded without producing the artifact");
            return Err(RenderError::OutputMissing { expected });
        };

        let size = tokio::fs::metadata(&video_path).await?.len();
        if size == 0 {
            warn!(path = %video_path.display(), "Renderer produced an empty artifact");
            return Err(RenderError::OutputMissing { expected });
        }

        info!(path = %video_path.display(), size, "Render complete");
        Ok(RenderedVideo {
            id,
            video_path,
            script_content,
            descriptor_path,
        })
    }
}
