//! Finds the video a render produced for a job.
//!
//! The renderer decides the subdirectory layout under its media directory
//! (`videos/<descriptor>/<quality>/`), so the output root is searched
//! recursively for the exact file name the dispatcher requested.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use animhub_core::error::AppError;
use animhub_core::result::AppResult;
use animhub_core::types::JobId;

use crate::naming;

/// Recursive lookup of rendered artifacts by job identifier.
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    root: PathBuf,
    extension: String,
}

impl ArtifactLocator {
    /// Create a locator over `root` for videos with `extension`.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Output root searched by this locator.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Exact artifact name expected for `id`.
    pub fn file_name(&self, id: &JobId) -> String {
        naming::artifact_file_name(id, &self.extension)
    }

    /// Search the output tree for the artifact of `id`.
    ///
    /// Traversal is sorted by file name so repeated calls over an unchanged
    /// tree return the same path.
    pub fn find(&self, id: &JobId) -> Option<PathBuf> {
        let wanted = self.file_name(id);

        let found = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| entry.file_type().is_file() && entry.file_name() == wanted.as_str())
            .map(|entry| entry.into_path());

        debug!(job_id = %id, found = ?found, "Artifact lookup");
        found
    }

    /// Async wrapper around [`ArtifactLocator::find`] that keeps the walk off
    /// the runtime threads.
    pub async fn locate(&self, id: &JobId) -> AppResult<Option<PathBuf>> {
        let locator = self.clone();
        let id = *id;
        tokio::task::spawn_blocking(move || locator.find(&id))
            .await
            .map_err(|e| AppError::internal(format!("Artifact lookup task failed: {e}")))
    }
}
