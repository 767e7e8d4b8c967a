//! Resolution of the configured working directories.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use animhub_core::config::storage::StorageConfig;
use animhub_core::error::{AppError, ErrorKind};
use animhub_core::result::AppResult;

/// Absolute locations of the working directories.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Uploaded vector assets.
    pub uploads: PathBuf,
    /// Renderer media directory.
    pub outputs: PathBuf,
    /// Generated descriptors.
    pub descriptors: PathBuf,
    /// Item asset library.
    pub items: PathBuf,
    /// Block asset library.
    pub blocks: PathBuf,
    /// Root for static files.
    pub static_root: PathBuf,
    /// File served for `/`.
    pub index_file: String,
}

impl StorageLayout {
    /// Resolve every directory of `config` against its `root`.
    ///
    /// Paths are made absolute because they are handed to the external
    /// renderer, which may run with a different working directory.
    pub fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let root = std::path::absolute(&config.root).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Cannot resolve storage root '{}'", config.root.display()),
                e,
            )
        })?;

        Ok(Self {
            uploads: root.join(&config.uploads),
            outputs: root.join(&config.outputs),
            descriptors: root.join(&config.descriptors),
            items: root.join(&config.items),
            blocks: root.join(&config.blocks),
            static_root: root.join(&config.static_dir),
            index_file: config.index_file.clone(),
        })
    }

    /// Create the five working directories if they are missing.
    pub async fn ensure_dirs(&self) -> AppResult<()> {
        for dir in self.working_dirs() {
            fs::create_dir_all(dir).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create dir '{}'", dir.display()),
                    e,
                )
            })?;
            debug!(dir = %dir.display(), "Ensured working directory");
        }
        Ok(())
    }

    /// All directories created at startup.
    pub fn working_dirs(&self) -> [&Path; 5] {
        [
            &self.uploads,
            &self.outputs,
            &self.descriptors,
            &self.items,
            &self.blocks,
        ]
    }

    /// Directories whose contents are reclaimed by the retention sweep.
    pub fn sweep_roots(&self) -> Vec<PathBuf> {
        vec![
            self.uploads.clone(),
            self.outputs.clone(),
            self.descriptors.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> StorageConfig {
        StorageConfig {
            root: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ensure_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let layout = StorageLayout::from_config(&config_in(tmp.path())).expect("layout");

        layout.ensure_dirs().await.expect("first");
        layout.ensure_dirs().await.expect("second");

        for dir in layout.working_dirs() {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
        assert!(layout.descriptors.ends_with("manim_scripts"));
    }

    #[test]
    fn sweep_roots_exclude_libraries() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let layout = StorageLayout::from_config(&config_in(tmp.path())).expect("layout");
        let roots = layout.sweep_roots();

        assert_eq!(roots.len(), 3);
        assert!(!roots.contains(&layout.items));
        assert!(!roots.contains(&layout.blocks));
    }
}
