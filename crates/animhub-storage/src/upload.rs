//! Upload intake: stores client files and library copies under a fresh
//! [`JobId`].

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use animhub_core::error::{AppError, ErrorKind};
use animhub_core::result::AppResult;
use animhub_core::types::JobId;

use crate::naming;

/// A vector asset accepted into the upload directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Identifier allocated for this upload.
    pub id: JobId,
    /// Sanitized file name, without the identifier prefix.
    pub filename: String,
    /// Absolute location on disk.
    pub path: PathBuf,
    /// Whether the asset was copied from the read-only library.
    pub from_library: bool,
}

/// Writes uploads into the upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    /// Create a store writing into `root`.
    pub fn new(root: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            allowed_extensions,
        }
    }

    /// Directory uploads are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Message used when a file fails the extension allow-list.
    pub fn extension_error(&self) -> AppError {
        let allowed = self
            .allowed_extensions
            .iter()
            .map(|e| e.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join("/");
        AppError::validation(format!(
            "Invalid file type. Only {allowed} files are allowed."
        ))
    }

    /// Validate and store a client upload.
    ///
    /// Nothing is written when the name is empty or the extension is not
    /// allowed.
    pub async fn save_upload(&self, original_name: &str, data: Bytes) -> AppResult<StoredUpload> {
        if original_name.trim().is_empty() {
            return Err(AppError::validation("No file selected"));
        }
        if !naming::has_allowed_extension(original_name, &self.allowed_extensions) {
            return Err(self.extension_error());
        }

        let filename = naming::secure_filename(original_name)
            .filter(|name| naming::has_allowed_extension(name, &self.allowed_extensions))
            .ok_or_else(|| self.extension_error())?;

        let id = JobId::new();
        let path = naming::build_path(&self.root, &id, &filename)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| storage_error("Failed to create upload", &path, e))?;
        write_or_discard(file, &path, &data)
            .await
            .map_err(|e| storage_error("Failed to write upload", &path, e))?;

        info!(job_id = %id, filename, bytes = data.len(), "Stored upload");

        Ok(StoredUpload {
            id,
            filename,
            path,
            from_library: false,
        })
    }

    /// Copy a library asset into the upload area under a new identifier.
    pub async fn import_from(&self, source: &Path, filename: &str) -> AppResult<StoredUpload> {
        let filename = naming::secure_filename(filename)
            .ok_or_else(|| AppError::validation(format!("Unusable file name '{filename}'")))?;

        let id = JobId::new();
        let path = naming::build_path(&self.root, &id, &filename)?;

        fs::copy(source, &path)
            .await
            .map_err(|e| storage_error("Failed to copy library asset", &path, e))?;

        info!(job_id = %id, source = %source.display(), "Imported library asset");

        Ok(StoredUpload {
            id,
            filename,
            path,
            from_library: true,
        })
    }

    /// Locate the stored upload for `id` and its sanitized `filename`.
    ///
    /// `filename` must be exactly what intake returned; anything the
    /// sanitizer would change is rejected rather than rewritten.
    pub async fn resolve(&self, id: &JobId, filename: &str) -> AppResult<PathBuf> {
        if naming::secure_filename(filename).as_deref() != Some(filename) {
            return Err(AppError::validation(format!("Invalid filename '{filename}'")));
        }

        let path = naming::build_path(&self.root, id, filename)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                debug!(job_id = %id, path = %path.display(), "Resolved upload");
                Ok(path)
            }
            Ok(_) => Err(AppError::not_found("SVG file not found")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found("SVG file not found"))
            }
            Err(e) => Err(storage_error("Failed to stat upload", &path, e)),
        }
    }
}

/// Write `data` through `writer`, removing `path` when the write fails so no
/// truncated upload keeps a valid name.
async fn write_or_discard<W>(mut writer: W, path: &Path, data: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let result = async {
        writer.write_all(data).await?;
        writer.flush().await
    }
    .await;

    if result.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
        }
    }
    result
}

fn storage_error(what: &str, path: &Path, err: std::io::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Storage,
        format!("{what}: {}", path.display()),
        err,
    )
}
