//! Result server: download and inline preview of rendered videos.

use std::path::Path;

use axum::body::Body;
use axum::extract::{Path as UrlPath, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use animhub_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::extractors::path::job_id_or_not_found;
use crate::state::AppState;

const VIDEO_NOT_FOUND: &str = "Video file not found";

/// How the client should present the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Attachment,
    Inline,
}

/// GET /api/download/{file_id}
pub async fn download_video(
    State(state): State<AppState>,
    UrlPath(file_id): UrlPath<String>,
) -> Result<Response, ApiError> {
    serve_video(&state, &file_id, Disposition::Attachment).await
}

/// GET /api/preview/{file_id}
pub async fn preview_video(
    State(state): State<AppState>,
    UrlPath(file_id): UrlPath<String>,
) -> Result<Response, ApiError> {
    serve_video(&state, &file_id, Disposition::Inline).await
}

/// Locate the artifact afresh and stream it.
async fn serve_video(
    state: &AppState,
    file_id: &str,
    disposition: Disposition,
) -> Result<Response, ApiError> {
    let id = job_id_or_not_found(file_id, VIDEO_NOT_FOUND)?;
    let locator = state.pipeline.locator();
    let path = locator
        .locate(&id)
        .await?
        .ok_or_else(|| AppError::not_found(VIDEO_NOT_FOUND))?;

    let download_name = locator.file_name(&id);
    let disposition = match disposition {
        Disposition::Attachment => format!("attachment; filename=\"{download_name}\""),
        Disposition::Inline => format!("inline; filename=\"{download_name}\""),
    };

    stream_file(&path, &disposition).await
}

/// Stream `path` with a content type guessed from its extension.
pub async fn stream_file(path: &Path, disposition: &str) -> Result<Response, ApiError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found("File not found")
        } else {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to open '{}'", path.display()),
                e,
            )
        }
    })?;
    let length = file.metadata().await.map_err(AppError::from)?.len();
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    tracing::debug!(path = %path.display(), length, "Streaming file");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, length)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}
