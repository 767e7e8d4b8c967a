//! Static files from the configured static root.

use axum::extract::{Path, State};
use axum::response::Response;

use animhub_core::error::AppError;
use animhub_storage::naming;

use crate::error::ApiError;
use crate::handlers::video::stream_file;
use crate::state::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.layout.static_root.join(&state.layout.index_file);
    serve_path(&path).await
}

/// GET /{*path}
pub async fn serve(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let resolved = naming::confine(&state.layout.static_root, &path)?;
    serve_path(&resolved).await
}

async fn serve_path(path: &std::path::Path) -> Result<Response, ApiError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => stream_file(path, "inline").await,
        _ => Err(AppError::not_found("File not found").into()),
    }
}
