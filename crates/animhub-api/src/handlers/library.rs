//! Read-only asset library listing and serving.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use animhub_storage::{AssetKind, LibraryEntry};

use crate::error::ApiError;
use crate::state::AppState;

const ASSET_CACHE_CONTROL: &str = "public, max-age=300";

/// GET /api/items
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<LibraryEntry>>, ApiError> {
    Ok(Json(state.library.list(AssetKind::Item).await?))
}

/// GET /api/blocks
pub async fn list_blocks(
    State(state): State<AppState>,
) -> Result<Json<Vec<LibraryEntry>>, ApiError> {
    Ok(Json(state.library.list(AssetKind::Block).await?))
}

/// GET /api/minecraft - items and blocks together
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<LibraryEntry>>, ApiError> {
    Ok(Json(state.library.list_all().await?))
}

/// GET /api/items/{filename}
pub async fn serve_item(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_asset(&state, AssetKind::Item, &filename).await
}

/// GET /api/blocks/{filename}
pub async fn serve_block(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_asset(&state, AssetKind::Block, &filename).await
}

async fn serve_asset(state: &AppState, kind: AssetKind, filename: &str) -> Result<Response, ApiError> {
    let body = state.library.read_asset(kind, filename).await?;

    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/svg+xml"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(ASSET_CACHE_CONTROL));
    Ok(response)
}
