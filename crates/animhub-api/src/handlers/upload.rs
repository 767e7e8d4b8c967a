//! Upload intake handlers.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};

use animhub_core::error::AppError;
use animhub_storage::AssetKind;

use crate::dto::request::{LibraryUploadRequest, validate_request};
use crate::dto::response::UploadResponse;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /api/upload - multipart field `file`
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|e| AppError::validation(format!("Invalid upload: {}", e.body_text())))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {}", e.body_text())))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.trim().is_empty() {
            return Err(AppError::validation("No file selected").into());
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {}", e.body_text())))?;

        let stored = state.uploads.save_upload(&original_name, data).await?;

        return Ok(Json(UploadResponse {
            success: true,
            file_id: stored.id.to_string(),
            filename: stored.filename,
            is_minecraft_item: false,
            message: "SVG file uploaded successfully!".to_string(),
        }));
    }

    Err(AppError::validation("No file provided").into())
}

/// POST /api/upload-minecraft-item - copy a library asset into the upload area
pub async fn upload_library_asset(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LibraryUploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    validate_request(&req)?;

    let kind = AssetKind::from_type(&req.kind);
    let source = state.library.asset_path(kind, &req.filename).await?;
    let stored = state.uploads.import_from(&source, &req.filename).await?;

    tracing::info!(job_id = %stored.id, kind = %kind, filename = %stored.filename, "Library asset selected");

    Ok(Json(UploadResponse {
        success: true,
        file_id: stored.id.to_string(),
        filename: stored.filename,
        is_minecraft_item: true,
        message: format!("Minecraft {kind} selected successfully!"),
    }))
}
