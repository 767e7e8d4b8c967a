//! Render endpoint.

use axum::Json;
use axum::extract::State;

use animhub_core::error::AppError;

use crate::dto::request::{GenerateRequest, validate_request};
use crate::dto::response::GenerateResponse;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::extractors::path::parse_job_id;
use crate::state::AppState;

/// POST /api/generate
///
/// The render runs on its own task, so a client that disconnects does not
/// cancel it.
pub async fn generate_animation(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    validate_request(&req)?;

    let id = parse_job_id(&req.file_id)?;
    let asset = state.uploads.resolve(&id, &req.filename).await?;
    let params = req.parameters();

    tracing::info!(
        job_id = %id,
        duration = params.duration,
        scale = ?params.scale_hint,
        "Generate request"
    );

    let pipeline = state.pipeline.clone();
    let video = tokio::spawn(async move { pipeline.run(id, &asset, &params).await })
        .await
        .map_err(|e| AppError::internal(format!("Render task failed: {e}")))??;

    Ok(Json(GenerateResponse {
        success: true,
        file_id: video.id.to_string(),
        video_path: video.video_path.display().to_string(),
        script_content: video.script_content,
        message: "Animation generated successfully!".to_string(),
    }))
}
