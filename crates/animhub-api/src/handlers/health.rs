//! Liveness probe.

use axum::Json;
use axum::extract::State;

use crate::dto::response::StatusResponse;
use crate::state::AppState;

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        message: "SVG Animation Generator Backend is running!".to_string(),
        cors: "enabled".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
