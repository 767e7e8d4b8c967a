//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use animhub_core::error::{AppError, ErrorKind};
use animhub_render::RenderError;

/// Error returned by every handler.
///
/// Wraps [`AppError`] so the response mapping lives in this crate.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::RenderFailure
        | ErrorKind::RenderTimeout
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON body for `err`: `error` and `code`, plus any object details merged in.
pub fn error_body(err: &AppError) -> Value {
    let mut body = Map::new();
    body.insert("error".to_string(), Value::String(err.message.clone()));
    body.insert("code".to_string(), Value::String(err.kind.to_string()));

    match &err.details {
        Some(Value::Object(details)) => {
            for (key, value) in details {
                body.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        Some(other) => {
            body.insert("details".to_string(), other.clone());
        }
        None => {}
    }

    Value::Object(body)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        if status.is_server_error() {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Request failed"
            );
        } else {
            tracing::debug!(kind = %err.kind, error = %err.message, "Request rejected");
        }

        (status, Json(error_body(&err))).into_response()
    }
}
