//! Typed path parameter helpers.

use animhub_core::error::AppError;
use animhub_core::types::JobId;

/// Parses a job identifier from a request field.
pub fn parse_job_id(s: &str) -> Result<JobId, AppError> {
    s.parse::<JobId>()
        .map_err(|_| AppError::validation(format!("Invalid file_id: {s}")))
}

/// Parses a job identifier from a URL segment, treating garbage as absent.
pub fn job_id_or_not_found(s: &str, message: &str) -> Result<JobId, AppError> {
    s.parse::<JobId>().map_err(|_| AppError::not_found(message))
}
