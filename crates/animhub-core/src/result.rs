//! Convenience result type alias for AnimHub.

use crate::error::AppError;

/// A specialized `Result` type for AnimHub operations.
pub type AppResult<T> = Result<T, AppError>;
