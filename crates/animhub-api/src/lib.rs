//! # animhub-api
//!
//! HTTP API layer for AnimHub built on Axum.
//!
//! Provides the upload, generate, video, library, and status endpoints, the
//! static file fallback, middleware (CORS, logging, compression), request
//! DTOs, and the single translation from [`animhub_core::AppError`] to JSON
//! error responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
