//! # animhub-core
//!
//! Core crate for AnimHub. Contains configuration schemas, the typed job
//! identifier, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AnimHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
