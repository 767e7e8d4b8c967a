//! Route handlers organized by domain.

pub mod generate;
pub mod health;
pub mod library;
pub mod static_files;
pub mod upload;
pub mod video;
