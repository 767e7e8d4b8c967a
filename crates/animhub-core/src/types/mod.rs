//! Core type definitions used across the AnimHub workspace.

pub mod id;

pub use id::JobId;
