//! Working-directory layout configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locations of the five sibling working directories and the static root.
///
/// Directory names are resolved relative to `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory every other path is resolved against.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Uploaded vector assets.
    #[serde(default = "default_uploads")]
    pub uploads: String,
    /// Rendered videos (the renderer's media directory).
    #[serde(default = "default_outputs")]
    pub outputs: String,
    /// Generated animation descriptors.
    #[serde(default = "default_descriptors")]
    pub descriptors: String,
    /// Read-only item asset library.
    #[serde(default = "default_items")]
    pub items: String,
    /// Read-only block asset library.
    #[serde(default = "default_blocks")]
    pub blocks: String,
    /// Directory served for `/` and `/{path}`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// File served for `/`.
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Maximum accepted request body in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: usize,
    /// Accepted upload extensions, lowercase and without the dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            uploads: default_uploads(),
            outputs: default_outputs(),
            descriptors: default_descriptors(),
            items: default_items(),
            blocks: default_blocks(),
            static_dir: default_static_dir(),
            index_file: default_index_file(),
            max_upload_size_bytes: default_max_upload(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_uploads() -> String {
    "uploads".to_string()
}

fn default_outputs() -> String {
    "outputs".to_string()
}

fn default_descriptors() -> String {
    "manim_scripts".to_string()
}

fn default_items() -> String {
    "items".to_string()
}

fn default_blocks() -> String {
    "blocks".to_string()
}

fn default_static_dir() -> String {
    ".".to_string()
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["svg".to_string()]
}
