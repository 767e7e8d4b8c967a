//! External renderer configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// How the external animation renderer is invoked.
///
/// The command line is
/// `{command} {extra_args..} {quality_flag} --output_file {id}_animation.{ext} --media_dir {outputs} {descriptor} {scene_name}`.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Renderer executable, resolved through `PATH` when not absolute.
    #[serde(default = "default_command")]
    #[validate(length(min = 1))]
    pub command: String,

    /// Arguments inserted before the renderer flags.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Fixed quality flag.
    #[serde(default = "default_quality_flag")]
    pub quality_flag: String,

    /// Entry point declared inside every descriptor.
    #[serde(default = "default_scene_name")]
    #[validate(length(min = 1))]
    pub scene_name: String,

    /// Extension of the rendered video, without the dot.
    #[serde(default = "default_video_extension")]
    #[validate(length(min = 1))]
    pub video_extension: String,

    /// Hard wall-clock deadline for a single render.
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 3600))]
    pub timeout_seconds: u64,

    /// Scale factor for regular uploads.
    #[serde(default = "default_standard_scale")]
    #[validate(range(min = 0.01, max = 100.0))]
    pub standard_scale: f64,

    /// Scale factor for library assets, which are drawn small.
    #[serde(default = "default_enlarged_scale")]
    #[validate(range(min = 0.01, max = 100.0))]
    pub enlarged_scale: f64,

    /// Renders allowed to run at the same time.
    #[serde(default = "default_max_concurrent")]
    #[validate(range(min = 1, max = 64))]
    pub max_concurrent: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            extra_args: Vec::new(),
            quality_flag: default_quality_flag(),
            scene_name: default_scene_name(),
            video_extension: default_video_extension(),
            timeout_seconds: default_timeout_seconds(),
            standard_scale: default_standard_scale(),
            enlarged_scale: default_enlarged_scale(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_command() -> String {
    "manim".to_string()
}

fn default_quality_flag() -> String {
    "-qh".to_string()
}

fn default_scene_name() -> String {
    "logo_animation".to_string()
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_standard_scale() -> f64 {
    1.0
}

fn default_enlarged_scale() -> f64 {
    2.0
}

fn default_max_concurrent() -> usize {
    4
}
