//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use animhub_core::error::AppError;
use animhub_render::{RenderParameters, ScaleHint};

/// Body of `POST /api/upload-minecraft-item`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LibraryUploadRequest {
    /// File name inside the library directory.
    #[serde(default)]
    #[validate(length(min = 1, message = "No filename provided"))]
    pub filename: String,
    /// `item` or `block`.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    /// Identifier returned by an upload.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing file information"))]
    pub file_id: String,
    /// Sanitized file name returned by an upload.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing file information"))]
    pub filename: String,
    /// Display-only title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Animation length in seconds.
    #[serde(default = "default_seconds", deserialize_with = "number_or_string")]
    pub duration: f64,
    /// Accepted and ignored by the renderer.
    #[serde(default = "default_seconds", deserialize_with = "number_or_string")]
    pub wait_time: f64,
    /// Background color.
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    /// Library assets get the enlarged scale factor.
    #[serde(default)]
    pub is_minecraft_item: bool,
}

impl GenerateRequest {
    /// Presentation parameters for the pipeline.
    pub fn parameters(&self) -> RenderParameters {
        RenderParameters {
            title: self.title.clone(),
            duration: self.duration,
            wait_time: self.wait_time,
            background_color: self.bg_color.clone(),
            scale_hint: ScaleHint::from(self.is_minecraft_item),
        }
    }
}

/// Run `validator` rules, reporting the first failing field's message.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(|errors| {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let message = fields
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::validation(message)
    })
}

fn default_kind() -> String {
    "item".to_string()
}

fn default_title() -> String {
    "Animation".to_string()
}

fn default_seconds() -> f64 {
    2.0
}

fn default_bg_color() -> String {
    "#000000".to_string()
}

/// Accept `2`, `2.5`, or `"2.5"`.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Number(n) => Ok(n),
        Loose::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("'{s}' is not a number"))),
    }
}
