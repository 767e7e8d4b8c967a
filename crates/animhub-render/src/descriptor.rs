//! Animation descriptor generation.
//!
//! A descriptor is a short renderer script with a fixed shape: set the
//! background, load the asset, scale it, and play a single draw animation.
//! Every interpolated string is emitted as an escaped literal and numbers are
//! emitted only when finite.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use animhub_core::config::render::RenderConfig;
use animhub_core::types::JobId;
use animhub_storage::naming;

use crate::error::RenderError;
use crate::models::{RenderParameters, ScaleHint};

/// Writes descriptors into the descriptor directory.
#[derive(Debug, Clone)]
pub struct DescriptorGenerator {
    dir: PathBuf,
    scene_name: String,
    standard_scale: f64,
    enlarged_scale: f64,
}

impl DescriptorGenerator {
    /// Create a generator writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, config: &RenderConfig) -> Result<Self, RenderError> {
        if !is_identifier(&config.scene_name) {
            return Err(RenderError::InvalidParameter {
                field: "scene_name",
                reason: format!("'{}' is not an identifier", config.scene_name),
            });
        }
        for (field, value) in [
            ("standard_scale", config.standard_scale),
            ("enlarged_scale", config.enlarged_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RenderError::InvalidParameter {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        Ok(Self {
            dir: dir.into(),
            scene_name: config.scene_name.clone(),
            standard_scale: config.standard_scale,
            enlarged_scale: config.enlarged_scale,
        })
    }

    /// Entry point declared by every descriptor.
    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    fn scale_for(&self, hint: ScaleHint) -> f64 {
        match hint {
            ScaleHint::Standard => self.standard_scale,
            ScaleHint::Enlarged => self.enlarged_scale,
        }
    }

    /// Produce descriptor text for `asset_path`.
    ///
    /// `title` and `wait_time` do not appear in the output.
    pub fn render(&self, asset_path: &Path, params: &RenderParameters) -> Result<String, RenderError> {
        params.validate()?;

        let asset = asset_path
            .to_str()
            .filter(|p| !p.chars().any(char::is_control))
            .ok_or_else(|| RenderError::UnsafePath {
                path: asset_path.to_path_buf(),
            })?
            .replace('\\', "/");

        let mut text = String::with_capacity(320);
        text.push_str("from manim import *\n\n\n");
        let _ = writeln!(text, "class {}(Scene):", self.scene_name);
        text.push_str("    def construct(self):\n");
        let _ = writeln!(
            text,
            "        self.camera.background_color = {}",
            string_literal(&params.background_color)
        );
        let _ = writeln!(text, "        m = SVGMobject({})", string_literal(&asset));
        let _ = writeln!(text, "        m.scale({:?})", self.scale_for(params.scale_hint));
        let _ = writeln!(
            text,
            "        self.play(Write(m, run_time={:?}))",
            params.duration
        );

        Ok(text)
    }

    /// Generate and persist the descriptor for `id`.
    ///
    /// The text is written to a uniquely named temporary sibling, synced, and
    /// renamed into place, so the returned path never refers to a partial
    /// file even when two writes for the same id overlap.
    pub async fn write(
        &self,
        id: &JobId,
        asset_path: &Path,
        params: &RenderParameters,
    ) -> Result<(PathBuf, String), RenderError> {
        let content = self.render(asset_path, params)?;

        let path = self.dir.join(naming::descriptor_file_name(id));
        let tmp = path.with_extension(format!("py.{}.part", Uuid::new_v4().simple()));

        let written = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp)
                .await?;
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(RenderError::Io(e));
        }

        debug!(job_id = %id, path = %path.display(), "Descriptor written");
        Ok((path, content))
    }
}

/// Double-quoted literal with backslash, quote, and control escapes.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
