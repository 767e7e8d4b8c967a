//! The read-only library of pre-supplied item and block assets.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

use animhub_core::error::{AppError, ErrorKind};
use animhub_core::result::AppResult;

use crate::naming;

/// Side length injected into block assets that declare no size.
const BLOCK_SIZE: u32 = 32;

/// Which library directory an asset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Item sprites.
    Item,
    /// Block textures.
    Block,
}

impl AssetKind {
    /// Parse a client `type` field; anything but `"block"` means item.
    pub fn from_type(value: &str) -> Self {
        if value == "block" {
            Self::Block
        } else {
            Self::Item
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Block => "Block",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => write!(f, "item"),
            Self::Block => write!(f, "block"),
        }
    }
}

/// One listed library asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryEntry {
    /// File name inside the library directory.
    pub filename: String,
    /// Display name derived from the file name.
    pub name: String,
    /// Source directory.
    #[serde(rename = "type")]
    pub kind: AssetKind,
}

/// Read access to the item and block directories.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    items: PathBuf,
    blocks: PathBuf,
}

impl AssetLibrary {
    /// Create a library over the two directories.
    pub fn new(items: impl Into<PathBuf>, blocks: impl Into<PathBuf>) -> Self {
        Self {
            items: items.into(),
            blocks: blocks.into(),
        }
    }

    fn dir(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Item => &self.items,
            AssetKind::Block => &self.blocks,
        }
    }

    /// List the `.svg` files of one directory, sorted by display name.
    ///
    /// A missing directory lists as empty.
    pub async fn list(&self, kind: AssetKind) -> AppResult<Vec<LibraryEntry>> {
        let mut entries = self.scan(kind).await?;
        sort_entries(&mut entries);
        Ok(entries)
    }

    /// List both directories merged and sorted by display name.
    pub async fn list_all(&self) -> AppResult<Vec<LibraryEntry>> {
        let mut entries = self.scan(AssetKind::Item).await?;
        entries.extend(self.scan(AssetKind::Block).await?);
        sort_entries(&mut entries);
        Ok(entries)
    }

    async fn scan(&self, kind: AssetKind) -> AppResult<Vec<LibraryEntry>> {
        let dir = self.dir(kind);
        let mut reader = match fs::read_dir(dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list '{}'", dir.display()),
                    e,
                ));
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let Ok(filename) = entry.file_name().into_string() else {
                warn!(dir = %dir.display(), "Skipping non UTF-8 library file name");
                continue;
            };
            if !is_svg(&filename) {
                continue;
            }
            entries.push(LibraryEntry {
                name: humanize(&filename),
                filename,
                kind,
            });
        }
        Ok(entries)
    }

    /// Path of a library asset, validated against traversal and extension.
    pub async fn asset_path(&self, kind: AssetKind, filename: &str) -> AppResult<PathBuf> {
        if !naming::is_plain_file_name(filename) {
            return Err(AppError::validation("Invalid file name"));
        }
        if !is_svg(filename) {
            return Err(AppError::validation("Invalid file type"));
        }

        let path = self.dir(kind).join(filename);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(AppError::not_found(format!("{} not found", kind.label()))),
        }
    }

    /// Read a library asset for serving.
    ///
    /// Blocks without an explicit size get `width`/`height` injected so
    /// browsers render them at texture size.
    pub async fn read_asset(&self, kind: AssetKind, filename: &str) -> AppResult<Vec<u8>> {
        let path = self.asset_path(kind, filename).await?;
        let data = fs::read(&path).await?;

        match kind {
            AssetKind::Item => Ok(data),
            AssetKind::Block => {
                let svg = String::from_utf8_lossy(&data);
                Ok(ensure_block_dimensions(&svg).into_bytes())
            }
        }
    }
}

fn is_svg(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".svg")
}

fn sort_entries(entries: &mut [LibraryEntry]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.filename.cmp(&b.filename)));
}

/// Turn `Diamond_Sword.svg` or `GoldenApple.svg` into a display name.
///
/// The extension is dropped, underscores become spaces, and every
/// non-leading uppercase letter gets a space in front of it unless one is
/// already there, so `TNT.svg` reads `T N T`.
pub fn humanize(filename: &str) -> String {
    let base = if is_svg(filename) {
        &filename[..filename.len() - 4]
    } else {
        filename
    };

    let mut name = String::with_capacity(base.len() * 2);
    let mut prev: Option<char> = None;
    for c in base.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p != ' ') {
            name.push(' ');
        }
        name.push(c);
        prev = Some(c);
    }
    name
}

/// Add a fixed size to the root `<svg ` tag unless both dimensions exist.
pub fn ensure_block_dimensions(svg: &str) -> String {
    if svg.contains("width=") && svg.contains("height=") {
        return svg.to_string();
    }
    svg.replacen(
        "<svg ",
        &format!("<svg width=\"{BLOCK_SIZE}\" height=\"{BLOCK_SIZE}\" "),
        1,
    )
}
