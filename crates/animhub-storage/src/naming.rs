//! File naming rules that tie uploads, descriptors, and artifacts to a
//! [`JobId`].
//!
//! All names share the `{id}_` prefix. User-supplied components are
//! sanitized before they reach the filesystem and relative paths are
//! confined to their root.

use std::path::{Component, Path, PathBuf};

use animhub_core::error::AppError;
use animhub_core::result::AppResult;
use animhub_core::types::JobId;

/// Maximum length of a sanitized user file name.
const MAX_NAME_LEN: usize = 200;

/// Reduce a client file name to a safe single component.
///
/// Path separators and whitespace become `_`, every character outside
/// `[A-Za-z0-9._-]` is dropped, and leading/trailing dots and underscores are
/// trimmed. Returns `None` when nothing usable remains.
pub fn secure_filename(name: &str) -> Option<String> {
    let joined = name
        .split(|c: char| c == '/' || c == '\\' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .take(MAX_NAME_LEN)
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whether `name` ends in one of `allowed` (case-insensitive, no dot).
pub fn has_allowed_extension(name: &str, allowed: &[String]) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
        }
        _ => false,
    }
}

/// Whether `name` is a single plain path component.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.chars().any(char::is_control)
}

/// Build `{root}/{id}_{suffix}` from a client-supplied suffix.
///
/// The suffix is sanitized with [`secure_filename`]; a suffix that sanitizes
/// to nothing is rejected.
pub fn build_path(root: &Path, id: &JobId, suffix: &str) -> AppResult<PathBuf> {
    let safe = secure_filename(suffix)
        .ok_or_else(|| AppError::validation(format!("Unusable file name '{suffix}'")))?;
    Ok(root.join(format!("{}{safe}", id.file_prefix())))
}

/// Name of the descriptor generated for `id`.
pub fn descriptor_file_name(id: &JobId) -> String {
    format!("{id}_animation.py")
}

/// Exact name the renderer is told to give the video for `id`.
pub fn artifact_file_name(id: &JobId, extension: &str) -> String {
    format!("{id}_animation.{}", extension.trim_start_matches('.'))
}

/// Resolve a client-supplied relative path under `root` without touching the
/// filesystem.
///
/// `.` segments are dropped and `..` pops a previous segment; climbing above
/// `root`, absolute paths, and drive prefixes are rejected.
pub fn confine(root: &Path, relative: &str) -> AppResult<PathBuf> {
    if relative.contains('\0') {
        return Err(AppError::validation("Invalid path"));
    }

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(AppError::validation("Invalid path"));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(AppError::validation("Invalid path"));
            }
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(parts);
    Ok(resolved)
}
