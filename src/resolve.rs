//! Relative image-path resolution against a chosen root directory.
//!
//! Annotation documents frequently name images by relative, sometimes
//! multi-segment paths with backslash separators. Resolution normalizes
//! separators, walks each intermediate segment as an existing
//! subdirectory (never creating), and requires the final segment to be a
//! file. A miss anywhere fails the whole attempt atomically; the error
//! carries the attempted root label and normalized relative path.

use std::path::{Path, PathBuf};

use crate::error::BoxscopeError;

/// Backslashes normalized to forward slashes.
pub fn normalize_path(value: &str) -> String {
    value.replace('\\', "/")
}

/// Base filename with any leading path stripped. Falls back to the whole
/// (normalized) value when it ends in a separator.
pub fn base_name(value: &str) -> String {
    let normalized = normalize_path(value);
    match normalized.rsplit('/').find(|part| !part.is_empty()) {
        Some(last) => last.to_string(),
        None => normalized,
    }
}

/// Human-readable description of a resolution attempt, used in
/// resolution-failure messages.
pub fn attempted_path(root_label: Option<&str>, file_name: &str) -> String {
    let root = root_label.unwrap_or("(none)");
    format!("root: {} / relative path: {}", root, normalize_path(file_name))
}

/// Resolves `file_name` under `root`, segment by segment.
pub fn resolve_in_root(
    root: &Path,
    root_label: Option<&str>,
    file_name: &str,
) -> Result<PathBuf, BoxscopeError> {
    let not_found = || BoxscopeError::ImageNotFound {
        attempted: attempted_path(root_label, file_name),
    };

    let normalized = normalize_path(file_name);
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    let Some((final_segment, dirs)) = segments.split_last() else {
        return Err(not_found());
    };

    let mut current = root.to_path_buf();
    for segment in dirs {
        current.push(segment);
        if !current.is_dir() {
            return Err(not_found());
        }
    }

    current.push(final_segment);
    if !current.is_file() {
        return Err(not_found());
    }
    Ok(current)
}

/// Filename-matching contract when no root is selected: the annotation's
/// base filename must equal the loaded image's name exactly.
pub fn names_match(annotation_file_name: &str, loaded_image_name: &str) -> bool {
    base_name(annotation_file_name) == loaded_image_name
}
