use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;
use log::info;

use crate::config::is_excluded;
use crate::errors::HeritageError;

/// Sorted list of category files in `dir` whose names match `pattern`.
///
/// Only direct children are considered. Names on the exclusion list (the
/// unified output, manifests, templates, backups) are skipped. An empty
/// result is an error so callers never write output from nothing.
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, HeritageError> {
    if !dir.is_dir() {
        return Err(HeritageError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let matcher = Glob::new(pattern)?.compile_matcher();
    let entries = fs::read_dir(dir).map_err(|e| HeritageError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| HeritageError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if is_excluded(name) || !matcher.is_match(name) {
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(HeritageError::NoCategoryFiles {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }

    files.sort();
    info!("discovered {} category files in {}", files.len(), dir.display());
    Ok(files)
}

/// Final path component as a `String`, for reports and metadata.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
