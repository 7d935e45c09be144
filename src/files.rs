//! C# source file collection.
//!
//! Expands the paths given on the command line into `(relative_path,
//! content)` pairs, walking directories for `.cs` files and skipping
//! anything the exclusion globs match.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use wpfcheck_core::error::CheckError;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// A path given on the command line does not exist.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

impl From<FileError> for CheckError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound { path } => CheckError::file_not_found(path),
            FileError::Io(e) => CheckError::internal(e.to_string()),
        }
    }
}

// ============================================================================
// File Collection
// ============================================================================

fn is_cs_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
}

/// Path shown in findings: relative to `root` when possible, `/`-separated.
fn display_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("skipping unreadable file {}: {}", path.display(), e);
            None
        }
    }
}

/// Collect `.cs` files under `paths`, resolved against `root`.
///
/// Directories are walked recursively without following links. Files
/// whose root-relative path matches `exclude` are skipped, except files
/// named explicitly. Unreadable files are logged and skipped. The result
/// is sorted by path with duplicates removed.
pub fn collect_cs_files(
    root: &Path,
    paths: &[PathBuf],
    exclude: &GlobSet,
) -> FileResult<Vec<(String, String)>> {
    let mut files = Vec::new();

    for input in paths {
        let path = if input.is_absolute() {
            input.clone()
        } else {
            root.join(input)
        };

        if path.is_file() {
            if !is_cs_file(&path) {
                debug!("ignoring non-C# file {}", path.display());
                continue;
            }
            if let Some(content) = read_source(&path) {
                files.push((display_path(root, &path), content));
            }
            continue;
        }

        if !path.is_dir() {
            return Err(FileError::NotFound {
                path: input.display().to_string(),
            });
        }

        for entry in WalkDir::new(&path).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping directory entry: {}", e);
                    continue;
                }
            };
            let entry_path = entry.path();
            if !entry.file_type().is_file() || !is_cs_file(entry_path) {
                continue;
            }

            let rel_path = display_path(root, entry_path);
            if exclude.is_match(&rel_path) {
                continue;
            }

            if let Some(content) = read_source(entry_path) {
                files.push((rel_path, content));
            }
        }
    }

    files.sort_by(|(a, _), (b, _)| a.cmp(b));
    files.dedup_by(|(a, _), (b, _)| a == b);
    debug!(files = files.len(), "collected source files");
    Ok(files)
}
