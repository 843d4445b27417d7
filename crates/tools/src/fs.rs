//! Shared path resolution and directory walking for the file tools.

use std::path::{Path, PathBuf};
use toolrelay_core::error::ToolError;
use tracing::warn;

/// Resolve a model-supplied path against the tool root.
///
/// Absolute paths are used as-is; relative ones are joined onto `root`.
pub fn resolve(root: &Path, raw: &str) -> PathBuf {
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

/// Metadata for `path`, mapping I/O failures into the tool taxonomy.
/// `shown` is the path as the model wrote it, used in error messages.
pub async fn metadata(path: &Path, shown: &str) -> Result<std::fs::Metadata, ToolError> {
    tokio::fs::metadata(path)
        .await
        .map_err(|e| ToolError::from_io(Path::new(shown), e))
}

/// Fail with `WrongType` unless `path` is a directory.
pub async fn require_dir(path: &Path, shown: &str) -> Result<(), ToolError> {
    if metadata(path, shown).await?.is_dir() {
        Ok(())
    } else {
        Err(ToolError::WrongType(format!("{shown} is not a directory")))
    }
}

/// Fail with `WrongType` unless `path` is a regular file.
pub async fn require_file(path: &Path, shown: &str) -> Result<(), ToolError> {
    if metadata(path, shown).await?.is_dir() {
        Err(ToolError::WrongType(format!("{shown} is a directory, not a file")))
    } else {
        Ok(())
    }
}

/// One entry found under a walked directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the walk root, `/`-separated.
    pub relative: String,
    pub file_name: String,
    pub is_dir: bool,
}

impl Entry {
    /// Display form: directories carry a trailing `/`.
    pub fn display(&self) -> String {
        if self.is_dir {
            format!("{}/", self.relative)
        } else {
            self.relative.clone()
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// The walk root joined with `relative`, as the model would write it.
fn shown_path(shown: &str, relative: &str) -> String {
    if relative.is_empty() {
        shown.to_string()
    } else if shown == "." {
        relative.to_string()
    } else {
        format!("{}/{relative}", shown.trim_end_matches('/'))
    }
}

/// Collect the entries under `dir`, sorted by relative path.
///
/// When `recursive` is set, subdirectories are descended into and entries
/// whose name starts with `.` are skipped entirely. A subdirectory that
/// cannot be read is still listed but its contents are skipped; only a
/// failure on `dir` itself is an error.
pub async fn walk(dir: &Path, shown: &str, recursive: bool) -> Result<Vec<Entry>, ToolError> {
    let mut entries = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = vec![(dir.to_path_buf(), String::new())];

    while let Some((current, prefix)) = pending.pop() {
        let here = shown_path(shown, &prefix);
        match read_entries(&current, &here, &prefix, recursive).await {
            Ok((found, subdirs)) => {
                entries.extend(found);
                pending.extend(subdirs);
            }
            Err(e) if prefix.is_empty() => return Err(e),
            Err(e) => warn!(dir = %here, error = %e, "Skipping unreadable directory"),
        }
    }

    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(entries)
}

/// Read one directory level, returning its entries and the subdirectories
/// to descend into.
async fn read_entries(
    current: &Path,
    here: &str,
    prefix: &str,
    recursive: bool,
) -> Result<(Vec<Entry>, Vec<(PathBuf, String)>), ToolError> {
    let io_err = |e: std::io::Error| ToolError::from_io(Path::new(here), e);
    let mut reader = tokio::fs::read_dir(current).await.map_err(io_err)?;

    let mut found = Vec::new();
    let mut subdirs = Vec::new();
    while let Some(item) = reader.next_entry().await.map_err(io_err)? {
        let file_name = item.file_name().to_string_lossy().into_owned();
        if recursive && is_hidden(&file_name) {
            continue;
        }
        let is_dir = item.file_type().await.map_err(io_err)?.is_dir();
        let relative = if prefix.is_empty() {
            file_name.clone()
        } else {
            format!("{prefix}/{file_name}")
        };
        if recursive && is_dir {
            subdirs.push((item.path(), relative.clone()));
        }
        found.push(Entry {
            relative,
            file_name,
            is_dir,
        });
    }
    Ok((found, subdirs))
}
