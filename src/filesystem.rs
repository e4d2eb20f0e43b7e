//! Disk helpers for the update pipeline
//!
//! Metadata discovery walks a project tree with `walkdir`, skipping hidden
//! directories (the tool's own working directory included) and dependency
//! folders. Writes are change-aware so an update that produces identical
//! bytes leaves the file (and its modification time) alone.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directories never searched for metadata.
const SKIP_DIRS: &[&str] = &["node_modules", "target"];

/// Finds every file under `root` whose name ends with `suffix`, sorted.
///
/// Hidden directories are skipped except `root` itself, so a scratch
/// directory below `.sf-toolbox/` can still be searched directly.
pub fn find_files_with_suffix(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !name.starts_with('.') && !SKIP_DIRS.contains(&name)
        })
    {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to walk '{}': {}", root.display(), e),
        })?;
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix))
        {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

/// Copies `from` to `to`, creating parent directories.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }
    fs::copy(from, to).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to copy '{}' to '{}': {}",
            from.display(),
            to.display(),
            e
        ),
    })?;
    Ok(())
}

/// Writes `content` to `path` unless the file already holds exactly those
/// bytes. Returns whether the file was written.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<bool> {
    if fs::read(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }
    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e),
    })?;
    Ok(true)
}

/// Removes a file; returns whether it existed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Filesystem {
            message: format!("Failed to delete '{}': {}", path.display(), e),
        }),
    }
}

/// Removes a directory tree, trying a second time before giving up. A
/// missing directory is not an error. Returns whether anything was removed.
pub fn remove_dir_all_with_retry(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if let Err(first) = fs::remove_dir_all(path) {
        log::debug!("retrying removal of {}: {}", path.display(), first);
        if let Err(e) = fs::remove_dir_all(path) {
            if path.exists() {
                return Err(Error::Filesystem {
                    message: format!("Failed to delete '{}': {}", path.display(), e),
                });
            }
        }
    }
    Ok(true)
}

/// Clears `path` and recreates it empty.
pub fn reset_dir(path: &Path) -> Result<()> {
    remove_dir_all_with_retry(path)?;
    fs::create_dir_all(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", path.display(), e),
    })?;
    Ok(())
}

/// A directory owned for the duration of one run.
///
/// [`ScratchDir::acquire`] empties it so stale content from an earlier run
/// never leaks in; [`ScratchDir::release`] removes it.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        reset_dir(&path)?;
        log::debug!("acquired scratch directory {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory, reporting the leftover path on failure.
    pub fn release(self) -> Result<()> {
        remove_dir_all_with_retry(&self.path)
            .map(|_| ())
            .map_err(|e| {
                log::debug!("scratch cleanup failed: {}", e);
                Error::CleanupFailed { path: self.path }
            })
    }
}
