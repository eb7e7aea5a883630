//! Recursive directory helpers: create, copy and remove whole trees.
//!
//! All three operations report success as a `bool` rather than an error: a
//! failure on one entry is logged, the walk carries on, and the call returns
//! `false`. Nothing is rolled back.
//!
//! Symbolic links are never followed. Copying recreates a link pointing at
//! the same target (Unix only; elsewhere links are skipped with a warning),
//! and removal deletes the link itself, never what it points to.

use crate::config::{ConfigError, PlannerConfig};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory tree operations with a fixed permission mode for new directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryOps {
    permissions: u32,
}

impl Default for DirectoryOps {
    fn default() -> Self {
        Self::new(0o755)
    }
}

impl DirectoryOps {
    pub fn new(permissions: u32) -> Self {
        Self { permissions }
    }

    /// Use the `new_folder_permissions` mode from config.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.permission_mode()?))
    }

    pub fn permissions(&self) -> u32 {
        self.permissions
    }

    /// Create `path` and any missing parents.
    ///
    /// Returns true if the path exists afterwards, including when it already
    /// existed before the call.
    pub fn create_dir(&self, path: &Path) -> bool {
        if path.exists() {
            return true;
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.permissions);
        }

        match builder.create(path) {
            Ok(()) => {
                debug!(path = %path.display(), mode = %format!("{:o}", self.permissions), "created directory");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to create directory");
                path.exists()
            }
        }
    }

    /// Copy everything under `source` into `destination`.
    ///
    /// Destination directories are created as needed. Returns false if
    /// `source` is not an existing directory (nothing is created in that case)
    /// or if any entry failed to copy.
    pub fn copy_dir(&self, source: &Path, destination: &Path) -> bool {
        if !source.is_dir() {
            warn!(source = %source.display(), "copy source is not a directory");
            return false;
        }

        // List everything up front so copying into a subdirectory of the
        // source cannot feed the walk.
        let entries: Vec<DirEntry> = match WalkDir::new(source)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(source = %source.display(), error = %e, "failed to list directory");
                return false;
            }
        };

        if let Err(e) = fs::create_dir_all(destination) {
            warn!(destination = %destination.display(), error = %e, "failed to create destination");
            return false;
        }

        let mut ok = true;
        for entry in entries {
            let Ok(relative) = entry.path().strip_prefix(source) else {
                continue;
            };
            let target = destination.join(relative);
            if let Err(e) = copy_entry(&entry, &target) {
                warn!(
                    from = %entry.path().display(),
                    to = %target.display(),
                    error = %e,
                    "failed to copy entry"
                );
                ok = false;
            }
        }
        ok
    }

    /// Delete `path` and everything under it, deepest entries first.
    ///
    /// Returns true when the path does not exist.
    pub fn remove_dir(&self, path: &Path) -> bool {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!(path = %path.display(), "not a directory, refusing to remove");
                return false;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to stat directory");
                return false;
            }
        }

        let mut ok = true;
        for entry in WalkDir::new(path).contents_first(true).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "failed to walk directory");
                    ok = false;
                    continue;
                }
            };
            let result = if entry.file_type().is_dir() {
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };
            if let Err(e) = result {
                warn!(path = %entry.path().display(), error = %e, "failed to remove entry");
                ok = false;
            }
        }
        ok
    }
}

fn copy_entry(entry: &DirEntry, target: &Path) -> io::Result<()> {
    let file_type = entry.file_type();
    if file_type.is_dir() {
        fs::create_dir_all(target)
    } else if file_type.is_symlink() {
        copy_symlink(entry.path(), target)
    } else {
        fs::copy(entry.path(), target).map(|_| ())
    }
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    let points_to = fs::read_link(link)?;
    std::os::unix::fs::symlink(points_to, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, _target: &Path) -> io::Result<()> {
    warn!(path = %link.display(), "skipping symbolic link");
    Ok(())
}
