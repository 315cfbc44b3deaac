//! Workspace file browser.
//!
//! Raw listing, reading and publishing of files under one working
//! directory. Every resolved path is checked for prefix containment
//! against the canonicalized workspace root, blocking traversal outside
//! it (`../`, absolute paths, symlinked escapes).

use crate::data::StoreError;
use serde::Serialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// One directory entry in a listing.
#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
}

/// File browser scoped to a working directory.
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Scope a workspace to `root`, which must exist.
    pub fn new(root: &Path) -> io::Result<Self> {
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    /// List a directory inside the workspace, sorted by name.
    pub fn list(&self, rel: &str) -> Result<Vec<FileEntry>, StoreError> {
        let dir = self.resolve_existing(rel)?;

        let mut entries: Vec<FileEntry> = fs::read_dir(&dir)?
            .filter_map(Result::ok)
            .map(|entry| FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Read a file inside the workspace as UTF-8 text.
    pub fn read(&self, rel: &str) -> Result<String, StoreError> {
        let path = self.resolve_existing(rel)?;
        fs::read_to_string(&path)
            .map_err(|err| match err.kind() {
                io::ErrorKind::InvalidData => {
                    StoreError::Decode(format!("`{rel}` is not valid UTF-8"))
                }
                _ => StoreError::Io(err),
            })
    }

    /// Overwrite (or create) a file inside the workspace.
    pub fn write(&self, rel: &str, content: &str) -> Result<(), StoreError> {
        let rel_path = self.check_relative(rel)?;

        // Containment is checked on the canonicalized parent, so a
        // symlinked directory cannot smuggle the write outside the root
        let joined = self.root.join(rel_path);
        let parent = joined
            .parent()
            .ok_or_else(|| StoreError::Validation(format!("invalid path: `{rel}`")))?;
        let parent = parent.canonicalize().map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(format!("directory of `{rel}`")),
            _ => StoreError::Io(err),
        })?;
        self.check_contained(&parent, rel)?;

        let file_name = joined
            .file_name()
            .ok_or_else(|| StoreError::Validation(format!("invalid path: `{rel}`")))?;
        fs::write(parent.join(file_name), content)?;
        Ok(())
    }

    /// Resolve a relative path to an existing, contained absolute path.
    fn resolve_existing(&self, rel: &str) -> Result<PathBuf, StoreError> {
        let rel_path = self.check_relative(rel)?;

        let path = self
            .root
            .join(rel_path)
            .canonicalize()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => StoreError::NotFound(format!("path `{rel}`")),
                _ => StoreError::Io(err),
            })?;
        self.check_contained(&path, rel)?;
        Ok(path)
    }

    /// Reject absolute input paths up front.
    fn check_relative<'a>(&self, rel: &'a str) -> Result<&'a Path, StoreError> {
        let path = Path::new(rel);
        if path.is_absolute() {
            return Err(StoreError::Validation(format!(
                "path must be relative: `{rel}`"
            )));
        }
        Ok(path)
    }

    /// Prefix containment check against the workspace root.
    fn check_contained(&self, path: &Path, rel: &str) -> Result<(), StoreError> {
        if !path.starts_with(&self.root) {
            return Err(StoreError::Validation(format!(
                "path escapes the workspace: `{rel}`"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
