//! Local-disk implementation of the kernel's `ProjectFs` port.

use sketchlint_kernel::{DirEntry, FsError, ProjectFs};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Read-only accessor rooted at one project directory.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

fn shown(rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel.to_path_buf()
    }
}

fn io_error(op: &'static str, rel: &Path, err: std::io::Error) -> FsError {
    FsError::Io {
        op,
        path: shown(rel),
        detail: err.to_string(),
    }
}

impl LocalFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `rel` onto the root, refusing anything that could leave it.
    pub fn resolve(&self, rel: &Path) -> Result<PathBuf, FsError> {
        let mut resolved = self.root.clone();
        for component in rel.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(FsError::PathViolation {
                        path: rel.to_path_buf(),
                        detail: "parent directory references are not allowed".to_string(),
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(FsError::PathViolation {
                        path: rel.to_path_buf(),
                        detail: "path must be relative to the project root".to_string(),
                    });
                }
            }
        }
        Ok(resolved)
    }
}

impl ProjectFs for LocalFs {
    fn read_dir(&self, rel: &Path) -> Result<Vec<DirEntry>, FsError> {
        let dir = self.resolve(rel)?;
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| io_error("read_dir", rel, e))? {
            let entry = entry.map_err(|e| io_error("read_dir", rel, e))?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                // Follows symlinks, so a linked folder lists as a directory.
                is_dir: entry.path().is_dir(),
            });
        }
        entries.sort();
        Ok(entries)
    }

    fn read_text(&self, rel: &Path) -> Result<String, FsError> {
        let path = self.resolve(rel)?;
        fs::read_to_string(&path).map_err(|e| io_error("read", rel, e))
    }

    fn exists(&self, rel: &Path) -> Result<bool, FsError> {
        let path = self.resolve(rel)?;
        path.try_exists().map_err(|e| io_error("stat", rel, e))
    }

    fn is_dir(&self, rel: &Path) -> Result<bool, FsError> {
        let path = self.resolve(rel)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(io_error("stat", rel, err)),
        }
    }
}
