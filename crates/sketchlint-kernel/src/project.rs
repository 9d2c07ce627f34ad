//! Read-only view of one discovered project.
//!
//! The discovery collaborator builds a `ProjectContext` per project and
//! hands it to the engine. Rules only see the project through this view:
//! its identity, its type tag, the pre-loaded metadata parse result, and a
//! filesystem accessor that cannot write or leave the project root.

use crate::error::FsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Kind of project, as classified by discovery.
///
/// The kernel treats this as an opaque tag for rule applicability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Sketch,
    Library,
    Platform,
    PackageIndex,
}

impl ProjectType {
    pub const ALL: [ProjectType; 4] = [
        ProjectType::Sketch,
        ProjectType::Library,
        ProjectType::Platform,
        ProjectType::PackageIndex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sketch => "sketch",
            Self::Library => "library",
            Self::Platform => "platform",
            Self::PackageIndex => "package-index",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sketch" => Ok(Self::Sketch),
            "library" => Ok(Self::Library),
            "platform" => Ok(Self::Platform),
            "package-index" | "package_index" => Ok(Self::PackageIndex),
            _ => Err(format!("unknown project type: {s}")),
        }
    }
}

/// Stable identifier of a project within one run; reports sort by it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataDocument {
    /// Structured JSON metadata (sketch.json, package index).
    Json(Value),
    /// Flat `key=value` metadata (library.properties, boards.txt).
    Properties(BTreeMap<String, String>),
}

/// Outcome of loading a project's metadata file, captured before any rule runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    /// The project has no metadata file.
    Absent,
    Loaded {
        path: PathBuf,
        document: MetadataDocument,
    },
    /// The file exists but could not be read or parsed.
    Invalid { path: PathBuf, error: String },
}

impl MetadataState {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Absent => None,
            Self::Loaded { path, .. } | Self::Invalid { path, .. } => Some(path),
        }
    }

    pub fn load_error(&self) -> Option<&str> {
        match self {
            Self::Invalid { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<&MetadataDocument> {
        match self {
            Self::Loaded { document, .. } => Some(document),
            _ => None,
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    /// Extension including the leading dot (`.ino`), or empty.
    pub fn extension(&self) -> &str {
        match self.name.rfind('.') {
            Some(0) | None => "",
            Some(idx) => &self.name[idx..],
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        &self.name[..self.name.len() - self.extension().len()]
    }
}

/// Read-only filesystem port scoped to one project root.
///
/// All paths are relative to the project root. Implementations must reject
/// absolute paths and paths escaping the root.
pub trait ProjectFs: Send + Sync {
    /// List a directory, sorted by entry name.
    fn read_dir(&self, rel: &Path) -> Result<Vec<DirEntry>, FsError>;

    fn read_text(&self, rel: &Path) -> Result<String, FsError>;

    fn exists(&self, rel: &Path) -> Result<bool, FsError>;

    fn is_dir(&self, rel: &Path) -> Result<bool, FsError>;
}

/// Everything a rule may know about the project under evaluation.
#[derive(Clone)]
pub struct ProjectContext {
    id: ProjectId,
    root: PathBuf,
    project_type: ProjectType,
    metadata: MetadataState,
    fs: Arc<dyn ProjectFs>,
}

impl ProjectContext {
    pub fn new(
        id: ProjectId,
        root: PathBuf,
        project_type: ProjectType,
        metadata: MetadataState,
        fs: Arc<dyn ProjectFs>,
    ) -> Self {
        Self {
            id,
            root,
            project_type,
            metadata,
            fs,
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final component of the root path (the project folder name).
    ///
    /// Empty when the root has no final component (`.`), so discovery hands
    /// out canonical roots.
    pub fn folder_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn metadata(&self) -> &MetadataState {
        &self.metadata
    }

    pub fn fs(&self) -> &dyn ProjectFs {
        self.fs.as_ref()
    }

    /// Top-level files of the project root (directories filtered out).
    pub fn root_files(&self) -> Result<Vec<DirEntry>, FsError> {
        Ok(self
            .fs
            .read_dir(Path::new(""))?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .collect())
    }

    /// Top-level directories of the project root.
    pub fn root_dirs(&self) -> Result<Vec<DirEntry>, FsError> {
        Ok(self
            .fs
            .read_dir(Path::new(""))?
            .into_iter()
            .filter(|entry| entry.is_dir)
            .collect())
    }
}

impl std::fmt::Debug for ProjectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectContext")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("project_type", &self.project_type)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
