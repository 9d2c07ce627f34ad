//! Test fixtures shared by unit tests.

use crate::error::FsError;
use crate::project::{DirEntry, MetadataState, ProjectContext, ProjectFs, ProjectId, ProjectType};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A filesystem with nothing in it.
pub(crate) struct EmptyFs;

impl ProjectFs for EmptyFs {
    fn read_dir(&self, _rel: &Path) -> Result<Vec<DirEntry>, FsError> {
        Ok(Vec::new())
    }

    fn read_text(&self, rel: &Path) -> Result<String, FsError> {
        Err(FsError::Io {
            op: "read",
            path: rel.to_path_buf(),
            detail: "not found".to_string(),
        })
    }

    fn exists(&self, _rel: &Path) -> Result<bool, FsError> {
        Ok(false)
    }

    fn is_dir(&self, _rel: &Path) -> Result<bool, FsError> {
        Ok(false)
    }
}

pub(crate) fn context(id: &str, project_type: ProjectType) -> ProjectContext {
    ProjectContext::new(
        ProjectId::new(id),
        PathBuf::from(id),
        project_type,
        MetadataState::Absent,
        Arc::new(EmptyFs),
    )
}
