//! Project discovery: turn input paths into `ProjectContext`s.
//!
//! Classification looks only at a directory's immediate contents (plus its
//! `src` folder for libraries). Discovery never evaluates rules; any failure
//! here aborts the run before a report exists.

use crate::fs::LocalFs;
use crate::metadata::{BOARDS_TXT, LIBRARY_PROPERTIES, is_package_index_name, load_metadata};
use serde::{Deserialize, Serialize};
use sketchlint_kernel::{ProjectContext, ProjectId, ProjectType};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub const SKETCH_EXTENSIONS: [&str; 2] = [".ino", ".pde"];
pub const HEADER_EXTENSIONS: [&str; 3] = [".h", ".hh", ".hpp"];
pub const LIBRARY_EXAMPLES_DIR: &str = "examples";

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {detail}", path.display())]
    Unreadable { path: PathBuf, detail: String },

    #[error("no projects found in {0}")]
    NoProjects(String),
}

/// Which project types discovery should report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProjectTypeFilter {
    #[default]
    All,
    Only(ProjectType),
}

impl ProjectTypeFilter {
    pub fn admits(self, project_type: ProjectType) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == project_type,
        }
    }
}

impl std::fmt::Display for ProjectTypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(project_type) => write!(f, "{project_type}"),
        }
    }
}

impl std::str::FromStr for ProjectTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<ProjectType>().map(Self::Only)
    }
}

impl TryFrom<String> for ProjectTypeFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProjectTypeFilter> for String {
    fn from(value: ProjectTypeFilter) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub filter: ProjectTypeFilter,
    pub recursive: bool,
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| {
        name.len() > ext.len()
            && name
                .get(name.len() - ext.len()..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(ext))
    })
}

fn is_library_marker(name: &str) -> bool {
    name == LIBRARY_PROPERTIES || has_extension(name, &HEADER_EXTENSIONS)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Immediate children of `dir` as (name, is_dir), sorted by name.
fn list(dir: &Path) -> Result<Vec<(String, bool)>, DiscoveryError> {
    let unreadable = |err: std::io::Error| DiscoveryError::Unreadable {
        path: dir.to_path_buf(),
        detail: err.to_string(),
    };
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        children.push((
            entry.file_name().to_string_lossy().into_owned(),
            entry.path().is_dir(),
        ));
    }
    children.sort();
    Ok(children)
}

/// Classify one directory; first match wins.
pub fn classify(dir: &Path) -> Result<Option<ProjectType>, DiscoveryError> {
    let children = list(dir)?;
    let files: Vec<&str> = children
        .iter()
        .filter(|(_, is_dir)| !is_dir)
        .map(|(name, _)| name.as_str())
        .collect();

    if files.iter().any(|&name| has_extension(name, &SKETCH_EXTENSIONS)) {
        return Ok(Some(ProjectType::Sketch));
    }
    if files.iter().any(|&name| is_library_marker(name)) {
        return Ok(Some(ProjectType::Library));
    }
    let src = dir.join("src");
    if src.is_dir()
        && list(&src)?
            .iter()
            .any(|(name, is_dir)| !is_dir && has_extension(name, &HEADER_EXTENSIONS))
    {
        return Ok(Some(ProjectType::Library));
    }
    if files.contains(&BOARDS_TXT) {
        return Ok(Some(ProjectType::Platform));
    }
    if files.iter().any(|&name| is_package_index_name(name)) {
        return Ok(Some(ProjectType::PackageIndex));
    }
    Ok(None)
}

/// The root path as given, with `.` components dropped and `/` separators.
fn project_id(root: &Path) -> ProjectId {
    let parts: Vec<String> = root
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return ProjectId::new(".");
    }
    let joined = parts.join("/");
    // A leading root component already renders as "/".
    ProjectId::new(joined.replacen("//", "/", 1))
}

#[derive(Default)]
struct Found {
    // canonical root → (root as given, type); the given form only names the project
    projects: BTreeMap<PathBuf, (PathBuf, ProjectType)>,
}

impl Found {
    fn add(&mut self, root: &Path, project_type: ProjectType) -> Result<(), DiscoveryError> {
        let canonical = fs::canonicalize(root).map_err(|err| DiscoveryError::Unreadable {
            path: root.to_path_buf(),
            detail: err.to_string(),
        })?;
        self.projects
            .entry(canonical)
            .or_insert_with(|| (root.to_path_buf(), project_type));
        Ok(())
    }
}

/// Sketches anywhere under `dir`, not descending into a sketch once found.
fn collect_sketches(dir: &Path, found: &mut Found) -> Result<(), DiscoveryError> {
    for (name, is_dir) in list(dir)? {
        if !is_dir || is_hidden(&name) {
            continue;
        }
        let child = dir.join(&name);
        if classify(&child)? == Some(ProjectType::Sketch) {
            found.add(&child, ProjectType::Sketch)?;
        } else {
            collect_sketches(&child, found)?;
        }
    }
    Ok(())
}

fn add_project(
    root: &Path,
    project_type: ProjectType,
    options: &DiscoveryOptions,
    found: &mut Found,
) -> Result<(), DiscoveryError> {
    if options.filter.admits(project_type) {
        found.add(root, project_type)?;
    }
    if project_type == ProjectType::Library && options.filter.admits(ProjectType::Sketch) {
        let examples = root.join(LIBRARY_EXAMPLES_DIR);
        if examples.is_dir() {
            collect_sketches(&examples, found)?;
        }
    }
    Ok(())
}

/// Walk `dir`, collecting projects and not descending into them.
fn walk(
    dir: &Path,
    options: &DiscoveryOptions,
    found: &mut Found,
) -> Result<(), DiscoveryError> {
    if let Some(project_type) = classify(dir)? {
        return add_project(dir, project_type, options, found);
    }
    for (name, is_dir) in list(dir)? {
        if is_dir && !is_hidden(&name) {
            walk(&dir.join(&name), options, found)?;
        }
    }
    Ok(())
}

fn project_dir(path: &Path) -> Result<PathBuf, DiscoveryError> {
    if !path.try_exists().unwrap_or(false) {
        return Err(DiscoveryError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Ok(path.to_path_buf());
    }
    Ok(match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    })
}

/// Discover every project under `paths`, sorted by project id.
pub fn discover(
    paths: &[PathBuf],
    options: &DiscoveryOptions,
) -> Result<Vec<ProjectContext>, DiscoveryError> {
    let mut found = Found::default();
    for path in paths {
        let dir = project_dir(path)?;
        if options.recursive {
            walk(&dir, options, &mut found)?;
        } else {
            match classify(&dir)? {
                Some(project_type) if options.filter.admits(project_type) => {
                    add_project(&dir, project_type, options, &mut found)?;
                }
                _ => return Err(DiscoveryError::NoProjects(dir.display().to_string())),
            }
        }
    }

    if found.projects.is_empty() {
        let shown: Vec<String> = paths
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        return Err(DiscoveryError::NoProjects(shown.join(", ")));
    }

    let mut projects: Vec<ProjectContext> = found
        .projects
        .into_iter()
        .map(|(root, (given, project_type))| {
            let fs = LocalFs::new(&root);
            let metadata = load_metadata(&fs, project_type);
            tracing::debug!(
                root = %root.display(),
                project_type = %project_type,
                "discovered project"
            );
            ProjectContext::new(
                project_id(&given),
                root,
                project_type,
                metadata,
                Arc::new(fs),
            )
        })
        .collect();
    projects.sort_by(|a, b| a.id().cmp(b.id()));

    tracing::info!(projects = projects.len(), "discovery complete");
    Ok(projects)
}
