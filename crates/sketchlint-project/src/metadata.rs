//! Metadata loading, done once per project before any rule runs.

use sketchlint_kernel::{MetadataDocument, MetadataState, ProjectFs, ProjectType};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SKETCH_METADATA: &str = "sketch.json";
pub const LIBRARY_PROPERTIES: &str = "library.properties";
pub const BOARDS_TXT: &str = "boards.txt";
pub const PACKAGE_INDEX: &str = "package_index.json";

/// `package_index.json` or `package_<vendor>_index.json`.
pub fn is_package_index_name(name: &str) -> bool {
    name == PACKAGE_INDEX
        || (name.len() > "package__index.json".len()
            && name.starts_with("package_")
            && name.ends_with("_index.json"))
}

/// Parse `key=value` lines.
///
/// Blank lines and lines starting with `#` are ignored. Later duplicates
/// override earlier ones.
pub fn parse_properties(text: &str) -> Result<BTreeMap<String, String>, String> {
    let mut properties = BTreeMap::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(format!("line {}: missing `=` in `{line}`", index + 1));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("line {}: empty key", index + 1));
        }
        properties.insert(key.to_string(), value.trim().to_string());
    }
    Ok(properties)
}

fn metadata_file(fs: &dyn ProjectFs, project_type: ProjectType) -> Option<PathBuf> {
    let fixed = match project_type {
        ProjectType::Sketch => SKETCH_METADATA,
        ProjectType::Library => LIBRARY_PROPERTIES,
        ProjectType::Platform => BOARDS_TXT,
        ProjectType::PackageIndex => {
            let entries = fs.read_dir(Path::new("")).ok()?;
            return entries
                .into_iter()
                .find(|entry| !entry.is_dir && is_package_index_name(&entry.name))
                .map(|entry| PathBuf::from(entry.name));
        }
    };
    match fs.exists(Path::new(fixed)) {
        Ok(false) => None,
        _ => Some(PathBuf::from(fixed)),
    }
}

/// Load and parse the metadata file for a project of `project_type`.
///
/// Read and parse failures are captured as `MetadataState::Invalid` for the
/// metadata rules to report; they are never errors here.
pub fn load_metadata(fs: &dyn ProjectFs, project_type: ProjectType) -> MetadataState {
    let Some(path) = metadata_file(fs, project_type) else {
        return MetadataState::Absent;
    };
    let text = match fs.read_text(&path) {
        Ok(text) => text,
        Err(err) => {
            return MetadataState::Invalid {
                path,
                error: err.to_string(),
            };
        }
    };
    let parsed = match project_type {
        ProjectType::Sketch | ProjectType::PackageIndex => serde_json::from_str(&text)
            .map(MetadataDocument::Json)
            .map_err(|err| err.to_string()),
        ProjectType::Library | ProjectType::Platform => {
            parse_properties(&text).map(MetadataDocument::Properties)
        }
    };
    match parsed {
        Ok(document) => MetadataState::Loaded { path, document },
        Err(error) => {
            tracing::debug!(path = %path.display(), %error, "metadata failed to parse");
            MetadataState::Invalid { path, error }
        }
    }
}
