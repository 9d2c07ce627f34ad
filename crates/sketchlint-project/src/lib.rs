//! # sketchlint-project
//!
//! Discovery collaborator for the kernel: finds projects on disk, classifies
//! them, pre-loads their metadata, and hands each one to the engine as a
//! `ProjectContext` backed by a read-only `LocalFs`.
//!
//! ```text
//! paths ──classify──▶ (root, ProjectType) ──load_metadata──▶ ProjectContext
//! ```

pub mod discovery;
pub mod fs;
pub mod metadata;

pub use discovery::{
    DiscoveryError, DiscoveryOptions, HEADER_EXTENSIONS, LIBRARY_EXAMPLES_DIR, ProjectTypeFilter,
    SKETCH_EXTENSIONS, classify, discover,
};
pub use fs::LocalFs;
pub use metadata::{
    BOARDS_TXT, LIBRARY_PROPERTIES, PACKAGE_INDEX, SKETCH_METADATA, is_package_index_name,
    load_metadata, parse_properties,
};
