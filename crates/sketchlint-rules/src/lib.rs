//! Built-in rule catalog.
//!
//! Every rule is a plain function of `&ProjectContext` registered with a
//! descriptor. Rules read the project through its read-only accessor and
//! pre-loaded metadata only; filesystem errors are returned with `?` and
//! become `EngineError` outcomes in the executor.

mod common;
mod library;
mod package_index;
mod platform;
mod sketch;

pub use common::{
    NO_METADATA, PRIMARY_SKETCH_EXTENSIONS, SUPPORTED_SKETCH_EXTENSIONS, valid_base_name,
};
pub use library::REQUIRED_PROPERTIES;
pub use sketch::{MAX_SKETCH_FILE_NAME_LENGTH, sketch_json_problems};

use sketchlint_kernel::{KernelError, RuleDescriptor, RuleRegistry};

/// All built-in descriptors, grouped by project type.
pub fn builtin_descriptors() -> Result<Vec<RuleDescriptor>, KernelError> {
    let mut descriptors = sketch::descriptors()?;
    descriptors.extend(library::descriptors()?);
    descriptors.extend(platform::descriptors()?);
    descriptors.extend(package_index::descriptors()?);
    Ok(descriptors)
}

/// The frozen registry of built-in rules.
pub fn builtin_registry() -> Result<RuleRegistry, KernelError> {
    RuleRegistry::from_descriptors(builtin_descriptors()?)
}
