//! Helpers shared by rule bodies.

use regex::Regex;
use sketchlint_kernel::{
    Applicability, DirEntry, KernelError, ProjectContext, ProjectType, RuleDescriptor, RuleError,
    RuleId, RuleOutput, Severity, SeverityLevels,
};
use std::sync::OnceLock;

pub const NO_METADATA: &str = "No metadata file";

pub(crate) const ERROR: SeverityLevels = SeverityLevels::uniform(Severity::Error);

/// Extensions of files that make up a sketch.
pub const SUPPORTED_SKETCH_EXTENSIONS: [&str; 8] =
    [".ino", ".pde", ".c", ".cpp", ".h", ".hpp", ".hh", ".S"];

/// Extensions a primary sketch file may use.
pub const PRIMARY_SKETCH_EXTENSIONS: [&str; 2] = [".ino", ".pde"];

fn valid_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("valid-name regex must compile")
    })
}

/// Starts with a letter or digit, then letters, digits, `_`, `.` or `-`.
pub fn valid_base_name(name: &str) -> bool {
    valid_name_re().is_match(name)
}

pub(crate) fn is_sketch_file(entry: &DirEntry) -> bool {
    !entry.is_dir && SUPPORTED_SKETCH_EXTENSIONS.contains(&entry.extension())
}

/// Fail listing `names` joined with `, `, or Pass when there are none.
pub(crate) fn fail_listing(names: Vec<String>) -> RuleOutput {
    if names.is_empty() {
        RuleOutput::pass()
    } else {
        RuleOutput::fail(names.join(", "))
    }
}

/// Top-level folders spelled like `wanted` but with different letter case.
pub(crate) fn miscased_dir(ctx: &ProjectContext, wanted: &str) -> Result<RuleOutput, RuleError> {
    let miscased = ctx
        .root_dirs()?
        .into_iter()
        .filter(|entry| entry.name != wanted && entry.name.eq_ignore_ascii_case(wanted))
        .map(|entry| entry.name)
        .collect();
    Ok(fail_listing(miscased))
}

pub(crate) fn rule<F>(
    id: &str,
    category: &str,
    brief: &str,
    levels: SeverityLevels,
    project_type: ProjectType,
    evaluate: F,
) -> Result<RuleDescriptor, KernelError>
where
    F: Fn(&ProjectContext) -> Result<RuleOutput, RuleError> + Send + Sync + 'static,
{
    Ok(RuleDescriptor::new(
        RuleId::parse(id)?,
        category,
        brief,
        levels,
        Applicability::only(project_type),
        evaluate,
    ))
}
