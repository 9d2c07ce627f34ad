//! Rules for package index projects.

use crate::common::{ERROR, NO_METADATA, rule};
use serde_json::Value;
use sketchlint_kernel::{
    KernelError, MetadataDocument, MetadataState, ProjectContext, ProjectType, RuleDescriptor,
    RuleError, RuleOutput, Severity, SeverityLevels,
};

fn index_json(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    Ok(match ctx.metadata() {
        MetadataState::Absent => RuleOutput::skip(NO_METADATA),
        MetadataState::Invalid { error, .. } => RuleOutput::fail(error.clone()),
        MetadataState::Loaded { .. } => RuleOutput::pass(),
    })
}

fn packages_array(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    Ok(match ctx.metadata() {
        MetadataState::Absent => RuleOutput::skip(NO_METADATA),
        MetadataState::Invalid { .. } => RuleOutput::skip("package index is not valid JSON"),
        MetadataState::Loaded {
            document: MetadataDocument::Json(value),
            ..
        } => {
            if value.get("packages").is_some_and(Value::is_array) {
                RuleOutput::pass()
            } else {
                RuleOutput::fail("packages")
            }
        }
        MetadataState::Loaded { path, .. } => {
            return Err(RuleError::Internal(format!(
                "{} was not loaded as JSON",
                path.display()
            )));
        }
    })
}

pub(crate) fn descriptors() -> Result<Vec<RuleDescriptor>, KernelError> {
    let index = ProjectType::PackageIndex;
    Ok(vec![
        rule(
            "PI001",
            "package index",
            "package index is not valid JSON",
            ERROR,
            index,
            index_json,
        )?,
        rule(
            "PI002",
            "package index",
            "package index lacks a packages array",
            SeverityLevels::new(Severity::Warning, Severity::Warning, Severity::Error),
            index,
            packages_array,
        )?,
    ])
}
