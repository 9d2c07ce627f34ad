//! Rules for platform projects.

use crate::common::{ERROR, rule};
use sketchlint_kernel::{
    KernelError, MetadataDocument, MetadataState, ProjectContext, ProjectType, RuleDescriptor,
    RuleError, RuleOutput,
};

/// A board is declared by a `<board>.name` key.
fn defines_boards(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    Ok(match ctx.metadata() {
        MetadataState::Loaded {
            document: MetadataDocument::Properties(properties),
            ..
        } if properties
            .keys()
            .any(|key| key.split_once('.').is_some_and(|(_, rest)| rest == "name")) =>
        {
            RuleOutput::pass()
        }
        MetadataState::Invalid { error, .. } => RuleOutput::fail(error.clone()),
        _ => RuleOutput::fail("boards.txt"),
    })
}

pub(crate) fn descriptors() -> Result<Vec<RuleDescriptor>, KernelError> {
    Ok(vec![rule(
        "PF001",
        "boards.txt",
        "boards.txt defines no boards",
        ERROR,
        ProjectType::Platform,
        defines_boards,
    )?])
}
