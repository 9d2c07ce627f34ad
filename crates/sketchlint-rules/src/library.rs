//! Rules for library projects.

use crate::common::{ERROR, NO_METADATA, miscased_dir, rule, valid_base_name};
use sketchlint_kernel::{
    KernelError, MetadataDocument, MetadataState, ProjectContext, ProjectType, RuleDescriptor,
    RuleError, RuleOutput,
};

pub const REQUIRED_PROPERTIES: [&str; 5] =
    ["name", "version", "author", "sentence", "architectures"];

fn properties_missing(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    Ok(match ctx.metadata() {
        MetadataState::Absent => RuleOutput::fail("library.properties"),
        _ => RuleOutput::pass(),
    })
}

fn properties_format(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    Ok(match ctx.metadata() {
        MetadataState::Absent => RuleOutput::skip(NO_METADATA),
        MetadataState::Invalid { error, .. } => RuleOutput::fail(error.clone()),
        MetadataState::Loaded { .. } => RuleOutput::pass(),
    })
}

fn required_fields(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    let properties = match ctx.metadata() {
        MetadataState::Absent => return Ok(RuleOutput::skip(NO_METADATA)),
        MetadataState::Invalid { .. } => {
            return Ok(RuleOutput::skip("library.properties could not be parsed"));
        }
        MetadataState::Loaded {
            document: MetadataDocument::Properties(properties),
            ..
        } => properties,
        MetadataState::Loaded { path, .. } => {
            return Err(RuleError::Internal(format!(
                "{} was not loaded as key/value properties",
                path.display()
            )));
        }
    };
    let missing: Vec<&str> = REQUIRED_PROPERTIES
        .into_iter()
        .filter(|field| properties.get(*field).is_none_or(|value| value.is_empty()))
        .collect();
    if missing.is_empty() {
        Ok(RuleOutput::pass())
    } else {
        Ok(RuleOutput::fail(missing.join(", ")))
    }
}

fn folder_name_characters(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    let folder = ctx.folder_name();
    if valid_base_name(&folder) {
        Ok(RuleOutput::pass())
    } else {
        Ok(RuleOutput::fail(folder))
    }
}

fn src_folder_case(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    miscased_dir(ctx, "src")
}

pub(crate) fn descriptors() -> Result<Vec<RuleDescriptor>, KernelError> {
    let library = ProjectType::Library;
    Ok(vec![
        rule(
            "LP001",
            "library.properties",
            "library.properties is missing",
            ERROR,
            library,
            properties_missing,
        )?,
        rule(
            "LP002",
            "library.properties",
            "library.properties format is invalid",
            ERROR,
            library,
            properties_format,
        )?,
        rule(
            "LP003",
            "library.properties",
            "library.properties is missing a required field",
            ERROR,
            library,
            required_fields,
        )?,
        rule(
            "LS001",
            "structure",
            "prohibited characters in library folder name",
            ERROR,
            library,
            folder_name_characters,
        )?,
        rule(
            "LS002",
            "structure",
            "incorrect case of src folder name",
            ERROR,
            library,
            src_folder_case,
        )?,
    ])
}
