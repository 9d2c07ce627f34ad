//! Rules for sketch projects.

use crate::common::{
    ERROR, NO_METADATA, PRIMARY_SKETCH_EXTENSIONS, fail_listing, is_sketch_file, miscased_dir, rule,
    valid_base_name,
};
use serde_json::Value;
use sketchlint_kernel::{
    KernelError, MetadataDocument, MetadataState, ProjectContext, ProjectType, RuleDescriptor,
    RuleError, RuleOutput, Severity, SeverityLevels,
};
use std::path::Path;

/// Longest allowed sketch file name, extension excluded.
pub const MAX_SKETCH_FILE_NAME_LENGTH: usize = 63;

fn name_mismatch(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    let folder = ctx.folder_name();
    for extension in PRIMARY_SKETCH_EXTENSIONS {
        if ctx.fs().exists(Path::new(&format!("{folder}{extension}")))? {
            return Ok(RuleOutput::pass());
        }
    }
    Ok(RuleOutput::fail(format!("{folder}.ino")))
}

fn prohibited_characters(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    let invalid = ctx
        .root_files()?
        .into_iter()
        .filter(|entry| is_sketch_file(entry) && !valid_base_name(&entry.name))
        .map(|entry| entry.name)
        .collect();
    Ok(fail_listing(invalid))
}

fn name_too_long(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    let too_long = ctx
        .root_files()?
        .into_iter()
        .filter(|entry| {
            is_sketch_file(entry) && entry.stem().chars().count() > MAX_SKETCH_FILE_NAME_LENGTH
        })
        .map(|entry| entry.name)
        .collect();
    Ok(fail_listing(too_long))
}

fn pde_extension(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    let pde = ctx
        .root_files()?
        .into_iter()
        .filter(|entry| entry.extension() == ".pde")
        .map(|entry| entry.name)
        .collect();
    Ok(fail_listing(pde))
}

fn src_folder_case(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    miscased_dir(ctx, "src")
}

fn metadata_json(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    Ok(match ctx.metadata() {
        MetadataState::Absent => RuleOutput::skip(NO_METADATA),
        MetadataState::Loaded { .. } => RuleOutput::pass(),
        // Empty text: the outcome falls back to the brief.
        MetadataState::Invalid { .. } => RuleOutput::fail(""),
    })
}

/// Shape problems in a parsed sketch.json.
pub fn sketch_json_problems(document: &Value) -> Vec<String> {
    let Some(root) = document.as_object() else {
        return vec!["root must be an object".to_string()];
    };
    let mut problems = Vec::new();
    if let Some(cpu) = root.get("cpu") {
        match cpu.as_object() {
            None => problems.push("`cpu` must be an object".to_string()),
            Some(cpu) => {
                for key in ["fqbn", "name", "port"] {
                    if cpu.get(key).is_some_and(|value| !value.is_string()) {
                        problems.push(format!("`cpu.{key}` must be a string"));
                    }
                }
            }
        }
    }
    if let Some(libs) = root.get("included_libs") {
        let all_strings = libs
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string));
        if !all_strings {
            problems.push("`included_libs` must be an array of strings".to_string());
        }
    }
    problems
}

fn metadata_format(ctx: &ProjectContext) -> Result<RuleOutput, RuleError> {
    match ctx.metadata() {
        MetadataState::Absent => Ok(RuleOutput::skip(NO_METADATA)),
        MetadataState::Invalid { error, .. } => Ok(RuleOutput::fail(error.clone())),
        MetadataState::Loaded {
            document: MetadataDocument::Json(value),
            ..
        } => {
            let problems = sketch_json_problems(value);
            if problems.is_empty() {
                Ok(RuleOutput::pass())
            } else {
                Ok(RuleOutput::fail(problems.join("; ")))
            }
        }
        MetadataState::Loaded { path, .. } => Err(RuleError::Internal(format!(
            "{} was not loaded as JSON",
            path.display()
        ))),
    }
}

pub(crate) fn descriptors() -> Result<Vec<RuleDescriptor>, KernelError> {
    let sketch = ProjectType::Sketch;
    Ok(vec![
        rule(
            "SS001",
            "structure",
            "name mismatch between primary sketch file and folder",
            SeverityLevels::new(Severity::Warning, Severity::Warning, Severity::Error),
            sketch,
            name_mismatch,
        )?,
        rule(
            "SS002",
            "structure",
            "prohibited characters in sketch file names",
            ERROR,
            sketch,
            prohibited_characters,
        )?,
        rule(
            "SS003",
            "structure",
            "sketch file name exceeds maximum length",
            SeverityLevels::new(Severity::Warning, Severity::Warning, Severity::Error),
            sketch,
            name_too_long,
        )?,
        rule(
            "SS004",
            "structure",
            "deprecated .pde sketch file extension",
            SeverityLevels::new(Severity::Notice, Severity::Warning, Severity::Warning),
            sketch,
            pde_extension,
        )?,
        rule(
            "SS005",
            "structure",
            "incorrect case of src folder name",
            ERROR,
            sketch,
            src_folder_case,
        )?,
        rule(
            "SM001",
            "sketch.json",
            "sketch.json is not valid JSON",
            ERROR,
            sketch,
            metadata_json,
        )?,
        rule(
            "SM002",
            "sketch.json",
            "sketch.json data format is invalid",
            ERROR,
            sketch,
            metadata_format,
        )?,
    ])
}
