//! Integration tests: the JSON report document is a stable contract.

use sketchlint_kernel::{
    Applicability, Cancellation, DirEntry, EngineOptions, FsError, MetadataState, OverallReport,
    ProjectContext, ProjectFs, ProjectId, ProjectType, RuleDescriptor, RuleId, RuleOutput,
    RuleRegistry, Severity, SeverityLevels, engine,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct NoFiles;

impl ProjectFs for NoFiles {
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

fn sketch(name: &str) -> ProjectContext {
    ProjectContext::new(
        ProjectId::new(name),
        PathBuf::from("sketches").join(name),
        ProjectType::Sketch,
        MetadataState::Absent,
        Arc::new(NoFiles),
    )
}

fn registry() -> RuleRegistry {
    RuleRegistry::from_descriptors(vec![
        RuleDescriptor::new(
            RuleId::parse("GN001").unwrap(),
            "general",
            "always passes",
            SeverityLevels::uniform(Severity::Error),
            Applicability::All,
            |_| Ok(RuleOutput::pass()),
        ),
        RuleDescriptor::new(
            RuleId::parse("SS001").unwrap(),
            "structure",
            "primary sketch file name mismatch",
            SeverityLevels::new(Severity::Warning, Severity::Warning, Severity::Error),
            Applicability::only(ProjectType::Sketch),
            |ctx| {
                if ctx.id().as_str() == "Broken" {
                    Ok(RuleOutput::fail("Broken.ino"))
                } else {
                    Ok(RuleOutput::pass())
                }
            },
        ),
        RuleDescriptor::new(
            RuleId::parse("SS002").unwrap(),
            "structure",
            "prohibited characters in sketch file names",
            SeverityLevels::uniform(Severity::Error),
            Applicability::only(ProjectType::Sketch),
            |ctx| {
                if ctx.id().as_str() == "Broken" {
                    Ok(RuleOutput::fail("bad name!.ino"))
                } else {
                    Ok(RuleOutput::pass())
                }
            },
        ),
        RuleDescriptor::new(
            RuleId::parse("SM001").unwrap(),
            "metadata",
            "sketch.json is not valid JSON",
            SeverityLevels::uniform(Severity::Error),
            Applicability::only(ProjectType::Sketch),
            |_| Ok(RuleOutput::skip("No metadata file")),
        ),
    ])
    .unwrap()
}

fn two_project_report() -> OverallReport {
    engine::run(
        &registry(),
        &[sketch("Broken"), sketch("Blink")],
        EngineOptions::default(),
        &Cancellation::new(),
    )
    .unwrap()
}

#[test]
fn two_project_report_matches_snapshot() {
    insta::assert_json_snapshot!("two_project_report", two_project_report());
}

#[test]
fn report_round_trips_through_json() {
    let report = two_project_report();
    let text = serde_json::to_string_pretty(&report).unwrap();
    let parsed: OverallReport = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, report);
}
