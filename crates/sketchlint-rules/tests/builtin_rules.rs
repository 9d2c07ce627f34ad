//! Integration tests: built-in rules against on-disk projects.
//!
//! Each test lays out a project with tempfile, discovers it the way the CLI
//! does, and runs the full registry through the engine.

use sketchlint_kernel::{
    Cancellation, ComplianceLevel, EngineOptions, OverallReport, ProjectReport, ProjectType,
    ResultKind, Severity, Verdict, engine,
};
use sketchlint_project::{DiscoveryOptions, discover};
use sketchlint_rules::{NO_METADATA, builtin_registry};
use std::fs;
use std::path::{Path, PathBuf};

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn lint(root: &Path, options: EngineOptions) -> OverallReport {
    let projects = discover(&[root.to_path_buf()], &DiscoveryOptions::default()).unwrap();
    let registry = builtin_registry().unwrap();
    engine::run(&registry, &projects, options, &Cancellation::new()).unwrap()
}

fn outcome<'a>(project: &'a ProjectReport, rule: &str) -> &'a sketchlint_kernel::Outcome {
    project
        .outcomes()
        .iter()
        .find(|outcome| outcome.rule_id().as_str() == rule)
        .unwrap_or_else(|| panic!("no outcome for {rule}"))
}

fn sketch_dir(files: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Blink");
    fs::create_dir_all(&root).unwrap();
    for (rel, text) in files {
        write(&root, rel, text);
    }
    (dir, root)
}

#[test]
fn registry_ids_are_unique_and_sorted() {
    let registry = builtin_registry().unwrap();
    let ids: Vec<&str> = registry.rules().map(|rule| rule.id().as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(registry.len(), 15);
    assert_eq!(registry.applicable_rules(ProjectType::Sketch).len(), 7);
    assert_eq!(registry.applicable_rules(ProjectType::Library).len(), 5);
}

#[test]
fn matching_primary_file_passes() {
    let (_guard, root) = sketch_dir(&[("Blink.ino", "void setup() {}\nvoid loop() {}\n")]);
    let report = lint(&root, EngineOptions::default());
    let project = &report.projects()[0];

    assert_eq!(outcome(project, "SS001").result(), ResultKind::Pass);
    assert_eq!(project.outcomes().len(), 7);
    assert_eq!(project.verdict(), Verdict::Pass);
    assert!(report.complete());
}

#[test]
fn prohibited_characters_fail_with_file_name() {
    let (_guard, root) = sketch_dir(&[("Blink.ino", ""), ("my sketch!.ino", "")]);
    let report = lint(&root, EngineOptions::default());
    let project = &report.projects()[0];

    let ss002 = outcome(project, "SS002");
    assert_eq!(ss002.result(), ResultKind::Fail);
    assert_eq!(ss002.diagnostic(), Some("my sketch!.ino"));
    assert_eq!(ss002.level(), Severity::Error);
    assert_eq!(project.verdict(), Verdict::Fail);
}

#[test]
fn sketch_json_states() {
    let (_guard, root) = sketch_dir(&[("Blink.ino", "")]);
    let report = lint(&root, EngineOptions::default());
    let sm001 = outcome(&report.projects()[0], "SM001");
    assert_eq!(sm001.result(), ResultKind::Skip);
    assert_eq!(sm001.diagnostic(), Some(NO_METADATA));

    write(&root, "sketch.json", "{ \"cpu\": ");
    let report = lint(&root, EngineOptions::default());
    let project = &report.projects()[0];
    let sm001 = outcome(project, "SM001");
    assert_eq!(sm001.result(), ResultKind::Fail);
    assert_eq!(sm001.diagnostic(), Some("sketch.json is not valid JSON"));
    assert_eq!(outcome(project, "SM002").result(), ResultKind::Fail);

    write(&root, "sketch.json", r#"{"cpu": "uno"}"#);
    let report = lint(&root, EngineOptions::default());
    let project = &report.projects()[0];
    assert_eq!(outcome(project, "SM001").result(), ResultKind::Pass);
    assert_eq!(
        outcome(project, "SM002").diagnostic(),
        Some("`cpu` must be an object")
    );
}

#[test]
fn mismatch_and_pde_depend_on_compliance() {
    let (_guard, root) = sketch_dir(&[("sketch.pde", "")]);

    let default = lint(&root, EngineOptions::default());
    let project = &default.projects()[0];
    let ss001 = outcome(project, "SS001");
    assert_eq!(ss001.diagnostic(), Some("Blink.ino"));
    assert_eq!(ss001.level(), Severity::Warning);
    assert_eq!(outcome(project, "SS004").diagnostic(), Some("sketch.pde"));
    assert_eq!(project.verdict(), Verdict::Pass);

    let strict = lint(
        &root,
        EngineOptions {
            compliance: ComplianceLevel::Strict,
            ..EngineOptions::default()
        },
    );
    assert_eq!(strict.projects()[0].verdict(), Verdict::Fail);
}

#[test]
fn long_names_and_miscased_src() {
    let long = format!("{}.ino", "a".repeat(64));
    let files = [("Blink.ino", ""), (long.as_str(), ""), ("SRC/util.h", "")];
    let (_guard, root) = sketch_dir(&files);
    let report = lint(&root, EngineOptions::default());
    let project = &report.projects()[0];
    assert_eq!(outcome(project, "SS003").diagnostic(), Some(long.as_str()));
    assert_eq!(outcome(project, "SS005").diagnostic(), Some("SRC"));
}

#[test]
fn library_properties_rules() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Servo");
    write(
        &root,
        "library.properties",
        "name=Servo\nversion=1.0.0\nauthor=\n",
    );
    write(&root, "src/Servo.h", "");
    let report = lint(&root, EngineOptions::default());
    let library = report.project(&root.display().to_string()).unwrap();

    assert_eq!(library.project_type(), ProjectType::Library);
    assert_eq!(outcome(library, "LP001").result(), ResultKind::Pass);
    assert_eq!(outcome(library, "LP002").result(), ResultKind::Pass);
    assert_eq!(
        outcome(library, "LP003").diagnostic(),
        Some("author, sentence, architectures")
    );
    assert_eq!(outcome(library, "LS001").result(), ResultKind::Pass);
    assert_eq!(library.verdict(), Verdict::Fail);
}

#[test]
fn header_only_library_without_properties() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("bad lib");
    write(&root, "bad.h", "");
    let report = lint(&root, EngineOptions::default());
    let library = &report.projects()[0];

    assert_eq!(
        outcome(library, "LP001").diagnostic(),
        Some("library.properties")
    );
    assert_eq!(outcome(library, "LP002").diagnostic(), Some(NO_METADATA));
    assert_eq!(outcome(library, "LS001").diagnostic(), Some("bad lib"));
}

#[test]
fn platform_and_package_index_rules() {
    let dir = tempfile::tempdir().unwrap();
    let platform = dir.path().join("avr");
    write(&platform, "boards.txt", "menu.cpu=Processor\n");
    let report = lint(&platform, EngineOptions::default());
    assert_eq!(
        outcome(&report.projects()[0], "PF001").result(),
        ResultKind::Fail
    );

    write(&platform, "boards.txt", "uno.name=Arduino Uno\n");
    let report = lint(&platform, EngineOptions::default());
    assert_eq!(report.verdict(), Verdict::Pass);

    let index = dir.path().join("index");
    write(&index, "package_index.json", r#"{"tools": []}"#);
    let report = lint(&index, EngineOptions::default());
    let project = &report.projects()[0];
    assert_eq!(outcome(project, "PI001").result(), ResultKind::Pass);
    assert_eq!(outcome(project, "PI002").diagnostic(), Some("packages"));
    assert_eq!(outcome(project, "PI002").level(), Severity::Warning);
    assert_eq!(project.verdict(), Verdict::Pass);

    write(&index, "package_index.json", "not json");
    let report = lint(&index, EngineOptions::default());
    let project = &report.projects()[0];
    assert_eq!(outcome(project, "PI001").result(), ResultKind::Fail);
    assert_eq!(outcome(project, "PI002").result(), ResultKind::Skip);
}
