//! Report rendering: text for people, JSON for machines.

use sketchlint_kernel::{KindCounts, Outcome, OverallReport, ProjectReport, ResultKind};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to serialize report: {0}")]
    Serialize(String),

    #[error("failed to write report file {}: {detail}", path.display())]
    Write { path: PathBuf, detail: String },
}

pub fn render_json(report: &OverallReport) -> Result<String, RenderError> {
    serde_json::to_string_pretty(report).map_err(|err| RenderError::Serialize(err.to_string()))
}

fn counts_line(counts: &KindCounts) -> String {
    format!(
        "pass={}, fail={}, skip={}, engine_error={}",
        counts.pass, counts.fail, counts.skip, counts.engine_error
    )
}

fn outcome_label(outcome: &Outcome) -> String {
    match outcome.result() {
        ResultKind::Pass => "PASS".to_string(),
        ResultKind::Skip => "SKIP".to_string(),
        ResultKind::Fail | ResultKind::EngineError => outcome.level().as_str().to_uppercase(),
    }
}

fn render_project(out: &mut String, project: &ProjectReport, verbose: bool) {
    let _ = writeln!(
        out,
        "Linting {} in {}",
        project.project_type(),
        project.id()
    );
    for outcome in project.outcomes() {
        if !verbose && !outcome.result().is_failure() {
            continue;
        }
        let _ = write!(
            out,
            "  {} {} {}",
            outcome_label(outcome),
            outcome.rule_id(),
            outcome.brief()
        );
        if let Some(diagnostic) = outcome.diagnostic() {
            let _ = write!(out, ": {diagnostic}");
        }
        out.push('\n');
    }
    let verdict = if project.verdict().is_pass() {
        "PASS"
    } else {
        "FAIL"
    };
    let _ = writeln!(
        out,
        "[{}] {verdict} ({})",
        project.id(),
        counts_line(project.counts())
    );
}

/// Human-readable report. The run summary only appears for multi-project runs.
pub fn render_text(report: &OverallReport, verbose: bool) -> String {
    let mut out = String::new();
    for (index, project) in report.projects().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        render_project(&mut out, project, verbose);
    }

    if report.projects().len() > 1 {
        let passing = report
            .projects()
            .iter()
            .filter(|project| project.verdict().is_pass())
            .count();
        let _ = writeln!(out);
        let _ = writeln!(out, "Linter results for projects:");
        let _ = writeln!(
            out,
            "  projects: {} (pass={passing}, fail={})",
            report.projects().len(),
            report.projects().len() - passing
        );
        let _ = writeln!(out, "  outcomes: {}", counts_line(report.counts()));
        let _ = writeln!(
            out,
            "  errors: {}, warnings: {}",
            report.error_count(),
            report.warning_count()
        );
        let _ = writeln!(
            out,
            "  verdict: {}",
            if report.passed() { "PASS" } else { "FAIL" }
        );
    }

    if !report.complete() {
        let reason = if report.cancelled() {
            "run was cancelled before every rule finished"
        } else {
            "some rules did not report an outcome"
        };
        let _ = writeln!(out, "INCOMPLETE: {reason}");
    }
    out
}

/// Write the JSON report plus a trailing newline, creating parent folders.
pub fn write_report_file(report: &OverallReport, path: &Path) -> Result<(), RenderError> {
    let write_error = |err: std::io::Error| RenderError::Write {
        path: path.to_path_buf(),
        detail: err.to_string(),
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut document = render_json(report)?;
    document.push('\n');
    std::fs::write(path, document).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchlint_kernel::{ProjectId, ProjectType, ReportConfiguration, RuleId, Severity};

    fn id(raw: &str) -> RuleId {
        RuleId::parse(raw).unwrap()
    }

    fn project(name: &str, outcomes: Vec<Outcome>) -> ProjectReport {
        ProjectReport::build(
            ProjectId::new(name),
            name.to_string(),
            ProjectType::Sketch,
            outcomes,
            Severity::Error,
            true,
        )
    }

    fn name_pass() -> Outcome {
        Outcome::pass(
            id("SS001"),
            "name mismatch",
            Severity::Warning,
            String::new(),
        )
    }

    fn blink() -> ProjectReport {
        let chars_fail = Outcome::fail(
            id("SS002"),
            "prohibited characters in sketch file names",
            Severity::Error,
            "my sketch!.ino".to_string(),
        );
        let no_metadata = Outcome::skip(
            id("SM001"),
            "sketch.json",
            Severity::Error,
            "No metadata file".into(),
        );
        project("Blink", vec![name_pass(), chars_fail, no_metadata])
    }

    #[test]
    fn single_project_text_has_no_summary() {
        let report = OverallReport::build(ReportConfiguration::default(), vec![blink()], false);
        let text = render_text(&report, false);
        assert_eq!(
            text,
            "Linting sketch in Blink\n\
             \x20 ERROR SS002 prohibited characters in sketch file names: my sketch!.ino\n\
             [Blink] FAIL (pass=1, fail=1, skip=1, engine_error=0)\n"
        );
    }

    #[test]
    fn verbose_text_shows_every_outcome() {
        let report = OverallReport::build(ReportConfiguration::default(), vec![blink()], false);
        let text = render_text(&report, true);
        assert!(text.contains("  PASS SS001 name mismatch\n"));
        assert!(text.contains("  SKIP SM001 sketch.json: No metadata file\n"));
    }

    #[test]
    fn multi_project_text_has_summary() {
        let report = OverallReport::build(
            ReportConfiguration::default(),
            vec![blink(), project("Fade", vec![name_pass()])],
            false,
        );
        let text = render_text(&report, false);
        assert!(text.contains("Linter results for projects:\n"));
        assert!(text.contains("  projects: 2 (pass=1, fail=1)\n"));
        assert!(text.contains("  verdict: FAIL\n"));
        assert!(!text.contains("INCOMPLETE"));
    }

    #[test]
    fn incomplete_report_is_marked() {
        let report = OverallReport::build(ReportConfiguration::default(), vec![blink()], true);
        let marker = "INCOMPLETE: run was cancelled before every rule finished\n";
        assert!(render_text(&report, false).ends_with(marker));
    }

    #[test]
    fn report_file_is_written_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/report.json");
        let report = OverallReport::build(ReportConfiguration::default(), vec![blink()], false);
        write_report_file(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["projects"][0]["id"], "Blink");
        assert_eq!(value["verdict"], "fail");
    }
}
