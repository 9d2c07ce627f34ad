//! Frozen report data model.
//!
//! This is the contract consumed by rendering and exit-code logic. Every
//! sequence in it is sorted (projects by id, outcomes by rule id), so two
//! reports over the same inputs serialize to identical JSON.

use crate::outcome::{Outcome, ResultKind};
use crate::project::{ProjectId, ProjectType};
use crate::severity::{ComplianceLevel, Severity};
use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA: u32 = 1;
pub const REPORT_KIND: &str = "sketchlint.report.v1";

/// Aggregated pass/fail judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of outcomes per result kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCounts {
    pub pass: u64,
    pub fail: u64,
    pub skip: u64,
    pub engine_error: u64,
    pub total: u64,
}

impl KindCounts {
    pub fn add(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::Pass => self.pass += 1,
            ResultKind::Fail => self.fail += 1,
            ResultKind::Skip => self.skip += 1,
            ResultKind::EngineError => self.engine_error += 1,
        }
        self.total += 1;
    }

    pub fn merge(&mut self, other: &Self) {
        self.pass += other.pass;
        self.fail += other.fail;
        self.skip += other.skip;
        self.engine_error += other.engine_error;
        self.total += other.total;
    }

    pub fn get(&self, kind: ResultKind) -> u64 {
        match kind {
            ResultKind::Pass => self.pass,
            ResultKind::Fail => self.fail,
            ResultKind::Skip => self.skip,
            ResultKind::EngineError => self.engine_error,
        }
    }
}

/// Settings the report was produced under, echoed into the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfiguration {
    pub compliance: ComplianceLevel,
    pub blocking_severity: Severity,
}

/// Outcomes and verdict for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    id: ProjectId,
    path: String,
    project_type: ProjectType,
    verdict: Verdict,
    complete: bool,
    counts: KindCounts,
    error_count: u64,
    warning_count: u64,
    outcomes: Vec<Outcome>,
}

impl ProjectReport {
    /// Fold outcomes into a project report.
    ///
    /// Outcomes are sorted by rule id here; the input order does not matter.
    pub fn build(
        id: ProjectId,
        path: String,
        project_type: ProjectType,
        mut outcomes: Vec<Outcome>,
        blocking: Severity,
        complete: bool,
    ) -> Self {
        outcomes.sort_by(|a, b| a.rule_id().cmp(b.rule_id()));

        let mut counts = KindCounts::default();
        let mut error_count = 0;
        let mut warning_count = 0;
        for outcome in &outcomes {
            counts.add(outcome.result());
            if outcome.result().is_failure() {
                match outcome.level() {
                    Severity::Error => error_count += 1,
                    Severity::Warning => warning_count += 1,
                    Severity::Notice => {}
                }
            }
        }
        let verdict = if outcomes.iter().any(|outcome| outcome.blocks(blocking)) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        Self {
            id,
            path,
            project_type,
            verdict,
            complete,
            counts,
            error_count,
            warning_count,
            outcomes,
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn counts(&self) -> &KindCounts {
        &self.counts
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn warning_count(&self) -> u64 {
        self.warning_count
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }
}

/// The whole run: every project report plus the overall verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallReport {
    schema: u32,
    report_kind: String,
    configuration: ReportConfiguration,
    verdict: Verdict,
    complete: bool,
    cancelled: bool,
    counts: KindCounts,
    error_count: u64,
    warning_count: u64,
    projects: Vec<ProjectReport>,
}

impl OverallReport {
    /// Fold project reports into the overall report, sorting projects by id.
    pub fn build(
        configuration: ReportConfiguration,
        mut projects: Vec<ProjectReport>,
        cancelled: bool,
    ) -> Self {
        projects.sort_by(|a, b| a.id.cmp(&b.id));

        let mut counts = KindCounts::default();
        let mut error_count = 0;
        let mut warning_count = 0;
        for project in &projects {
            counts.merge(&project.counts);
            error_count += project.error_count;
            warning_count += project.warning_count;
        }
        let verdict = if projects.iter().all(|project| project.verdict.is_pass()) {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        let complete = !cancelled && projects.iter().all(|project| project.complete);

        Self {
            schema: REPORT_SCHEMA,
            report_kind: REPORT_KIND.to_string(),
            configuration,
            verdict,
            complete,
            cancelled,
            counts,
            error_count,
            warning_count,
            projects,
        }
    }

    pub fn configuration(&self) -> &ReportConfiguration {
        &self.configuration
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }

    /// False when the run was cancelled or some expected outcome is missing.
    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn counts(&self) -> &KindCounts {
        &self.counts
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn warning_count(&self) -> u64 {
        self.warning_count
    }

    pub fn projects(&self) -> &[ProjectReport] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&ProjectReport> {
        self.projects
            .iter()
            .find(|project| project.id.as_str() == id)
    }

    /// Process exit code: 0 on pass, 1 on fail.
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleId;

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

    #[test]
    fn project_outcomes_are_sorted_by_rule_id() {
        let report = project(
            "Blink",
            vec![
                Outcome::pass(id("SS002"), "b", Severity::Error, String::new()),
                Outcome::pass(id("SM001"), "a", Severity::Error, String::new()),
                Outcome::pass(id("SS001"), "c", Severity::Error, String::new()),
            ],
        );
        let order: Vec<&str> = report
            .outcomes()
            .iter()
            .map(|outcome| outcome.rule_id().as_str())
            .collect();
        assert_eq!(order, vec!["SM001", "SS001", "SS002"]);
    }

    #[test]
    fn verdict_ignores_skips_and_sub_threshold_failures() {
        let report = project(
            "Blink",
            vec![
                Outcome::fail(id("SS004"), "pde", Severity::Warning, "Blink.pde".into()),
                Outcome::skip(id("SM001"), "json", Severity::Error, "no file".into()),
            ],
        );
        assert_eq!(report.verdict(), Verdict::Pass);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 0);

        let fault = Outcome::engine_error(id("SS005"), "src", Severity::Error, "boom");
        let failing = project("Broken", vec![fault]);
        assert_eq!(failing.verdict(), Verdict::Fail);
        assert_eq!(failing.error_count(), 1);
    }

    #[test]
    fn overall_report_sorts_projects_and_sums_counts() {
        let fail = Outcome::fail(id("SS002"), "chars", Severity::Error, "x!.ino".into());
        let pass = Outcome::pass(id("SS001"), "name", Severity::Error, String::new());
        let overall = OverallReport::build(
            ReportConfiguration::default(),
            vec![project("b", vec![fail]), project("a", vec![pass])],
            false,
        );
        let ids: Vec<&str> = overall
            .projects()
            .iter()
            .map(|project| project.id().as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(overall.verdict(), Verdict::Fail);
        assert_eq!(overall.exit_code(), 1);
        assert_eq!(overall.counts().pass, 1);
        assert_eq!(overall.counts().fail, 1);
        assert_eq!(overall.counts().total, 2);
        assert!(overall.complete());
    }

    #[test]
    fn cancelled_report_is_incomplete() {
        let overall = OverallReport::build(ReportConfiguration::default(), Vec::new(), true);
        assert!(!overall.complete());
        assert!(overall.cancelled());
        assert_eq!(overall.verdict(), Verdict::Pass);
        assert_eq!(overall.exit_code(), 0);
    }
}
