//! The driving loop.
//!
//! Resolves applicable rules per project, opens each project in the
//! aggregator, executes every (project, rule) pair and records the outcome.
//! Pairs run on the calling thread when `jobs == 1`, otherwise on a bounded
//! rayon pool. Report ordering never depends on which path was taken.

use crate::aggregate::Aggregator;
use crate::error::KernelError;
use crate::executor::{Executor, ExecutorOptions};
use crate::project::ProjectContext;
use crate::registry::RuleRegistry;
use crate::report::{OverallReport, ReportConfiguration};
use crate::rule::{RuleDescriptor, RuleId};
use crate::severity::{ComplianceLevel, Severity};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Shared stop flag, checked before each pair is dispatched.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub compliance: ComplianceLevel,
    /// Lowest severity at which a Fail or EngineError blocks the verdict.
    pub blocking: Severity,
    /// Worker count; `1` means sequential on the calling thread.
    pub jobs: usize,
    pub time_budget: Option<Duration>,
    pub disabled: BTreeSet<RuleId>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            compliance: ComplianceLevel::default(),
            blocking: Severity::Error,
            jobs: 1,
            time_budget: None,
            disabled: BTreeSet::new(),
        }
    }
}

pub struct Engine<'r> {
    registry: &'r RuleRegistry,
    options: EngineOptions,
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r RuleRegistry, options: EngineOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Evaluate every applicable rule for every project and return the
    /// finalized report.
    ///
    /// Rule faults never surface here; an `Err` means an internal contract
    /// was broken (duplicate project id, worker pool failure).
    pub fn run(
        &self,
        projects: &[ProjectContext],
        cancel: &Cancellation,
    ) -> Result<OverallReport, KernelError> {
        let aggregator = Aggregator::new(ReportConfiguration {
            compliance: self.options.compliance,
            blocking_severity: self.options.blocking,
        });
        let executor = Executor::new(ExecutorOptions {
            compliance: self.options.compliance,
            time_budget: self.options.time_budget,
            disabled: self.options.disabled.clone(),
        });

        let mut pairs: Vec<(&ProjectContext, &RuleDescriptor)> = Vec::new();
        for project in projects {
            let rules = self.registry.applicable_rules(project.project_type());
            tracing::debug!(
                project = %project.id(),
                project_type = %project.project_type(),
                rules = rules.len(),
                "opening project"
            );
            aggregator.open_project(project, rules.iter().map(|rule| rule.id().clone()))?;
            pairs.extend(rules.into_iter().map(|rule| (project, rule)));
        }

        tracing::info!(
            projects = projects.len(),
            pairs = pairs.len(),
            jobs = self.options.jobs,
            "evaluating rules"
        );

        if self.options.jobs <= 1 {
            pairs.iter().try_for_each(|(project, rule)| {
                dispatch(&executor, &aggregator, cancel, project, rule)
            })?;
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.jobs)
                .thread_name(|index| format!("sketchlint-worker-{index}"))
                .build()
                .map_err(|err| KernelError::WorkerPool(err.to_string()))?;
            pool.install(|| {
                pairs.par_iter().try_for_each(|(project, rule)| {
                    dispatch(&executor, &aggregator, cancel, project, rule)
                })
            })?;
        }

        let cancelled = cancel.is_cancelled();
        if cancelled {
            tracing::warn!(
                recorded = aggregator.recorded(),
                expected = pairs.len(),
                "run cancelled; report will be incomplete"
            );
        }
        aggregator.finalize(cancelled)
    }
}

fn dispatch(
    executor: &Executor,
    aggregator: &Aggregator,
    cancel: &Cancellation,
    project: &ProjectContext,
    rule: &RuleDescriptor,
) -> Result<(), KernelError> {
    if cancel.is_cancelled() {
        return Ok(());
    }
    let _span = tracing::debug_span!("rule", project = %project.id(), rule = %rule.id()).entered();
    let outcome = executor.execute(rule, project);
    aggregator.record(project.id(), outcome)
}

/// Run `projects` against `registry` with `options`.
pub fn run(
    registry: &RuleRegistry,
    projects: &[ProjectContext],
    options: EngineOptions,
    cancel: &Cancellation,
) -> Result<OverallReport, KernelError> {
    Engine::new(registry, options).run(projects, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::project::ProjectType;
    use crate::rule::{Applicability, RuleOutput};
    use crate::severity::SeverityLevels;
    use crate::testing::context;

    fn pass(_: &ProjectContext) -> Result<RuleOutput, RuleError> {
        Ok(RuleOutput::pass())
    }

    fn registry() -> RuleRegistry {
        RuleRegistry::from_descriptors(vec![
            RuleDescriptor::new(
                RuleId::parse("SS001").unwrap(),
                "structure",
                "name",
                SeverityLevels::uniform(Severity::Error),
                Applicability::only(ProjectType::Sketch),
                pass,
            ),
            RuleDescriptor::new(
                RuleId::parse("LP001").unwrap(),
                "metadata",
                "props",
                SeverityLevels::uniform(Severity::Error),
                Applicability::only(ProjectType::Library),
                pass,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn pre_cancelled_run_records_nothing() {
        let registry = registry();
        let cancel = Cancellation::new();
        cancel.cancel();
        let report = run(
            &registry,
            &[context("Blink", ProjectType::Sketch)],
            EngineOptions::default(),
            &cancel,
        )
        .unwrap();
        assert!(!report.complete());
        assert!(report.cancelled());
        assert_eq!(report.counts().total, 0);
        assert_eq!(report.projects().len(), 1);
    }

    #[test]
    fn duplicate_project_id_is_internal_error() {
        let registry = registry();
        let err = run(
            &registry,
            &[
                context("Blink", ProjectType::Sketch),
                context("Blink", ProjectType::Sketch),
            ],
            EngineOptions::default(),
            &Cancellation::new(),
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::DuplicateProject(_)));
    }

    #[test]
    fn only_applicable_rules_run() {
        let registry = registry();
        let report = run(
            &registry,
            &[
                context("Blink", ProjectType::Sketch),
                context("Servo", ProjectType::Library),
                context("avr", ProjectType::Platform),
            ],
            EngineOptions::default(),
            &Cancellation::new(),
        )
        .unwrap();
        assert!(report.complete());
        let first_rule = |id: &str| report.project(id).unwrap().outcomes()[0].rule_id().clone();
        assert_eq!(first_rule("Blink").as_str(), "SS001");
        assert_eq!(first_rule("Servo").as_str(), "LP001");
        assert!(report.project("avr").unwrap().outcomes().is_empty());
    }
}
