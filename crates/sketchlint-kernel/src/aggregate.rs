//! Result collection and verdict computation.
//!
//! The aggregator is the only shared mutable state in a run. Workers call
//! `record` concurrently; each call takes the lock once, so a project's
//! outcome list is always either with or without a given outcome, never
//! half-written. `finalize` freezes the collected state into an
//! `OverallReport` and refuses any further writes.

use crate::error::KernelError;
use crate::outcome::Outcome;
use crate::project::{ProjectContext, ProjectId, ProjectType};
use crate::report::{OverallReport, ProjectReport, ReportConfiguration};
use crate::rule::RuleId;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct PendingProject {
    path: String,
    project_type: ProjectType,
    expected: BTreeSet<RuleId>,
    outcomes: BTreeMap<RuleId, Outcome>,
}

#[derive(Debug, Default)]
struct AggregatorState {
    finalized: bool,
    projects: BTreeMap<ProjectId, PendingProject>,
}

#[derive(Debug)]
pub struct Aggregator {
    configuration: ReportConfiguration,
    state: Mutex<AggregatorState>,
}

impl Aggregator {
    pub fn new(configuration: ReportConfiguration) -> Self {
        Self {
            configuration,
            state: Mutex::new(AggregatorState::default()),
        }
    }

    pub fn configuration(&self) -> &ReportConfiguration {
        &self.configuration
    }

    // A worker that panicked while holding the lock never leaves a partial
    // write behind, so the state is still consistent.
    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a project and the rule ids it is expected to receive.
    pub fn open_project(
        &self,
        context: &ProjectContext,
        expected: impl IntoIterator<Item = RuleId>,
    ) -> Result<(), KernelError> {
        let mut state = self.lock();
        if state.finalized {
            return Err(KernelError::ReportAlreadyFinalized);
        }
        if state.projects.contains_key(context.id()) {
            return Err(KernelError::DuplicateProject(context.id().to_string()));
        }
        state.projects.insert(
            context.id().clone(),
            PendingProject {
                path: context.root().display().to_string(),
                project_type: context.project_type(),
                expected: expected.into_iter().collect(),
                outcomes: BTreeMap::new(),
            },
        );
        Ok(())
    }

    /// Attach one outcome to its project. Safe to call from many workers.
    pub fn record(&self, project: &ProjectId, outcome: Outcome) -> Result<(), KernelError> {
        let mut state = self.lock();
        if state.finalized {
            return Err(KernelError::ReportAlreadyFinalized);
        }
        let pending = state
            .projects
            .get_mut(project)
            .ok_or_else(|| KernelError::UnknownProject(project.to_string()))?;
        let rule_id = outcome.rule_id().clone();
        if !pending.expected.contains(&rule_id) {
            return Err(KernelError::UnexpectedOutcome {
                project: project.to_string(),
                rule_id,
            });
        }
        if pending.outcomes.contains_key(&rule_id) {
            return Err(KernelError::DuplicateOutcome {
                project: project.to_string(),
                rule_id,
            });
        }
        pending.outcomes.insert(rule_id, outcome);
        Ok(())
    }

    /// Number of outcomes recorded so far across all projects.
    pub fn recorded(&self) -> usize {
        self.lock()
            .projects
            .values()
            .map(|pending| pending.outcomes.len())
            .sum()
    }

    /// Freeze the collected outcomes into the final report.
    ///
    /// A project missing any expected outcome is marked incomplete, and so is
    /// the whole report when `cancelled` is set.
    pub fn finalize(&self, cancelled: bool) -> Result<OverallReport, KernelError> {
        let mut state = self.lock();
        if state.finalized {
            return Err(KernelError::ReportAlreadyFinalized);
        }
        state.finalized = true;

        let blocking = self.configuration.blocking_severity;
        let projects = std::mem::take(&mut state.projects)
            .into_iter()
            .map(|(id, pending)| {
                let complete = pending.outcomes.len() == pending.expected.len();
                if !complete {
                    tracing::warn!(
                        project = %id,
                        expected = pending.expected.len(),
                        recorded = pending.outcomes.len(),
                        "project report is incomplete"
                    );
                }
                ProjectReport::build(
                    id,
                    pending.path,
                    pending.project_type,
                    pending.outcomes.into_values().collect(),
                    blocking,
                    complete,
                )
            })
            .collect();

        Ok(OverallReport::build(self.configuration, projects, cancelled))
    }
}
