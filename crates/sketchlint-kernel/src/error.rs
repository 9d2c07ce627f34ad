//! Error types for kernel operations.

use crate::rule::RuleId;
use std::path::PathBuf;

/// Errors raised by registry construction, aggregation, and the driving loop.
///
/// None of these describe a rule failing; rule failures are data
/// (`ResultKind::EngineError`) and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// A rule id was registered twice.
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(RuleId),

    /// A rule id token is malformed.
    #[error("invalid rule id `{raw}`: {reason}")]
    InvalidRuleId { raw: String, reason: String },

    /// `record`, `open_project` or `finalize` was called after `finalize`.
    #[error("report already finalized")]
    ReportAlreadyFinalized,

    /// A project was opened twice in the same aggregation.
    #[error("project already opened: {0}")]
    DuplicateProject(String),

    /// An outcome was recorded for a project that was never opened.
    #[error("unknown project: {0}")]
    UnknownProject(String),

    /// A second outcome arrived for the same (project, rule) pair.
    #[error("duplicate outcome for rule {rule_id} in project {project}")]
    DuplicateOutcome { project: String, rule_id: RuleId },

    /// An outcome arrived for a rule the project was not opened with.
    #[error("rule {rule_id} is not applicable to project {project}")]
    UnexpectedOutcome { project: String, rule_id: RuleId },

    /// The bounded worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Failures of the read-only project filesystem accessor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    /// The requested path is absolute or escapes the project root.
    #[error("path violation: {} ({detail})", path.display())]
    PathViolation { path: PathBuf, detail: String },

    /// The underlying read failed.
    #[error("io error: {op} {} ({detail})", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        detail: String,
    },
}

/// Failures a rule body reports instead of a Pass/Fail/Skip result.
///
/// The executor converts every `RuleError` into an `EngineError` outcome.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Fs(#[from] FsError),

    /// The rule could not reach a judgment for a rule-specific reason.
    #[error("{0}")]
    Internal(String),
}
