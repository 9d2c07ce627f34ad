//! # Sketchlint Kernel
//!
//! Rule evaluation and result aggregation for project linting: run a
//! catalog of independent rules against discovered projects, contain every
//! rule fault, and fold the outcomes into one deterministic report.
//!
//! The kernel is project-agnostic. It treats the project type as an opaque
//! tag for applicability and reaches the project only through the
//! read-only `ProjectFs` port.
//!
//! ## Architecture
//!
//! ```text
//! RuleRegistry          ← Unique RuleId → RuleDescriptor, frozen at startup
//!     │
//! ProjectContext        ← Id, root, type, metadata, read-only fs
//!     │
//! Executor              ← Fault boundary: one Outcome per invocation
//!     │
//! Aggregator            ← Concurrent record, one-shot finalize
//!     │
//! OverallReport         ← Sorted, immutable; drives rendering and exit code
//! ```
//!
//! `Engine` is the loop tying these together.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod project;
pub mod registry;
pub mod report;
pub mod rule;
pub mod severity;

#[cfg(test)]
mod testing;

pub use aggregate::Aggregator;
pub use engine::{Cancellation, Engine, EngineOptions};
pub use error::{FsError, KernelError, RuleError};
pub use executor::{DISABLED_REASON, Executor, ExecutorOptions};
pub use outcome::{Outcome, ResultKind};
pub use project::{
    DirEntry, MetadataDocument, MetadataState, ProjectContext, ProjectFs, ProjectId, ProjectType,
};
pub use registry::{REGISTRY_KIND, RegistryBuilder, RuleListing, RuleRegistry};
pub use report::{
    KindCounts, OverallReport, ProjectReport, REPORT_KIND, REPORT_SCHEMA, ReportConfiguration,
    Verdict,
};
pub use rule::{Applicability, RuleDescriptor, RuleFn, RuleId, RuleOutput, RuleStatus};
pub use severity::{ComplianceLevel, Severity, SeverityLevels};
