//! Rule descriptors: static metadata plus an evaluation capability.

use crate::error::{KernelError, RuleError};
use crate::project::{ProjectContext, ProjectType};
use crate::severity::{ComplianceLevel, Severity, SeverityLevels};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

fn is_rule_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Stable token identifying a rule across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    pub fn parse(value: &str) -> Result<Self, KernelError> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err(KernelError::InvalidRuleId {
                raw: value.to_string(),
                reason: "rule id cannot be empty".to_string(),
            });
        }
        if !raw.chars().all(is_rule_id_char) {
            return Err(KernelError::InvalidRuleId {
                raw: raw.to_string(),
                reason: "expected ASCII letters, digits, `_`, `-` or `.`".to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RuleId {
    type Error = KernelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuleId> for String {
    fn from(id: RuleId) -> Self {
        id.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which project types a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    All,
    Only(Vec<ProjectType>),
}

impl Applicability {
    pub fn only(project_type: ProjectType) -> Self {
        Self::Only(vec![project_type])
    }

    pub fn matches(&self, project_type: ProjectType) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.contains(&project_type),
        }
    }

    /// Project types this applicability admits, in declaration order of `ProjectType::ALL`.
    pub fn project_types(&self) -> Vec<ProjectType> {
        ProjectType::ALL
            .into_iter()
            .filter(|project_type| self.matches(*project_type))
            .collect()
    }
}

/// What a rule body concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    Pass,
    Fail,
    Skip,
}

/// A rule body's normal return: a status plus its output text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutput {
    pub status: RuleStatus,
    pub text: String,
}

impl RuleOutput {
    pub fn pass() -> Self {
        Self {
            status: RuleStatus::Pass,
            text: String::new(),
        }
    }

    pub fn fail(text: impl Into<String>) -> Self {
        Self {
            status: RuleStatus::Fail,
            text: text.into(),
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            status: RuleStatus::Skip,
            text: reason.into(),
        }
    }
}

/// The evaluation capability of a rule.
pub type RuleFn = Arc<dyn Fn(&ProjectContext) -> Result<RuleOutput, RuleError> + Send + Sync>;

/// Immutable metadata and capability for one rule.
#[derive(Clone)]
pub struct RuleDescriptor {
    id: RuleId,
    category: String,
    brief: String,
    levels: SeverityLevels,
    applicability: Applicability,
    evaluate: RuleFn,
}

impl RuleDescriptor {
    pub fn new<F>(
        id: RuleId,
        category: impl Into<String>,
        brief: impl Into<String>,
        levels: SeverityLevels,
        applicability: Applicability,
        evaluate: F,
    ) -> Self
    where
        F: Fn(&ProjectContext) -> Result<RuleOutput, RuleError> + Send + Sync + 'static,
    {
        Self {
            id,
            category: category.into(),
            brief: brief.into(),
            levels,
            applicability,
            evaluate: Arc::new(evaluate),
        }
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn brief(&self) -> &str {
        &self.brief
    }

    pub fn levels(&self) -> SeverityLevels {
        self.levels
    }

    pub fn severity(&self, compliance: ComplianceLevel) -> Severity {
        self.levels.at(compliance)
    }

    pub fn applicability(&self) -> &Applicability {
        &self.applicability
    }

    pub fn applies_to(&self, project_type: ProjectType) -> bool {
        self.applicability.matches(project_type)
    }

    /// Run the rule body directly, without a fault boundary.
    ///
    /// Callers outside the executor should prefer `executor::execute`.
    pub fn evaluate(&self, context: &ProjectContext) -> Result<RuleOutput, RuleError> {
        (self.evaluate)(context)
    }
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("brief", &self.brief)
            .field("levels", &self.levels)
            .field("applicability", &self.applicability)
            .finish_non_exhaustive()
    }
}
