//! The recorded result of running one rule against one project.

use crate::rule::RuleId;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// Result classes an outcome can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Pass,
    Fail,
    Skip,
    EngineError,
}

impl ResultKind {
    /// Fail and EngineError are the kinds that can block a verdict.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Fail | Self::EngineError)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::EngineError => "engine_error",
        }
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule's outcome for one project. Immutable once built.
///
/// The constructors guarantee that Fail, EngineError, and Skip outcomes carry
/// non-empty text: empty input is replaced by `fallback`. Deserialization
/// rejects documents that break this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "OutcomeRecord")]
pub struct Outcome {
    rule_id: RuleId,
    brief: String,
    result: ResultKind,
    level: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diagnostic: Option<String>,
}

/// Wire form of an [`Outcome`], validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeRecord {
    rule_id: RuleId,
    brief: String,
    result: ResultKind,
    level: Severity,
    #[serde(default)]
    diagnostic: Option<String>,
}

impl TryFrom<OutcomeRecord> for Outcome {
    type Error = String;

    fn try_from(record: OutcomeRecord) -> Result<Self, Self::Error> {
        let has_text = record
            .diagnostic
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty());
        if record.result != ResultKind::Pass && !has_text {
            return Err(format!(
                "{} outcome for rule {} has no diagnostic",
                record.result, record.rule_id
            ));
        }
        Ok(Self {
            rule_id: record.rule_id,
            brief: record.brief,
            result: record.result,
            level: record.level,
            diagnostic: record.diagnostic,
        })
    }
}

fn non_empty(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

impl Outcome {
    pub fn pass(rule_id: RuleId, brief: impl Into<String>, level: Severity, text: String) -> Self {
        Self {
            rule_id,
            brief: brief.into(),
            result: ResultKind::Pass,
            level,
            diagnostic: (!text.trim().is_empty()).then_some(text),
        }
    }

    pub fn fail(
        rule_id: RuleId,
        brief: impl Into<String>,
        level: Severity,
        diagnostic: String,
    ) -> Self {
        let brief = brief.into();
        let diagnostic = non_empty(diagnostic, &brief);
        Self {
            rule_id,
            brief,
            result: ResultKind::Fail,
            level,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn skip(
        rule_id: RuleId,
        brief: impl Into<String>,
        level: Severity,
        reason: String,
    ) -> Self {
        let reason = non_empty(reason, "rule skipped without a reason");
        Self {
            rule_id,
            brief: brief.into(),
            result: ResultKind::Skip,
            level,
            diagnostic: Some(reason),
        }
    }

    /// A fault inside rule evaluation, reported as `rule <id> failed: <cause>`.
    pub fn engine_error(
        rule_id: RuleId,
        brief: impl Into<String>,
        level: Severity,
        cause: &str,
    ) -> Self {
        let cause = if cause.trim().is_empty() {
            "unknown fault"
        } else {
            cause
        };
        let diagnostic = format!("rule {rule_id} failed: {cause}");
        Self {
            rule_id,
            brief: brief.into(),
            result: ResultKind::EngineError,
            level,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    pub fn brief(&self) -> &str {
        &self.brief
    }

    pub fn result(&self) -> ResultKind {
        self.result
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Whether this outcome makes its project fail under `threshold`.
    pub fn blocks(&self, threshold: Severity) -> bool {
        self.result.is_failure() && self.level.blocks(threshold)
    }
}
