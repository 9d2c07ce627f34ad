//! Severity and compliance levels.
//!
//! Every rule carries one severity per compliance level:
//!
//! - **Permissive**: only the hard requirements block
//! - **Specification**: the published project specification (the default)
//! - **Strict**: best practices are promoted towards errors
//!
//! The resolved severity decides whether a failing outcome contributes to a
//! failing verdict, by comparison against the configured blocking threshold.

use serde::{Deserialize, Serialize};

/// Weight of a rule's failure.
///
/// Ordered `Notice < Warning < Error`; a failing outcome blocks when its
/// severity is at or above the blocking threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Notice,
    Warning,
    #[default]
    Error,
}

impl Severity {
    /// Whether a failure at this severity blocks under `threshold`.
    pub fn blocks(self, threshold: Self) -> bool {
        self >= threshold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notice" | "info" => Ok(Self::Notice),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// How strictly projects are held to the rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Permissive,
    #[default]
    Specification,
    Strict,
}

impl ComplianceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Specification => "specification",
            Self::Strict => "strict",
        }
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComplianceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "specification" | "spec" => Ok(Self::Specification),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("unknown compliance level: {s}")),
        }
    }
}

/// Severity of one rule at each compliance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityLevels {
    pub permissive: Severity,
    pub specification: Severity,
    pub strict: Severity,
}

impl SeverityLevels {
    pub const fn new(permissive: Severity, specification: Severity, strict: Severity) -> Self {
        Self {
            permissive,
            specification,
            strict,
        }
    }

    /// Same severity regardless of compliance level.
    pub const fn uniform(severity: Severity) -> Self {
        Self::new(severity, severity, severity)
    }

    pub fn at(&self, level: ComplianceLevel) -> Severity {
        match level {
            ComplianceLevel::Permissive => self.permissive,
            ComplianceLevel::Specification => self.specification,
            ComplianceLevel::Strict => self.strict,
        }
    }
}
