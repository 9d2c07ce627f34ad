//! Run configuration: CLI flags layered over an optional TOML file.
//!
//! Precedence is flag, then file, then default. Everything is validated here,
//! before discovery starts.

use crate::cli::CheckArgs;
use serde::Deserialize;
use sketchlint_kernel::{ComplianceLevel, EngineOptions, RuleId, RuleRegistry, Severity};
use sketchlint_project::{DiscoveryOptions, ProjectTypeFilter};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {detail}", path.display())]
    Read { path: PathBuf, detail: String },

    #[error("invalid config {}: {detail}", path.display())]
    Parse { path: PathBuf, detail: String },

    #[error("invalid value for `{field}`: {detail}")]
    Invalid {
        field: &'static str,
        detail: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Shape of the TOML config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub format: Option<OutputFormat>,
    pub compliance: Option<ComplianceLevel>,
    pub blocking_severity: Option<Severity>,
    pub report_file: Option<PathBuf>,
    pub project_type: Option<ProjectTypeFilter>,
    pub recursive: Option<bool>,
    pub verbose: Option<bool>,
    pub jobs: Option<usize>,
    pub rule_timeout_ms: Option<u64>,
    pub disabled_rules: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        toml::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })
    }
}

/// Fully resolved settings for one `check` run.
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub compliance: ComplianceLevel,
    pub blocking_severity: Severity,
    pub report_file: Option<PathBuf>,
    pub discovery: DiscoveryOptions,
    pub verbose: bool,
    pub jobs: usize,
    pub rule_timeout: Option<Duration>,
    pub disabled_rules: BTreeSet<RuleId>,
}

fn disabled_rule_ids(
    raw: &[String],
    registry: &RuleRegistry,
) -> Result<BTreeSet<RuleId>, ConfigError> {
    raw.iter()
        .map(|token| {
            let id = RuleId::parse(token).map_err(|err| ConfigError::Invalid {
                field: "disabled_rules",
                detail: err.to_string(),
            })?;
            if !registry.contains(&id) {
                return Err(ConfigError::Invalid {
                    field: "disabled_rules",
                    detail: format!("unknown rule id: {id}"),
                });
            }
            Ok(id)
        })
        .collect()
}

impl Config {
    pub fn resolve(args: &CheckArgs, registry: &RuleRegistry) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file, registry)
    }

    pub fn merge(
        args: &CheckArgs,
        file: FileConfig,
        registry: &RuleRegistry,
    ) -> Result<Self, ConfigError> {
        let jobs = args.jobs.or(file.jobs).unwrap_or(1);
        if jobs == 0 {
            return Err(ConfigError::Invalid {
                field: "jobs",
                detail: "must be at least 1".to_string(),
            });
        }

        let rule_timeout = match args.rule_timeout_ms.or(file.rule_timeout_ms) {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    field: "rule_timeout_ms",
                    detail: "must be greater than 0".to_string(),
                });
            }
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };

        let disabled_raw = if args.disabled_rules.is_empty() {
            file.disabled_rules.unwrap_or_default()
        } else {
            args.disabled_rules.clone()
        };
        let disabled_rules = disabled_rule_ids(&disabled_raw, registry)?;

        let paths = if args.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            args.paths.clone()
        };

        Ok(Self {
            paths,
            format: args.format.or(file.format).unwrap_or_default(),
            compliance: args.compliance.or(file.compliance).unwrap_or_default(),
            blocking_severity: args
                .blocking_severity
                .or(file.blocking_severity)
                .unwrap_or_default(),
            report_file: args.report_file.clone().or(file.report_file),
            discovery: DiscoveryOptions {
                filter: args.project_type.or(file.project_type).unwrap_or_default(),
                recursive: args.recursive || file.recursive.unwrap_or(false),
            },
            verbose: args.verbose || file.verbose.unwrap_or(false),
            jobs,
            rule_timeout,
            disabled_rules,
        })
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            compliance: self.compliance,
            blocking: self.blocking_severity,
            jobs: self.jobs,
            time_budget: self.rule_timeout,
            disabled: self.disabled_rules.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchlint_kernel::ProjectType;

    fn registry() -> RuleRegistry {
        sketchlint_rules::builtin_registry().unwrap()
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let config =
            Config::merge(&CheckArgs::default(), FileConfig::default(), &registry()).unwrap();
        assert_eq!(config.paths, vec![PathBuf::from(".")]);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.compliance, ComplianceLevel::Specification);
        assert_eq!(config.blocking_severity, Severity::Error);
        assert_eq!(config.jobs, 1);
        assert!(config.rule_timeout.is_none());
        assert!(!config.discovery.recursive);
        assert!(config.disabled_rules.is_empty());
    }

    #[test]
    fn flags_override_file_values() {
        let file: FileConfig = toml::from_str(
            r#"
            format = "json"
            compliance = "strict"
            blocking_severity = "warning"
            project_type = "library"
            recursive = true
            jobs = 4
            disabled_rules = ["SS004"]
            "#,
        )
        .unwrap();
        let args = CheckArgs {
            compliance: Some(ComplianceLevel::Permissive),
            jobs: Some(2),
            ..CheckArgs::default()
        };
        let config = Config::merge(&args, file, &registry()).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.compliance, ComplianceLevel::Permissive);
        assert_eq!(config.blocking_severity, Severity::Warning);
        assert_eq!(
            config.discovery.filter,
            ProjectTypeFilter::Only(ProjectType::Library)
        );
        assert!(config.discovery.recursive);
        assert_eq!(config.jobs, 2);
        assert!(config.disabled_rules.contains(&RuleId::parse("SS004").unwrap()));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_jobs = CheckArgs {
            jobs: Some(0),
            ..CheckArgs::default()
        };
        assert!(matches!(
            Config::merge(&zero_jobs, FileConfig::default(), &registry()),
            Err(ConfigError::Invalid { field: "jobs", .. })
        ));

        let zero_timeout = CheckArgs {
            rule_timeout_ms: Some(0),
            ..CheckArgs::default()
        };
        assert!(matches!(
            Config::merge(&zero_timeout, FileConfig::default(), &registry()),
            Err(ConfigError::Invalid { field: "rule_timeout_ms", .. })
        ));

        let unknown_rule = CheckArgs {
            disabled_rules: vec!["XX999".to_string()],
            ..CheckArgs::default()
        };
        let err = Config::merge(&unknown_rule, FileConfig::default(), &registry()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for `disabled_rules`: unknown rule id: XX999"
        );
    }

    #[test]
    fn unknown_file_keys_and_bad_values_fail_to_parse() {
        assert!(toml::from_str::<FileConfig>("colour = true").is_err());
        assert!(toml::from_str::<FileConfig>(r#"compliance = "lenient""#).is_err());
        assert!(toml::from_str::<FileConfig>(r#"project_type = "firmware""#).is_err());
    }

    #[test]
    fn missing_config_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
