use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use sketchlint_kernel::{ComplianceLevel, Severity};
use sketchlint_project::ProjectTypeFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sketchlint",
    about = "sketchlint: rule-based linting for sketches, libraries, platforms and package indexes",
    version
)]
pub struct Cli {
    /// Log filter, e.g. `debug` or `sketchlint_kernel=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint the projects found under the given paths
    Check(CheckArgs),

    /// List the built-in rules
    Rules {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Flags for `check`. Unset options fall back to the config file, then to defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Project paths, or folders containing projects with --recursive
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Console output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Compliance level: permissive, specification, or strict
    #[arg(long)]
    pub compliance: Option<ComplianceLevel>,

    /// Lowest severity that fails the run: notice, warning, or error
    #[arg(long)]
    pub blocking_severity: Option<Severity>,

    /// Also write the JSON report to this path
    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Only lint projects of this type (or `all`)
    #[arg(long)]
    pub project_type: Option<ProjectTypeFilter>,

    /// Search the paths recursively for projects
    #[arg(long, short)]
    pub recursive: bool,

    /// Also show passing and skipped rules
    #[arg(long, short)]
    pub verbose: bool,

    /// Worker threads; 1 runs rules sequentially
    #[arg(long, short)]
    pub jobs: Option<usize>,

    /// Per-rule time budget in milliseconds
    #[arg(long)]
    pub rule_timeout_ms: Option<u64>,

    /// Rule id to disable (repeatable)
    #[arg(long = "disable", value_name = "RULE_ID")]
    pub disabled_rules: Vec<String>,
}
