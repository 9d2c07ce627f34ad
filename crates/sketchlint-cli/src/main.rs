//! sketchlint CLI: the `sketchlint` command.

mod cli;
mod commands;
mod config;
mod render;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Rules { json } => commands::rules::run(json),
    }
}
