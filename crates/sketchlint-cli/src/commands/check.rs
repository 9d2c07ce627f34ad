use crate::cli::CheckArgs;
use crate::config::{Config, OutputFormat};
use crate::render::{render_json, render_text, write_report_file};
use crate::support::{EXIT_FAIL, EXIT_FAULT, EXIT_INTERRUPTED, exit_with, install_interrupt_handler};
use sketchlint_kernel::{Cancellation, OverallReport, engine};
use sketchlint_project::discover;
use sketchlint_rules::builtin_registry;

pub fn run(args: CheckArgs) {
    let registry = builtin_registry()
        .unwrap_or_else(|err| exit_with(EXIT_FAULT, format!("invalid rule registry: {err}")));
    let config = Config::resolve(&args, &registry).unwrap_or_else(|err| exit_with(EXIT_FAULT, err));

    let projects = discover(&config.paths, &config.discovery).unwrap_or_else(|err| {
        exit_with(EXIT_FAIL, format!("error while finding projects: {err}"))
    });

    let cancel = Cancellation::new();
    install_interrupt_handler(cancel.clone());

    let report = engine::run(&registry, &projects, config.engine_options(), &cancel)
        .unwrap_or_else(|err| exit_with(EXIT_FAULT, format!("internal error: {err}")));

    match config.format {
        OutputFormat::Text => print!("{}", render_text(&report, config.verbose)),
        OutputFormat::Json => match render_json(&report) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => exit_with(EXIT_FAULT, err),
        },
    }

    if let Some(path) = &config.report_file
        && let Err(err) = write_report_file(&report, path)
    {
        exit_with(EXIT_FAULT, err);
    }

    let code = exit_code(&report);
    if code != 0 {
        std::process::exit(code);
    }
}

/// A partial report never exits 0, whatever its verdict so far.
fn exit_code(report: &OverallReport) -> i32 {
    if report.cancelled() {
        EXIT_INTERRUPTED
    } else if !report.complete() {
        EXIT_FAULT
    } else {
        report.exit_code()
    }
}
