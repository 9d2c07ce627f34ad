use sketchlint_kernel::Cancellation;
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

pub const EXIT_FAIL: i32 = 1;
pub const EXIT_FAULT: i32 = 2;
/// Conventional status for a run stopped by SIGINT.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Print `error: <message>` to stderr and exit with `code`.
pub fn exit_with(code: i32, message: impl Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(code);
}

/// Install the stderr log subscriber. `--log-level` wins over `RUST_LOG`;
/// the default is `warn` so stdout stays clean for reports.
pub fn init_tracing(log_level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Unparsable directives fall back to `warn` rather than failing the run.
fn env_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Cancel `cancel` on the first Ctrl-C; exit 130 on the second.
pub fn install_interrupt_handler(cancel: Cancellation) {
    let spawned = std::thread::Builder::new()
        .name("sketchlint-signal".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    tracing::warn!(error = %err, "interrupt handler unavailable");
                    return;
                }
            };
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                tracing::warn!("interrupt received; finishing in-flight rules");
                cancel.cancel();
                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(EXIT_INTERRUPTED);
                }
            });
        });
    if let Err(err) = spawned {
        tracing::warn!(error = %err, "interrupt handler unavailable");
    }
}
