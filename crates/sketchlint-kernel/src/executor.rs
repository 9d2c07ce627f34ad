//! Rule execution inside a fault boundary.
//!
//! `Executor::execute` is the single place where rule faults are intercepted.
//! A rule that returns `Err`, or panics, still yields exactly one outcome:
//! `EngineError` with the diagnostic `rule <id> failed: <cause>`. Rules are
//! attempted once; there are no retries.
//!
//! Panics raised while a rule body runs are reported through `tracing` only:
//! a process-wide panic hook, installed on first use, stays silent for them
//! and forwards every other panic to the previously installed hook.

use crate::outcome::Outcome;
use crate::project::ProjectContext;
use crate::rule::{RuleDescriptor, RuleId, RuleStatus};
use crate::severity::ComplianceLevel;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::sync::Once;
use std::time::{Duration, Instant};

pub const DISABLED_REASON: &str = "disabled by configuration";

/// Per-run execution settings.
#[derive(Debug, Clone, Default)]
pub struct ExecutorOptions {
    pub compliance: ComplianceLevel,
    /// Invocations running longer than this are reported as `EngineError`.
    pub time_budget: Option<Duration>,
    /// Rules that are not invoked and yield `Skip` instead.
    pub disabled: BTreeSet<RuleId>,
}

#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecutorOptions,
}

thread_local! {
    static EVALUATING: Cell<bool> = const { Cell::new(false) };
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn install_quiet_panic_hook() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if EVALUATING.with(Cell::get) {
                let location = info.location().map(ToString::to_string);
                PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });
}

/// Clears the evaluating flag even if the caught call unwinds past it.
struct EvaluatingGuard;

impl EvaluatingGuard {
    fn enter() -> Self {
        EVALUATING.with(|flag| flag.set(true));
        PANIC_LOCATION.with(|slot| slot.borrow_mut().take());
        Self
    }
}

impl Drop for EvaluatingGuard {
    fn drop(&mut self) {
        EVALUATING.with(|flag| flag.set(false));
    }
}

/// Run `body` with panics caught and kept off stderr.
///
/// On panic, also returns where the panic was raised when the hook saw it.
fn catch_quietly<T>(
    body: impl FnOnce() -> T,
) -> (Result<T, Box<dyn Any + Send>>, Option<String>) {
    install_quiet_panic_hook();
    let guard = EvaluatingGuard::enter();
    let caught = catch_unwind(AssertUnwindSafe(body));
    drop(guard);
    let location = PANIC_LOCATION.with(|slot| slot.borrow_mut().take());
    (caught, location)
}

pub(crate) fn panic_payload_to_string(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl Executor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Run `descriptor` against `context` and produce exactly one outcome.
    pub fn execute(&self, descriptor: &RuleDescriptor, context: &ProjectContext) -> Outcome {
        let rule_id = descriptor.id().clone();
        let brief = descriptor.brief();
        let level = descriptor.severity(self.options.compliance);

        if self.options.disabled.contains(&rule_id) {
            return Outcome::skip(rule_id, brief, level, DISABLED_REASON.to_string());
        }

        let start = Instant::now();
        let (returned, panic_location) = catch_quietly(|| descriptor.evaluate(context));
        let elapsed = start.elapsed();

        let outcome = match returned {
            Ok(Ok(output)) => match output.status {
                RuleStatus::Pass => Outcome::pass(rule_id, brief, level, output.text),
                RuleStatus::Fail => Outcome::fail(rule_id, brief, level, output.text),
                RuleStatus::Skip => Outcome::skip(rule_id, brief, level, output.text),
            },
            Ok(Err(err)) => {
                tracing::warn!(
                    rule = %rule_id,
                    project = %context.id(),
                    error = %err,
                    "rule returned an error"
                );
                Outcome::engine_error(rule_id, brief, level, &err.to_string())
            }
            Err(payload) => {
                let payload_text = panic_payload_to_string(payload.as_ref());
                tracing::warn!(
                    rule = %rule_id,
                    project = %context.id(),
                    panic = %payload_text,
                    location = panic_location.as_deref().unwrap_or("unknown"),
                    "rule panicked"
                );
                let cause = format!("panicked: {payload_text}");
                Outcome::engine_error(rule_id, brief, level, &cause)
            }
        };

        match self.options.time_budget {
            Some(budget) if elapsed > budget => {
                tracing::warn!(
                    rule = %outcome.rule_id(),
                    project = %context.id(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "rule exceeded its time budget"
                );
                Outcome::engine_error(
                    outcome.rule_id().clone(),
                    brief,
                    level,
                    &format!(
                        "exceeded time budget of {}ms (took {}ms)",
                        budget.as_millis(),
                        elapsed.as_millis()
                    ),
                )
            }
            _ => {
                tracing::debug!(
                    rule = %outcome.rule_id(),
                    project = %context.id(),
                    result = %outcome.result(),
                    "rule evaluated"
                );
                outcome
            }
        }
    }
}

/// Run one rule with default options at `compliance`.
pub fn execute(
    descriptor: &RuleDescriptor,
    context: &ProjectContext,
    compliance: ComplianceLevel,
) -> Outcome {
    Executor::new(ExecutorOptions {
        compliance,
        ..ExecutorOptions::default()
    })
    .execute(descriptor, context)
}
