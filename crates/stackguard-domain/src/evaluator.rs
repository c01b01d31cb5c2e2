use crate::model::Resource;
use crate::resolve::ValueResolver;
use crate::rule::{ComplianceResult, Rule, RuleContext};
use stackguard_types::Level;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use tracing::warn;

thread_local! {
    /// Set while this thread runs a predicate; the panic hook stays quiet and records the location.
    static IN_PREDICATE: Cell<bool> = const { Cell::new(false) };
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static QUIET_HOOK: Once = Once::new();

/// Wraps the current panic hook once per process. Panics outside a predicate still reach it.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if IN_PREDICATE.with(Cell::get) {
                let location = info.location().map(|l| l.to_string());
                PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });
}

/// Classified result of applying one rule to one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Not applicable to this resource.
    Skip,
    Pass,
    Fail { level: Level },
    /// The rule could not be evaluated to completion.
    ValidationFailure { error: String },
}

/// Invokes rule predicates behind a failure-isolation boundary.
///
/// Nothing raised by a predicate escapes `evaluate`: unresolved values, predicate-reported
/// errors and panics all become [`Outcome::ValidationFailure`]. A predicate panic is reported
/// through the `warn!` event only; the default panic message is not printed for it.
pub struct Evaluator<'a> {
    resolver: &'a dyn ValueResolver,
}

impl<'a> Evaluator<'a> {
    pub fn new(resolver: &'a dyn ValueResolver) -> Self {
        Self { resolver }
    }

    pub fn evaluate(&self, rule: &Rule, resource: &Resource) -> Outcome {
        let ctx = RuleContext::new(resource, self.resolver);
        install_quiet_hook();
        IN_PREDICATE.with(|flag| flag.set(true));
        let result = panic::catch_unwind(AssertUnwindSafe(|| rule.check(&ctx)));
        IN_PREDICATE.with(|flag| flag.set(false));

        let error = match result {
            Ok(Ok(ComplianceResult::Compliant)) => return Outcome::Pass,
            Ok(Ok(ComplianceResult::NotApplicable)) => return Outcome::Skip,
            Ok(Ok(ComplianceResult::NonCompliant)) => {
                return Outcome::Fail {
                    level: rule.level(),
                };
            }
            Ok(Err(err)) => err.to_string(),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                match PANIC_LOCATION.with(|slot| slot.borrow_mut().take()) {
                    Some(location) => format!("rule panicked at {location}: {message}"),
                    None => format!("rule panicked: {message}"),
                }
            }
        };

        warn!(
            rule = rule.id(),
            resource = %resource.path,
            error = %error,
            "rule evaluation did not complete"
        );
        Outcome::ValidationFailure { error }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
