//! Pure compliance evaluation (no IO).
//!
//! Input: a resource tree, an explicit suppression index, a value resolver, and a rule registry.
//! Output: findings + per-pair evaluation ledger, summarized into a verdict.

#![forbid(unsafe_code)]

pub mod model;
pub mod policy;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod rule;

mod engine;
mod evaluator;
mod fingerprint;
mod reporter;
mod suppression;
mod visitor;
pub mod checks;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;

pub use engine::{EvalOptions, Evaluation, evaluate, summarize};
pub use evaluator::{Evaluator, Outcome};
pub use registry::{RegistryError, RuleRegistry};
pub use reporter::{EvaluationRecord, PairState, Reporter};
pub use suppression::SuppressionResolver;
pub use visitor::ResourceVisitor;
