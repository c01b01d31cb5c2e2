use crate::engine::{EvalOptions, Evaluation, evaluate};
use crate::model::{Resource, Suppression, SuppressionIndex};
use crate::registry::RuleRegistry;
use crate::resolve::{StaticResolver, ValueResolver};
use crate::rule::{ComplianceResult, Rule, RuleContext, RuleResult};
use serde_json::json;
use stackguard_types::{Level, ResourcePath};

pub const TYPE_A: &str = "Test::Type::A";
pub const TYPE_B: &str = "Test::Type::B";

/// Non-compliant when `encrypted` is absent or not `true`.
pub fn requires_encrypted(ctx: &RuleContext<'_>) -> RuleResult {
    match ctx.property("encrypted")? {
        Some(v) if v == json!(true) => Ok(ComplianceResult::Compliant),
        _ => Ok(ComplianceResult::NonCompliant),
    }
}

pub fn always_compliant(_: &RuleContext<'_>) -> RuleResult {
    Ok(ComplianceResult::Compliant)
}

pub fn always_non_compliant(_: &RuleContext<'_>) -> RuleResult {
    Ok(ComplianceResult::NonCompliant)
}

pub fn always_panics(_: &RuleContext<'_>) -> RuleResult {
    panic!("predicate defect")
}

pub fn encrypted_rule(id: &str, level: Level) -> Rule {
    Rule::new(id, level, requires_encrypted)
        .info("The resource is not encrypted.")
        .explanation("Unencrypted data at rest can be read from snapshots and backups.")
}

pub fn registry(rules: Vec<Rule>) -> RuleRegistry {
    let mut registry = RuleRegistry::new("test");
    for rule in rules {
        registry.register(rule).expect("test rules have unique ids");
    }
    registry
}

pub fn suppressions(entries: Vec<(&str, Suppression)>) -> SuppressionIndex {
    let mut index = SuppressionIndex::new();
    for (path, s) in entries {
        index.entry(ResourcePath::new(path)).or_default().push(s);
    }
    index
}

pub fn run(
    root: &Resource,
    registry: &RuleRegistry,
    index: &SuppressionIndex,
    resolver: &dyn ValueResolver,
) -> Evaluation {
    evaluate(root, registry, index, resolver, EvalOptions::default())
}

pub fn run_plain(root: &Resource, registry: &RuleRegistry) -> Evaluation {
    run(root, registry, &SuppressionIndex::new(), &StaticResolver::new())
}
