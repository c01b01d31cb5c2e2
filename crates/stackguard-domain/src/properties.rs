//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Finding determinism across repeated passes
//! - The suppression reason-length boundary
//! - Failure isolation between (resource, rule) pairs
//! - Applicability and idempotent resolution

use crate::engine::{EvalOptions, evaluate};
use crate::model::{Resource, Suppression, SuppressionIndex, Token, Value};
use crate::resolve::{CachingResolver, Resolution, StaticResolver, ValueResolver};
use crate::rule::{ComplianceResult, Rule, RuleContext, RuleError, RuleResult};
use crate::test_support::{TYPE_A, TYPE_B, always_non_compliant, encrypted_rule, registry, run};
use proptest::prelude::*;
use serde_json::json;
use stackguard_types::{Level, ResourcePath, ids};

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

#[derive(Clone, Debug)]
enum Flag {
    Absent,
    Literal(bool),
    Deferred(bool),
}

fn arb_flag() -> impl Strategy<Value = Flag> {
    prop_oneof![
        Just(Flag::Absent),
        any::<bool>().prop_map(Flag::Literal),
        any::<bool>().prop_map(Flag::Deferred),
    ]
}

fn arb_node() -> impl Strategy<Value = (bool, Flag, Option<usize>)> {
    // (is type A, encrypted flag, suppression reason length)
    (any::<bool>(), arb_flag(), prop::option::of(0usize..20))
}

/// A two-level tree: root, then each generated node as a child, each with its own grandchild.
fn build(nodes: &[(bool, Flag, Option<usize>)]) -> (Resource, SuppressionIndex) {
    let mut root = Resource::new("App", "Construct");
    let mut index = SuppressionIndex::new();
    for (i, (is_a, flag, reason_len)) in nodes.iter().enumerate() {
        let path = ResourcePath::new(format!("App/N{i}"));
        let ty = if *is_a { TYPE_A } else { TYPE_B };
        let mut node = Resource::new(path.clone(), ty);
        match flag {
            Flag::Absent => {}
            Flag::Literal(b) => node = node.with_property("encrypted", json!(b)),
            Flag::Deferred(bound) => {
                let handle = if *bound {
                    "Ref:Bound".to_string()
                } else {
                    format!("Ref:Unbound{i}")
                };
                node = node.with_property("encrypted", Value::deferred(handle));
            }
        }
        node = node.with_child(Resource::new(path.join("Child"), TYPE_A));
        if let Some(len) = reason_len {
            index
                .entry(path)
                .or_default()
                .push(Suppression::new("R1", &"x".repeat(*len)));
        }
        root = root.with_child(node);
    }
    (root, index)
}

fn errors_on_type_b(ctx: &RuleContext<'_>) -> RuleResult {
    if ctx.resource().resource_type.as_str() == TYPE_B {
        return Err(RuleError::Invalid("type B is not understood".to_string()));
    }
    Ok(ComplianceResult::Compliant)
}

fn not_applicable(_: &RuleContext<'_>) -> RuleResult {
    Ok(ComplianceResult::NotApplicable)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn repeated_passes_are_identical(nodes in prop::collection::vec(arb_node(), 0..12)) {
        let (root, index) = build(&nodes);
        let registry = registry(vec![
            encrypted_rule("R1", Level::Error).applies_to(&[TYPE_A]),
            Rule::new("R2", Level::Warn, always_non_compliant),
        ]);
        let resolver = StaticResolver::new().bind("Ref:Bound", json!(true));

        let first = run(&root, &registry, &index, &resolver);
        let second = run(&root, &registry, &index, &resolver);
        prop_assert_eq!(&first.findings, &second.findings);
        prop_assert_eq!(&first.records, &second.records);
        prop_assert_eq!(
            serde_json::to_string(&first.findings).unwrap(),
            serde_json::to_string(&second.findings).unwrap()
        );
    }

    #[test]
    fn suppression_boundary_is_ten_characters(reason in "[a-z -]{0,20}") {
        let root = Resource::new("App/Vol", TYPE_A);
        let registry = registry(vec![encrypted_rule("R1", Level::Error)]);
        let mut index = SuppressionIndex::new();
        index.insert(ResourcePath::new("App/Vol"), vec![Suppression::new("R1", &reason)]);

        let eval = run(&root, &registry, &index, &StaticResolver::new());
        let suppressed = reason.chars().count() >= 10;
        prop_assert_eq!(eval.findings.is_empty(), suppressed);
    }

    #[test]
    fn failing_pairs_do_not_hide_other_findings(nodes in prop::collection::vec(arb_node(), 1..12)) {
        let (root, _) = build(&nodes);
        let registry = registry(vec![
            Rule::new("throws", Level::Error, errors_on_type_b),
            Rule::new("always", Level::Error, always_non_compliant),
        ]);
        let eval = run(&root, &registry, &SuppressionIndex::new(), &StaticResolver::new());

        let resources = root.subtree_len();
        let type_b = nodes.iter().filter(|(is_a, _, _)| !is_a).count();
        let always = eval.findings.iter().filter(|f| f.rule_id == "always").count();
        let failures = eval
            .findings
            .iter()
            .filter(|f| f.rule_id == ids::VALIDATION_FAILURE)
            .count();
        prop_assert_eq!(always, resources);
        prop_assert_eq!(failures, type_b);
        prop_assert_eq!(eval.records.len(), resources * 2);
    }

    #[test]
    fn not_applicable_never_reports(nodes in prop::collection::vec(arb_node(), 0..12)) {
        let (root, index) = build(&nodes);
        let registry = registry(vec![Rule::new("R1", Level::Error, not_applicable)]);
        let eval = evaluate(
            &root,
            &registry,
            &index,
            &StaticResolver::new(),
            EvalOptions { verbose: true },
        );
        prop_assert!(eval.findings.is_empty());
        prop_assert_eq!(eval.counts.failed + eval.counts.validation_failed, 0);
    }

    #[test]
    fn cached_resolution_is_idempotent(handles in prop::collection::vec("Ref:[A-C]", 1..20)) {
        let inner = StaticResolver::new().bind("Ref:A", json!("a"));
        let caching = CachingResolver::new(&inner);
        for handle in &handles {
            let token = Token::new(handle.as_str());
            let first = caching.resolve(&token);
            let second = caching.resolve(&token);
            prop_assert_eq!(&first, &second);
            let expect_resolved = handle == "Ref:A";
            prop_assert_eq!(matches!(first, Resolution::Resolved(_)), expect_resolved);
        }
    }
}
