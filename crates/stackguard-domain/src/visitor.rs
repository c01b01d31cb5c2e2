use crate::evaluator::{Evaluator, Outcome};
use crate::model::Resource;
use crate::registry::RuleRegistry;
use crate::reporter::Reporter;
use crate::suppression::SuppressionResolver;
use stackguard_types::ids;
use tracing::debug;

/// Walks a resource tree depth-first, pre-order, and applies every applicable rule to every node.
///
/// Holds no cross-node state and never stops early.
pub struct ResourceVisitor<'a> {
    registry: &'a RuleRegistry,
    suppressions: SuppressionResolver<'a>,
    evaluator: &'a Evaluator<'a>,
}

impl<'a> ResourceVisitor<'a> {
    pub fn new(
        registry: &'a RuleRegistry,
        suppressions: SuppressionResolver<'a>,
        evaluator: &'a Evaluator<'a>,
    ) -> Self {
        Self {
            registry,
            suppressions,
            evaluator,
        }
    }

    /// Returns the number of resources visited.
    pub fn visit(&self, root: &Resource, reporter: &mut Reporter) -> u32 {
        let mut visited = 0u32;
        let mut stack = vec![root];
        while let Some(resource) = stack.pop() {
            visited += 1;
            self.visit_node(resource, reporter);
            // Reverse so the first child is popped first.
            stack.extend(resource.children.iter().rev());
        }
        visited
    }

    fn visit_node(&self, resource: &Resource, reporter: &mut Reporter) {
        for rule in self.registry.rules_for(resource) {
            if self.suppressions.is_suppressed(&resource.path, rule.id()) {
                debug!(rule = rule.id(), resource = %resource.path, "rule suppressed");
                reporter.record_suppressed(&resource.path, rule.id());
                continue;
            }

            let outcome = self.evaluator.evaluate(rule, resource);
            if matches!(outcome, Outcome::ValidationFailure { .. })
                && self
                    .suppressions
                    .is_suppressed(&resource.path, ids::VALIDATION_FAILURE)
            {
                debug!(rule = rule.id(), resource = %resource.path, "validation failure suppressed");
                reporter.record_suppressed(&resource.path, rule.id());
                continue;
            }

            reporter.record(outcome, &resource.path, rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SuppressionIndex;
    use crate::resolve::StaticResolver;
    use crate::rule::{ComplianceResult, Rule, RuleContext, RuleResult};
    use stackguard_types::Level;

    fn fail_all(_: &RuleContext<'_>) -> RuleResult {
        Ok(ComplianceResult::NonCompliant)
    }

    #[test]
    fn visits_pre_order_in_declaration_order() {
        let tree = Resource::new("App", "Construct")
            .with_child(
                Resource::new("App/A", "Construct")
                    .with_child(Resource::new("App/A/1", "Construct"))
                    .with_child(Resource::new("App/A/2", "Construct")),
            )
            .with_child(Resource::new("App/B", "Construct"));

        let mut registry = RuleRegistry::new("test");
        registry
            .register(Rule::new("r", Level::Warn, fail_all))
            .expect("register");
        let resolver = StaticResolver::new();
        let evaluator = Evaluator::new(&resolver);
        let index = SuppressionIndex::new();
        let visitor = ResourceVisitor::new(&registry, SuppressionResolver::new(&index), &evaluator);

        let mut reporter = Reporter::new(false);
        let visited = visitor.visit(&tree, &mut reporter);

        assert_eq!(visited, 5);
        let order: Vec<&str> = reporter
            .findings()
            .iter()
            .map(|f| f.resource_id.as_str())
            .collect();
        assert_eq!(order, vec!["App", "App/A", "App/A/1", "App/A/2", "App/B"]);
    }
}
