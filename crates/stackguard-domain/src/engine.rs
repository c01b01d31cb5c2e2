use crate::evaluator::Evaluator;
use crate::model::{Resource, SuppressionIndex};
use crate::policy::{EffectiveConfig, FailOn};
use crate::registry::RuleRegistry;
use crate::report::{DomainReport, LevelCounts};
use crate::reporter::{EvaluationRecord, Reporter};
use crate::resolve::{CachingResolver, ValueResolver};
use crate::suppression::SuppressionResolver;
use crate::visitor::ResourceVisitor;
use stackguard_types::{EvaluationCounts, Finding, Level, StackguardData, Verdict, ids};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct EvalOptions {
    /// Append each rule's explanation to its finding message.
    pub verbose: bool,
}

/// Everything one evaluation pass produced.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub framework: String,
    /// In emission order: visit order, then registration order.
    pub findings: Vec<Finding>,
    pub records: Vec<EvaluationRecord>,
    pub counts: EvaluationCounts,
    pub resources_visited: u32,
}

/// Run one evaluation pass of `registry` over the tree rooted at `root`.
///
/// Never fails: per-pair problems are isolated and reported as validation failures.
pub fn evaluate(
    root: &Resource,
    registry: &RuleRegistry,
    suppressions: &SuppressionIndex,
    resolver: &dyn ValueResolver,
    options: EvalOptions,
) -> Evaluation {
    let resolver = CachingResolver::new(resolver);
    let evaluator = Evaluator::new(&resolver);
    let visitor = ResourceVisitor::new(registry, SuppressionResolver::new(suppressions), &evaluator);

    let mut reporter = Reporter::new(options.verbose);
    let resources_visited = visitor.visit(root, &mut reporter);
    let counts = reporter.counts();
    let (findings, records) = reporter.into_parts();

    debug!(
        framework = registry.name(),
        resources = resources_visited,
        evaluations = records.len(),
        findings = findings.len(),
        "evaluation pass complete"
    );

    Evaluation {
        framework: registry.name().to_string(),
        findings,
        records,
        counts,
        resources_visited,
    }
}

/// Truncate, count, and judge an evaluation under `cfg`.
pub fn summarize(evaluation: Evaluation, cfg: &EffectiveConfig) -> DomainReport {
    let Evaluation {
        framework,
        findings,
        counts,
        resources_visited,
        ..
    } = evaluation;

    let total = findings.len() as u32;
    // Judge on every finding, not only the emitted prefix.
    let verdict = compute_verdict(&findings, cfg.fail_on);

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let level_counts = LevelCounts::from_findings(&emitted);

    let data = StackguardData {
        framework,
        profile: cfg.profile.clone(),
        resources_scanned: resources_visited,
        rule_evaluations: counts,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    DomainReport {
        verdict,
        findings: emitted,
        data,
        counts: level_counts,
    }
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.level == Level::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.level == Level::Warn);
    if has_warn {
        // Validation failures stay advisory even when warnings are blocking.
        let blocking_warn = findings
            .iter()
            .any(|f| f.level == Level::Warn && f.rule_id != ids::VALIDATION_FAILURE);
        return match fail_on {
            FailOn::Warning if blocking_warn => Verdict::Fail,
            _ => Verdict::Warn,
        };
    }

    Verdict::Pass
}
