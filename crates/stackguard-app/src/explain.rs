//! The `explain` use case: look up rule documentation in a framework.

use stackguard_domain::checks;
use stackguard_types::{Level, ids};

/// Documentation for one rule, detached from its predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleExplanation {
    pub id: String,
    pub level: Level,
    pub info: String,
    pub explanation: String,
    /// Empty when the rule applies to every resource type.
    pub resource_types: Vec<String>,
}

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found the rule in the framework.
    Found(RuleExplanation),
    /// Unknown rule id; includes the ids the framework declares.
    NotFound {
        identifier: String,
        available: Vec<String>,
    },
}

/// Look up a rule id in `framework`. The reserved validation-failure id is always known.
pub fn run_explain(identifier: &str, framework: &str) -> ExplainOutput {
    if identifier == ids::VALIDATION_FAILURE {
        return ExplainOutput::Found(validation_failure());
    }

    let rules = checks::catalog(framework).unwrap_or_default();
    match rules.iter().find(|r| r.id() == identifier) {
        Some(rule) => ExplainOutput::Found(RuleExplanation {
            id: rule.id().to_string(),
            level: rule.level(),
            info: rule.info_text().to_string(),
            explanation: rule.explanation_text().to_string(),
            resource_types: rule
                .resource_types()
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
        }),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available: rules.iter().map(|r| r.id().to_string()).collect(),
        },
    }
}

fn validation_failure() -> RuleExplanation {
    RuleExplanation {
        id: ids::VALIDATION_FAILURE.to_string(),
        level: Level::Warn,
        info: "A rule could not be evaluated against a resource.".to_string(),
        explanation: "Raised when a rule depends on a value that is only known at deploy time, \
                      or when the rule itself errors. The finding names the originating rule. \
                      Suppress this id on the resource once it has been reviewed by hand."
            .to_string(),
        resource_types: Vec::new(),
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &RuleExplanation) -> String {
    let mut out = String::new();

    out.push_str(&exp.id);
    out.push('\n');
    out.push_str(&"=".repeat(exp.id.len()));
    out.push_str("\n\n");
    out.push_str(&format!("Level: {}\n", exp.level.as_str()));
    if exp.resource_types.is_empty() {
        out.push_str("Applies to: all resources\n");
    } else {
        out.push_str(&format!("Applies to: {}\n", exp.resource_types.join(", ")));
    }
    out.push('\n');
    out.push_str(&exp.info);
    out.push('\n');
    if !exp.explanation.is_empty() {
        out.push('\n');
        out.push_str(&exp.explanation);
        out.push('\n');
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, available: &[String]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule id: {identifier}\n\n"));
    out.push_str("Available rule ids:\n");
    for id in available {
        out.push_str(&format!("  - {id}\n"));
    }
    out.push_str(&format!("  - {}\n", ids::VALIDATION_FAILURE));

    out
}
