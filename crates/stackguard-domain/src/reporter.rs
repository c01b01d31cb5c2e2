use crate::evaluator::Outcome;
use crate::fingerprint::fingerprint_for_finding;
use crate::rule::Rule;
use stackguard_types::{EvaluationCounts, Finding, Level, ResourcePath, ids};

/// Terminal state of one (resource, rule) pair. There is no retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairState {
    Skipped,
    Suppressed,
    Passed,
    Failed,
    ValidationFailed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationRecord {
    pub resource_id: ResourcePath,
    pub rule_id: String,
    pub state: PairState,
}

/// Append-only log of findings and evaluated pairs for one pass.
#[derive(Debug, Default)]
pub struct Reporter {
    verbose: bool,
    findings: Vec<Finding>,
    records: Vec<EvaluationRecord>,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: Outcome, resource_id: &ResourcePath, rule: &Rule) -> PairState {
        let state = match outcome {
            Outcome::Skip => PairState::Skipped,
            Outcome::Pass => PairState::Passed,
            Outcome::Fail { level } => {
                let message = self.message(rule.info_text(), rule.explanation_text());
                self.push_finding(rule.id(), resource_id, level, message, None);
                PairState::Failed
            }
            Outcome::ValidationFailure { error } => {
                let info = format!("rule '{}' could not be evaluated: {}", rule.id(), error);
                let explanation = format!(
                    "This usually means a property depends on a value that cannot be resolved before deployment. \
                     Review the resource manually and suppress '{}' once it has been checked.",
                    ids::VALIDATION_FAILURE
                );
                let message = self.message(&info, &explanation);
                // Always advisory: a resolution limit is not a confirmed violation.
                self.push_finding(
                    ids::VALIDATION_FAILURE,
                    resource_id,
                    Level::Warn,
                    message,
                    Some(rule.id()),
                );
                PairState::ValidationFailed
            }
        };
        self.push_record(resource_id, rule.id(), state);
        state
    }

    /// Enter a pair whose finding was discarded by a valid suppression.
    pub fn record_suppressed(&mut self, resource_id: &ResourcePath, rule_id: &str) -> PairState {
        self.push_record(resource_id, rule_id, PairState::Suppressed);
        PairState::Suppressed
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn counts(&self) -> EvaluationCounts {
        let mut counts = EvaluationCounts::default();
        for r in &self.records {
            match r.state {
                PairState::Skipped => counts.skipped += 1,
                PairState::Suppressed => counts.suppressed += 1,
                PairState::Passed => counts.passed += 1,
                PairState::Failed => counts.failed += 1,
                PairState::ValidationFailed => counts.validation_failed += 1,
            }
        }
        counts
    }

    pub fn into_parts(self) -> (Vec<Finding>, Vec<EvaluationRecord>) {
        (self.findings, self.records)
    }

    fn message(&self, info: &str, explanation: &str) -> String {
        if self.verbose && !explanation.is_empty() {
            format!("{info} {explanation}")
        } else {
            info.to_string()
        }
    }

    fn push_finding(
        &mut self,
        rule_id: &str,
        resource_id: &ResourcePath,
        level: Level,
        message: String,
        triggered_by: Option<&str>,
    ) {
        self.findings.push(Finding {
            rule_id: rule_id.to_string(),
            resource_id: resource_id.clone(),
            level,
            message,
            triggered_by: triggered_by.map(str::to_string),
            fingerprint: fingerprint_for_finding(rule_id, resource_id.as_str(), triggered_by),
        });
    }

    fn push_record(&mut self, resource_id: &ResourcePath, rule_id: &str, state: PairState) {
        self.records.push(EvaluationRecord {
            resource_id: resource_id.clone(),
            rule_id: rule_id.to_string(),
            state,
        });
    }
}
