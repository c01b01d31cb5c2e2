//! The `check` use case: evaluate a resource tree against a framework and produce a report.

use crate::tree::load_tree;
use anyhow::Context;
use camino::Utf8Path;
use stackguard_domain::checks;
use stackguard_domain::{EvalOptions, EvaluationRecord, evaluate, summarize};
use stackguard_settings::{Overrides, ResolvedConfig};
use stackguard_types::{ReportEnvelope, SCHEMA_REPORT_V1, StackguardReport, ToolMeta, Verdict};
use time::OffsetDateTime;
use tracing::info;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Resource-tree document to evaluate.
    pub tree_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: StackguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
    /// Terminal state of every evaluated (resource, rule) pair.
    pub records: Vec<EvaluationRecord>,
}

/// Run the check use case: parse config, assemble the framework, load the tree, evaluate, report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        stackguard_settings::StackguardConfigV1::default()
    } else {
        stackguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = stackguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    let effective = &resolved.effective;

    let registry = checks::assemble(effective).context("assemble framework")?;
    let tree = load_tree(input.tree_path)?;

    let evaluation = evaluate(
        &tree.root,
        &registry,
        &tree.suppressions,
        &tree.resolver,
        EvalOptions {
            verbose: effective.verbose,
        },
    );
    let records = evaluation.records.clone();
    let domain_report = summarize(evaluation, effective);

    info!(
        framework = registry.name(),
        rules = registry.len(),
        resources = domain_report.data.resources_scanned,
        findings = domain_report.data.findings_total,
        verdict = ?domain_report.verdict,
        "check complete"
    );

    let finished_at = OffsetDateTime::now_utc();
    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "stackguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict: domain_report.verdict,
        findings: domain_report.findings,
        data: domain_report.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        records,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackguard_domain::PairState;
    use stackguard_types::{Level, ids};

    const TREE: &str = r#"{
        "bindings": { "Ref:Encrypt": true },
        "root": {
            "id": "App",
            "children": [
                { "id": "Vol", "type": "AWS::EC2::Volume", "properties": { "Encrypted": { "Ref": "Encrypt" } } },
                { "id": "Legacy", "type": "AWS::EC2::Volume", "properties": { "Encrypted": { "Ref": "Unknown" } } },
                { "id": "Topic", "type": "AWS::SNS::Topic",
                  "suppressions": [{ "id": "sns.topic_encryption", "reason": "public announcements only" }] },
                { "id": "Queue", "type": "AWS::SQS::Queue" }
            ]
        }
    }"#;

    fn check(config_text: &str, overrides: Overrides) -> CheckOutput {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let tree_path = root.join("tree.json");
        std::fs::write(&tree_path, TREE).expect("write tree");

        run_check(CheckInput {
            tree_path: &tree_path,
            config_text,
            overrides,
        })
        .expect("run_check")
    }

    #[test]
    fn empty_config_uses_strict_baseline() {
        let output = check("", Overrides::default());
        assert_eq!(output.resolved_config.effective.profile, "strict");

        let report = &output.report;
        assert_eq!(report.schema, SCHEMA_REPORT_V1);
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.data.framework, ids::FRAMEWORK_BASELINE);
        assert_eq!(report.data.resources_scanned, 5);

        let found: Vec<(&str, &str, Level)> = report
            .findings
            .iter()
            .map(|f| (f.resource_id.as_str(), f.rule_id.as_str(), f.level))
            .collect();
        assert_eq!(
            found,
            vec![
                ("App/Legacy", ids::VALIDATION_FAILURE, Level::Warn),
                ("App/Queue", ids::RULE_SQS_QUEUE_ENCRYPTION, Level::Error),
            ]
        );
        assert_eq!(report.data.rule_evaluations.suppressed, 1);
        assert_eq!(report.data.rule_evaluations.passed, 1);
        assert!(
            output
                .records
                .iter()
                .any(|r| r.resource_id.as_str() == "App/Topic" && r.state == PairState::Suppressed)
        );
    }

    #[test]
    fn audit_profile_downgrades_to_warn() {
        let output = check("profile = \"audit\"", Overrides::default());
        assert_eq!(output.report.verdict, Verdict::Warn);
        assert!(output.report.findings.iter().all(|f| f.level == Level::Warn));
    }

    #[test]
    fn disabled_rule_and_verbose_messages() {
        let config = r#"
verbose = true

[rules."sqs.queue_encryption"]
enabled = false
"#;
        let output = check(config, Overrides::default());
        assert_eq!(output.report.verdict, Verdict::Warn);
        assert_eq!(output.report.findings.len(), 1);
        assert!(output.report.findings[0].message.contains("suppress 'StackguardValidationFailure'"));
    }

    #[test]
    fn bad_config_is_an_error() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let tree_path = Utf8Path::from_path(tmp.path())
            .expect("utf8 path")
            .join("tree.json");
        let err = run_check(CheckInput {
            tree_path: &tree_path,
            config_text: "framework = \"nist\"",
            overrides: Overrides::default(),
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown framework: nist"));
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(Verdict::Pass), 0);
        assert_eq!(verdict_exit_code(Verdict::Warn), 0);
        assert_eq!(verdict_exit_code(Verdict::Fail), 2);
    }
}
