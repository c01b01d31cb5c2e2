//! Render use cases: report serialization, markdown and GitHub annotations.

use anyhow::Context;
use stackguard_render::{
    RenderableData, RenderableFinding, RenderableLevel, RenderableReport, RenderableVerdictStatus,
};
use stackguard_types::{Finding, Level, SCHEMA_REPORT_V1, StackguardReport, Verdict};

pub fn parse_report_json(text: &str) -> anyhow::Result<StackguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse stackguard report")
}

/// Pretty JSON with a trailing newline.
pub fn serialize_report(report: &StackguardReport) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn to_renderable(report: &StackguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            framework: report.data.framework.clone(),
            resources_scanned: report.data.resources_scanned,
            suppressed: report.data.rule_evaluations.suppressed,
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        level: match f.level {
            Level::Warn => RenderableLevel::Warn,
            Level::Error => RenderableLevel::Error,
        },
        rule_id: f.rule_id.clone(),
        resource_id: f.resource_id.as_str().to_string(),
        message: f.message.clone(),
        triggered_by: f.triggered_by.clone(),
    }
}

pub fn render_markdown(report: &RenderableReport) -> String {
    stackguard_render::render_markdown(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    stackguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}
