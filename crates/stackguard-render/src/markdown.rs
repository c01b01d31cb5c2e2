use crate::{RenderableLevel, RenderableReport, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Stackguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Framework: `{}`\n- Verdict: **{}**\n- Resources scanned: {}\n- Findings: {} (emitted) / {} (total), {} suppressed\n\n",
        report.data.framework,
        verdict,
        report.data.resources_scanned,
        report.data.findings_emitted,
        report.data.findings_total,
        report.data.suppressed
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let level = match f.level {
            RenderableLevel::Warn => "WARN",
            RenderableLevel::Error => "ERROR",
        };

        out.push_str(&format!(
            "- [{}] `{}` on `{}`: {}\n",
            level, f.rule_id, f.resource_id, f.message
        ));

        if let Some(origin) = &f.triggered_by {
            out.push_str(&format!("  - raised by: `{}`\n", origin));
        }
    }

    out
}
