use crate::{RenderableLevel, RenderableReport};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} title={rule_id}::[{resource_id}] {message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.level {
            RenderableLevel::Error => "error",
            RenderableLevel::Warn => "warning",
        };

        let title = match &f.triggered_by {
            Some(origin) => format!("{} ({})", f.rule_id, origin),
            None => f.rule_id.clone(),
        };
        let message = escape_data(&format!("[{}] {}", f.resource_id, f.message));

        out.push(format!(
            "::{} title={}::{}",
            level,
            escape_property(&title),
            message
        ));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderableData, RenderableFinding, RenderableVerdictStatus};

    fn report(findings: Vec<RenderableFinding>) -> RenderableReport {
        RenderableReport {
            verdict: RenderableVerdictStatus::Fail,
            data: RenderableData {
                framework: "baseline".to_string(),
                resources_scanned: 1,
                suppressed: 0,
                findings_emitted: findings.len() as u32,
                findings_total: findings.len() as u32,
                truncated_reason: None,
            },
            findings,
        }
    }

    #[test]
    fn renders_levels_and_escapes() {
        let annotations = render_github_annotations(&report(vec![
            RenderableFinding {
                level: RenderableLevel::Error,
                rule_id: "s3.bucket_encryption".to_string(),
                resource_id: "App/Bucket".to_string(),
                message: "100% unencrypted\nreally".to_string(),
                triggered_by: None,
            },
            RenderableFinding {
                level: RenderableLevel::Warn,
                rule_id: "StackguardValidationFailure".to_string(),
                resource_id: "App/Vol".to_string(),
                message: "could not resolve".to_string(),
                triggered_by: Some("ebs.volume_encryption".to_string()),
            },
        ]));

        assert_eq!(
            annotations,
            vec![
                "::error title=s3.bucket_encryption::[App/Bucket] 100%25 unencrypted%0Areally"
                    .to_string(),
                "::warning title=StackguardValidationFailure (ebs.volume_encryption)::[App/Vol] could not resolve"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn property_separators_are_escaped() {
        let annotations = render_github_annotations(&report(vec![RenderableFinding {
            level: RenderableLevel::Warn,
            rule_id: "a:b,c".to_string(),
            resource_id: "App".to_string(),
            message: "m".to_string(),
            triggered_by: None,
        }]));
        assert_eq!(annotations, vec!["::warning title=a%3Ab%2Cc::[App] m".to_string()]);
    }
}
