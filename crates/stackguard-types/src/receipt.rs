use crate::ResourcePath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for stackguard reports.
pub const SCHEMA_REPORT_V1: &str = "stackguard.report.v1";
pub const SCHEMA_CONFIG_V1: &str = "stackguard.config.v1";

/// Finding level. Two values only: a finding either blocks deployment or it does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub rule_id: String,
    pub resource_id: ResourcePath,
    pub level: Level,
    pub message: String,

    /// For validation failures: the rule whose evaluation could not complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `rule_id + resource_id + triggered_by`.
    pub fingerprint: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Terminal-state tallies over every evaluated (resource, rule) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationCounts {
    pub skipped: u32,
    pub suppressed: u32,
    pub passed: u32,
    pub failed: u32,
    pub validation_failed: u32,
}

impl EvaluationCounts {
    pub fn total(&self) -> u32 {
        self.skipped + self.suppressed + self.passed + self.failed + self.validation_failed
    }
}

/// Stackguard-specific summary payload for the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StackguardData {
    pub framework: String,
    pub profile: String,

    pub resources_scanned: u32,
    pub rule_evaluations: EvaluationCounts,

    pub findings_total: u32,
    pub findings_emitted: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// A generic receipt/envelope with tool-specific data under a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = StackguardData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: TData,
}

pub type StackguardReport = ReportEnvelope<StackguardData>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finding_serializes_without_absent_trigger() {
        let finding = Finding {
            rule_id: "s3.bucket_encryption".to_string(),
            resource_id: ResourcePath::new("App/Bucket"),
            level: Level::Error,
            message: "bucket is not encrypted".to_string(),
            triggered_by: None,
            fingerprint: "abc".to_string(),
        };
        let value = serde_json::to_value(&finding).expect("serialize finding");
        assert_eq!(
            value,
            json!({
                "rule_id": "s3.bucket_encryption",
                "resource_id": "App/Bucket",
                "level": "error",
                "message": "bucket is not encrypted",
                "fingerprint": "abc",
            })
        );
    }

    #[test]
    fn counts_total_sums_every_state() {
        let counts = EvaluationCounts {
            skipped: 1,
            suppressed: 2,
            passed: 3,
            failed: 4,
            validation_failed: 5,
        };
        assert_eq!(counts.total(), 15);
    }
}
