use stackguard_domain::policy::{EffectiveConfig, FailOn};
use stackguard_types::{Level, ids};
use std::collections::BTreeMap;

pub const PROFILES: &[&str] = &["strict", "warn", "audit"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "strict" => Some(strict_profile()),
        "warn" => Some(warn_profile()),
        "audit" => Some(audit_profile()),
        _ => None,
    }
}

fn strict_profile() -> EffectiveConfig {
    base("strict", FailOn::Error, None)
}

fn warn_profile() -> EffectiveConfig {
    base("warn", FailOn::Warning, Some(Level::Warn))
}

fn audit_profile() -> EffectiveConfig {
    // Audit mode reports everything and blocks nothing.
    base("audit", FailOn::Error, Some(Level::Warn))
}

fn base(profile: &str, fail_on: FailOn, level_override: Option<Level>) -> EffectiveConfig {
    EffectiveConfig {
        profile: profile.to_string(),
        framework: ids::FRAMEWORK_BASELINE.to_string(),
        verbose: false,
        fail_on,
        max_findings: 200,
        level_override,
        rules: BTreeMap::new(),
    }
}
