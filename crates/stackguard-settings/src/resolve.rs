use crate::{model::StackguardConfigV1, presets};
use anyhow::Context;
use stackguard_domain::checks;
use stackguard_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use stackguard_types::{Level, SCHEMA_CONFIG_V1};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub framework: Option<String>,
    pub verbose: Option<bool>,
    pub max_findings: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: StackguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected {})",
            presets::PROFILES.join("|")
        )
    })?;

    // Framework
    if let Some(framework) = overrides.framework.clone().or(cfg.framework.clone()) {
        effective.framework = framework;
    }
    let known_rules = checks::catalog(&effective.framework).with_context(|| {
        format!(
            "unknown framework: {} (expected {})",
            effective.framework,
            checks::framework_names().join("|")
        )
    })?;

    if let Some(verbose) = overrides.verbose.or(cfg.verbose) {
        effective.verbose = verbose;
    }

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        if !known_rules.iter().any(|r| r.id() == rule_id) {
            anyhow::bail!(
                "unknown rule in [rules]: {rule_id} (not part of framework '{}')",
                effective.framework
            );
        }

        let entry = effective
            .rules
            .entry(rule_id.clone())
            .or_insert_with(RulePolicy::enabled);

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(level) = rc.level.as_deref() {
            entry.level =
                Some(parse_level(level).with_context(|| format!("invalid level for {rule_id}"))?);
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn parse_level(v: &str) -> anyhow::Result<Level> {
    match v {
        "warn" | "warning" => Ok(Level::Warn),
        "error" => Ok(Level::Error),
        other => anyhow::bail!("unknown level: {other} (expected warn|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
