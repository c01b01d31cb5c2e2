use stackguard_types::Level;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// Per-rule overrides applied while a framework is assembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulePolicy {
    pub enabled: bool,
    pub level: Option<Level>,
}

impl RulePolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            level: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            level: None,
        }
    }

    pub fn at(level: Level) -> Self {
        Self {
            enabled: true,
            level: Some(level),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub framework: String,
    pub verbose: bool,
    pub fail_on: FailOn,
    pub max_findings: usize,
    /// Level forced onto every rule without an explicit per-rule level.
    pub level_override: Option<Level>,
    pub rules: BTreeMap<String, RulePolicy>,
}

impl EffectiveConfig {
    pub fn rule_policy(&self, rule_id: &str) -> Option<&RulePolicy> {
        self.rules.get(rule_id)
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rule_policy(rule_id).map(|p| p.enabled).unwrap_or(true)
    }

    /// Level a rule should be registered at, given its declared level.
    pub fn level_for(&self, rule_id: &str, declared: Level) -> Level {
        self.rule_policy(rule_id)
            .and_then(|p| p.level)
            .or(self.level_override)
            .unwrap_or(declared)
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            framework: stackguard_types::ids::FRAMEWORK_BASELINE.to_string(),
            verbose: false,
            fail_on: FailOn::Error,
            max_findings: 200,
            level_override: None,
            rules: BTreeMap::new(),
        }
    }
}
