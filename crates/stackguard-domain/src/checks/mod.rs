//! Built-in rule packs and framework assembly.
//!
//! A framework is a named [`RuleRegistry`]; assembling one applies the effective config's
//! per-rule overrides before registration, so rules stay immutable during a pass.

use crate::policy::EffectiveConfig;
use crate::registry::{RegistryError, RuleRegistry};
use crate::rule::Rule;
use stackguard_types::ids;
use tracing::debug;

mod iam;
mod messaging;
mod s3;
mod storage;
mod utils;


pub fn framework_names() -> &'static [&'static str] {
    &[ids::FRAMEWORK_BASELINE]
}

/// Rules a framework declares, in registration order, at their declared levels.
pub fn catalog(framework: &str) -> Option<Vec<Rule>> {
    match framework {
        ids::FRAMEWORK_BASELINE => {
            let mut rules = s3::rules();
            rules.extend(storage::rules());
            rules.extend(messaging::rules());
            rules.extend(iam::rules());
            Some(rules)
        }
        _ => None,
    }
}

/// The framework with every declared rule at its declared level.
pub fn framework(name: &str) -> Result<RuleRegistry, RegistryError> {
    assemble(&EffectiveConfig {
        framework: name.to_string(),
        ..EffectiveConfig::default()
    })
}

/// The configured framework: disabled rules left out, level overrides applied.
pub fn assemble(cfg: &EffectiveConfig) -> Result<RuleRegistry, RegistryError> {
    let rules = catalog(&cfg.framework)
        .ok_or_else(|| RegistryError::UnknownFramework(cfg.framework.clone()))?;

    let mut registry = RuleRegistry::new(&cfg.framework);
    for rule in rules {
        if !cfg.is_rule_enabled(rule.id()) {
            debug!(rule = rule.id(), "rule disabled by config");
            continue;
        }
        let level = cfg.level_for(rule.id(), rule.level());
        registry.register(rule.with_level(level))?;
    }
    Ok(registry)
}
