//! Ordered, type-indexed rule collection for one framework.

use crate::model::{Resource, ResourceType};
use crate::rule::Rule;
use stackguard_types::ids;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Configuration errors. Raised while a framework is assembled, before any evaluation pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("framework '{framework}' already registers rule '{rule_id}'")]
    DuplicateRuleId { framework: String, rule_id: String },

    #[error("framework '{framework}' cannot register a rule without an id")]
    EmptyRuleId { framework: String },

    #[error("rule id '{rule_id}' is reserved")]
    ReservedRuleId { rule_id: String },

    #[error("unknown framework: {0}")]
    UnknownFramework(String),
}

#[derive(Clone, Debug, Default)]
pub struct RuleRegistry {
    name: String,
    rules: Vec<Rule>,
    ids: HashSet<String>,
    /// Registration indices of rules restricted to a resource type.
    by_type: BTreeMap<ResourceType, Vec<usize>>,
    /// Registration indices of rules that see every resource.
    universal: Vec<usize>,
}

impl RuleRegistry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&mut self, rule: Rule) -> Result<(), RegistryError> {
        let id = rule.id();
        if id.trim().is_empty() {
            return Err(RegistryError::EmptyRuleId {
                framework: self.name.clone(),
            });
        }
        if id == ids::VALIDATION_FAILURE {
            return Err(RegistryError::ReservedRuleId {
                rule_id: id.to_string(),
            });
        }
        if self.ids.contains(id) {
            return Err(RegistryError::DuplicateRuleId {
                framework: self.name.clone(),
                rule_id: id.to_string(),
            });
        }

        let index = self.rules.len();
        if rule.resource_types().is_empty() {
            self.universal.push(index);
        } else {
            for ty in rule.resource_types() {
                let slot = self.by_type.entry(ty.clone()).or_default();
                // A rule listing the same type twice is still dispatched once.
                if slot.last() != Some(&index) {
                    slot.push(index);
                }
            }
        }
        self.ids.insert(id.to_string());
        self.rules.push(rule);
        Ok(())
    }

    /// Rules applicable to `resource`, in registration order.
    pub fn rules_for(&self, resource: &Resource) -> Vec<&Rule> {
        let typed = self
            .by_type
            .get(&resource.resource_type)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        // Both index lists are ascending; merge to keep registration order.
        let mut out = Vec::with_capacity(typed.len() + self.universal.len());
        let (mut i, mut j) = (0, 0);
        while i < typed.len() || j < self.universal.len() {
            let next = match (typed.get(i), self.universal.get(j)) {
                (Some(&a), Some(&b)) if a < b => {
                    i += 1;
                    a
                }
                (Some(_), Some(&b)) => {
                    j += 1;
                    b
                }
                (Some(&a), None) => {
                    i += 1;
                    a
                }
                (None, Some(&b)) => {
                    j += 1;
                    b
                }
                (None, None) => break,
            };
            out.push(&self.rules[next]);
        }
        out
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id() == rule_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
