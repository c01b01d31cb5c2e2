//! The rule contract: a named pure predicate plus reporting metadata.

use crate::model::{Resource, ResourceType, Token, Value};
use crate::resolve::{Resolution, ValueResolver};
use serde_json::Value as JsonValue;
use stackguard_types::Level;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplianceResult {
    Compliant,
    NonCompliant,
    /// The resource variant the rule inspects does not match this node.
    NotApplicable,
}

/// Why a predicate could not reach a verdict.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("value {token} could not be resolved: {reason}")]
    Unresolved { token: Token, reason: String },

    #[error("{0}")]
    Invalid(String),
}

pub type RuleResult = Result<ComplianceResult, RuleError>;

/// Predicates are plain functions so a registry stays `Send + Sync` and rules stay immutable.
pub type Predicate = fn(&RuleContext<'_>) -> RuleResult;

/// What a predicate may look at: the resource and the value resolver.
pub struct RuleContext<'a> {
    resource: &'a Resource,
    resolver: &'a dyn ValueResolver,
}

impl<'a> RuleContext<'a> {
    pub fn new(resource: &'a Resource, resolver: &'a dyn ValueResolver) -> Self {
        Self { resource, resolver }
    }

    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    pub fn resolve(&self, value: &Value) -> Result<JsonValue, RuleError> {
        match value {
            Value::Concrete(v) => Ok(v.clone()),
            Value::Deferred(token) => match self.resolver.resolve(token) {
                Resolution::Resolved(v) => Ok(v),
                Resolution::Unresolved { reason } => Err(RuleError::Unresolved {
                    token: token.clone(),
                    reason,
                }),
            },
        }
    }

    /// Resolved value of a top-level property; `None` when the property is absent.
    ///
    /// Intrinsics nested inside the value are resolved where the resolver can; the ones it cannot
    /// are left in place and rejected by [`concrete`] when a predicate reads them.
    pub fn property(&self, name: &str) -> Result<Option<JsonValue>, RuleError> {
        self.resource
            .property(name)
            .map(|v| self.resolve(v).map(|json| self.resolve_nested(json)))
            .transpose()
    }

    /// Resolved value at a JSON pointer (`/Status`) inside a property.
    ///
    /// Walking through an intrinsic that could not be resolved is an error, not an absent value.
    pub fn property_at(&self, name: &str, pointer: &str) -> Result<Option<JsonValue>, RuleError> {
        let Some(mut current) = self.property(name)? else {
            return Ok(None);
        };
        for segment in pointer.split('/').skip(1) {
            let segment = segment.replace("~1", "/").replace("~0", "~");
            let next = match concrete(&current)? {
                JsonValue::Object(map) => map.get(&segment).cloned(),
                JsonValue::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i).cloned()),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn resolve_nested(&self, value: JsonValue) -> JsonValue {
        if let Some(token) = Token::from_intrinsic(&value) {
            return match self.resolver.resolve(&token) {
                Resolution::Resolved(v) => v,
                Resolution::Unresolved { .. } => value,
            };
        }
        match value {
            JsonValue::Array(items) => JsonValue::Array(
                items.into_iter().map(|v| self.resolve_nested(v)).collect(),
            ),
            JsonValue::Object(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, self.resolve_nested(v)))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// `value` itself, or [`RuleError::Unresolved`] when it is an intrinsic nobody could resolve.
pub fn concrete(value: &JsonValue) -> Result<&JsonValue, RuleError> {
    match Token::from_intrinsic(value) {
        Some(token) => Err(RuleError::Unresolved {
            token,
            reason: "no value is available before deployment".to_string(),
        }),
        None => Ok(value),
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    id: String,
    info: String,
    explanation: String,
    level: Level,
    applies_to: Vec<ResourceType>,
    predicate: Predicate,
}

impl Rule {
    pub fn new(id: &str, level: Level, predicate: Predicate) -> Self {
        Self {
            id: id.to_string(),
            info: String::new(),
            explanation: String::new(),
            level,
            applies_to: Vec::new(),
            predicate,
        }
    }

    pub fn info(mut self, info: &str) -> Self {
        self.info = info.to_string();
        self
    }

    pub fn explanation(mut self, explanation: &str) -> Self {
        self.explanation = explanation.to_string();
        self
    }

    /// Restrict dispatch to the given resource types. Without this the rule sees every resource.
    pub fn applies_to(mut self, types: &[&str]) -> Self {
        self.applies_to = types.iter().map(|t| ResourceType::new(*t)).collect();
        self
    }

    /// A copy of this rule at another level. Used while assembling a framework, never mid-pass.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn info_text(&self) -> &str {
        &self.info
    }

    pub fn explanation_text(&self) -> &str {
        &self.explanation
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn resource_types(&self) -> &[ResourceType] {
        &self.applies_to
    }

    pub fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        (self.predicate)(ctx)
    }
}
