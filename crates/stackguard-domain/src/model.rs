use serde_json::Value as JsonValue;
use stackguard_types::ResourcePath;
use std::collections::BTreeMap;
use std::fmt;

/// Resource type tag used for rule dispatch, e.g. `AWS::S3::Bucket`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceType(String);

impl ResourceType {
    /// Tag for structural nodes that carry no deployable resource.
    pub const CONSTRUCT: &'static str = "Construct";

    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn construct() -> Self {
        Self::new(Self::CONSTRUCT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Opaque handle of a deferred value. Only a [`crate::resolve::ValueResolver`] can turn it into a
/// concrete value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(String);

impl Token {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Handle of an intrinsic object (`{"Ref": ..}` or a single `Fn::*` key).
    ///
    /// `Ref:Name`, `Fn::GetAtt:Resource.Attr`, and `Fn::<Name>:<compact json>` for the rest.
    pub fn from_intrinsic(value: &JsonValue) -> Option<Token> {
        let obj = value.as_object()?;
        if obj.len() != 1 {
            return None;
        }
        let (key, arg) = obj.iter().next()?;
        let handle = match (key.as_str(), arg) {
            ("Ref", JsonValue::String(name)) => format!("Ref:{name}"),
            ("Fn::GetAtt", JsonValue::Array(parts)) => {
                let names: Option<Vec<&str>> = parts.iter().map(JsonValue::as_str).collect();
                match names {
                    Some(names) => format!("Fn::GetAtt:{}", names.join(".")),
                    None => format!("Fn::GetAtt:{arg}"),
                }
            }
            ("Fn::GetAtt", JsonValue::String(attr)) => format!("Fn::GetAtt:{attr}"),
            (k, arg) if k == "Ref" || k.starts_with("Fn::") => format!("{k}:{arg}"),
            _ => return None,
        };
        Some(Token(handle))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Concrete(JsonValue),
    Deferred(Token),
}

impl Value {
    pub fn deferred<S: Into<String>>(handle: S) -> Self {
        Value::Deferred(Token::new(handle))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Value::Deferred(_))
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Value::Concrete(value)
    }
}

/// A node of the declared infrastructure tree. Children are owned by their parent.
#[derive(Clone, Debug)]
pub struct Resource {
    pub path: ResourcePath,
    pub resource_type: ResourceType,
    pub properties: BTreeMap<String, Value>,
    pub children: Vec<Resource>,
}

impl Resource {
    pub fn new(path: impl Into<ResourcePath>, resource_type: impl Into<ResourceType>) -> Self {
        Self {
            path: path.into(),
            resource_type: resource_type.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: Resource) -> Self {
        self.children.push(child);
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Number of resources in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Resource::subtree_len).sum::<usize>()
    }
}

/// Resource-attached directive silencing one rule, valid only with a real justification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suppression {
    pub rule_id: String,
    pub reason: String,
    /// Also silence the rule on every descendant of the resource.
    pub applies_to_children: bool,
}

impl Suppression {
    /// Minimum justification length, counted in characters.
    pub const MIN_REASON_CHARS: usize = 10;

    pub fn new(rule_id: &str, reason: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            reason: reason.to_string(),
            applies_to_children: false,
        }
    }

    pub fn inherited(mut self) -> Self {
        self.applies_to_children = true;
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.rule_id.trim().is_empty() && self.reason.chars().count() >= Self::MIN_REASON_CHARS
    }
}

/// Suppressions keyed by the resource they are attached to.
pub type SuppressionIndex = BTreeMap<ResourcePath, Vec<Suppression>>;
