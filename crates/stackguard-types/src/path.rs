use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier of a resource within its tree.
///
/// Normalization rules are simple and deterministic:
/// - segments joined with `/`
/// - no leading or trailing `/`
/// - repeated separators collapse
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ResourcePath(String);

impl ResourcePath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let joined = s
            .as_ref()
            .split('/')
            .filter(|seg| !seg.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join(&self, segment: &str) -> ResourcePath {
        if self.0.is_empty() {
            return ResourcePath::new(segment);
        }
        ResourcePath::new(format!("{}/{}", self.0, segment))
    }

    /// The enclosing resource path, or `None` at the root.
    pub fn parent(&self) -> Option<ResourcePath> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| ResourcePath(parent.to_string()))
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = ResourcePath> {
        std::iter::successors(self.parent(), |p| p.parent())
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourcePath {
    fn from(value: &str) -> Self {
        ResourcePath::new(value)
    }
}
