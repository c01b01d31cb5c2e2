//! Resource-tree documents: the JSON input the `check` use case evaluates.
//!
//! ```json
//! { "bindings": { "Ref:KeyArn": "arn:aws:kms:..." },
//!   "root": { "id": "App", "type": "Construct", "properties": {}, "suppressions": [],
//!             "children": [] } }
//! ```

use anyhow::Context;
use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use stackguard_domain::model::{Resource, ResourceType, Suppression, SuppressionIndex, Token, Value};
use stackguard_domain::resolve::StaticResolver;
use stackguard_types::ResourcePath;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreeDocument {
    /// Values known for deferred tokens, keyed by token handle.
    #[serde(default)]
    bindings: BTreeMap<String, JsonValue>,
    root: NodeDocument,
}

#[derive(Debug, Deserialize)]
struct NodeDocument {
    id: String,
    #[serde(rename = "type", default)]
    resource_type: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, JsonValue>,
    #[serde(default)]
    suppressions: Vec<SuppressionDocument>,
    #[serde(default)]
    children: Vec<NodeDocument>,
}

/// Every field is optional here; incomplete entries load as invalid suppressions.
#[derive(Debug, Deserialize)]
struct SuppressionDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    applies_to_children: bool,
}

/// A loaded document, split into the engine's three explicit inputs.
#[derive(Debug)]
pub struct LoadedTree {
    pub root: Resource,
    pub suppressions: SuppressionIndex,
    pub resolver: StaticResolver,
}

pub fn load_tree(path: &Utf8Path) -> anyhow::Result<LoadedTree> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read resource tree: {}", path))?;
    parse_tree_json(&text).with_context(|| format!("load resource tree: {}", path))
}

pub fn parse_tree_json(text: &str) -> anyhow::Result<LoadedTree> {
    let doc: TreeDocument = serde_json::from_str(text).context("parse resource tree JSON")?;

    let mut suppressions = SuppressionIndex::new();
    let root = build_node(doc.root, &ResourcePath::default(), &mut suppressions)?;

    let bindings = doc
        .bindings
        .into_iter()
        .map(|(handle, value)| (Token::new(handle), value))
        .collect();

    Ok(LoadedTree {
        root,
        suppressions,
        resolver: StaticResolver::from_bindings(bindings),
    })
}

fn build_node(
    node: NodeDocument,
    parent: &ResourcePath,
    suppressions: &mut SuppressionIndex,
) -> anyhow::Result<Resource> {
    let id = node.id.trim();
    if id.is_empty() || id.contains('/') {
        anyhow::bail!(
            "invalid resource id {:?} under '{}': ids must be non-empty and must not contain '/'",
            node.id,
            parent
        );
    }
    let path = parent.join(id);

    let resource_type = node
        .resource_type
        .map(ResourceType::new)
        .unwrap_or_else(ResourceType::construct);

    let properties = node
        .properties
        .into_iter()
        .map(|(name, value)| (name, to_value(value)))
        .collect();

    if !node.suppressions.is_empty() {
        let list = suppressions.entry(path.clone()).or_default();
        for s in node.suppressions {
            list.push(Suppression {
                rule_id: s.id.unwrap_or_default(),
                reason: s.reason.unwrap_or_default(),
                applies_to_children: s.applies_to_children,
            });
        }
    }

    let mut seen = HashSet::new();
    let mut children = Vec::with_capacity(node.children.len());
    for child in node.children {
        if !seen.insert(child.id.trim().to_string()) {
            anyhow::bail!("duplicate resource id '{}' under '{}'", child.id.trim(), path);
        }
        children.push(build_node(child, &path, suppressions)?);
    }

    Ok(Resource {
        path,
        resource_type,
        properties,
        children,
    })
}

/// Top-level intrinsic objects (`{"Ref": ..}`, `{"Fn::*": ..}`) are deferred; the rest is concrete.
///
/// Intrinsics nested deeper stay in the JSON and are resolved when a rule reads them.
fn to_value(value: JsonValue) -> Value {
    match Token::from_intrinsic(&value) {
        Some(token) => Value::Deferred(token),
        None => Value::Concrete(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackguard_domain::resolve::{Resolution, ValueResolver};

    const DOC: &str = r#"{
        "bindings": { "Ref:EncryptVolumes": true },
        "root": {
            "id": "App",
            "suppressions": [{ "id": "s3.versioning", "reason": "logs bucket, replaced nightly", "applies_to_children": true }],
            "children": [
                {
                    "id": "Vol",
                    "type": "AWS::EC2::Volume",
                    "properties": {
                        "Encrypted": { "Ref": "EncryptVolumes" },
                        "KmsKeyId": { "Fn::GetAtt": ["Key", "Arn"] },
                        "Size": 8,
                        "Tags": { "Name": "data", "Team": "core" }
                    },
                    "suppressions": [{ "reason": "missing id" }]
                }
            ]
        }
    }"#;

    #[test]
    fn loads_paths_types_and_deferred_values() {
        let tree = parse_tree_json(DOC).expect("parse");
        assert_eq!(tree.root.path.as_str(), "App");
        assert_eq!(tree.root.resource_type.as_str(), "Construct");

        let vol = &tree.root.children[0];
        assert_eq!(vol.path.as_str(), "App/Vol");
        assert_eq!(vol.resource_type.as_str(), "AWS::EC2::Volume");
        assert_eq!(vol.property("Encrypted"), Some(&Value::deferred("Ref:EncryptVolumes")));
        assert_eq!(vol.property("KmsKeyId"), Some(&Value::deferred("Fn::GetAtt:Key.Arn")));
        assert_eq!(vol.property("Size"), Some(&Value::Concrete(json!(8))));
        assert_eq!(
            vol.property("Tags"),
            Some(&Value::Concrete(json!({ "Name": "data", "Team": "core" })))
        );

        assert_eq!(
            tree.resolver.resolve(&Token::new("Ref:EncryptVolumes")),
            Resolution::Resolved(json!(true))
        );
    }

    #[test]
    fn suppressions_are_indexed_by_path_and_malformed_ones_kept_invalid() {
        let tree = parse_tree_json(DOC).expect("parse");
        let app = &tree.suppressions[&ResourcePath::new("App")];
        assert_eq!(app.len(), 1);
        assert!(app[0].applies_to_children);
        assert!(app[0].is_valid());

        let vol = &tree.suppressions[&ResourcePath::new("App/Vol")];
        assert_eq!(vol[0].rule_id, "");
        assert!(!vol[0].is_valid());
    }

    #[test]
    fn only_top_level_intrinsics_are_deferred() {
        assert_eq!(
            to_value(json!({ "Ref": "KeyArn" })),
            Value::deferred("Ref:KeyArn")
        );
        let nested = json!({ "Status": { "Ref": "VersioningStatus" } });
        assert_eq!(to_value(nested.clone()), Value::Concrete(nested));
    }

    #[test]
    fn rejects_duplicate_and_invalid_ids() {
        let dup = r#"{ "root": { "id": "App", "children": [ { "id": "A" }, { "id": "A" } ] } }"#;
        let err = parse_tree_json(dup).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate resource id 'A' under 'App'"));

        let slash = r#"{ "root": { "id": "App/Stack" } }"#;
        assert!(parse_tree_json(slash).is_err());

        let empty = r#"{ "root": { "id": " " } }"#;
        assert!(parse_tree_json(empty).is_err());
    }

    #[test]
    fn load_tree_reads_from_disk() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let path = root.join("tree.json");
        std::fs::write(&path, DOC).expect("write tree");

        let tree = load_tree(&path).expect("load");
        assert_eq!(tree.root.subtree_len(), 2);

        let missing = load_tree(&root.join("missing.json")).unwrap_err();
        assert!(format!("{missing:#}").contains("read resource tree"));
    }
}
