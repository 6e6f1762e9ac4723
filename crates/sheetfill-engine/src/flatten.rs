use std::collections::BTreeMap;

use sheetfill_common::{Node, Scalar, path};

use crate::normalize::NormalizedRecord;

/// Flat projection of one record: dotted path to coerced cell value.
pub type ValueMap = BTreeMap<String, Scalar>;

/// Project a normalized record onto its full dotted-path map.
///
/// Every node below the root is inserted: containers map to their
/// count/presence marker, leaves to their scalar value, so paths are
/// unique and every one corresponds to a reachable node. The alias
/// namespace is applied after the tree, so a snapshot shadows any tree
/// path with the same name.
pub fn flatten(record: &NormalizedRecord) -> ValueMap {
    let mut map = ValueMap::new();
    if let Node::Object(fields) = &record.tree {
        for (key, child) in fields {
            walk(&mut map, key.clone(), child);
        }
    }
    for alias in &record.aliases {
        let base = path::join(&alias.base_path, &alias.identifier);
        walk(&mut map, base, &alias.snapshot);
    }
    map
}

fn walk(map: &mut ValueMap, at: String, node: &Node) {
    match node {
        Node::Object(fields) => {
            for (key, child) in fields {
                walk(map, path::join(&at, key), child);
            }
        }
        Node::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                walk(map, path::join(&at, &index.to_string()), item);
            }
        }
        _ => {}
    }
    map.insert(at, node.to_scalar());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::TermAlias;
    use sheetfill_common::DateDetection;
    use serde_json::json;

    fn record(tree: serde_json::Value) -> NormalizedRecord {
        NormalizedRecord {
            tree: Node::from_json(tree, DateDetection::Iso8601).expect("ingest"),
            aliases: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn child(record: &NormalizedRecord, key: &str) -> Node {
        match &record.tree {
            Node::Object(fields) => fields[key].clone(),
            other => panic!("unexpected root: {other:?}"),
        }
    }

    #[test]
    fn emits_every_node_below_the_root() {
        let map = flatten(&record(json!({
            "government": { "identifier": "ca" },
            "flows": [ { "amount": 10 }, { "amount": 20 } ],
            "active": true
        })));

        assert_eq!(map.get("government"), Some(&Scalar::Int(1)));
        assert_eq!(map.get("government.identifier"), Some(&Scalar::Text("ca".into())));
        assert_eq!(map.get("flows"), Some(&Scalar::Int(2)));
        assert_eq!(map.get("flows.0.amount"), Some(&Scalar::Int(10)));
        assert_eq!(map.get("flows.1.amount"), Some(&Scalar::Int(20)));
        assert_eq!(map.get("active"), Some(&Scalar::Int(1)));
        assert!(map.get("").is_none());
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn aliases_form_a_synthetic_namespace() {
        let mut normalized = record(json!({
            "government": { "identifier": "ca", "title": "Canada" }
        }));
        let snapshot = child(&normalized, "government");
        normalized.aliases.push(TermAlias {
            base_path: "government".to_owned(),
            identifier: "ca".to_owned(),
            snapshot,
        });

        let map = flatten(&normalized);
        assert_eq!(map.get("government.ca"), Some(&Scalar::Int(1)));
        assert_eq!(
            map.get("government.ca.title"),
            Some(&Scalar::Text("Canada".into()))
        );
        assert_eq!(
            map.get("government.ca.identifier"),
            Some(&Scalar::Text("ca".into()))
        );
    }

    #[test]
    fn aliases_shadow_tree_paths() {
        let mut normalized = record(json!({
            "parent": { "identifier": "note", "note": "plain" }
        }));
        let snapshot = child(&normalized, "parent");
        normalized.aliases.push(TermAlias {
            base_path: "parent".to_owned(),
            identifier: "note".to_owned(),
            snapshot,
        });

        let map = flatten(&normalized);
        // the snapshot object wins over the tree's own `note` leaf
        assert_eq!(map.get("parent.note"), Some(&Scalar::Int(1)));
        assert_eq!(
            map.get("parent.note.note"),
            Some(&Scalar::Text("plain".into()))
        );
    }
}
