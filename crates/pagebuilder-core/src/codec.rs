//! Stable JSON encoding of documents.
//!
//! Object keys are sorted at every depth, so two structurally equal
//! documents always produce byte-identical text. Dirty tracking depends on
//! that property.

use crate::document::{DOCUMENT_VERSION, Document, UNTITLED};
use crate::node::{Layout, Node, NodeId, NodeKind, NodeProps};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while encoding or decoding documents.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(String),
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Serialize any value with object keys sorted recursively.
pub fn stable_stringify<T: Serialize + ?Sized>(value: &T) -> CodecResult<String> {
    let value = serde_json::to_value(value).map_err(CodecError::Encode)?;
    serde_json::to_string(&sort_value(value)).map_err(CodecError::Encode)
}

fn sort_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sort_value).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_value(value));
            }
            Value::Object(sorted)
        }
        other => other,
    }
}

/// Encode a document in its canonical form.
pub fn serialize(doc: &Document) -> CodecResult<String> {
    stable_stringify(doc)
}

/// Decode a document.
///
/// The version gate is strict: anything that is not an object with
/// `version == 1` is rejected. Past the gate, nodes are decoded one at a
/// time so a single bad node does not cost the whole document.
pub fn deserialize(json: &str) -> CodecResult<Document> {
    let value: Value = serde_json::from_str(json).map_err(CodecError::Parse)?;
    let Value::Object(map) = value else {
        return Err(CodecError::UnsupportedVersion(
            "document is not an object".to_string(),
        ));
    };

    match map.get("version") {
        Some(v) if v.as_f64() == Some(DOCUMENT_VERSION as f64) => {}
        Some(v) => return Err(CodecError::UnsupportedVersion(v.to_string())),
        None => return Err(CodecError::UnsupportedVersion("missing".to_string())),
    }

    let id = match map.get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = format!("doc-{}", Uuid::new_v4().simple());
            log::warn!("Document has no id, assigned {}", id);
            id
        }
    };
    let title = map
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(UNTITLED)
        .to_string();

    let raw_nodes: &[Value] = match map.get("nodes") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            log::warn!("Document nodes is not an array, starting empty");
            &[]
        }
        None => &[],
    };

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for (index, raw) in raw_nodes.iter().enumerate() {
        let Some(node) = decode_node(index, raw) else {
            continue;
        };
        if !seen.insert(node.id.clone()) {
            log::warn!("Dropping node {} at index {}: duplicate id", node.id, index);
            continue;
        }
        nodes.push(node);
    }

    Ok(Document::with_id(id, title, nodes))
}

fn decode_node(index: usize, raw: &Value) -> Option<Node> {
    let Some(obj) = raw.as_object() else {
        log::warn!("Dropping node at index {}: not an object", index);
        return None;
    };
    let id = match obj.get("id").and_then(Value::as_str) {
        Some(id) => NodeId::from(id),
        None => {
            log::warn!("Dropping node at index {}: missing id", index);
            return None;
        }
    };
    let kind = match obj
        .get("kind")
        .and_then(|k| serde_json::from_value::<NodeKind>(k.clone()).ok())
    {
        Some(kind) => kind,
        None => {
            log::warn!("Dropping node {}: unknown kind {:?}", id, obj.get("kind"));
            return None;
        }
    };
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(kind.label())
        .to_string();

    let raw_props = obj
        .get("props")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    let mut props = match NodeProps::from_value(kind, raw_props.clone()) {
        Ok(props) => props,
        Err(e) => {
            log::warn!("Node {} has invalid {} props ({}), using defaults", id, kind, e);
            let layout = serde_json::from_value::<Layout>(raw_props).unwrap_or_default();
            NodeProps::defaults(kind, layout)
        }
    };

    clamp_to_min_size(&id, kind, &mut props);
    Some(Node::new(id, name, props))
}

fn clamp_to_min_size(id: &NodeId, kind: NodeKind, props: &mut NodeProps) {
    let min = kind.min_size();
    let layout = props.layout_mut();
    if let Some(width) = layout.width.filter(|w| *w < min.width) {
        log::warn!("Node {} width {} below minimum, clamped to {}", id, width, min.width);
        layout.width = Some(min.width);
    }
    if let Some(height) = layout.height.filter(|h| *h < min.height) {
        log::warn!("Node {} height {} below minimum, clamped to {}", id, height, min.height);
        layout.height = Some(min.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{PropsPatch, TextProps};
    use serde_json::json;

    #[test]
    fn test_stable_stringify_sorts_nested_keys() {
        let a = json!({"b": 1, "a": {"z": true, "y": [ {"d": 1, "c": 2} ]}});
        let b = json!({"a": {"y": [ {"c": 2, "d": 1} ], "z": true}, "b": 1});
        let encoded = stable_stringify(&a).unwrap();
        assert_eq!(encoded, stable_stringify(&b).unwrap());
        assert_eq!(encoded, r#"{"a":{"y":[{"c":2,"d":1}],"z":true},"b":1}"#);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let doc = Document::sample();
        assert_eq!(serialize(&doc).unwrap(), serialize(&doc.clone()).unwrap());
    }

    #[test]
    fn test_round_trip() {
        let mut doc = Document::sample();
        let hud = Node::new(
            NodeId::from("hud-1"),
            "HUD 1",
            NodeProps::placed(NodeKind::Hud, 0, 24.0),
        );
        doc.nodes.push(hud);
        let encoded = serialize(&doc).unwrap();
        let decoded = deserialize(&encoded).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_version_gate() {
        assert!(matches!(
            deserialize(r#"{"id":"d","title":"t","version":2,"nodes":[]}"#),
            Err(CodecError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            deserialize(r#"{"id":"d","title":"t","nodes":[]}"#),
            Err(CodecError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            deserialize("[1,2,3]"),
            Err(CodecError::UnsupportedVersion(_))
        ));
        assert!(matches!(deserialize("{oops"), Err(CodecError::Parse(_))));
    }

    #[test]
    fn test_float_version_accepted() {
        let doc = deserialize(r#"{"id":"d","title":"t","version":1.0,"nodes":[]}"#).unwrap();
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_mismatched_props_fall_back_to_defaults() {
        let doc = deserialize(
            r#"{"id":"d","title":"t","version":1,"nodes":[
                {"id":"t1","name":"Broken","kind":"text","props":{"x":5,"y":6,"width":100,"height":40,"text":42}}
            ]}"#,
        )
        .unwrap();
        let node = &doc.nodes[0];
        assert_eq!(node.id.as_str(), "t1");
        assert_eq!(node.name, "Broken");
        let NodeProps::Text(TextProps { text, layout, .. }) = &node.props else {
            panic!("expected text props");
        };
        assert_eq!(text, "New text");
        assert_eq!(*layout, Layout::new(5.0, 6.0, 100.0, 40.0));
    }

    #[test]
    fn test_bad_nodes_dropped() {
        let doc = deserialize(
            r#"{"id":"d","version":1,"nodes":[
                {"id":"a","name":"A","kind":"button","props":{"label":"A"}},
                {"name":"no id","kind":"button","props":{"label":"B"}},
                {"id":"c","name":"C","kind":"carousel","props":{}},
                {"id":"a","name":"dup","kind":"button","props":{"label":"dup"}},
                "junk"
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.title, UNTITLED);
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].name, "A");
    }

    #[test]
    fn test_undersized_nodes_clamped_on_load() {
        let doc = deserialize(
            r#"{"id":"d","title":"t","version":1,"nodes":[
                {"id":"b1","name":"Tiny","kind":"button","props":{"label":"A","x":40,"y":40,"width":5,"height":-50}},
                {"id":"s1","name":"Side","kind":"sidebar","props":{"x":0,"y":0,"width":300}}
            ]}"#,
        )
        .unwrap();
        let min = NodeKind::Button.min_size();
        assert_eq!(doc.nodes[0].layout().size(), Some(min));
        assert_eq!(doc.nodes[0].layout().origin(), Some(kurbo::Point::new(40.0, 40.0)));
        assert_eq!(doc.nodes[1].layout().width, Some(300.0));
        assert_eq!(doc.nodes[1].layout().height, None);
    }

    #[test]
    fn test_empty_ids_survive_round_trip() {
        let node = Node::new(
            NodeId::from(""),
            "Blank",
            NodeProps::placed(NodeKind::Button, 0, 24.0),
        );
        let doc = Document::with_id("", "t", vec![node]);
        let decoded = deserialize(&serialize(&doc).unwrap()).unwrap();
        assert_eq!(decoded, doc);
        assert_eq!(decoded.id, "");
        assert_eq!(decoded.nodes[0].id.as_str(), "");
    }

    #[test]
    fn test_key_order_invariance_after_edit() {
        let mut a = Document::sample();
        let mut b = deserialize(&serialize(&a).unwrap()).unwrap();
        let patch = PropsPatch::position(64.0, 64.0);
        let min = NodeKind::Text.min_size();
        patch.apply(&mut a.nodes[0].props, min);
        patch.apply(&mut b.nodes[0].props, min);
        assert_eq!(serialize(&a).unwrap(), serialize(&b).unwrap());
    }
}
