//! The page document: an ordered list of nodes plus metadata.

use crate::node::{ButtonAction, ButtonProps, Layout, Node, NodeId, NodeKind, NodeProps, TextProps};
use kurbo::{Point, Rect};
use serde::Serialize;
use uuid::Uuid;

/// The only document format version this crate reads or writes.
pub const DOCUMENT_VERSION: u32 = 1;

/// Title given to documents that arrive without one.
pub const UNTITLED: &str = "Untitled";

/// A page document.
///
/// Node order is both the layer-panel order and the paint order: later
/// nodes draw on top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    version: u32,
    pub nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(UNTITLED)
    }
}

impl Document {
    /// Create an empty document with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(format!("doc-{}", Uuid::new_v4().simple()), title, Vec::new())
    }

    pub fn with_id(id: impl Into<String>, title: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            version: DOCUMENT_VERSION,
            nodes,
        }
    }

    /// The built-in sample shown when nothing valid has been saved yet.
    pub fn sample() -> Self {
        let heading = Node::new(
            NodeId::from("node-text-1"),
            "Hero Heading",
            NodeProps::Text(TextProps {
                text: "Welcome to Builder Mini".to_string(),
                font_size: Some(32.0),
                color: None,
                layout: Layout::new(40.0, 40.0, 480.0, 64.0),
            }),
        );
        let button = Node::new(
            NodeId::from("node-button-1"),
            "Primary Button",
            NodeProps::Button(ButtonProps {
                label: "Get Started".to_string(),
                action: Some(ButtonAction::None),
                layout: Layout::new(40.0, 200.0, 160.0, 44.0),
            }),
        );
        Self::with_id("doc-sample", "Sample Page", vec![heading, button])
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn count_of_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind() == kind).count()
    }

    /// Top-most node whose rectangle contains `point` (document space).
    pub fn node_at(&self, point: Point) -> Option<&Node> {
        self.nodes.iter().rev().find(|node| {
            node.rect().is_some_and(|r| {
                point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
            })
        })
    }

    /// Rectangles of every placed node except `id`, for snapping.
    pub fn rects_except(&self, id: &NodeId) -> Vec<Rect> {
        self.nodes
            .iter()
            .filter(|n| &n.id != id)
            .filter_map(Node::rect)
            .collect()
    }
}
