//! Page nodes: the typed building blocks of a document.

mod patch;
mod props;

pub use patch::PropsPatch;
pub use props::{
    BarProps, ButtonAction, ButtonProps, HudPosition, HudProps, ImageFit, ImageProps, Layout,
    SidebarProps, SidebarSide, TextProps,
};

use kurbo::{Rect, Size};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Header,
    Footer,
    Sidebar,
    Hud,
    Text,
    Image,
    Button,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Header,
        NodeKind::Footer,
        NodeKind::Sidebar,
        NodeKind::Hud,
        NodeKind::Text,
        NodeKind::Image,
        NodeKind::Button,
    ];

    /// Human-readable label, used for default node names.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Header => "Header",
            NodeKind::Footer => "Footer",
            NodeKind::Sidebar => "Sidebar",
            NodeKind::Hud => "HUD",
            NodeKind::Text => "Text",
            NodeKind::Image => "Image",
            NodeKind::Button => "Button",
        }
    }

    /// Wire spelling of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Header => "header",
            NodeKind::Footer => "footer",
            NodeKind::Sidebar => "sidebar",
            NodeKind::Hud => "hud",
            NodeKind::Text => "text",
            NodeKind::Image => "image",
            NodeKind::Button => "button",
        }
    }

    /// Smallest size a node of this kind may be given.
    pub fn min_size(&self) -> Size {
        match self {
            NodeKind::Sidebar => Size::new(64.0, 32.0),
            _ => Size::new(40.0, 32.0),
        }
    }

    /// Where the first node of this kind lands on the canvas.
    fn default_layout(&self) -> Layout {
        match self {
            NodeKind::Header => Layout::new(0.0, 0.0, 960.0, 64.0),
            NodeKind::Footer => Layout::new(0.0, 576.0, 960.0, 64.0),
            NodeKind::Sidebar => Layout::new(0.0, 64.0, 240.0, 512.0),
            NodeKind::Hud => Layout::new(720.0, 24.0, 200.0, 48.0),
            NodeKind::Text => Layout::new(40.0, 40.0, 240.0, 48.0),
            NodeKind::Image => Layout::new(320.0, 40.0, 320.0, 180.0),
            NodeKind::Button => Layout::new(40.0, 200.0, 160.0, 44.0),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier of a node within its document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id of the form `node-<kind>-<uuid>`.
    pub fn generate(kind: NodeKind) -> Self {
        Self(format!("node-{}-{}", kind.as_str(), Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind-specific properties. The variant determines the node's kind.
///
/// Serializes as the bare props object; the kind travels next to it on the
/// enclosing node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeProps {
    Header(BarProps),
    Footer(BarProps),
    Sidebar(SidebarProps),
    Hud(HudProps),
    Text(TextProps),
    Image(ImageProps),
    Button(ButtonProps),
}

impl NodeProps {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeProps::Header(_) => NodeKind::Header,
            NodeProps::Footer(_) => NodeKind::Footer,
            NodeProps::Sidebar(_) => NodeKind::Sidebar,
            NodeProps::Hud(_) => NodeKind::Hud,
            NodeProps::Text(_) => NodeKind::Text,
            NodeProps::Image(_) => NodeKind::Image,
            NodeProps::Button(_) => NodeKind::Button,
        }
    }

    pub fn layout(&self) -> &Layout {
        match self {
            NodeProps::Header(p) | NodeProps::Footer(p) => &p.layout,
            NodeProps::Sidebar(p) => &p.layout,
            NodeProps::Hud(p) => &p.layout,
            NodeProps::Text(p) => &p.layout,
            NodeProps::Image(p) => &p.layout,
            NodeProps::Button(p) => &p.layout,
        }
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        match self {
            NodeProps::Header(p) | NodeProps::Footer(p) => &mut p.layout,
            NodeProps::Sidebar(p) => &mut p.layout,
            NodeProps::Hud(p) => &mut p.layout,
            NodeProps::Text(p) => &mut p.layout,
            NodeProps::Image(p) => &mut p.layout,
            NodeProps::Button(p) => &mut p.layout,
        }
    }

    /// Default props for a kind, with the given layout.
    pub fn defaults(kind: NodeKind, layout: Layout) -> Self {
        match kind {
            NodeKind::Header => NodeProps::Header(BarProps {
                background: Some("#111827".to_string()),
                layout,
            }),
            NodeKind::Footer => NodeProps::Footer(BarProps {
                background: Some("#1f2937".to_string()),
                layout,
            }),
            NodeKind::Sidebar => NodeProps::Sidebar(SidebarProps {
                side: SidebarSide::Left,
                background: Some("#f3f4f6".to_string()),
                layout,
            }),
            NodeKind::Hud => NodeProps::Hud(HudProps {
                position: Some(HudPosition::TopRight),
                offset_x: Some(16.0),
                offset_y: Some(16.0),
                z_index: Some(10),
                layout,
            }),
            NodeKind::Text => NodeProps::Text(TextProps {
                text: "New text".to_string(),
                font_size: Some(16.0),
                color: None,
                layout,
            }),
            NodeKind::Image => NodeProps::Image(ImageProps {
                src: "https://placehold.co/320x180".to_string(),
                fit: Some(ImageFit::Cover),
                layout,
            }),
            NodeKind::Button => NodeProps::Button(ButtonProps {
                label: "Button".to_string(),
                action: Some(ButtonAction::None),
                layout,
            }),
        }
    }

    /// Default props for the `index`-th node of a kind, staggered downwards
    /// so successive additions do not stack exactly on top of each other.
    pub fn placed(kind: NodeKind, index: usize, stagger: f64) -> Self {
        let mut layout = kind.default_layout();
        layout.y = layout.y.map(|y| y + index as f64 * stagger);
        Self::defaults(kind, layout)
    }

    /// Decode a props object for the given kind.
    pub fn from_value(kind: NodeKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            NodeKind::Header => NodeProps::Header(serde_json::from_value(value)?),
            NodeKind::Footer => NodeProps::Footer(serde_json::from_value(value)?),
            NodeKind::Sidebar => NodeProps::Sidebar(serde_json::from_value(value)?),
            NodeKind::Hud => NodeProps::Hud(serde_json::from_value(value)?),
            NodeKind::Text => NodeProps::Text(serde_json::from_value(value)?),
            NodeKind::Image => NodeProps::Image(serde_json::from_value(value)?),
            NodeKind::Button => NodeProps::Button(serde_json::from_value(value)?),
        })
    }
}

/// A single element on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub props: NodeProps,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, props: NodeProps) -> Self {
        Self {
            id,
            name: name.into(),
            props,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.props.kind()
    }

    pub fn layout(&self) -> &Layout {
        self.props.layout()
    }

    /// Bounding rectangle in document space, if the node is fully placed.
    pub fn rect(&self) -> Option<Rect> {
        self.props.layout().rect()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("props", &self.props)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    name: String,
    kind: NodeKind,
    #[serde(default)]
    props: serde_json::Value,
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawNode::deserialize(deserializer)?;
        let props = NodeProps::from_value(raw.kind, raw.props).map_err(serde::de::Error::custom)?;
        Ok(Node {
            id: raw.id,
            name: raw.name,
            props,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = NodeId::generate(NodeKind::Text);
        let b = NodeId::generate(NodeKind::Text);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("node-text-"));
    }

    #[test]
    fn test_kind_follows_props() {
        for kind in NodeKind::ALL {
            let props = NodeProps::defaults(kind, Layout::default());
            assert_eq!(props.kind(), kind);
        }
    }

    #[test]
    fn test_min_size() {
        assert_eq!(NodeKind::Text.min_size(), Size::new(40.0, 32.0));
        assert_eq!(NodeKind::Sidebar.min_size(), Size::new(64.0, 32.0));
    }

    #[test]
    fn test_default_layouts_respect_min_size() {
        for kind in NodeKind::ALL {
            let size = kind.default_layout().size().unwrap();
            let min = kind.min_size();
            assert!(size.width >= min.width && size.height >= min.height, "{kind}");
        }
    }

    #[test]
    fn test_placed_staggers_vertically() {
        let first = NodeProps::placed(NodeKind::Button, 0, 24.0);
        let third = NodeProps::placed(NodeKind::Button, 2, 24.0);
        assert_eq!(first.layout().y, Some(200.0));
        assert_eq!(third.layout().y, Some(248.0));
        assert_eq!(first.layout().x, third.layout().x);
    }

    #[test]
    fn test_node_wire_shape() {
        let node = Node::new(
            NodeId::from("b1"),
            "Buy",
            NodeProps::Button(ButtonProps {
                label: "Buy now".to_string(),
                action: None,
                layout: Layout::new(0.0, 0.0, 100.0, 40.0),
            }),
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "b1",
                "name": "Buy",
                "kind": "button",
                "props": {"label": "Buy now", "x": 0.0, "y": 0.0, "width": 100.0, "height": 40.0}
            })
        );

        let back: Node = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_mismatched_props_rejected() {
        let result: Result<Node, _> = serde_json::from_value(json!({
            "id": "t1",
            "name": "Text",
            "kind": "text",
            "props": {"label": "not a text node"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<Node, _> = serde_json::from_value(json!({
            "id": "x",
            "name": "X",
            "kind": "carousel",
            "props": {}
        }));
        assert!(result.is_err());
    }
}
