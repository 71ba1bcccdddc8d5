//! Partial updates to node props.

use super::props::{ButtonAction, HudPosition, ImageFit, Layout, SidebarSide};
use super::NodeProps;
use kurbo::Size;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A partial set of props to merge into a node.
///
/// Covers the keys of every kind. Keys that do not belong to the target
/// node's kind are ignored when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropsPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub label: Option<String>,
    pub action: Option<ButtonAction>,
    pub background: Option<String>,
    pub side: Option<SidebarSide>,
    pub position: Option<HudPosition>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    pub z_index: Option<i32>,
    pub src: Option<String>,
    pub fit: Option<ImageFit>,
}

impl PropsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that moves a node to `(x, y)`.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that resizes a node.
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build a patch from a JSON object using wire key names.
    ///
    /// Unknown keys and values of the wrong type are skipped, so one bad
    /// field never discards the rest of the patch.
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            x: field(map, "x"),
            y: field(map, "y"),
            width: field(map, "width"),
            height: field(map, "height"),
            text: field(map, "text"),
            font_size: field(map, "fontSize"),
            color: field(map, "color"),
            label: field(map, "label"),
            action: field(map, "action"),
            background: field(map, "background"),
            side: field(map, "side"),
            position: field(map, "position"),
            offset_x: field(map, "offsetX"),
            offset_y: field(map, "offsetY"),
            z_index: field(map, "zIndex"),
            src: field(map, "src"),
            fit: field(map, "fit"),
        }
    }

    /// Merge this patch into `props`, clamping the size to `min`.
    ///
    /// Returns true if anything changed.
    pub fn apply(&self, props: &mut NodeProps, min: Size) -> bool {
        let mut next = props.clone();
        self.apply_layout(next.layout_mut(), min);
        match &mut next {
            NodeProps::Header(p) | NodeProps::Footer(p) => {
                set(&mut p.background, &self.background);
            }
            NodeProps::Sidebar(p) => {
                set_value(&mut p.side, &self.side);
                set(&mut p.background, &self.background);
            }
            NodeProps::Hud(p) => {
                set(&mut p.position, &self.position);
                set(&mut p.offset_x, &finite(self.offset_x));
                set(&mut p.offset_y, &finite(self.offset_y));
                set(&mut p.z_index, &self.z_index);
            }
            NodeProps::Text(p) => {
                set_value(&mut p.text, &self.text);
                set(&mut p.font_size, &finite(self.font_size));
                set(&mut p.color, &self.color);
            }
            NodeProps::Image(p) => {
                set_value(&mut p.src, &self.src);
                set(&mut p.fit, &self.fit);
            }
            NodeProps::Button(p) => {
                set_value(&mut p.label, &self.label);
                set(&mut p.action, &self.action);
            }
        }

        if next == *props {
            return false;
        }
        *props = next;
        true
    }

    fn apply_layout(&self, layout: &mut Layout, min: Size) {
        set(&mut layout.x, &finite(self.x));
        set(&mut layout.y, &finite(self.y));
        set(&mut layout.width, &finite(self.width).map(|w| w.max(min.width)));
        set(&mut layout.height, &finite(self.height).map(|h| h.max(min.height)));
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

fn set_value<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}
