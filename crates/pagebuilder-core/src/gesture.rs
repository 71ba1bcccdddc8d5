//! Pointer gesture state for the canvas engine.

use crate::input::CaptureGuard;
use crate::node::NodeId;
use kurbo::{Point, Size, Vec2};

/// Axis a shift-constrained drag is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The axis with the larger accumulated movement. Ties go horizontal.
    pub fn dominant(delta: Vec2) -> Self {
        if delta.x.abs() >= delta.y.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Zero out movement on the other axis.
    pub fn constrain(self, delta: Vec2) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(delta.x, 0.0),
            Axis::Vertical => Vec2::new(0.0, delta.y),
        }
    }
}

/// A node being moved.
#[derive(Debug)]
pub struct DragState {
    /// The node being moved (the copy, for duplicate-drags).
    pub node_id: NodeId,
    /// The node the drag started on, when this is a duplicate-drag.
    pub duplicated_from: Option<NodeId>,
    /// Pointer position at gesture start, screen space.
    pub start_point: Point,
    /// Node position at gesture start, document space.
    pub origin: Point,
    pub(crate) _capture: Option<CaptureGuard>,
}

impl DragState {
    /// Accumulated pointer movement in screen pixels.
    pub fn screen_delta(&self, current: Point) -> Vec2 {
        current - self.start_point
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicated_from.is_some()
    }
}

/// A node being resized from its bottom-right corner.
#[derive(Debug)]
pub struct ResizeState {
    pub node_id: NodeId,
    pub start_point: Point,
    /// Node size at gesture start.
    pub base_size: Size,
    pub(crate) _capture: Option<CaptureGuard>,
}

impl ResizeState {
    pub fn screen_delta(&self, current: Point) -> Vec2 {
        current - self.start_point
    }
}

/// The stage being panned.
#[derive(Debug)]
pub struct PanState {
    /// Last pointer position seen, screen space.
    pub last_point: Point,
    pub(crate) _capture: Option<CaptureGuard>,
}

/// What the pointer is currently doing.
#[derive(Debug, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
    Panning(PanState),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The node the gesture acts on, if any.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Gesture::Dragging(drag) => Some(&drag.node_id),
            Gesture::Resizing(resize) => Some(&resize.node_id),
            Gesture::Idle | Gesture::Panning(_) => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn has_capture(&self) -> bool {
        match self {
            Gesture::Dragging(drag) => drag._capture.is_some(),
            Gesture::Resizing(resize) => resize._capture.is_some(),
            Gesture::Panning(pan) => pan._capture.is_some(),
            Gesture::Idle => false,
        }
    }
}
