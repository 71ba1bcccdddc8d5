//! Canvas interaction engine.
//!
//! Turns pointer, wheel and keyboard input into store mutations and
//! viewport changes. The engine holds only transient view state (zoom, pan,
//! the active gesture and the guides to draw); the document lives in the
//! [`EditorStore`].

use crate::config::EditorConfig;
use crate::gesture::{Axis, DragState, Gesture, PanState, ResizeState};
use crate::input::{CaptureGuard, CursorStyle, Direction, FocusTarget, Key, Modifiers, PointerCapture};
use crate::node::{NodeId, PropsPatch};
use crate::snap::{Guides, SnapMode, snap_move, snap_resize};
use crate::storage::BlobStore;
use crate::store::EditorStore;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use std::fmt;
use std::rc::Rc;

/// Per-move work extracted from the active gesture.
enum Step {
    Pan(Vec2),
    Drag { id: NodeId, origin: Point, delta: Vec2 },
    Resize { id: NodeId, base: Size, delta: Vec2 },
}

/// Runtime canvas state (not persisted).
pub struct CanvasEngine {
    viewport: Viewport,
    snap_mode: SnapMode,
    space_held: bool,
    gesture: Gesture,
    guides: Guides,
    config: EditorConfig,
    capture: Option<Rc<dyn PointerCapture>>,
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl fmt::Debug for CanvasEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasEngine")
            .field("viewport", &self.viewport)
            .field("snap_mode", &self.snap_mode)
            .field("space_held", &self.space_held)
            .field("gesture", &self.gesture)
            .field("guides", &self.guides)
            .finish_non_exhaustive()
    }
}

impl CanvasEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            viewport: Viewport::from_config(&config),
            snap_mode: SnapMode::default(),
            space_held: false,
            gesture: Gesture::Idle,
            guides: Guides::default(),
            config,
            capture: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Alignment guides to draw for the current gesture.
    pub fn guides(&self) -> Guides {
        self.guides
    }

    pub fn snap_mode(&self) -> SnapMode {
        self.snap_mode
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.snap_mode = mode;
    }

    pub fn cycle_snap_mode(&mut self) -> SnapMode {
        self.snap_mode = self.snap_mode.next();
        self.snap_mode
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    /// Install the host's pointer-capture hook. It is acquired for the
    /// duration of every gesture.
    pub fn set_pointer_capture(&mut self, target: Option<Rc<dyn PointerCapture>>) {
        self.capture = target;
    }

    fn acquire_capture(&self) -> Option<CaptureGuard> {
        self.capture.clone().map(CaptureGuard::acquire)
    }

    /// Drop the active gesture, releasing its capture. Returns true if a
    /// gesture was active.
    fn end_gesture(&mut self) -> bool {
        let was_active = !self.gesture.is_idle();
        self.gesture = Gesture::Idle;
        self.guides = Guides::default();
        if was_active {
            log::debug!("Gesture ended");
        }
        was_active
    }

    /// Guide tolerance in document pixels at the current zoom.
    fn guide_tolerance(&self) -> f64 {
        self.config.guide_tolerance / self.viewport.zoom
    }

    /// Whether `screen` lies in the bottom-right resize handle of a node
    /// whose document rectangle is `rect`.
    fn in_resize_zone(&self, rect: Rect, screen: Point) -> bool {
        let on_screen = self.viewport.document_rect_to_screen(rect);
        let zone = self.config.resize_hot_zone;
        screen.x >= on_screen.x1 - zone
            && screen.x <= on_screen.x1
            && screen.y >= on_screen.y1 - zone
            && screen.y <= on_screen.y1
    }

    pub fn zoom_in(&mut self) -> bool {
        self.viewport.zoom_by(self.config.key_zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport.zoom_by(-self.config.key_zoom_step)
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Start a gesture at `screen`.
    ///
    /// With space held this starts a pan. Otherwise the top-most node under
    /// the pointer is selected and either resized (bottom-right handle) or
    /// dragged; with the duplicate modifier a copy is dragged instead.
    /// Pressing on empty canvas clears the selection.
    pub fn pointer_down<S: BlobStore>(
        &mut self,
        store: &mut EditorStore<S>,
        screen: Point,
        modifiers: Modifiers,
    ) -> bool {
        self.end_gesture();

        if self.space_held {
            let capture = self.acquire_capture();
            self.gesture = Gesture::Panning(PanState {
                last_point: screen,
                _capture: capture,
            });
            log::debug!("Pan started at {:?}", screen);
            return true;
        }

        let point = self.viewport.screen_to_document(screen);
        let hit = store
            .document()
            .node_at(point)
            .and_then(|node| Some((node.id.clone(), node.rect()?)));
        let Some((id, rect)) = hit else {
            return store.select(None);
        };

        if self.in_resize_zone(rect, screen) {
            store.select(Some(&id));
            let capture = self.acquire_capture();
            log::debug!("Resize started on {}", id);
            self.gesture = Gesture::Resizing(ResizeState {
                node_id: id,
                start_point: screen,
                base_size: rect.size(),
                _capture: capture,
            });
            return true;
        }

        let (node_id, duplicated_from, origin) = if modifiers.duplicate() {
            let Some(copy) = store.duplicate_node(&id) else {
                return false;
            };
            // The copy starts offset from its source; drag it from there.
            let origin = store
                .node(&copy)
                .and_then(|node| node.layout().origin())
                .unwrap_or(rect.origin());
            (copy, Some(id), origin)
        } else {
            store.select(Some(&id));
            (id, None, rect.origin())
        };

        let capture = self.acquire_capture();
        log::debug!("Drag started on {}", node_id);
        self.gesture = Gesture::Dragging(DragState {
            node_id,
            duplicated_from,
            start_point: screen,
            origin,
            _capture: capture,
        });
        true
    }

    /// Continue the active gesture. Returns false when idle or when the
    /// node under the gesture no longer exists.
    pub fn pointer_move<S: BlobStore>(
        &mut self,
        store: &mut EditorStore<S>,
        screen: Point,
        modifiers: Modifiers,
    ) -> bool {
        let step = match &self.gesture {
            Gesture::Idle => return false,
            Gesture::Panning(pan) => Step::Pan(screen - pan.last_point),
            Gesture::Dragging(drag) => Step::Drag {
                id: drag.node_id.clone(),
                origin: drag.origin,
                delta: drag.screen_delta(screen),
            },
            Gesture::Resizing(resize) => Step::Resize {
                id: resize.node_id.clone(),
                base: resize.base_size,
                delta: resize.screen_delta(screen),
            },
        };

        match step {
            Step::Pan(delta) => {
                if let Gesture::Panning(pan) = &mut self.gesture {
                    pan.last_point = screen;
                }
                self.viewport.pan_by(delta);
                true
            }
            Step::Drag { id, origin, delta } => self.drag_to(store, &id, origin, delta, modifiers),
            Step::Resize { id, base, delta } => self.resize_to(store, &id, base, delta),
        }
    }

    fn drag_to<S: BlobStore>(
        &mut self,
        store: &mut EditorStore<S>,
        id: &NodeId,
        origin: Point,
        screen_delta: Vec2,
        modifiers: Modifiers,
    ) -> bool {
        let Some(size) = store.node(id).and_then(|n| n.layout().size()) else {
            return false;
        };

        let mut delta = self.viewport.screen_delta_to_document(screen_delta);
        let lock = modifiers.shift.then(|| Axis::dominant(delta));
        if let Some(axis) = lock {
            delta = axis.constrain(delta);
        }

        let candidate = Rect::from_origin_size(origin + delta, size);
        let others = store.document().rects_except(id);
        let mut snapped = snap_move(
            candidate,
            &others,
            self.guide_tolerance(),
            self.config.grid_size,
            self.snap_mode,
        );
        match lock {
            Some(Axis::Horizontal) => {
                snapped.origin.y = origin.y;
                snapped.guides.horizontal = None;
            }
            Some(Axis::Vertical) => {
                snapped.origin.x = origin.x;
                snapped.guides.vertical = None;
            }
            None => {}
        }

        self.guides = snapped.guides;
        store.update_node_props(id, &PropsPatch::position(snapped.origin.x, snapped.origin.y));
        true
    }

    fn resize_to<S: BlobStore>(
        &mut self,
        store: &mut EditorStore<S>,
        id: &NodeId,
        base: Size,
        screen_delta: Vec2,
    ) -> bool {
        let Some(node) = store.node(id) else {
            return false;
        };
        let Some(origin) = node.layout().origin() else {
            return false;
        };
        let min = node.kind().min_size();

        let delta = self.viewport.screen_delta_to_document(screen_delta);
        let raw = Size::new(
            (base.width + delta.x).max(min.width),
            (base.height + delta.y).max(min.height),
        );
        let others = store.document().rects_except(id);
        let snapped = snap_resize(
            origin,
            raw,
            &others,
            self.guide_tolerance(),
            self.config.grid_size,
            self.snap_mode,
            min,
        );

        self.guides = snapped.guides;
        store.update_node_props(id, &PropsPatch::size(snapped.size.width, snapped.size.height));
        true
    }

    /// Finish the active gesture.
    pub fn pointer_up(&mut self) -> bool {
        self.end_gesture()
    }

    /// Abort the active gesture (e.g. pointer capture lost). Changes already
    /// written to the store stay.
    pub fn cancel_gesture(&mut self) -> bool {
        self.end_gesture()
    }

    /// Handle a wheel event. Zooms with the command modifier held; plain
    /// wheel events are left to the host for scrolling.
    pub fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) -> bool {
        if !modifiers.command() {
            return false;
        }
        if delta_y.is_finite() && delta_y != 0.0 {
            let step = self.config.wheel_zoom_step;
            self.viewport.zoom_by(if delta_y < 0.0 { step } else { -step });
        }
        true
    }

    /// Handle a key press. Returns true if the engine consumed it.
    ///
    /// Nothing is consumed while a text control has focus.
    pub fn key_down<S: BlobStore>(
        &mut self,
        store: &mut EditorStore<S>,
        key: Key,
        modifiers: Modifiers,
        focus: FocusTarget,
    ) -> bool {
        if focus.is_text_editing() {
            return false;
        }
        match key {
            Key::Space => {
                if !self.space_held {
                    self.space_held = true;
                    log::debug!("Pan mode on");
                }
                true
            }
            Key::Plus if modifiers.command() => {
                self.zoom_in();
                true
            }
            Key::Minus if modifiers.command() => {
                self.zoom_out();
                true
            }
            Key::Zero if modifiers.command() => {
                self.reset_view();
                true
            }
            Key::Escape => self.cancel_gesture(),
            Key::Arrow(direction) if !modifiers.alt && !modifiers.command() => {
                self.nudge_selected(store, direction, modifiers.shift)
            }
            _ => false,
        }
    }

    fn nudge_selected<S: BlobStore>(
        &mut self,
        store: &mut EditorStore<S>,
        direction: Direction,
        large: bool,
    ) -> bool {
        let Some(id) = store.selected_id().cloned() else {
            return false;
        };
        let step = if large {
            self.config.nudge_step_large
        } else {
            self.config.nudge_step
        };
        let delta = direction.unit() * step;
        store.nudge_node(&id, delta.x, delta.y)
    }

    /// Handle a key release.
    pub fn key_up(&mut self, key: Key) -> bool {
        if key != Key::Space || !self.space_held {
            return false;
        }
        self.space_held = false;
        if matches!(self.gesture, Gesture::Panning(_)) {
            self.end_gesture();
        }
        log::debug!("Pan mode off");
        true
    }

    /// Cursor for the current gesture state.
    pub fn cursor(&self) -> CursorStyle {
        match &self.gesture {
            Gesture::Panning(_) => CursorStyle::Grabbing,
            Gesture::Dragging(_) => CursorStyle::Move,
            Gesture::Resizing(_) => CursorStyle::ResizeNwse,
            Gesture::Idle if self.space_held => CursorStyle::Grab,
            Gesture::Idle => CursorStyle::Default,
        }
    }

    /// Cursor to show while hovering `screen` with no button pressed.
    pub fn hover_cursor<S: BlobStore>(&self, store: &EditorStore<S>, screen: Point) -> CursorStyle {
        if !self.gesture.is_idle() || self.space_held {
            return self.cursor();
        }
        let point = self.viewport.screen_to_document(screen);
        match store.document().node_at(point).and_then(|n| n.rect()) {
            Some(rect) if self.in_resize_zone(rect, screen) => CursorStyle::ResizeNwse,
            Some(_) => CursorStyle::Move,
            None => CursorStyle::Default,
        }
    }
}
