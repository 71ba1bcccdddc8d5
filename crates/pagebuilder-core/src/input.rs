//! Host-neutral input types for the canvas and keyboard layers.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Held to drag a copy instead of the original.
    pub fn duplicate(&self) -> bool {
        self.alt || self.meta
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in document space (y grows downwards).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// A key press, normalized from the host's key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    Arrow(Direction),
    /// `+` or `=` (same physical key on most layouts).
    Plus,
    Minus,
    Zero,
    Delete,
    Backspace,
    Escape,
    Character(char),
    Other,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            " " | "Space" | "Spacebar" => Key::Space,
            "ArrowUp" => Key::Arrow(Direction::Up),
            "ArrowDown" => Key::Arrow(Direction::Down),
            "ArrowLeft" => Key::Arrow(Direction::Left),
            "ArrowRight" => Key::Arrow(Direction::Right),
            "+" | "=" => Key::Plus,
            "-" | "_" => Key::Minus,
            "0" => Key::Zero,
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// What currently has keyboard focus in the host UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusTarget {
    #[default]
    Canvas,
    TextInput,
    TextArea,
    Select,
    ContentEditable,
    Other,
}

impl FocusTarget {
    /// True when keystrokes belong to a form control or editable text, so
    /// editor shortcuts must stay out of the way.
    pub fn is_text_editing(self) -> bool {
        matches!(
            self,
            FocusTarget::TextInput
                | FocusTarget::TextArea
                | FocusTarget::Select
                | FocusTarget::ContentEditable
        )
    }
}

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorStyle {
    #[default]
    Default,
    Grab,
    Grabbing,
    Move,
    ResizeNwse,
}

impl CursorStyle {
    /// CSS cursor keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
            CursorStyle::Move => "move",
            CursorStyle::ResizeNwse => "nwse-resize",
        }
    }
}

/// Host hook for routing all pointer events to the canvas while a gesture
/// is in progress (e.g. `setPointerCapture`).
pub trait PointerCapture {
    fn capture(&self);
    fn release(&self);
}

/// Scoped pointer capture. Released when dropped.
pub struct CaptureGuard {
    target: Rc<dyn PointerCapture>,
}

impl CaptureGuard {
    pub fn acquire(target: Rc<dyn PointerCapture>) -> Self {
        target.capture();
        Self { target }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.target.release();
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CaptureGuard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        captured: Cell<u32>,
        released: Cell<u32>,
    }

    impl PointerCapture for Counter {
        fn capture(&self) {
            self.captured.set(self.captured.get() + 1);
        }

        fn release(&self) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("ArrowLeft"), Key::Arrow(Direction::Left));
        assert_eq!(Key::from_name("="), Key::Plus);
        assert_eq!(Key::from_name("0"), Key::Zero);
        assert_eq!(Key::from_name("t"), Key::Character('t'));
        assert_eq!(Key::from_name("F5"), Key::Other);
    }

    #[test]
    fn test_modifier_helpers() {
        assert!(Modifiers::ctrl().command());
        assert!(Modifiers::meta().command());
        assert!(!Modifiers::alt().command());
        assert!(Modifiers::alt().duplicate());
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn test_focus_text_editing() {
        assert!(!FocusTarget::Canvas.is_text_editing());
        assert!(!FocusTarget::Other.is_text_editing());
        assert!(FocusTarget::TextInput.is_text_editing());
        assert!(FocusTarget::ContentEditable.is_text_editing());
    }

    #[test]
    fn test_capture_guard_releases_on_drop() {
        let counter = Rc::new(Counter::default());
        let guard = CaptureGuard::acquire(counter.clone());
        assert_eq!(counter.captured.get(), 1);
        assert_eq!(counter.released.get(), 0);
        drop(guard);
        assert_eq!(counter.released.get(), 1);
    }
}
