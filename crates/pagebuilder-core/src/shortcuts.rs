//! Default keyboard bindings for editor commands.

use crate::input::{Direction, FocusTarget, Key, Modifiers};
use crate::node::NodeKind;
use crate::storage::BlobStore;
use crate::store::{EditorStore, MoveDirection};

/// A command reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    AddNode(NodeKind),
    Save,
    DeleteSelected,
    DuplicateSelected,
    MoveSelectedUp,
    MoveSelectedDown,
}

impl ShortcutAction {
    /// Run the command against the store. Returns true if anything changed
    /// (or, for `Save`, if the write succeeded).
    pub fn apply<S: BlobStore>(self, store: &mut EditorStore<S>) -> bool {
        match self {
            ShortcutAction::AddNode(kind) => {
                store.add_node(kind);
                true
            }
            ShortcutAction::Save => store.save_now(),
            ShortcutAction::DeleteSelected => match store.selected_id().cloned() {
                Some(id) => store.delete_node(&id),
                None => false,
            },
            ShortcutAction::DuplicateSelected => match store.selected_id().cloned() {
                Some(id) => store.duplicate_node(&id).is_some(),
                None => false,
            },
            ShortcutAction::MoveSelectedUp => match store.selected_id().cloned() {
                Some(id) => store.move_node(&id, MoveDirection::Up),
                None => false,
            },
            ShortcutAction::MoveSelectedDown => match store.selected_id().cloned() {
                Some(id) => store.move_node(&id, MoveDirection::Down),
                None => false,
            },
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub alt: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, command: bool, alt: bool, description: &'static str) -> Self {
        Self {
            key,
            command,
            alt,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl/Cmd+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl/Cmd");
        }
        if self.alt {
            parts.push("Alt");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// The default binding table.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Map a key press to a command.
    ///
    /// Nothing resolves while a text control has focus. The single-letter
    /// insert bindings also ignore auto-repeat and any modifier other than
    /// shift.
    pub fn resolve(key: Key, modifiers: Modifiers, repeat: bool, focus: FocusTarget) -> Option<ShortcutAction> {
        if focus.is_text_editing() {
            return None;
        }
        let command = modifiers.command();
        match key {
            Key::Character(c) if command && !modifiers.alt => match c.to_ascii_lowercase() {
                's' => Some(ShortcutAction::Save),
                'd' => Some(ShortcutAction::DuplicateSelected),
                _ => None,
            },
            Key::Character(c) if !command && !modifiers.alt && !repeat => {
                match c.to_ascii_lowercase() {
                    't' => Some(ShortcutAction::AddNode(NodeKind::Text)),
                    'b' => Some(ShortcutAction::AddNode(NodeKind::Button)),
                    _ => None,
                }
            }
            Key::Delete | Key::Backspace if !command && !modifiers.alt => {
                Some(ShortcutAction::DeleteSelected)
            }
            Key::Arrow(Direction::Up) if modifiers.alt && !command => {
                Some(ShortcutAction::MoveSelectedUp)
            }
            Key::Arrow(Direction::Down) if modifiers.alt && !command => {
                Some(ShortcutAction::MoveSelectedDown)
            }
            _ => None,
        }
    }

    /// All default bindings, for help screens.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("T", false, false, "Add text"),
            Shortcut::new("B", false, false, "Add button"),
            Shortcut::new("S", true, false, "Save"),
            Shortcut::new("D", true, false, "Duplicate selected node"),
            Shortcut::new("Delete", false, false, "Delete selected node"),
            Shortcut::new("Backspace", false, false, "Delete selected node"),
            Shortcut::new("Up", false, true, "Move selected node up"),
            Shortcut::new("Down", false, true, "Move selected node down"),
            Shortcut::new("Arrows", false, false, "Nudge selected node (Shift: 10px)"),
            Shortcut::new("Space+Drag", false, false, "Pan the canvas"),
            Shortcut::new("+", true, false, "Zoom in"),
            Shortcut::new("-", true, false, "Zoom out"),
            Shortcut::new("0", true, false, "Reset zoom"),
        ]
    }
}
