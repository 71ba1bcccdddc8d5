//! Builder Mini Core Library
//!
//! Platform-agnostic document store and canvas interaction engine for the
//! Builder Mini page builder. Rendering and inspector UI live in the host.

pub mod canvas;
pub mod codec;
pub mod config;
pub mod document;
pub mod gesture;
pub mod input;
pub mod list_drag;
pub mod node;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod store;
pub mod viewport;

pub use canvas::CanvasEngine;
pub use codec::{CodecError, deserialize, serialize, stable_stringify};
pub use config::{ConfigError, EditorConfig};
pub use document::{DOCUMENT_VERSION, Document};
pub use gesture::Gesture;
pub use input::{CaptureGuard, CursorStyle, Direction, FocusTarget, Key, Modifiers, PointerCapture};
pub use list_drag::{DropPosition, ListDrag};
pub use node::{Layout, Node, NodeId, NodeKind, NodeProps, PropsPatch};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use snap::{Guides, SnapMode, snap_to_grid, GRID_SIZE};
pub use storage::{AutoSaveManager, BlobStore, MemoryStorage, StorageError, StorageResult};
pub use store::{EditorStore, MoveDirection, StoreEvent, Subscription};
pub use viewport::Viewport;
