//! The document store: the single mutable source of truth for the editor.
//!
//! Every mutation goes through [`EditorStore`]. Operations addressing a node
//! that no longer exists are no-ops and report that through their return
//! value; none of them fail.

use crate::codec;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::node::{Node, NodeId, NodeKind, NodeProps, PropsPatch};
use crate::storage::BlobStore;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Direction for moving a node one step through the layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards index 0 (further back).
    Up,
    /// Towards the end of the list (further front).
    Down,
}

/// Notification sent to subscribers after an effective change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    DocumentChanged,
    SelectionChanged,
    Saved,
    SaveFailed,
}

type Listener = Rc<RefCell<dyn FnMut(&StoreEvent)>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`EditorStore::subscribe`].
///
/// The listener stays registered for as long as the handle is alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Owns the document, the selection and the last-saved baseline.
pub struct EditorStore<S: BlobStore> {
    doc: Document,
    selected_id: Option<NodeId>,
    last_saved: String,
    storage: Arc<S>,
    config: EditorConfig,
    listeners: Rc<RefCell<Listeners>>,
}

impl<S: BlobStore> EditorStore<S> {
    /// Load the saved document from `storage`, falling back to the sample
    /// document when nothing usable is stored.
    pub fn open(storage: Arc<S>, config: EditorConfig) -> Self {
        let doc = match storage.get(&config.storage_key) {
            Ok(Some(blob)) => match codec::deserialize(&blob) {
                Ok(doc) => {
                    log::info!("Loaded document {} ({} nodes)", doc.id, doc.nodes.len());
                    doc
                }
                Err(e) => {
                    log::warn!("Saved document unreadable, using sample: {}", e);
                    Document::sample()
                }
            },
            Ok(None) => {
                log::info!("No saved document, starting from sample");
                Document::sample()
            }
            Err(e) => {
                log::warn!("Failed to read saved document, using sample: {}", e);
                Document::sample()
            }
        };
        Self::with_document(storage, config, doc)
    }

    /// Start from an explicit document, treating it as saved.
    pub fn with_document(storage: Arc<S>, config: EditorConfig, doc: Document) -> Self {
        let mut store = Self {
            doc,
            selected_id: None,
            last_saved: String::new(),
            storage,
            config,
            listeners: Rc::new(RefCell::new(Listeners::default())),
        };
        store.last_saved = store.compute_serialized();
        store
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn selected_id(&self) -> Option<&NodeId> {
        self.selected_id.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected_id.as_ref().and_then(|id| self.doc.node(id))
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.doc.node(id)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.doc.index_of(id)
    }

    /// Serialization recorded by the last successful save (or load).
    pub fn last_saved(&self) -> &str {
        &self.last_saved
    }

    /// Canonical serialization of the current document.
    pub fn compute_serialized(&self) -> String {
        codec::serialize(&self.doc).unwrap_or_else(|e| {
            log::error!("Failed to serialize document: {}", e);
            String::new()
        })
    }

    /// True when the document differs from what was last saved.
    pub fn is_dirty(&self) -> bool {
        self.compute_serialized() != self.last_saved
    }

    /// Register a listener for store events.
    pub fn subscribe(&self, listener: impl FnMut(&StoreEvent) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        listeners.entries.push((id, listener));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    fn emit(&self, event: StoreEvent) {
        // Snapshot first so listeners may drop subscriptions while running.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (&mut *listener)(&event);
            }
        }
    }

    /// Select a node, or clear the selection with `None`.
    ///
    /// Ids that are not in the document are ignored.
    pub fn select(&mut self, id: Option<&NodeId>) -> bool {
        let next = match id {
            None => None,
            Some(id) if self.doc.contains(id) => Some(id.clone()),
            Some(id) => {
                log::debug!("Ignoring selection of unknown node {}", id);
                return false;
            }
        };
        if self.selected_id == next {
            return false;
        }
        self.selected_id = next;
        self.emit(StoreEvent::SelectionChanged);
        true
    }

    /// Append a node of `kind` with default props and select it.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let existing = self.doc.count_of_kind(kind);
        let id = self.fresh_id(kind);
        let name = format!("{} {}", kind.label(), existing + 1);
        let props = NodeProps::placed(kind, existing, self.config.stagger_step);
        self.doc.nodes.push(Node::new(id.clone(), name, props));
        self.selected_id = Some(id.clone());
        self.emit(StoreEvent::DocumentChanged);
        self.emit(StoreEvent::SelectionChanged);
        id
    }

    fn fresh_id(&self, kind: NodeKind) -> NodeId {
        loop {
            let id = NodeId::generate(kind);
            if !self.doc.contains(&id) {
                return id;
            }
        }
    }

    pub fn update_node_name(&mut self, id: &NodeId, name: impl Into<String>) -> bool {
        let name = name.into();
        let Some(node) = self.doc.node_mut(id) else {
            return false;
        };
        if node.name == name {
            return false;
        }
        node.name = name;
        self.emit(StoreEvent::DocumentChanged);
        true
    }

    /// Merge `patch` into the node's props. Sizes are clamped to the
    /// kind's minimum; keys foreign to the kind are ignored.
    pub fn update_node_props(&mut self, id: &NodeId, patch: &PropsPatch) -> bool {
        let Some(node) = self.doc.node_mut(id) else {
            return false;
        };
        let min = node.kind().min_size();
        if !patch.apply(&mut node.props, min) {
            return false;
        }
        self.emit(StoreEvent::DocumentChanged);
        true
    }

    /// Remove a node. If it was selected, the selection moves to the node
    /// that took its place, else the one before it, else nothing.
    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        let Some(index) = self.doc.index_of(id) else {
            return false;
        };
        self.doc.nodes.remove(index);

        let was_selected = self.selected_id.as_ref() == Some(id);
        if was_selected {
            self.selected_id = self
                .doc
                .nodes
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|i| self.doc.nodes.get(i)))
                .map(|n| n.id.clone());
        }
        self.emit(StoreEvent::DocumentChanged);
        if was_selected {
            self.emit(StoreEvent::SelectionChanged);
        }
        true
    }

    /// Insert an offset copy of a node right after it and select the copy.
    pub fn duplicate_node(&mut self, id: &NodeId) -> Option<NodeId> {
        let index = self.doc.index_of(id)?;
        let source = &self.doc.nodes[index];
        let new_id = self.fresh_id(source.kind());
        let name = format!("{} Copy", source.name);
        let mut props = source.props.clone();

        let offset = self.config.duplicate_offset;
        let layout = props.layout_mut();
        layout.x = Some(layout.x.unwrap_or(0.0) + offset);
        layout.y = Some(layout.y.unwrap_or(0.0) + offset);

        self.doc
            .nodes
            .insert(index + 1, Node::new(new_id.clone(), name, props));
        self.selected_id = Some(new_id.clone());
        self.emit(StoreEvent::DocumentChanged);
        self.emit(StoreEvent::SelectionChanged);
        Some(new_id)
    }

    /// Swap a node with its neighbour. No-op at either end of the list.
    pub fn move_node(&mut self, id: &NodeId, direction: MoveDirection) -> bool {
        let Some(index) = self.doc.index_of(id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.doc.nodes.len() => index + 1,
            _ => return false,
        };
        self.doc.nodes.swap(index, target);
        self.emit(StoreEvent::DocumentChanged);
        true
    }

    /// Move a node to `to_index`, clamped to the valid range.
    pub fn reorder_node(&mut self, id: &NodeId, to_index: usize) -> bool {
        let Some(from) = self.doc.index_of(id) else {
            return false;
        };
        let target = to_index.min(self.doc.nodes.len() - 1);
        if target == from {
            return false;
        }
        let node = self.doc.nodes.remove(from);
        self.doc.nodes.insert(target, node);
        self.emit(StoreEvent::DocumentChanged);
        true
    }

    /// Shift a node by `(dx, dy)` document pixels.
    pub fn nudge_node(&mut self, id: &NodeId, dx: f64, dy: f64) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        let Some(origin) = self.doc.node(id).and_then(|n| n.layout().origin()) else {
            return false;
        };
        self.update_node_props(id, &PropsPatch::position(origin.x + dx, origin.y + dy))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if self.doc.title == title {
            return false;
        }
        self.doc.title = title;
        self.emit(StoreEvent::DocumentChanged);
        true
    }

    /// Write the current serialization to the blob store.
    ///
    /// On failure the baseline is left untouched, so the document stays
    /// dirty and the next save attempt retries naturally.
    pub fn save_now(&mut self) -> bool {
        let serialized = self.compute_serialized();
        match self.storage.set(&self.config.storage_key, &serialized) {
            Ok(()) => {
                log::info!("Saved document {} ({} bytes)", self.doc.id, serialized.len());
                self.last_saved = serialized;
                self.emit(StoreEvent::Saved);
                true
            }
            Err(e) => {
                log::warn!("Failed to save document {}: {}", self.doc.id, e);
                self.emit(StoreEvent::SaveFailed);
                false
            }
        }
    }
}
