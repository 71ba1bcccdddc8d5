//! Reordering nodes by dragging rows in the layer list.
//!
//! The list shows nodes in document order. While a row is dragged, the row
//! under the pointer says whether the drop lands before or after it; that
//! visual slot is translated into the index `reorder_node` expects.

use crate::node::NodeId;
use crate::storage::BlobStore;
use crate::store::EditorStore;
use kurbo::Rect;

/// Which half of the hovered row the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

/// Upper half of the row drops before it, lower half after.
pub fn drop_position(pointer_y: f64, row: Rect) -> DropPosition {
    if pointer_y < row.center().y {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}

/// Slot between rows where the dragged row would land, counted in the list
/// as it looks before the drop.
pub fn visual_insertion_index(hover_index: usize, position: DropPosition) -> usize {
    match position {
        DropPosition::Before => hover_index,
        DropPosition::After => hover_index + 1,
    }
}

/// Convert a visual slot into the target index after the dragged row has
/// been removed from its old place.
pub fn reorder_target_index(from: usize, visual_index: usize) -> usize {
    if from < visual_index {
        visual_index - 1
    } else {
        visual_index
    }
}

/// Where the drop indicator should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIndicator {
    pub hover_index: usize,
    pub position: DropPosition,
}

/// State of a drag in the layer list.
#[derive(Debug, Clone, Default)]
pub struct ListDrag {
    dragging: Option<NodeId>,
    indicator: Option<DropIndicator>,
}

impl ListDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, id: NodeId) {
        self.dragging = Some(id);
        self.indicator = None;
    }

    pub fn dragging(&self) -> Option<&NodeId> {
        self.dragging.as_ref()
    }

    pub fn indicator(&self) -> Option<DropIndicator> {
        self.indicator
    }

    /// The pointer moved over row `hover_index`, laid out at `row`.
    pub fn hover(&mut self, hover_index: usize, pointer_y: f64, row: Rect) {
        if self.dragging.is_none() {
            return;
        }
        self.indicator = Some(DropIndicator {
            hover_index,
            position: drop_position(pointer_y, row),
        });
    }

    pub fn cancel(&mut self) {
        self.dragging = None;
        self.indicator = None;
    }

    /// Finish the drag, reordering the store. Returns true if the order
    /// changed. The drag state is cleared either way.
    pub fn drop<S: BlobStore>(&mut self, store: &mut EditorStore<S>) -> bool {
        let dragging = self.dragging.take();
        let indicator = self.indicator.take();
        let (Some(id), Some(indicator)) = (dragging, indicator) else {
            return false;
        };
        let Some(from) = store.index_of(&id) else {
            return false;
        };
        let visual = visual_insertion_index(indicator.hover_index, indicator.position);
        store.reorder_node(&id, reorder_target_index(from, visual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::document::Document;
    use crate::node::{Node, NodeKind, NodeProps};
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn row(index: usize) -> Rect {
        let top = index as f64 * 32.0;
        Rect::new(0.0, top, 240.0, top + 32.0)
    }

    fn abc_store() -> EditorStore<MemoryStorage> {
        let nodes = ["a", "b", "c"]
            .into_iter()
            .map(|id| Node::new(NodeId::from(id), id, NodeProps::placed(NodeKind::Text, 0, 24.0)))
            .collect();
        let doc = Document::with_id("d", "t", nodes);
        EditorStore::with_document(Arc::new(MemoryStorage::new()), EditorConfig::default(), doc)
    }

    fn order(store: &EditorStore<MemoryStorage>) -> Vec<&str> {
        store.document().nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_drop_position_midpoint() {
        assert_eq!(drop_position(10.0, row(0)), DropPosition::Before);
        assert_eq!(drop_position(16.0, row(0)), DropPosition::After);
        assert_eq!(drop_position(60.0, row(1)), DropPosition::After);
    }

    #[test]
    fn test_target_index_accounts_for_removal() {
        assert_eq!(reorder_target_index(0, 3), 2);
        assert_eq!(reorder_target_index(2, 0), 0);
        assert_eq!(reorder_target_index(1, 1), 1);
        assert_eq!(reorder_target_index(0, 1), 0);
    }

    #[test]
    fn test_drag_first_below_last() {
        let mut store = abc_store();
        let mut drag = ListDrag::new();
        drag.begin(NodeId::from("a"));
        drag.hover(2, 90.0, row(2));
        assert_eq!(
            drag.indicator(),
            Some(DropIndicator {
                hover_index: 2,
                position: DropPosition::After
            })
        );
        assert!(drag.drop(&mut store));
        assert_eq!(order(&store), vec!["b", "c", "a"]);
        assert!(drag.dragging().is_none());
    }

    #[test]
    fn test_drag_last_above_first() {
        let mut store = abc_store();
        let mut drag = ListDrag::new();
        drag.begin(NodeId::from("c"));
        drag.hover(0, 4.0, row(0));
        assert!(drag.drop(&mut store));
        assert_eq!(order(&store), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_drop_in_place_is_no_op() {
        let mut store = abc_store();
        let mut drag = ListDrag::new();
        drag.begin(NodeId::from("a"));
        drag.hover(1, 33.0, row(1));
        assert!(!drag.drop(&mut store));
        assert_eq!(order(&store), vec!["a", "b", "c"]);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_cancel_and_missing_hover() {
        let mut store = abc_store();
        let mut drag = ListDrag::new();
        drag.hover(0, 0.0, row(0));
        assert!(drag.indicator().is_none());

        drag.begin(NodeId::from("b"));
        assert!(!drag.drop(&mut store));

        drag.begin(NodeId::from("b"));
        drag.hover(0, 0.0, row(0));
        drag.cancel();
        assert!(!drag.drop(&mut store));
        assert_eq!(order(&store), vec!["a", "b", "c"]);
    }
}
