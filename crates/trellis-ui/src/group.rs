//! Ordered container of child widgets.
//!
//! A [`Group`] owns a logical sequence of items and keeps their nodes attached
//! to one container node in the same order. Item identity is the item's root
//! node: adding an item whose node is already present moves it instead of
//! duplicating it.
//!
//! # Example
//!
//! ```ignore
//! let mut group = Group::new(&ctx, container.node());
//! group.add_items(vec![a, b], None);  // [a, b]
//! group.add_items(vec![c], Some(0));  // [c, a, b]
//! let removed = group.remove_items(&[a_node]); // [c, b], `a` handed back for reuse
//! ```

use std::sync::Arc;

use trellis_core::alloc::HashSet;
use trellis_core::{Document, NodeId};

use crate::context::UiContext;

/// An item that can live in a [`Group`].
pub trait GroupItem {
    /// Root node of the item; doubles as its identity.
    fn node(&self) -> NodeId;
}

/// Ordered, indexed collection of items attached under one container node.
pub struct Group<T: GroupItem> {
    document: Arc<dyn Document>,
    container: NodeId,
    items: Vec<T>,
    /// Attached nodes, always in the same order as `items`.
    nodes: Vec<NodeId>,
}

impl<T: GroupItem> Group<T> {
    pub fn new(ctx: &UiContext, container: NodeId) -> Self {
        Self {
            document: ctx.document().clone(),
            container,
            items: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Nodes of the items in display order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| *n == node)
    }

    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.position(node).map(|i| &self.items[i])
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.position(node).map(move |i| &mut self.items[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Insert `items` at `index`, appending when `index` is `None` or past the end.
    ///
    /// An item already in the group is moved: its old slot is dropped first and,
    /// if that slot preceded `index`, the index shifts down by one. A node
    /// repeated within `items` is inserted once, at its first occurrence.
    pub fn add_items(&mut self, items: Vec<T>, index: Option<usize>) {
        let mut index = index;
        let mut seen = HashSet::default();
        let items: Vec<T> = items.into_iter().filter(|item| seen.insert(item.node())).collect();

        for item in &items {
            let node = item.node();
            if let Some(pos) = self.position(node) {
                self.items.remove(pos);
                self.nodes.remove(pos);
                self.document.detach(node);
                if let Some(i) = index.as_mut()
                    && pos < *i
                {
                    *i -= 1;
                }
            }
        }

        let at = match index {
            Some(i) if i < self.items.len() => i,
            _ => self.items.len(),
        };

        match self.nodes.get(at).copied() {
            Some(reference) => {
                for item in &items {
                    self.document
                        .insert_before(self.container, item.node(), reference);
                }
            }
            None => {
                for item in &items {
                    self.document.append_child(self.container, item.node());
                }
            }
        }

        let nodes: Vec<NodeId> = items.iter().map(GroupItem::node).collect();
        self.nodes.splice(at..at, nodes);
        self.items.splice(at..at, items);
    }

    /// Detach the items with the given nodes and hand them back.
    pub fn remove_items(&mut self, nodes: &[NodeId]) -> Vec<T> {
        let mut removed = Vec::new();
        for node in nodes {
            if let Some(pos) = self.position(*node) {
                self.nodes.remove(pos);
                self.document.detach(*node);
                removed.push(self.items.remove(pos));
            }
        }
        removed
    }

    /// Detach every item and hand them back in order.
    pub fn clear_items(&mut self) -> Vec<T> {
        for node in self.nodes.drain(..) {
            self.document.detach(node);
        }
        std::mem::take(&mut self.items)
    }
}

impl<'a, T: GroupItem> IntoIterator for &'a Group<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: GroupItem> std::fmt::Debug for Group<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("container", &self.container)
            .field("nodes", &self.nodes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::RenderTarget;
    use trellis_test_utils::MockDocument;

    #[derive(Debug)]
    struct Item {
        node: NodeId,
        name: &'static str,
    }

    impl GroupItem for Item {
        fn node(&self) -> NodeId {
            self.node
        }
    }

    fn setup() -> (Arc<MockDocument>, Group<Item>) {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        let container = doc.create_element("div");
        (doc, Group::new(&ctx, container))
    }

    fn item(doc: &MockDocument, name: &'static str) -> Item {
        Item {
            node: doc.create_element("div"),
            name,
        }
    }

    fn names(group: &Group<Item>) -> Vec<&'static str> {
        group.iter().map(|i| i.name).collect()
    }

    fn assert_in_sync(doc: &MockDocument, group: &Group<Item>) {
        let logical: Vec<NodeId> = group.iter().map(|i| i.node).collect();
        assert_eq!(group.nodes(), logical.as_slice());
        assert_eq!(doc.children(group.container()), logical);
    }

    #[test]
    fn test_append_and_insert() {
        let (doc, mut group) = setup();
        let a = item(&doc, "a");
        let b = item(&doc, "b");
        let c = item(&doc, "c");
        let d = item(&doc, "d");

        group.add_items(vec![a, b], None);
        group.add_items(vec![c], Some(0));
        group.add_items(vec![d], Some(2));

        assert_eq!(names(&group), vec!["c", "a", "d", "b"]);
        assert_in_sync(&doc, &group);
    }

    #[test]
    fn test_index_past_end_appends() {
        let (doc, mut group) = setup();
        let a = item(&doc, "a");
        let b = item(&doc, "b");
        group.add_items(vec![a], None);
        group.add_items(vec![b], Some(10));

        assert_eq!(names(&group), vec!["a", "b"]);
        assert_in_sync(&doc, &group);
    }

    #[test]
    fn test_re_adding_moves_item() {
        let (doc, mut group) = setup();
        let a = item(&doc, "a");
        let b = item(&doc, "b");
        let c = item(&doc, "c");
        let a_node = a.node;
        group.add_items(vec![a, b, c], None);

        // Same identity handed back in: "a" moves to just before "c".
        group.add_items(vec![Item { node: a_node, name: "a" }], Some(2));

        assert_eq!(names(&group), vec!["b", "a", "c"]);
        assert_eq!(group.len(), 3);
        assert_in_sync(&doc, &group);
    }

    #[test]
    fn test_remove_detaches_without_destroying() {
        let (doc, mut group) = setup();
        let a = item(&doc, "a");
        let b = item(&doc, "b");
        let b_node = b.node;
        group.add_items(vec![a, b], None);

        let removed = group.remove_items(&[b_node]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "b");
        assert!(!doc.is_removed(b_node));
        assert_eq!(doc.parent(b_node), None);
        assert_in_sync(&doc, &group);

        // Reuse the detached item
        group.add_items(removed, Some(0));
        assert_eq!(names(&group), vec!["b", "a"]);
        assert_in_sync(&doc, &group);
    }

    #[test]
    fn test_clear_items() {
        let (doc, mut group) = setup();
        let a = item(&doc, "a");
        let b = item(&doc, "b");
        group.add_items(vec![a, b], None);

        let cleared = group.clear_items();
        assert_eq!(cleared.len(), 2);
        assert!(group.is_empty());
        assert_in_sync(&doc, &group);
    }

    #[test]
    fn test_repeated_node_in_batch_added_once() {
        let (doc, mut group) = setup();
        let a = item(&doc, "a");
        let b = item(&doc, "b");
        let a_node = a.node;

        group.add_items(vec![a, b, Item { node: a_node, name: "again" }], None);

        assert_eq!(names(&group), vec!["a", "b"]);
        assert_in_sync(&doc, &group);
    }

    #[test]
    fn test_mixed_sequence_stays_in_sync() {
        let (doc, mut group) = setup();
        let items: Vec<Item> = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|n| item(&doc, n))
            .collect();
        let nodes: Vec<NodeId> = items.iter().map(|i| i.node).collect();
        group.add_items(items, None);

        let removed = group.remove_items(&[nodes[1], nodes[3]]);
        assert_in_sync(&doc, &group);
        group.add_items(removed, Some(1));
        assert_in_sync(&doc, &group);
        group.add_items(vec![Item { node: nodes[4], name: "e" }], Some(0));
        assert_in_sync(&doc, &group);

        assert_eq!(names(&group), vec!["e", "a", "b", "d", "c"]);
    }
}
