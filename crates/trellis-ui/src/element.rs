//! Owned handle to a host node.

use std::fmt;
use std::sync::Arc;

use trellis_core::geometry::Rect;
use trellis_core::{Document, NodeId};

/// A node created by, and exclusively owned by, one widget.
///
/// Dropping an `Element` does not remove the node; call [`destroy`](Self::destroy)
/// when the owning widget is destroyed. Detached elements stay alive and can be
/// re-attached.
pub struct Element {
    document: Arc<dyn Document>,
    node: NodeId,
}

impl Element {
    pub fn new(document: Arc<dyn Document>, tag: &str) -> Self {
        let node = document.create_element(tag);
        Self { document, node }
    }

    /// Create an element and give it a class in one step.
    pub fn with_class(document: Arc<dyn Document>, tag: &str, class: &str) -> Self {
        let element = Self::new(document, tag);
        element.add_class(class);
        element
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    pub fn add_class(&self, class: &str) {
        self.document.add_class(self.node, class);
    }

    pub fn remove_class(&self, class: &str) {
        self.document.remove_class(self.node, class);
    }

    /// Add or remove `class` depending on `on`.
    pub fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.document.set_attribute(self.node, name, value);
    }

    pub fn remove_attribute(&self, name: &str) {
        self.document.remove_attribute(self.node, name);
    }

    pub fn set_style(&self, property: &str, value: Option<&str>) {
        self.document.set_style(self.node, property, value);
    }

    pub fn set_text(&self, text: &str) {
        self.document.set_text(self.node, text);
    }

    pub fn append(&self, child: &Element) {
        self.document.append_child(self.node, child.node);
    }

    pub fn append_node(&self, child: NodeId) {
        self.document.append_child(self.node, child);
    }

    pub fn show(&self) {
        self.set_style("display", None);
    }

    pub fn hide(&self) {
        self.set_style("display", Some("none"));
    }

    pub fn toggle(&self, visible: bool) {
        if visible {
            self.show();
        } else {
            self.hide();
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.document.contains(self.node, node)
    }

    pub fn bounding_box(&self) -> Rect<f32> {
        self.document.bounding_box(self.node)
    }

    pub fn focus(&self) {
        self.document.focus(self.node);
    }

    pub fn is_focused(&self) -> bool {
        self.document.focused() == Some(self.node)
    }

    pub fn detach(&self) {
        self.document.detach(self.node);
    }

    /// Remove the node from the document.
    pub fn destroy(self) {
        self.document.remove(self.node);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.node).finish()
    }
}
