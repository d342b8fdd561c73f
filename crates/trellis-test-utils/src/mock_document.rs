//! In-memory implementation of the host document for testing.
//!
//! Nodes live in a map keyed by [`NodeId`]. Structure, classes, attributes,
//! styles and listener registrations are tracked so tests can assert on what a
//! widget did, and geometry can be set per node to drive clipping and
//! positioning logic.

use parking_lot::Mutex;
use trellis_core::alloc::HashMap;
use trellis_core::geometry::{Rect, Size};
use trellis_core::math::Vec2;
use trellis_core::{
    EventSource, GeometrySource, ListenKind, ListenTarget, ListenerId, NodeId, RenderTarget,
};

/// Records a document operation for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentCall {
    CreateElement { node: NodeId, tag: String },
    Append { parent: NodeId, child: NodeId },
    InsertBefore { parent: NodeId, child: NodeId, reference: NodeId },
    Detach { node: NodeId },
    Remove { node: NodeId },
    Focus { node: NodeId },
    Blur { node: NodeId },
    Listen { listener: ListenerId, target: ListenTarget, kind: ListenKind },
    Unlisten { listener: ListenerId },
}

#[derive(Debug, Clone, Default)]
struct MockNode {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    text: String,
    removed: bool,
    rect: Rect<f32>,
    inner_size: Option<Size<f32>>,
    scroll_size: Option<Size<f32>>,
    scroll_offset: Vec2,
    scrollable: bool,
}

struct State {
    nodes: HashMap<NodeId, MockNode>,
    root: NodeId,
    next_node: u64,
    focused: Option<NodeId>,
    listeners: HashMap<ListenerId, (ListenTarget, ListenKind)>,
    next_listener: u64,
    viewport: Rect<f32>,
}

impl State {
    fn node(&self, id: NodeId) -> Option<&MockNode> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MockNode> {
        self.nodes.get_mut(&id)
    }

    fn unlink(&mut self, child: NodeId) {
        let parent = self.node_mut(child).and_then(|node| node.parent.take());
        if let Some(parent) = parent
            && let Some(parent) = self.node_mut(parent)
        {
            parent.children.retain(|c| *c != child);
        }
    }

    fn is_attached(&self, mut id: NodeId) -> bool {
        loop {
            if id == self.root {
                return true;
            }
            match self.node(id) {
                Some(node) if !node.removed => match node.parent {
                    Some(parent) => id = parent,
                    None => return false,
                },
                _ => return false,
            }
        }
    }

    fn is_displayed(&self, mut id: NodeId) -> bool {
        loop {
            let Some(node) = self.node(id) else {
                return false;
            };
            if node.styles.get("display").map(String::as_str) == Some("none") {
                return false;
            }
            match node.parent {
                Some(parent) => id = parent,
                None => return true,
            }
        }
    }

    fn is_laid_out(&self, id: NodeId) -> bool {
        self.is_attached(id) && self.is_displayed(id)
    }
}

/// Mock implementation of the host document.
///
/// # Example
///
/// ```rust
/// use trellis_core::{GeometrySource, RenderTarget};
/// use trellis_core::geometry::Rect;
/// use trellis_test_utils::MockDocument;
///
/// let document = MockDocument::new();
/// let node = document.create_element("div");
///
/// // Detached nodes report zero geometry
/// document.set_rect(node, Rect::new(0.0, 0.0, 100.0, 20.0));
/// assert_eq!(document.bounding_box(node), Rect::ZERO);
///
/// document.append_child(document.root(), node);
/// assert_eq!(document.bounding_box(node).width, 100.0);
/// ```
pub struct MockDocument {
    /// Recorded calls for verification
    calls: Mutex<Vec<DocumentCall>>,

    /// Node tree, focus and listeners
    state: Mutex<State>,
}

impl MockDocument {
    /// Create a document containing only a root node and a 1024x768 viewport.
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            MockNode {
                tag: "body".to_string(),
                ..Default::default()
            },
        );
        Self {
            calls: Mutex::new(Vec::new()),
            state: Mutex::new(State {
                nodes,
                root,
                next_node: 1,
                focused: None,
                listeners: HashMap::new(),
                next_listener: 1,
                viewport: Rect::new(0.0, 0.0, 1024.0, 768.0),
            }),
        }
    }

    fn record(&self, call: DocumentCall) {
        self.calls.lock().push(call);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<DocumentCall> {
        self.calls.lock().clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Count element creations.
    pub fn count_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DocumentCall::CreateElement { .. }))
            .count()
    }

    /// Count node removals.
    pub fn count_removes(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DocumentCall::Remove { .. }))
            .count()
    }

    // Inspection

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.state.lock().node(node).map(|n| n.tag.clone())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.lock().node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state
            .lock()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.state
            .lock()
            .node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.state
            .lock()
            .node(node)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.state
            .lock()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.state
            .lock()
            .node(node)
            .and_then(|n| n.styles.get(property).cloned())
    }

    pub fn text(&self, node: NodeId) -> String {
        self.state
            .lock()
            .node(node)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.state.lock().is_attached(node)
    }

    /// Whether the node and all of its ancestors are displayed.
    pub fn is_visible(&self, node: NodeId) -> bool {
        self.state.lock().is_displayed(node)
    }

    pub fn is_removed(&self, node: NodeId) -> bool {
        self.state.lock().node(node).is_none_or(|n| n.removed)
    }

    /// Number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Number of live listener registrations of one kind.
    pub fn listener_count_of(&self, kind: ListenKind) -> usize {
        self.state
            .lock()
            .listeners
            .values()
            .filter(|(_, k)| *k == kind)
            .count()
    }

    pub fn has_listener(&self, target: ListenTarget, kind: ListenKind) -> bool {
        self.state
            .lock()
            .listeners
            .values()
            .any(|entry| *entry == (target, kind))
    }

    // Geometry setup

    pub fn set_rect(&self, node: NodeId, rect: Rect<f32>) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.rect = rect;
        }
    }

    pub fn set_inner_size(&self, node: NodeId, size: Size<f32>) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.inner_size = Some(size);
        }
    }

    pub fn set_scroll_size(&self, node: NodeId, size: Size<f32>) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.scroll_size = Some(size);
        }
    }

    pub fn set_scroll_offset(&self, node: NodeId, offset: Vec2) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.scroll_offset = offset;
        }
    }

    /// Mark a node as a scroll container for its descendants.
    pub fn set_scrollable(&self, node: NodeId, scrollable: bool) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.scrollable = scrollable;
        }
    }

    pub fn set_viewport(&self, viewport: Rect<f32>) {
        self.state.lock().viewport = viewport;
    }
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTarget for MockDocument {
    fn create_element(&self, tag: &str) -> NodeId {
        let node = {
            let mut state = self.state.lock();
            let node = NodeId(state.next_node);
            state.next_node += 1;
            state.nodes.insert(
                node,
                MockNode {
                    tag: tag.to_string(),
                    ..Default::default()
                },
            );
            node
        };
        self.record(DocumentCall::CreateElement {
            node,
            tag: tag.to_string(),
        });
        node
    }

    fn root(&self) -> NodeId {
        self.state.lock().root
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.state.lock().node_mut(node)
            && !n.classes.iter().any(|c| c == class)
        {
            n.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.attributes.remove(name);
        }
    }

    fn set_style(&self, node: NodeId, property: &str, value: Option<&str>) {
        if let Some(n) = self.state.lock().node_mut(node) {
            match value {
                Some(value) => {
                    n.styles.insert(property.to_string(), value.to_string());
                }
                None => {
                    n.styles.remove(property);
                }
            }
        }
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(n) = self.state.lock().node_mut(node) {
            n.text = text.to_string();
        }
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        {
            let mut state = self.state.lock();
            state.unlink(child);
            if let Some(p) = state.node_mut(parent) {
                p.children.push(child);
            }
            if let Some(c) = state.node_mut(child) {
                c.parent = Some(parent);
            }
        }
        self.record(DocumentCall::Append { parent, child });
    }

    fn insert_before(&self, parent: NodeId, child: NodeId, reference: NodeId) {
        {
            let mut state = self.state.lock();
            state.unlink(child);
            if let Some(p) = state.node_mut(parent) {
                let index = p
                    .children
                    .iter()
                    .position(|c| *c == reference)
                    .unwrap_or(p.children.len());
                p.children.insert(index, child);
            }
            if let Some(c) = state.node_mut(child) {
                c.parent = Some(parent);
            }
        }
        self.record(DocumentCall::InsertBefore {
            parent,
            child,
            reference,
        });
    }

    fn detach(&self, node: NodeId) {
        self.state.lock().unlink(node);
        self.record(DocumentCall::Detach { node });
    }

    fn remove(&self, node: NodeId) {
        {
            let mut state = self.state.lock();
            state.unlink(node);
            let mut stack = vec![node];
            while let Some(id) = stack.pop() {
                if let Some(n) = state.node_mut(id) {
                    n.removed = true;
                    stack.extend(n.children.iter().copied());
                }
                if state.focused == Some(id) {
                    state.focused = None;
                }
            }
        }
        self.record(DocumentCall::Remove { node });
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let state = self.state.lock();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = state.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn focus(&self, node: NodeId) {
        self.state.lock().focused = Some(node);
        self.record(DocumentCall::Focus { node });
    }

    fn blur(&self, node: NodeId) {
        {
            let mut state = self.state.lock();
            if state.focused == Some(node) {
                state.focused = None;
            }
        }
        self.record(DocumentCall::Blur { node });
    }

    fn focused(&self) -> Option<NodeId> {
        self.state.lock().focused
    }
}

impl GeometrySource for MockDocument {
    fn bounding_box(&self, node: NodeId) -> Rect<f32> {
        let state = self.state.lock();
        match state.node(node) {
            Some(n) if state.is_laid_out(node) => n.rect,
            _ => Rect::ZERO,
        }
    }

    fn inner_size(&self, node: NodeId) -> Size<f32> {
        let state = self.state.lock();
        match state.node(node) {
            Some(n) if state.is_laid_out(node) => n.inner_size.unwrap_or(n.rect.size()),
            _ => Size::ZERO,
        }
    }

    fn scroll_size(&self, node: NodeId) -> Size<f32> {
        let state = self.state.lock();
        match state.node(node) {
            Some(n) if state.is_laid_out(node) => n
                .scroll_size
                .or(n.inner_size)
                .unwrap_or(n.rect.size()),
            _ => Size::ZERO,
        }
    }

    fn scroll_offset(&self, node: NodeId) -> Vec2 {
        self.state
            .lock()
            .node(node)
            .map(|n| n.scroll_offset)
            .unwrap_or(Vec2::ZERO)
    }

    fn scrollable_container(&self, node: NodeId) -> Option<NodeId> {
        let state = self.state.lock();
        let mut current = state.node(node).and_then(|n| n.parent);
        while let Some(id) = current {
            let n = state.node(id)?;
            if n.scrollable {
                return Some(id);
            }
            current = n.parent;
        }
        None
    }

    fn viewport(&self) -> Rect<f32> {
        self.state.lock().viewport
    }
}

impl EventSource for MockDocument {
    fn listen(&self, target: ListenTarget, kind: ListenKind) -> ListenerId {
        let listener = {
            let mut state = self.state.lock();
            let listener = ListenerId(state.next_listener);
            state.next_listener += 1;
            state.listeners.insert(listener, (target, kind));
            listener
        };
        self.record(DocumentCall::Listen {
            listener,
            target,
            kind,
        });
        listener
    }

    fn unlisten(&self, listener: ListenerId) {
        self.state.lock().listeners.remove(&listener);
        self.record(DocumentCall::Unlisten { listener });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_insert_order() {
        let doc = MockDocument::new();
        let parent = doc.create_element("div");
        let a = doc.create_element("span");
        let b = doc.create_element("span");
        let c = doc.create_element("span");

        doc.append_child(parent, a);
        doc.append_child(parent, c);
        doc.insert_before(parent, b, c);
        assert_eq!(doc.children(parent), vec![a, b, c]);

        // Re-appending moves the node
        doc.append_child(parent, a);
        assert_eq!(doc.children(parent), vec![b, c, a]);
    }

    #[test]
    fn test_detached_geometry_is_zero() {
        let doc = MockDocument::new();
        let node = doc.create_element("div");
        doc.set_rect(node, Rect::new(5.0, 5.0, 50.0, 50.0));
        assert_eq!(doc.bounding_box(node), Rect::ZERO);

        doc.append_child(doc.root(), node);
        assert_eq!(doc.bounding_box(node), Rect::new(5.0, 5.0, 50.0, 50.0));

        doc.set_style(node, "display", Some("none"));
        assert_eq!(doc.bounding_box(node), Rect::ZERO);
    }

    #[test]
    fn test_contains_and_scroll_container() {
        let doc = MockDocument::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(doc.root(), outer);
        doc.append_child(outer, inner);
        doc.set_scrollable(outer, true);

        assert!(doc.contains(outer, inner));
        assert!(!doc.contains(inner, outer));
        assert_eq!(doc.scrollable_container(inner), Some(outer));
        assert_eq!(doc.scrollable_container(outer), None);
    }

    #[test]
    fn test_listeners_tracked() {
        let doc = MockDocument::new();
        let id = doc.listen(ListenTarget::Window, ListenKind::Resize);
        assert!(doc.has_listener(ListenTarget::Window, ListenKind::Resize));
        assert_eq!(doc.listener_count(), 1);

        doc.unlisten(id);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_remove_clears_focus() {
        let doc = MockDocument::new();
        let node = doc.create_element("input");
        doc.append_child(doc.root(), node);
        doc.focus(node);
        assert_eq!(doc.focused(), Some(node));

        doc.remove(node);
        assert!(doc.is_removed(node));
        assert_eq!(doc.focused(), None);
    }
}
