//! Capabilities the host environment provides to the widget framework.
//!
//! Widgets never touch a concrete renderer. They talk to an `Arc<dyn Document>`
//! that combines three capabilities:
//!
//! - [`RenderTarget`]: create nodes, edit classes/attributes/styles, attach and detach
//! - [`GeometrySource`]: bounding boxes, scroll metrics and the viewport
//! - [`EventSource`]: register interest in input that the host will deliver
//!
//! All methods take `&self`; implementations use interior mutability so a single
//! document can be shared by every widget of a UI.
//!
//! # Example
//!
//! ```ignore
//! let node = document.create_element("div");
//! document.add_class(node, "trellis-menu");
//! document.append_child(document.root(), node);
//! let listener = document.listen(ListenTarget::Window, ListenKind::Resize);
//! // ...
//! document.unlisten(listener);
//! ```

use crate::geometry::{Rect, Size};
use crate::math::Vec2;

/// Handle to a node owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle to a listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Kind of input a widget asks the host to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenKind {
    PointerDown,
    PointerUp,
    PointerMove,
    KeyDown,
    Scroll,
    Resize,
    /// One-time content load of an isolated frame.
    Load,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    Node(NodeId),
    /// The whole document, typically used for capture-phase pointer input.
    Document,
    /// The top-level window (resize, global key input).
    Window,
}

/// Node creation and mutation.
pub trait RenderTarget {
    /// Create a detached node.
    fn create_element(&self, tag: &str) -> NodeId;

    /// The body node new top-level content attaches to.
    fn root(&self) -> NodeId;

    fn add_class(&self, node: NodeId, class: &str);
    fn remove_class(&self, node: NodeId, class: &str);
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&self, node: NodeId, name: &str);

    /// Set an inline style property, or clear it with `None`.
    fn set_style(&self, node: NodeId, property: &str, value: Option<&str>);

    /// Replace the node's text content.
    fn set_text(&self, node: NodeId, text: &str);

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Insert `child` into `parent` directly before `reference`.
    fn insert_before(&self, parent: NodeId, child: NodeId, reference: NodeId);

    /// Remove the node from its parent but keep it alive for reuse.
    fn detach(&self, node: NodeId);

    /// Destroy the node and its subtree.
    fn remove(&self, node: NodeId);

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    fn focus(&self, node: NodeId);
    fn blur(&self, node: NodeId);
    fn focused(&self) -> Option<NodeId>;
}

/// Box geometry queries.
///
/// Detached or hidden nodes report zero-sized results instead of failing.
pub trait GeometrySource {
    /// Border box in document coordinates.
    fn bounding_box(&self, node: NodeId) -> Rect<f32>;

    /// Visible content size, excluding scrollbars.
    fn inner_size(&self, node: NodeId) -> Size<f32>;

    /// Natural size of the node's content, including overflow.
    fn scroll_size(&self, node: NodeId) -> Size<f32>;

    /// Current scroll position of the node.
    fn scroll_offset(&self, node: NodeId) -> Vec2;

    /// Closest ancestor that scrolls its overflow, if any.
    fn scrollable_container(&self, node: NodeId) -> Option<NodeId>;

    /// Visible window area; `x`/`y` are the window's scroll position.
    fn viewport(&self) -> Rect<f32>;
}

/// Input subscription.
///
/// The host routes delivered input to the widget that registered interest.
pub trait EventSource {
    fn listen(&self, target: ListenTarget, kind: ListenKind) -> ListenerId;
    fn unlisten(&self, listener: ListenerId);
}

/// A complete host document.
pub trait Document: RenderTarget + GeometrySource + EventSource + Send + Sync {}

impl<T> Document for T where T: RenderTarget + GeometrySource + EventSource + Send + Sync {}
