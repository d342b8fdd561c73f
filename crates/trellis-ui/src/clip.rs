//! Clipping an element to the visible area of its scroll container.
//!
//! A [`Clippable`] constrains one node so it never extends past the far edge
//! of its closest scrollable ancestor (or the viewport when there is none),
//! minus a fixed margin. Axes whose natural size fits are left unconstrained.
//!
//! While clipping is enabled the clippable holds scroll and resize listeners;
//! the host forwards those events to [`Clippable::clip`]. Disabling removes the
//! listeners and every constraint.

use std::sync::Arc;

use bitflags::bitflags;
use trellis_core::geometry::{Rect, Size};
use trellis_core::math::Vec2;
use trellis_core::{Document, ListenKind, ListenTarget, ListenerId, NodeId};

use crate::context::UiContext;

bitflags! {
    /// Axes currently constrained by clipping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClipAxes: u8 {
        const WIDTH = 1 << 0;
        const HEIGHT = 1 << 1;
    }
}

/// Geometry inputs of one clip evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipGeometry {
    /// Box of the clipped node.
    pub clippable: Rect<f32>,
    /// Document offset of the scroll container.
    pub container_origin: Vec2,
    /// Visible size of the scroll container.
    pub container_inner: Size<f32>,
    /// Scroll position of the scroll container.
    pub scroll: Vec2,
    /// Natural (unclipped) size of the clipped node's content.
    pub natural: Size<f32>,
}

/// Outcome of one clip evaluation: the constrained size per axis, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipResult {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl ClipResult {
    pub fn axes(&self) -> ClipAxes {
        let mut axes = ClipAxes::empty();
        axes.set(ClipAxes::WIDTH, self.width.is_some());
        axes.set(ClipAxes::HEIGHT, self.height.is_some());
        axes
    }
}

/// Compute the size the clipped node may occupy.
///
/// Desired size per axis is `(container_far - margin) - clippable_near`; an axis
/// is constrained only when that is smaller than the natural size.
pub fn compute_clip(geometry: &ClipGeometry, margin: f32) -> ClipResult {
    let far_x = geometry.container_origin.x + geometry.scroll.x + geometry.container_inner.width;
    let far_y = geometry.container_origin.y + geometry.scroll.y + geometry.container_inner.height;
    let desired_width = (far_x - margin) - geometry.clippable.x;
    let desired_height = (far_y - margin) - geometry.clippable.y;

    ClipResult {
        width: (desired_width < geometry.natural.width).then_some(desired_width.max(0.0)),
        height: (desired_height < geometry.natural.height).then_some(desired_height.max(0.0)),
    }
}

/// Clipping state attached to one node.
pub struct Clippable {
    document: Arc<dyn Document>,
    node: NodeId,
    margin: f32,
    clipping: bool,
    clipped: ClipAxes,
    container: Option<NodeId>,
    listeners: Vec<ListenerId>,
}

impl Clippable {
    pub fn new(ctx: &UiContext, node: NodeId) -> Self {
        Self {
            document: ctx.document().clone(),
            node,
            margin: ctx.config().clip_margin,
            clipping: false,
            clipped: ClipAxes::empty(),
            container: None,
            listeners: Vec::new(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_clipping(&self) -> bool {
        self.clipping
    }

    /// Whether any axis is currently constrained.
    pub fn is_clipped(&self) -> bool {
        !self.clipped.is_empty()
    }

    pub fn clipped_axes(&self) -> ClipAxes {
        self.clipped
    }

    /// Scroll container found when clipping was enabled; `None` means the viewport.
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Start or stop clipping.
    pub fn set_clipping(&mut self, clipping: bool) {
        if self.clipping == clipping {
            return;
        }
        self.clipping = clipping;

        if clipping {
            self.container = self.document.scrollable_container(self.node);
            let scroll_target = match self.container {
                Some(node) => ListenTarget::Node(node),
                None => ListenTarget::Window,
            };
            self.listeners.push(self.document.listen(scroll_target, ListenKind::Scroll));
            self.listeners
                .push(self.document.listen(ListenTarget::Window, ListenKind::Resize));
            self.clip();
        } else {
            for listener in self.listeners.drain(..) {
                self.document.unlisten(listener);
            }
            self.container = None;
            self.apply(ClipResult::default());
        }
    }

    /// Re-evaluate constraints; call on container scroll and viewport resize.
    pub fn clip(&mut self) -> ClipAxes {
        if !self.clipping {
            return self.clipped;
        }
        let geometry = self.measure();
        let result = compute_clip(&geometry, self.margin);
        self.apply(result);
        self.clipped
    }

    fn measure(&self) -> ClipGeometry {
        let doc = &self.document;
        let (container_origin, container_inner, scroll) = match self.container {
            Some(container) => (
                doc.bounding_box(container).origin(),
                doc.inner_size(container),
                doc.scroll_offset(container),
            ),
            None => {
                let viewport = doc.viewport();
                (Vec2::ZERO, viewport.size(), viewport.origin())
            }
        };
        ClipGeometry {
            clippable: doc.bounding_box(self.node),
            container_origin,
            container_inner,
            scroll,
            natural: doc.scroll_size(self.node),
        }
    }

    fn apply(&mut self, result: ClipResult) {
        let doc = &self.document;
        match result.width {
            Some(width) => {
                doc.set_style(self.node, "overflow-x", Some("auto"));
                doc.set_style(self.node, "width", Some(&format!("{}px", width)));
            }
            None => {
                doc.set_style(self.node, "overflow-x", None);
                doc.set_style(self.node, "width", None);
            }
        }
        match result.height {
            Some(height) => {
                doc.set_style(self.node, "overflow-y", Some("auto"));
                doc.set_style(self.node, "height", Some(&format!("{}px", height)));
            }
            None => {
                doc.set_style(self.node, "overflow-y", None);
                doc.set_style(self.node, "height", None);
            }
        }
        self.clipped = result.axes();
    }
}

impl std::fmt::Debug for Clippable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clippable")
            .field("node", &self.node)
            .field("clipping", &self.clipping)
            .field("clipped", &self.clipped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::RenderTarget;
    use trellis_test_utils::MockDocument;

    fn geometry(clippable: Rect<f32>, natural: Size<f32>) -> ClipGeometry {
        ClipGeometry {
            clippable,
            container_origin: Vec2::new(0.0, 0.0),
            container_inner: Size::new(500.0, 400.0),
            scroll: Vec2::ZERO,
            natural,
        }
    }

    #[test]
    fn test_fits_without_clipping() {
        let result = compute_clip(
            &geometry(Rect::new(100.0, 100.0, 200.0, 100.0), Size::new(200.0, 100.0)),
            10.0,
        );
        assert_eq!(result, ClipResult::default());
        assert!(result.axes().is_empty());
    }

    #[test]
    fn test_clips_height_only() {
        // Desired height: (0 + 400 - 10) - 300 = 90
        let result = compute_clip(
            &geometry(Rect::new(100.0, 300.0, 200.0, 250.0), Size::new(200.0, 250.0)),
            10.0,
        );
        assert_eq!(result.width, None);
        assert_eq!(result.height, Some(90.0));
        assert_eq!(result.axes(), ClipAxes::HEIGHT);
    }

    #[test]
    fn test_scroll_extends_visible_area() {
        let mut geo = geometry(Rect::new(0.0, 300.0, 100.0, 250.0), Size::new(100.0, 250.0));
        geo.scroll = Vec2::new(0.0, 200.0);
        // Desired height: (0 + 200 + 400 - 10) - 300 = 290 >= 250
        assert_eq!(compute_clip(&geo, 10.0).height, None);
    }

    #[test]
    fn test_clip_off_screen_never_negative() {
        let result = compute_clip(
            &geometry(Rect::new(600.0, 0.0, 100.0, 10.0), Size::new(100.0, 10.0)),
            10.0,
        );
        assert_eq!(result.width, Some(0.0));
    }

    #[test]
    fn test_clippable_listeners_and_styles() {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        let container = doc.create_element("div");
        let menu = doc.create_element("div");
        doc.append_child(doc.root(), container);
        doc.append_child(container, menu);
        doc.set_scrollable(container, true);
        doc.set_rect(container, Rect::new(0.0, 0.0, 300.0, 200.0));
        doc.set_rect(menu, Rect::new(0.0, 150.0, 100.0, 120.0));
        doc.set_scroll_size(menu, Size::new(100.0, 120.0));

        let mut clippable = Clippable::new(&ctx, menu);
        clippable.set_clipping(true);

        assert_eq!(clippable.container(), Some(container));
        assert_eq!(doc.listener_count(), 2);
        assert!(clippable.is_clipped());
        assert_eq!(clippable.clipped_axes(), ClipAxes::HEIGHT);
        assert_eq!(doc.style(menu, "height").as_deref(), Some("40px"));
        assert_eq!(doc.style(menu, "overflow-y").as_deref(), Some("auto"));

        clippable.set_clipping(false);
        assert_eq!(doc.listener_count(), 0);
        assert!(!clippable.is_clipped());
        assert_eq!(doc.style(menu, "height"), None);
    }

    #[test]
    fn test_detached_clippable_degrades() {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        let node = doc.create_element("div");

        let mut clippable = Clippable::new(&ctx, node);
        clippable.set_clipping(true);
        // Zero natural size never needs clipping.
        assert!(!clippable.is_clipped());
        assert_eq!(clippable.clip(), ClipAxes::empty());
    }
}
