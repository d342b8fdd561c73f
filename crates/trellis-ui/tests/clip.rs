//! Clipping against scroll containers and the viewport.

use std::sync::Arc;

use trellis_core::geometry::{Rect, Size};
use trellis_core::math::vec2;
use trellis_core::{NodeId, RenderTarget};
use trellis_test_utils::MockDocument;
use trellis_ui::clip::ClipAxes;
use trellis_ui::{Clippable, UiContext};

fn scene() -> (Arc<MockDocument>, UiContext, NodeId, NodeId) {
    let doc = Arc::new(MockDocument::new());
    let ctx = UiContext::new(doc.clone());

    let container = doc.create_element("div");
    doc.append_child(doc.root(), container);
    doc.set_scrollable(container, true);
    doc.set_rect(container, Rect::new(0.0, 0.0, 400.0, 300.0));

    let node = doc.create_element("div");
    doc.append_child(container, node);
    doc.set_rect(node, Rect::new(100.0, 200.0, 250.0, 200.0));
    doc.set_scroll_size(node, Size::new(250.0, 200.0));
    (doc, ctx, container, node)
}

#[test]
fn test_clips_overflowing_axis_only() {
    let (doc, ctx, container, node) = scene();
    let mut clippable = Clippable::new(&ctx, node);

    clippable.set_clipping(true);
    assert_eq!(clippable.container(), Some(container));
    assert_eq!(clippable.clipped_axes(), ClipAxes::HEIGHT);
    assert_eq!(doc.style(node, "height").as_deref(), Some("90px"));
    assert_eq!(doc.style(node, "overflow-y").as_deref(), Some("auto"));
    assert!(doc.style(node, "width").is_none());
    assert_eq!(doc.listener_count(), 2);
}

#[test]
fn test_scrolling_relaxes_clip() {
    let (doc, ctx, container, node) = scene();
    let mut clippable = Clippable::new(&ctx, node);
    clippable.set_clipping(true);

    doc.set_scroll_offset(container, vec2(0.0, 100.0));
    clippable.clip();
    assert_eq!(doc.style(node, "height").as_deref(), Some("190px"));

    doc.set_scroll_offset(container, vec2(0.0, 200.0));
    clippable.clip();
    assert!(!clippable.is_clipped());
    assert!(doc.style(node, "height").is_none());
}

#[test]
fn test_disabling_restores_natural_size() {
    let (doc, ctx, _container, node) = scene();
    let mut clippable = Clippable::new(&ctx, node);
    clippable.set_clipping(true);

    clippable.set_clipping(false);
    assert!(!clippable.is_clipped());
    assert!(doc.style(node, "height").is_none());
    assert!(doc.style(node, "overflow-y").is_none());
    assert_eq!(doc.listener_count(), 0);
    assert_eq!(clippable.container(), None);
}

#[test]
fn test_viewport_when_no_scroll_container() {
    let doc = Arc::new(MockDocument::new());
    let ctx = UiContext::new(doc.clone());
    doc.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
    let node = doc.create_element("div");
    doc.append_child(doc.root(), node);
    doc.set_rect(node, Rect::new(700.0, 100.0, 300.0, 100.0));

    let mut clippable = Clippable::new(&ctx, node);
    clippable.set_clipping(true);

    assert_eq!(clippable.container(), None);
    assert_eq!(clippable.clipped_axes(), ClipAxes::WIDTH);
    assert_eq!(doc.style(node, "width").as_deref(), Some("90px"));
}
