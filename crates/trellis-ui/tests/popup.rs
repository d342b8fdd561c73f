//! Popups: visibility notifications, auto-close, the head close button,
//! container-bounded placement and popup buttons.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use trellis_core::RenderTarget;
use trellis_core::geometry::Rect;
use trellis_test_utils::MockDocument;
use trellis_ui::{
    ButtonConfig, PointerEvent, PopupButtonWidget, PopupConfig, PopupEvent, PopupWidget,
    UiContext, Widget,
};

fn ctx() -> (Arc<MockDocument>, UiContext) {
    let doc = Arc::new(MockDocument::new());
    let ctx = UiContext::new(doc.clone());
    (doc, ctx)
}

fn attached(doc: &MockDocument, popup: &PopupWidget) {
    doc.append_child(doc.root(), popup.element().node());
}

#[test]
fn test_show_and_hide_emit_on_change_only() {
    let (doc, ctx) = ctx();
    let mut popup = PopupWidget::new(&ctx, PopupConfig::default());
    attached(&doc, &popup);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    popup.events_mut().subscribe(move |e| sink.lock().push(*e));

    popup.show();
    popup.show();
    popup.toggle(None);
    popup.hide();

    assert_eq!(*events.lock(), vec![PopupEvent::Show, PopupEvent::Hide]);
    assert!(!doc.is_visible(popup.element().node()));
}

#[test]
fn test_auto_close_on_outside_press() {
    let (doc, ctx) = ctx();
    let anchor = doc.create_element("button");
    let outside = doc.create_element("div");
    doc.append_child(doc.root(), anchor);
    doc.append_child(doc.root(), outside);

    let mut popup = PopupWidget::new(
        &ctx,
        PopupConfig {
            auto_close: true,
            auto_close_ignore: Some(anchor),
            ..Default::default()
        },
    );
    attached(&doc, &popup);
    popup.show();
    assert_eq!(doc.listener_count(), 1);

    assert!(!popup.handle_pointer(&PointerEvent::down(popup.body().node())));
    assert!(!popup.handle_pointer(&PointerEvent::down(anchor)));
    assert!(popup.is_visible());

    assert!(popup.handle_pointer(&PointerEvent::down(outside)));
    assert!(!popup.is_visible());
    assert_eq!(doc.listener_count(), 0);
}

#[test]
fn test_close_button_hides() {
    let (doc, ctx) = ctx();
    let mut popup = PopupWidget::new(
        &ctx,
        PopupConfig {
            head: true,
            label: Some("Details".into()),
            ..Default::default()
        },
    );
    attached(&doc, &popup);
    popup.show();
    let close = popup.close_button().element().node();

    popup.handle_pointer(&PointerEvent::down(close));
    assert!(popup.is_visible());
    popup.handle_pointer(&PointerEvent::up(close));
    assert!(!popup.is_visible());
    assert_eq!(popup.as_labeled().and_then(|l| l.label()), Some("Details"));
}

#[test]
fn test_display_stays_inside_container() {
    let (doc, ctx) = ctx();
    let container = doc.create_element("div");
    doc.append_child(doc.root(), container);
    doc.set_rect(container, Rect::new(0.0, 0.0, 500.0, 400.0));

    let mut popup = PopupWidget::new(
        &ctx,
        PopupConfig {
            container: Some(container),
            ..Default::default()
        },
    );
    doc.append_child(container, popup.element().node());
    doc.set_rect(popup.element().node(), Rect::new(450.0, 0.0, 20.0, 20.0));
    popup.show();

    let offset = popup.display(320.0, None, true);
    assert_eq!(offset, -290.0);
    let node = popup.popup_element().node();
    assert_eq!(doc.style(node, "left").as_deref(), Some("-290px"));
    assert_eq!(doc.style(node, "width").as_deref(), Some("320px"));
    assert!(popup.is_transitioning());
    assert!(doc.has_class(popup.element().node(), "trellis-popup-transitioning"));

    popup.update(Duration::from_millis(200));
    assert!(!popup.is_transitioning());
    assert!(!doc.has_class(popup.element().node(), "trellis-popup-transitioning"));
}

#[test]
fn test_popup_button_toggles() {
    let (doc, ctx) = ctx();
    let mut button = PopupButtonWidget::new(&ctx, ButtonConfig::label("More"), PopupConfig::default());
    doc.append_child(doc.root(), button.element().node());
    let node = button.button().element().node();

    button.handle_pointer(&PointerEvent::down(node));
    button.handle_pointer(&PointerEvent::up(node));
    assert!(button.popup().is_visible());

    button.handle_pointer(&PointerEvent::down(node));
    button.handle_pointer(&PointerEvent::up(node));
    assert!(!button.popup().is_visible());
}
