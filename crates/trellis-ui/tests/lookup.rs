//! Autocomplete lookups: superseded requests, caching, failures and choosing
//! a result from the menu.

use std::sync::Arc;
use std::time::Duration;

use trellis_core::{RenderTarget, RequestError};
use trellis_test_utils::{MockDocument, MockRequestSource};
use trellis_ui::{
    Key, KeyEvent, LookupWidget, OptionConfig, OptionWidget, TextInputConfig, UiContext,
};

type Names = Vec<String>;

fn names(values: &[&str]) -> Names {
    values.iter().map(|v| v.to_string()).collect()
}

fn setup() -> (Arc<MockDocument>, MockRequestSource<Names>, LookupWidget<String, Names>) {
    let doc = Arc::new(MockDocument::new());
    let ctx = UiContext::new(doc.clone());
    let source = MockRequestSource::new();
    let widget = LookupWidget::new(
        &ctx,
        TextInputConfig::default(),
        source.clone(),
        |ctx: &UiContext, names: &Names| {
            names
                .iter()
                .map(|n| OptionWidget::new(ctx, n.clone(), OptionConfig::labeled(n.as_str())))
                .collect()
        },
    );
    (doc, source, widget)
}

fn focused(widget: &mut LookupWidget<String, Names>) {
    widget.input().focus();
    widget.handle_focus();
}

#[test]
fn test_superseded_response_discarded() {
    let (_doc, source, mut widget) = setup();
    focused(&mut widget);

    widget.edited("cat");
    assert_eq!(source.in_flight(), names(&["cat"]));
    assert!(widget.input().is_pending());

    widget.edited("dog");
    assert_eq!(source.in_flight(), names(&["dog"]));
    assert_eq!(source.cancelled(), names(&["cat"]));

    source.respond("cat", Ok(names(&["catfish"])));
    assert!(!widget.poll_lookup());
    assert!(!widget.menu().is_visible());
    assert!(widget.menu().select().is_empty());

    source.respond("dog", Ok(names(&["dogfish", "doge"])));
    assert!(widget.poll_lookup());
    assert!(!widget.input().is_pending());
    assert!(widget.menu().is_visible());

    let labels: Vec<&str> = widget
        .menu()
        .select()
        .items()
        .iter()
        .filter_map(|o| o.label())
        .collect();
    assert_eq!(labels, vec!["dogfish", "doge"]);
    let first = widget.menu().select().first_selectable_item();
    assert_eq!(widget.menu().select().selected_item(), first);
    assert_eq!(widget.menu().select().highlighted_item(), first);
}

#[test]
fn test_cached_query_needs_no_request() {
    let (_doc, source, mut widget) = setup();
    focused(&mut widget);

    widget.edited("cat");
    source.respond("cat", Ok(names(&["catfish"])));
    widget.poll_lookup();
    widget.edited("ca");
    widget.edited("cat");

    assert_eq!(source.issued(), names(&["cat", "ca"]));
    assert_eq!(source.cancelled(), names(&["ca"]));
    assert!(widget.coordinator().cached("cat").is_some());
    assert!(widget.menu().is_visible());
    assert!(!widget.input().is_pending());
}

#[test]
fn test_failure_means_no_results() {
    let (_doc, source, mut widget) = setup();
    focused(&mut widget);

    widget.edited("cat");
    source.respond(
        "cat",
        Err(RequestError::Failed {
            message: "offline".into(),
        }),
    );
    assert!(widget.poll_lookup());

    assert!(!widget.input().is_pending());
    assert!(!widget.menu().is_visible());
    assert!(widget.coordinator().cached("cat").is_none());
}

#[test]
fn test_unfocused_input_does_not_look_up() {
    let (_doc, source, mut widget) = setup();

    widget.edited("cat");
    assert!(source.issued().is_empty());
    assert!(!widget.menu().is_visible());
}

#[test]
fn test_blur_hides_menu() {
    let (_doc, source, mut widget) = setup();
    focused(&mut widget);
    widget.edited("dog");
    source.respond("dog", Ok(names(&["dogfish"])));
    widget.poll_lookup();
    assert!(widget.menu().is_visible());

    widget.handle_blur();
    assert!(!widget.menu().is_visible());
}

#[test]
fn test_choosing_copies_label_without_lookup() {
    let (_doc, source, mut widget) = setup();
    focused(&mut widget);
    widget.edited("dog");
    source.respond("dog", Ok(names(&["dogfish", "doge"])));
    widget.poll_lookup();

    assert!(widget.handle_key(&KeyEvent::new(Key::Down)));
    assert!(widget.handle_key(&KeyEvent::new(Key::Enter)));

    assert_eq!(widget.value(), "doge");
    assert_eq!(source.issued(), names(&["dog"]));
    assert!(widget.menu().is_flashing());

    widget.update(Duration::from_millis(100));
    widget.update(Duration::from_millis(100));
    assert!(!widget.menu().is_visible());
}

#[test]
fn test_menu_cleared_while_request_in_flight() {
    let (_doc, source, mut widget) = setup();
    focused(&mut widget);
    widget.edited("cat");
    source.respond("cat", Ok(names(&["catfish"])));
    widget.poll_lookup();
    assert!(widget.menu().is_visible());

    widget.edited("dog");
    assert_eq!(source.in_flight(), names(&["dog"]));
    assert!(!widget.menu().is_visible());
    assert!(widget.menu().select().is_empty());

    // Enter has nothing stale to choose.
    widget.handle_key(&KeyEvent::new(Key::Enter));
    assert!(!widget.menu().is_flashing());
    assert_eq!(widget.value(), "dog");

    // Refocusing with the same query keeps waiting on the same request.
    widget.handle_focus();
    assert_eq!(source.issued(), names(&["cat", "dog"]));
    assert!(widget.menu().select().is_empty());
}

#[test]
fn test_unfocused_change_cancels_lookup() {
    let (doc, source, mut widget) = setup();
    focused(&mut widget);
    widget.edited("cat");
    assert!(widget.input().is_pending());

    doc.blur(widget.input().input().node());
    widget.handle_blur();
    widget.edited("ca");

    assert_eq!(source.cancelled(), names(&["cat"]));
    assert!(source.in_flight().is_empty());
    assert!(!widget.coordinator().is_in_flight());
    assert!(!widget.input().is_pending());
    assert!(!widget.menu().is_visible());
}
