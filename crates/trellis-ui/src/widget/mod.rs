//! Widget base state and capability queries.
//!
//! Concrete widgets embed a [`WidgetBase`] and whichever capability structs
//! they need ([`Flags`], [`Icon`], [`Label`], [`Clippable`](crate::clip::Clippable)),
//! then implement [`Widget`] to expose them.

mod button;
mod capability;

pub use button::{ButtonConfig, ButtonEvent, ButtonWidget};
pub use capability::{Flags, Icon, Label};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::clip::Clippable;
use crate::context::UiContext;
use crate::element::Element;

/// Global counter for generating unique widget IDs.
static WIDGET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl WidgetId {
    pub fn new() -> Self {
        Self(WIDGET_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Root element and the `disabled` flag gating all interaction.
#[derive(Debug)]
pub struct WidgetBase {
    id: WidgetId,
    element: Element,
    disabled: bool,
}

impl WidgetBase {
    pub fn new(ctx: &UiContext, tag: &str, class: &str) -> Self {
        let element = ctx.create(tag);
        element.add_class("trellis-widget");
        element.add_class(class);
        element.add_class("trellis-widget-enabled");
        Self {
            id: WidgetId::new(),
            element,
            disabled: false,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.element.toggle_class("trellis-widget-disabled", disabled);
        self.element.toggle_class("trellis-widget-enabled", !disabled);
        if disabled {
            self.element.set_attribute("aria-disabled", "true");
        } else {
            self.element.remove_attribute("aria-disabled");
        }
    }

    /// Remove the root element from the document.
    pub fn destroy(self) {
        self.element.destroy();
    }
}

/// Common interface of every widget.
///
/// Capabilities are discovered through query methods instead of downcasting:
///
/// ```ignore
/// fn relabel(widget: &mut dyn Widget, text: &str) {
///     if let Some(label) = widget.as_labeled_mut() {
///         label.set_label(Some(text));
///     }
/// }
/// ```
pub trait Widget {
    fn base(&self) -> &WidgetBase;
    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Name used in logs.
    fn debug_name(&self) -> &str {
        "Widget"
    }

    fn id(&self) -> WidgetId {
        self.base().id()
    }

    fn element(&self) -> &Element {
        self.base().element()
    }

    fn is_disabled(&self) -> bool {
        self.base().is_disabled()
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.base_mut().set_disabled(disabled);
    }

    fn as_flagged(&self) -> Option<&Flags> {
        None
    }

    fn as_flagged_mut(&mut self) -> Option<&mut Flags> {
        None
    }

    fn as_iconed(&self) -> Option<&Icon> {
        None
    }

    fn as_iconed_mut(&mut self) -> Option<&mut Icon> {
        None
    }

    fn as_labeled(&self) -> Option<&Label> {
        None
    }

    fn as_labeled_mut(&mut self) -> Option<&mut Label> {
        None
    }

    fn as_clippable(&self) -> Option<&Clippable> {
        None
    }

    fn as_clippable_mut(&mut self) -> Option<&mut Clippable> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trellis_test_utils::MockDocument;

    #[test]
    fn test_widget_id_uniqueness() {
        assert_ne!(WidgetId::new(), WidgetId::new());
    }

    #[test]
    fn test_disabled_classes() {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        let mut base = WidgetBase::new(&ctx, "div", "trellis-test");
        let node = base.element().node();

        assert!(doc.has_class(node, "trellis-widget-enabled"));
        base.set_disabled(true);
        assert!(base.is_disabled());
        assert!(doc.has_class(node, "trellis-widget-disabled"));
        assert!(!doc.has_class(node, "trellis-widget-enabled"));
        assert_eq!(doc.attribute(node, "aria-disabled").as_deref(), Some("true"));

        base.set_disabled(false);
        assert!(doc.attribute(node, "aria-disabled").is_none());
    }
}
