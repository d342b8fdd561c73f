//! Capabilities composed by value into concrete widgets.
//!
//! [`Icon`] and [`Label`] own the span they render into; [`Flags`] decorates a
//! node owned by someone else. State is mirrored as classes or text.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use trellis_core::{Document, NodeId};

use crate::context::UiContext;
use crate::element::Element;

/// Named boolean flags, each mirrored as a `trellis-flag-<name>` class on the
/// decorated node.
pub struct Flags {
    document: Arc<dyn Document>,
    node: NodeId,
    flags: IndexSet<String>,
}

impl Flags {
    /// Decorate `target`, usually the widget's root element.
    pub fn new(target: &Element) -> Self {
        Self {
            document: target.document().clone(),
            node: target.node(),
            flags: IndexSet::new(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Flags in the order they were set.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    /// Add every flag in `flags`.
    pub fn set_flags(&mut self, flags: &[&str]) {
        for flag in flags {
            self.set_flag(flag, true);
        }
    }

    /// Set or clear each named flag.
    pub fn update_flags(&mut self, flags: &[(&str, bool)]) {
        for (flag, on) in flags {
            self.set_flag(flag, *on);
        }
    }

    pub fn clear_flags(&mut self) {
        for flag in self.flags.drain(..) {
            self.document
                .remove_class(self.node, &format!("trellis-flag-{}", flag));
        }
    }

    fn set_flag(&mut self, flag: &str, on: bool) {
        let class = format!("trellis-flag-{}", flag);
        if on {
            self.flags.insert(flag.to_string());
            self.document.add_class(self.node, &class);
        } else if self.flags.shift_remove(flag) {
            self.document.remove_class(self.node, &class);
        }
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flags")
            .field("node", &self.node)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Symbolic icon name shown through a `trellis-icon-<name>` class.
#[derive(Debug)]
pub struct Icon {
    element: Element,
    icon: Option<String>,
}

impl Icon {
    pub fn new(ctx: &UiContext) -> Self {
        let element = ctx.create("span");
        element.add_class("trellis-icon");
        Self {
            element,
            icon: None,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Set the icon; surrounding whitespace is trimmed and a blank name clears it.
    pub fn set_icon(&mut self, icon: Option<&str>) {
        if let Some(old) = self.icon.take() {
            self.element.remove_class(&format!("trellis-icon-{}", old));
        }
        let icon = icon.map(str::trim).filter(|s| !s.is_empty());
        if let Some(icon) = icon {
            self.element.add_class(&format!("trellis-icon-{}", icon));
            self.icon = Some(icon.to_string());
        }
    }

    pub(crate) fn destroy(self) {
        self.element.destroy();
    }
}

/// Text label; whitespace-only text counts as no label.
#[derive(Debug)]
pub struct Label {
    element: Element,
    label: Option<String>,
}

impl Label {
    pub fn new(ctx: &UiContext) -> Self {
        let element = ctx.create("span");
        element.add_class("trellis-label");
        element.add_class("trellis-label-empty");
        Self {
            element,
            label: None,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<&str>) {
        let label = label.filter(|s| !s.trim().is_empty());
        self.element.set_text(label.unwrap_or(""));
        self.element.toggle_class("trellis-label-empty", label.is_none());
        self.label = label.map(str::to_string);
    }

    pub(crate) fn destroy(self) {
        self.element.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trellis_test_utils::MockDocument;

    fn context() -> (Arc<MockDocument>, UiContext) {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        (doc, ctx)
    }

    #[test]
    fn test_flags() {
        let (doc, ctx) = context();
        let root = ctx.create("div");
        let mut flags = Flags::new(&root);
        let node = root.node();

        flags.set_flags(&["primary", "constructive"]);
        assert!(flags.has_flag("primary"));
        assert!(doc.has_class(node, "trellis-flag-constructive"));

        flags.update_flags(&[("primary", false), ("destructive", true)]);
        assert!(!flags.has_flag("primary"));
        assert!(!doc.has_class(node, "trellis-flag-primary"));
        assert_eq!(flags.flags().collect::<Vec<_>>(), vec!["constructive", "destructive"]);

        flags.clear_flags();
        assert_eq!(flags.flags().count(), 0);
        assert!(!doc.has_class(node, "trellis-flag-destructive"));
    }

    #[test]
    fn test_icon_trims_and_replaces() {
        let (doc, ctx) = context();
        let mut icon = Icon::new(&ctx);
        let node = icon.element().node();

        icon.set_icon(Some("  check "));
        assert_eq!(icon.icon(), Some("check"));
        assert!(doc.has_class(node, "trellis-icon-check"));

        icon.set_icon(Some("down"));
        assert!(!doc.has_class(node, "trellis-icon-check"));
        assert!(doc.has_class(node, "trellis-icon-down"));

        icon.set_icon(Some("   "));
        assert_eq!(icon.icon(), None);
        assert!(!doc.has_class(node, "trellis-icon-down"));
    }

    #[test]
    fn test_blank_label_is_empty() {
        let (doc, ctx) = context();
        let mut label = Label::new(&ctx);
        let node = label.element().node();

        label.set_label(Some("Bold"));
        assert_eq!(label.label(), Some("Bold"));
        assert_eq!(doc.text(node), "Bold");
        assert!(!doc.has_class(node, "trellis-label-empty"));

        label.set_label(Some("  \t"));
        assert_eq!(label.label(), None);
        assert_eq!(doc.text(node), "");
        assert!(doc.has_class(node, "trellis-label-empty"));
    }
}
