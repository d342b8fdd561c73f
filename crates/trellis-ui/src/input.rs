//! Single- and multi-line text input.

use std::fmt;
use std::sync::Arc;

use crate::context::UiContext;
use crate::element::Element;
use crate::event::{Emitter, Key, KeyEvent, PointerEvent, PointerKind};
use crate::widget::{Widget, WidgetBase};

/// Transforms every value before it is stored.
pub type InputFilter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Configuration for a [`TextInput`].
#[derive(Clone, Default)]
pub struct TextInputConfig {
    pub value: Option<String>,
    pub placeholder: Option<String>,
    /// Decorative icon shown inside the input.
    pub icon: Option<String>,
    /// Form field name.
    pub name: Option<String>,
    pub multiline: bool,
    pub read_only: bool,
    pub filter: Option<InputFilter>,
}

impl TextInputConfig {
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }
}

impl fmt::Debug for TextInputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInputConfig")
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .field("multiline", &self.multiline)
            .field("read_only", &self.read_only)
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

/// Events emitted by a [`TextInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    /// The stored value changed.
    Change(String),
    /// Enter pressed in a single-line input.
    Enter,
}

/// A text field holding a sanitised string value.
///
/// The host reports edits of the native control through
/// [`edited`](Self::edited). A counted pending state lets several independent
/// operations share one busy indicator.
pub struct TextInput {
    base: WidgetBase,
    input: Element,
    icon: Option<Element>,
    value: String,
    multiline: bool,
    read_only: bool,
    filter: Option<InputFilter>,
    pending: usize,
    events: Emitter<TextInputEvent>,
}

impl TextInput {
    pub fn new(ctx: &UiContext, config: TextInputConfig) -> Self {
        let base = WidgetBase::new(ctx, "div", "trellis-inputWidget");
        base.element().add_class("trellis-textInputWidget");
        let input = if config.multiline {
            ctx.create("textarea")
        } else {
            let input = ctx.create("input");
            input.set_attribute("type", "text");
            input
        };
        base.element().append(&input);
        if let Some(name) = &config.name {
            input.set_attribute("name", name);
        }
        if let Some(placeholder) = &config.placeholder {
            input.set_attribute("placeholder", placeholder);
        }
        let icon = config.icon.as_deref().map(|icon| {
            let element = Element::with_class(ctx.document().clone(), "span", "trellis-textInputWidget-icon");
            element.add_class(&format!("trellis-icon-{}", icon));
            base.element().add_class("trellis-textInputWidget-decorated");
            base.element().append(&element);
            element
        });

        let mut widget = Self {
            base,
            input,
            icon,
            value: String::new(),
            multiline: config.multiline,
            read_only: false,
            filter: config.filter,
            pending: 0,
            events: Emitter::new(),
        };
        widget.set_read_only(config.read_only);
        widget.set_value(config.value.as_deref());
        widget
    }

    pub fn events_mut(&mut self) -> &mut Emitter<TextInputEvent> {
        &mut self.events
    }

    /// The native input control.
    pub fn input(&self) -> &Element {
        &self.input
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn sanitize(&self, value: Option<&str>) -> String {
        match (value, &self.filter) {
            (None, _) => String::new(),
            (Some(value), Some(filter)) => filter(value),
            (Some(value), None) => value.to_string(),
        }
    }

    /// Store a new value, emitting `Change` only when the sanitised value differs.
    /// Returns whether it changed.
    pub fn set_value(&mut self, value: Option<&str>) -> bool {
        let value = self.sanitize(value);
        let changed = value != self.value;
        if changed {
            self.value = value;
            self.events.emit(&TextInputEvent::Change(self.value.clone()));
        }
        self.input.set_attribute("value", &self.value);
        changed
    }

    /// The host reports that the native control now contains `raw`.
    pub fn edited(&mut self, raw: &str) -> bool {
        if self.base.is_disabled() {
            return false;
        }
        self.set_value(Some(raw))
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.input.set_attribute("readonly", "readonly");
        } else {
            self.input.remove_attribute("readonly");
        }
    }

    pub fn focus(&self) {
        self.input.focus();
    }

    pub fn is_focused(&self) -> bool {
        self.input.is_focused()
    }

    pub fn is_pending(&self) -> bool {
        self.pending > 0
    }

    pub fn push_pending(&mut self) {
        self.pending += 1;
        self.base.element().add_class("trellis-textInputWidget-pending");
        self.input.add_class("trellis-texture-pending");
    }

    /// Decrease the pending count, clamped at zero.
    pub fn pop_pending(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.base.element().remove_class("trellis-textInputWidget-pending");
            self.input.remove_class("trellis-texture-pending");
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.key == Key::Enter && !self.multiline {
            self.events.emit(&TextInputEvent::Enter);
            return true;
        }
        false
    }

    /// A press on the decorative icon focuses the input.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let on_icon = event
            .target
            .zip(self.icon.as_ref())
            .is_some_and(|(target, icon)| icon.contains(target));
        if event.kind == PointerKind::Down && on_icon {
            self.focus();
            return true;
        }
        false
    }

    pub fn destroy(mut self) {
        self.events.clear();
        if let Some(icon) = self.icon.take() {
            icon.destroy();
        }
        self.input.destroy();
        self.base.destroy();
    }
}

impl Widget for TextInput {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn debug_name(&self) -> &str {
        "TextInput"
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("value", &self.value)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
