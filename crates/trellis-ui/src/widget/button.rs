use crate::context::UiContext;
use crate::event::{Emitter, Key, KeyEvent, PointerEvent, PointerKind};
use crate::widget::{Flags, Icon, Label, Widget, WidgetBase};

/// Configuration for a [`ButtonWidget`].
#[derive(Debug, Clone, Default)]
pub struct ButtonConfig {
    pub label: Option<String>,
    pub icon: Option<String>,
    /// Tooltip text.
    pub title: Option<String>,
    pub flags: Vec<String>,
    /// Render without a frame (icon-only buttons in window heads and popups).
    pub frameless: bool,
}

impl ButtonConfig {
    pub fn icon(icon: impl Into<String>) -> Self {
        Self {
            icon: Some(icon.into()),
            frameless: true,
            ..Default::default()
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_flags(mut self, flags: &[&str]) -> Self {
        self.flags = flags.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Events emitted by a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Click,
}

/// A clickable widget with an icon, a label and flags.
#[derive(Debug)]
pub struct ButtonWidget {
    base: WidgetBase,
    flags: Flags,
    icon: Icon,
    label: Label,
    pressed: bool,
    events: Emitter<ButtonEvent>,
}

impl ButtonWidget {
    pub fn new(ctx: &UiContext, config: ButtonConfig) -> Self {
        let base = WidgetBase::new(ctx, "span", "trellis-button");
        let mut flags = Flags::new(base.element());
        let mut icon = Icon::new(ctx);
        let mut label = Label::new(ctx);

        base.element().append(icon.element());
        base.element().append(label.element());
        base.element().add_class(if config.frameless {
            "trellis-button-frameless"
        } else {
            "trellis-button-framed"
        });
        if let Some(title) = &config.title {
            base.element().set_attribute("title", title);
        }

        let names: Vec<&str> = config.flags.iter().map(String::as_str).collect();
        flags.set_flags(&names);
        icon.set_icon(config.icon.as_deref());
        label.set_label(config.label.as_deref());

        Self {
            base,
            flags,
            icon,
            label,
            pressed: false,
            events: Emitter::new(),
        }
    }

    pub fn events_mut(&mut self) -> &mut Emitter<ButtonEvent> {
        &mut self.events
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Emit `Click` unless disabled. Returns whether the click happened.
    pub fn click(&mut self) -> bool {
        if self.base.is_disabled() {
            return false;
        }
        self.events.emit(&ButtonEvent::Click);
        true
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down if event.is_left() && !self.base.is_disabled() => {
                self.pressed = true;
                self.base.element().add_class("trellis-button-pressed");
                true
            }
            PointerKind::Up if self.pressed => {
                self.pressed = false;
                self.base.element().remove_class("trellis-button-pressed");
                let inside = event.target.is_some_and(|t| self.base.element().contains(t));
                if inside && event.is_left() {
                    self.click();
                }
                true
            }
            _ => false,
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match event.key {
            Key::Enter | Key::Space => self.click(),
            _ => false,
        }
    }

    pub fn destroy(mut self) {
        self.events.clear();
        self.icon.destroy();
        self.label.destroy();
        self.base.destroy();
    }
}

impl Widget for ButtonWidget {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn debug_name(&self) -> &str {
        "ButtonWidget"
    }

    fn as_flagged(&self) -> Option<&Flags> {
        Some(&self.flags)
    }

    fn as_flagged_mut(&mut self) -> Option<&mut Flags> {
        Some(&mut self.flags)
    }

    fn as_iconed(&self) -> Option<&Icon> {
        Some(&self.icon)
    }

    fn as_iconed_mut(&mut self) -> Option<&mut Icon> {
        Some(&mut self.icon)
    }

    fn as_labeled(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn as_labeled_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use trellis_test_utils::MockDocument;

    fn button(config: ButtonConfig) -> (Arc<MockDocument>, ButtonWidget) {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        (doc, ButtonWidget::new(&ctx, config))
    }

    #[test]
    fn test_click_on_release_inside() {
        let (_doc, mut button) = button(ButtonConfig::label("Save"));
        let clicks = Arc::new(Mutex::new(0));
        let sink = clicks.clone();
        button.events_mut().subscribe(move |_| *sink.lock() += 1);

        let node = button.element().node();
        assert!(button.handle_pointer(&PointerEvent::down(node)));
        assert!(button.is_pressed());
        assert!(button.handle_pointer(&PointerEvent::up(node)));
        assert!(!button.is_pressed());
        assert_eq!(*clicks.lock(), 1);
    }

    #[test]
    fn test_disabled_button_ignores_input() {
        let (_doc, mut button) = button(ButtonConfig::icon("close"));
        button.set_disabled(true);
        let node = button.element().node();

        assert!(!button.handle_pointer(&PointerEvent::down(node)));
        assert!(!button.handle_key(&KeyEvent::new(Key::Enter)));
        assert!(!button.click());
    }

    #[test]
    fn test_capabilities_exposed() {
        let (doc, button) = button(ButtonConfig::icon("close").with_flags(&["destructive"]));
        let widget: &dyn Widget = &button;

        assert_eq!(widget.as_iconed().and_then(|i| i.icon()), Some("close"));
        assert!(widget.as_flagged().is_some_and(|f| f.has_flag("destructive")));
        assert!(doc.has_class(button.element().node(), "trellis-flag-destructive"));
        assert!(widget.as_clippable().is_none());
    }
}
