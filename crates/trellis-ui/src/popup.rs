//! Transient overlays anchored to another widget.
//!
//! The popup system provides:
//! - Horizontal placement by alignment, shifted to stay inside a bounding container
//! - Time-boxed display transitions that a repeated display cancels
//! - Click-outside-to-close behavior
//! - An optional head with a label and a close button, and an optional tail
//!
//! [`Popuppable`] bundles a popup with the default size used by popup buttons
//! and popup tools.
//!
//! # Example
//!
//! ```ignore
//! let mut popup = PopupWidget::new(&ctx, PopupConfig {
//!     align: PopupAlign::Center,
//!     auto_close: true,
//!     ..Default::default()
//! });
//! anchor.append(popup.element());
//! popup.show();
//! popup.display(320.0, None, true);
//! // Host loop:
//! popup.update(dt);
//! ```

use std::time::Duration;

use trellis_core::{ListenKind, ListenTarget, ListenerId, NodeId};

use crate::context::UiContext;
use crate::element::Element;
use crate::event::{Emitter, PointerEvent, PointerKind};
use crate::timer::Timer;
use crate::widget::{ButtonConfig, ButtonWidget, Icon, Label, Widget, WidgetBase};

const TRANSITIONING_CLASS: &str = "trellis-popup-transitioning";

/// Horizontal alignment of a popup relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl PopupAlign {
    /// Fraction of the popup width the popup is shifted by before overflow correction.
    pub fn factor(&self) -> f32 {
        match self {
            PopupAlign::Left => 0.0,
            PopupAlign::Center => -0.5,
            PopupAlign::Right => -1.0,
        }
    }
}

/// Compute the horizontal offset of a popup relative to its anchor's left edge.
///
/// The popup is first placed by `align`. If its right edge (plus padding) would
/// overflow the container, it shifts left by the overflow; otherwise if its
/// left edge underflows, it shifts right.
pub fn popup_offset(
    anchor_left: f32,
    container_left: f32,
    container_width: f32,
    width: f32,
    align: PopupAlign,
    padding: f32,
) -> f32 {
    let container_right = container_left + container_width;
    let mut offset = width * align.factor();

    let popup_left = offset - padding;
    let popup_right = offset + padding + width + padding;
    let overlap_left = (anchor_left + popup_left) - container_left;
    let overlap_right = container_right - (anchor_left + popup_right);

    if overlap_right < 0.0 {
        offset += overlap_right;
    } else if overlap_left < 0.0 {
        offset -= overlap_left;
    }
    offset
}

/// Configuration for a [`PopupWidget`].
#[derive(Debug, Clone)]
pub struct PopupConfig {
    pub align: PopupAlign,
    /// Hide on a pointer press outside the popup.
    pub auto_close: bool,
    /// Node whose presses never trigger auto-close (usually the anchor).
    pub auto_close_ignore: Option<NodeId>,
    /// Bounding container; defaults to the document root.
    pub container: Option<NodeId>,
    /// Show a head with the label and a close button.
    pub head: bool,
    pub tail: bool,
    pub label: Option<String>,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            align: PopupAlign::Center,
            auto_close: false,
            auto_close_ignore: None,
            container: None,
            head: false,
            tail: true,
            label: None,
        }
    }
}

/// Events emitted by a popup when its visibility changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    Show,
    Hide,
}

/// Floating box anchored to its parent node.
#[derive(Debug)]
pub struct PopupWidget {
    base: WidgetBase,
    label: Label,
    popup: Element,
    head: Element,
    body: Element,
    tail: Element,
    close_button: ButtonWidget,
    container: NodeId,
    align: PopupAlign,
    padding: f32,
    auto_close: bool,
    auto_close_ignore: Option<NodeId>,
    tail_enabled: bool,
    visible: bool,
    transition: Timer,
    transition_delay: Duration,
    auto_close_listener: Option<ListenerId>,
    events: Emitter<PopupEvent>,
}

impl PopupWidget {
    pub fn new(ctx: &UiContext, config: PopupConfig) -> Self {
        let base = WidgetBase::new(ctx, "div", "trellis-popup");
        let popup = Element::with_class(ctx.document().clone(), "div", "trellis-popup-popup");
        let head = Element::with_class(ctx.document().clone(), "div", "trellis-popup-head");
        let body = Element::with_class(ctx.document().clone(), "div", "trellis-popup-body");
        let tail = Element::with_class(ctx.document().clone(), "div", "trellis-popup-tail");
        let mut label = Label::new(ctx);
        let close_button = ButtonWidget::new(
            ctx,
            ButtonConfig::icon("close").with_title(ctx.msg("trellis-dialog-action-close", &[])),
        );

        head.append(label.element());
        head.append(close_button.element());
        head.toggle(config.head);
        popup.append(&head);
        popup.append(&body);
        base.element().append(&tail);
        base.element().append(&popup);
        base.element().hide();
        label.set_label(config.label.as_deref());

        let mut widget = Self {
            base,
            label,
            popup,
            head,
            body,
            tail,
            close_button,
            container: config.container.unwrap_or_else(|| ctx.document().root()),
            align: config.align,
            padding: ctx.config().popup_padding,
            auto_close: config.auto_close,
            auto_close_ignore: config.auto_close_ignore,
            tail_enabled: false,
            visible: false,
            transition: Timer::idle(),
            transition_delay: ctx.config().popup_transition,
            auto_close_listener: None,
            events: Emitter::new(),
        };
        widget.toggle_tail(config.tail);
        widget
    }

    pub fn events_mut(&mut self) -> &mut Emitter<PopupEvent> {
        &mut self.events
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn head(&self) -> &Element {
        &self.head
    }

    pub fn popup_element(&self) -> &Element {
        &self.popup
    }

    pub fn close_button(&self) -> &ButtonWidget {
        &self.close_button
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn align(&self) -> PopupAlign {
        self.align
    }

    pub fn set_align(&mut self, align: PopupAlign) {
        self.align = align;
    }

    pub fn has_tail(&self) -> bool {
        self.tail_enabled
    }

    pub fn toggle_tail(&mut self, tail: bool) {
        self.tail_enabled = tail;
        self.base.element().toggle_class("trellis-popup-tailed", tail);
        self.tail.toggle(tail);
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_running()
    }

    pub fn show(&mut self) {
        if self.visible {
            return;
        }
        self.base.element().show();
        self.visible = true;
        if self.auto_close && self.auto_close_listener.is_none() {
            let document = self.base.element().document().clone();
            self.auto_close_listener =
                Some(document.listen(ListenTarget::Document, ListenKind::PointerDown));
        }
        self.events.emit(&PopupEvent::Show);
    }

    pub fn hide(&mut self) {
        if !self.visible {
            return;
        }
        self.base.element().hide();
        self.visible = false;
        if let Some(listener) = self.auto_close_listener.take() {
            self.base.element().document().unlisten(listener);
        }
        self.events.emit(&PopupEvent::Hide);
    }

    /// Show or hide; `None` flips the current state.
    pub fn toggle(&mut self, show: Option<bool>) {
        if show.unwrap_or(!self.visible) {
            self.show();
        } else {
            self.hide();
        }
    }

    /// Size the popup and place it horizontally within the bounding container.
    ///
    /// Returns the computed offset. A pending transition is cancelled first.
    pub fn display(&mut self, width: f32, height: Option<f32>, transition: bool) -> f32 {
        let document = self.base.element().document().clone();
        let anchor_left = self.base.element().bounding_box().x.round();
        let container_left = document.bounding_box(self.container).x.round();
        let container_width = document.inner_size(self.container).width;
        let offset = popup_offset(
            anchor_left,
            container_left,
            container_width,
            width,
            self.align,
            self.padding,
        );

        self.transition.cancel();
        if transition {
            self.base.element().add_class(TRANSITIONING_CLASS);
        }

        self.popup.set_style("left", Some(&format!("{}px", offset)));
        self.popup.set_style("width", Some(&format!("{}px", width)));
        match height {
            Some(height) => self.popup.set_style("height", Some(&format!("{}px", height))),
            None => self.popup.set_style("height", None),
        }

        if transition {
            self.transition.start(self.transition_delay);
        } else {
            self.base.element().remove_class(TRANSITIONING_CLASS);
        }
        offset
    }

    /// Advance the display transition.
    pub fn update(&mut self, dt: Duration) {
        if self.transition.advance(dt) {
            self.base.element().remove_class(TRANSITIONING_CLASS);
        }
    }

    /// Handle pointer input: close-button clicks and outside presses.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let on_close = event
            .target
            .is_some_and(|t| self.close_button.element().contains(t));
        if on_close || self.close_button.is_pressed() {
            let was_pressed = self.close_button.is_pressed();
            let handled = self.close_button.handle_pointer(event);
            if event.kind == PointerKind::Up && was_pressed && on_close && event.is_left() {
                self.hide();
            }
            return handled;
        }

        if event.kind == PointerKind::Down && self.auto_close_listener.is_some() && self.visible {
            let Some(target) = event.target else {
                return false;
            };
            let inside = self.base.element().contains(target);
            let ignored = self
                .auto_close_ignore
                .is_some_and(|ignore| self.base.element().document().contains(ignore, target));
            if !inside && !ignored {
                self.hide();
                return true;
            }
        }
        false
    }

    pub fn destroy(mut self) {
        self.hide();
        self.events.clear();
        self.close_button.destroy();
        self.label.destroy();
        self.base.destroy();
    }
}

impl Widget for PopupWidget {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn debug_name(&self) -> &str {
        "PopupWidget"
    }

    fn as_labeled(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn as_labeled_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.label)
    }
}

/// A popup plus the size it is displayed at.
#[derive(Debug)]
pub struct Popuppable {
    popup: PopupWidget,
    width: f32,
    height: Option<f32>,
}

impl Popuppable {
    pub fn new(ctx: &UiContext, config: PopupConfig) -> Self {
        Self {
            popup: PopupWidget::new(ctx, config),
            width: ctx.config().popup_width,
            height: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: Option<f32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn popup(&self) -> &PopupWidget {
        &self.popup
    }

    pub fn popup_mut(&mut self) -> &mut PopupWidget {
        &mut self.popup
    }

    pub fn show_popup(&mut self) {
        self.popup.show();
        self.popup.display(self.width, self.height, false);
    }

    pub fn hide_popup(&mut self) {
        self.popup.hide();
    }

    pub fn toggle_popup(&mut self) {
        if self.popup.is_visible() {
            self.hide_popup();
        } else {
            self.show_popup();
        }
    }

    pub fn destroy(self) {
        self.popup.destroy();
    }
}

/// A button that toggles a popup when clicked.
#[derive(Debug)]
pub struct PopupButtonWidget {
    button: ButtonWidget,
    popuppable: Popuppable,
}

impl PopupButtonWidget {
    pub fn new(ctx: &UiContext, button: ButtonConfig, popup: PopupConfig) -> Self {
        let button = ButtonWidget::new(ctx, button);
        let popuppable = Popuppable::new(
            ctx,
            PopupConfig {
                auto_close: true,
                auto_close_ignore: Some(button.element().node()),
                ..popup
            },
        );
        button.element().add_class("trellis-popup-button");
        button.element().append(popuppable.popup().element());
        Self { button, popuppable }
    }

    pub fn button(&self) -> &ButtonWidget {
        &self.button
    }

    pub fn button_mut(&mut self) -> &mut ButtonWidget {
        &mut self.button
    }

    pub fn popup(&self) -> &PopupWidget {
        self.popuppable.popup()
    }

    pub fn popup_mut(&mut self) -> &mut PopupWidget {
        self.popuppable.popup_mut()
    }

    /// Route pointer input to the popup first, then to the button.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let in_popup = event
            .target
            .is_some_and(|t| self.popuppable.popup().element().contains(t));
        if in_popup {
            self.popuppable.popup_mut().handle_pointer(event);
            return true;
        }
        if self.popuppable.popup_mut().handle_pointer(event) {
            return true;
        }

        let was_pressed = self.button.is_pressed();
        let handled = self.button.handle_pointer(event);
        let clicked = event.kind == PointerKind::Up
            && was_pressed
            && event.is_left()
            && event.target.is_some_and(|t| self.button.element().contains(t));
        if clicked && !self.button.is_disabled() {
            self.popuppable.toggle_popup();
        }
        handled
    }

    pub fn update(&mut self, dt: Duration) {
        self.popuppable.popup_mut().update(dt);
    }

    pub fn destroy(self) {
        self.popuppable.destroy();
        self.button.destroy();
    }
}

impl Widget for PopupButtonWidget {
    fn base(&self) -> &WidgetBase {
        self.button.base()
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        self.button.base_mut()
    }

    fn debug_name(&self) -> &str {
        "PopupButtonWidget"
    }

    fn as_iconed(&self) -> Option<&Icon> {
        self.button.as_iconed()
    }

    fn as_labeled(&self) -> Option<&Label> {
        self.button.as_labeled()
    }
}
