use std::time::Duration;

use tracing::trace;
use trellis_core::{ListenKind, ListenTarget, ListenerId, NodeId};

use crate::clip::Clippable;
use crate::context::UiContext;
use crate::event::{Emitter, Key, KeyEvent, PointerEvent};
use crate::select::option::{OptionValue, OptionWidget};
use crate::select::select::{Direction, SelectEvent, SelectWidget};
use crate::timer::Timer;
use crate::widget::{Widget, WidgetBase};

/// Configuration for a [`MenuWidget`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuConfig {
    /// Input node that receives key presses for the menu. Without one the menu
    /// is isolated and listens on the window instead.
    pub input: Option<NodeId>,
    /// Node the menu is positioned directly below, matching its width.
    pub anchor: Option<NodeId>,
}

/// Stages of the confirmation flash played after a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flash {
    Idle,
    /// Highlight removed from the chosen item.
    Off(NodeId),
    /// Highlight restored; the menu hides when the timer fires.
    On,
}

/// A select list shown as a transient, clipped overlay.
///
/// Visible menus answer key presses: Enter selects the current item, Up and
/// Down move the highlight, Escape dismisses. Selecting an item flashes it and
/// hides the menu; the host drives the flash through [`update`](Self::update).
#[derive(Debug)]
pub struct MenuWidget<D: OptionValue> {
    select: SelectWidget<D>,
    clippable: Clippable,
    config: MenuConfig,
    visible: bool,
    previous_focus: Option<NodeId>,
    key_listener: Option<ListenerId>,
    resize_listener: Option<ListenerId>,
    flash: Flash,
    flash_timer: Timer,
    flash_interval: Duration,
}

impl<D: OptionValue> MenuWidget<D> {
    pub fn new(ctx: &UiContext, config: MenuConfig) -> Self {
        let select = SelectWidget::with_class(ctx, "trellis-menu");
        select.element().hide();
        if config.anchor.is_some() {
            select.element().add_class("trellis-menu-anchored");
        }
        let clippable = Clippable::new(ctx, select.element().node());
        Self {
            select,
            clippable,
            config,
            visible: false,
            previous_focus: None,
            key_listener: None,
            resize_listener: None,
            flash: Flash::Idle,
            flash_timer: Timer::idle(),
            flash_interval: ctx.config().flash_interval,
        }
    }

    pub fn select(&self) -> &SelectWidget<D> {
        &self.select
    }

    pub fn select_mut(&mut self) -> &mut SelectWidget<D> {
        &mut self.select
    }

    pub fn events_mut(&mut self) -> &mut Emitter<SelectEvent<D>> {
        self.select.events_mut()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_isolated(&self) -> bool {
        self.config.input.is_none()
    }

    pub fn is_flashing(&self) -> bool {
        self.flash != Flash::Idle
    }

    pub fn add_items(&mut self, items: Vec<OptionWidget<D>>, index: Option<usize>) {
        self.select.add_items(items, index);
    }

    pub fn remove_items(&mut self, nodes: &[NodeId]) -> Vec<OptionWidget<D>> {
        let removed = self.select.remove_items(nodes);
        if self.select.is_empty() {
            self.hide();
        }
        removed
    }

    pub fn clear_items(&mut self) -> Vec<OptionWidget<D>> {
        self.select.clear_items()
    }

    /// Select `item` and close the menu.
    ///
    /// Selecting an item plays the flash first; the menu is disabled until it
    /// finishes. Selecting nothing hides immediately.
    pub fn select_item(&mut self, item: Option<NodeId>) {
        self.select.select_item(item);
        if self.select.is_disabled() {
            return;
        }
        match item {
            Some(node) => {
                self.select.set_disabled(true);
                if let Some(option) = self.select.item(node) {
                    option.show_highlight(false);
                }
                self.flash = Flash::Off(node);
                self.flash_timer.start(self.flash_interval);
            }
            None => self.hide(),
        }
    }

    /// Advance the selection flash.
    pub fn update(&mut self, dt: Duration) {
        if !self.flash_timer.advance(dt) {
            return;
        }
        match self.flash {
            Flash::Off(node) => {
                if let Some(option) = self.select.item(node) {
                    option.show_highlight(true);
                }
                self.flash = Flash::On;
                self.flash_timer.start(self.flash_interval);
            }
            Flash::On => {
                self.flash = Flash::Idle;
                self.hide();
                self.select.set_disabled(false);
            }
            Flash::Idle => {}
        }
    }

    /// Show the menu if it has any items.
    pub fn show(&mut self) {
        if self.select.is_empty() {
            return;
        }
        let element = self.select.element();
        let document = element.document().clone();
        element.show();
        self.visible = true;

        if self.key_listener.is_none() {
            let target = match self.config.input {
                Some(input) => ListenTarget::Node(input),
                None => ListenTarget::Window,
            };
            self.key_listener = Some(document.listen(target, ListenKind::KeyDown));
        }
        if self.is_isolated() && self.previous_focus.is_none() {
            self.previous_focus = document.focused();
            element.focus();
        }
        if self.config.anchor.is_some() {
            self.position();
            if self.resize_listener.is_none() {
                self.resize_listener = Some(document.listen(ListenTarget::Window, ListenKind::Resize));
            }
        }
        self.clippable.set_clipping(true);
    }

    pub fn hide(&mut self) {
        let element = self.select.element();
        let document = element.document().clone();
        element.hide();
        self.visible = false;

        if let Some(listener) = self.key_listener.take() {
            document.unlisten(listener);
        }
        if let Some(listener) = self.resize_listener.take() {
            document.unlisten(listener);
        }
        if self.is_isolated()
            && let Some(previous) = self.previous_focus.take()
        {
            document.focus(previous);
        }
        self.clippable.set_clipping(false);
    }

    pub fn toggle(&mut self, show: bool) {
        if show {
            self.show();
        } else {
            self.hide();
        }
    }

    /// Place the menu directly below its anchor with the anchor's width.
    pub fn position(&mut self) {
        let Some(anchor) = self.config.anchor else {
            return;
        };
        let element = self.select.element();
        let bounds = element.document().bounding_box(anchor);
        element.set_style("left", Some(&format!("{}px", bounds.x)));
        element.set_style("top", Some(&format!("{}px", bounds.y + bounds.height)));
        element.set_style("width", Some(&format!("{}px", bounds.width)));
    }

    /// Viewport resized or the scroll container scrolled.
    pub fn handle_resize(&mut self) {
        if !self.visible {
            return;
        }
        self.position();
        self.clippable.clip();
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if !self.visible || self.select.is_disabled() {
            return false;
        }
        let current = self
            .select
            .highlighted_item()
            .or_else(|| self.select.selected_item());

        let next = match event.key {
            Key::Enter => {
                self.select_item(current);
                return true;
            }
            Key::Up => self.select.relative_selectable_item(current, Direction::Backward),
            Key::Down => self.select.relative_selectable_item(current, Direction::Forward),
            Key::Escape => {
                if let Some(node) = current
                    && let Some(option) = self.select.item_mut(node)
                {
                    option.set_highlighted(false);
                }
                self.hide();
                return true;
            }
            _ => return false,
        };

        if next.is_some() {
            trace!("Menu highlight moved");
            self.select.highlight_item(next);
        }
        true
    }

    /// Pointer input; a release commits through the flashing [`select_item`](Self::select_item).
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let (handled, commit) = self.select.track_pointer(event);
        if commit.is_some() {
            self.select_item(commit);
        }
        handled
    }

    pub fn destroy(mut self) {
        self.hide();
        self.select.destroy();
    }
}

impl<D: OptionValue> Widget for MenuWidget<D> {
    fn base(&self) -> &WidgetBase {
        self.select.base()
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        self.select.base_mut()
    }

    fn debug_name(&self) -> &str {
        "MenuWidget"
    }

    fn as_clippable(&self) -> Option<&Clippable> {
        Some(&self.clippable)
    }

    fn as_clippable_mut(&mut self) -> Option<&mut Clippable> {
        Some(&mut self.clippable)
    }
}
