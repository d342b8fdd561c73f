use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace};
use trellis_core::{ListenKind, ListenTarget, ListenerId};

use crate::context::UiContext;
use crate::element::Element;
use crate::event::{Emitter, Key, KeyEvent, PointerEvent, PointerKind};
use crate::timer::Timer;
use crate::widget::{ButtonConfig, ButtonWidget, Widget};
use crate::window::frame::Frame;

/// Key/value payload passed to `open` and `close` and forwarded to content hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowData {
    values: IndexMap<String, String>,
}

impl WindowData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload used when a window is dismissed by Escape or its close button.
    pub fn cancel() -> Self {
        Self::new().with("action", "cancel")
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn action(&self) -> Option<&str> {
        self.get("action")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lifecycle notifications of a [`Window`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// The frame finished loading and the chrome was built. Fired once.
    Initialize,
    Opening(WindowData),
    Open(WindowData),
    Closing(WindowData),
    Close(WindowData),
}

/// Behavior preset of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    #[default]
    Plain,
    /// Delayed close with a `closing` class, Escape and close-button dismissal,
    /// and scroll blocking while open.
    Dialog,
}

/// Configuration for a [`Window`].
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub kind: WindowKind,
    /// Symbolic icon name shown in the head.
    pub icon: String,
    /// Hide the foot area (dialogs).
    pub footless: bool,
    /// Use the small frame size (dialogs).
    pub small: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            kind: WindowKind::Plain,
            icon: "window".to_string(),
            footless: false,
            small: false,
        }
    }
}

impl WindowConfig {
    pub fn dialog() -> Self {
        Self {
            kind: WindowKind::Dialog,
            ..Default::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn footless(mut self) -> Self {
        self.footless = true;
        self
    }

    pub fn small(mut self) -> Self {
        self.small = true;
        self
    }
}

/// Areas of a loaded window that content populates.
#[derive(Debug, Clone, Copy)]
pub struct WindowParts<'a> {
    pub ctx: &'a UiContext,
    pub head: &'a Element,
    pub body: &'a Element,
    pub foot: &'a Element,
    pub overlay: &'a Element,
}

/// Content hooks of a window.
///
/// `initialize` runs once, when the frame has loaded. `setup` runs on every
/// open between the `Opening` and `Open` notifications, `teardown` on every
/// close between `Closing` and `Close`.
pub trait WindowContent: Send {
    /// Message key of the window title.
    fn title_message(&self) -> Option<&str> {
        None
    }

    fn initialize(&mut self, _parts: &WindowParts<'_>) {}

    fn setup(&mut self, _parts: &WindowParts<'_>, _data: &WindowData) {}

    fn teardown(&mut self, _parts: &WindowParts<'_>, _data: &WindowData) {}

    fn destroy(&mut self) {}
}

impl WindowContent for () {}

/// Elements built inside the frame once it loads.
#[derive(Debug)]
struct Chrome {
    head: Element,
    title: Element,
    body: Element,
    foot: Element,
    overlay: Element,
    close_button: Option<ButtonWidget>,
}

impl Chrome {
    fn parts<'a>(&'a self, ctx: &'a UiContext) -> WindowParts<'a> {
        WindowParts {
            ctx,
            head: &self.head,
            body: &self.body,
            foot: &self.foot,
            overlay: &self.overlay,
        }
    }
}

/// A content region with an asynchronous open/close lifecycle.
///
/// States run `closed -> opening -> open -> closing -> closed`. `open` is
/// ignored unless fully closed; `close` is ignored unless open and idle. An
/// open requested before the frame has loaded completes when the host calls
/// [`frame_loaded`](Self::frame_loaded).
pub struct Window {
    ctx: UiContext,
    element: Element,
    frame_box: Element,
    frame: Frame,
    chrome: Option<Chrome>,
    content: Box<dyn WindowContent>,
    config: WindowConfig,
    visible: bool,
    opening: bool,
    closing: bool,
    pending_open: Option<WindowData>,
    pending_close: Option<WindowData>,
    close_timer: Timer,
    close_delay: Duration,
    completed_close: Option<WindowData>,
    dialog_listeners: Vec<ListenerId>,
    events: Emitter<WindowEvent>,
}

impl Window {
    /// Create a window and start loading its frame.
    pub fn new(ctx: &UiContext, content: Box<dyn WindowContent>, config: WindowConfig) -> Self {
        let element = Element::with_class(ctx.document().clone(), "div", "trellis-window");
        let frame_box = Element::with_class(ctx.document().clone(), "div", "trellis-window-frame");
        let mut frame = Frame::new(ctx);

        element.append(&frame_box);
        frame_box.append(frame.element());
        element.hide();
        if config.kind == WindowKind::Dialog {
            element.add_class("trellis-dialog");
            if config.small {
                frame_box.add_class("trellis-window-frame-small");
            }
        }
        frame.load();

        Self {
            ctx: ctx.clone(),
            element,
            frame_box,
            frame,
            chrome: None,
            content,
            close_delay: ctx.config().dialog_close_delay,
            config,
            visible: false,
            opening: false,
            closing: false,
            pending_open: None,
            pending_close: None,
            close_timer: Timer::idle(),
            completed_close: None,
            dialog_listeners: Vec::new(),
            events: Emitter::new(),
        }
    }

    pub fn events_mut(&mut self) -> &mut Emitter<WindowEvent> {
        &mut self.events
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn content(&self) -> &dyn WindowContent {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn WindowContent {
        self.content.as_mut()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_opening(&self) -> bool {
        self.opening
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Head, body, foot and overlay areas; `None` until the frame has loaded.
    pub fn parts(&self) -> Option<WindowParts<'_>> {
        self.chrome.as_ref().map(|chrome| chrome.parts(&self.ctx))
    }

    /// Resolved title message, empty without one.
    pub fn title(&self) -> String {
        self.content
            .title_message()
            .map(|key| self.ctx.msg(key, &[]))
            .unwrap_or_default()
    }

    /// Show `custom` as the title, or the default title.
    pub fn set_title(&mut self, custom: Option<&str>) {
        let title = match custom {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self.title(),
        };
        if let Some(chrome) = &self.chrome {
            chrome.title.set_text(&title);
        }
    }

    /// Size the frame; `None` means automatic. Ignored until the frame has loaded.
    pub fn set_size(&mut self, width: Option<f32>, height: Option<f32>) {
        if !self.frame.is_loaded() {
            return;
        }
        let css = |value: Option<f32>| value.map_or_else(|| "auto".to_string(), |v| format!("{}px", v));
        self.frame.element().set_style("width", Some(&css(width)));
        self.frame.element().set_style("height", Some(&css(height)));
    }

    pub fn set_position(&mut self, left: f32, top: f32) {
        self.element.set_style("left", Some(&format!("{}px", left)));
        self.element.set_style("top", Some(&format!("{}px", top)));
    }

    /// Size the frame height to its content, bounded by `min` and `max`.
    pub fn fit_height_to_contents(&mut self, min: f32, max: Option<f32>) -> f32 {
        let natural = self.frame.content().document().scroll_size(self.frame.content().node()).height;
        let height = fit(natural, min, max);
        self.frame.element().set_style("height", Some(&format!("{}px", height)));
        height
    }

    /// Size the frame width to its content, bounded by `min` and `max`.
    pub fn fit_width_to_contents(&mut self, min: f32, max: Option<f32>) -> f32 {
        let natural = self.frame.content().document().scroll_size(self.frame.content().node()).width;
        let width = fit(natural, min, max);
        self.frame.element().set_style("width", Some(&format!("{}px", width)));
        width
    }

    /// Open the window. Returns `false` when ignored because the window is not fully closed.
    pub fn open(&mut self, data: WindowData) -> bool {
        if !self.begin_open(data) {
            return false;
        }
        if self.ready_to_open() {
            self.finish_open();
        }
        true
    }

    /// Close the window. Returns `false` when ignored because the window is not open and idle.
    ///
    /// Dialogs keep a `closing` class for the configured delay before closing;
    /// the host advances the delay through [`update`](Self::update).
    pub fn close(&mut self, data: WindowData) -> bool {
        if self.opening || self.closing || !self.visible {
            trace!("Ignoring close of window that is not open");
            return false;
        }
        self.closing = true;
        match self.config.kind {
            WindowKind::Dialog => {
                self.element.add_class("trellis-dialog-closing");
                self.pending_close = Some(data);
                self.close_timer.start(self.close_delay);
            }
            WindowKind::Plain => self.finish_close(data),
        }
        true
    }

    /// Host reports that the frame finished loading.
    pub fn frame_loaded(&mut self) {
        self.initialize_frame();
        if self.ready_to_open() {
            self.finish_open();
        }
    }

    /// Advance the dialog close delay.
    pub fn update(&mut self, dt: Duration) {
        if self.close_timer.advance(dt) {
            self.element.remove_class("trellis-dialog-closing");
            let data = self.pending_close.take().unwrap_or_default();
            self.finish_close(data);
        }
    }

    /// Dialog keys: Escape closes, scroll keys are swallowed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.config.kind != WindowKind::Dialog || !self.visible {
            return false;
        }
        match event.key {
            Key::Escape => {
                self.close(WindowData::cancel());
                true
            }
            key => key.is_scroll_key(),
        }
    }

    /// Whether a scroll event must be blocked from reaching the page.
    pub fn handle_scroll(&mut self) -> bool {
        self.config.kind == WindowKind::Dialog && self.visible
    }

    /// Route pointer input to the close button of a dialog.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let Some(button) = self.chrome.as_mut().and_then(|c| c.close_button.as_mut()) else {
            return false;
        };
        let on_button = event.target.is_some_and(|t| button.element().contains(t));
        if !on_button && !button.is_pressed() {
            return false;
        }
        let was_pressed = button.is_pressed();
        let handled = button.handle_pointer(event);
        if event.kind == PointerKind::Up && was_pressed && on_button && event.is_left() {
            self.close(WindowData::cancel());
        }
        handled
    }

    pub(crate) fn begin_open(&mut self, data: WindowData) -> bool {
        if self.opening || self.closing || self.visible {
            trace!("Ignoring open of window that is not closed");
            return false;
        }
        self.opening = true;
        self.element.show();
        self.visible = true;
        self.pending_open = Some(data);
        true
    }

    pub(crate) fn pending_open_data(&self) -> Option<&WindowData> {
        self.pending_open.as_ref()
    }

    pub(crate) fn ready_to_open(&self) -> bool {
        self.opening && self.pending_open.is_some() && self.frame.is_loaded()
    }

    /// Build the chrome and run `initialize` the first time the frame reports loaded.
    pub(crate) fn initialize_frame(&mut self) -> bool {
        if !self.frame.loaded() {
            return false;
        }
        let ctx = &self.ctx;
        let content_area = self.frame.content();
        let make = |class: &str| Element::with_class(ctx.document().clone(), "div", class);

        let head = make("trellis-window-head");
        let icon = make("trellis-window-icon");
        icon.add_class(&format!("trellis-icon-{}", self.config.icon));
        let title = make("trellis-window-title");
        let body = make("trellis-window-body");
        let foot = make("trellis-window-foot");
        let overlay = make("trellis-window-overlay");

        head.append(&icon);
        head.append(&title);
        content_area.append(&head);
        content_area.append(&body);
        content_area.append(&foot);
        content_area.append(&overlay);

        let close_button = (self.config.kind == WindowKind::Dialog).then(|| {
            let button = ButtonWidget::new(
                ctx,
                ButtonConfig::icon("close").with_title(ctx.msg("trellis-dialog-action-close", &[])),
            );
            button.element().add_class("trellis-window-closeButton");
            head.append(button.element());
            content_area.add_class("trellis-dialog-content");
            if self.config.footless {
                content_area.add_class("trellis-dialog-content-footless");
            }
            button
        });

        let chrome = Chrome {
            head,
            title,
            body,
            foot,
            overlay,
            close_button,
        };
        let title = self.title();
        if !title.is_empty() {
            chrome.title.set_text(&title);
        }
        self.content.initialize(&chrome.parts(&self.ctx));
        self.chrome = Some(chrome);

        debug!("Window frame initialized");
        self.events.emit(&WindowEvent::Initialize);
        true
    }

    /// Emit `Opening`, run `setup`, emit `Open`.
    pub(crate) fn finish_open(&mut self) {
        let Some(data) = self.pending_open.take() else {
            return;
        };
        self.frame.element().focus();
        self.events.emit(&WindowEvent::Opening(data.clone()));
        if let Some(chrome) = &self.chrome {
            self.content.setup(&chrome.parts(&self.ctx), &data);
        }
        if self.config.kind == WindowKind::Dialog {
            let document = self.ctx.document();
            self.dialog_listeners
                .push(document.listen(ListenTarget::Window, ListenKind::Scroll));
            self.dialog_listeners
                .push(document.listen(ListenTarget::Document, ListenKind::KeyDown));
        }
        self.events.emit(&WindowEvent::Open(data));
        self.opening = false;
        debug!("Window opened");
    }

    /// Close now, skipping any dialog delay. Used when another window of the same set opens.
    pub(crate) fn close_immediately(&mut self, data: WindowData) -> bool {
        if !self.visible || self.opening {
            return false;
        }
        self.close_timer.cancel();
        self.pending_close = None;
        self.element.remove_class("trellis-dialog-closing");
        self.closing = true;
        self.finish_close(data);
        true
    }

    /// Data of the last close that completed since the previous call.
    pub(crate) fn take_completed_close(&mut self) -> Option<WindowData> {
        self.completed_close.take()
    }

    fn finish_close(&mut self, data: WindowData) {
        let document = self.ctx.document().clone();
        if let Some(focused) = document.focused()
            && self.element.contains(focused)
        {
            document.blur(focused);
        }
        self.element.hide();
        self.visible = false;

        self.events.emit(&WindowEvent::Closing(data.clone()));
        if let Some(chrome) = &self.chrome {
            self.content.teardown(&chrome.parts(&self.ctx), &data);
        }
        for listener in self.dialog_listeners.drain(..) {
            document.unlisten(listener);
        }
        self.events.emit(&WindowEvent::Close(data.clone()));
        self.closing = false;
        self.completed_close = Some(data);
        debug!("Window closed");
    }

    pub fn destroy(mut self) {
        self.events.clear();
        let document = self.ctx.document().clone();
        for listener in self.dialog_listeners.drain(..) {
            document.unlisten(listener);
        }
        self.content.destroy();
        if let Some(chrome) = self.chrome.take()
            && let Some(button) = chrome.close_button
        {
            button.destroy();
        }
        self.frame.destroy();
        self.frame_box.destroy();
        self.element.destroy();
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("element", &self.element)
            .field("kind", &self.config.kind)
            .field("visible", &self.visible)
            .field("opening", &self.opening)
            .field("closing", &self.closing)
            .finish_non_exhaustive()
    }
}

fn fit(natural: f32, min: f32, max: Option<f32>) -> f32 {
    let bounded = max.map_or(natural, |max| max.min(natural));
    min.max(bounded)
}
