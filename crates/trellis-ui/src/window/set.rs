use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::context::UiContext;
use crate::element::Element;
use crate::error::{UiError, UiResult};
use crate::event::{Emitter, KeyEvent, PointerEvent};
use crate::window::window::{Window, WindowData};

type WindowConstructor = Arc<dyn Fn(&UiContext) -> Window + Send + Sync>;

/// Registry of window constructors keyed by symbolic name.
#[derive(Clone, Default)]
pub struct WindowFactory {
    constructors: IndexMap<String, WindowConstructor>,
}

impl WindowFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `name`, replacing any previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&UiContext) -> Window + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    pub fn lookup(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn create(&self, name: &str, ctx: &UiContext) -> UiResult<Window> {
        match self.constructors.get(name) {
            Some(constructor) => Ok(constructor(ctx)),
            None => Err(UiError::UnknownWindow {
                name: name.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for WindowFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowFactory")
            .field("names", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Lifecycle notifications of a [`WindowSet`], tagged with the window name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSetEvent {
    Opening { name: String, data: WindowData },
    Open { name: String, data: WindowData },
    Closing { name: String, data: WindowData },
    Close { name: String, data: WindowData },
}

/// Mutually exclusive windows created on first reference.
///
/// Opening a window closes the current one first, immediately and without
/// any dialog delay, so its `Closing`/`Close` notifications precede the new
/// window's `Opening`.
pub struct WindowSet {
    ctx: UiContext,
    element: Element,
    factory: WindowFactory,
    windows: IndexMap<String, Window>,
    current: Option<String>,
    events: Emitter<WindowSetEvent>,
}

impl WindowSet {
    pub fn new(ctx: &UiContext, factory: WindowFactory) -> Self {
        let element = Element::with_class(ctx.document().clone(), "div", "trellis-window-set");
        Self {
            ctx: ctx.clone(),
            element,
            factory,
            windows: IndexMap::new(),
            current: None,
            events: Emitter::new(),
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn events_mut(&mut self) -> &mut Emitter<WindowSetEvent> {
        &mut self.events
    }

    /// Name of the window currently open in this set.
    pub fn current_window(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Window with `name`, creating it and starting its frame load on first reference.
    pub fn window(&mut self, name: &str) -> UiResult<&mut Window> {
        if !self.windows.contains_key(name) {
            if !self.factory.lookup(name) {
                warn!("Unknown window: {}", name);
                return Err(UiError::UnknownWindow {
                    name: name.to_string(),
                });
            }
            let window = self.factory.create(name, &self.ctx)?;
            self.element.append(window.element());
            debug!("Created window {}", name);
            self.windows.insert(name.to_string(), window);
        }
        self.windows
            .get_mut(name)
            .ok_or_else(|| UiError::UnknownWindow {
                name: name.to_string(),
            })
    }

    /// Already-created window with `name`.
    pub fn get(&self, name: &str) -> Option<&Window> {
        self.windows.get(name)
    }

    /// Open `name`. Returns `Ok(false)` when the window ignored the request.
    pub fn open(&mut self, name: &str, data: WindowData) -> UiResult<bool> {
        let window = self.window(name)?;
        if !window.begin_open(data.clone()) {
            return Ok(false);
        }
        if window.ready_to_open() {
            self.finish_open(name, data);
        }
        Ok(true)
    }

    /// Close `name`. Returns `Ok(false)` when the window ignored the request.
    pub fn close(&mut self, name: &str, data: WindowData) -> UiResult<bool> {
        let closed = self.window(name)?.close(data);
        self.collect_closes();
        Ok(closed)
    }

    /// Host reports that the frame of `name` finished loading.
    pub fn frame_loaded(&mut self, name: &str) -> UiResult<()> {
        let window = self.window(name)?;
        window.initialize_frame();
        if window.ready_to_open() {
            let data = window.pending_open_data().cloned().unwrap_or_default();
            self.finish_open(name, data);
        }
        Ok(())
    }

    /// Advance timers of every window.
    pub fn update(&mut self, dt: Duration) {
        for window in self.windows.values_mut() {
            window.update(dt);
        }
        self.collect_closes();
    }

    /// Forward a key press to the current window.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let Some(window) = self.current.as_ref().and_then(|name| self.windows.get_mut(name)) else {
            return false;
        };
        let handled = window.handle_key(event);
        self.collect_closes();
        handled
    }

    /// Forward pointer input to the current window.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let Some(window) = self.current.as_ref().and_then(|name| self.windows.get_mut(name)) else {
            return false;
        };
        let handled = window.handle_pointer(event);
        self.collect_closes();
        handled
    }

    fn finish_open(&mut self, name: &str, data: WindowData) {
        if let Some(current) = self.current.clone()
            && current != name
            && let Some(previous) = self.windows.get_mut(&current)
        {
            debug!("Closing {} before opening {}", current, name);
            previous.close_immediately(WindowData::new());
            self.collect_closes();
        }
        self.current = Some(name.to_string());
        self.events.emit(&WindowSetEvent::Opening {
            name: name.to_string(),
            data: data.clone(),
        });
        if let Some(window) = self.windows.get_mut(name) {
            window.finish_open();
        }
        self.events.emit(&WindowSetEvent::Open {
            name: name.to_string(),
            data,
        });
    }

    /// Report closes completed by the windows since the last check.
    fn collect_closes(&mut self) {
        let mut closed = Vec::new();
        for (name, window) in self.windows.iter_mut() {
            if let Some(data) = window.take_completed_close() {
                closed.push((name.clone(), data));
            }
        }
        for (name, data) in closed {
            if self.current.as_deref() == Some(name.as_str()) {
                self.current = None;
            }
            self.events.emit(&WindowSetEvent::Closing {
                name: name.clone(),
                data: data.clone(),
            });
            self.events.emit(&WindowSetEvent::Close { name, data });
        }
    }

    pub fn destroy(mut self) {
        self.events.clear();
        self.current = None;
        for (_, window) in self.windows.drain(..) {
            window.destroy();
        }
        self.element.destroy();
    }
}

impl std::fmt::Debug for WindowSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSet")
            .field("windows", &self.windows.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}
