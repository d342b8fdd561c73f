//! Typed notification channels and the input events hosts deliver to widgets.
//!
//! # Notifications
//!
//! Every widget owns one [`Emitter`] per event enum. Subscribers are plain
//! closures called synchronously, in subscription order, before `emit` returns.
//! Destroying a widget clears its emitters.
//!
//! ```ignore
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let sink = log.clone();
//! let id = select.events_mut().subscribe(move |event| sink.lock().push(event.clone()));
//! select.select_item(Some(node));
//! select.events_mut().unsubscribe(id);
//! ```
//!
//! # Input
//!
//! Hosts translate native input into [`PointerEvent`] and [`KeyEvent`] and call
//! the `handle_pointer` / `handle_key` methods of the widgets that registered a
//! listener. Handlers return `true` when they consumed the event.

use std::fmt;

use trellis_core::NodeId;
use trellis_core::math::Vec2;

/// Identifies one subscription on an [`Emitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Synchronous publish/subscribe channel for one event type.
pub struct Emitter<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    next_id: u64,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a listener; it stays registered until [`unsubscribe`](Self::unsubscribe) or [`clear`](Self::clear).
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&E) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener in subscription order.
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButtonKind {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    Move,
    /// Pointer entered the target.
    Over,
    /// Pointer left the target.
    Out,
    /// Pointer left the widget that received the event.
    Leave,
}

/// Pointer input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub button: MouseButtonKind,
    /// Deepest node under the pointer, if any.
    pub target: Option<NodeId>,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, target: Option<NodeId>) -> Self {
        Self {
            kind,
            button: MouseButtonKind::Left,
            target,
            position: Vec2::ZERO,
        }
    }

    pub fn down(target: NodeId) -> Self {
        Self::new(PointerKind::Down, Some(target))
    }

    pub fn up(target: NodeId) -> Self {
        Self::new(PointerKind::Up, Some(target))
    }

    pub fn moved(target: NodeId) -> Self {
        Self::new(PointerKind::Move, Some(target))
    }

    pub fn over(target: NodeId) -> Self {
        Self::new(PointerKind::Over, Some(target))
    }

    pub fn out(target: NodeId) -> Self {
        Self::new(PointerKind::Out, Some(target))
    }

    pub fn leave() -> Self {
        Self::new(PointerKind::Leave, None)
    }

    pub fn with_button(mut self, button: MouseButtonKind) -> Self {
        self.button = button;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn is_left(&self) -> bool {
        self.button == MouseButtonKind::Left
    }
}

/// Keys the framework reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Enter,
    End,
    Home,
    Tab,
    PageUp,
    PageDown,
    Escape,
    Shift,
    Space,
    Character(char),
}

impl Key {
    /// Keys that scroll a document when not intercepted.
    pub fn is_scroll_key(&self) -> bool {
        matches!(
            self,
            Key::PageUp | Key::PageDown | Key::End | Key::Home | Key::Left | Key::Up | Key::Right | Key::Down
        )
    }
}

/// Keyboard input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// Whether this is a repeat event.
    pub is_repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            is_repeat: false,
        }
    }
}
