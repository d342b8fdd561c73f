//! Windows, dialogs and mutually exclusive window sets.
//!
//! A [`Window`] owns a [`Frame`] that loads once, asynchronously. Content is
//! supplied through the [`WindowContent`] hooks. A [`WindowSet`] creates
//! windows by name from a [`WindowFactory`] and keeps at most one of them open.

mod frame;
mod set;
#[allow(clippy::module_inception)]
mod window;

pub use frame::{Frame, FrameState};
pub use set::{WindowFactory, WindowSet, WindowSetEvent};
pub use window::{
    Window, WindowConfig, WindowContent, WindowData, WindowEvent, WindowKind, WindowParts,
};
