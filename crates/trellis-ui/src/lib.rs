//! Trellis UI - stateful widget composition framework
//!
//! This crate provides reusable interface widgets built on a shared ownership
//! and event model, rendered into any host that implements
//! [`trellis_core::Document`]:
//! - Windows and dialogs with an asynchronous open/close lifecycle
//! - Toolbars whose tools are resolved from a shared registry
//! - Selectable option lists and keyboard-driven menus
//! - Popups positioned and clipped against their scroll container
//! - Autocomplete lookups with request caching and cancellation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trellis_ui::{MenuConfig, MenuWidget, OptionConfig, OptionWidget, UiContext};
//!
//! let ctx = UiContext::new(document);
//! let mut menu = MenuWidget::new(&ctx, MenuConfig::default());
//! menu.add_items(
//!     vec![
//!         OptionWidget::new(&ctx, "cut", OptionConfig::menu_item("Cut")),
//!         OptionWidget::new(&ctx, "copy", OptionConfig::menu_item("Copy")),
//!     ],
//!     None,
//! );
//! menu.show();
//! ```
//!
//! The host owns the event loop: it forwards pointer and key input to the
//! widgets' `handle_*` methods and advances their timers with `update(dt)`.

pub mod clip;
pub mod context;
pub mod element;
pub mod error;
pub mod event;
pub mod group;
pub mod input;
pub mod lookup;
pub mod msg;
pub mod popup;
pub mod select;
pub mod timer;
pub mod tool;
pub mod widget;
pub mod window;

pub use clip::{ClipGeometry, ClipResult, Clippable, compute_clip};
pub use context::UiContext;
pub use element::Element;
pub use error::{UiError, UiResult};
pub use event::{Emitter, Key, KeyEvent, MouseButtonKind, PointerEvent, PointerKind, SubscriptionId};
pub use group::{Group, GroupItem};
pub use input::{TextInput, TextInputConfig, TextInputEvent};
pub use lookup::{Lookup, LookupCoordinator, LookupResponse, LookupStep, LookupWidget};
pub use msg::{DefaultMessages, MessageSource};
pub use popup::{PopupAlign, PopupButtonWidget, PopupConfig, PopupEvent, PopupWidget, Popuppable};
pub use select::{
    Direction, MenuConfig, MenuWidget, OptionConfig, OptionKind, OptionValue, OptionWidget,
    SelectEvent, SelectWidget,
};
pub use timer::Timer;
pub use tool::{
    CommandTool, PopupTool, Tool, ToolAction, ToolDescriptor, ToolEvent, ToolFactory, ToolGroup,
    ToolGroupConfig, ToolGroupKind, ToolSelector, Toolbar, ToolbarConfig, ToolbarEvent,
};
pub use widget::{
    ButtonConfig, ButtonEvent, ButtonWidget, Flags, Icon, Label, Widget, WidgetBase, WidgetId,
};
pub use window::{
    Frame, Window, WindowConfig, WindowContent, WindowData, WindowEvent, WindowFactory, WindowKind,
    WindowParts, WindowSet, WindowSetEvent,
};

// Re-export host types widgets are built against
pub use trellis_core::{Config, Document, NodeId};
