//! Tool composition.
//!
//! A [`ToolFactory`] holds tool descriptors shared across toolbars. Each
//! [`Toolbar`] owns [`ToolGroup`]s that resolve include/exclude/promote/demote
//! selector lists against the factory and keep live [`Tool`] instances in sync
//! with it. A tool name is reserved by at most one group per toolbar.

mod factory;
mod group;
#[allow(clippy::module_inception)]
mod tool;
mod toolbar;

pub use factory::{Registrations, ToolDescriptor, ToolFactory, ToolSelector, ToolTitle, selectors};
pub use group::{ToolGroup, ToolGroupConfig, ToolGroupKind, ToolReservations};
pub use tool::{CommandTool, PopupTool, Tool, ToolAction, ToolCore, ToolEvent, TooltipParts};
pub use toolbar::{Toolbar, ToolbarConfig, ToolbarEvent};
