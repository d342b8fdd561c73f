//! Selectable option lists and menus.
//!
//! - [`OptionWidget`]: an item carrying a data value plus `selected` and `highlighted` states
//! - [`SelectWidget`]: ordered options with exclusive selection, exclusive highlight,
//!   data-keyed lookup and circular keyboard-style traversal
//! - [`MenuWidget`]: a select list presented as a clipped overlay with keyboard control

mod menu;
mod option;
#[allow(clippy::module_inception)]
mod select;

pub use menu::{MenuConfig, MenuWidget};
pub use option::{OptionConfig, OptionKind, OptionValue, OptionWidget};
pub use select::{Direction, SelectEvent, SelectWidget};
