//! Vector math re-exported from [`glam`].
//!
//! Only the 2D subset is used by the widget framework: pointer positions,
//! scroll offsets and anchor offsets.

pub use glam::{Vec2, vec2};
