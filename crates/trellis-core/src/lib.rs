//! Trellis Core
//!
//! Shared foundations for the Trellis widget framework: the capabilities a host
//! environment must provide (render target, geometry queries, event sources and
//! cancellable requests), geometry primitives, configuration and logging setup.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod host;
pub mod io;
pub mod logging;
pub mod math;

pub use config::Config;
pub use host::{
    Document, EventSource, GeometrySource, ListenKind, ListenTarget, ListenerId, NodeId,
    RenderTarget,
};
pub use io::{Request, RequestError, RequestSource};
