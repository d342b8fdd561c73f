//! Test utilities for the Trellis widget framework.
//!
//! # Overview
//!
//! - `MockDocument` - in-memory host document that records every call (requires `mock` feature)
//! - `MockRequestSource` - request source whose responses are delivered by the test (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use std::sync::Arc;
//! use trellis_core::RenderTarget;
//! use trellis_test_utils::MockDocument;
//!
//! let document = Arc::new(MockDocument::new());
//! let node = document.create_element("div");
//! document.append_child(document.root(), node);
//!
//! assert!(document.is_attached(node));
//! assert_eq!(document.count_creates(), 1);
//! # }
//! ```
//!
//! # Design
//!
//! Mocks take `&self` everywhere and keep their state behind a
//! `parking_lot::Mutex`, because the capability traits they implement must be
//! `Send + Sync` to be shared as `Arc<dyn Document>`.

#[cfg(feature = "mock")]
pub mod mock_document;
#[cfg(feature = "mock")]
pub mod mock_request;

#[cfg(feature = "mock")]
pub use mock_document::*;
#[cfg(feature = "mock")]
pub use mock_request::*;
