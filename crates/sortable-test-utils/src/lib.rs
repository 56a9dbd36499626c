//! Test utilities for the sortable drag-and-drop engine.
//!
//! The engine only talks to a document through
//! [`DomHost`](sortable::host::DomHost). This crate provides `MockDom`, an
//! in-memory document tree implementing it, so engine behaviour can be
//! tested and benchmarked without a browser.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use sortable::host::DomHost;
//! use sortable_core::geometry::ClientRect;
//! use sortable_test_utils::MockDom;
//!
//! let dom = MockDom::new();
//! let list = dom.append(dom.body(), ClientRect::new(0.0, 0.0, 100.0, 300.0));
//! let item = dom.append(list, ClientRect::new(0.0, 0.0, 100.0, 30.0));
//!
//! assert!(dom.contains(list, item));
//! assert_eq!(dom.children(list), vec![item]);
//! # }
//! ```
//!
//! # Design
//!
//! `DomHost` methods take `&self`, so the mock keeps its tree behind a
//! `parking_lot::Mutex` and records every mutating call for assertions.
//! Geometry is static: rects only change when a test sets them, which keeps
//! expectations about cached geometry exact.

#[cfg(feature = "mock")]
pub mod mock_dom;

#[cfg(feature = "mock")]
pub use mock_dom::*;
