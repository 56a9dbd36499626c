//! Sortable Core
//!
//! Math, geometry and collection foundations shared by the Sortable
//! drag-and-drop engine.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
