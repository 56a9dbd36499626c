//! Sortable - headless drag-and-drop and list sorting
//!
//! This crate drives drag-and-drop over a document it never owns:
//! - Draggable items with handles, start thresholds and delays
//! - Drop lists that sort in place and exchange items with connected lists
//! - Scroll-aware geometry caches and auto-scrolling near edges
//! - Drop animations resolved by transition events or a timeout
//!
//! The document is reached through the [`DomHost`] trait and consumer
//! notifications come back as queued [`DragDropEvent`]s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use sortable::{DragDropSystem, DomHost, NodeId, PointerEvent, DragDropEvent};
//! # use sortable_core::math::Vec2;
//! # fn run<H: DomHost>(host: H, list_node: NodeId, item_nodes: &[NodeId]) {
//! let mut system = DragDropSystem::new(host);
//! let list = system.create_list(list_node);
//! let items: Vec<_> = item_nodes.iter().map(|&node| system.create_item(node)).collect();
//! system.set_list_items(list, items.clone()).unwrap();
//!
//! // Forward input from the host:
//! // system.pointer_down(item, &event);
//! // system.pointer_move(&event);
//! // system.pointer_up(&event);
//! // system.animation_frame();
//!
//! for event in system.drain_events() {
//!     if let DragDropEvent::Dropped { previous_index, current_index, .. } = event {
//!         println!("moved {previous_index} -> {current_index}");
//!     }
//! }
//! # }
//! ```

pub mod auto_scroll;
pub mod config;
pub mod coordinator;
pub mod drag_ref;
pub mod drop_list_ref;
pub mod error;
pub mod event;
pub mod host;
pub mod ids;
pub mod position_tracker;
pub mod preview;
pub mod styling;
pub mod system;
pub mod transition;

pub use auto_scroll::{AutoScroller, HorizontalScrollDirection, VerticalScrollDirection};
pub use config::{
    DragAxis, DragConfig, DragDropConfig, DragStartDelay, DropListConfig, Orientation, PreviewContainer,
    TextDirection,
};
pub use coordinator::DragCoordinator;
pub use drag_ref::{DirectionDelta, DragPhase, DragRef};
pub use drop_list_ref::{DropListRef, ItemPosition};
pub use error::{DragDropError, DragDropResult};
pub use event::{
    DragDropEvent, EventQueue, MouseButton, MouseData, PointerEvent, PointerKind, ScrollEvent, TouchData,
    TouchPoint,
};
pub use host::{DomHost, NodeId, ScrollMetrics, ScrollTarget};
pub use ids::{DragId, DropListId};
pub use position_tracker::ParentPositionTracker;
pub use preview::{CloneFactory, PreviewFactory};
pub use system::DragDropSystem;
pub use transition::PreviewTransition;

// Re-export core types consumers need to build events and hosts
pub use sortable_core::geometry::{ClientRect, ScrollPosition};
pub use sortable_core::math::Vec2;
