//! Handles for registered drag items and drop lists.
//!
//! Both are thin wrappers over a generational arena [`Handle`], so a handle
//! kept after `destroy_item`/`destroy_list` never resolves to whatever later
//! reuses the slot.

use std::fmt;

use sortable_core::alloc::Handle;

/// Identifies a draggable item registered with a [`DragDropSystem`](crate::DragDropSystem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DragId(pub(crate) Handle);

/// Identifies a drop list registered with a [`DragDropSystem`](crate::DragDropSystem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DropListId(pub(crate) Handle);

impl DragId {
    pub const fn handle(&self) -> Handle {
        self.0
    }
}

impl DropListId {
    pub const fn handle(&self) -> Handle {
        self.0
    }
}

impl fmt::Display for DragId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DragId({}v{})", self.0.index(), self.0.generation())
    }
}

impl fmt::Display for DropListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DropListId({}v{})", self.0.index(), self.0.generation())
    }
}
