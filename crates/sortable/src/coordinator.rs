//! Registry of live items and of the drags in progress.
//!
//! The system routes pointer moves and releases only to items the
//! coordinator reports as dragging, so input is ignored entirely while no
//! sequence is active. A sequence started by touch only listens to touch
//! input and a mouse sequence only to mouse input.

use sortable_core::alloc::IndexSet;

use crate::DragId;
use crate::event::PointerEvent;

#[derive(Debug, Default)]
pub struct DragCoordinator {
    items: IndexSet<DragId>,
    active: IndexSet<DragId>,
    touch_sequence: bool,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_item(&mut self, item: DragId) {
        self.items.insert(item);
    }

    /// Forget an item, ending its drag if one is running.
    pub fn remove_item(&mut self, item: DragId) {
        self.stop_dragging(item);
        self.items.shift_remove(&item);
    }

    pub fn start_dragging(&mut self, item: DragId, is_touch: bool) {
        if !self.items.contains(&item) {
            tracing::warn!(%item, "start_dragging on an unregistered item");
            return;
        }
        if self.active.insert(item) && self.active.len() == 1 {
            self.touch_sequence = is_touch;
            tracing::trace!(%item, is_touch, "pointer streams active");
        }
    }

    pub fn stop_dragging(&mut self, item: DragId) {
        if self.active.shift_remove(&item) && self.active.is_empty() {
            tracing::trace!(%item, "pointer streams idle");
        }
    }

    pub fn is_dragging(&self, item: DragId) -> bool {
        self.active.contains(&item)
    }

    /// Whether any sequence is running, i.e. pointer input must be routed.
    pub fn has_active_drags(&self) -> bool {
        !self.active.is_empty()
    }

    /// Whether the running sequences were started by touch.
    pub fn is_touch_sequence(&self) -> bool {
        self.has_active_drags() && self.touch_sequence
    }

    /// Whether a move or release should reach the running sequences.
    pub fn routes(&self, event: &PointerEvent) -> bool {
        self.has_active_drags() && event.is_touch() == self.touch_sequence
    }

    pub fn active_items(&self) -> impl Iterator<Item = DragId> + '_ {
        self.active.iter().copied()
    }

    pub fn is_registered_item(&self, item: DragId) -> bool {
        self.items.contains(&item)
    }
}
