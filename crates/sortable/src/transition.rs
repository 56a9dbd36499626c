//! Pending drop animations.
//!
//! When an item is released over a list its preview transitions to the
//! placeholder before the drop is committed. The wait ends on whichever comes
//! first: the host reporting `transitionend` for the preview's `transform`,
//! or [`DragDropSystem::tick`](crate::DragDropSystem::tick) passing the
//! deadline. Disposal cancels it.

use std::time::{Duration, Instant};

use crate::config::TRANSITION_TIMEOUT_FACTOR;
use crate::host::NodeId;
use crate::styling::TRANSFORM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTransition {
    preview: NodeId,
    deadline: Instant,
}

impl PreviewTransition {
    /// Wait for `preview`, giving up after [`TRANSITION_TIMEOUT_FACTOR`]
    /// times the measured duration.
    pub fn new(preview: NodeId, started: Instant, duration: Duration) -> Self {
        Self {
            preview,
            deadline: started + duration.mul_f32(TRANSITION_TIMEOUT_FACTOR),
        }
    }

    pub fn preview(&self) -> NodeId {
        self.preview
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Whether a `transitionend` for `node`/`property` finishes this wait.
    pub fn is_finished_by(&self, node: NodeId, property: &str) -> bool {
        node == self.preview && property == TRANSFORM
    }

    pub fn has_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}
