//! Auto-scrolling of a list, its scrollable ancestors or the viewport while
//! the pointer is held near an edge.
//!
//! Scrolling is frame driven: [`AutoScroller`] only records which node to
//! scroll and in which direction; the host calls
//! [`DragDropSystem::animation_frame`](crate::DragDropSystem::animation_frame)
//! once per frame to advance it.

use sortable_core::geometry::ClientRect;
use sortable_core::math::Vec2;
use sortable_core::profiling::profile_function;

use crate::config::{DROP_PROXIMITY_THRESHOLD, SCROLL_PROXIMITY_THRESHOLD, TextDirection};
use crate::host::{DomHost, ScrollMetrics, ScrollTarget};
use crate::position_tracker::ParentPositionTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalScrollDirection {
    #[default]
    None,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalScrollDirection {
    #[default]
    None,
    Left,
    Right,
}

/// Direction the pointer asks `rect` to scroll vertically, ignoring scroll room.
pub fn vertical_scroll_direction(rect: &ClientRect, pointer_y: f32) -> VerticalScrollDirection {
    let threshold = rect.height * SCROLL_PROXIMITY_THRESHOLD;

    if pointer_y >= rect.top - threshold && pointer_y <= rect.top + threshold {
        VerticalScrollDirection::Up
    } else if pointer_y >= rect.bottom() - threshold && pointer_y <= rect.bottom() + threshold {
        VerticalScrollDirection::Down
    } else {
        VerticalScrollDirection::None
    }
}

/// Direction the pointer asks `rect` to scroll horizontally, ignoring scroll room.
pub fn horizontal_scroll_direction(rect: &ClientRect, pointer_x: f32) -> HorizontalScrollDirection {
    let threshold = rect.width * SCROLL_PROXIMITY_THRESHOLD;

    if pointer_x >= rect.left - threshold && pointer_x <= rect.left + threshold {
        HorizontalScrollDirection::Left
    } else if pointer_x >= rect.right() - threshold && pointer_x <= rect.right() + threshold {
        HorizontalScrollDirection::Right
    } else {
        HorizontalScrollDirection::None
    }
}

/// Directions an element can actually scroll given the pointer position.
///
/// A direction is dropped when the element has no room left that way, so the
/// request falls through to an outer scrollable ancestor.
pub fn element_scroll_directions(
    metrics: &ScrollMetrics,
    rect: &ClientRect,
    pointer: Vec2,
    direction: TextDirection,
) -> (VerticalScrollDirection, HorizontalScrollDirection) {
    let vertical = match vertical_scroll_direction(rect, pointer.y) {
        VerticalScrollDirection::Up if metrics.can_scroll_up() => VerticalScrollDirection::Up,
        VerticalScrollDirection::Down if metrics.can_scroll_down() => VerticalScrollDirection::Down,
        _ => VerticalScrollDirection::None,
    };

    let horizontal = match horizontal_scroll_direction(rect, pointer.x) {
        HorizontalScrollDirection::Left if metrics.can_scroll_left(direction) => {
            HorizontalScrollDirection::Left
        }
        HorizontalScrollDirection::Right if metrics.can_scroll_right(direction) => {
            HorizontalScrollDirection::Right
        }
        _ => HorizontalScrollDirection::None,
    };

    (vertical, horizontal)
}

/// Scroll state of one list.
#[derive(Debug, Default)]
pub struct AutoScroller {
    node: Option<ScrollTarget>,
    vertical: VerticalScrollDirection,
    horizontal: HorizontalScrollDirection,
    scrolling: bool,
}

impl AutoScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn scroll_node(&self) -> Option<ScrollTarget> {
        self.node
    }

    pub fn directions(&self) -> (VerticalScrollDirection, HorizontalScrollDirection) {
        (self.vertical, self.horizontal)
    }

    /// Pick the innermost tracked node the pointer wants to scroll, falling
    /// back to the viewport, and start or stop scrolling when that changes.
    pub fn start_scrolling_if_necessary<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        tracker: &ParentPositionTracker,
        pointer: Vec2,
        direction: TextDirection,
    ) {
        profile_function!();
        let mut node = None;
        let mut vertical = VerticalScrollDirection::None;
        let mut horizontal = HorizontalScrollDirection::None;

        for (target, entry) in tracker.iter() {
            let (ScrollTarget::Element(element), Some(rect)) = (target, entry.client_rect) else {
                continue;
            };
            if !rect.is_near(DROP_PROXIMITY_THRESHOLD, pointer.x, pointer.y) {
                continue;
            }
            let metrics = host.scroll_metrics(element);
            let directions = element_scroll_directions(&metrics, &rect, pointer, direction);
            (vertical, horizontal) = directions;
            if vertical != VerticalScrollDirection::None
                || horizontal != HorizontalScrollDirection::None
            {
                node = Some(target);
                break;
            }
        }

        if vertical == VerticalScrollDirection::None
            && horizontal == HorizontalScrollDirection::None
        {
            let size = host.viewport_size();
            let viewport = ClientRect::new(0.0, 0.0, size.x, size.y);
            vertical = vertical_scroll_direction(&viewport, pointer.y);
            horizontal = horizontal_scroll_direction(&viewport, pointer.x);
            node = Some(ScrollTarget::Document);
        }

        if vertical != self.vertical || horizontal != self.horizontal || node != self.node {
            self.vertical = vertical;
            self.horizontal = horizontal;
            self.node = node;

            let wants_scroll = vertical != VerticalScrollDirection::None
                || horizontal != HorizontalScrollDirection::None;
            // Any running loop is stopped before a new one starts.
            self.scrolling = false;
            if wants_scroll {
                tracing::debug!(?node, ?vertical, ?horizontal, "auto-scroll started");
                self.scrolling = true;
            } else {
                tracing::trace!("auto-scroll stopped");
            }
        }
    }

    /// Advance one frame.
    pub fn animation_frame<H: DomHost + ?Sized>(&self, host: &H, step: f32) {
        if !self.scrolling {
            return;
        }
        let Some(node) = self.node else {
            return;
        };

        match self.vertical {
            VerticalScrollDirection::Up => host.scroll_by(node, Vec2::new(0.0, -step)),
            VerticalScrollDirection::Down => host.scroll_by(node, Vec2::new(0.0, step)),
            VerticalScrollDirection::None => {}
        }
        match self.horizontal {
            HorizontalScrollDirection::Left => host.scroll_by(node, Vec2::new(-step, 0.0)),
            HorizontalScrollDirection::Right => host.scroll_by(node, Vec2::new(step, 0.0)),
            HorizontalScrollDirection::None => {}
        }
    }

    /// Stop scrolling and forget the last resolved node.
    pub fn stop(&mut self) {
        if self.scrolling {
            tracing::trace!("auto-scroll stopped");
        }
        *self = Self::default();
    }
}
