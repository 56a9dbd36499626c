//! Input events fed to the engine and the events it emits back.

use std::collections::VecDeque;
use std::time::Instant;

use sortable_core::math::Vec2;

use crate::drag_ref::DirectionDelta;
use crate::host::{NodeId, ScrollTarget};
use crate::{DragId, DropListId};

/// Mouse button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseData {
    /// Pointer position relative to the document.
    pub page: Vec2,
    /// Button that changed state.
    pub button: MouseButton,
    /// Bitmask of buttons held while the event fired.
    pub buttons: u16,
    /// Position relative to the target's padding edge, when known.
    pub offset: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: i64,
    pub page: Vec2,
    pub radius: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TouchData {
    pub touches: Vec<TouchPoint>,
    pub changed_touches: Vec<TouchPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerKind {
    Mouse(MouseData),
    Touch(TouchData),
}

/// A pointer press, move or release.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Innermost node the event was dispatched to.
    pub target: Option<NodeId>,
    pub timestamp: Instant,
}

impl PointerEvent {
    /// Primary-button mouse event at a page position.
    pub fn mouse(page: Vec2, target: Option<NodeId>, timestamp: Instant) -> Self {
        Self {
            kind: PointerKind::Mouse(MouseData {
                page,
                button: MouseButton::Left,
                buttons: 1,
                offset: None,
            }),
            target,
            timestamp,
        }
    }

    /// Single-finger touch event at a page position.
    pub fn touch(page: Vec2, target: Option<NodeId>, timestamp: Instant) -> Self {
        let point = TouchPoint {
            identifier: 0,
            page,
            radius: None,
        };
        Self {
            kind: PointerKind::Touch(TouchData {
                touches: vec![point],
                changed_touches: vec![point],
            }),
            target,
            timestamp,
        }
    }

    /// Touch end with no coordinates at all, as some platforms report it.
    pub fn touch_end_without_points(timestamp: Instant) -> Self {
        Self {
            kind: PointerKind::Touch(TouchData::default()),
            target: None,
            timestamp,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        if let PointerKind::Mouse(ref mut mouse) = self.kind {
            mouse.button = button;
        }
        self
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        if let PointerKind::Mouse(ref mut mouse) = self.kind {
            mouse.buttons = buttons;
        }
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        if let PointerKind::Mouse(ref mut mouse) = self.kind {
            mouse.offset = Some(offset);
        }
        self
    }

    pub fn is_touch(&self) -> bool {
        matches!(self.kind, PointerKind::Touch(_))
    }

    /// Page position of the event; `(0, 0)` when a touch event carries no points.
    pub fn page_position(&self) -> Vec2 {
        match &self.kind {
            PointerKind::Mouse(mouse) => mouse.page,
            PointerKind::Touch(touch) => touch
                .touches
                .first()
                .or_else(|| touch.changed_touches.first())
                .map(|point| point.page)
                .unwrap_or(Vec2::ZERO),
        }
    }

    /// Any button other than the primary one.
    pub fn is_auxiliary_button(&self) -> bool {
        match &self.kind {
            PointerKind::Mouse(mouse) => mouse.button != MouseButton::Left,
            PointerKind::Touch(_) => false,
        }
    }

    /// Whether the press was synthesized by a screen reader rather than a
    /// physical pointer.
    pub fn is_fake_from_screen_reader(&self) -> bool {
        match &self.kind {
            PointerKind::Mouse(mouse) => {
                mouse.buttons == 0 || mouse.offset.is_some_and(|offset| offset == Vec2::ZERO)
            }
            PointerKind::Touch(touch) => {
                let Some(point) = touch.touches.first().or_else(|| touch.changed_touches.first())
                else {
                    return false;
                };
                point.identifier == -1
                    && point
                        .radius
                        .is_none_or(|radius| radius.x == 1.0 && radius.y == 1.0)
            }
        }
    }
}

/// A scroll on the document or on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub target: ScrollTarget,
}

impl ScrollEvent {
    pub fn document() -> Self {
        Self {
            target: ScrollTarget::Document,
        }
    }

    pub fn element(node: NodeId) -> Self {
        Self {
            target: ScrollTarget::Element(node),
        }
    }
}

/// Events emitted to the host application.
///
/// `Dropped` is the one event a consumer needs to persist a reorder or a
/// transfer; the engine never mutates application data.
#[derive(Debug, Clone, PartialEq)]
pub enum DragDropEvent {
    /// A press landed on the item; fires even if the sequence never starts.
    BeforeStarted { item: DragId },
    /// The item passed the drag threshold.
    Started { item: DragId },
    /// The pointer was released after dragging.
    Released { item: DragId },
    /// The sequence finished.
    Ended {
        item: DragId,
        distance: Vec2,
        drop_point: Vec2,
    },
    /// The item moved while dragging.
    Moved {
        item: DragId,
        pointer_position: Vec2,
        distance: Vec2,
        delta: DirectionDelta,
    },
    /// The item moved into a container.
    Entered {
        item: DragId,
        container: DropListId,
        current_index: usize,
    },
    /// The item left a container.
    Exited { item: DragId, container: DropListId },
    /// The item's position inside its container changed.
    Sorted {
        item: DragId,
        container: DropListId,
        previous_index: usize,
        current_index: usize,
    },
    /// The item was dropped into a container.
    Dropped {
        item: DragId,
        container: DropListId,
        previous_container: DropListId,
        previous_index: usize,
        current_index: usize,
        is_pointer_over_container: bool,
        distance: Vec2,
        drop_point: Vec2,
    },
}

impl DragDropEvent {
    /// The item the event is about.
    pub fn item(&self) -> DragId {
        match self {
            DragDropEvent::BeforeStarted { item }
            | DragDropEvent::Started { item }
            | DragDropEvent::Released { item }
            | DragDropEvent::Ended { item, .. }
            | DragDropEvent::Moved { item, .. }
            | DragDropEvent::Entered { item, .. }
            | DragDropEvent::Exited { item, .. }
            | DragDropEvent::Sorted { item, .. }
            | DragDropEvent::Dropped { item, .. } => *item,
        }
    }

    /// The container the event is about, if any.
    pub fn container(&self) -> Option<DropListId> {
        match self {
            DragDropEvent::Entered { container, .. }
            | DragDropEvent::Exited { container, .. }
            | DragDropEvent::Sorted { container, .. }
            | DragDropEvent::Dropped { container, .. } => Some(*container),
            _ => None,
        }
    }
}

/// FIFO of emitted events, drained by the host after each input.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<DragDropEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DragDropEvent) {
        tracing::trace!(?event, "emit");
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = DragDropEvent> + '_ {
        self.events.drain(..)
    }
}
