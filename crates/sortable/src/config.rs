//! Options for drag items and drop lists.
//!
//! Every option has a default matching common sortable-list behaviour, so
//! `DragDropConfig::default()` is enough to get started. Items and lists copy
//! the relevant half of [`DragDropConfig`] when they are created and may be
//! reconfigured individually afterwards.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use sortable_core::geometry::ClientRect;
use sortable_core::math::Vec2;

use crate::host::NodeId;
use crate::{DragId, DropListId};

/// Proximity band, as a fraction of a list's size, inside which the pointer
/// still counts as over the list for sorting purposes.
pub const DROP_PROXIMITY_THRESHOLD: f32 = 0.05;

/// Proximity band, as a fraction of a node's size, that triggers auto-scroll.
pub const SCROLL_PROXIMITY_THRESHOLD: f32 = 0.05;

/// Mouse events arriving this soon after a touch event are treated as
/// emulated duplicates and ignored.
pub const MOUSE_EVENT_IGNORE_TIME: Duration = Duration::from_millis(800);

/// A preview transition that has not reported completion after this multiple
/// of its measured duration is considered finished.
pub const TRANSITION_TIMEOUT_FACTOR: f32 = 1.5;

/// Axis a drag can be locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragAxis {
    X,
    Y,
}

/// Primary axis along which a list lays out its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Layout direction of a horizontal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Where the drag preview is inserted while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreviewContainer {
    /// The document body.
    #[default]
    Global,
    /// The original parent of the dragged element.
    Parent,
    /// A specific node.
    Element(NodeId),
}

/// Time the pointer must be held before a drag may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragStartDelay {
    pub touch: Duration,
    pub mouse: Duration,
}

impl DragStartDelay {
    pub fn for_input(&self, is_touch: bool) -> Duration {
        if is_touch { self.touch } else { self.mouse }
    }
}

impl From<Duration> for DragStartDelay {
    fn from(delay: Duration) -> Self {
        Self {
            touch: delay,
            mouse: delay,
        }
    }
}

/// Maps the user's pointer position to the position used for dragging.
///
/// Receives the pointer position, the item, the preview's rect and the
/// pickup offset inside the preview.
pub type ConstrainPosition = Rc<dyn Fn(Vec2, DragId, ClientRect, Vec2) -> Vec2>;

/// Decides whether an item may enter a list.
pub type EnterPredicate = Rc<dyn Fn(DragId, DropListId) -> bool>;

/// Decides whether an item may be sorted into an index of a list.
pub type SortPredicate = Rc<dyn Fn(usize, DragId, DropListId) -> bool>;

/// Per-item options.
#[derive(Clone)]
pub struct DragConfig {
    /// Manhattan distance in pixels the pointer has to travel before a drag starts.
    pub drag_start_threshold: f32,
    /// Pixels the pointer has to move against the current direction before
    /// the reported direction flips.
    pub pointer_direction_change_threshold: f32,
    pub drag_start_delay: DragStartDelay,
    pub lock_axis: Option<DragAxis>,
    /// Node the preview is kept inside of.
    pub boundary: Option<NodeId>,
    pub preview_container: PreviewContainer,
    pub disabled: bool,
    pub constrain_position: Option<ConstrainPosition>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_start_threshold: 5.0,
            pointer_direction_change_threshold: 5.0,
            drag_start_delay: DragStartDelay::default(),
            lock_axis: None,
            boundary: None,
            preview_container: PreviewContainer::Global,
            disabled: false,
            constrain_position: None,
        }
    }
}

impl DragConfig {
    pub fn drag_start_threshold(mut self, threshold: f32) -> Self {
        self.drag_start_threshold = threshold;
        self
    }

    pub fn pointer_direction_change_threshold(mut self, threshold: f32) -> Self {
        self.pointer_direction_change_threshold = threshold;
        self
    }

    pub fn drag_start_delay(mut self, delay: impl Into<DragStartDelay>) -> Self {
        self.drag_start_delay = delay.into();
        self
    }

    pub fn lock_axis(mut self, axis: DragAxis) -> Self {
        self.lock_axis = Some(axis);
        self
    }

    pub fn boundary(mut self, node: NodeId) -> Self {
        self.boundary = Some(node);
        self
    }

    pub fn preview_container(mut self, container: PreviewContainer) -> Self {
        self.preview_container = container;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn constrain_position(
        mut self,
        constrain: impl Fn(Vec2, DragId, ClientRect, Vec2) -> Vec2 + 'static,
    ) -> Self {
        self.constrain_position = Some(Rc::new(constrain));
        self
    }
}

impl fmt::Debug for DragConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragConfig")
            .field("drag_start_threshold", &self.drag_start_threshold)
            .field(
                "pointer_direction_change_threshold",
                &self.pointer_direction_change_threshold,
            )
            .field("drag_start_delay", &self.drag_start_delay)
            .field("lock_axis", &self.lock_axis)
            .field("boundary", &self.boundary)
            .field("preview_container", &self.preview_container)
            .field("disabled", &self.disabled)
            .field("constrain_position", &self.constrain_position.is_some())
            .finish()
    }
}

/// Per-list options.
#[derive(Clone)]
pub struct DropListConfig {
    pub orientation: Orientation,
    pub direction: TextDirection,
    /// Axis applied to items dragged inside the list that have no lock of their own.
    pub lock_axis: Option<DragAxis>,
    pub sorting_disabled: bool,
    pub auto_scroll_disabled: bool,
    /// Pixels scrolled per animation frame while auto-scrolling.
    pub auto_scroll_step: f32,
    pub disabled: bool,
    pub enter_predicate: Option<EnterPredicate>,
    pub sort_predicate: Option<SortPredicate>,
}

impl Default for DropListConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            direction: TextDirection::Ltr,
            lock_axis: None,
            sorting_disabled: false,
            auto_scroll_disabled: false,
            auto_scroll_step: 2.0,
            disabled: false,
            enter_predicate: None,
            sort_predicate: None,
        }
    }
}

impl DropListConfig {
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn lock_axis(mut self, axis: DragAxis) -> Self {
        self.lock_axis = Some(axis);
        self
    }

    pub fn sorting_disabled(mut self, disabled: bool) -> Self {
        self.sorting_disabled = disabled;
        self
    }

    pub fn auto_scroll_disabled(mut self, disabled: bool) -> Self {
        self.auto_scroll_disabled = disabled;
        self
    }

    pub fn auto_scroll_step(mut self, step: f32) -> Self {
        self.auto_scroll_step = step;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn enter_predicate(mut self, predicate: impl Fn(DragId, DropListId) -> bool + 'static) -> Self {
        self.enter_predicate = Some(Rc::new(predicate));
        self
    }

    pub fn sort_predicate(
        mut self,
        predicate: impl Fn(usize, DragId, DropListId) -> bool + 'static,
    ) -> Self {
        self.sort_predicate = Some(Rc::new(predicate));
        self
    }

    pub(crate) fn accepts(&self, item: DragId, list: DropListId) -> bool {
        self.enter_predicate
            .as_ref()
            .is_none_or(|predicate| predicate(item, list))
    }

    pub(crate) fn allows_sort(&self, index: usize, item: DragId, list: DropListId) -> bool {
        self.sort_predicate
            .as_ref()
            .is_none_or(|predicate| predicate(index, item, list))
    }
}

impl fmt::Debug for DropListConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropListConfig")
            .field("orientation", &self.orientation)
            .field("direction", &self.direction)
            .field("lock_axis", &self.lock_axis)
            .field("sorting_disabled", &self.sorting_disabled)
            .field("auto_scroll_disabled", &self.auto_scroll_disabled)
            .field("auto_scroll_step", &self.auto_scroll_step)
            .field("disabled", &self.disabled)
            .field("enter_predicate", &self.enter_predicate.is_some())
            .field("sort_predicate", &self.sort_predicate.is_some())
            .finish()
    }
}

/// Defaults applied to newly created items and lists.
#[derive(Debug, Clone, Default)]
pub struct DragDropConfig {
    pub drag: DragConfig,
    pub list: DropListConfig,
}
