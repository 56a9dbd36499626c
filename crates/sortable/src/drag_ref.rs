//! Per-item drag state.
//!
//! A [`DragRef`] tracks one draggable element through
//! `Idle -> Armed -> Dragging -> (Dropping) -> Idle`. It owns everything that
//! only concerns the item itself: pointer math, constraints, transforms and
//! the DOM artifacts created for the drag. Anything that involves a drop list
//! is orchestrated by [`DragDropSystem`](crate::DragDropSystem), which holds
//! the items and lists side by side.

use std::time::Instant;

use sortable_core::alloc::HashSet;
use sortable_core::geometry::{ClientRect, ScrollPosition, clamp};
use sortable_core::math::{Vec2, manhattan_length};

use crate::config::{DragAxis, DragConfig, MOUSE_EVENT_IGNORE_TIME, Orientation};
use crate::event::PointerEvent;
use crate::host::{DomHost, NodeId, ScrollTarget};
use crate::position_tracker::ParentPositionTracker;
use crate::styling;
use crate::transition::PreviewTransition;
use crate::{DragId, DropListId};

/// Last stable movement direction per axis, each in `{-1, 0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectionDelta {
    pub x: i8,
    pub y: i8,
}

impl DirectionDelta {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Component along a list's primary axis.
    pub fn along(&self, orientation: Orientation) -> i8 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}

/// Where an item is in its drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pressed, waiting for the pointer to pass the start threshold.
    Armed,
    Dragging,
    /// Released; the preview is animating back to the placeholder.
    Dropping,
}

#[derive(Debug)]
pub struct DragRef {
    id: DragId,
    root: NodeId,
    owner_svg: Option<NodeId>,
    handles: Vec<NodeId>,
    disabled_handles: HashSet<NodeId>,
    pub(crate) config: DragConfig,

    pub(crate) phase: DragPhase,
    pub(crate) has_moved: bool,

    pub(crate) drop_container: Option<DropListId>,
    pub(crate) initial_container: Option<DropListId>,
    pub(crate) initial_index: usize,

    passive_transform: Vec2,
    active_transform: Vec2,
    /// Inline transform the root had before this item first moved it.
    pub(crate) initial_transform: Option<String>,

    pickup_position_on_page: Vec2,
    pub(crate) pickup_position_in_element: Vec2,
    pointer_position_at_last_direction_change: Vec2,
    pointer_direction_delta: DirectionDelta,
    pub(crate) last_known_pointer_position: Vec2,
    drag_start_time: Option<Instant>,
    pub(crate) last_touch_event_time: Option<Instant>,
    pub(crate) drop_point: Vec2,

    pub(crate) initial_client_rect: Option<ClientRect>,
    boundary_rect: Option<ClientRect>,
    preview_rect: Option<ClientRect>,

    pub(crate) preview: Option<NodeId>,
    pub(crate) placeholder: Option<NodeId>,
    pub(crate) anchor: Option<NodeId>,
    pub(crate) transition: Option<PreviewTransition>,

    pub(crate) parent_positions: ParentPositionTracker,
}

impl DragRef {
    pub(crate) fn new<H: DomHost + ?Sized>(
        host: &H,
        id: DragId,
        root: NodeId,
        config: DragConfig,
    ) -> Self {
        Self {
            id,
            root,
            owner_svg: host.owner_svg_element(root),
            handles: Vec::new(),
            disabled_handles: HashSet::default(),
            config,
            phase: DragPhase::Idle,
            has_moved: false,
            drop_container: None,
            initial_container: None,
            initial_index: 0,
            passive_transform: Vec2::ZERO,
            active_transform: Vec2::ZERO,
            initial_transform: None,
            pickup_position_on_page: Vec2::ZERO,
            pickup_position_in_element: Vec2::ZERO,
            pointer_position_at_last_direction_change: Vec2::ZERO,
            pointer_direction_delta: DirectionDelta::default(),
            last_known_pointer_position: Vec2::ZERO,
            drag_start_time: None,
            last_touch_event_time: None,
            drop_point: Vec2::ZERO,
            initial_client_rect: None,
            boundary_rect: None,
            preview_rect: None,
            preview: None,
            placeholder: None,
            anchor: None,
            transition: None,
            parent_positions: ParentPositionTracker::new(),
        }
    }

    pub fn id(&self) -> DragId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Whether the item passed the start threshold and has not been released.
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn drop_container(&self) -> Option<DropListId> {
        self.drop_container
    }

    pub fn initial_container(&self) -> Option<DropListId> {
        self.initial_container
    }

    pub fn preview(&self) -> Option<NodeId> {
        self.preview
    }

    pub fn placeholder(&self) -> Option<NodeId> {
        self.placeholder
    }

    pub fn handles(&self) -> &[NodeId] {
        &self.handles
    }

    pub fn pointer_direction_delta(&self) -> DirectionDelta {
        self.pointer_direction_delta
    }

    /// The node that currently represents the item inside its list.
    pub fn visible_element(&self) -> NodeId {
        self.placeholder.unwrap_or(self.root)
    }

    /// Transform applied while free dragging, or the persisted one when idle.
    pub fn free_drag_position(&self) -> Vec2 {
        if self.is_dragging() {
            self.active_transform
        } else {
            self.passive_transform
        }
    }

    pub fn is_disabled(&self, container_disabled: bool) -> bool {
        self.config.disabled || container_disabled
    }

    pub(crate) fn set_handles(&mut self, handles: Vec<NodeId>) {
        self.disabled_handles.retain(|handle| handles.contains(handle));
        self.handles = handles;
    }

    pub(crate) fn set_handle_disabled(&mut self, handle: NodeId, disabled: bool) {
        if disabled {
            if self.handles.contains(&handle) {
                self.disabled_handles.insert(handle);
            }
        } else {
            self.disabled_handles.remove(&handle);
        }
    }

    /// Element the press should be measured against, or `None` when the
    /// press has to be ignored because it missed every enabled handle.
    pub(crate) fn reference_element<H: DomHost + ?Sized>(
        &self,
        host: &H,
        target: Option<NodeId>,
    ) -> Option<NodeId> {
        if self.handles.is_empty() {
            return Some(self.root);
        }
        let target = target?;
        let handle = self
            .handles
            .iter()
            .copied()
            .find(|&handle| host.contains(handle, target))?;
        (!self.disabled_handles.contains(&handle)).then_some(handle)
    }

    /// A mouse event that follows a touch on this item too closely to be real.
    pub(crate) fn is_synthetic_mouse_event(&self, event: &PointerEvent) -> bool {
        !event.is_touch()
            && self.last_touch_event_time.is_some_and(|last| {
                event.timestamp.saturating_duration_since(last) < MOUSE_EVENT_IGNORE_TIME
            })
    }

    /// Arm the item for a drag from a press.
    pub(crate) fn initialize_sequence<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        event: &PointerEvent,
    ) {
        self.phase = DragPhase::Armed;
        self.has_moved = false;

        let root_rect = host.client_rect(self.root);
        self.initial_client_rect = Some(root_rect);
        self.boundary_rect = self.config.boundary.map(|boundary| host.client_rect(boundary));

        let scroll = self.viewport_scroll_position(host).to_vec2();
        self.pickup_position_in_element = event.page_position() - scroll - root_rect.position();

        let pointer = self.pointer_position_on_page(host, event);
        self.pickup_position_on_page = pointer;
        self.last_known_pointer_position = pointer;
        self.pointer_direction_delta = DirectionDelta::default();
        self.pointer_position_at_last_direction_change = pointer;
        self.drag_start_time = Some(event.timestamp);
        tracing::trace!(item = %self.id, ?pointer, "armed");
    }

    fn viewport_scroll_position<H: DomHost + ?Sized>(&self, host: &H) -> ScrollPosition {
        self.parent_positions
            .viewport_scroll_position()
            .unwrap_or_else(|| host.viewport_scroll_position())
    }

    /// Pointer position in client coordinates, mapped into the owning SVG's
    /// user units when the item is SVG content.
    pub(crate) fn pointer_position_on_page<H: DomHost + ?Sized>(
        &self,
        host: &H,
        event: &PointerEvent,
    ) -> Vec2 {
        let point = event.page_position() - self.viewport_scroll_position(host).to_vec2();

        self.owner_svg
            .and_then(|svg| host.screen_ctm(svg))
            .map(|matrix| matrix.inverse().transform_point2(point))
            .unwrap_or(point)
    }

    pub(crate) fn is_over_threshold(&self, pointer: Vec2) -> bool {
        manhattan_length(pointer - self.pickup_position_on_page) >= self.config.drag_start_threshold
    }

    pub(crate) fn is_delay_elapsed(&self, event: &PointerEvent) -> bool {
        let delay = self.config.drag_start_delay.for_input(event.is_touch());
        self.drag_start_time
            .is_none_or(|start| event.timestamp.saturating_duration_since(start) >= delay)
    }

    /// Apply the constrain callback, axis locks and the boundary to a pointer
    /// position.
    pub(crate) fn constrained_pointer_position<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        point: Vec2,
        container_lock_axis: Option<DragAxis>,
    ) -> Vec2 {
        let constrain = self.config.constrain_position.clone();
        let initial_rect = self.initial_client_rect.unwrap_or_default();

        let mut position = match &constrain {
            Some(constrain) => constrain(point, self.id, initial_rect, self.pickup_position_in_element),
            None => point,
        };

        // A custom constraint positions the element's corner, not the pointer.
        let pickup_shift = if constrain.is_some() {
            self.pickup_position_in_element
        } else {
            Vec2::ZERO
        };
        if self.config.lock_axis == Some(DragAxis::X) || container_lock_axis == Some(DragAxis::X) {
            position.y = self.pickup_position_on_page.y - pickup_shift.y;
        } else if self.config.lock_axis == Some(DragAxis::Y)
            || container_lock_axis == Some(DragAxis::Y)
        {
            position.x = self.pickup_position_on_page.x - pickup_shift.x;
        }

        if let Some(boundary) = self.boundary_rect {
            let pickup = if constrain.is_some() {
                Vec2::ZERO
            } else {
                self.pickup_position_in_element
            };
            let preview = self.preview_rect(host);
            let min_y = boundary.top + pickup.y;
            let max_y = boundary.bottom() - (preview.height - pickup.y);
            let min_x = boundary.left + pickup.x;
            let max_x = boundary.right() - (preview.width - pickup.x);
            position.x = clamp(position.x, min_x, max_x);
            position.y = clamp(position.y, min_y, max_y);
        }

        position
    }

    /// Rect of the preview, measured on first use and again whenever the
    /// cached one has no size.
    fn preview_rect<H: DomHost + ?Sized>(&mut self, host: &H) -> ClientRect {
        let stale = self.preview_rect.is_none_or(|rect| rect.is_empty());
        if stale {
            self.preview_rect = match self.preview {
                Some(preview) => Some(host.client_rect(preview)),
                None => self.initial_client_rect,
            };
        }
        self.preview_rect.unwrap_or_default()
    }

    pub(crate) fn update_pointer_direction_delta(&mut self, pointer: Vec2) -> DirectionDelta {
        update_direction(
            &mut self.pointer_direction_delta,
            &mut self.pointer_position_at_last_direction_change,
            pointer,
            self.config.pointer_direction_change_threshold,
        )
    }

    pub(crate) fn drag_distance(&self, pointer: Vec2) -> Vec2 {
        pointer - self.pickup_position_on_page
    }

    /// Move the root element by `offset`, on top of its initial transform.
    pub(crate) fn apply_root_transform<H: DomHost + ?Sized>(&mut self, host: &H, offset: Vec2) {
        let initial = self
            .initial_transform
            .get_or_insert_with(|| {
                styling::read_transform(host, self.root)
                    .filter(|value| value != "none")
                    .unwrap_or_default()
            })
            .clone();
        let transform = styling::combine_transforms(&styling::rounded_translate3d(offset), Some(&initial));
        styling::set_transform(host, self.root, &transform);
        if self.owner_svg.is_some() {
            host.set_attribute(self.root, styling::TRANSFORM, &styling::svg_translate(offset));
        }
    }

    /// Place the preview's top left corner at `position`.
    pub(crate) fn apply_preview_transform<H: DomHost + ?Sized>(&self, host: &H, position: Vec2) {
        let Some(preview) = self.preview else {
            return;
        };
        let transform = styling::combine_transforms(
            &styling::rounded_translate3d(position),
            self.initial_transform.as_deref(),
        );
        styling::set_transform(host, preview, &transform);
    }

    /// Move the preview so the pointer keeps its pickup offset inside it.
    pub(crate) fn position_preview<H: DomHost + ?Sized>(&self, host: &H, pointer: Vec2) {
        let position = if self.config.constrain_position.is_some() {
            pointer
        } else {
            pointer - self.pickup_position_in_element
        };
        self.apply_preview_transform(host, position);
    }

    /// Follow the pointer directly, outside of any list.
    pub(crate) fn apply_free_drag<H: DomHost + ?Sized>(&mut self, host: &H, constrained: Vec2) {
        let origin = if self.config.constrain_position.is_some() {
            self.initial_client_rect.unwrap_or_default().position()
        } else {
            self.pickup_position_on_page
        };
        self.active_transform = constrained - origin + self.passive_transform;
        self.apply_root_transform(host, self.active_transform);
    }

    /// Fold the active transform into the passive one at the end of a free drag.
    pub(crate) fn commit_free_drag(&mut self) {
        self.passive_transform = self.active_transform;
        self.active_transform = Vec2::ZERO;
    }

    pub(crate) fn set_free_drag_position<H: DomHost + ?Sized>(&mut self, host: &H, position: Vec2) {
        self.active_transform = Vec2::ZERO;
        self.passive_transform = position;
        if self.drop_container.is_none() {
            self.apply_root_transform(host, position);
        }
    }

    /// Restore the root's initial transform and forget every offset.
    pub(crate) fn reset<H: DomHost + ?Sized>(&mut self, host: &H) {
        let initial = self.initial_transform.clone().unwrap_or_default();
        styling::set_transform(host, self.root, &initial);
        self.active_transform = Vec2::ZERO;
        self.passive_transform = Vec2::ZERO;
    }

    /// Patch pickup position, boundary and free-drag transform after a scroll.
    pub(crate) fn handle_scroll<H: DomHost + ?Sized>(&mut self, host: &H, target: ScrollTarget) {
        let Some(diff) = self.parent_positions.handle_scroll(host, target) else {
            return;
        };

        if let (Some(rect), Some(boundary)) = (self.boundary_rect.as_mut(), self.config.boundary) {
            let contains_boundary = match target {
                ScrollTarget::Document => true,
                ScrollTarget::Element(node) => node != boundary && host.contains(node, boundary),
            };
            if contains_boundary {
                rect.adjust(diff.top, diff.left);
            }
        }

        self.pickup_position_on_page += diff.to_vec2();

        if self.drop_container.is_none() && self.is_dragging() {
            self.active_transform -= diff.to_vec2();
            self.apply_root_transform(host, self.active_transform);
        }
    }

    pub(crate) fn cleanup_cached_dimensions(&mut self) {
        self.boundary_rect = None;
        self.preview_rect = None;
        self.initial_client_rect = None;
        self.parent_positions.clear();
    }
}

/// Flip an axis' direction only after the pointer travelled more than
/// `threshold` pixels from where that axis last changed.
fn update_direction(
    delta: &mut DirectionDelta,
    last_change: &mut Vec2,
    pointer: Vec2,
    threshold: f32,
) -> DirectionDelta {
    if (pointer.x - last_change.x).abs() > threshold {
        delta.x = if pointer.x > last_change.x { 1 } else { -1 };
        last_change.x = pointer.x;
    }
    if (pointer.y - last_change.y).abs() > threshold {
        delta.y = if pointer.y > last_change.y { 1 } else { -1 };
        last_change.y = pointer.y;
    }
    *delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_along_axis() {
        let delta = DirectionDelta::new(1, -1);
        assert_eq!(delta.along(Orientation::Horizontal), 1);
        assert_eq!(delta.along(Orientation::Vertical), -1);
    }

    #[test]
    fn test_direction_ignores_jitter() {
        let mut delta = DirectionDelta::default();
        let mut last = Vec2::new(100.0, 100.0);

        // Within the threshold nothing changes.
        for y in [103.0, 98.0, 104.0, 96.0] {
            assert_eq!(update_direction(&mut delta, &mut last, Vec2::new(100.0, y), 5.0), DirectionDelta::default());
        }

        let moved = update_direction(&mut delta, &mut last, Vec2::new(100.0, 106.0), 5.0);
        assert_eq!(moved, DirectionDelta::new(0, 1));
        assert_eq!(last.y, 106.0);

        // Small move back keeps the downward direction.
        let jitter = update_direction(&mut delta, &mut last, Vec2::new(100.0, 102.0), 5.0);
        assert_eq!(jitter.y, 1);

        let reversed = update_direction(&mut delta, &mut last, Vec2::new(100.0, 100.0), 5.0);
        assert_eq!(reversed.y, -1);
    }

    #[test]
    fn test_direction_axes_are_independent() {
        let mut delta = DirectionDelta::default();
        let mut last = Vec2::ZERO;
        let result = update_direction(&mut delta, &mut last, Vec2::new(-10.0, 3.0), 5.0);
        assert_eq!(result, DirectionDelta::new(-1, 0));
        assert_eq!(last, Vec2::new(-10.0, 0.0));
    }
}
