//! Per-list sorting state.
//!
//! A [`DropListRef`] owns the ordering of the items rendered in one
//! container while a drag involves it. When a drag starts it snapshots the
//! rects of its items and scrollable ancestors; from then on sorting only
//! reads and patches those caches and never measures live layout, since
//! elements may be mid-transition.
//!
//! Operations that touch several lists at once (notifying connected lists,
//! handing an item over) live on [`DragDropSystem`](crate::DragDropSystem).

use sortable_core::alloc::{Arena, IndexSet};
use sortable_core::geometry::ClientRect;
use sortable_core::math::Vec2;
use sortable_core::profiling::profile_function;

use crate::auto_scroll::AutoScroller;
use crate::config::{DROP_PROXIMITY_THRESHOLD, DropListConfig, Orientation, TextDirection};
use crate::drag_ref::{DirectionDelta, DragRef};
use crate::event::{DragDropEvent, EventQueue};
use crate::host::{DomHost, NodeId, ScrollTarget};
use crate::position_tracker::ParentPositionTracker;
use crate::styling;
use crate::{DragId, DropListId};

/// Cached geometry of one item while its list is dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPosition {
    pub drag: DragId,
    pub client_rect: ClientRect,
    /// Total distance the item was shifted along the primary axis.
    pub offset: f32,
    /// Inline transform the item had when positions were cached.
    pub initial_transform: String,
}

/// The last swap performed, used to avoid swapping straight back while the
/// pointer is still over the item it just passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PreviousSwap {
    pub drag: Option<DragId>,
    pub delta: i8,
    pub overlaps: bool,
}

/// What a list did with a scroll event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListScroll {
    Ignored,
    /// Caches were patched; these dragging items should be re-sorted.
    Resort(Vec<DragId>),
    Recached,
}

#[derive(Debug)]
pub struct DropListRef {
    id: DropListId,
    element: NodeId,
    pub(crate) config: DropListConfig,

    draggables: Vec<DragId>,
    active_draggables: Vec<DragId>,
    item_positions: Vec<ItemPosition>,

    pub(crate) siblings: Vec<DropListId>,
    active_siblings: IndexSet<DropListId>,
    scrollable_elements: Vec<NodeId>,

    previous_swap: PreviousSwap,
    is_dragging: bool,
    initial_scroll_snap: String,

    parent_positions: ParentPositionTracker,
    /// Outlives `reset`, so a list that stopped dragging can still tell
    /// whether the pointer came back over it.
    client_rect: Option<ClientRect>,
    auto_scroller: AutoScroller,
}

impl DropListRef {
    pub(crate) fn new(id: DropListId, element: NodeId, config: DropListConfig) -> Self {
        Self {
            id,
            element,
            config,
            draggables: Vec::new(),
            active_draggables: Vec::new(),
            item_positions: Vec::new(),
            siblings: Vec::new(),
            active_siblings: IndexSet::default(),
            scrollable_elements: vec![element],
            previous_swap: PreviousSwap::default(),
            is_dragging: false,
            initial_scroll_snap: String::new(),
            parent_positions: ParentPositionTracker::new(),
            client_rect: None,
            auto_scroller: AutoScroller::new(),
        }
    }

    pub fn id(&self) -> DropListId {
        self.id
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn config(&self) -> &DropListConfig {
        &self.config
    }

    /// Items rendered in the list, in DOM order.
    pub fn draggables(&self) -> &[DragId] {
        &self.draggables
    }

    pub fn siblings(&self) -> &[DropListId] {
        &self.siblings
    }

    pub fn scrollable_elements(&self) -> &[NodeId] {
        &self.scrollable_elements
    }

    /// Whether an item is being sorted inside this list.
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Whether a connected list is dragging an item this list may accept.
    pub fn is_receiving(&self) -> bool {
        !self.active_siblings.is_empty()
    }

    /// Cached item geometry, sorted along the primary axis.
    pub fn item_positions(&self) -> &[ItemPosition] {
        &self.item_positions
    }

    /// Cached rect of the list element.
    pub fn client_rect(&self) -> Option<ClientRect> {
        self.client_rect
    }

    pub fn auto_scroller(&self) -> &AutoScroller {
        &self.auto_scroller
    }

    fn is_horizontal(&self) -> bool {
        self.config.orientation == Orientation::Horizontal
    }

    /// Replace the rendered items, returning the previous ones.
    pub(crate) fn set_draggables(&mut self, draggables: Vec<DragId>) -> Vec<DragId> {
        std::mem::replace(&mut self.draggables, draggables)
    }

    pub(crate) fn remove_draggable(&mut self, item: DragId) {
        self.draggables.retain(|&drag| drag != item);
    }

    pub(crate) fn remove_sibling(&mut self, list: DropListId) {
        self.siblings.retain(|&sibling| sibling != list);
        self.active_siblings.shift_remove(&list);
    }

    /// The list element always comes first.
    pub(crate) fn set_scrollable_parents(&mut self, elements: Vec<NodeId>) {
        let mut scrollable = Vec::with_capacity(elements.len() + 1);
        scrollable.push(self.element);
        scrollable.extend(elements.into_iter().filter(|&node| node != self.element));
        self.scrollable_elements = scrollable;
    }

    /// Mark the list as dragging and snapshot its geometry.
    pub(crate) fn dragging_started<H: DomHost + ?Sized>(&mut self, host: &H, items: &Arena<DragRef>) {
        self.is_dragging = true;
        self.initial_scroll_snap = host.style_property(self.element, styling::SCROLL_SNAP_TYPE);
        // Snapping fights programmatic scrolling.
        host.set_style_property(self.element, styling::SCROLL_SNAP_TYPE, "none");
        self.cache_items(host, items);
        tracing::trace!(list = %self.id, items = self.active_draggables.len(), "dragging started");
    }

    /// Rebuild the active items from `draggables` and re-measure them.
    ///
    /// Items handed over from another list are not in `draggables` until the
    /// application commits the drop, so they keep their active slot.
    pub(crate) fn cache_items<H: DomHost + ?Sized>(&mut self, host: &H, items: &Arena<DragRef>) {
        let mut active = self.draggables.clone();
        for (index, &drag) in self.active_draggables.iter().enumerate() {
            let entered = items
                .get(drag.0)
                .is_some_and(|item| item.is_dragging() && item.initial_container != Some(self.id));
            if entered && !active.contains(&drag) {
                active.insert(index.min(active.len()), drag);
            }
        }
        self.active_draggables = active;
        self.cache_item_positions(host, items);
        self.cache_parent_positions(host);
    }

    fn cache_item_positions<H: DomHost + ?Sized>(&mut self, host: &H, items: &Arena<DragRef>) {
        profile_function!();
        let mut positions: Vec<ItemPosition> = self
            .active_draggables
            .iter()
            .filter_map(|&drag| {
                let element = items.get(drag.0)?.visible_element();
                Some(ItemPosition {
                    drag,
                    client_rect: host.client_rect(element),
                    offset: 0.0,
                    initial_transform: styling::read_transform(host, element).unwrap_or_default(),
                })
            })
            .collect();

        if self.is_horizontal() {
            positions.sort_by(|a, b| a.client_rect.left.total_cmp(&b.client_rect.left));
        } else {
            positions.sort_by(|a, b| a.client_rect.top.total_cmp(&b.client_rect.top));
        }
        self.item_positions = positions;
    }

    pub(crate) fn cache_parent_positions<H: DomHost + ?Sized>(&mut self, host: &H) {
        self.parent_positions.cache(host, &self.scrollable_elements);
        self.client_rect = self.parent_positions.client_rect(self.element);
    }

    /// Active items that are past their drag threshold.
    pub(crate) fn dragged_items(&self, items: &Arena<DragRef>) -> Vec<DragId> {
        self.active_draggables
            .iter()
            .copied()
            .filter(|drag| items.get(drag.0).is_some_and(DragRef::is_dragging))
            .collect()
    }

    /// Start accepting items from a dragging sibling, if every one of them
    /// may enter. Returns whether the sibling was added.
    pub(crate) fn start_receiving<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        sibling: DropListId,
        dragged: &[DragId],
    ) -> bool {
        if self.active_siblings.contains(&sibling) {
            return false;
        }
        let accepts_all = dragged
            .iter()
            .all(|&drag| self.config.accepts(drag, self.id) || self.draggables.contains(&drag));
        if !accepts_all {
            return false;
        }
        self.active_siblings.insert(sibling);
        self.cache_parent_positions(host);
        tracing::trace!(list = %self.id, %sibling, "receiving");
        true
    }

    pub(crate) fn stop_receiving(&mut self, sibling: DropListId) {
        self.active_siblings.shift_remove(&sibling);
    }

    /// Put `item` into the list, either at `index` or where the pointer is.
    ///
    /// The list must already be dragging. Inserts the item's placeholder into
    /// the DOM and re-caches geometry.
    pub(crate) fn insert_item<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        items: &Arena<DragRef>,
        item: DragId,
        pointer: Vec2,
        index: Option<usize>,
    ) {
        let Some(placeholder) = items.get(item.0).and_then(DragRef::placeholder) else {
            tracing::warn!(list = %self.id, %item, "entering item has no placeholder");
            return;
        };

        let new_index = index.or_else(|| {
            let original = if self.config.sorting_disabled {
                self.draggables.iter().position(|&drag| drag == item)
            } else {
                None
            };
            original.or_else(|| self.index_from_pointer(item, pointer, None))
        });

        let active = &self.active_draggables;
        let mut reference = new_index.and_then(|index| active.get(index).copied());
        if reference == Some(item) {
            reference = new_index.and_then(|index| active.get(index + 1).copied());
        }
        let may_enter_first = new_index.is_none_or(|index| index + 1 < active.len());
        if reference.is_none() && may_enter_first && self.should_enter_as_first_child(pointer) {
            reference = active.first().copied();
        }

        if let Some(current) = self.active_draggables.iter().position(|&drag| drag == item) {
            self.active_draggables.remove(current);
        }

        let reference = reference
            .filter(|&drag| drag != item)
            .and_then(|drag| items.get(drag.0))
            .filter(|drag| !drag.is_dragging());

        if let Some(reference) = reference {
            let root = reference.root();
            match host.parent(root) {
                Some(parent) => host.insert_before(parent, placeholder, Some(root)),
                None => tracing::warn!(list = %self.id, ?root, "reference item is detached"),
            }
            let index = new_index.unwrap_or(0).min(self.active_draggables.len());
            self.active_draggables.insert(index, item);
        } else if let Some(first) = self
            .should_enter_as_first_child(pointer)
            .then(|| self.active_draggables.first().copied())
            .flatten()
        {
            if let Some(root) = items.get(first.0).map(DragRef::root)
                && let Some(parent) = host.parent(root)
            {
                host.insert_before(parent, placeholder, Some(root));
            }
            self.active_draggables.insert(0, item);
        } else {
            host.insert_before(self.element, placeholder, None);
            self.active_draggables.push(item);
        }

        // The placeholder may still carry an offset from a previous list.
        styling::set_transform(host, placeholder, "");
        self.cache_item_positions(host, items);
        self.cache_parent_positions(host);
    }

    /// Whether an item entering with no reference should go before the
    /// first item rather than after the last.
    ///
    /// Compares DOM order with geometric order to detect reversed layouts
    /// such as `row-reverse`. This is a heuristic for flex layouts.
    fn should_enter_as_first_child(&self, pointer: Vec2) -> bool {
        let (Some(&first_active), Some(first), Some(last)) = (
            self.active_draggables.first(),
            self.item_positions.first(),
            self.item_positions.last(),
        ) else {
            return false;
        };

        let horizontal = self.is_horizontal();
        let reversed = first.drag != first_active;

        if reversed {
            let rect = last.client_rect;
            if horizontal {
                pointer.x >= rect.right()
            } else {
                pointer.y >= rect.bottom()
            }
        } else {
            let rect = first.client_rect;
            if horizontal {
                pointer.x <= rect.left
            } else {
                pointer.y <= rect.top
            }
        }
    }

    /// Stop dragging and drop every cache.
    ///
    /// Connected lists still have to be told to stop receiving from this one.
    pub(crate) fn reset<H: DomHost + ?Sized>(&mut self, host: &H, items: &Arena<DragRef>) {
        self.is_dragging = false;
        host.set_style_property(self.element, styling::SCROLL_SNAP_TYPE, &self.initial_scroll_snap);

        for &drag in &self.active_draggables {
            let Some(item) = items.get(drag.0) else {
                continue;
            };
            let initial = self
                .item_positions
                .iter()
                .find(|position| position.drag == drag)
                .map(|position| position.initial_transform.as_str())
                .unwrap_or("");
            styling::set_transform(host, item.root(), initial);
        }

        self.active_draggables.clear();
        self.item_positions.clear();
        self.previous_swap = PreviousSwap::default();
        self.stop_scrolling();
        self.parent_positions.clear();
        tracing::trace!(list = %self.id, "reset");
    }

    /// Index of `item` in the list. While dragging this is its index in
    /// geometric order, reversed for right-to-left horizontal lists.
    pub fn get_item_index(&self, item: DragId) -> Option<usize> {
        if !self.is_dragging {
            return self.draggables.iter().position(|&drag| drag == item);
        }

        let index = self
            .item_positions
            .iter()
            .position(|position| position.drag == item)?;
        if self.is_horizontal() && self.config.direction == TextDirection::Rtl {
            Some(self.item_positions.len() - 1 - index)
        } else {
            Some(index)
        }
    }

    /// Whether a point lies inside the cached rect of the list.
    pub fn is_over_container(&self, point: Vec2) -> bool {
        self.client_rect().is_some_and(|rect| rect.contains(point.x, point.y))
    }

    /// Whether `item` may be handed over to this list at `point`.
    ///
    /// The point has to be inside the cached rect, the enter predicate has
    /// to pass and the topmost element there has to belong to the list, so a
    /// list covered by something else never receives.
    pub(crate) fn can_receive<H: DomHost + ?Sized>(&self, host: &H, item: DragId, point: Vec2) -> bool {
        if !self.is_over_container(point) || !self.config.accepts(item, self.id) {
            return false;
        }
        host.element_from_point(point)
            .is_some_and(|hit| host.contains(self.element, hit))
    }

    /// Index of the cached item under the pointer.
    ///
    /// With a `delta`, the item swapped last is skipped while the pointer is
    /// still over it and moving the same way.
    pub fn index_from_pointer(
        &self,
        item: DragId,
        pointer: Vec2,
        delta: Option<DirectionDelta>,
    ) -> Option<usize> {
        let horizontal = self.is_horizontal();
        let count = self.item_positions.len();

        let index = self.item_positions.iter().position(|position| {
            if position.drag == item {
                return count < 2;
            }

            if let Some(delta) = delta {
                let direction = delta.along(self.config.orientation);
                let swap = &self.previous_swap;
                if swap.drag == Some(position.drag) && swap.overlaps && direction == swap.delta {
                    return false;
                }
            }

            let rect = &position.client_rect;
            if horizontal {
                pointer.x >= rect.left.floor() && pointer.x < rect.right().floor()
            } else {
                pointer.y >= rect.top.floor() && pointer.y < rect.bottom().floor()
            }
        })?;

        self.config.allows_sort(index, item, self.id).then_some(index)
    }

    /// Move `item` to the slot under the pointer, shifting the items between
    /// its old and new slot.
    pub(crate) fn sort_item<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        items: &Arena<DragRef>,
        item: DragId,
        pointer: Vec2,
        delta: DirectionDelta,
        events: &mut EventQueue,
    ) {
        profile_function!();
        if self.config.sorting_disabled {
            return;
        }
        let Some(rect) = self.client_rect() else {
            return;
        };
        if !rect.is_near(DROP_PROXIMITY_THRESHOLD, pointer.x, pointer.y) {
            return;
        }

        let Some(new_index) = self.index_from_pointer(item, pointer, Some(delta)) else {
            return;
        };
        let Some(current_index) = self
            .item_positions
            .iter()
            .position(|position| position.drag == item)
        else {
            return;
        };
        if new_index == current_index {
            return;
        }

        let horizontal = self.is_horizontal();
        let positions = &mut self.item_positions;
        let swapped_with = positions[new_index].drag;
        let direction = if current_index > new_index { 1.0 } else { -1.0 };
        let item_offset = item_offset(
            &positions[current_index].client_rect,
            &positions[new_index].client_rect,
            direction,
            horizontal,
        );
        let sibling_offset = sibling_offset(current_index, positions, direction, horizontal);

        let old_order: Vec<DragId> = positions.iter().map(|position| position.drag).collect();
        let moved = positions.remove(current_index);
        positions.insert(new_index, moved);

        events.push(DragDropEvent::Sorted {
            item,
            container: self.id,
            previous_index: current_index,
            current_index: new_index,
        });

        for (index, position) in positions.iter_mut().enumerate() {
            if old_order[index] == position.drag {
                continue;
            }

            let is_dragged_item = position.drag == item;
            let offset = if is_dragged_item { item_offset } else { sibling_offset };
            let element = items.get(position.drag.0).map(|drag| {
                if is_dragged_item {
                    drag.visible_element()
                } else {
                    drag.root()
                }
            });
            position.offset += offset;

            let shift = position.offset.round();
            let transform = if horizontal {
                styling::translate3d(shift, 0.0)
            } else {
                styling::translate3d(0.0, shift)
            };
            if let Some(element) = element {
                let combined =
                    styling::combine_transforms(&transform, Some(&position.initial_transform));
                styling::set_transform(host, element, &combined);
            }

            if horizontal {
                position.client_rect.adjust(0.0, offset);
            } else {
                position.client_rect.adjust(offset, 0.0);
            }
        }

        let overlaps = positions
            .iter()
            .find(|position| position.drag == swapped_with)
            .is_some_and(|position| position.client_rect.contains(pointer.x, pointer.y));
        self.previous_swap = PreviousSwap {
            drag: Some(swapped_with),
            delta: delta.along(self.config.orientation),
            overlaps,
        };
        tracing::trace!(list = %self.id, %item, from = current_index, to = new_index, "sorted");
    }

    pub(crate) fn start_scrolling_if_necessary<H: DomHost + ?Sized>(&mut self, host: &H, pointer: Vec2) {
        if self.config.auto_scroll_disabled {
            return;
        }
        self.auto_scroller
            .start_scrolling_if_necessary(host, &self.parent_positions, pointer, self.config.direction);
    }

    pub(crate) fn stop_scrolling(&mut self) {
        self.auto_scroller.stop();
    }

    pub(crate) fn animation_frame<H: DomHost + ?Sized>(&self, host: &H) {
        self.auto_scroller
            .animation_frame(host, self.config.auto_scroll_step);
    }

    /// Patch caches after a scroll anywhere in the document.
    pub(crate) fn handle_scroll<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        items: &Arena<DragRef>,
        target: ScrollTarget,
    ) -> ListScroll {
        profile_function!();
        if self.is_dragging {
            let Some(diff) = self.parent_positions.handle_scroll(host, target) else {
                return ListScroll::Ignored;
            };
            if let Some(rect) = self.parent_positions.client_rect(self.element) {
                self.client_rect = Some(rect);
            }
            for position in &mut self.item_positions {
                position.client_rect.adjust(diff.top, diff.left);
            }
            let dragging = self
                .item_positions
                .iter()
                .map(|position| position.drag)
                .filter(|drag| items.get(drag.0).is_some_and(DragRef::is_dragging))
                .collect();
            ListScroll::Resort(dragging)
        } else if self.is_receiving() {
            self.cache_parent_positions(host);
            ListScroll::Recached
        } else {
            ListScroll::Ignored
        }
    }
}

/// How far the dragged item's placeholder moves to reach the new slot.
fn item_offset(current: &ClientRect, new: &ClientRect, direction: f32, horizontal: bool) -> f32 {
    let mut offset = if horizontal {
        new.left - current.left
    } else {
        new.top - current.top
    };

    // Moving forward lands on the far edge of the new slot.
    if direction < 0.0 {
        offset += if horizontal {
            new.width - current.width
        } else {
            new.height - current.height
        };
    }

    offset
}

/// How far every item between the old and new slot moves, keeping the gap
/// to the item next to the dragged one.
fn sibling_offset(current_index: usize, positions: &[ItemPosition], direction: f32, horizontal: bool) -> f32 {
    let current = &positions[current_index].client_rect;
    let immediate = if direction < 0.0 {
        positions.get(current_index + 1)
    } else {
        current_index.checked_sub(1).and_then(|index| positions.get(index))
    };

    let size = if horizontal { current.width } else { current.height };
    let mut offset = size * direction;

    if let Some(sibling) = immediate {
        let sibling = &sibling.client_rect;
        let (current_start, current_end, sibling_start, sibling_end) = if horizontal {
            (current.left, current.right(), sibling.left, sibling.right())
        } else {
            (current.top, current.bottom(), sibling.top, sibling.bottom())
        };

        if direction < 0.0 {
            offset -= sibling_start - current_end;
        } else {
            offset += current_start - sibling_end;
        }
    }

    offset
}
