//! The drag-and-drop system: registration, input routing and every
//! operation that spans an item and its lists.

use std::time::Instant;

use sortable_core::alloc::Arena;
use sortable_core::math::Vec2;
use sortable_core::profiling::profile_function;

use crate::config::{DragConfig, DragDropConfig, DropListConfig, PreviewContainer};
use crate::coordinator::DragCoordinator;
use crate::drag_ref::{DragPhase, DragRef};
use crate::drop_list_ref::{DropListRef, ListScroll};
use crate::error::{DragDropError, DragDropResult};
use crate::event::{DragDropEvent, EventQueue, PointerEvent, ScrollEvent};
use crate::host::{DomHost, NodeId};
use crate::preview::{ANIMATING_CLASS, CloneFactory, PreviewFactory};
use crate::styling;
use crate::transition::PreviewTransition;
use crate::{DragId, DropListId};

/// Owns every registered item and list and drives them from host input.
///
/// The host forwards pointer presses on items, pointer moves and releases,
/// scroll events, animation frames and transition ends. Consumer events are
/// queued and read back with [`drain_events`](Self::drain_events); nothing is
/// dispatched while the system is mid-update.
///
/// # Example
/// ```no_run
/// # use sortable::{DragDropSystem, DomHost, NodeId, PointerEvent};
/// # use sortable_core::math::Vec2;
/// # fn run<H: DomHost>(host: H, list_node: NodeId, nodes: &[NodeId]) {
/// let mut system = DragDropSystem::new(host);
/// let list = system.create_list(list_node);
/// let items: Vec<_> = nodes.iter().map(|&node| system.create_item(node)).collect();
/// system.set_list_items(list, items.clone()).unwrap();
///
/// let now = std::time::Instant::now();
/// system.pointer_down(items[0], &PointerEvent::mouse(Vec2::new(10.0, 5.0), Some(nodes[0]), now));
/// system.pointer_move(&PointerEvent::mouse(Vec2::new(10.0, 40.0), None, now));
/// system.pointer_up(&PointerEvent::mouse(Vec2::new(10.0, 40.0), None, now));
///
/// for event in system.drain_events() {
///     println!("{event:?}");
/// }
/// # }
/// ```
pub struct DragDropSystem<H: DomHost> {
    host: H,
    factory: Box<dyn PreviewFactory<H>>,
    config: DragDropConfig,
    coordinator: DragCoordinator,
    items: Arena<DragRef>,
    lists: Arena<DropListRef>,
    events: EventQueue,
}

impl<H: DomHost> DragDropSystem<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, DragDropConfig::default())
    }

    pub fn with_config(host: H, config: DragDropConfig) -> Self {
        Self {
            host,
            factory: Box::new(CloneFactory),
            config,
            coordinator: DragCoordinator::new(),
            items: Arena::new(),
            lists: Arena::new(),
            events: EventQueue::new(),
        }
    }

    /// Replace the factory used for previews and placeholders.
    pub fn with_factory(mut self, factory: impl PreviewFactory<H> + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &DragDropConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &DragCoordinator {
        &self.coordinator
    }

    // -- Registration --

    /// Register `root` as a draggable item with the default item options.
    pub fn create_item(&mut self, root: NodeId) -> DragId {
        let config = self.config.drag.clone();
        self.create_item_with(root, config)
    }

    pub fn create_item_with(&mut self, root: NodeId, config: DragConfig) -> DragId {
        let host = &self.host;
        let handle = self
            .items
            .insert_with(|handle| DragRef::new(host, DragId(handle), root, config));
        let id = DragId(handle);
        self.coordinator.register_item(id);
        tracing::trace!(item = %id, ?root, "item created");
        id
    }

    /// Register `element` as a drop list with the default list options.
    pub fn create_list(&mut self, element: NodeId) -> DropListId {
        let config = self.config.list.clone();
        self.create_list_with(element, config)
    }

    pub fn create_list_with(&mut self, element: NodeId, config: DropListConfig) -> DropListId {
        let handle = self
            .lists
            .insert_with(|handle| DropListRef::new(DropListId(handle), element, config));
        let id = DropListId(handle);
        tracing::trace!(list = %id, ?element, "list created");
        id
    }

    /// Unregister an item, putting its element back if it is mid-drag.
    pub fn destroy_item(&mut self, id: DragId) -> DragDropResult<()> {
        let item = self.item_ref(id)?;
        if item.phase != DragPhase::Idle {
            self.abort_sequence(id);
        }
        self.coordinator.remove_item(id);
        for (_, list) in self.lists.iter_mut() {
            list.remove_draggable(id);
        }
        self.items.remove(id.0);
        tracing::trace!(item = %id, "item destroyed");
        Ok(())
    }

    /// Unregister a list, aborting any drag that involves it.
    pub fn destroy_list(&mut self, id: DropListId) -> DragDropResult<()> {
        self.list_ref(id)?;

        let affected: Vec<DragId> = self
            .items
            .iter()
            .filter(|(_, item)| {
                item.phase != DragPhase::Idle
                    && (item.drop_container == Some(id) || item.initial_container == Some(id))
            })
            .map(|(handle, _)| DragId(handle))
            .collect();
        for item in affected {
            self.abort_sequence(item);
        }

        if self.lists.get(id.0).is_some_and(DropListRef::is_dragging) {
            self.reset_list(id);
        }
        for (_, list) in self.lists.iter_mut() {
            list.remove_sibling(id);
        }
        for (_, item) in self.items.iter_mut() {
            if item.drop_container == Some(id) {
                item.drop_container = None;
            }
            if item.initial_container == Some(id) {
                item.initial_container = None;
            }
        }

        if let Some(mut list) = self.lists.remove(id.0) {
            list.stop_scrolling();
        }
        tracing::trace!(list = %id, "list destroyed");
        Ok(())
    }

    pub fn item(&self, id: DragId) -> Option<&DragRef> {
        self.items.get(id.0)
    }

    pub fn list(&self, id: DropListId) -> Option<&DropListRef> {
        self.lists.get(id.0)
    }

    fn item_ref(&self, id: DragId) -> DragDropResult<&DragRef> {
        self.items.get(id.0).ok_or(DragDropError::UnknownItem(id))
    }

    fn item_mut(&mut self, id: DragId) -> DragDropResult<&mut DragRef> {
        self.items.get_mut(id.0).ok_or(DragDropError::UnknownItem(id))
    }

    fn list_ref(&self, id: DropListId) -> DragDropResult<&DropListRef> {
        self.lists.get(id.0).ok_or(DragDropError::UnknownList(id))
    }

    fn list_mut(&mut self, id: DropListId) -> DragDropResult<&mut DropListRef> {
        self.lists.get_mut(id.0).ok_or(DragDropError::UnknownList(id))
    }

    // -- Configuration --

    pub fn item_config_mut(&mut self, id: DragId) -> DragDropResult<&mut DragConfig> {
        Ok(&mut self.item_mut(id)?.config)
    }

    pub fn list_config_mut(&mut self, id: DropListId) -> DragDropResult<&mut DropListConfig> {
        Ok(&mut self.list_mut(id)?.config)
    }

    /// Restrict presses to `handles` (descendants of the root). An empty list
    /// makes the whole root a handle again.
    pub fn with_handles(&mut self, id: DragId, handles: Vec<NodeId>) -> DragDropResult<()> {
        self.item_mut(id)?.set_handles(handles);
        Ok(())
    }

    pub fn disable_handle(&mut self, id: DragId, handle: NodeId) -> DragDropResult<()> {
        self.item_mut(id)?.set_handle_disabled(handle, true);
        Ok(())
    }

    pub fn enable_handle(&mut self, id: DragId, handle: NodeId) -> DragDropResult<()> {
        self.item_mut(id)?.set_handle_disabled(handle, false);
        Ok(())
    }

    /// Set the items rendered in a list, in DOM order, and make the list
    /// their container.
    ///
    /// While the list is dragging it re-caches its geometry, or resets if
    /// every item being dragged in it was removed.
    pub fn set_list_items(&mut self, id: DropListId, items: Vec<DragId>) -> DragDropResult<()> {
        if let Some(&missing) = items.iter().find(|item| !self.items.contains(item.0)) {
            return Err(DragDropError::UnknownItem(missing));
        }
        let previous = self.list_mut(id)?.set_draggables(items.clone());

        for item in &items {
            if let Some(item) = self.items.get_mut(item.0) {
                item.drop_container = Some(id);
            }
        }

        if self.lists.get(id.0).is_some_and(DropListRef::is_dragging) {
            let dragged: Vec<DragId> = previous
                .into_iter()
                .filter(|drag| self.items.get(drag.0).is_some_and(DragRef::is_dragging))
                .collect();
            if !dragged.is_empty() && dragged.iter().all(|drag| !items.contains(drag)) {
                tracing::debug!(list = %id, "dragged items removed, resetting");
                self.reset_list(id);
            } else if let Some(list) = self.lists.get_mut(id.0) {
                list.cache_items(&self.host, &self.items);
            }
        }
        Ok(())
    }

    /// Lists that items from `id` may be transferred into.
    pub fn connect_lists(&mut self, id: DropListId, siblings: Vec<DropListId>) -> DragDropResult<()> {
        if let Some(&missing) = siblings.iter().find(|list| !self.lists.contains(list.0)) {
            return Err(DragDropError::UnknownList(missing));
        }
        let list = self.list_mut(id)?;
        list.siblings = siblings.into_iter().filter(|&sibling| sibling != id).collect();
        Ok(())
    }

    /// Ancestors of the list that scroll and should be auto-scrolled.
    pub fn set_scrollable_parents(&mut self, id: DropListId, elements: Vec<NodeId>) -> DragDropResult<()> {
        self.list_mut(id)?.set_scrollable_parents(elements);
        Ok(())
    }

    pub fn free_drag_position(&self, id: DragId) -> DragDropResult<Vec2> {
        Ok(self.item_ref(id)?.free_drag_position())
    }

    /// Move an item that is not in a list to `position`.
    pub fn set_free_drag_position(&mut self, id: DragId, position: Vec2) -> DragDropResult<()> {
        let host = &self.host;
        let item = self.items.get_mut(id.0).ok_or(DragDropError::UnknownItem(id))?;
        item.set_free_drag_position(host, position);
        Ok(())
    }

    /// Put the item back where it was before it was ever dragged.
    pub fn reset_item(&mut self, id: DragId) -> DragDropResult<()> {
        let host = &self.host;
        let item = self.items.get_mut(id.0).ok_or(DragDropError::UnknownItem(id))?;
        item.reset(host);
        Ok(())
    }

    /// Index of an item in a list, in geometric order while dragging.
    pub fn get_item_index(&self, list: DropListId, item: DragId) -> DragDropResult<Option<usize>> {
        Ok(self.list_ref(list)?.get_item_index(item))
    }

    /// Whether any drag sequence is running.
    pub fn is_dragging(&self) -> bool {
        self.coordinator.has_active_drags()
    }

    /// Take every event emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = DragDropEvent> + '_ {
        self.events.drain()
    }

    /// Earliest moment [`tick`](Self::tick) will finish a pending drop.
    pub fn next_transition_deadline(&self) -> Option<Instant> {
        self.items
            .iter()
            .filter_map(|(_, item)| item.transition.map(|transition| transition.deadline()))
            .min()
    }

    // -- Input --

    /// A press on the root element of `id`.
    pub fn pointer_down(&mut self, id: DragId, event: &PointerEvent) {
        profile_function!();
        let Some(item) = self.items.get(id.0) else {
            tracing::warn!(item = %id, "pointer down on unknown item");
            return;
        };
        self.events.push(DragDropEvent::BeforeStarted { item: id });

        let container_disabled = item
            .drop_container
            .and_then(|list| self.lists.get(list.0))
            .is_some_and(|list| list.config.disabled);
        if item.is_disabled(container_disabled) {
            tracing::trace!(item = %id, "press ignored, disabled");
            return;
        }
        if item.reference_element(&self.host, event.target).is_none() {
            tracing::trace!(item = %id, "press ignored, no enabled handle hit");
            return;
        }
        if self.coordinator.is_dragging(id) || item.phase == DragPhase::Dropping {
            tracing::trace!(item = %id, "press ignored, already dragging");
            return;
        }
        if event.is_auxiliary_button() {
            tracing::trace!(item = %id, "press ignored, auxiliary button");
            return;
        }
        if item.is_synthetic_mouse_event(event) {
            tracing::trace!(item = %id, "press ignored, emulated mouse after touch");
            return;
        }
        if event.is_fake_from_screen_reader() {
            tracing::trace!(item = %id, "press ignored, screen reader event");
            return;
        }

        if let Some(item) = self.items.get_mut(id.0) {
            item.initialize_sequence(&self.host, event);
        }
        self.coordinator.start_dragging(id, event.is_touch());
    }

    /// A pointer move anywhere in the document.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        profile_function!();
        if !self.coordinator.routes(event) {
            return;
        }
        let active: Vec<DragId> = self.coordinator.active_items().collect();
        for id in active {
            self.item_pointer_move(id, event);
        }
    }

    /// A pointer release anywhere in the document.
    pub fn pointer_up(&mut self, event: &PointerEvent) {
        profile_function!();
        if !self.coordinator.routes(event) {
            return;
        }
        let active: Vec<DragId> = self.coordinator.active_items().collect();
        for id in active {
            self.end_drag_sequence(id, event);
        }
    }

    /// A scroll of the document or of any element.
    pub fn scroll(&mut self, event: &ScrollEvent) {
        profile_function!();
        let target = event.target;

        let active: Vec<DragId> = self.coordinator.active_items().collect();
        for id in active {
            if let Some(item) = self.items.get_mut(id.0) {
                item.handle_scroll(&self.host, target);
            }
        }

        let mut resort = Vec::new();
        for (_, list) in self.lists.iter_mut() {
            if let ListScroll::Resort(items) = list.handle_scroll(&self.host, &self.items, target) {
                resort.extend(items);
            }
        }
        for id in resort {
            self.sort_from_last_pointer_position(id);
        }
    }

    /// Advance auto-scrolling by one frame.
    pub fn animation_frame(&mut self) {
        profile_function!();
        for (_, list) in self.lists.iter() {
            list.animation_frame(&self.host);
        }
    }

    /// A `transitionend` fired on `node` for `property`.
    pub fn transition_end(&mut self, node: NodeId, property: &str) {
        let finished = self
            .items
            .iter()
            .find(|(_, item)| {
                item.transition
                    .is_some_and(|transition| transition.is_finished_by(node, property))
            })
            .map(|(handle, _)| DragId(handle));
        if let Some(id) = finished {
            self.finish_drop(id);
        }
    }

    /// Finish every pending drop whose transition timed out by `now`.
    pub fn tick(&mut self, now: Instant) {
        let expired: Vec<DragId> = self
            .items
            .iter()
            .filter(|(_, item)| {
                item.transition
                    .is_some_and(|transition| transition.has_expired(now))
            })
            .map(|(handle, _)| DragId(handle))
            .collect();
        for id in expired {
            tracing::trace!(item = %id, "preview transition timed out");
            self.finish_drop(id);
        }
    }

    // -- Drag sequence --

    fn item_pointer_move(&mut self, id: DragId, event: &PointerEvent) {
        let host = &self.host;
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        let pointer = item.pointer_position_on_page(host, event);

        match item.phase {
            DragPhase::Armed => {
                if !item.is_over_threshold(pointer) {
                    return;
                }
                // A move past the threshold before the delay cancels the press.
                if !item.is_delay_elapsed(event) {
                    tracing::trace!(item = %id, "moved before start delay elapsed");
                    self.end_drag_sequence(id, event);
                    return;
                }
                let busy = item
                    .drop_container
                    .and_then(|list| self.lists.get(list.0))
                    .is_some_and(|list| list.is_dragging() || list.is_receiving());
                if !busy {
                    item.phase = DragPhase::Dragging;
                    self.start_drag_sequence(id, event);
                }
                return;
            }
            DragPhase::Dragging => {}
            DragPhase::Idle | DragPhase::Dropping => return,
        }

        let lock_axis = item
            .drop_container
            .and_then(|list| self.lists.get(list.0))
            .and_then(|list| list.config.lock_axis);
        let constrained = item.constrained_pointer_position(host, pointer, lock_axis);
        item.has_moved = true;
        item.last_known_pointer_position = pointer;
        let delta = item.update_pointer_direction_delta(constrained);
        let distance = item.drag_distance(constrained);

        if item.initial_container.is_some() {
            self.update_active_drop_container(id, constrained, pointer);
        } else {
            item.apply_free_drag(host, constrained);
        }

        self.events.push(DragDropEvent::Moved {
            item: id,
            pointer_position: constrained,
            distance,
            delta,
        });
    }

    fn start_drag_sequence(&mut self, id: DragId, event: &PointerEvent) {
        profile_function!();
        let host = &self.host;
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        if event.is_touch() {
            item.last_touch_event_time = Some(event.timestamp);
        }

        let Some(list_id) = item.drop_container.filter(|list| self.lists.contains(list.0)) else {
            item.initial_container = None;
            item.initial_index = 0;
            item.parent_positions.cache(host, &[]);
            self.events.push(DragDropEvent::Started { item: id });
            tracing::trace!(item = %id, "free drag started");
            return;
        };

        let root = item.root();
        let Some(parent) = host.parent(root) else {
            tracing::warn!(item = %id, ?root, "root element is detached, cancelling drag");
            item.phase = DragPhase::Idle;
            item.cleanup_cached_dimensions();
            self.coordinator.stop_dragging(id);
            return;
        };

        let placeholder = self.factory.create_placeholder(host, id, root);
        let anchor = host.create_comment();
        host.insert_before(parent, anchor, Some(root));
        item.initial_transform = Some(styling::read_transform(host, root).unwrap_or_default());

        let root_rect = item
            .initial_client_rect
            .unwrap_or_else(|| host.client_rect(root));
        let preview = self.factory.create_preview(host, id, root, root_rect);

        // The root leaves the list; the placeholder takes its slot.
        host.set_visible(root, false);
        host.replace_child(parent, placeholder, root);
        host.insert_before(host.body(), root, None);

        let preview_parent = match item.config.preview_container {
            PreviewContainer::Global => host.body(),
            PreviewContainer::Parent => parent,
            PreviewContainer::Element(node) => node,
        };
        host.insert_before(preview_parent, preview, None);

        item.preview = Some(preview);
        item.placeholder = Some(placeholder);
        item.anchor = Some(anchor);
        item.apply_preview_transform(host, root_rect.position());

        self.events.push(DragDropEvent::Started { item: id });
        self.start_list(list_id);

        let initial_index = self
            .lists
            .get(list_id.0)
            .and_then(|list| list.get_item_index(id))
            .unwrap_or_default();
        let scrollable = self
            .lists
            .get(list_id.0)
            .map(|list| list.scrollable_elements().to_vec())
            .unwrap_or_default();

        if let Some(item) = self.items.get_mut(id.0) {
            item.initial_container = Some(list_id);
            item.initial_index = initial_index;
            item.parent_positions.cache(&self.host, &scrollable);
        }
        tracing::debug!(item = %id, list = %list_id, index = initial_index, "drag started");
    }

    /// Hand the item to whichever list the pointer is over, then sort it,
    /// auto-scroll and move the preview.
    fn update_active_drop_container(&mut self, id: DragId, constrained: Vec2, raw: Vec2) {
        profile_function!();
        let Some(item) = self.items.get(id.0) else {
            return;
        };
        let Some(initial) = item.initial_container else {
            return;
        };
        let current = item.drop_container;
        let initial_index = item.initial_index;

        let host = &self.host;
        let mut target = self.lists.get(initial.0).and_then(|list| {
            list.siblings().iter().copied().find(|sibling| {
                self.lists
                    .get(sibling.0)
                    .is_some_and(|sibling| sibling.can_receive(host, id, constrained))
            })
        });

        // Coming back over the original list undoes a transfer even when the
        // lists are only connected one way.
        if target.is_none()
            && current != Some(initial)
            && self
                .lists
                .get(initial.0)
                .is_some_and(|list| list.is_over_container(constrained))
        {
            target = Some(initial);
        }

        if let Some(target) = target
            && Some(target) != current
        {
            if let Some(current) = current {
                self.list_exit(current, id);
            }
            if let Some(item) = self.items.get_mut(id.0) {
                item.drop_container = Some(target);
            }
            let returning_unsorted = target == initial
                && self
                    .lists
                    .get(target.0)
                    .is_some_and(|list| list.config.sorting_disabled);
            let index = returning_unsorted.then_some(initial_index);
            self.list_enter(target, id, constrained, index);
            tracing::debug!(item = %id, from = ?current, to = %target, "transferred");
        }

        let Some(item) = self.items.get(id.0) else {
            return;
        };
        if !item.is_dragging() {
            return;
        }
        if let Some(list) = item.drop_container.and_then(|list| self.lists.get_mut(list.0)) {
            list.start_scrolling_if_necessary(&self.host, raw);
            list.sort_item(
                &self.host,
                &self.items,
                id,
                constrained,
                item.pointer_direction_delta(),
                &mut self.events,
            );
        }
        item.position_preview(&self.host, constrained);
    }

    fn sort_from_last_pointer_position(&mut self, id: DragId) {
        let host = &self.host;
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        if !item.is_dragging() || item.initial_container.is_none() {
            return;
        }
        let lock_axis = item
            .drop_container
            .and_then(|list| self.lists.get(list.0))
            .and_then(|list| list.config.lock_axis);
        let position = item.last_known_pointer_position;
        let constrained = item.constrained_pointer_position(host, position, lock_axis);
        self.update_active_drop_container(id, constrained, position);
    }

    fn end_drag_sequence(&mut self, id: DragId, event: &PointerEvent) {
        if !self.coordinator.is_dragging(id) {
            return;
        }
        self.coordinator.stop_dragging(id);

        let host = &self.host;
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        if item.phase != DragPhase::Dragging {
            item.phase = DragPhase::Idle;
            item.cleanup_cached_dimensions();
            tracing::trace!(item = %id, "released before drag started");
            return;
        }

        self.events.push(DragDropEvent::Released { item: id });
        let pointer = item.pointer_position_on_page(host, event);
        item.drop_point = pointer;

        if item.initial_container.is_some() {
            if let Some(list) = item.drop_container.and_then(|list| self.lists.get_mut(list.0)) {
                list.stop_scrolling();
            }
            self.animate_preview_to_placeholder(id, event.timestamp);
        } else {
            item.commit_free_drag();
            item.phase = DragPhase::Idle;
            item.cleanup_cached_dimensions();
            let distance = item.drag_distance(pointer);
            self.events.push(DragDropEvent::Ended {
                item: id,
                distance,
                drop_point: pointer,
            });
            tracing::debug!(item = %id, ?distance, "free drag ended");
        }
    }

    /// Move the preview onto the placeholder, finishing the drop right away
    /// when there is nothing to animate.
    fn animate_preview_to_placeholder(&mut self, id: DragId, now: Instant) {
        let host = &self.host;
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        let (true, Some(preview), Some(placeholder)) = (item.has_moved, item.preview, item.placeholder) else {
            self.finish_drop(id);
            return;
        };

        let target = host.client_rect(placeholder);
        host.toggle_class(preview, ANIMATING_CLASS, true);
        item.apply_preview_transform(host, target.position());

        let duration = host.transform_transition_duration(preview);
        if duration.is_zero() {
            self.finish_drop(id);
            return;
        }

        item.phase = DragPhase::Dropping;
        item.transition = Some(PreviewTransition::new(preview, now, duration));
        tracing::trace!(item = %id, ?duration, "waiting for drop animation");
    }

    /// Put the root element back, remove the drag artifacts and commit the
    /// drop to the list the item ended up in.
    fn finish_drop(&mut self, id: DragId) {
        profile_function!();
        let host = &self.host;
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        restore_root(host, item);
        item.cleanup_cached_dimensions();
        item.phase = DragPhase::Idle;

        let drop_point = item.drop_point;
        let distance = item.drag_distance(drop_point);
        let initial_container = item.initial_container;
        let initial_index = item.initial_index;
        let Some(container) = item.drop_container.filter(|list| self.lists.contains(list.0)) else {
            self.events.push(DragDropEvent::Ended {
                item: id,
                distance,
                drop_point,
            });
            return;
        };
        item.drop_container = initial_container;

        let (current_index, is_pointer_over_container) = self
            .lists
            .get(container.0)
            .map(|list| {
                (
                    list.get_item_index(id).unwrap_or_default(),
                    list.is_over_container(drop_point),
                )
            })
            .unwrap_or_default();

        self.events.push(DragDropEvent::Ended {
            item: id,
            distance,
            drop_point,
        });
        self.reset_list(container);
        self.events.push(DragDropEvent::Dropped {
            item: id,
            container,
            previous_container: initial_container.unwrap_or(container),
            previous_index: initial_index,
            current_index,
            is_pointer_over_container,
            distance,
            drop_point,
        });
        tracing::debug!(
            item = %id,
            list = %container,
            from = initial_index,
            to = current_index,
            "dropped"
        );
    }

    /// End a sequence without events, restoring the DOM.
    fn abort_sequence(&mut self, id: DragId) {
        self.coordinator.stop_dragging(id);
        let host = &self.host;
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        restore_root(host, item);
        item.cleanup_cached_dimensions();
        item.phase = DragPhase::Idle;

        let lists = [item.drop_container, item.initial_container];
        item.drop_container = item.initial_container.or(item.drop_container);
        for list in lists.into_iter().flatten() {
            if self.lists.get(list.0).is_some_and(DropListRef::is_dragging) {
                self.reset_list(list);
            }
        }
        tracing::debug!(item = %id, "drag aborted");
    }

    // -- List orchestration --

    /// Start dragging in a list and let its connected lists know.
    fn start_list(&mut self, id: DropListId) {
        let Some(list) = self.lists.get_mut(id.0) else {
            return;
        };
        list.dragging_started(&self.host, &self.items);
        self.notify_receiving_siblings(id);
    }

    fn notify_receiving_siblings(&mut self, id: DropListId) {
        let Some(list) = self.lists.get(id.0) else {
            return;
        };
        let dragged = list.dragged_items(&self.items);
        let siblings = list.siblings().to_vec();
        for sibling in siblings {
            if let Some(sibling) = self.lists.get_mut(sibling.0) {
                sibling.start_receiving(&self.host, id, &dragged);
            }
        }
    }

    fn reset_list(&mut self, id: DropListId) {
        let Some(list) = self.lists.get_mut(id.0) else {
            return;
        };
        list.reset(&self.host, &self.items);
        let siblings = list.siblings().to_vec();
        for sibling in siblings {
            if let Some(sibling) = self.lists.get_mut(sibling.0) {
                sibling.stop_receiving(id);
            }
        }
    }

    fn list_enter(&mut self, id: DropListId, item: DragId, pointer: Vec2, index: Option<usize>) {
        self.start_list(id);
        if let Some(list) = self.lists.get_mut(id.0) {
            list.insert_item(&self.host, &self.items, item, pointer, index);
        }
        self.notify_receiving_siblings(id);

        let current_index = self
            .lists
            .get(id.0)
            .and_then(|list| list.get_item_index(item))
            .unwrap_or_default();
        self.events.push(DragDropEvent::Entered {
            item,
            container: id,
            current_index,
        });
    }

    fn list_exit(&mut self, id: DropListId, item: DragId) {
        self.reset_list(id);
        self.events.push(DragDropEvent::Exited { item, container: id });
    }
}

/// Show the root in its original slot and discard the preview, placeholder
/// and anchor.
fn restore_root<H: DomHost + ?Sized>(host: &H, item: &mut DragRef) {
    item.transition = None;
    let root = item.root();
    host.set_visible(root, true);

    if let Some(anchor) = item.anchor.take() {
        match host.parent(anchor) {
            Some(parent) => host.replace_child(parent, root, anchor),
            None => tracing::warn!(item = %item.id(), "anchor is detached, root left in place"),
        }
        host.remove(anchor);
    }
    if let Some(preview) = item.preview.take() {
        host.remove(preview);
    }
    if let Some(placeholder) = item.placeholder.take() {
        host.remove(placeholder);
    }
    item.initial_transform = None;
}
