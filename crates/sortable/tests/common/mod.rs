//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use sortable::{
    ClientRect, DomHost, DragConfig, DragDropEvent, DragDropSystem, DragId, DropListId, NodeId, PointerEvent,
    Vec2,
};
use sortable_test_utils::MockDom;

pub type System = DragDropSystem<Arc<MockDom>>;

pub struct Harness {
    pub dom: Arc<MockDom>,
    pub system: System,
    pub start: Instant,
}

impl Harness {
    pub fn new() -> Self {
        sortable_core::logging::try_init();
        let dom = Arc::new(MockDom::new());
        let system = DragDropSystem::new(Arc::clone(&dom));
        Self {
            dom,
            system,
            start: Instant::now(),
        }
    }

    pub fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    /// A list element at `rect` holding `count` stacked items of `height`.
    pub fn vertical_list(&mut self, rect: ClientRect, count: usize, height: f32) -> (DropListId, Vec<NodeId>, Vec<DragId>) {
        let element = self.dom.append(self.dom.body(), rect);
        let nodes: Vec<NodeId> = (0..count)
            .map(|index| {
                let top = rect.top + index as f32 * height;
                self.dom.append(element, ClientRect::new(rect.left, top, rect.width, height))
            })
            .collect();
        let list = self.system.create_list(element);
        let items: Vec<DragId> = nodes.iter().map(|&node| self.system.create_item(node)).collect();
        self.system.set_list_items(list, items.clone()).unwrap();
        (list, nodes, items)
    }

    /// An item outside of any list.
    pub fn free_item(&mut self, rect: ClientRect, config: DragConfig) -> (DragId, NodeId) {
        let node = self.dom.append(self.dom.body(), rect);
        (self.system.create_item_with(node, config), node)
    }

    pub fn element(&self, list: DropListId) -> NodeId {
        self.system.list(list).unwrap().element()
    }

    pub fn press(&mut self, item: DragId, target: NodeId, x: f32, y: f32, ms: u64) {
        let event = PointerEvent::mouse(Vec2::new(x, y), Some(target), self.at(ms));
        self.system.pointer_down(item, &event);
    }

    pub fn move_to(&mut self, x: f32, y: f32, ms: u64) {
        let event = PointerEvent::mouse(Vec2::new(x, y), None, self.at(ms));
        self.system.pointer_move(&event);
    }

    pub fn release(&mut self, x: f32, y: f32, ms: u64) {
        let event = PointerEvent::mouse(Vec2::new(x, y), None, self.at(ms));
        self.system.pointer_up(&event);
    }

    /// Press `item` at its root and move far enough to start dragging.
    pub fn start_drag(&mut self, item: DragId, x: f32, y: f32) {
        let root = self.system.item(item).unwrap().root();
        self.press(item, root, x, y, 0);
        self.move_to(x, y + 10.0, 16);
    }

    pub fn events(&mut self) -> Vec<DragDropEvent> {
        self.system.drain_events().collect()
    }
}

pub fn names(events: &[DragDropEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match event {
            DragDropEvent::BeforeStarted { .. } => "before_started",
            DragDropEvent::Started { .. } => "started",
            DragDropEvent::Released { .. } => "released",
            DragDropEvent::Ended { .. } => "ended",
            DragDropEvent::Moved { .. } => "moved",
            DragDropEvent::Entered { .. } => "entered",
            DragDropEvent::Exited { .. } => "exited",
            DragDropEvent::Sorted { .. } => "sorted",
            DragDropEvent::Dropped { .. } => "dropped",
        })
        .collect()
}
