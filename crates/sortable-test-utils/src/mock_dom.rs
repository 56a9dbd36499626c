//! In-memory document implementing `DomHost`.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use parking_lot::Mutex;
use sortable::host::{DomHost, NodeId, ScrollMetrics, ScrollTarget};
use sortable_core::alloc::HashMap;
use sortable_core::geometry::{ClientRect, ScrollPosition};
use sortable_core::math::{Affine2, Vec2};

/// Records a mutating DOM call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum DomCall {
    CreateComment {
        node: NodeId,
    },
    CloneNode {
        source: NodeId,
        clone: NodeId,
    },
    InsertBefore {
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    },
    ReplaceChild {
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    },
    Remove {
        node: NodeId,
    },
    SetStyle {
        node: NodeId,
        name: String,
        value: String,
    },
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    ToggleClass {
        node: NodeId,
        class: String,
        enabled: bool,
    },
    SetVisible {
        node: NodeId,
        visible: bool,
    },
    ScrollBy {
        target: ScrollTarget,
        delta: Vec2,
    },
}

#[derive(Debug, Clone, Default)]
struct MockNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: ClientRect,
    scroll: ScrollMetrics,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    visible: bool,
    comment: bool,
    transition: Duration,
    owner_svg: Option<NodeId>,
    screen_ctm: Option<Affine2>,
}

#[derive(Debug)]
struct DomState {
    nodes: HashMap<NodeId, MockNode>,
    next_id: u64,
    body: NodeId,
    viewport_scroll: ScrollPosition,
    viewport_size: Vec2,
}

impl DomState {
    fn create(&mut self, node: MockNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(&node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|&child| child != node);
        }
    }

    fn deep_clone(&mut self, source: NodeId) -> Option<NodeId> {
        let mut copy = self.nodes.get(&source)?.clone();
        let children = std::mem::take(&mut copy.children);
        copy.parent = None;
        let clone = self.create(copy);
        for child in children {
            if let Some(child_clone) = self.deep_clone(child) {
                self.insert(clone, child_clone, None);
            }
        }
        Some(clone)
    }

    fn insert(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        self.detach(node);
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return;
        };
        let index = reference
            .and_then(|reference| parent_node.children.iter().position(|&c| c == reference))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, node);
        if let Some(node) = self.nodes.get_mut(&node) {
            node.parent = Some(parent);
        }
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn delete(&mut self, node: NodeId) {
        self.detach(node);
        if let Some(removed) = self.nodes.remove(&node) {
            for child in removed.children {
                if let Some(child) = self.nodes.get_mut(&child) {
                    child.parent = None;
                }
                self.delete(child);
            }
        }
    }

    /// Last node in document order that is visible, hit-testable and under `point`.
    ///
    /// `pointer-events` inherits like in CSS.
    fn hit_test(&self, node: NodeId, point: Vec2, inherited: bool, hit: &mut Option<NodeId>) {
        let Some(data) = self.nodes.get(&node) else {
            return;
        };
        if !data.visible || data.comment {
            return;
        }
        let hit_testable = match data.styles.get("pointer-events") {
            Some(value) => value != "none",
            None => inherited,
        };
        if hit_testable && data.rect.contains(point.x, point.y) {
            *hit = Some(node);
        }
        for &child in &data.children {
            self.hit_test(child, point, hit_testable, hit);
        }
    }
}

/// In-memory document tree with static geometry.
///
/// Every node starts visible with a zero rect. Rects, scroll metrics and
/// transition durations are set by the test and never derived from styles.
#[derive(Debug)]
pub struct MockDom {
    state: Mutex<DomState>,
    calls: Mutex<Vec<DomCall>>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// A document whose body covers a 1000x800 viewport.
    pub fn new() -> Self {
        let mut state = DomState {
            nodes: HashMap::new(),
            next_id: 1,
            body: NodeId(0),
            viewport_scroll: ScrollPosition::default(),
            viewport_size: Vec2::new(1000.0, 800.0),
        };
        state.body = state.create(MockNode {
            rect: ClientRect::new(0.0, 0.0, 1000.0, 800.0),
            visible: true,
            ..MockNode::default()
        });
        Self {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: DomCall) {
        self.calls.lock().push(call);
    }

    // -- Building --

    /// Append a new element with `rect` to `parent`.
    pub fn append(&self, parent: NodeId, rect: ClientRect) -> NodeId {
        let mut state = self.state.lock();
        let node = state.create(MockNode {
            rect,
            visible: true,
            ..MockNode::default()
        });
        state.insert(parent, node, None);
        node
    }

    pub fn set_rect(&self, node: NodeId, rect: ClientRect) {
        if let Some(data) = self.state.lock().nodes.get_mut(&node) {
            data.rect = rect;
        }
    }

    pub fn set_scroll_metrics(&self, node: NodeId, metrics: ScrollMetrics) {
        if let Some(data) = self.state.lock().nodes.get_mut(&node) {
            data.scroll = metrics;
        }
    }

    pub fn set_viewport_scroll(&self, position: ScrollPosition) {
        self.state.lock().viewport_scroll = position;
    }

    pub fn set_viewport_size(&self, size: Vec2) {
        self.state.lock().viewport_size = size;
    }

    pub fn set_transition_duration(&self, node: NodeId, duration: Duration) {
        if let Some(data) = self.state.lock().nodes.get_mut(&node) {
            data.transition = duration;
        }
    }

    /// Make `node` SVG content of `svg`, whose user units map to the screen by `ctm`.
    pub fn set_svg(&self, node: NodeId, svg: NodeId, ctm: Affine2) {
        let mut state = self.state.lock();
        if let Some(data) = state.nodes.get_mut(&node) {
            data.owner_svg = Some(svg);
        }
        if let Some(data) = state.nodes.get_mut(&svg) {
            data.screen_ctm = Some(ctm);
        }
    }

    // -- Inspection --

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state
            .lock()
            .nodes
            .get(&node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.state.lock().nodes.contains_key(&node)
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.state.lock().nodes.get(&node).is_some_and(|data| data.visible)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.state
            .lock()
            .nodes
            .get(&node)
            .is_some_and(|data| data.classes.contains(class))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.state
            .lock()
            .nodes
            .get(&node)
            .and_then(|data| data.attributes.get(name).cloned())
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<DomCall> {
        self.calls.lock().clone()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn scroll_by_calls(&self) -> Vec<(ScrollTarget, Vec2)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DomCall::ScrollBy { target, delta } => Some((*target, *delta)),
                _ => None,
            })
            .collect()
    }

    /// Styles written to `node` named `name`, oldest first.
    pub fn style_writes(&self, node: NodeId, name: &str) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DomCall::SetStyle {
                    node: target,
                    name: style,
                    value,
                } if *target == node && style == name => Some(value.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DomHost for MockDom {
    fn client_rect(&self, node: NodeId) -> ClientRect {
        self.state
            .lock()
            .nodes
            .get(&node)
            .map(|data| data.rect)
            .unwrap_or_default()
    }

    fn scroll_metrics(&self, node: NodeId) -> ScrollMetrics {
        self.state
            .lock()
            .nodes
            .get(&node)
            .map(|data| data.scroll)
            .unwrap_or_default()
    }

    fn viewport_scroll_position(&self) -> ScrollPosition {
        self.state.lock().viewport_scroll
    }

    fn viewport_size(&self) -> Vec2 {
        self.state.lock().viewport_size
    }

    fn scroll_by(&self, target: ScrollTarget, delta: Vec2) {
        self.record(DomCall::ScrollBy { target, delta });
        let mut state = self.state.lock();
        match target {
            ScrollTarget::Document => {
                let scroll = &mut state.viewport_scroll;
                scroll.left = (scroll.left + delta.x).max(0.0);
                scroll.top = (scroll.top + delta.y).max(0.0);
            }
            ScrollTarget::Element(node) => {
                if let Some(data) = state.nodes.get_mut(&node) {
                    let metrics = &mut data.scroll;
                    let max_top = (metrics.scroll_height - metrics.client_height).max(0.0);
                    let max_left = (metrics.scroll_width - metrics.client_width).max(0.0);
                    metrics.scroll_top = (metrics.scroll_top + delta.y).clamp(0.0, max_top);
                    metrics.scroll_left = (metrics.scroll_left + delta.x).clamp(0.0, max_left);
                }
            }
        }
    }

    fn element_from_point(&self, point: Vec2) -> Option<NodeId> {
        let state = self.state.lock();
        let mut hit = None;
        state.hit_test(state.body, point, true, &mut hit);
        hit
    }

    fn owner_svg_element(&self, node: NodeId) -> Option<NodeId> {
        self.state.lock().nodes.get(&node).and_then(|data| data.owner_svg)
    }

    fn screen_ctm(&self, svg: NodeId) -> Option<Affine2> {
        self.state.lock().nodes.get(&svg).and_then(|data| data.screen_ctm)
    }

    fn body(&self) -> NodeId {
        self.state.lock().body
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.lock().nodes.get(&node).and_then(|data| data.parent)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.state.lock().contains(ancestor, node)
    }

    fn create_comment(&self) -> NodeId {
        let node = self.state.lock().create(MockNode {
            comment: true,
            visible: true,
            ..MockNode::default()
        });
        self.record(DomCall::CreateComment { node });
        node
    }

    fn clone_node(&self, node: NodeId) -> NodeId {
        let clone = {
            let mut state = self.state.lock();
            match state.deep_clone(node) {
                Some(clone) => clone,
                None => state.create(MockNode {
                    visible: true,
                    ..MockNode::default()
                }),
            }
        };
        self.record(DomCall::CloneNode { source: node, clone });
        clone
    }

    fn insert_before(&self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        self.record(DomCall::InsertBefore {
            parent,
            node,
            reference,
        });
        self.state.lock().insert(parent, node, reference);
    }

    fn replace_child(&self, parent: NodeId, new_child: NodeId, old_child: NodeId) {
        self.record(DomCall::ReplaceChild {
            parent,
            new_child,
            old_child,
        });
        let mut state = self.state.lock();
        let is_child = state
            .nodes
            .get(&old_child)
            .is_some_and(|data| data.parent == Some(parent));
        if !is_child {
            return;
        }
        state.insert(parent, new_child, Some(old_child));
        state.detach(old_child);
    }

    fn remove(&self, node: NodeId) {
        self.record(DomCall::Remove { node });
        self.state.lock().delete(node);
    }

    fn style_property(&self, node: NodeId, name: &str) -> String {
        self.state
            .lock()
            .nodes
            .get(&node)
            .and_then(|data| data.styles.get(name).cloned())
            .unwrap_or_default()
    }

    fn set_style_property(&self, node: NodeId, name: &str, value: &str) {
        self.record(DomCall::SetStyle {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        if let Some(data) = self.state.lock().nodes.get_mut(&node) {
            if value.is_empty() {
                data.styles.remove(name);
            } else {
                data.styles.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.record(DomCall::SetAttribute {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        if let Some(data) = self.state.lock().nodes.get_mut(&node) {
            data.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn toggle_class(&self, node: NodeId, class: &str, enabled: bool) {
        self.record(DomCall::ToggleClass {
            node,
            class: class.to_owned(),
            enabled,
        });
        if let Some(data) = self.state.lock().nodes.get_mut(&node) {
            if enabled {
                data.classes.insert(class.to_owned());
            } else {
                data.classes.remove(class);
            }
        }
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        self.record(DomCall::SetVisible { node, visible });
        if let Some(data) = self.state.lock().nodes.get_mut(&node) {
            data.visible = visible;
        }
    }

    fn transform_transition_duration(&self, node: NodeId) -> Duration {
        self.state
            .lock()
            .nodes
            .get(&node)
            .map(|data| data.transition)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(top: f32, height: f32) -> ClientRect {
        ClientRect::new(0.0, top, 100.0, height)
    }

    #[test]
    fn test_insert_before_moves_node() {
        let dom = MockDom::new();
        let list = dom.append(dom.body(), rect(0.0, 300.0));
        let a = dom.append(list, rect(0.0, 30.0));
        let b = dom.append(list, rect(30.0, 30.0));

        dom.insert_before(list, b, Some(a));
        assert_eq!(dom.children(list), vec![b, a]);

        dom.insert_before(dom.body(), a, None);
        assert_eq!(dom.children(list), vec![b]);
        assert_eq!(dom.parent(a), Some(dom.body()));
    }

    #[test]
    fn test_replace_child_keeps_slot() {
        let dom = MockDom::new();
        let list = dom.append(dom.body(), rect(0.0, 300.0));
        let a = dom.append(list, rect(0.0, 30.0));
        let b = dom.append(list, rect(30.0, 30.0));
        let c = dom.create_comment();

        dom.replace_child(list, c, a);
        assert_eq!(dom.children(list), vec![c, b]);
        assert_eq!(dom.parent(a), None);
    }

    #[test]
    fn test_clone_copies_geometry_and_styles() {
        let dom = MockDom::new();
        let a = dom.append(dom.body(), rect(10.0, 30.0));
        dom.set_style_property(a, "transform", "scale(2)");
        let clone = dom.clone_node(a);

        assert_eq!(dom.client_rect(clone), rect(10.0, 30.0));
        assert_eq!(dom.style_property(clone, "transform"), "scale(2)");
        assert_eq!(dom.parent(clone), None);
    }

    #[test]
    fn test_element_from_point_skips_hidden_and_pass_through() {
        let dom = MockDom::new();
        let list = dom.append(dom.body(), rect(0.0, 300.0));
        let item = dom.append(list, rect(0.0, 30.0));
        let overlay = dom.append(dom.body(), rect(0.0, 300.0));
        dom.set_style_property(overlay, "pointer-events", "none");

        assert_eq!(dom.element_from_point(Vec2::new(10.0, 10.0)), Some(item));
        dom.set_visible(item, false);
        assert_eq!(dom.element_from_point(Vec2::new(10.0, 10.0)), Some(list));
    }

    #[test]
    fn test_scroll_by_is_clamped() {
        let dom = MockDom::new();
        let scroller = dom.append(dom.body(), rect(0.0, 200.0));
        dom.set_scroll_metrics(
            scroller,
            ScrollMetrics {
                scroll_height: 300.0,
                client_height: 200.0,
                ..ScrollMetrics::default()
            },
        );

        dom.scroll_by(ScrollTarget::Element(scroller), Vec2::new(0.0, -5.0));
        assert_eq!(dom.scroll_metrics(scroller).scroll_top, 0.0);
        dom.scroll_by(ScrollTarget::Element(scroller), Vec2::new(0.0, 500.0));
        assert_eq!(dom.scroll_metrics(scroller).scroll_top, 100.0);
        assert_eq!(dom.scroll_by_calls().len(), 2);
    }
}
