//! Host abstraction over the document the engine manipulates.
//!
//! The engine never touches a concrete DOM. Everything it reads (geometry,
//! scroll offsets, hit testing) and everything it writes (transforms,
//! placeholder insertion, scrolling) goes through [`DomHost`].
//!
//! # Interior mutability
//!
//! Every method takes `&self`, mirroring how DOM bindings expose nodes as
//! shared handles. Implementations keep their own state behind a lock or a
//! cell; the engine is single-threaded and never calls back into itself while
//! holding host state.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use sortable_core::geometry::{ClientRect, ScrollPosition};
use sortable_core::math::{Affine2, Vec2};

use crate::config::TextDirection;

/// Opaque handle to a node owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Something that can be scrolled: the document (viewport) or an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    Document,
    Element(NodeId),
}

impl ScrollTarget {
    pub fn element(&self) -> Option<NodeId> {
        match self {
            ScrollTarget::Document => None,
            ScrollTarget::Element(node) => Some(*node),
        }
    }
}

impl From<NodeId> for ScrollTarget {
    fn from(node: NodeId) -> Self {
        ScrollTarget::Element(node)
    }
}

/// Scroll state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub scroll_left: f32,
    pub scroll_width: f32,
    pub scroll_height: f32,
    pub client_width: f32,
    pub client_height: f32,
}

impl ScrollMetrics {
    pub fn position(&self) -> ScrollPosition {
        ScrollPosition::new(self.scroll_top, self.scroll_left)
    }

    pub fn can_scroll_up(&self) -> bool {
        self.scroll_top > 0.0
    }

    pub fn can_scroll_down(&self) -> bool {
        self.scroll_height - self.scroll_top > self.client_height
    }

    /// Right-to-left content starts at `scroll_left == 0` and scrolls
    /// towards negative offsets.
    pub fn can_scroll_left(&self, direction: TextDirection) -> bool {
        match direction {
            TextDirection::Ltr => self.scroll_left > 0.0,
            TextDirection::Rtl => self.scroll_width + self.scroll_left > self.client_width,
        }
    }

    pub fn can_scroll_right(&self, direction: TextDirection) -> bool {
        match direction {
            TextDirection::Ltr => self.scroll_width - self.scroll_left > self.client_width,
            TextDirection::Rtl => self.scroll_left < 0.0,
        }
    }
}

/// Document operations the engine depends on.
pub trait DomHost {
    // -- Geometry --

    /// Bounding client rect of a node, including its current transform.
    fn client_rect(&self, node: NodeId) -> ClientRect;

    fn scroll_metrics(&self, node: NodeId) -> ScrollMetrics;

    fn viewport_scroll_position(&self) -> ScrollPosition;

    fn viewport_size(&self) -> Vec2;

    fn scroll_by(&self, target: ScrollTarget, delta: Vec2);

    /// Topmost hit-testable element at a client point.
    fn element_from_point(&self, point: Vec2) -> Option<NodeId>;

    /// The `<svg>` element owning `node`, if `node` is SVG content.
    fn owner_svg_element(&self, node: NodeId) -> Option<NodeId>;

    /// Matrix mapping the SVG's user units to screen coordinates.
    fn screen_ctm(&self, svg: NodeId) -> Option<Affine2>;

    // -- Tree --

    fn body(&self) -> NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Inclusive descendant check (`node == ancestor` counts).
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    fn create_comment(&self) -> NodeId;

    fn clone_node(&self, node: NodeId) -> NodeId;

    /// Insert `node` into `parent` before `reference`, or append when `None`.
    /// Moves `node` if it is already attached elsewhere.
    fn insert_before(&self, parent: NodeId, node: NodeId, reference: Option<NodeId>);

    fn replace_child(&self, parent: NodeId, new_child: NodeId, old_child: NodeId);

    /// Detach and discard a node.
    fn remove(&self, node: NodeId);

    // -- Styling --

    fn style_property(&self, node: NodeId, name: &str) -> String;

    fn set_style_property(&self, node: NodeId, name: &str, value: &str);

    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    fn toggle_class(&self, node: NodeId, class: &str, enabled: bool);

    /// Hide a node without removing it from layout bookkeeping.
    fn set_visible(&self, node: NodeId, visible: bool);

    /// Computed duration of a transition on the `transform` property.
    fn transform_transition_duration(&self, node: NodeId) -> Duration;
}

macro_rules! forward_dom_host {
    ($($ty:ty),*) => {$(
        impl<T: DomHost + ?Sized> DomHost for $ty {
            fn client_rect(&self, node: NodeId) -> ClientRect { (**self).client_rect(node) }
            fn scroll_metrics(&self, node: NodeId) -> ScrollMetrics { (**self).scroll_metrics(node) }
            fn viewport_scroll_position(&self) -> ScrollPosition { (**self).viewport_scroll_position() }
            fn viewport_size(&self) -> Vec2 { (**self).viewport_size() }
            fn scroll_by(&self, target: ScrollTarget, delta: Vec2) { (**self).scroll_by(target, delta) }
            fn element_from_point(&self, point: Vec2) -> Option<NodeId> { (**self).element_from_point(point) }
            fn owner_svg_element(&self, node: NodeId) -> Option<NodeId> { (**self).owner_svg_element(node) }
            fn screen_ctm(&self, svg: NodeId) -> Option<Affine2> { (**self).screen_ctm(svg) }
            fn body(&self) -> NodeId { (**self).body() }
            fn parent(&self, node: NodeId) -> Option<NodeId> { (**self).parent(node) }
            fn contains(&self, ancestor: NodeId, node: NodeId) -> bool { (**self).contains(ancestor, node) }
            fn create_comment(&self) -> NodeId { (**self).create_comment() }
            fn clone_node(&self, node: NodeId) -> NodeId { (**self).clone_node(node) }
            fn insert_before(&self, parent: NodeId, node: NodeId, reference: Option<NodeId>) { (**self).insert_before(parent, node, reference) }
            fn replace_child(&self, parent: NodeId, new_child: NodeId, old_child: NodeId) { (**self).replace_child(parent, new_child, old_child) }
            fn remove(&self, node: NodeId) { (**self).remove(node) }
            fn style_property(&self, node: NodeId, name: &str) -> String { (**self).style_property(node, name) }
            fn set_style_property(&self, node: NodeId, name: &str, value: &str) { (**self).set_style_property(node, name, value) }
            fn set_attribute(&self, node: NodeId, name: &str, value: &str) { (**self).set_attribute(node, name, value) }
            fn toggle_class(&self, node: NodeId, class: &str, enabled: bool) { (**self).toggle_class(node, class, enabled) }
            fn set_visible(&self, node: NodeId, visible: bool) { (**self).set_visible(node, visible) }
            fn transform_transition_duration(&self, node: NodeId) -> Duration { (**self).transform_transition_duration(node) }
        }
    )*};
}

forward_dom_host!(&T, Rc<T>, Arc<T>, Box<T>);
