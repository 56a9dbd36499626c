//! Scroll positions and rects of the scrollable ancestors of a drag.
//!
//! The tracker is filled when a drag starts and patched in place on every
//! scroll, so rect lookups during the drag never hit the host's layout.

use sortable_core::alloc::IndexMap;
use sortable_core::geometry::{ClientRect, ScrollPosition};
use sortable_core::profiling::profile_function;

use crate::host::{DomHost, NodeId, ScrollTarget};

/// Cached state of one scrollable node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEntry {
    pub scroll_position: ScrollPosition,
    /// `None` for the document.
    pub client_rect: Option<ClientRect>,
}

/// Keeps track of the scroll position and rect of a set of nodes.
///
/// Iteration order is insertion order: the document first, then the nodes
/// in the order they were passed to [`cache`](Self::cache).
#[derive(Debug, Default)]
pub struct ParentPositionTracker {
    positions: IndexMap<ScrollTarget, ScrollEntry>,
}

impl ParentPositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Replace the cache with the document and `elements`.
    pub fn cache<H: DomHost + ?Sized>(&mut self, host: &H, elements: &[NodeId]) {
        profile_function!();
        self.clear();
        self.positions.insert(
            ScrollTarget::Document,
            ScrollEntry {
                scroll_position: host.viewport_scroll_position(),
                client_rect: None,
            },
        );

        for &element in elements {
            self.positions.insert(
                ScrollTarget::Element(element),
                ScrollEntry {
                    scroll_position: host.scroll_metrics(element).position(),
                    client_rect: Some(host.client_rect(element)),
                },
            );
        }
    }

    /// Record a scroll on `target` and shift every cached rect inside it.
    ///
    /// Returns how far content moved (`old - new` scroll position), or `None`
    /// when `target` is not tracked.
    pub fn handle_scroll<H: DomHost + ?Sized>(
        &mut self,
        host: &H,
        target: ScrollTarget,
    ) -> Option<ScrollPosition> {
        profile_function!();
        let old = self.positions.get(&target)?.scroll_position;
        let new = match target {
            ScrollTarget::Document => host.viewport_scroll_position(),
            ScrollTarget::Element(node) => host.scroll_metrics(node).position(),
        };
        let top_diff = old.top - new.top;
        let left_diff = old.left - new.left;

        for (key, entry) in self.positions.iter_mut() {
            if *key == target {
                continue;
            }
            let Some(rect) = entry.client_rect.as_mut() else {
                continue;
            };
            let inside = match (target, key) {
                (ScrollTarget::Document, _) => true,
                (ScrollTarget::Element(scrolled), ScrollTarget::Element(node)) => {
                    host.contains(scrolled, *node)
                }
                (ScrollTarget::Element(_), ScrollTarget::Document) => false,
            };
            if inside {
                rect.adjust(top_diff, left_diff);
            }
        }

        if let Some(entry) = self.positions.get_mut(&target) {
            entry.scroll_position = new;
        }

        Some(ScrollPosition::new(top_diff, left_diff))
    }

    pub fn get(&self, target: ScrollTarget) -> Option<&ScrollEntry> {
        self.positions.get(&target)
    }

    /// Cached rect of an element, if tracked.
    pub fn client_rect(&self, node: NodeId) -> Option<ClientRect> {
        self.positions
            .get(&ScrollTarget::Element(node))
            .and_then(|entry| entry.client_rect)
    }

    /// Viewport scroll position captured by the last `cache` or scroll.
    pub fn viewport_scroll_position(&self) -> Option<ScrollPosition> {
        self.positions
            .get(&ScrollTarget::Document)
            .map(|entry| entry.scroll_position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScrollTarget, &ScrollEntry)> {
        self.positions.iter().map(|(target, entry)| (*target, entry))
    }
}
