//! Client-rect geometry used by the drag-and-drop caches.
//!
//! All rectangles are in viewport (client) coordinates, matching what a DOM
//! `getBoundingClientRect` reports. Cached rects are mutated in place as the
//! page scrolls or siblings are shifted, so [`ClientRect::adjust`] is the only
//! way positions move once measured.

use crate::math::Vec2;

/// A mutable client rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ClientRect {
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rect spanning the given edges.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True when the rect has no area on either axis (e.g. a hidden element).
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Shift the rect by `top`/`left` pixels, keeping its size.
    pub fn adjust(&mut self, top: f32, left: f32) {
        self.top += top;
        self.left += left;
    }

    /// Whether a point lies inside the rect, edges inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        y >= self.top && y <= self.bottom() && x >= self.left && x <= self.right()
    }

    /// Whether a point is inside the rect grown by `threshold` of its
    /// width/height on every side. Edges are exclusive.
    pub fn is_near(&self, threshold: f32, x: f32, y: f32) -> bool {
        let x_threshold = self.width * threshold;
        let y_threshold = self.height * threshold;

        y > self.top - y_threshold
            && y < self.bottom() + y_threshold
            && x > self.left - x_threshold
            && x < self.right() + x_threshold
    }
}

/// Scroll offsets of a node or of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub top: f32,
    pub left: f32,
}

impl ScrollPosition {
    pub const fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }

    /// As a `(left, top)` vector.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }
}

/// Clamp that tolerates an inverted range by favouring `min`.
///
/// Used when a boundary is smaller than the dragged element: the position is
/// pinned to the leading edge instead of panicking like [`f32::clamp`].
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let rect = ClientRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(ClientRect::from_edges(10.0, 20.0, 40.0, 60.0), rect);
    }

    #[test]
    fn test_adjust_keeps_size() {
        let mut rect = ClientRect::new(0.0, 0.0, 50.0, 20.0);
        rect.adjust(-15.0, 5.0);
        assert_eq!(rect.top, -15.0);
        assert_eq!(rect.left, 5.0);
        assert_eq!(rect.bottom(), 5.0);
        assert_eq!(rect.right(), 55.0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let rect = ClientRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(100.0, 100.0));
        assert!(!rect.contains(100.5, 50.0));
    }

    #[test]
    fn test_is_near_uses_proportional_band() {
        let rect = ClientRect::new(0.0, 0.0, 200.0, 100.0);
        // 5% of 100 = 5px vertical band, 5% of 200 = 10px horizontal band.
        assert!(rect.is_near(0.05, 50.0, -4.0));
        assert!(!rect.is_near(0.05, 50.0, -5.0));
        assert!(rect.is_near(0.05, -9.0, 50.0));
        assert!(!rect.is_near(0.05, -11.0, 50.0));
    }

    #[test]
    fn test_clamp_inverted_range_pins_to_min() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(50.0, 20.0, 10.0), 20.0);
        assert_eq!(clamp(-50.0, 20.0, 10.0), 20.0);
    }
}
