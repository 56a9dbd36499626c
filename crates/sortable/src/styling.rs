//! CSS transform strings and inline-style helpers.

use sortable_core::math::Vec2;

use crate::host::{DomHost, NodeId};

pub const TRANSFORM: &str = "transform";
pub const SCROLL_SNAP_TYPE: &str = "scroll-snap-type";
pub const POINTER_EVENTS: &str = "pointer-events";
pub const POSITION: &str = "position";

/// `translate3d` with unrounded pixel offsets.
pub fn translate3d(x: f32, y: f32) -> String {
    format!("translate3d({}px, {}px, 0)", px(x), px(y))
}

/// `translate3d` snapped to whole pixels, used for the element following the pointer.
pub fn rounded_translate3d(offset: Vec2) -> String {
    translate3d(offset.x.round(), offset.y.round())
}

/// SVG `transform` attribute value for a pixel offset.
pub fn svg_translate(offset: Vec2) -> String {
    format!("translate({} {})", px(offset.x), px(offset.y))
}

/// Prepend `transform` to an element's initial transform, if it had one.
pub fn combine_transforms(transform: &str, initial: Option<&str>) -> String {
    match initial {
        Some(initial) if !initial.is_empty() && initial != "none" => {
            format!("{} {}", transform, initial)
        }
        _ => transform.to_owned(),
    }
}

/// Inline transform of a node, `None` when unset.
pub fn read_transform<H: DomHost + ?Sized>(host: &H, node: NodeId) -> Option<String> {
    let value = host.style_property(node, TRANSFORM);
    (!value.is_empty()).then_some(value)
}

pub fn set_transform<H: DomHost + ?Sized>(host: &H, node: NodeId, value: &str) {
    host.set_style_property(node, TRANSFORM, value);
}

// Normalises `-0` so transforms never read `-0px`.
fn px(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate3d() {
        assert_eq!(translate3d(10.0, 0.0), "translate3d(10px, 0px, 0)");
        assert_eq!(translate3d(-0.0, 2.5), "translate3d(0px, 2.5px, 0)");
    }

    #[test]
    fn test_rounded_translate3d() {
        assert_eq!(
            rounded_translate3d(Vec2::new(10.4, -3.6)),
            "translate3d(10px, -4px, 0)"
        );
    }

    #[test]
    fn test_combine_transforms() {
        assert_eq!(combine_transforms("translate3d(1px, 2px, 0)", None), "translate3d(1px, 2px, 0)");
        assert_eq!(
            combine_transforms("translate3d(1px, 2px, 0)", Some("none")),
            "translate3d(1px, 2px, 0)"
        );
        assert_eq!(
            combine_transforms("translate3d(1px, 2px, 0)", Some("scale(2)")),
            "translate3d(1px, 2px, 0) scale(2)"
        );
    }

    #[test]
    fn test_svg_translate() {
        assert_eq!(svg_translate(Vec2::new(3.0, -4.0)), "translate(3 -4)");
    }
}
