/// Fast mathematical operations using SIMD-accelerated `glam` types.
///
/// Pointer positions, pickup offsets, transform offsets and scroll deltas are
/// all plain [`Vec2`] values. SVG user-unit conversions use [`Affine2`].
///
/// # Examples
///
/// ```
/// use sortable_core::math::{Affine2, Vec2};
///
/// let pickup = Vec2::new(10.0, 20.0);
/// let pointer = Vec2::new(35.0, 20.0);
/// assert_eq!(pointer - pickup, Vec2::new(25.0, 0.0));
///
/// let scale = Affine2::from_scale(Vec2::splat(2.0));
/// assert_eq!(scale.inverse().transform_point2(pointer), Vec2::new(17.5, 10.0));
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::*;

/// Manhattan length of a vector, used for drag start thresholds.
#[inline]
pub fn manhattan_length(v: Vec2) -> f32 {
    v.x.abs() + v.y.abs()
}
