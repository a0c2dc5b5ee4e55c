//! Vector helpers for observer-relative geometry
//!
//! Positions use a Z-up frame: X/Y span the horizontal plane and yaw is a
//! rotation around Z. All helpers are total; zero-length inputs produce a
//! zero direction rather than NaN.

pub use glam::Vec3;

/// Unit direction of `v`, or [`Vec3::ZERO`] when `v` has no length
#[inline]
pub fn direction(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Rotate `v` counter-clockwise around the Z axis by `yaw_radians`
///
/// The Z component is left untouched.
pub fn rotate_yaw(v: Vec3, yaw_radians: f32) -> Vec3 {
    let (sin, cos) = yaw_radians.sin_cos();
    Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

/// Cosine similarity of two vectors clamped to `[0, 1]`
///
/// Vectors pointing away from each other, and degenerate vectors, align
/// with zero strength.
pub fn alignment(a: Vec3, b: Vec3) -> f32 {
    direction(a).dot(direction(b)).max(0.0)
}
