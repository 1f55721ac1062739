//! Rotation geometry for the crop pipeline.
//!
//! Rotation happens about the image centre on a square "safe area" canvas
//! whose side is the image's worst-case rotated extent, so no corner is ever
//! clipped before the crop window is taken.

use std::f64::consts::{PI, SQRT_2};

/// Side length of the square canvas that holds a `width x height` image at
/// any rotation without clipping.
///
/// ```text
/// safe_area = 2 * ((max(W, H) / 2) * sqrt(2))
/// ```
///
/// This is the diagonal of the square built on the longer side, so it is
/// never smaller than the image's own diagonal `sqrt(W^2 + H^2)`.
pub fn safe_area(width: u32, height: u32) -> f64 {
    let max_size = width.max(height) as f64;
    2.0 * ((max_size / 2.0) * SQRT_2)
}

/// Convert degrees to radians as `deg * PI / 180`.
///
/// No normalisation is applied: 360, 720 and -90 all go straight through the
/// trig functions.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Bounding box of a `width x height` rectangle rotated by `angle_degrees`
/// about its centre.
///
/// ```text
/// new_w = |w * cos| + |h * sin|
/// new_h = |w * sin| + |h * cos|
/// ```
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees_to_radians(angle_degrees).sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (w, h) = (width as f64, height as f64);
    (w * cos + h * sin, w * sin + h * cos)
}
