//! Rotation and cropping geometry.
//!
//! # Transform Order
//!
//! 1. Rotation about the image centre, on a safe-area canvas
//! 2. Crop window, measured in unrotated source pixels
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop coordinates are source pixels, origin at the top-left corner

mod crop;
mod rotation;

pub use crop::{render_crop, CropRegion};
pub use rotation::{degrees_to_radians, rotated_bounds, safe_area};
