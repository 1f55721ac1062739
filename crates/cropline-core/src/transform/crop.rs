//! Rotate-then-crop in source pixel space.
//!
//! The crop rectangle is given in the source image's own, unrotated
//! coordinate system. The image is first rotated about its centre on a
//! safe-area canvas, then a window the size of the crop rectangle is cut out
//! of that canvas, positioned by the rectangle's offset from the image
//! centre.
//!
//! # Coordinate System
//!
//! - Crop coordinates are source pixels; origin is the top-left corner
//! - `x` and `y` may be negative or beyond the image; uncovered output
//!   pixels stay transparent
//! - Rotation is in degrees, positive = clockwise on screen

use imageproc::geometric_transformations::Projection;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::rotation::{degrees_to_radians, safe_area};
use crate::decode::SourceImage;
use crate::error::CropError;
use crate::raster::{InterpolationFilter, PixelData, Raster};

/// Offsets beyond this magnitude cannot overlap any allocatable canvas.
const MAX_OFFSET: f64 = (1u64 << 40) as f64;

/// Crop rectangle in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check that the rectangle has a positive, finite size and a finite
    /// position. The position is not checked against the image bounds.
    pub fn validate(&self) -> Result<(), CropError> {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(self.invalid());
        }
        Ok(())
    }

    /// Output size in whole pixels.
    ///
    /// Fractional sizes truncate toward zero, as assigning them to a canvas
    /// would. A size that truncates to zero is rejected.
    pub fn pixel_size(&self) -> Result<(u32, u32), CropError> {
        self.validate()?;
        let width = self.width.min(u32::MAX as f64) as u32;
        let height = self.height.min(u32::MAX as f64) as u32;
        if width == 0 || height == 0 {
            return Err(self.invalid());
        }
        Ok((width, height))
    }

    fn invalid(&self) -> CropError {
        CropError::InvalidRegion {
            width: self.width,
            height: self.height,
        }
    }
}

/// Rotate `image` by `rotation_degrees` about its centre and cut out `region`.
///
/// # Algorithm
///
/// 1. `safe = 2 * ((max(W, H) / 2) * sqrt(2))`
/// 2. allocate a `safe x safe` canvas
/// 3. transform: translate(safe/2, safe/2), rotate, translate(-safe/2, -safe/2)
/// 4. draw the image at `(safe/2 - W/2, safe/2 - H/2)`
/// 5. take the whole safe canvas, releasing it
/// 6. allocate a `region.width x region.height` canvas
/// 7. paste the safe pixels at
///    `(round(-safe/2 + W/2 - x), round(-safe/2 + H/2 - y))`
///
/// A non-finite rotation is ignored (treated as 0), as a drawing context
/// ignores non-finite transform arguments. Both canvas sizes are checked
/// before anything is drawn.
#[instrument(skip(image), fields(width = image.width, height = image.height))]
pub fn render_crop(
    image: &SourceImage,
    region: &CropRegion,
    rotation_degrees: f64,
    filter: InterpolationFilter,
) -> Result<Raster, CropError> {
    let (out_w, out_h) = region.pixel_size()?;
    image.validate()?;

    let rotation = if rotation_degrees.is_finite() {
        rotation_degrees
    } else {
        warn!(rotation_degrees, "ignoring non-finite rotation");
        0.0
    };

    let (w, h) = (image.width as f64, image.height as f64);
    let safe = safe_area(image.width, image.height);
    let half = safe / 2.0;
    let side = safe as u32;
    Raster::check_size(out_w, out_h)?;

    let transform = Projection::translate(half as f32, half as f32)
        * Projection::rotate(degrees_to_radians(rotation) as f32)
        * Projection::translate(-half as f32, -half as f32);

    let rotated: PixelData = {
        let mut canvas = Raster::new(side, side)?;
        canvas.draw(image, half - w * 0.5, half - h * 0.5, &transform, filter);
        canvas.into_pixels()
    };

    let offset_x = round_half_up(0.0 - half + w * 0.5 - region.x);
    let offset_y = round_half_up(0.0 - half + h * 0.5 - region.y);
    debug!(safe, side, offset_x, offset_y, out_w, out_h, "crop geometry");

    let misses = offset_x >= out_w as i64
        || offset_y >= out_h as i64
        || offset_x + side as i64 <= 0
        || offset_y + side as i64 <= 0;
    if misses {
        warn!(?region, "crop window lies entirely outside the rotated image");
    }

    let mut output = Raster::new(out_w, out_h)?;
    output.put_pixels(&rotated, offset_x, offset_y);
    Ok(output)
}

/// Round to the nearest integer with halves going toward +infinity
/// (`-2.5 -> -2`, `2.5 -> 3`), clamped to a range the raster maths can hold.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor().clamp(-MAX_OFFSET, MAX_OFFSET) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterError;

    /// Opaque image whose red channel encodes x and green encodes y.
    fn coord_image(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0, 255]);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    /// Opaque image whose top-left quadrant is red and everything else grey.
    fn quadrant_image(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                if x < width / 2 && y < height / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }
        SourceImage::new(width, height, pixels)
    }

    fn crop(
        image: &SourceImage,
        region: &CropRegion,
        rotation: f64,
        filter: InterpolationFilter,
    ) -> PixelData {
        render_crop(image, region, rotation, filter).unwrap().into_pixels()
    }

    fn px(pixels: &PixelData, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * pixels.width + x) * 4) as usize;
        [
            pixels.data[i],
            pixels.data[i + 1],
            pixels.data[i + 2],
            pixels.data[i + 3],
        ]
    }

    /// Resampling may truncate a channel by one step.
    fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
        let close = actual
            .iter()
            .zip(expected)
            .all(|(a, e)| (*a as i32 - e as i32).abs() <= 2);
        assert!(close, "expected about {:?}, got {:?}", expected, actual);
    }

    #[test]
    fn test_region_validate() {
        assert!(CropRegion::new(0.0, 0.0, 10.0, 10.0).validate().is_ok());
        assert!(CropRegion::new(-50.0, 900.0, 10.0, 10.0).validate().is_ok());
        assert!(CropRegion::new(0.0, 0.0, 0.0, 10.0).validate().is_err());
        assert!(CropRegion::new(0.0, 0.0, 10.0, -1.0).validate().is_err());
        assert!(CropRegion::new(f64::NAN, 0.0, 10.0, 10.0).validate().is_err());
        assert!(CropRegion::new(0.0, 0.0, f64::INFINITY, 10.0).validate().is_err());
    }

    #[test]
    fn test_region_pixel_size_truncates() {
        let region = CropRegion::new(0.0, 0.0, 100.7, 49.2);
        assert_eq!(region.pixel_size().unwrap(), (100, 49));

        let tiny = CropRegion::new(0.0, 0.0, 0.5, 10.0);
        assert!(tiny.pixel_size().unwrap_err().is_invalid_region());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-132.84), -133);
        assert_eq!(round_half_up(8.58), 9);
        assert_eq!(round_half_up(1e300), MAX_OFFSET as i64);
    }

    #[test]
    fn test_output_matches_region_size() {
        let img = coord_image(400, 300);
        let region = CropRegion::new(50.0, 50.0, 100.0, 100.0);
        let out = render_crop(&img, &region, 0.0, InterpolationFilter::Bilinear).unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
    }

    #[test]
    fn test_unrotated_crop_starts_at_region_origin() {
        let img = coord_image(400, 300);
        let region = CropRegion::new(50.0, 50.0, 100.0, 100.0);
        let out = crop(&img, &region, 0.0, InterpolationFilter::Bilinear);

        let first = px(&out, 0, 0);
        assert!((first[0] as i32 - 50).abs() <= 1, "red was {}", first[0]);
        assert!((first[1] as i32 - 50).abs() <= 1, "green was {}", first[1]);
        assert!(first[3] >= 254);

        let last = px(&out, 99, 99);
        assert!((last[0] as i32 - 149).abs() <= 1, "red was {}", last[0]);
        assert!((last[1] as i32 - 149).abs() <= 1, "green was {}", last[1]);
    }

    #[test]
    fn test_region_left_of_image_is_transparent_there() {
        let img = coord_image(200, 200);
        let region = CropRegion::new(-50.0, 0.0, 100.0, 100.0);
        let out = crop(&img, &region, 0.0, InterpolationFilter::Bilinear);

        assert_eq!((out.width, out.height), (100, 100));
        assert_eq!(px(&out, 10, 50), [0, 0, 0, 0]);
        assert!(px(&out, 80, 50)[3] >= 254);
    }

    #[test]
    fn test_last_source_column_survives() {
        let img = coord_image(40, 20);
        let region = CropRegion::new(0.0, 0.0, 40.0, 20.0);
        let out = crop(&img, &region, 0.0, InterpolationFilter::Nearest);

        assert_near(px(&out, 39, 10), [39, 10, 0, 255]);
        assert_near(px(&out, 20, 19), [20, 19, 0, 255]);
    }

    #[test]
    fn test_region_far_outside_is_blank() {
        let img = coord_image(50, 50);
        let region = CropRegion::new(5_000.0, -5_000.0, 20.0, 10.0);
        let out = crop(&img, &region, 30.0, InterpolationFilter::Bilinear);
        assert_eq!((out.width, out.height), (20, 10));
        assert!(out.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_half_turn_mirrors_both_axes() {
        let img = quadrant_image(100, 50);
        let region = CropRegion::new(0.0, 0.0, 100.0, 50.0);
        let out = crop(&img, &region, 180.0, InterpolationFilter::Bilinear);

        // The red top-left quadrant ends up bottom-right.
        assert_near(px(&out, 80, 40), [255, 0, 0, 255]);
        assert_near(px(&out, 10, 10), [128, 128, 128, 255]);
    }

    #[test]
    fn test_quarter_turn_is_clockwise() {
        let img = quadrant_image(100, 50);
        // The rotated image spans x 25..75 and y -25..75 in source space.
        let region = CropRegion::new(25.0, -25.0, 50.0, 100.0);
        let out = crop(&img, &region, 90.0, InterpolationFilter::Bilinear);

        assert_eq!((out.width, out.height), (50, 100));
        // Top-left quadrant moves to the top-right.
        assert_near(px(&out, 40, 20), [255, 0, 0, 255]);
        assert_near(px(&out, 10, 20), [128, 128, 128, 255]);
        assert_near(px(&out, 40, 80), [128, 128, 128, 255]);
    }

    #[test]
    fn test_full_turn_matches_no_rotation() {
        let img = coord_image(64, 48);
        let region = CropRegion::new(8.0, 4.0, 40.0, 30.0);
        let a = crop(&img, &region, 0.0, InterpolationFilter::Bilinear);
        let b = crop(&img, &region, 360.0, InterpolationFilter::Bilinear);

        let max_diff = a
            .data
            .iter()
            .zip(&b.data)
            .map(|(x, y)| (*x as i32 - *y as i32).abs())
            .max()
            .unwrap_or(0);
        assert!(max_diff <= 2, "max channel difference was {}", max_diff);
    }

    #[test]
    fn test_non_finite_rotation_is_ignored() {
        let img = coord_image(30, 20);
        let region = CropRegion::new(2.0, 2.0, 10.0, 10.0);
        let plain = crop(&img, &region, 0.0, InterpolationFilter::Bilinear);
        let nan = crop(&img, &region, f64::NAN, InterpolationFilter::Bilinear);
        assert_eq!(plain, nan);
    }

    #[test]
    fn test_deterministic() {
        let img = coord_image(40, 40);
        let region = CropRegion::new(3.0, 7.0, 25.0, 20.0);
        let a = crop(&img, &region, 33.3, InterpolationFilter::Bilinear);
        let b = crop(&img, &region, 33.3, InterpolationFilter::Bilinear);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_region_rejected_before_drawing() {
        let img = coord_image(10, 10);
        let region = CropRegion::new(0.0, 0.0, 0.0, 5.0);
        let err = render_crop(&img, &region, 0.0, InterpolationFilter::Bilinear).unwrap_err();
        assert!(err.is_invalid_region());
    }

    #[test]
    fn test_oversized_region_is_raster_error() {
        let img = coord_image(10, 10);
        let region = CropRegion::new(0.0, 0.0, 40_000.0, 10.0);
        let err = render_crop(&img, &region, 0.0, InterpolationFilter::Bilinear).unwrap_err();
        assert!(matches!(
            err,
            CropError::Raster(RasterError::TooLarge {
                width: 40_000,
                height: 10
            })
        ));
    }

    #[test]
    fn test_oversized_source_is_raster_error() {
        // Safe canvas side for 24000 px is about 33941, over the side limit.
        let img = SourceImage::new(24_000, 1, vec![0; 24_000 * 4]);
        let region = CropRegion::new(0.0, 0.0, 10.0, 10.0);
        let err = render_crop(&img, &region, 0.0, InterpolationFilter::Bilinear).unwrap_err();
        assert!(matches!(err, CropError::Raster(RasterError::TooLarge { .. })));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = SourceImage::new(0, 0, vec![]);
        let region = CropRegion::new(0.0, 0.0, 5.0, 5.0);
        let err = render_crop(&img, &region, 0.0, InterpolationFilter::Bilinear).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_single_pixel_image() {
        let img = SourceImage::new(1, 1, vec![10, 20, 30, 255]);
        let region = CropRegion::new(0.0, 0.0, 1.0, 1.0);
        let out = render_crop(&img, &region, 45.0, InterpolationFilter::Nearest).unwrap();
        assert_eq!((out.width(), out.height()), (1, 1));
    }
}
