//! Scoped RGBA raster canvas.
//!
//! A `Raster` owns its pixel buffer and is released when it goes out of
//! scope, on success and error paths alike. The only operations are the ones
//! the crop pipeline needs: draw an image through a transform, take the whole
//! buffer, paste a buffer at an integer offset, and encode.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::SourceImage;
use crate::encode::{self, EncodeError};
use crate::CropOptions;

/// Largest side a raster may have, matching common browser canvas limits.
pub const MAX_SIDE: u32 = 32_767;

/// Largest pixel count a raster may have.
pub const MAX_AREA: u64 = 268_435_456;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Errors raised when allocating a raster.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("Raster size {width}x{height} must be non-zero")]
    Empty { width: u32, height: u32 },

    #[error("Raster size {width}x{height} exceeds the canvas limit")]
    TooLarge { width: u32, height: u32 },
}

/// Interpolation used when drawing an image through a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest neighbor, no smoothing.
    Nearest,
    /// Bilinear smoothing, the canvas default.
    #[default]
    Bilinear,
}

impl From<InterpolationFilter> for Interpolation {
    fn from(filter: InterpolationFilter) -> Self {
        match filter {
            InterpolationFilter::Nearest => Interpolation::Nearest,
            InterpolationFilter::Bilinear => Interpolation::Bilinear,
        }
    }
}

/// A snapshot of raster pixels (straight-alpha RGBA, row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// An owned RGBA canvas, transparent when created.
#[derive(Debug)]
pub struct Raster {
    buffer: RgbaImage,
}

impl Raster {
    /// Allocate a transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::check_size(width, height)?;
        Ok(Self {
            buffer: RgbaImage::new(width, height),
        })
    }

    /// Whether a canvas of this size could be allocated, without allocating it.
    pub fn check_size(width: u32, height: u32) -> Result<(), RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty { width, height });
        }
        if width > MAX_SIDE || height > MAX_SIDE || width as u64 * height as u64 > MAX_AREA {
            return Err(RasterError::TooLarge { width, height });
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Draw `image` with its top-left corner at `(dx, dy)` in user space,
    /// mapped to device space by `transform`.
    ///
    /// Each device pixel is sampled at its centre through the inverse
    /// transform. The whole canvas is rewritten: pixels the image does not
    /// cover become transparent, and edge pixels get partial alpha. Draw once
    /// onto a fresh raster.
    pub fn draw(
        &mut self,
        image: &SourceImage,
        dx: f64,
        dy: f64,
        transform: &Projection,
        filter: InterpolationFilter,
    ) {
        if image.is_empty() {
            return;
        }

        // Pixel (i, j) of the bordered image has its centre at
        // (dx + i - 0.5, dy + j - 0.5) in user space; device pixel centres
        // sit half a pixel off their indices.
        let placement = Projection::translate(-0.5, -0.5)
            * *transform
            * Projection::translate((dx - 0.5) as f32, (dy - 0.5) as f32);

        let source = bordered(image);
        warp_into(&source, &placement, filter.into(), TRANSPARENT, &mut self.buffer);

        for px in self.buffer.pixels_mut() {
            if px[3] == 0 {
                *px = TRANSPARENT;
            }
        }
    }

    /// Take the whole canvas, releasing the raster.
    pub fn into_pixels(self) -> PixelData {
        let (width, height) = self.buffer.dimensions();
        PixelData {
            width,
            height,
            data: self.buffer.into_raw(),
        }
    }

    /// Replace canvas pixels with `pixels` placed at the integer offset
    /// `(dx, dy)`. No blending; whatever falls outside the canvas is dropped.
    pub fn put_pixels(&mut self, pixels: &PixelData, dx: i64, dy: i64) {
        let dst_w = self.width() as i64;
        let dst_h = self.height() as i64;
        let src_w = pixels.width as i64;

        let col_start = (-dx).max(0);
        let col_end = (dst_w - dx).min(src_w);
        if col_start >= col_end {
            return;
        }
        let span = (col_end - col_start) as usize * 4;

        let data: &mut [u8] = &mut self.buffer;
        for row in 0..pixels.height as i64 {
            let ty = row + dy;
            if ty < 0 || ty >= dst_h {
                continue;
            }
            let src_idx = ((row * src_w + col_start) * 4) as usize;
            let dst_idx = ((ty * dst_w + col_start + dx) * 4) as usize;
            data[dst_idx..dst_idx + span].copy_from_slice(&pixels.data[src_idx..src_idx + span]);
        }
    }

    /// Encode the canvas per `options` (format, quality, JPEG background).
    pub fn encode(&self, options: &CropOptions) -> Result<Vec<u8>, EncodeError> {
        encode::encode_rgba(
            self.buffer.as_raw(),
            self.width(),
            self.height(),
            options.format,
            options.quality,
            options.background,
        )
    }
}

/// Copy of `image` with a one-pixel transparent border.
///
/// Border pixels repeat the nearest edge colour at zero alpha, so bilinear
/// sampling fades the edges out without darkening them, and the last row and
/// column are still sampled.
fn bordered(image: &SourceImage) -> RgbaImage {
    let (w, h) = (image.width, image.height);
    RgbaImage::from_fn(w + 2, h + 2, |x, y| {
        let sx = x.saturating_sub(1).min(w - 1);
        let sy = y.saturating_sub(1).min(h - 1);
        let mut px = image.pixel(sx, sy);
        if x == 0 || y == 0 || x > w || y > h {
            px[3] = 0;
        }
        Rgba(px)
    })
}
