//! Cropline Core - rotate-and-crop export engine
//!
//! This crate turns a user's crop selection into an upload-ready image: it
//! decodes the selected file, rotates it about its centre, cuts out the crop
//! rectangle and encodes the result.
//!
//! # Module Structure
//!
//! - `decode` - Source image decoding (bytes or `data:` URL, EXIF orientation)
//! - `raster` - Scoped RGBA canvas, drawn through `imageproc` projections
//! - `transform` - Safe-area rotation geometry and the crop algorithm
//! - `encode` - JPEG/PNG output encoding
//! - `engine` - [`CropTransformEngine`], tying the pieces together

pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod raster;
pub mod transform;

pub use decode::{decode_data_url, decode_image, DecodeError, SourceImage};
pub use encode::{EncodeError, OutputFormat};
pub use engine::{crop_image, CropTransformEngine, OutputImage};
pub use error::CropError;
pub use raster::InterpolationFilter;
pub use transform::{render_crop, safe_area, CropRegion};

/// Default JPEG quality on the `0.0..=1.0` scale.
pub const DEFAULT_QUALITY: f32 = 0.9;

/// Options for a crop call.
///
/// Deserializes from a partial object; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropOptions {
    /// Clockwise rotation in degrees, applied about the image centre (default 0)
    pub rotation: f64,
    /// Encoder quality from 0.0 to 1.0 (default 0.9, JPEG only)
    pub quality: f32,
    /// Output encoding (default JPEG)
    pub format: OutputFormat,
    /// Sampling used when drawing the rotated image (default bilinear)
    pub interpolation: InterpolationFilter,
    /// Colour that transparent pixels are flattened onto for JPEG (default black)
    pub background: [u8; 3],
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            quality: DEFAULT_QUALITY,
            format: OutputFormat::Jpeg,
            interpolation: InterpolationFilter::Bilinear,
            background: [0, 0, 0],
        }
    }
}

impl CropOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationFilter) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }
}
