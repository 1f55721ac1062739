//! Output encoding for cropped images.
//!
//! This module provides functionality for:
//! - Encoding RGBA canvases to JPEG (alpha flattened onto a background)
//! - Encoding RGBA canvases to PNG (alpha preserved)
//!
//! Quality is expressed the way the browser's canvas export API takes it: a
//! number in `0.0..=1.0`, mapped to the encoder's 1-100 scale.

mod jpeg;
mod png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jpeg::{encode_jpeg, encode_jpeg_rgba, flatten_rgba};
pub use png::encode_png_rgba;

/// Errors that can occur while encoding output images.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Compressed output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG; transparent pixels are flattened onto the background.
    #[default]
    Jpeg,
    /// Lossless PNG with alpha.
    Png,
}

impl OutputFormat {
    /// MIME type for upload headers and `Blob` construction.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Map a `0.0..=1.0` quality to the JPEG encoder's 1-100 scale.
///
/// Out-of-range and NaN values fall back to the nearest bound (NaN to the
/// default of 0.9), since the export API never rejects a quality argument.
pub fn quality_to_percent(quality: f32) -> u8 {
    let q = if quality.is_nan() { 0.9 } else { quality };
    (q.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode straight-alpha RGBA pixels in the requested format.
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
    quality: f32,
    background: [u8; 3],
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg => {
            encode_jpeg_rgba(pixels, width, height, quality_to_percent(quality), background)
        }
        OutputFormat::Png => encode_png_rgba(pixels, width, height),
    }
}

fn check_buffer(pixels: &[u8], width: u32, height: u32, channels: usize) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * channels;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_mapping() {
        assert_eq!(quality_to_percent(0.9), 90);
        assert_eq!(quality_to_percent(1.0), 100);
        assert_eq!(quality_to_percent(0.0), 1);
        assert_eq!(quality_to_percent(2.5), 100);
        assert_eq!(quality_to_percent(-1.0), 1);
        assert_eq!(quality_to_percent(f32::NAN), 90);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
    }

    #[test]
    fn test_encode_rgba_dispatch() {
        let pixels = vec![50u8; 4 * 4 * 4];
        let jpeg = encode_rgba(&pixels, 4, 4, OutputFormat::Jpeg, 0.9, [0, 0, 0]).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let png = encode_rgba(&pixels, 4, 4, OutputFormat::Png, 0.9, [0, 0, 0]).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
