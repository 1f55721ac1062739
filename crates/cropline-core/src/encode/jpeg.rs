//! JPEG encoding for cropped output.
//!
//! JPEG has no alpha channel, so RGBA canvases are composited onto a solid
//! background first. A raster canvas exported as JPEG in the browser does the
//! same with black, which is the default background here too.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, values outside are clamped)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    super::check_buffer(pixels, width, height, 3)?;

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Composite straight-alpha RGBA pixels over an opaque background colour.
pub fn flatten_rgba(pixels: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
    for px in pixels.chunks_exact(4) {
        let a = px[3] as u32;
        for c in 0..3 {
            let v = (px[c] as u32 * a + background[c] as u32 * (255 - a) + 127) / 255;
            rgb.push(v as u8);
        }
    }
    rgb
}

/// Encode RGBA pixel data to JPEG, flattening transparency onto `background`.
pub fn encode_jpeg_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
    background: [u8; 3],
) -> Result<Vec<u8>, EncodeError> {
    super::check_buffer(pixels, width, height, 4)?;
    encode_jpeg(&flatten_rgba(pixels, background), width, height, quality)
}
