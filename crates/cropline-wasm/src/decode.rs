//! Source decoding WASM bindings.
//!
//! The crop editor decodes the selected file once for its preview and uses
//! the safe-area size to lay out the rotated view.
//!
//! # Example
//!
//! ```typescript
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const side = safe_area(image.width, image.height);
//! ```

use crate::types::JsSourceImage;
use cropline_core::{decode, transform};
use wasm_bindgen::prelude::*;

/// Decode an image (JPEG, PNG, GIF, BMP or WebP) with EXIF orientation
/// applied.
///
/// # Errors
///
/// Returns an error if the bytes are not a recognizable or complete image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Side of the square canvas that holds a `width x height` image at any
/// rotation: `2 * ((max(width, height) / 2) * sqrt(2))`.
#[wasm_bindgen]
pub fn safe_area(width: u32, height: u32) -> f64 {
    transform::safe_area(width, height)
}
