//! Rotate-and-crop WASM bindings.
//!
//! # Functions
//!
//! - [`crop_image`] - Crop encoded bytes to JPEG (quality 0.9)
//! - [`crop_data_url`] - Same, reading the source from a `data:` URL
//! - [`crop_image_with_options`] - Full control through plain JS objects
//! - [`crop_source`] - Crop an already decoded image
//!
//! # Example
//!
//! ```typescript
//! // `area` comes from the crop editor, in source pixels
//! const jpeg = crop_image(bytes, area.x, area.y, area.width, area.height, rotation);
//!
//! const result = crop_image_with_options(bytes, area, { rotation, format: 'png' });
//! const blob = new Blob([result.bytes()], { type: result.mimeType });
//! ```

use crate::types::{JsCroppedImage, JsSourceImage};
use cropline_core::{CropOptions, CropRegion, CropTransformEngine};
use wasm_bindgen::prelude::*;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Crop encoded image bytes and return JPEG bytes.
///
/// # Arguments
///
/// * `bytes` - The selected file's bytes
/// * `x`, `y`, `width`, `height` - Crop rectangle in source pixels
/// * `rotation` - Clockwise rotation in degrees about the image centre
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or the crop size is not
/// positive.
#[wasm_bindgen]
pub fn crop_image(
    bytes: &[u8],
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rotation: f64,
) -> Result<Vec<u8>, JsValue> {
    cropline_core::crop_image(bytes, &CropRegion::new(x, y, width, height), rotation)
        .map(|out| out.bytes)
        .map_err(to_js_error)
}

/// Crop an image given as a `data:` URL and return JPEG bytes.
#[wasm_bindgen]
pub fn crop_data_url(
    data_url: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rotation: f64,
) -> Result<Vec<u8>, JsValue> {
    CropTransformEngine::default()
        .with_rotation(rotation)
        .transform_data_url(data_url, &CropRegion::new(x, y, width, height))
        .map(|out| out.bytes)
        .map_err(to_js_error)
}

/// Crop with a region object `{ x, y, width, height }` and a partial
/// options object `{ rotation?, quality?, format?, interpolation?, background? }`.
///
/// `options` may be `undefined` to use the defaults.
#[wasm_bindgen]
pub fn crop_image_with_options(
    bytes: &[u8],
    region: JsValue,
    options: JsValue,
) -> Result<JsCroppedImage, JsValue> {
    let region: CropRegion = serde_wasm_bindgen::from_value(region).map_err(to_js_error)?;
    let options = parse_options(options)?;

    CropTransformEngine::new(options)
        .transform_bytes(bytes, &region)
        .map(JsCroppedImage::from_output)
        .map_err(to_js_error)
}

/// Crop an image previously returned by `decode_image`, so the editor can
/// export several crops without decoding again.
#[wasm_bindgen]
pub fn crop_source(
    image: &JsSourceImage,
    region: JsValue,
    options: JsValue,
) -> Result<JsCroppedImage, JsValue> {
    let region: CropRegion = serde_wasm_bindgen::from_value(region).map_err(to_js_error)?;
    let options = parse_options(options)?;

    CropTransformEngine::new(options)
        .transform(image.source(), &region)
        .map(JsCroppedImage::from_output)
        .map_err(to_js_error)
}

fn parse_options(options: JsValue) -> Result<CropOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CropOptions::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![128u8; (width * height * 3) as usize];
        cropline_core::encode::encode_jpeg(&pixels, width, height, 90).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_crop_image_basic() {
        let out = crop_image(&gray_jpeg(40, 30), 5.0, 5.0, 20.0, 10.0, 0.0).unwrap();
        assert_eq!(&out[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_crop_image_zero_width() {
        assert!(crop_image(&gray_jpeg(40, 30), 0.0, 0.0, 0.0, 10.0, 0.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_crop_image_garbage() {
        assert!(crop_image(b"garbage", 0.0, 0.0, 10.0, 10.0, 0.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_crop_with_png_options() {
        let region = serde_wasm_bindgen::to_value(&CropRegion::new(0.0, 0.0, 16.0, 8.0)).unwrap();
        let options = serde_wasm_bindgen::to_value(
            &CropOptions::new().with_format(cropline_core::OutputFormat::Png),
        )
        .unwrap();
        let out = crop_image_with_options(&gray_jpeg(40, 30), region, options).unwrap();
        assert_eq!(out.width(), 16);
        assert_eq!(out.height(), 8);
        assert_eq!(out.mime_type(), "image/png");
    }

    #[wasm_bindgen_test]
    fn test_crop_with_undefined_options() {
        let region = serde_wasm_bindgen::to_value(&CropRegion::new(0.0, 0.0, 16.0, 8.0)).unwrap();
        let out = crop_image_with_options(&gray_jpeg(40, 30), region, JsValue::UNDEFINED).unwrap();
        assert_eq!(out.mime_type(), "image/jpeg");
    }
}
