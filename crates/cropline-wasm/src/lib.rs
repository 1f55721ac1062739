//! Cropline WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes cropline-core to the browser crop editor.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images and crop results
//! - `decode` - Source decoding and safe-area helpers for the editor preview
//! - `crop` - Rotate-and-crop export
//!
//! # Usage
//!
//! ```typescript
//! import init, { crop_image } from '@cropline/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const jpeg = crop_image(bytes, area.x, area.y, area.width, area.height, rotation);
//! await upload(new Blob([jpeg], { type: 'image/jpeg' }));
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod decode;
mod types;

pub use crop::{crop_data_url, crop_image, crop_image_with_options, crop_source};
pub use decode::{decode_image, safe_area};
pub use types::{JsCroppedImage, JsSourceImage};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
