//! Source image decoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, GIF, BMP and WebP images into RGBA pixels
//! - Applying EXIF orientation the way browser image decoders do
//! - Reading images out of `data:` URLs produced by the file picker
//!
//! Decoding is always complete: the crop engine draws through an arbitrary
//! affine transform and needs random access to every source pixel.
//!
//! # Examples
//!
//! ```ignore
//! use cropline_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod data_url;
mod source;
mod types;

pub use data_url::{decode_data_url, parse_data_url, DataUrl};
pub use source::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, Orientation, SourceImage};
