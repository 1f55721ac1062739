//! Top-level error type for crop operations.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::raster::RasterError;

/// Every way a crop call can fail. All variants are terminal for the call;
/// nothing is retried internally.
#[derive(Debug, Error)]
pub enum CropError {
    /// The source bytes are not a loadable image.
    #[error("Failed to decode source image: {0}")]
    Decode(#[from] DecodeError),

    /// The crop rectangle has a non-positive or non-finite size, or a
    /// position that is not a finite number.
    #[error("Invalid crop region: {width}x{height}")]
    InvalidRegion { width: f64, height: f64 },

    /// A working canvas could not be allocated.
    #[error("Failed to allocate canvas: {0}")]
    Raster(#[from] RasterError),

    /// The output canvas could not be encoded.
    #[error("Failed to encode output image: {0}")]
    Encode(#[from] EncodeError),
}

impl CropError {
    /// True for failures caused by the source image rather than the request.
    pub fn is_decode(&self) -> bool {
        matches!(self, CropError::Decode(_))
    }

    /// True when the crop rectangle itself was rejected.
    pub fn is_invalid_region(&self) -> bool {
        matches!(self, CropError::InvalidRegion { .. })
    }
}
