//! The crop engine: decode, rotate, crop, encode.

use tracing::{debug, instrument};

use crate::decode::{self, SourceImage};
use crate::encode::OutputFormat;
use crate::error::CropError;
use crate::transform::{render_crop, CropRegion};
use crate::CropOptions;

/// An encoded crop result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    /// Compressed image bytes.
    pub bytes: Vec<u8>,
    /// Pixel width; equals the crop width.
    pub width: u32,
    /// Pixel height; equals the crop height.
    pub height: u32,
    /// Encoding of `bytes`.
    pub format: OutputFormat,
}

impl OutputImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Stateless rotate-and-crop engine.
///
/// Every call allocates its own canvases and releases them before returning,
/// so one engine can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CropTransformEngine {
    options: CropOptions,
}

impl CropTransformEngine {
    pub fn new(options: CropOptions) -> Self {
        Self { options }
    }

    /// Same engine with a different rotation.
    pub fn with_rotation(self, rotation: f64) -> Self {
        Self {
            options: self.options.with_rotation(rotation),
        }
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Rotate `source` about its centre, cut out `region` and encode it.
    #[instrument(skip(self, source), fields(rotation = self.options.rotation))]
    pub fn transform(
        &self,
        source: &SourceImage,
        region: &CropRegion,
    ) -> Result<OutputImage, CropError> {
        let canvas = render_crop(
            source,
            region,
            self.options.rotation,
            self.options.interpolation,
        )?;
        let bytes = canvas.encode(&self.options)?;
        debug!(len = bytes.len(), format = ?self.options.format, "crop encoded");

        Ok(OutputImage {
            bytes,
            width: canvas.width(),
            height: canvas.height(),
            format: self.options.format,
        })
    }

    /// Decode `bytes` and transform them.
    ///
    /// The region is validated first, so a bad rectangle fails without paying
    /// for a decode.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn transform_bytes(
        &self,
        bytes: &[u8],
        region: &CropRegion,
    ) -> Result<OutputImage, CropError> {
        region.validate()?;
        let source = decode::decode_image(bytes)?;
        self.transform(&source, region)
    }

    /// Decode a `data:` URL and transform it.
    #[instrument(skip(self, data_url), fields(len = data_url.len()))]
    pub fn transform_data_url(
        &self,
        data_url: &str,
        region: &CropRegion,
    ) -> Result<OutputImage, CropError> {
        region.validate()?;
        let source = decode::decode_data_url(data_url)?;
        self.transform(&source, region)
    }
}

/// Crop encoded `bytes` with default options and the given rotation.
pub fn crop_image(
    bytes: &[u8],
    region: &CropRegion,
    rotation: f64,
) -> Result<OutputImage, CropError> {
    CropTransformEngine::default()
        .with_rotation(rotation)
        .transform_bytes(bytes, region)
}
