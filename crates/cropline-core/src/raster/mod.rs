//! Raster canvas primitives for the crop pipeline.
//!
//! [`Raster`] is an owned RGBA canvas with draw / take / put / encode.
//! Transforms are `imageproc` projections in canvas convention (y down,
//! positive angles clockwise).

mod canvas;

pub use canvas::{InterpolationFilter, PixelData, Raster, RasterError, MAX_AREA, MAX_SIDE};
