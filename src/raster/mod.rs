//! Shape rasterization for mask editing
//!
//! This module provides the contract between the region engine and the
//! scan-conversion rasterizer it consumes, along with the default
//! pixel-center sampling implementation.

mod shape;
mod sampler;

// Public exports
pub use shape::{EllipseShape, RectangleShape, Shape};
pub use sampler::{PixelSamplingRasterizer, Rasterizer};
