pub mod io;
pub mod roi;
pub mod raster;
pub mod utils;
pub mod api;

pub use crate::api::RoiKit;

pub use roi::{BooleanMask, Mask2D, Rect, Region2D, RegionEvent, RegionStack3D};
pub use raster::{EllipseShape, PixelSamplingRasterizer, Rasterizer, RectangleShape, Shape};
