//! Pixel-center sampling rasterization
//!
//! This module implements the Strategy pattern for scan-converting a
//! shape outline into the set of pixels it covers. The engine only needs
//! the default point-sampling strategy; hosts with a sub-pixel accurate
//! scan converter plug it in through the same trait.

use crate::roi::Rect;

use super::shape::Shape;

/// Strategy for converting a shape into covered pixels
///
/// Sampling is binary in/out, no anti-aliasing. Implementations must use
/// pixel-center semantics: the sample point for pixel `(x, y)` is
/// `(x + 0.5, y + 0.5)`.
pub trait Rasterizer: Send + Sync {
    /// Rasterize a shape, emitting every covered pixel
    ///
    /// # Arguments
    /// * `shape` - The shape to scan-convert
    /// * `clip` - Pixel rectangle to restrict emission to
    /// * `fill` - Emit pixels of the shape's interior
    /// * `stroke_also` - Additionally emit pixels of the outline
    /// * `emit` - Callback invoked once per covered pixel
    fn rasterize(
        &self,
        shape: &dyn Shape,
        clip: Rect,
        fill: bool,
        stroke_also: bool,
        emit: &mut dyn FnMut(i32, i32),
    );
}

/// Default rasterizer sampling each pixel at its center
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelSamplingRasterizer;

impl Rasterizer for PixelSamplingRasterizer {
    fn rasterize(
        &self,
        shape: &dyn Shape,
        clip: Rect,
        fill: bool,
        stroke_also: bool,
        emit: &mut dyn FnMut(i32, i32),
    ) {
        let area = shape.bounds().intersection(&clip);
        if area.is_empty() {
            return;
        }

        for y in area.y..area.end_y() {
            let sample_y = y as f64 + 0.5;
            for x in area.x..area.end_x() {
                let sample_x = x as f64 + 0.5;
                let covered = (fill && shape.contains(sample_x, sample_y))
                    || (stroke_also && shape.on_outline(sample_x, sample_y));
                if covered {
                    emit(x, y);
                }
            }
        }
    }
}
