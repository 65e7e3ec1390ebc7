//! Boolean-array interchange format
//!
//! A `BooleanMask` is the canonical format used to hand a region's content
//! to rendering, measurement, persistence or another region's algebra
//! input: a bounds rectangle plus a row-major boolean array whose origin is
//! the bounds' top-left corner.

use super::errors::{RoiError, RoiResult};
use super::rect::Rect;

/// Snapshot of a region's content over a rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanMask {
    /// Area the array covers, in image pixel coordinates
    pub bounds: Rect,

    /// Row-major in/out flags, length `bounds.width * bounds.height`
    pub mask: Vec<bool>,
}

impl BooleanMask {
    /// Create an all-false mask over the given bounds
    pub fn new(bounds: Rect) -> Self {
        BooleanMask {
            bounds,
            mask: vec![false; bounds.area()],
        }
    }

    /// Create an empty mask (zero-area bounds at the origin)
    pub fn empty() -> Self {
        BooleanMask::new(Rect::empty_at(0, 0))
    }

    /// Build a mask from its parts, validating the array length
    ///
    /// # Arguments
    /// * `bounds` - Area the array covers
    /// * `mask` - Row-major flags, one per pixel of `bounds`
    ///
    /// # Returns
    /// The mask, or an error when the array length does not match the
    /// bounds area.
    pub fn from_parts(bounds: Rect, mask: Vec<bool>) -> RoiResult<Self> {
        if mask.len() != bounds.area() {
            return Err(RoiError::InconsistentMaskData {
                expected: bounds.area(),
                actual: mask.len(),
            });
        }
        Ok(BooleanMask { bounds, mask })
    }

    /// Check whether no pixel of the mask is set
    pub fn is_blank(&self) -> bool {
        self.bounds.is_empty() || self.mask.iter().all(|&v| !v)
    }

    /// Count the set pixels
    pub fn pixel_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v).count()
    }

    /// Read a pixel in image coordinates (false outside the bounds)
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !self.bounds.contains_point(x, y) {
            return false;
        }
        let local_x = (x - self.bounds.x) as usize;
        let local_y = (y - self.bounds.y) as usize;
        self.mask[local_y * self.bounds.width as usize + local_x]
    }

    /// Write a pixel in image coordinates (ignored outside the bounds)
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if !self.bounds.contains_point(x, y) {
            return;
        }
        let local_x = (x - self.bounds.x) as usize;
        let local_y = (y - self.bounds.y) as usize;
        self.mask[local_y * self.bounds.width as usize + local_x] = on;
    }
}
