//! Bitmap mask buffer over a rectangular bounds
//!
//! This module provides the foundational data structure of the region
//! engine: a byte-per-pixel bitmap tied to an integer bounding rectangle,
//! with a resize operation that reallocates the buffer while preserving
//! the content overlapping the old and new bounds.

use log::warn;

use super::errors::{RoiError, RoiResult};
use super::rect::Rect;

/// Bitmap mask over a rectangular area
///
/// Stores one byte per pixel, 0 = outside the region, nonzero = inside.
/// The buffer length always equals `width * height` of the bounds, except
/// for an empty bounds which keeps a degenerate 1x1 buffer so pixel
/// address arithmetic never has to branch on emptiness.
#[derive(Debug, Clone)]
pub struct Mask2D {
    /// Bounding rectangle of the buffer, in image pixel coordinates
    bounds: Rect,

    /// Row-major pixel buffer, origin at `(bounds.x, bounds.y)`
    data: Vec<u8>,
}

/// Buffer length backing the given bounds (1 for an empty bounds)
fn buffer_len(bounds: &Rect) -> usize {
    bounds.area().max(1)
}

/// Allocate a zeroed pixel buffer, reporting failure instead of aborting
///
/// Growing a region to cover a very large bounding box can ask for more
/// memory than the host has; the engine must survive that by keeping the
/// mask at its prior size, so the allocation has to be fallible.
fn allocate_buffer(len: usize) -> RoiResult<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| RoiError::AllocationFailed(len))?;
    data.resize(len, 0);
    Ok(data)
}

impl Mask2D {
    /// Create an empty mask at the origin
    pub fn new() -> Self {
        Mask2D::empty_at(0, 0)
    }

    /// Create an empty mask whose (zero-area) bounds sit at the given origin
    pub fn empty_at(x: i32, y: i32) -> Self {
        Mask2D {
            bounds: Rect::empty_at(x, y),
            data: vec![0],
        }
    }

    /// Create a zeroed mask covering the given bounds
    ///
    /// # Returns
    /// The mask, or an allocation error when the bounds area cannot be
    /// backed by memory.
    pub fn with_bounds(bounds: Rect) -> RoiResult<Self> {
        let data = allocate_buffer(buffer_len(&bounds))?;
        Ok(Mask2D { bounds, data })
    }

    /// Bounding rectangle of this mask
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Raw pixel buffer, row-major over the bounds
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel buffer
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Buffer offset of a pixel given in image coordinates
    ///
    /// The pixel must lie inside the current bounds.
    fn offset(&self, x: i32, y: i32) -> usize {
        let local_x = (x - self.bounds.x) as usize;
        let local_y = (y - self.bounds.y) as usize;
        local_y * self.bounds.width as usize + local_x
    }

    /// Read a pixel in image coordinates
    ///
    /// Pixels outside the bounds read as false.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !self.bounds.contains_point(x, y) {
            return false;
        }
        self.data[self.offset(x, y)] != 0
    }

    /// Write a pixel in image coordinates
    ///
    /// Writes outside the bounds are ignored; callers grow the bounds
    /// first when they need the pixel kept.
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if !self.bounds.contains_point(x, y) {
            return;
        }
        let offset = self.offset(x, y);
        self.data[offset] = if on { 1 } else { 0 };
    }

    /// Check whether the buffer holds no set pixel
    pub fn is_blank(&self) -> bool {
        self.bounds.is_empty() || self.data.iter().all(|&v| v == 0)
    }

    /// Count the set pixels in the buffer
    pub fn pixel_count(&self) -> usize {
        if self.bounds.is_empty() {
            return 0;
        }
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Resize the mask to new bounds, preserving overlapping content
    ///
    /// When the new bounds have the same dimensions as the current ones
    /// only the origin is adopted (a pure translation, no reallocation)
    /// and the method reports that no reallocation happened. Otherwise a
    /// fresh buffer is allocated, the rows of the intersection of old and
    /// new bounds are copied across, and every other cell is zero. On
    /// allocation failure the mask is left untouched at its prior bounds.
    ///
    /// # Arguments
    /// * `new_bounds` - Target bounding rectangle
    ///
    /// # Returns
    /// `Ok(true)` when the buffer was reallocated, `Ok(false)` for the
    /// same-size fast path, or an allocation error.
    pub fn resize(&mut self, new_bounds: Rect) -> RoiResult<bool> {
        if new_bounds.width == self.bounds.width && new_bounds.height == self.bounds.height {
            self.bounds = new_bounds;
            return Ok(false);
        }

        let mut data = match allocate_buffer(buffer_len(&new_bounds)) {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "Mask resize to {}x{} failed, keeping bounds {}x{}",
                    new_bounds.width, new_bounds.height,
                    self.bounds.width, self.bounds.height
                );
                return Err(e);
            }
        };

        // Copy the row spans shared by the old and new footprint
        let overlap = self.bounds.intersection(&new_bounds);
        if !overlap.is_empty() {
            let old_stride = self.bounds.width as usize;
            let new_stride = new_bounds.width as usize;
            let span = overlap.width as usize;
            for y in overlap.y..overlap.end_y() {
                let old_row = (y - self.bounds.y) as usize * old_stride
                    + (overlap.x - self.bounds.x) as usize;
                let new_row = (y - new_bounds.y) as usize * new_stride
                    + (overlap.x - new_bounds.x) as usize;
                data[new_row..new_row + span]
                    .copy_from_slice(&self.data[old_row..old_row + span]);
            }
        }

        self.bounds = new_bounds;
        self.data = data;
        Ok(true)
    }

    /// Compute the tight bounding box of all set pixels
    ///
    /// Scans the full buffer once. A blank mask yields an empty rectangle
    /// at the current origin.
    pub fn tight_bounds(&self) -> Rect {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        let mut found = false;

        let stride = self.bounds.width as usize;
        for row in 0..self.bounds.height {
            let start = row as usize * stride;
            let line = &self.data[start..start + stride];
            let first = match line.iter().position(|&v| v != 0) {
                Some(i) => i as i32,
                None => continue,
            };
            // A row with a first set pixel always has a last one
            let last = line.iter().rposition(|&v| v != 0).unwrap_or(0) as i32;

            let y = self.bounds.y + row;
            min_x = min_x.min(self.bounds.x + first);
            max_x = max_x.max(self.bounds.x + last);
            if !found {
                min_y = y;
            }
            max_y = y;
            found = true;
        }

        if !found {
            return Rect::empty_at(self.bounds.x, self.bounds.y);
        }
        Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }
}

impl Default for Mask2D {
    fn default() -> Self {
        Mask2D::new()
    }
}
