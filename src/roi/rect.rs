//! Rectangle structure for region bounds
//!
//! This module defines the integer rectangle used as the bounding box of
//! every mask region. Coordinates are in pixels and follow the typical
//! image coordinate system where (0,0) is the top-left corner of the
//! image; the origin of a rectangle may be negative.

/// Axis-aligned integer rectangle (in pixel coordinates)
///
/// Represents an area defined by its top-left corner coordinates and
/// dimensions. A rectangle with zero width or height is considered empty
/// and is the canonical representation of "no region".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// X-coordinate of the top-left corner (pixels from left)
    pub x: i32,

    /// Y-coordinate of the top-left corner (pixels from top)
    pub y: i32,

    /// Width of the rectangle in pixels (never negative)
    pub width: i32,

    /// Height of the rectangle in pixels (never negative)
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    ///
    /// Negative dimensions are clamped to zero so the "width >= 0,
    /// height >= 0" invariant holds for every constructed value.
    ///
    /// # Arguments
    /// * `x` - X-coordinate of the top-left corner
    /// * `y` - Y-coordinate of the top-left corner
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Create an empty rectangle at the given origin
    pub fn empty_at(x: i32, y: i32) -> Self {
        Rect::new(x, y, 0, 0)
    }

    /// Check whether this rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Get the rightmost X coordinate (exclusive)
    ///
    /// Returns the X-coordinate immediately to the right of the
    /// rectangle. This is useful for boundary checks in pixel loops.
    pub fn end_x(&self) -> i32 {
        self.x + self.width
    }

    /// Get the bottommost Y coordinate (exclusive)
    ///
    /// Returns the Y-coordinate immediately below the rectangle.
    pub fn end_y(&self) -> i32 {
        self.y + self.height
    }

    /// Number of pixels covered by this rectangle
    pub fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Check if this rectangle contains a pixel
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.end_x() && y >= self.y && y < self.end_y()
    }

    /// Check if this rectangle fully contains another rectangle
    ///
    /// An empty `other` is contained by any rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        other.x >= self.x
            && other.y >= self.y
            && other.end_x() <= self.end_x()
            && other.end_y() <= self.end_y()
    }

    /// Check if this rectangle overlaps another by at least one pixel
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Compute the intersection of two rectangles
    ///
    /// # Returns
    /// The overlapping rectangle, or an empty rectangle when the two do
    /// not overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let end_x = self.end_x().min(other.end_x());
        let end_y = self.end_y().min(other.end_y());
        Rect::new(x, y, end_x - x, end_y - y)
    }

    /// Compute the union of two rectangles
    ///
    /// The union of an empty rectangle with any other yields the other
    /// operand unchanged, so empty regions never drag bounds toward
    /// their placeholder origin.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let end_x = self.end_x().max(other.end_x());
        let end_y = self.end_y().max(other.end_y());
        Rect::new(x, y, end_x - x, end_y - y)
    }

    /// Return this rectangle moved by the given offset
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}
