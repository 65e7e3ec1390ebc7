//! Shape outlines for mask rasterization
//!
//! This module defines the contract a shape must satisfy to be burned
//! into a region mask, plus the two concrete shapes the engine ships:
//! axis-aligned rectangles and ellipses. Vector-shape ROIs built from
//! control-point anchors live outside the engine; they reach it through
//! this same trait.

use crate::roi::Rect;

/// Outline of a 2D shape, sampled in continuous pixel coordinates
///
/// Implementations answer fill and stroke queries at f64 sample points.
/// The rasterizer samples at pixel centers (index + 0.5 in both axes) so
/// the resulting mask is consistent regardless of translation.
pub trait Shape: Send + Sync {
    /// Integer pixel rectangle fully covering the shape
    fn bounds(&self) -> Rect;

    /// Check whether a sample point lies in the shape's interior
    fn contains(&self, x: f64, y: f64) -> bool;

    /// Check whether a sample point lies on the shape's stroke/outline
    fn on_outline(&self, x: f64, y: f64) -> bool;
}

/// Axis-aligned rectangle shape
#[derive(Debug, Clone, Copy)]
pub struct RectangleShape {
    /// Minimum X coordinate
    pub x: f64,
    /// Minimum Y coordinate
    pub y: f64,
    /// Width of the rectangle
    pub width: f64,
    /// Height of the rectangle
    pub height: f64,
}

impl RectangleShape {
    /// Create a new rectangle shape
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        RectangleShape { x, y, width, height }
    }

    /// Rectangle shape matching an integer pixel rectangle exactly
    pub fn from_rect(rect: Rect) -> Self {
        RectangleShape::new(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        )
    }
}

impl Shape for RectangleShape {
    fn bounds(&self) -> Rect {
        let x = self.x.floor() as i32;
        let y = self.y.floor() as i32;
        let end_x = (self.x + self.width).ceil() as i32;
        let end_y = (self.y + self.height).ceil() as i32;
        Rect::new(x, y, end_x - x, end_y - y)
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    fn on_outline(&self, x: f64, y: f64) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        // Outline is the 1-pixel band just inside the edges
        x < self.x + 1.0
            || x >= self.x + self.width - 1.0
            || y < self.y + 1.0
            || y >= self.y + self.height - 1.0
    }
}

/// Axis-aligned ellipse shape
#[derive(Debug, Clone, Copy)]
pub struct EllipseShape {
    /// X coordinate of the center
    pub center_x: f64,
    /// Y coordinate of the center
    pub center_y: f64,
    /// Semi-axis along X
    pub radius_x: f64,
    /// Semi-axis along Y
    pub radius_y: f64,
}

impl EllipseShape {
    /// Create a new ellipse shape
    pub fn new(center_x: f64, center_y: f64, radius_x: f64, radius_y: f64) -> Self {
        EllipseShape { center_x, center_y, radius_x, radius_y }
    }

    /// Create a circle shape
    pub fn circle(center_x: f64, center_y: f64, radius: f64) -> Self {
        EllipseShape::new(center_x, center_y, radius, radius)
    }

    /// Normalized squared distance of a point from the center
    ///
    /// Values below 1.0 are inside the ellipse.
    fn normalized_distance_squared(&self, x: f64, y: f64) -> f64 {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return f64::INFINITY;
        }
        let dx = (x - self.center_x) / self.radius_x;
        let dy = (y - self.center_y) / self.radius_y;
        dx * dx + dy * dy
    }
}

impl Shape for EllipseShape {
    fn bounds(&self) -> Rect {
        let x = (self.center_x - self.radius_x).floor() as i32;
        let y = (self.center_y - self.radius_y).floor() as i32;
        let end_x = (self.center_x + self.radius_x).ceil() as i32;
        let end_y = (self.center_y + self.radius_y).ceil() as i32;
        Rect::new(x, y, end_x - x, end_y - y)
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        self.normalized_distance_squared(x, y) <= 1.0
    }

    fn on_outline(&self, x: f64, y: f64) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        // On the stroke when stepping one pixel outward in any axis
        // leaves the interior
        !self.contains(x - 1.0, y)
            || !self.contains(x + 1.0, y)
            || !self.contains(x, y - 1.0)
            || !self.contains(x, y + 1.0)
    }
}
