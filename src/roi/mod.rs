//! Boolean-mask region engine
//!
//! This module provides the core data structures of the ROI engine:
//! integer rectangles, bitmap masks, the 2D area region with its set
//! algebra, and the sparse 3D stack composed of 2D slices.

pub mod errors;
mod rect;
mod mask;
mod boolean_mask;
mod region2d;
mod stack3d;
#[cfg(test)]
mod tests;

// Public exports
pub use errors::{RoiError, RoiResult};
pub use rect::Rect;
pub use mask::Mask2D;
pub use boolean_mask::BooleanMask;
pub use region2d::{ChangeListener, Region2D, RegionEvent, UpdateScope};
pub use stack3d::{RegionStack3D, SliceFactory};
