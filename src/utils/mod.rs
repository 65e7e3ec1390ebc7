//! Utility modules for common functionality
//!
//! This module provides various utility functions used around the
//! region engine.

pub mod mask_image;

pub use mask_image::{ensure_png_extension, mask_to_image, save_mask_image};
