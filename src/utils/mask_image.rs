//! Mask image export utilities
//!
//! This module converts boolean masks into grayscale images for
//! debugging and measurement overlays, and saves them as PNG files.

use image::{DynamicImage, GrayImage, Luma};
use log::info;
use std::path::Path;

use crate::roi::{BooleanMask, RoiError, RoiResult};

/// Convert a boolean mask into an 8-bit grayscale image
///
/// Pixels inside the region become 255, everything else 0. An empty
/// mask yields a 1x1 black image since zero-sized images are rejected
/// by most consumers.
///
/// # Arguments
/// * `mask` - The mask to convert
///
/// # Returns
/// A grayscale image sized to the mask bounds
pub fn mask_to_image(mask: &BooleanMask) -> GrayImage {
    let bounds = mask.bounds;
    if bounds.is_empty() {
        return GrayImage::new(1, 1);
    }

    let mut img = GrayImage::new(bounds.width as u32, bounds.height as u32);
    for y in 0..bounds.height {
        for x in 0..bounds.width {
            let value = if mask.get(bounds.x + x, bounds.y + y) { 255 } else { 0 };
            img.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }
    img
}

/// Ensure a file path has PNG extension
///
/// If the file doesn't already have a PNG extension, this function
/// creates a new path with the .png extension.
///
/// # Arguments
/// * `file_path` - The original file path
///
/// # Returns
/// A path with .png extension
pub fn ensure_png_extension(file_path: &str) -> String {
    let path = Path::new(file_path);

    // If it's already a PNG, return as is
    if let Some(ext) = path.extension() {
        if ext.to_string_lossy().to_lowercase() == "png" {
            return file_path.to_string();
        }
    }

    // Create a new path with .png extension
    let stem = path.file_stem().unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let new_path = parent.join(format!("{}.png", stem.to_string_lossy()));
    new_path.to_string_lossy().to_string()
}

/// Save a boolean mask as a grayscale PNG image
///
/// # Arguments
/// * `mask` - The mask to save
/// * `output_path` - Path where to save the output
///
/// # Returns
/// Result indicating success or an error
pub fn save_mask_image(mask: &BooleanMask, output_path: &str) -> RoiResult<()> {
    let final_path = ensure_png_extension(output_path);
    if final_path != output_path {
        info!("Changed output extension to PNG: {}", final_path);
    }

    let image = DynamicImage::ImageLuma8(mask_to_image(mask));
    match image.save(&final_path) {
        Ok(_) => Ok(()),
        Err(e) => Err(RoiError::GenericError(format!("Failed to save mask image: {}", e)))
    }
}
