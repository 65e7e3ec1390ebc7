use std::fs::File;
use std::io::{BufReader, BufWriter};
use log::info;

use crate::io::serializer;
use crate::roi::{Region2D, RegionStack3D, RoiResult};
use crate::utils::mask_image;

/// Main interface to the RoiKit library
///
/// Thin convenience facade over the region engine's persistence and
/// export paths; all editing and algebra happens directly on the
/// `Region2D`/`RegionStack3D` types.
pub struct RoiKit;

impl RoiKit {
    /// Create a new RoiKit instance
    pub fn new() -> Self {
        RoiKit
    }

    /// Save a 2D region to a file
    ///
    /// # Arguments
    /// * `region` - The region to save
    /// * `output_path` - Path of the file to write
    ///
    /// # Returns
    /// Result indicating success or an error
    pub fn save_region(&self, region: &Region2D, output_path: &str) -> RoiResult<()> {
        let file = File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        serializer::write_region(&mut writer, region)?;
        let bounds = region.bounds();
        info!(
            "Saved region ({}x{} at {},{}) to {}",
            bounds.width, bounds.height, bounds.x, bounds.y, output_path
        );
        Ok(())
    }

    /// Load a 2D region from a file
    ///
    /// # Arguments
    /// * `input_path` - Path of the file to read
    ///
    /// # Returns
    /// The loaded region or an error when the file is truncated or
    /// inconsistent
    pub fn load_region(&self, input_path: &str) -> RoiResult<Region2D> {
        let file = File::open(input_path)?;
        let mut reader = BufReader::new(file);
        let region = serializer::read_region(&mut reader)?;
        info!("Loaded region from {}", input_path);
        Ok(region)
    }

    /// Save a 3D region stack to a file
    ///
    /// # Arguments
    /// * `stack` - The stack to save
    /// * `output_path` - Path of the file to write
    pub fn save_stack(&self, stack: &RegionStack3D, output_path: &str) -> RoiResult<()> {
        let file = File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        serializer::write_stack(&mut writer, stack)?;
        info!(
            "Saved region stack ({} slices) to {}",
            stack.slice_count(), output_path
        );
        Ok(())
    }

    /// Load a 3D region stack from a file
    ///
    /// # Arguments
    /// * `input_path` - Path of the file to read
    pub fn load_stack(&self, input_path: &str) -> RoiResult<RegionStack3D> {
        let file = File::open(input_path)?;
        let mut reader = BufReader::new(file);
        let stack = serializer::read_stack(&mut reader)?;
        info!("Loaded region stack from {}", input_path);
        Ok(stack)
    }

    /// Export a region's mask as a grayscale PNG image
    ///
    /// # Arguments
    /// * `region` - The region to export
    /// * `output_path` - Path where to save the image (extension is
    ///   normalized to .png)
    pub fn export_mask_image(&self, region: &Region2D, output_path: &str) -> RoiResult<()> {
        mask_image::save_mask_image(&region.boolean_mask(), output_path)
    }
}

impl Default for RoiKit {
    fn default() -> Self {
        RoiKit::new()
    }
}
