//! Binary persistence for regions and stacks
//!
//! Regions serialize as four little-endian i32 fields (x, y, width,
//! height) followed by width * height raw bytes, one per pixel (0/1);
//! a zero-length payload means an empty region. A 3D stack serializes
//! as a u32 slice count followed by per-slice records, each an i32 Z
//! index plus a 2D record, so slices stay independently (de)serializable.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::roi::{BooleanMask, Rect, Region2D, RegionStack3D, RoiError, RoiResult};

/// Write a region's record to a stream
///
/// # Arguments
/// * `writer` - Destination stream
/// * `region` - Region to serialize
pub fn write_region<W: Write>(writer: &mut W, region: &Region2D) -> RoiResult<()> {
    write_boolean_mask(writer, &region.boolean_mask())
}

/// Write a boolean mask's record to a stream
pub fn write_boolean_mask<W: Write>(writer: &mut W, mask: &BooleanMask) -> RoiResult<()> {
    let bounds = mask.bounds;
    writer.write_i32::<LittleEndian>(bounds.x)?;
    writer.write_i32::<LittleEndian>(bounds.y)?;
    writer.write_i32::<LittleEndian>(bounds.width)?;
    writer.write_i32::<LittleEndian>(bounds.height)?;

    if bounds.is_empty() {
        return Ok(());
    }
    let bytes: Vec<u8> = mask.mask.iter().map(|&v| if v { 1 } else { 0 }).collect();
    writer.write_all(&bytes)?;
    Ok(())
}

/// Read a region's record from a stream
///
/// # Returns
/// The deserialized region, or an error when the stream ends before the
/// declared pixel payload; the region is left unconstructed in that
/// case.
pub fn read_region<R: Read>(reader: &mut R) -> RoiResult<Region2D> {
    let mask = read_boolean_mask(reader)?;
    Region2D::from_boolean_mask(&mask)
}

/// Read a boolean mask's record from a stream
pub fn read_boolean_mask<R: Read>(reader: &mut R) -> RoiResult<BooleanMask> {
    let x = reader.read_i32::<LittleEndian>()?;
    let y = reader.read_i32::<LittleEndian>()?;
    let width = reader.read_i32::<LittleEndian>()?;
    let height = reader.read_i32::<LittleEndian>()?;

    if width < 0 || height < 0 {
        return Err(RoiError::GenericError(format!(
            "Negative mask dimensions: {}x{}", width, height
        )));
    }
    let bounds = Rect::new(x, y, width, height);
    if bounds.is_empty() {
        return Ok(BooleanMask::new(Rect::empty_at(x, y)));
    }

    let mut bytes = vec![0u8; bounds.area()];
    reader.read_exact(&mut bytes)?;
    let flags: Vec<bool> = bytes.iter().map(|&b| b != 0).collect();
    BooleanMask::from_parts(bounds, flags)
}

/// Write a 3D stack's record to a stream
pub fn write_stack<W: Write>(writer: &mut W, stack: &RegionStack3D) -> RoiResult<()> {
    let indices = stack.z_indices();
    writer.write_u32::<LittleEndian>(indices.len() as u32)?;
    for z in indices {
        // Present keys always hold a slice
        let slice = stack.slice(z).ok_or_else(|| {
            RoiError::GenericError(format!("Stack reported missing slice at z={}", z))
        })?;
        writer.write_i32::<LittleEndian>(z)?;
        write_region(writer, slice)?;
    }
    Ok(())
}

/// Read a 3D stack's record from a stream
///
/// Slices that deserialize empty are dropped rather than stored,
/// preserving the stack's sparse invariant.
pub fn read_stack<R: Read>(reader: &mut R) -> RoiResult<RegionStack3D> {
    let count = reader.read_u32::<LittleEndian>()?;
    let mut stack = RegionStack3D::new();
    for _ in 0..count {
        let z = reader.read_i32::<LittleEndian>()?;
        let slice = read_region(reader)?;
        stack.insert_slice(z, slice);
    }
    debug!("Loaded region stack with {} slice(s)", stack.slice_count());
    Ok(stack)
}
