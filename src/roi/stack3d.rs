//! Sparse 3D region built from independent 2D slices
//!
//! This module provides the 3D area ROI core: an ordered, sparse map
//! from integer Z-index to 2D region slices. A Z key is present only if
//! its slice is non-empty; missing interior slices are legal and read as
//! empty. All pixel-level work delegates to `Region2D`.

use std::collections::BTreeMap;

use log::debug;

use super::boolean_mask::BooleanMask;
use super::errors::RoiResult;
use super::rect::Rect;
use super::region2d::Region2D;

/// Factory producing fresh, empty slices
///
/// Supplied at stack construction so hosts can configure every slice the
/// same way (e.g. a custom rasterization strategy) without the stack
/// knowing the details.
pub type SliceFactory = Box<dyn Fn() -> Region2D + Send + Sync>;

/// 3D area region of interest: a sparse stack of 2D slices
///
/// The stack exclusively owns each slice; slices are never shared across
/// stacks. Z bounds are derived lazily from the present keys, so there
/// is no stored height to keep consistent.
pub struct RegionStack3D {
    slices: BTreeMap<i32, Region2D>,
    factory: SliceFactory,
}

impl RegionStack3D {
    /// Create an empty stack using default-configured slices
    pub fn new() -> Self {
        RegionStack3D::with_factory(Box::new(Region2D::new))
    }

    /// Create an empty stack with a custom slice factory
    ///
    /// # Arguments
    /// * `factory` - Closure producing each new empty slice
    pub fn with_factory(factory: SliceFactory) -> Self {
        RegionStack3D {
            slices: BTreeMap::new(),
            factory,
        }
    }

    /// Check whether the stack holds no slice
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Number of slices actually present (not the Z span)
    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    /// Lowest Z index holding a slice
    pub fn min_z(&self) -> Option<i32> {
        self.slices.keys().next().copied()
    }

    /// Highest Z index holding a slice
    pub fn max_z(&self) -> Option<i32> {
        self.slices.keys().next_back().copied()
    }

    /// Z extent of the stack, as a span
    ///
    /// `(max_z - min_z) + 1` over the present keys. This is a span, not
    /// a dense count: missing interior Z slices still widen it and read
    /// as empty.
    pub fn size_z(&self) -> i32 {
        match (self.min_z(), self.max_z()) {
            (Some(min), Some(max)) => max - min + 1,
            _ => 0,
        }
    }

    /// Z indices holding slices, in ascending order
    pub fn z_indices(&self) -> Vec<i32> {
        self.slices.keys().copied().collect()
    }

    /// Borrow the slice at a Z index, if present
    pub fn slice(&self, z: i32) -> Option<&Region2D> {
        self.slices.get(&z)
    }

    /// Store a slice at a Z index
    ///
    /// An empty slice removes the key instead of storing, keeping the
    /// sparse invariant.
    pub fn insert_slice(&mut self, z: i32, slice: Region2D) {
        if slice.is_empty() {
            self.slices.remove(&z);
        } else {
            self.slices.insert(z, slice);
        }
    }

    /// Remove and return the slice at a Z index
    pub fn remove_slice(&mut self, z: i32) -> Option<Region2D> {
        self.slices.remove(&z)
    }

    /// Drop every slice
    pub fn clear(&mut self) {
        self.slices.clear();
    }

    /// Drop a slice again if an edit just emptied it
    fn prune_if_empty(&mut self, z: i32) {
        let empty = match self.slices.get(&z) {
            Some(slice) => slice.is_empty(),
            None => false,
        };
        if empty {
            debug!("Removing emptied slice at z={}", z);
            self.slices.remove(&z);
        }
    }

    // ---- per-slice edits ------------------------------------------------

    /// Set or clear a single voxel
    ///
    /// Setting creates the slice on demand; clearing on an absent slice
    /// is a no-op, and clearing the last pixel of a slice removes it.
    pub fn set_point(&mut self, x: i32, y: i32, z: i32, value: bool) -> RoiResult<()> {
        if value {
            let factory = &self.factory;
            let slice = self.slices.entry(z).or_insert_with(|| factory());
            slice.set_point(x, y, true)?;
        } else if let Some(slice) = self.slices.get(&z) {
            slice.set_point(x, y, false)?;
            self.prune_if_empty(z);
        }
        Ok(())
    }

    /// Check whether a voxel lies inside the region
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        match self.slices.get(&z) {
            Some(slice) => slice.contains_point(x, y),
            None => false,
        }
    }

    /// Snapshot one slice's content over a rectangle
    ///
    /// An absent slice exports an all-false mask.
    pub fn export_boolean_mask(&self, z: i32, rect: Rect) -> BooleanMask {
        match self.slices.get(&z) {
            Some(slice) => slice.export_boolean_mask(rect),
            None => BooleanMask::new(rect),
        }
    }

    /// Union a 2D mask into the slice at a Z index
    ///
    /// Creates the slice on demand.
    pub fn add_mask_at(&mut self, z: i32, mask: &BooleanMask) -> RoiResult<()> {
        if mask.is_blank() {
            return Ok(());
        }
        let factory = &self.factory;
        let slice = self.slices.entry(z).or_insert_with(|| factory());
        slice.add_mask(mask)
    }

    /// Symmetric difference of a 2D mask with the slice at a Z index
    pub fn exclusive_add_mask_at(&mut self, z: i32, mask: &BooleanMask) -> RoiResult<()> {
        if mask.is_blank() {
            return Ok(());
        }
        let factory = &self.factory;
        let slice = self.slices.entry(z).or_insert_with(|| factory());
        slice.exclusive_add_mask(mask)?;
        self.prune_if_empty(z);
        Ok(())
    }

    /// Subtract a 2D mask from the slice at a Z index
    ///
    /// No-op when the slice is absent.
    pub fn subtract_mask_at(&mut self, z: i32, mask: &BooleanMask) -> RoiResult<()> {
        if let Some(slice) = self.slices.get(&z) {
            slice.subtract_mask(mask)?;
            self.prune_if_empty(z);
        }
        Ok(())
    }

    /// Intersect the slice at a Z index with a 2D mask
    ///
    /// No-op when the slice is absent (absence is already the empty
    /// intersection). A blank operand mask removes the slice: in the 3D
    /// algebra "no operand data at this Z" means empty by definition.
    pub fn intersect_mask_at(&mut self, z: i32, mask: &BooleanMask) -> RoiResult<()> {
        if !self.slices.contains_key(&z) {
            return Ok(());
        }
        if mask.is_blank() {
            self.slices.remove(&z);
            return Ok(());
        }
        if let Some(slice) = self.slices.get(&z) {
            slice.intersect_mask(mask)?;
        }
        self.prune_if_empty(z);
        Ok(())
    }

    // ---- whole-stack algebra --------------------------------------------

    /// Union another stack into this one
    ///
    /// Operand slices with no local counterpart are cloned in.
    pub fn add(&mut self, other: &RegionStack3D) -> RoiResult<()> {
        for (&z, slice) in &other.slices {
            self.add_mask_at(z, &slice.boolean_mask())?;
        }
        Ok(())
    }

    /// Symmetric difference with another stack
    pub fn exclusive_add(&mut self, other: &RegionStack3D) -> RoiResult<()> {
        for (&z, slice) in &other.slices {
            self.exclusive_add_mask_at(z, &slice.boolean_mask())?;
        }
        Ok(())
    }

    /// Subtract another stack from this one
    ///
    /// Operand slices at Z indices this stack does not hold are no-ops.
    pub fn subtract(&mut self, other: &RegionStack3D) -> RoiResult<()> {
        for (&z, slice) in &other.slices {
            self.subtract_mask_at(z, &slice.boolean_mask())?;
        }
        Ok(())
    }

    /// Intersect with another stack
    ///
    /// Every local slice whose Z is absent from the operand is removed
    /// first: intersection with no operand data at that Z is empty by
    /// definition. Remaining slices delegate to the 2D intersection.
    pub fn intersect(&mut self, other: &RegionStack3D) -> RoiResult<()> {
        let absent: Vec<i32> = self
            .slices
            .keys()
            .filter(|z| !other.slices.contains_key(z))
            .copied()
            .collect();
        for z in absent {
            debug!("Removing slice at z={} absent from intersect operand", z);
            self.slices.remove(&z);
        }
        let present: Vec<i32> = self.slices.keys().copied().collect();
        for z in present {
            // Stored operand slices are non-empty by invariant, so the
            // 2D empty-operand error cannot trigger here
            let mask = other.slices[&z].boolean_mask();
            self.intersect_mask_at(z, &mask)?;
        }
        Ok(())
    }

    /// Total number of voxels inside the region
    pub fn voxel_count(&self) -> usize {
        self.slices.values().map(|s| s.pixel_count()).sum()
    }
}

impl Default for RegionStack3D {
    fn default() -> Self {
        RegionStack3D::new()
    }
}

impl std::fmt::Debug for RegionStack3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionStack3D")
            .field("slice_count", &self.slices.len())
            .field("min_z", &self.min_z())
            .field("max_z", &self.max_z())
            .finish()
    }
}
