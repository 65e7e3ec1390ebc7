//! Resizable bitmap region with set algebra
//!
//! This module provides the 2D area ROI core: a mutable bitmap region
//! that grows its bounds on demand under point and shape edits, defers
//! bounds shrinking after removals, and supports the four boolean set
//! operations against another region or a supplied boolean mask.
//!
//! All state lives behind one mutex so the `(bounds, buffer)` pair is
//! always observed consistently: readers never see a buffer sized for
//! one bounds value paired with a different bounds value.

use std::sync::Mutex;

use log::{debug, warn};

use crate::raster::{PixelSamplingRasterizer, Rasterizer, RectangleShape, Shape};

use super::boolean_mask::BooleanMask;
use super::errors::{RoiError, RoiResult};
use super::mask::Mask2D;
use super::rect::Rect;

/// Notification emitted after a region mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEvent {
    /// Pixel content changed within the current bounds
    ContentChanged,
    /// The bounding rectangle itself changed
    BoundsChanged,
}

/// Callback invoked after a region mutation, outside the state lock
pub type ChangeListener = Box<dyn Fn(RegionEvent) + Send + Sync>;

/// Mutable state guarded as one unit
struct RegionState {
    /// The bitmap buffer and its bounds
    mask: Mask2D,

    /// Set after a removal that may have shrunk the true bounding box,
    /// cleared by `optimize_bounds`
    bounds_need_update: bool,

    /// Reentrant update-scope depth; deferred work runs when it
    /// returns to zero
    update_depth: u32,

    /// A change happened inside the current update scope
    pending_event: Option<RegionEvent>,
}

/// 2D area region of interest backed by a bitmap mask
///
/// Created empty (with a degenerate placeholder buffer) or from an
/// existing boolean mask, then mutated in place by every edit. Shape
/// edits are scan-converted through the rasterizer supplied at
/// construction time.
pub struct Region2D {
    state: Mutex<RegionState>,
    rasterizer: Box<dyn Rasterizer>,
    listeners: Mutex<Vec<ChangeListener>>,
}

/// RAII guard for a batched sequence of edits
///
/// While at least one scope is alive, removals accumulate their deferred
/// bounds rescan and mutations coalesce their notifications; the
/// outermost scope exit runs `optimize_bounds` once and fires a single
/// event. Scopes nest freely.
pub struct UpdateScope<'a> {
    region: &'a Region2D,
}

impl Drop for UpdateScope<'_> {
    fn drop(&mut self) {
        self.region.end_update();
    }
}

impl Region2D {
    /// Create an empty region at the origin
    pub fn new() -> Self {
        Region2D::with_rasterizer(Box::new(PixelSamplingRasterizer))
    }

    /// Create an empty region using a custom rasterization strategy
    ///
    /// # Arguments
    /// * `rasterizer` - Scan converter used for every shape edit
    pub fn with_rasterizer(rasterizer: Box<dyn Rasterizer>) -> Self {
        Region2D {
            state: Mutex::new(RegionState {
                mask: Mask2D::new(),
                bounds_need_update: false,
                update_depth: 0,
                pending_event: None,
            }),
            rasterizer,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Create a region from a boolean mask snapshot
    ///
    /// The resulting bounds are tightened to the mask's set pixels.
    ///
    /// # Arguments
    /// * `source` - Interchange mask to copy content from
    ///
    /// # Returns
    /// The region, or an allocation error when the mask bounds cannot be
    /// backed by memory.
    pub fn from_boolean_mask(source: &BooleanMask) -> RoiResult<Self> {
        let region = Region2D::new();
        if !source.is_blank() {
            let mut state = region.state.lock().unwrap();
            state.mask.resize(source.bounds)?;
            let bounds = source.bounds;
            for y in bounds.y..bounds.end_y() {
                for x in bounds.x..bounds.end_x() {
                    if source.get(x, y) {
                        state.mask.set(x, y, true);
                    }
                }
            }
            let tight = state.mask.tight_bounds();
            state.mask.resize(tight)?;
            drop(state);
        }
        Ok(region)
    }

    /// Register a change listener
    ///
    /// Listeners run after every completed mutation (one coalesced call
    /// per batched update scope), outside the state lock.
    pub fn on_change(&self, listener: ChangeListener) {
        self.listeners.lock().unwrap().push(listener);
    }

    /// Current bounding rectangle
    pub fn bounds(&self) -> Rect {
        self.state.lock().unwrap().mask.bounds()
    }

    /// Check whether the region covers no pixel
    ///
    /// Removals defer bounds shrinking, so this inspects the buffer
    /// content rather than trusting the bounds alone.
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().mask.is_blank()
    }

    /// Number of pixels inside the region (measurement readback)
    pub fn pixel_count(&self) -> usize {
        self.state.lock().unwrap().mask.pixel_count()
    }

    /// Whether a removal has left the bounds possibly non-minimal
    pub fn bounds_need_update(&self) -> bool {
        self.state.lock().unwrap().bounds_need_update
    }

    // ---- point edits ----------------------------------------------------

    /// Set or clear a single pixel
    ///
    /// Setting a pixel grows the bounds to include it and always fires a
    /// change notification. Clearing a pixel outside the bounds is a
    /// no-op; clearing one inside writes 0 and defers the bounds shrink
    /// to `optimize_bounds` so repeated single-pixel removals do not each
    /// pay a full-buffer rescan.
    ///
    /// # Arguments
    /// * `x` - X-coordinate of the pixel
    /// * `y` - Y-coordinate of the pixel
    /// * `value` - true to add the pixel, false to remove it
    pub fn set_point(&self, x: i32, y: i32, value: bool) -> RoiResult<()> {
        let event = {
            let mut state = self.state.lock().unwrap();
            if value {
                let bounds = state.mask.bounds();
                let grown = bounds.union(&Rect::new(x, y, 1, 1));
                let reallocated = if grown != bounds {
                    state.mask.resize(grown)?
                } else {
                    false
                };
                state.mask.set(x, y, true);
                Some(if reallocated {
                    RegionEvent::BoundsChanged
                } else {
                    RegionEvent::ContentChanged
                })
            } else if state.mask.bounds().contains_point(x, y) {
                state.mask.set(x, y, false);
                state.bounds_need_update = true;
                Some(RegionEvent::ContentChanged)
            } else {
                None
            }
        };
        if let Some(event) = event {
            self.record_change(event);
        }
        Ok(())
    }

    /// Shrink the bounds to tightly fit the set pixels
    ///
    /// Scans the full buffer once; a blank region resizes to a zero-area
    /// rectangle at the current origin. Always clears the deferred
    /// update flag. Callers batching removals get this automatically at
    /// update-scope exit.
    ///
    /// # Returns
    /// Whether the bounds changed.
    pub fn optimize_bounds(&self) -> RoiResult<bool> {
        let changed = {
            let mut state = self.state.lock().unwrap();
            Self::optimize_bounds_locked(&mut state)?
        };
        if changed {
            self.record_change(RegionEvent::BoundsChanged);
        }
        Ok(changed)
    }

    /// Tight-bounds rescan with the state lock already held
    ///
    /// Clears the dirty flag in every case; notification is left to the
    /// caller so batched and immediate paths can coalesce differently.
    fn optimize_bounds_locked(state: &mut RegionState) -> RoiResult<bool> {
        state.bounds_need_update = false;
        let tight = state.mask.tight_bounds();
        if tight == state.mask.bounds() {
            return Ok(false);
        }
        debug!(
            "Optimizing region bounds to {}x{} at ({}, {})",
            tight.width, tight.height, tight.x, tight.y
        );
        state.mask.resize(tight)?;
        Ok(true)
    }

    // ---- batched updates ------------------------------------------------

    /// Open a batched update scope
    ///
    /// Returns a guard; dropping the outermost guard runs the deferred
    /// `optimize_bounds` and fires one coalesced change notification.
    pub fn begin_update(&self) -> UpdateScope<'_> {
        self.state.lock().unwrap().update_depth += 1;
        UpdateScope { region: self }
    }

    /// Close one level of update scope (called by the guard)
    fn end_update(&self) {
        let event = {
            let mut state = self.state.lock().unwrap();
            state.update_depth = state.update_depth.saturating_sub(1);
            if state.update_depth != 0 {
                return;
            }
            let mut event = state.pending_event.take();
            if state.bounds_need_update {
                match Self::optimize_bounds_locked(&mut state) {
                    Ok(true) => event = Some(RegionEvent::BoundsChanged),
                    Ok(false) => {}
                    // A shrink cannot grow the buffer, so a failure here
                    // only leaves the bounds non-minimal, never
                    // inconsistent
                    Err(e) => warn!("Deferred bounds optimization failed: {}", e),
                }
            }
            event
        };
        if let Some(event) = event {
            self.notify(event);
        }
    }

    /// Route a change through the batching machinery
    fn record_change(&self, event: RegionEvent) {
        let fire = {
            let mut state = self.state.lock().unwrap();
            if state.update_depth > 0 {
                // Bounds changes dominate content changes when coalescing
                state.pending_event = match state.pending_event {
                    Some(RegionEvent::BoundsChanged) => Some(RegionEvent::BoundsChanged),
                    _ => Some(event),
                };
                None
            } else {
                Some(event)
            }
        };
        if let Some(event) = fire {
            self.notify(event);
        }
    }

    /// Invoke every listener, outside the state lock
    fn notify(&self, event: RegionEvent) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener(event);
        }
    }

    /// Complete an operation that may have shrunk the true extent
    ///
    /// Inside a batch scope the event and rescan stay pending; outside
    /// one, `optimize_bounds` runs immediately and a single event fires
    /// for the whole operation.
    fn finish_shrinking_op(&self, base_event: RegionEvent) -> RoiResult<()> {
        let event = {
            let mut state = self.state.lock().unwrap();
            if state.update_depth > 0 {
                state.pending_event = match state.pending_event {
                    Some(RegionEvent::BoundsChanged) => Some(RegionEvent::BoundsChanged),
                    _ => Some(base_event),
                };
                None
            } else if Self::optimize_bounds_locked(&mut state)? {
                Some(RegionEvent::BoundsChanged)
            } else {
                Some(base_event)
            }
        };
        if let Some(event) = event {
            self.notify(event);
        }
        Ok(())
    }

    // ---- shape edits ----------------------------------------------------

    /// Burn a shape into the mask at value 1
    ///
    /// Grows the bounds to the shape's bounding box first, then
    /// rasterizes the filled interior (plus the outline when
    /// `inclusive`).
    ///
    /// # Arguments
    /// * `shape` - The shape to add
    /// * `inclusive` - Also cover the shape's outline pixels
    pub fn add_shape(&self, shape: &dyn Shape, inclusive: bool) -> RoiResult<()> {
        self.update_mask(shape, false, inclusive)
    }

    /// Erase a shape from the mask
    ///
    /// Defers the bounds shrink like point removal does. Note that even
    /// with `inclusive = false` the outline pixels are erased too,
    /// otherwise fill-vs-outline rasterization discrepancy leaves a
    /// 1-pixel-wide residual ring.
    ///
    /// # Arguments
    /// * `shape` - The shape to remove
    /// * `inclusive` - Accepted for symmetry with `add_shape`
    pub fn remove_shape(&self, shape: &dyn Shape, inclusive: bool) -> RoiResult<()> {
        let _ = inclusive;
        self.update_mask(shape, true, true)
    }

    /// Add an axis-aligned pixel rectangle to the region
    pub fn add_rect(&self, rect: Rect) -> RoiResult<()> {
        self.add_shape(&RectangleShape::from_rect(rect), true)
    }

    /// Remove an axis-aligned pixel rectangle from the region
    pub fn remove_rect(&self, rect: Rect) -> RoiResult<()> {
        self.remove_shape(&RectangleShape::from_rect(rect), true)
    }

    /// Shared implementation of shape add/remove
    fn update_mask(&self, shape: &dyn Shape, remove: bool, inclusive: bool) -> RoiResult<()> {
        let shape_bounds = shape.bounds();
        let event = {
            let mut state = self.state.lock().unwrap();
            let bounds = state.mask.bounds();

            let (clip, event) = if remove {
                // Removal outside the region is a no-op
                if !shape_bounds.intersects(&bounds) {
                    return Ok(());
                }
                state.bounds_need_update = true;
                (bounds, RegionEvent::ContentChanged)
            } else {
                let grown = bounds.union(&shape_bounds);
                let reallocated = if grown != bounds {
                    state.mask.resize(grown)?
                } else {
                    false
                };
                (
                    grown,
                    if reallocated {
                        RegionEvent::BoundsChanged
                    } else {
                        RegionEvent::ContentChanged
                    },
                )
            };

            let value = !remove;
            let stroke_also = if remove { true } else { inclusive };
            let mask = &mut state.mask;
            self.rasterizer
                .rasterize(shape, clip, true, stroke_also, &mut |x, y| {
                    mask.set(x, y, value);
                });
            event
        };
        self.record_change(event);
        Ok(())
    }

    // ---- set algebra ----------------------------------------------------

    /// Union this region with a boolean mask (`D |= S`)
    ///
    /// Grows the bounds to cover the operand; an empty operand is a
    /// no-op.
    pub fn add_mask(&self, other: &BooleanMask) -> RoiResult<()> {
        if other.is_blank() {
            return Ok(());
        }
        let event = {
            let mut state = self.state.lock().unwrap();
            let bounds = state.mask.bounds();
            let grown = bounds.union(&other.bounds);
            let reallocated = if grown != bounds {
                state.mask.resize(grown)?
            } else {
                false
            };
            let src = other.bounds;
            for y in src.y..src.end_y() {
                for x in src.x..src.end_x() {
                    if other.get(x, y) {
                        state.mask.set(x, y, true);
                    }
                }
            }
            if reallocated {
                RegionEvent::BoundsChanged
            } else {
                RegionEvent::ContentChanged
            }
        };
        self.record_change(event);
        Ok(())
    }

    /// Symmetric difference with a boolean mask (`D ^= S`)
    ///
    /// Grows the bounds to cover the operand; pixels set in both
    /// operands come out cleared, so the true extent may shrink and the
    /// bounds rescan runs (or is deferred inside a batch scope).
    pub fn exclusive_add_mask(&self, other: &BooleanMask) -> RoiResult<()> {
        if other.is_blank() {
            return Ok(());
        }
        let event = {
            let mut state = self.state.lock().unwrap();
            let bounds = state.mask.bounds();
            let grown = bounds.union(&other.bounds);
            let reallocated = if grown != bounds {
                state.mask.resize(grown)?
            } else {
                false
            };
            let src = other.bounds;
            for y in src.y..src.end_y() {
                for x in src.x..src.end_x() {
                    if other.get(x, y) {
                        let current = state.mask.get(x, y);
                        state.mask.set(x, y, !current);
                    }
                }
            }
            state.bounds_need_update = true;
            if reallocated {
                RegionEvent::BoundsChanged
            } else {
                RegionEvent::ContentChanged
            }
        };
        self.finish_shrinking_op(event)
    }

    /// Subtract a boolean mask (`if S { D = 0 }`)
    ///
    /// The bounds never grow; a disjoint operand is a no-op.
    pub fn subtract_mask(&self, other: &BooleanMask) -> RoiResult<()> {
        let changed = {
            let mut state = self.state.lock().unwrap();
            let overlap = state.mask.bounds().intersection(&other.bounds);
            if overlap.is_empty() {
                false
            } else {
                for y in overlap.y..overlap.end_y() {
                    for x in overlap.x..overlap.end_x() {
                        if other.get(x, y) {
                            state.mask.set(x, y, false);
                        }
                    }
                }
                state.bounds_need_update = true;
                true
            }
        };
        if !changed {
            return Ok(());
        }
        self.finish_shrinking_op(RegionEvent::ContentChanged)
    }

    /// Intersect with a boolean mask (`D &= S`)
    ///
    /// Materializes both operands over the intersection of their bounds
    /// and replaces this region's mask wholesale; this is intentionally
    /// the most expensive path since the result's shape is
    /// unpredictable. Intersecting with a blank operand is a hard error:
    /// it is ambiguous and must not silently empty the region.
    pub fn intersect_mask(&self, other: &BooleanMask) -> RoiResult<()> {
        if other.is_blank() {
            return Err(RoiError::EmptyOperand);
        }
        {
            let mut state = self.state.lock().unwrap();
            let overlap = state.mask.bounds().intersection(&other.bounds);
            let mut result = Mask2D::with_bounds(overlap)?;
            for y in overlap.y..overlap.end_y() {
                for x in overlap.x..overlap.end_x() {
                    if state.mask.get(x, y) && other.get(x, y) {
                        result.set(x, y, true);
                    }
                }
            }
            let tight = result.tight_bounds();
            result.resize(tight)?;
            state.mask = result;
            state.bounds_need_update = false;
        }
        self.record_change(RegionEvent::BoundsChanged);
        Ok(())
    }

    /// Union with another region
    pub fn add_region(&self, other: &Region2D) -> RoiResult<()> {
        self.add_mask(&other.boolean_mask())
    }

    /// Symmetric difference with another region
    pub fn exclusive_add_region(&self, other: &Region2D) -> RoiResult<()> {
        self.exclusive_add_mask(&other.boolean_mask())
    }

    /// Subtract another region
    pub fn subtract_region(&self, other: &Region2D) -> RoiResult<()> {
        self.subtract_mask(&other.boolean_mask())
    }

    /// Intersect with another region
    ///
    /// Fails with `EmptyOperand` when the other region is empty.
    pub fn intersect_region(&self, other: &Region2D) -> RoiResult<()> {
        self.intersect_mask(&other.boolean_mask())
    }

    // ---- queries --------------------------------------------------------

    /// Check whether a pixel lies inside the region
    ///
    /// Single-row and single-column regions fall back to exact bounds
    /// containment: shape rasterization at that scale is numerically
    /// unreliable, the rectangle is the more trustworthy answer.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        let state = self.state.lock().unwrap();
        let bounds = state.mask.bounds();
        if !bounds.contains_point(x, y) {
            return false;
        }
        if bounds.width == 1 || bounds.height == 1 {
            return true;
        }
        state.mask.get(x, y)
    }

    /// Check whether every pixel of a rectangle lies inside the region
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        if rect.is_empty() {
            return true;
        }
        let state = self.state.lock().unwrap();
        if !state.mask.bounds().contains_rect(rect) {
            return false;
        }
        for y in rect.y..rect.end_y() {
            for x in rect.x..rect.end_x() {
                if !state.mask.get(x, y) {
                    return false;
                }
            }
        }
        true
    }

    /// Check whether any pixel of a rectangle lies inside the region
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let state = self.state.lock().unwrap();
        let overlap = state.mask.bounds().intersection(rect);
        if overlap.is_empty() {
            return false;
        }
        for y in overlap.y..overlap.end_y() {
            for x in overlap.x..overlap.end_x() {
                if state.mask.get(x, y) {
                    return true;
                }
            }
        }
        false
    }

    /// Snapshot the region's content over a rectangle
    ///
    /// Pixels outside the region's bounds read as false; the overlap is
    /// copied from the buffer. This is the canonical interchange format
    /// with the rest of the system.
    ///
    /// # Arguments
    /// * `rect` - Area to export
    pub fn export_boolean_mask(&self, rect: Rect) -> BooleanMask {
        let state = self.state.lock().unwrap();
        let mut out = BooleanMask::new(rect);
        let overlap = state.mask.bounds().intersection(&rect);
        for y in overlap.y..overlap.end_y() {
            for x in overlap.x..overlap.end_x() {
                if state.mask.get(x, y) {
                    out.set(x, y, true);
                }
            }
        }
        out
    }

    /// Snapshot the region's full content over its current bounds
    pub fn boolean_mask(&self) -> BooleanMask {
        let bounds = self.bounds();
        self.export_boolean_mask(bounds)
    }

    // ---- whole-region edits ---------------------------------------------

    /// Remove every pixel, leaving an empty region at the prior origin
    pub fn clear(&self) -> RoiResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            let bounds = state.mask.bounds();
            state.mask = Mask2D::empty_at(bounds.x, bounds.y);
            state.bounds_need_update = false;
        }
        self.record_change(RegionEvent::BoundsChanged);
        Ok(())
    }

    /// Move the whole region by an offset
    ///
    /// Uses the same-size resize fast path, so this is O(1) in the mask
    /// area.
    pub fn translate(&self, dx: i32, dy: i32) -> RoiResult<()> {
        if dx == 0 && dy == 0 {
            return Ok(());
        }
        {
            let mut state = self.state.lock().unwrap();
            let moved = state.mask.bounds().translated(dx, dy);
            state.mask.resize(moved)?;
        }
        self.record_change(RegionEvent::BoundsChanged);
        Ok(())
    }
}

impl Default for Region2D {
    fn default() -> Self {
        Region2D::new()
    }
}

impl Clone for Region2D {
    fn clone(&self) -> Self {
        // Rasterizer strategies are stateless; a clone gets the default
        let clone = Region2D::new();
        {
            let source = self.state.lock().unwrap();
            let mut state = clone.state.lock().unwrap();
            state.mask = source.mask.clone();
            state.bounds_need_update = source.bounds_need_update;
        }
        clone
    }
}

impl std::fmt::Debug for Region2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("Region2D")
            .field("bounds", &state.mask.bounds())
            .field("bounds_need_update", &state.bounds_need_update)
            .finish()
    }
}
