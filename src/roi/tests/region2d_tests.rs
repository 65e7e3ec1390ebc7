//! Tests for the Region2D module

extern crate std;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::roi::{BooleanMask, Rect, Region2D, RegionEvent, RoiError};

use super::test_utils::{rect_mask, rect_region, set_pixels};

#[test]
fn test_new_region_is_empty() {
    let region = Region2D::new();
    std::assert!(region.is_empty());
    std::assert!(region.bounds().is_empty());
    std::assert_eq!(region.pixel_count(), 0);
}

#[test]
fn test_set_point_grows_bounds() {
    let region = Region2D::new();
    region.set_point(5, 7, true).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(5, 7, 1, 1));

    region.set_point(2, 3, true).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(2, 3, 4, 5));
    std::assert!(region.contains_point(5, 7));
    std::assert!(region.contains_point(2, 3));
    std::assert_eq!(region.pixel_count(), 2);
}

#[test]
fn test_remove_point_defers_bounds_shrink() {
    let region = rect_region(0, 0, 3, 3);
    // Clear the whole top row so the tight box actually shrinks
    for x in 0..3 {
        region.set_point(x, 0, false).unwrap();
    }
    std::assert!(region.bounds_need_update());
    // Bounds stay stale until the rescan
    std::assert_eq!(region.bounds(), Rect::new(0, 0, 3, 3));

    let changed = region.optimize_bounds().unwrap();
    std::assert!(changed);
    std::assert!(!region.bounds_need_update());
    std::assert_eq!(region.bounds(), Rect::new(0, 1, 3, 2));
    std::assert_eq!(region.pixel_count(), 6);
}

#[test]
fn test_remove_point_outside_bounds_is_noop() {
    let region = rect_region(0, 0, 3, 3);
    region.set_point(50, 50, false).unwrap();
    std::assert!(!region.bounds_need_update());
    std::assert_eq!(region.pixel_count(), 9);
}

#[test]
fn test_add_then_remove_rect_scenario() {
    // The canonical edit sequence: fill a square, clear its left half,
    // shrink the bounds back to tight
    let region = Region2D::new();
    region.add_rect(Rect::new(0, 0, 4, 4)).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(0, 0, 4, 4));
    std::assert_eq!(region.pixel_count(), 16);

    region.remove_rect(Rect::new(0, 0, 2, 4)).unwrap();
    std::assert!(region.bounds_need_update());
    std::assert_eq!(region.pixel_count(), 8);

    region.optimize_bounds().unwrap();
    std::assert_eq!(region.bounds(), Rect::new(2, 0, 2, 4));
    std::assert_eq!(region.pixel_count(), 8);
}

#[test]
fn test_remove_disjoint_shape_is_noop() {
    let region = rect_region(0, 0, 4, 4);
    region.remove_rect(Rect::new(100, 100, 5, 5)).unwrap();
    std::assert!(!region.bounds_need_update());
    std::assert_eq!(region.pixel_count(), 16);
}

#[test]
fn test_optimize_bounds_is_tight() {
    let region = Region2D::new();
    region.add_rect(Rect::new(0, 0, 8, 8)).unwrap();
    region.remove_rect(Rect::new(0, 0, 8, 3)).unwrap();
    region.remove_rect(Rect::new(6, 0, 2, 8)).unwrap();
    region.optimize_bounds().unwrap();

    // Every boundary row/column of the tight bounds holds a set pixel
    let bounds = region.bounds();
    std::assert_eq!(bounds, Rect::new(0, 3, 6, 5));
    let top = Rect::new(bounds.x, bounds.y, bounds.width, 1);
    let bottom = Rect::new(bounds.x, bounds.end_y() - 1, bounds.width, 1);
    let left = Rect::new(bounds.x, bounds.y, 1, bounds.height);
    let right = Rect::new(bounds.end_x() - 1, bounds.y, 1, bounds.height);
    std::assert!(region.intersects_rect(&top));
    std::assert!(region.intersects_rect(&bottom));
    std::assert!(region.intersects_rect(&left));
    std::assert!(region.intersects_rect(&right));
}

#[test]
fn test_optimize_bounds_empty_region_keeps_origin() {
    let region = rect_region(5, 5, 2, 2);
    region.remove_rect(Rect::new(5, 5, 2, 2)).unwrap();
    region.optimize_bounds().unwrap();
    let bounds = region.bounds();
    std::assert!(bounds.is_empty());
    std::assert_eq!(bounds.x, 5);
    std::assert_eq!(bounds.y, 5);
}

#[test]
fn test_update_scope_coalesces_rescans_and_events() {
    let region = rect_region(0, 0, 6, 6);
    let events = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&events);
    region.on_change(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    {
        let _scope = region.begin_update();
        for x in 0..6 {
            region.set_point(x, 0, false).unwrap();
        }
        // Nested scopes are reference-counted, only the outermost exit
        // triggers the deferred work
        {
            let _inner = region.begin_update();
            region.set_point(0, 1, false).unwrap();
        }
        std::assert!(region.bounds_need_update());
        std::assert_eq!(events.load(Ordering::SeqCst), 0);
    }

    std::assert!(!region.bounds_need_update());
    std::assert_eq!(region.bounds(), Rect::new(0, 1, 6, 5));
    std::assert_eq!(events.load(Ordering::SeqCst), 1);
}

#[test]
fn test_set_point_notifies_immediately_outside_scope() {
    let region = Region2D::new();
    let events = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&events);
    region.on_change(Box::new(move |event| {
        if event == RegionEvent::BoundsChanged {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }));

    region.set_point(1, 1, true).unwrap();
    std::assert_eq!(events.load(Ordering::SeqCst), 1);
}

#[test]
fn test_add_mask_union() {
    let region = rect_region(0, 0, 4, 4);
    region.add_mask(&rect_mask(2, 2, 4, 4)).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(0, 0, 6, 6));
    // 16 + 16 - 4 overlapping
    std::assert_eq!(region.pixel_count(), 28);
}

#[test]
fn test_add_is_idempotent() {
    let region = rect_region(1, 1, 3, 3);
    let before = region.boolean_mask();
    region.add_mask(&before).unwrap();
    std::assert_eq!(region.boolean_mask(), before);
}

#[test]
fn test_subtract_self_empties_region() {
    let region = rect_region(0, 0, 5, 5);
    let snapshot = region.boolean_mask();
    region.subtract_mask(&snapshot).unwrap();
    std::assert!(region.is_empty());
    // Outside a batch scope the rescan runs immediately
    std::assert!(region.bounds().is_empty());
}

#[test]
fn test_exclusive_add_self_empties_region() {
    let region = rect_region(0, 0, 5, 5);
    let snapshot = region.boolean_mask();
    region.exclusive_add_mask(&snapshot).unwrap();
    std::assert!(region.is_empty());
    std::assert!(region.bounds().is_empty());
}

#[test]
fn test_exclusive_add_disjoint_masks() {
    let region = rect_region(0, 0, 2, 2);
    region.exclusive_add_mask(&rect_mask(4, 0, 2, 2)).unwrap();
    std::assert_eq!(region.pixel_count(), 8);
    std::assert_eq!(region.bounds(), Rect::new(0, 0, 6, 2));
}

#[test]
fn test_subtract_disjoint_is_noop() {
    let region = rect_region(0, 0, 4, 4);
    region.subtract_mask(&rect_mask(10, 10, 4, 4)).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(0, 0, 4, 4));
    std::assert_eq!(region.pixel_count(), 16);
}

#[test]
fn test_intersect_shrinks_to_overlap() {
    let region = rect_region(0, 0, 4, 4);
    region.intersect_mask(&rect_mask(2, 2, 4, 4)).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(2, 2, 2, 2));
    std::assert_eq!(region.pixel_count(), 4);
    std::assert!(!region.bounds_need_update());
}

#[test]
fn test_intersect_with_blank_operand_is_error() {
    let region = rect_region(0, 0, 4, 4);
    let result = region.intersect_mask(&BooleanMask::empty());
    std::assert!(matches!(result, Err(RoiError::EmptyOperand)));
    // The region must not be silently emptied
    std::assert_eq!(region.pixel_count(), 16);
}

#[test]
fn test_union_intersection_duality() {
    let a = rect_region(0, 0, 4, 4);
    let b = rect_mask(2, 2, 4, 4);
    a.add_mask(&b).unwrap();
    a.intersect_mask(&b).unwrap();
    // (A union B) intersect B == B
    std::assert_eq!(a.boolean_mask(), b);
}

#[test]
fn test_boolean_mask_round_trip() {
    let region = Region2D::new();
    region.add_rect(Rect::new(-3, -2, 5, 4)).unwrap();
    region.set_point(10, 10, true).unwrap();
    region.set_point(-3, -2, false).unwrap();

    let exported = region.boolean_mask();
    let rebuilt = Region2D::from_boolean_mask(&exported).unwrap();
    std::assert_eq!(rebuilt.export_boolean_mask(exported.bounds), exported);
}

#[test]
fn test_from_boolean_mask_tightens_bounds() {
    let mut mask = BooleanMask::new(Rect::new(0, 0, 10, 10));
    mask.set(4, 5, true);
    mask.set(6, 7, true);
    let region = Region2D::from_boolean_mask(&mask).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(4, 5, 3, 3));
    std::assert_eq!(region.pixel_count(), 2);
}

#[test]
fn test_export_boolean_mask_outside_bounds_is_false() {
    let region = rect_region(0, 0, 2, 2);
    let exported = region.export_boolean_mask(Rect::new(-2, -2, 6, 6));
    std::assert_eq!(exported.pixel_count(), 4);
    std::assert!(!exported.get(-1, -1));
    std::assert!(exported.get(0, 0));
    std::assert!(exported.get(1, 1));
    std::assert!(!exported.get(2, 2));
}

#[test]
fn test_contains_rect_and_intersects_rect() {
    let region = Region2D::new();
    region.add_rect(Rect::new(0, 0, 4, 4)).unwrap();
    region.remove_rect(Rect::new(0, 0, 2, 2)).unwrap();

    std::assert!(region.contains_rect(&Rect::new(2, 0, 2, 4)));
    std::assert!(!region.contains_rect(&Rect::new(0, 0, 4, 4)));
    std::assert!(region.intersects_rect(&Rect::new(0, 0, 4, 4)));
    std::assert!(!region.intersects_rect(&Rect::new(0, 0, 2, 2)));
    std::assert!(!region.intersects_rect(&Rect::new(100, 0, 4, 4)));
}

#[test]
fn test_degenerate_region_uses_rect_containment() {
    // Single-column region: containment falls back to the bounds test
    let region = rect_region(3, 0, 1, 5);
    std::assert_eq!(region.bounds(), Rect::new(3, 0, 1, 5));
    for y in 0..5 {
        std::assert!(region.contains_point(3, y));
    }
    std::assert!(!region.contains_point(4, 0));
}

#[test]
fn test_translate_moves_content() {
    let region = rect_region(0, 0, 3, 3);
    region.translate(10, -5).unwrap();
    std::assert_eq!(region.bounds(), Rect::new(10, -5, 3, 3));
    std::assert!(region.contains_point(11, -4));
    std::assert_eq!(region.pixel_count(), 9);
}

#[test]
fn test_clear_keeps_origin() {
    let region = rect_region(7, 8, 3, 3);
    region.clear().unwrap();
    std::assert!(region.is_empty());
    std::assert_eq!(region.bounds().x, 7);
    std::assert_eq!(region.bounds().y, 8);
}

#[test]
fn test_failed_grow_leaves_region_intact() {
    let region = rect_region(0, 0, 2, 2);
    // A bounding box this large overflows the buffer capacity, the
    // resize must be aborted without corrupting state
    let result = region.set_point(1 << 30, 1 << 30, true);
    std::assert!(matches!(result, Err(RoiError::AllocationFailed(_))));
    std::assert_eq!(region.bounds(), Rect::new(0, 0, 2, 2));
    std::assert_eq!(region.pixel_count(), 4);
}

#[test]
fn test_region_to_region_algebra() {
    let a = rect_region(0, 0, 4, 2);
    let b = rect_region(2, 0, 4, 2);

    a.add_region(&b).unwrap();
    std::assert_eq!(a.bounds(), Rect::new(0, 0, 6, 2));

    a.subtract_region(&b).unwrap();
    std::assert_eq!(
        set_pixels(&a),
        vec![(0, 0), (1, 0), (0, 1), (1, 1)]
    );
}
