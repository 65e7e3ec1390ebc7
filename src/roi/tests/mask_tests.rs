//! Tests for the Mask2D module

extern crate std;

use crate::roi::{Mask2D, Rect};

#[test]
fn test_empty_mask_has_placeholder_buffer() {
    let mask = Mask2D::new();
    std::assert!(mask.bounds().is_empty());
    // Degenerate 1x1 buffer keeps address arithmetic branch-free
    std::assert_eq!(mask.data().len(), 1);
    std::assert!(mask.is_blank());
}

#[test]
fn test_get_set_in_image_coordinates() {
    let mut mask = Mask2D::with_bounds(Rect::new(10, 20, 4, 4)).unwrap();
    mask.set(11, 21, true);
    std::assert!(mask.get(11, 21));
    std::assert!(!mask.get(10, 20));
    // Out-of-bounds reads are false, writes are ignored
    std::assert!(!mask.get(0, 0));
    mask.set(0, 0, true);
    std::assert!(!mask.get(0, 0));
    std::assert_eq!(mask.pixel_count(), 1);
}

#[test]
fn test_resize_same_size_moves_origin_without_reallocation() {
    let mut mask = Mask2D::with_bounds(Rect::new(0, 0, 3, 3)).unwrap();
    mask.set(1, 1, true);
    let reallocated = mask.resize(Rect::new(5, 5, 3, 3)).unwrap();
    std::assert!(!reallocated);
    std::assert_eq!(mask.bounds(), Rect::new(5, 5, 3, 3));
    // Content travels with the bounds
    std::assert!(mask.get(6, 6));
}

#[test]
fn test_resize_grow_preserves_content() {
    let mut mask = Mask2D::with_bounds(Rect::new(2, 2, 2, 2)).unwrap();
    mask.set(2, 2, true);
    mask.set(3, 3, true);
    let reallocated = mask.resize(Rect::new(0, 0, 6, 6)).unwrap();
    std::assert!(reallocated);
    std::assert!(mask.get(2, 2));
    std::assert!(mask.get(3, 3));
    std::assert_eq!(mask.pixel_count(), 2);
}

#[test]
fn test_resize_grow_then_shrink_round_trip() {
    let original = Rect::new(1, 1, 3, 2);
    let mut mask = Mask2D::with_bounds(original).unwrap();
    mask.set(1, 1, true);
    mask.set(3, 2, true);

    mask.resize(Rect::new(-5, -5, 20, 20)).unwrap();
    mask.resize(original).unwrap();

    std::assert_eq!(mask.bounds(), original);
    std::assert!(mask.get(1, 1));
    std::assert!(mask.get(3, 2));
    std::assert_eq!(mask.pixel_count(), 2);
}

#[test]
fn test_resize_shrink_drops_outside_content() {
    let mut mask = Mask2D::with_bounds(Rect::new(0, 0, 4, 4)).unwrap();
    mask.set(0, 0, true);
    mask.set(3, 3, true);
    mask.resize(Rect::new(2, 2, 2, 2)).unwrap();
    std::assert!(!mask.get(0, 0));
    std::assert!(mask.get(3, 3));
    std::assert_eq!(mask.pixel_count(), 1);
}

#[test]
fn test_resize_to_empty_keeps_degenerate_buffer() {
    let mut mask = Mask2D::with_bounds(Rect::new(0, 0, 4, 4)).unwrap();
    mask.set(1, 1, true);
    mask.resize(Rect::empty_at(7, 9)).unwrap();
    std::assert!(mask.bounds().is_empty());
    std::assert_eq!(mask.bounds().x, 7);
    std::assert_eq!(mask.data().len(), 1);
    std::assert!(mask.is_blank());
}

#[test]
fn test_tight_bounds() {
    let mut mask = Mask2D::with_bounds(Rect::new(0, 0, 8, 8)).unwrap();
    mask.set(2, 3, true);
    mask.set(5, 6, true);
    std::assert_eq!(mask.tight_bounds(), Rect::new(2, 3, 4, 4));
}

#[test]
fn test_tight_bounds_blank_mask() {
    let mask = Mask2D::with_bounds(Rect::new(4, 5, 6, 7)).unwrap();
    let tight = mask.tight_bounds();
    std::assert!(tight.is_empty());
    // The origin of the blank result stays put
    std::assert_eq!(tight.x, 4);
    std::assert_eq!(tight.y, 5);
}
