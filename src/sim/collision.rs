//! Collision detection for axis-aligned shapes
//!
//! Everything in the runner is either an axis-aligned rectangle (player,
//! hazards, portals) or a circle (pickups). No rotation, no response beyond
//! a yes/no overlap answer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left origin (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrink by `margin` on every side
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: self.w - 2.0 * margin,
            h: self.h - 2.0 * margin,
        }
    }

    /// Shrink horizontally only
    pub fn inset_x(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            w: self.w - 2.0 * margin,
            ..*self
        }
    }
}

/// Strict overlap test - touching edges do not collide
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Check if a circle overlaps a rectangle
///
/// Works on the distance from the rectangle center, folding the problem into
/// one quadrant. A circle grazing a corner only hits when the corner is within
/// `radius`.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half = Vec2::new(rect.w / 2.0, rect.h / 2.0);
    let dist = (center - rect.center()).abs();

    if dist.x > half.x + radius || dist.y > half.y + radius {
        return false;
    }
    if dist.x <= half.x || dist.y <= half.y {
        return true;
    }

    (dist - half).length_squared() <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 30.0, 30.0);
        assert!(rects_overlap(&a, &Rect::new(20.0, 20.0, 30.0, 30.0)));
        assert!(!rects_overlap(&a, &Rect::new(40.0, 0.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!rects_overlap(&a, &Rect::new(30.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_inset_shrinks_both_axes() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0).inset(5.0);
        assert_eq!(r, Rect::new(15.0, 25.0, 20.0, 30.0));

        let r = Rect::new(10.0, 20.0, 40.0, 80.0).inset_x(10.0);
        assert_eq!(r, Rect::new(20.0, 20.0, 20.0, 80.0));
    }

    #[test]
    fn test_circle_rect_sides_and_corner() {
        let rect = Rect::new(0.0, 0.0, 30.0, 30.0);

        // Inside
        assert!(circle_rect_overlap(Vec2::new(15.0, 15.0), 5.0, &rect));
        // Touching the right side
        assert!(circle_rect_overlap(Vec2::new(40.0, 15.0), 10.0, &rect));
        // Too far right
        assert!(!circle_rect_overlap(Vec2::new(41.0, 15.0), 10.0, &rect));
        // Diagonal off the corner: (7, 7) away is ~9.9 > 9
        assert!(!circle_rect_overlap(Vec2::new(37.0, 37.0), 9.0, &rect));
        // Same offset with a larger radius reaches the corner
        assert!(circle_rect_overlap(Vec2::new(37.0, 37.0), 10.0, &rect));
    }

    proptest! {
        #[test]
        fn prop_rect_overlap_is_symmetric(
            ax in -500.0f32..500.0,
            ay in -500.0f32..500.0,
            aw in 1.0f32..100.0,
            ah in 1.0f32..100.0,
            bx in -500.0f32..500.0,
            by in -500.0f32..500.0,
            bw in 1.0f32..100.0,
            bh in 1.0f32..100.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(rects_overlap(&a, &b), rects_overlap(&b, &a));
        }

        #[test]
        fn prop_circle_centered_inside_rect_always_hits(
            x in 0.0f32..100.0,
            y in 0.0f32..100.0,
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            r in 0.1f32..20.0,
        ) {
            let rect = Rect::new(x, y, 50.0, 40.0);
            let center = Vec2::new(x + fx * 50.0, y + fy * 40.0);
            prop_assert!(circle_rect_overlap(center, r, &rect));
        }
    }
}
