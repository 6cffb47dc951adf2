use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default tolerance for approximate comparisons.
pub const EPSILON: f32 = 1e-5;

/// Axis-aligned box in pixel space. The origin is bottom-left, so `top` is the
/// larger y coordinate and `bottom = top - height`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub width: f32,
    pub top: f32,
    pub height: f32,
}

impl Rect {
    /// Left, width, top, height.
    pub const fn new(left: f32, width: f32, top: f32, height: f32) -> Self {
        Self { left, width, top, height }
    }

    pub const fn from_array(values: [f32; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top - self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top - self.height * 0.5)
    }

    pub fn set(&mut self, left: f32, width: f32, top: f32, height: f32) {
        self.left = left;
        self.width = width;
        self.top = top;
        self.height = height;
    }

    /// Move the box keeping its extents.
    pub fn set_position(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy this box into `dest` without allocating a new one.
    pub fn copy_into(&self, dest: &mut Rect) {
        dest.set(self.left, self.width, self.top, self.height);
    }

    /// Strict interior test; points on an edge are outside.
    pub fn point_inside(&self, x: f32, y: f32) -> bool {
        x > self.left && x < self.right() && y < self.top && y > self.bottom()
    }

    /// Open-interval overlap on both axes. Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() > other.left
            && self.left < other.right()
            && self.top > other.bottom()
            && self.bottom() < other.top
    }

    /// Closed-interval overlap; shared edges count.
    pub fn touches(&self, other: &Rect) -> bool {
        self.right() >= other.left
            && self.left <= other.right()
            && self.top >= other.bottom()
            && self.bottom() <= other.top
    }

    /// True iff `other` lies strictly inside this box on all four sides.
    pub fn encapsulates(&self, other: &Rect) -> bool {
        self.left < other.left
            && self.right() > other.right()
            && self.top > other.top
            && self.bottom() < other.bottom()
    }

    /// Non-strict containment: `other` may share edges with this box.
    pub fn contains(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.right() >= other.right()
            && self.top >= other.top
            && self.bottom() <= other.bottom()
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let right = self.right().max(other.right());
        let top = self.top.max(other.top);
        let bottom = self.bottom().min(other.bottom());
        Rect::new(left, right - left, top, top - bottom)
    }

    /// Grow by `dx` on both sides, `up` above and `down` below.
    pub fn expanded(&self, dx: f32, up: f32, down: f32) -> Rect {
        Rect::new(
            self.left - dx,
            self.width + 2.0 * dx,
            self.top + up,
            self.height + up + down,
        )
    }

    /// Signed penetration along x.
    ///
    /// Positive when `other` crosses only this box's left edge: adding the value to
    /// `left` moves this box out to the right. Negative when `other` crosses only the
    /// right edge. Zero when there is no x-overlap, when `other` sits inside this box
    /// on x, or when it spans both edges.
    pub fn edge_overlap_x(&self, other: &Rect) -> f32 {
        signed_edge_overlap(self.left, self.right(), other.left, other.right())
    }

    /// Signed penetration along y. Positive when `other` crosses only the bottom edge
    /// (add to `top` to move up), negative when it crosses only the top edge.
    pub fn edge_overlap_y(&self, other: &Rect) -> f32 {
        signed_edge_overlap(self.bottom(), self.top, other.bottom(), other.top)
    }

    /// Horizontal-to-vertical penetration ratio at the top-left corner, or 0 unless
    /// `other` strictly covers that corner.
    pub fn top_left_corner(&self, other: &Rect) -> f32 {
        if !other.point_inside(self.left, self.top) {
            return 0.0;
        }
        let x = self.right().min(other.right()) - self.left;
        let y = self.top - self.bottom().max(other.bottom());
        x / y
    }

    pub fn top_right_corner(&self, other: &Rect) -> f32 {
        if !other.point_inside(self.right(), self.top) {
            return 0.0;
        }
        let x = self.right() - self.left.max(other.left);
        let y = self.top - self.bottom().max(other.bottom());
        x / y
    }

    pub fn bottom_left_corner(&self, other: &Rect) -> f32 {
        if !other.point_inside(self.left, self.bottom()) {
            return 0.0;
        }
        let x = self.right().min(other.right()) - self.left;
        let y = self.top.min(other.top) - self.bottom();
        x / y
    }

    pub fn bottom_right_corner(&self, other: &Rect) -> f32 {
        if !other.point_inside(self.right(), self.bottom()) {
            return 0.0;
        }
        let x = self.right() - self.left.max(other.left);
        let y = self.top.min(other.top) - self.bottom();
        x / y
    }

    /// Componentwise approximate equality.
    pub fn equals(&self, other: &Rect, tolerance: f32) -> bool {
        (self.left - other.left).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.top - other.top).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }

    pub fn approx_eq(&self, other: &Rect) -> bool {
        self.equals(other, EPSILON)
    }
}

impl AsRef<Rect> for Rect {
    fn as_ref(&self) -> &Rect {
        self
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.5}, {:.5}] ({:.5} X {:.5})",
            self.left, self.top, self.width, self.height
        )
    }
}

/// 1D signed overlap of `[o_lo, o_hi]` against the edges of `[lo, hi]`.
fn signed_edge_overlap(lo: f32, hi: f32, o_lo: f32, o_hi: f32) -> f32 {
    let crosses_lo = o_lo < lo && o_hi > lo;
    let crosses_hi = o_lo < hi && o_hi > hi;
    match (crosses_lo, crosses_hi) {
        (true, false) => hi.min(o_hi) - lo,
        (false, true) => -(hi - lo.max(o_lo)),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(l: f32, w: f32, t: f32, h: f32) -> Rect {
        Rect::new(l, w, t, h)
    }

    #[test]
    fn test_encapsulates_is_strict() {
        let a = r(10.0, 10.0, 10.0, 10.0);
        assert!(a.encapsulates(&r(11.0, 2.0, 9.0, 2.0)));
        assert!(!a.encapsulates(&r(11.0, 2.0, 11.0, 2.0)));
        assert!(!a.encapsulates(&r(9.0, 10.0, 10.0, 2.0)));
        assert!(a.encapsulates(&r(10.0001, 9.8999, 9.9999, 9.8999)));
        // equal boxes never encapsulate each other
        assert!(!a.encapsulates(&a));
        assert!(a.contains(&a));
    }

    #[test]
    fn test_intersects_corners_and_overlaps() {
        let a = r(10.0, 10.0, 10.0, 10.0);
        for b in [
            r(5.0, 6.0, 5.0, 6.0),
            r(5.0, 6.0, 9.0, 6.0),
            r(19.0, 6.0, 5.0, 6.0),
            r(19.0, 6.0, 9.0, 6.0),
            r(5.0, 30.0, 5.0, 2.0),
            r(15.0, 2.0, 15.0, 20.0),
        ] {
            assert!(a.intersects(&b), "{b} should hit {a}");
            assert!(b.intersects(&a));
        }
    }

    #[test]
    fn test_intersects_misses_and_touching_edges() {
        let a = r(10.0, 10.0, 10.0, 10.0);
        for b in [
            r(5.0, 5.0, 5.0, 6.0),
            r(5.0, 5.0, 9.0, 6.0),
            r(20.0, 6.0, 5.0, 6.0),
            r(20.0, 6.0, 9.0, 6.0),
            r(5.0, 30.0, 12.0, 2.0),
            r(20.0, 2.0, 15.0, 20.0),
        ] {
            assert!(!a.intersects(&b), "{b} should miss {a}");
            assert!(!b.intersects(&a));
        }
        // shared edge touches but does not intersect
        let b = r(20.0, 5.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.touches(&b));
    }

    #[test]
    fn test_corner_ratios() {
        let a = r(10.0, 10.0, 10.0, 10.0);

        assert_eq!(a.top_left_corner(&r(9.0, 2.0, 11.0, 2.0)), 1.0);
        assert_eq!(a.top_left_corner(&r(11.0, 2.0, 11.0, 2.0)), 0.0);
        assert_eq!(a.top_left_corner(&r(9.0, 2.0, 13.0, 2.0)), 0.0);

        assert_eq!(a.top_right_corner(&r(19.0, 2.0, 11.0, 2.0)), 1.0);
        assert_eq!(a.top_right_corner(&r(21.0, 2.0, 11.0, 2.0)), 0.0);
        assert_eq!(a.top_right_corner(&r(19.0, 2.0, 13.0, 2.0)), 0.0);

        assert_eq!(a.bottom_right_corner(&r(19.0, 2.0, 1.0, 2.0)), 1.0);
        assert_eq!(a.bottom_right_corner(&r(21.0, 2.0, 1.0, 2.0)), 0.0);
        assert_eq!(a.bottom_right_corner(&r(19.0, 2.0, -1.0, 2.0)), 0.0);

        assert_eq!(a.bottom_left_corner(&r(9.0, 2.0, 1.0, 2.0)), 1.0);
        assert_eq!(a.bottom_left_corner(&r(11.0, 2.0, 1.0, 2.0)), 0.0);
        assert_eq!(a.bottom_left_corner(&r(9.0, 2.0, -1.0, 2.0)), 0.0);

        assert_eq!(a.bottom_left_corner(&r(9.5, 2.0, 1.0, 2.0)), 1.5);
        assert_eq!(a.bottom_left_corner(&r(10.0, 4.0, 1.0, 2.0)), 0.0);
        assert_eq!(a.bottom_left_corner(&r(9.0, 2.0, 2.0, 5.0)), 0.5);
    }

    #[test]
    fn test_edge_overlap_signs() {
        let a = r(0.0, 10.0, 10.0, 10.0);
        // crosses left edge only
        assert_eq!(a.edge_overlap_x(&r(-1.0, 3.0, 11.0, 3.0)), 2.0);
        // crosses right edge only
        assert_eq!(a.edge_overlap_x(&r(9.0, 2.0, 11.0, 2.0)), -1.0);
        // inside on x, spans both, or disjoint
        assert_eq!(a.edge_overlap_x(&r(2.0, 3.0, 5.0, 1.0)), 0.0);
        assert_eq!(a.edge_overlap_x(&r(-5.0, 30.0, 5.0, 1.0)), 0.0);
        assert_eq!(a.edge_overlap_x(&r(10.0, 3.0, 5.0, 1.0)), 0.0);

        // crosses top edge (negative) and bottom edge (positive)
        assert_eq!(a.edge_overlap_y(&r(-1.0, 3.0, 11.0, 3.0)), -2.0);
        assert_eq!(a.edge_overlap_y(&r(-1.0, 2.0, 2.0, 4.0)), 2.0);
        assert_eq!(a.edge_overlap_y(&r(-1.0, 4.0, 7.0, 3.0)), 0.0);
    }

    #[test]
    fn test_union_expanded_and_copy() {
        let a = r(0.0, 10.0, 10.0, 10.0);
        let b = r(5.0, 10.0, 20.0, 5.0);
        let u = a.union(&b);
        assert!(u.approx_eq(&r(0.0, 15.0, 20.0, 20.0)));

        let e = a.expanded(1.0, 2.0, 3.0);
        assert!(e.approx_eq(&r(-1.0, 12.0, 12.0, 15.0)));
        assert_eq!(e.bottom(), -3.0);

        let mut dest = Rect::default();
        a.copy_into(&mut dest);
        assert_eq!(dest, a);
        dest.reset();
        assert_eq!(dest, Rect::default());
    }

    #[test]
    fn test_equals_tolerance_and_display() {
        let a = r(1.0, 2.0, 3.0, 4.0);
        assert!(a.equals(&r(1.05, 2.0, 3.0, 4.0), 0.1));
        assert!(!a.equals(&r(1.05, 2.0, 3.0, 4.0), 0.01));
        assert_eq!(a.to_string(), "[1.00000, 3.00000] (2.00000 X 4.00000)");
        assert!(a.point_inside(2.0, 1.0));
        assert!(!a.point_inside(1.0, 1.0));
    }
}
