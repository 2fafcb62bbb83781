//! Axis-aligned boxes in layout coordinates.

use serde::{Deserialize, Serialize};

/// An axis-aligned box with inclusive integer bounds.
///
/// A box is valid when `x_lo <= x_hi` and `y_lo <= y_hi`. [`Rect::INVALID`]
/// is the empty box: the identity of [`Rect::union`] and the sentinel
/// returned by lookups that find nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x_lo: i64,
    /// Bottom edge.
    pub y_lo: i64,
    /// Right edge.
    pub x_hi: i64,
    /// Top edge.
    pub y_hi: i64,
}

impl Rect {
    /// The empty box.
    pub const INVALID: Rect = Rect {
        x_lo: i64::MAX,
        y_lo: i64::MAX,
        x_hi: i64::MIN,
        y_hi: i64::MIN,
    };

    /// Creates a box from its four edges.
    pub const fn new(x_lo: i64, y_lo: i64, x_hi: i64, y_hi: i64) -> Self {
        Self {
            x_lo,
            y_lo,
            x_hi,
            y_hi,
        }
    }

    /// Returns `true` if the box is non-empty.
    pub fn is_valid(&self) -> bool {
        self.x_lo <= self.x_hi && self.y_lo <= self.y_hi
    }

    /// Horizontal extent. Zero for invalid boxes.
    pub fn width(&self) -> i64 {
        if self.is_valid() {
            self.x_hi - self.x_lo
        } else {
            0
        }
    }

    /// Vertical extent. Zero for invalid boxes.
    pub fn height(&self) -> i64 {
        if self.is_valid() {
            self.y_hi - self.y_lo
        } else {
            0
        }
    }

    /// Smallest box enclosing both boxes. Invalid boxes are ignored.
    pub fn union(self, other: Rect) -> Rect {
        if !self.is_valid() {
            return other;
        }
        if !other.is_valid() {
            return self;
        }
        Rect {
            x_lo: self.x_lo.min(other.x_lo),
            y_lo: self.y_lo.min(other.y_lo),
            x_hi: self.x_hi.max(other.x_hi),
            y_hi: self.y_hi.max(other.y_hi),
        }
    }

    /// Returns `true` if the open horizontal projections of the boxes intersect.
    ///
    /// Boxes that only share an edge do not overlap.
    pub fn x_overlaps(&self, other: &Rect) -> bool {
        self.x_lo < other.x_hi && other.x_lo < self.x_hi
    }

    /// Returns the box moved by `(dx, dy)`.
    pub fn translated(self, dx: i64, dy: i64) -> Rect {
        if !self.is_valid() {
            return self;
        }
        Rect {
            x_lo: self.x_lo + dx,
            y_lo: self.y_lo + dy,
            x_hi: self.x_hi + dx,
            y_hi: self.y_hi + dy,
        }
    }

    /// Half-perimeter of the box. Zero for invalid boxes.
    pub fn half_perimeter(&self) -> i64 {
        self.width() + self.height()
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sentinel() {
        assert!(!Rect::INVALID.is_valid());
        assert!(!Rect::default().is_valid());
        assert_eq!(Rect::INVALID.width(), 0);
        assert_eq!(Rect::INVALID.height(), 0);
    }

    #[test]
    fn degenerate_box_is_valid() {
        let r = Rect::new(5, 0, 5, 10);
        assert!(r.is_valid());
        assert_eq!(r.width(), 0);
        assert_eq!(r.height(), 10);
    }

    #[test]
    fn union_ignores_invalid() {
        let r = Rect::new(0, 0, 2, 2);
        assert_eq!(Rect::INVALID.union(r), r);
        assert_eq!(r.union(Rect::INVALID), r);
        assert_eq!(
            r.union(Rect::new(5, -1, 6, 1)),
            Rect::new(0, -1, 6, 2)
        );
    }

    #[test]
    fn x_overlap_is_open() {
        let a = Rect::new(0, 0, 10, 5);
        assert!(a.x_overlaps(&Rect::new(9, 100, 20, 105)));
        // Abutting boxes share an edge only
        assert!(!a.x_overlaps(&Rect::new(10, 0, 20, 5)));
        assert!(!a.x_overlaps(&Rect::new(11, 0, 20, 5)));
    }

    #[test]
    fn translate_and_half_perimeter() {
        let r = Rect::new(0, 0, 3, 4).translated(1, -2);
        assert_eq!(r, Rect::new(1, -2, 4, 2));
        assert_eq!(r.half_perimeter(), 7);
        assert_eq!(Rect::INVALID.translated(3, 3), Rect::INVALID);
    }
}
