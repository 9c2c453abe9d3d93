//! 2-D Axis Aligned Bounding Boxes

use super::point2::*;
use std::fmt;

/// An integer rectangle with an inclusive `p_min` and exclusive `p_max`.
/// Used for tiles and pixel ranges.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Bounds2i {
    /// Minimum bounds (inclusive).
    pub p_min: Point2i,

    /// Maximum bounds (exclusive).
    pub p_max: Point2i,
}

impl Bounds2i {
    /// Creates a new rectangle from two corner points.
    ///
    /// * `p1` - First corner.
    /// * `p2` - Second corner.
    pub fn new(p1: Point2i, p2: Point2i) -> Self {
        Self {
            p_min: Point2i::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            p_max: Point2i::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Creates a rectangle from an offset and a size.
    ///
    /// * `offset` - Upper-left corner.
    /// * `size`   - Width and height.
    pub fn from_offset_size(offset: Point2i, size: Point2i) -> Self {
        Self::new(offset, offset + size)
    }

    /// Returns the width and height.
    pub fn diagonal(&self) -> Point2i {
        self.p_max - self.p_min
    }

    /// Returns the number of pixels covered.
    pub fn area(&self) -> i64 {
        let d = self.diagonal();
        d.x as i64 * d.y as i64
    }

    /// Returns true if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.p_min.x >= self.p_max.x || self.p_min.y >= self.p_max.y
    }

    /// Returns the overlap of two rectangles (may be empty).
    ///
    /// * `other` - The other rectangle.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            p_min: Point2i::new(self.p_min.x.max(other.p_min.x), self.p_min.y.max(other.p_min.y)),
            p_max: Point2i::new(self.p_max.x.min(other.p_max.x), self.p_max.y.min(other.p_max.y)),
        }
    }

    /// Returns true if the pixel lies inside.
    ///
    /// * `p` - The pixel.
    pub fn contains(&self, p: &Point2i) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }
}

impl fmt::Debug for Bounds2i {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} - {}]", self.p_min, self.p_max)
    }
}

/// Iterates over pixels of a `Bounds2i` in row-major order.
pub struct Bounds2iIterator {
    /// The rectangle.
    bounds: Bounds2i,

    /// Next pixel to yield.
    p: Point2i,
}

impl IntoIterator for Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;

    /// Create an iterator for `Bounds2i`.
    fn into_iter(self) -> Self::IntoIter {
        Bounds2iIterator {
            bounds: self,
            p: self.p_min,
        }
    }
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    /// Get the next point.
    fn next(&mut self) -> Option<Self::Item> {
        if self.bounds.is_empty() || self.p.y >= self.bounds.p_max.y {
            return None;
        }

        let result = self.p;
        self.p.x += 1;
        if self.p.x >= self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_row_major_excluding_max() {
        let b = Bounds2i::new(Point2i::new(1, 1), Point2i::new(3, 3));
        let pts: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(
            pts,
            vec![
                Point2i::new(1, 1),
                Point2i::new(2, 1),
                Point2i::new(1, 2),
                Point2i::new(2, 2)
            ]
        );
    }

    #[test]
    fn empty_bounds_yield_nothing() {
        let b = Bounds2i::new(Point2i::new(1, 1), Point2i::new(1, 5));
        assert!(b.is_empty());
        assert_eq!(b.into_iter().count(), 0);
    }

    #[test]
    fn intersect_clips_to_overlap() {
        let a = Bounds2i::new(Point2i::new(0, 0), Point2i::new(10, 10));
        let b = Bounds2i::new(Point2i::new(8, -2), Point2i::new(20, 4));
        let c = a.intersect(&b);
        assert_eq!(c, Bounds2i::new(Point2i::new(8, 0), Point2i::new(10, 4)));
        assert_eq!(c.area(), 8);
    }
}
