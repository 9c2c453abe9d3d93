//! 3-D Axis Aligned Bounding Boxes

use super::ray::*;
use super::vector3::*;
use crate::base::*;

/// A 3-D axis aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// Returns an empty box.
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds3f {
    /// Creates a new box from two corner points.
    ///
    /// * `p1` - First corner.
    /// * `p2` - Second corner.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns an empty box whose minimum is greater than its maximum.
    pub fn empty() -> Self {
        Self {
            p_min: Point3f::splat(INFINITY),
            p_max: Point3f::splat(-INFINITY),
        }
    }

    /// Returns true if the box contains nothing.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Returns the box enclosing this one and a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns the box enclosing two boxes.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }

    /// Returns the vector from the minimum to the maximum corner.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the box centre.
    pub fn centroid(&self) -> Point3f {
        0.5 * (self.p_min + self.p_max)
    }

    /// Returns the index of the longest axis.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Returns the surface area.
    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Position of a point relative to the corners, (0, 0, 0) at the minimum
    /// and (1, 1, 1) at the maximum.
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o = *p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        }
        if self.p_max.z > self.p_min.z {
            o.z /= self.p_max.z - self.p_min.z;
        }
        o
    }

    /// Returns the centre and radius of a sphere enclosing the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        if self.is_empty() {
            return (Point3f::ZERO, 0.0);
        }
        let center = self.centroid();
        (center, center.distance(&self.p_max))
    }

    /// Slab test against a ray using its precomputed inverse direction.
    /// Returns the parametric entry and exit distances.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for i in 0..3 {
            let mut t_near = (self.p_min[i] - ray.o[i]) * ray.inv_d[i];
            let mut t_far = (self.p_max[i] - ray.o[i]) * ray.inv_d[i];
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            // Guard against NaN from 0 * inf when the origin lies on a slab.
            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_union_with_point_is_degenerate_box() {
        let p = Point3f::new(1.0, 2.0, 3.0);
        let b = Bounds3f::empty().union_point(&p);
        assert_eq!(b.p_min, p);
        assert_eq!(b.p_max, p);
        assert!(!b.is_empty());
    }

    #[test]
    fn slab_test_hits_and_misses() {
        let b = Bounds3f::new(Point3f::splat(-1.0), Point3f::splat(1.0));
        let hit = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        let (t0, t1) = b.intersect_p(&hit).unwrap();
        assert_eq!(t0, 4.0);
        assert_eq!(t1, 6.0);

        let miss = Ray::new(Point3f::new(3.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(b.intersect_p(&miss).is_none());
    }
}
