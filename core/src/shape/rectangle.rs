//! Rectangle

use super::{ShapeHit, ShapeSample};
use crate::base::*;
use crate::geometry::*;

/// A parallelogram spanned by two edges from a corner. The surface normal is
/// `normalize(edge_u × edge_v)`.
#[derive(Clone, Debug)]
pub struct Rectangle {
    /// Corner at uv = (0, 0).
    pub origin: Point3f,

    /// Edge towards uv = (1, 0).
    pub edge_u: Vector3f,

    /// Edge towards uv = (0, 1).
    pub edge_v: Vector3f,

    /// Unnormalized normal `edge_u × edge_v`.
    cross: Vector3f,

    /// Unit normal.
    normal: Normal3f,
}

impl Rectangle {
    /// Create a new rectangle.
    ///
    /// * `origin` - Corner at uv = (0, 0).
    /// * `edge_u` - Edge towards uv = (1, 0).
    /// * `edge_v` - Edge towards uv = (0, 1).
    pub fn new(origin: Point3f, edge_u: Vector3f, edge_v: Vector3f) -> Self {
        let cross = edge_u.cross(&edge_v);
        Self {
            origin,
            edge_u,
            edge_v,
            cross,
            normal: cross.normalize(),
        }
    }

    /// Returns the unit normal.
    pub fn normal(&self) -> Normal3f {
        self.normal
    }

    /// Returns the nearest intersection.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let denom = self.normal.dot(&ray.d);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = self.normal.dot(&(self.origin - ray.o)) / denom;
        if t < ray.t_min || t > ray.t_max {
            return None;
        }

        let p = ray.at(t);
        let q = p - self.origin;
        let inv_len2 = 1.0 / self.cross.length_squared();
        let u = q.cross(&self.edge_v).dot(&self.cross) * inv_len2;
        let v = self.edge_u.cross(&q).dot(&self.cross) * inv_len2;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(ShapeHit {
            t,
            p,
            n: self.normal,
            ns: self.normal,
            uv: Point2f::new(u, v),
            dpdu: self.edge_u,
        })
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds3f {
        Bounds3f::new(self.origin, self.origin + self.edge_u)
            .union_point(&(self.origin + self.edge_v))
            .union_point(&(self.origin + self.edge_u + self.edge_v))
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        self.cross.length()
    }

    /// Sample a point uniformly by area.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    pub fn sample_area(&self, u: &Point2f) -> ShapeSample {
        ShapeSample {
            p: self.origin + self.edge_u * u.x + self.edge_v * u.y,
            n: self.normal,
            pdf: 1.0 / self.area(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn unit_square() -> Rectangle {
        Rectangle::new(
            Point3f::new(-0.5, -0.5, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn hit_reports_uv_and_normal() {
        let rect = unit_square();
        let r = Ray::new(Point3f::new(0.25, 0.0, 2.0), Vector3f::new(0.0, 0.0, -1.0));
        let hit = rect.intersect(&r).unwrap();
        assert!(approx_eq!(Float, hit.t, 2.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, hit.uv.x, 0.75, epsilon = 1e-6));
        assert!(approx_eq!(Float, hit.uv.y, 0.5, epsilon = 1e-6));
        assert_eq!(hit.n, Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn ray_outside_edges_misses() {
        let rect = unit_square();
        let r = Ray::new(Point3f::new(0.75, 0.0, 2.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(rect.intersect(&r).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let rect = unit_square();
        let r = Ray::new(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(rect.intersect(&r).is_none());
    }

    #[test]
    fn area_of_parallelogram() {
        let rect = Rectangle::new(
            Point3f::ZERO,
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(1.0, 3.0, 0.0),
        );
        assert!(approx_eq!(Float, rect.area(), 6.0, epsilon = 1e-6));
    }
}
