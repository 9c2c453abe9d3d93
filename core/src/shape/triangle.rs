//! Triangle

use super::{ShapeHit, ShapeSample};
use crate::base::*;
use crate::geometry::*;
use crate::sampling::*;

/// A single triangle with optional per-vertex shading normals.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Vertex positions.
    pub p: [Point3f; 3],

    /// Optional per-vertex shading normals.
    pub n: Option<[Normal3f; 3]>,
}

impl Triangle {
    /// Create a new triangle.
    ///
    /// * `p` - Vertex positions.
    /// * `n` - Optional per-vertex shading normals.
    pub fn new(p: [Point3f; 3], n: Option<[Normal3f; 3]>) -> Self {
        Self { p, n }
    }

    /// Returns the geometric normal, flipped to agree with the shading
    /// normals if present.
    fn geometric_normal(&self) -> Normal3f {
        let n = (self.p[1] - self.p[0]).cross(&(self.p[2] - self.p[0])).normalize();
        match self.n {
            Some(ns) => n.face_forward(&(ns[0] + ns[1] + ns[2])),
            None => n,
        }
    }

    /// Returns the nearest intersection (Möller-Trumbore).
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let e1 = self.p[1] - self.p[0];
        let e2 = self.p[2] - self.p[0];
        let pvec = ray.d.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.o - self.p[0];
        let b1 = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let b2 = ray.d.dot(&qvec) * inv_det;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if t < ray.t_min || t > ray.t_max {
            return None;
        }

        let b0 = 1.0 - b1 - b2;
        let n = self.geometric_normal();
        let ns = match self.n {
            Some(vn) => {
                let ns = vn[0] * b0 + vn[1] * b1 + vn[2] * b2;
                if ns.length_squared() > 0.0 {
                    ns.normalize()
                } else {
                    n
                }
            }
            None => n,
        };

        Some(ShapeHit {
            t,
            p: self.p[0] * b0 + self.p[1] * b1 + self.p[2] * b2,
            n,
            ns,
            uv: Point2f::new(b1, b2),
            dpdu: e1,
        })
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds3f {
        Bounds3f::new(self.p[0], self.p[1]).union_point(&self.p[2])
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        0.5 * (self.p[1] - self.p[0]).cross(&(self.p[2] - self.p[0])).length()
    }

    /// Sample a point uniformly by area.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    pub fn sample_area(&self, u: &Point2f) -> ShapeSample {
        let b = uniform_sample_triangle(u);
        ShapeSample {
            p: self.p[0] * b.x + self.p[1] * b.y + self.p[2] * (1.0 - b.x - b.y),
            n: self.geometric_normal(),
            pdf: 1.0 / self.area(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn tri() -> Triangle {
        Triangle::new(
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            None,
        )
    }

    #[test]
    fn hit_inside_triangle() {
        let r = Ray::new(Point3f::new(0.25, 0.25, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        let hit = tri().intersect(&r).unwrap();
        assert!(approx_eq!(Float, hit.t, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, hit.p.x, 0.25, epsilon = 1e-6));
        assert!(approx_eq!(Float, hit.n.z, 1.0, epsilon = 1e-6));
    }

    #[test]
    fn miss_outside_hypotenuse() {
        let r = Ray::new(Point3f::new(0.75, 0.75, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(tri().intersect(&r).is_none());
    }

    #[test]
    fn shading_normals_orient_geometric_normal() {
        let down = Vector3f::new(0.0, 0.0, -1.0);
        let t = Triangle::new(tri().p, Some([down, down, down]));
        let r = Ray::new(Point3f::new(0.25, 0.25, 1.0), down);
        let hit = t.intersect(&r).unwrap();
        assert_eq!(hit.n, down);
        assert_eq!(hit.ns, down);
    }

    #[test]
    fn area_samples_are_on_plane() {
        let t = tri();
        let ss = t.sample_area(&Point2f::new(0.3, 0.6));
        assert_eq!(ss.p.z, 0.0);
        assert!(ss.p.x + ss.p.y <= 1.0 + 1e-6);
        assert!(approx_eq!(Float, ss.pdf, 2.0, epsilon = 1e-5));
    }
}
