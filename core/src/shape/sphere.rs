//! Sphere

use super::{ShapeHit, ShapeSample};
use crate::base::*;
use crate::geometry::*;
use crate::sampling::*;

/// A sphere given by its centre and radius.
#[derive(Clone, Debug)]
pub struct Sphere {
    /// Centre.
    pub center: Point3f,

    /// Radius.
    pub radius: Float,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center` - Centre.
    /// * `radius` - Radius.
    pub fn new(center: Point3f, radius: Float) -> Self {
        Self { center, radius }
    }

    /// Solve for both parametric roots of the ray-sphere quadratic.
    ///
    /// * `ray` - The ray.
    fn roots(&self, ray: &Ray) -> Option<(Float, Float)> {
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * oc.dot(&ray.d);
        let c = oc.length_squared() - self.radius * self.radius;

        let discrim = b * b - 4.0 * a * c;
        if discrim < 0.0 {
            return None;
        }
        let root = discrim.sqrt();
        let q = if b < 0.0 { -0.5 * (b - root) } else { -0.5 * (b + root) };
        if q == 0.0 {
            return None;
        }

        let t0 = q / a;
        let t1 = c / q;
        Some(if t0 > t1 { (t1, t0) } else { (t0, t1) })
    }

    /// Returns the nearest root inside the ray's parametric range.
    ///
    /// * `ray` - The ray.
    fn nearest_t(&self, ray: &Ray) -> Option<Float> {
        let (t0, t1) = self.roots(ray)?;
        if t0 > ray.t_max || t1 < ray.t_min {
            return None;
        }
        if t0 >= ray.t_min {
            Some(t0)
        } else if t1 <= ray.t_max {
            Some(t1)
        } else {
            None
        }
    }

    /// Returns the nearest intersection.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let t = self.nearest_t(ray)?;

        // Refine the hit point by reprojecting it onto the surface.
        let dir = (ray.at(t) - self.center).normalize();
        let p = self.center + dir * self.radius;

        let mut phi = dir.y.atan2(dir.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let theta = safe_acos(dir.z);
        let dpdu = Vector3f::new(-dir.y, dir.x, 0.0) * (TWO_PI * self.radius);

        Some(ShapeHit {
            t,
            p,
            n: dir,
            ns: dir,
            uv: Point2f::new(phi * INV_TWO_PI, theta * INV_PI),
            dpdu,
        })
    }

    /// Returns true if the ray hits the sphere.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.nearest_t(ray).is_some()
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds3f {
        let r = Vector3f::splat(self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    /// Returns true if `p` lies outside the sphere.
    ///
    /// * `p` - The point.
    pub fn is_outside(&self, p: &Point3f) -> bool {
        p.distance_squared(&self.center) > self.radius * self.radius * 1.0001
    }

    /// Sample a point uniformly by area.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    pub fn sample_area(&self, u: &Point2f) -> ShapeSample {
        let n = uniform_sample_sphere(u);
        ShapeSample {
            p: self.center + n * self.radius,
            n,
            pdf: 1.0 / self.area(),
        }
    }

    /// Sample a point inside the cone of directions the sphere subtends as
    /// seen from `ref_p`, which must lie outside the sphere.
    ///
    /// * `ref_p` - Reference point.
    /// * `u`     - Sample value in [0, 1)^2.
    pub fn sample_cone(&self, ref_p: &Point3f, u: &Point2f) -> ShapeSample {
        let dc = ref_p.distance(&self.center);
        let wc = (self.center - *ref_p) / dc;
        let frame = Frame::from_normal(&wc);

        // Compute theta and phi values for sample in cone.
        let sin_theta_max2 = self.radius * self.radius / (dc * dc);
        let cos_theta_max = safe_sqrt(1.0 - sin_theta_max2);
        let cos_theta = (1.0 - u.x) + u.x * cos_theta_max;
        let sin_theta2 = (1.0 - cos_theta * cos_theta).max(0.0);
        let phi = u.y * TWO_PI;

        // Compute angle alpha from the centre of the sphere to the sampled point.
        let ds = dc * cos_theta - safe_sqrt(self.radius * self.radius - dc * dc * sin_theta2);
        let cos_alpha =
            (dc * dc + self.radius * self.radius - ds * ds) / (2.0 * dc * self.radius);
        let sin_alpha = safe_sqrt(1.0 - cos_alpha * cos_alpha);

        // The sampled normal faces back towards the reference point.
        let local = Vector3f::new(sin_alpha * phi.cos(), sin_alpha * phi.sin(), cos_alpha);
        let n = -frame.to_world(&local);

        ShapeSample {
            p: self.center + n * self.radius,
            n,
            pdf: uniform_cone_pdf(cos_theta_max),
        }
    }

    /// Returns the cone sampling density as seen from `ref_p`.
    ///
    /// * `ref_p` - Reference point outside the sphere.
    pub fn pdf_cone(&self, ref_p: &Point3f) -> Float {
        let sin_theta_max2 = self.radius * self.radius / ref_p.distance_squared(&self.center);
        let cos_theta_max = safe_sqrt(1.0 - sin_theta_max2);
        uniform_cone_pdf(cos_theta_max)
    }
}
