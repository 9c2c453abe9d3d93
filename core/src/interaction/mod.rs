//! Interactions

use crate::base::*;
use crate::geometry::*;
use crate::medium::*;
use crate::scene::*;

/// A ray-surface intersection produced by `Scene::ray_intersect`.
#[derive(Copy, Clone, Debug)]
pub struct Intersection {
    /// Parametric hit distance along the ray.
    pub t: Float,

    /// Surface point.
    pub p: Point3f,

    /// Surface parameterization.
    pub uv: Point2f,

    /// Shading frame built around the interpolated normal.
    pub sh_frame: Frame,

    /// Geometric frame built around the face normal.
    pub geo_frame: Frame,

    /// The shape that was hit.
    pub shape: ShapeId,

    /// Time of the ray that produced the hit.
    pub time: Float,
}

impl Intersection {
    /// Convert a world direction into the local shading frame.
    ///
    /// * `v` - World-space direction.
    #[inline(always)]
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        self.sh_frame.to_local(v)
    }

    /// Convert a local shading direction into world space.
    ///
    /// * `v` - Local direction.
    #[inline(always)]
    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.sh_frame.to_world(v)
    }

    /// Geometric normal.
    pub fn n(&self) -> Normal3f {
        self.geo_frame.n
    }

    /// Spawn a ray leaving the surface in direction `d`.
    ///
    /// * `d`      - Direction.
    /// * `medium` - Medium the ray travels through.
    pub fn spawn_ray(&self, d: &Vector3f, medium: Option<MediumId>) -> Ray {
        let mut ray = Ray::new(self.p, *d).with_medium(medium);
        ray.time = self.time;
        ray
    }

    /// Spawn a segment from the surface towards `p` that stops just short
    /// of it.
    ///
    /// * `p`      - Target point.
    /// * `medium` - Medium the ray travels through.
    pub fn spawn_ray_to(&self, p: &Point3f, medium: Option<MediumId>) -> Ray {
        spawn_segment(&self.p, p, self.time, medium)
    }

    /// Select the medium on the side of the surface that `w` points to.
    ///
    /// * `w`         - World-space direction leaving the surface.
    /// * `interface` - The shape's medium interface.
    pub fn medium_towards(&self, w: &Vector3f, interface: &MediumInterface) -> Option<MediumId> {
        if w.dot(&self.geo_frame.n) > 0.0 {
            interface.outside
        } else {
            interface.inside
        }
    }
}

/// A scattering event inside a participating medium.
#[derive(Copy, Clone, Debug)]
pub struct MediumInteraction {
    /// Scattering point.
    pub p: Point3f,

    /// Direction towards the previous path vertex.
    pub wo: Vector3f,

    /// Time of the ray that produced the event.
    pub time: Float,

    /// Medium containing the point.
    pub medium: Option<MediumId>,

    /// Phase function at the point.
    pub phase: PhaseFunction,
}

impl MediumInteraction {
    /// Spawn a ray leaving the scattering point in direction `d`.
    ///
    /// * `d` - Direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let mut ray = Ray::segment(self.p, *d, 0.0, INFINITY).with_medium(self.medium);
        ray.time = self.time;
        ray
    }

    /// Spawn a segment towards `p` that stops just short of it.
    ///
    /// * `p` - Target point.
    pub fn spawn_ray_to(&self, p: &Point3f) -> Ray {
        let mut ray = spawn_segment(&self.p, p, self.time, self.medium);
        ray.t_min = 0.0;
        ray
    }
}

/// Build a shadow segment from `from` to `to`. The direction is left
/// unnormalized so that `t` runs from 0 to 1 and the far end is pulled in by
/// `SHADOW_EPSILON`.
///
/// * `from`   - Origin.
/// * `to`     - Target.
/// * `time`   - Ray time.
/// * `medium` - Medium the ray travels through.
pub fn spawn_segment(from: &Point3f, to: &Point3f, time: Float, medium: Option<MediumId>) -> Ray {
    let d = *to - *from;
    let len = d.length();
    let t_min = if len > 0.0 { RAY_EPSILON / len } else { 0.0 };
    let mut ray = Ray::segment(*from, d, t_min, 1.0 - SHADOW_EPSILON).with_medium(medium);
    ray.time = time;
    ray
}
