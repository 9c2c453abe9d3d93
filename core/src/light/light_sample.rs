//! Light Sample

use crate::base::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::reflection::Measure;
use crate::scene::{LightId, MediumId};

/// The outcome of sampling a light from a reference point. Lives for a
/// single estimator step.
#[derive(Copy, Clone, Debug)]
pub struct LightSample {
    /// Sampled point on the light. For lights at infinity this is unused.
    pub p: Point3f,

    /// Surface normal at `p`.
    pub n: Normal3f,

    /// Unit direction from the reference point towards the light.
    pub wi: Vector3f,

    /// Distance to `p`; `INFINITY` for lights at infinity.
    pub dist: Float,

    /// Density of `wi`. Solid angle for area and environment lights, the
    /// discrete probability 1 for delta lights. After `Scene::sample_light`
    /// it includes the light selection probability.
    pub pdf: Float,

    /// Measure of `pdf`.
    pub measure: Measure,

    /// The light that produced the sample.
    pub light: Option<LightId>,
}

impl Default for LightSample {
    fn default() -> Self {
        Self {
            p: Point3f::ZERO,
            n: Normal3f::ZERO,
            wi: Vector3f::ZERO,
            dist: 0.0,
            pdf: 0.0,
            measure: Measure::SolidAngle,
            light: None,
        }
    }
}

impl LightSample {
    /// Returns true if the sample came from a delta light.
    pub fn is_delta(&self) -> bool {
        self.measure == Measure::Discrete
    }

    /// Returns the shadow ray from `ref_p` to the sampled point.
    ///
    /// * `ref_p`  - Reference point.
    /// * `time`   - Ray time.
    /// * `medium` - Medium at the reference point in the direction `wi`.
    pub fn shadow_ray(&self, ref_p: &Point3f, time: Float, medium: Option<MediumId>) -> Ray {
        if self.dist.is_finite() {
            spawn_segment(ref_p, &self.p, time, medium)
        } else {
            let mut ray = Ray::new(*ref_p, self.wi).with_medium(medium);
            ray.time = time;
            ray
        }
    }
}
