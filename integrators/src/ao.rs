//! Ambient Occlusion Integrator

use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::integrator::*;
use tessera_core::paramset::*;
use tessera_core::sampler::*;
use tessera_core::sampling::*;
use tessera_core::scene::*;
use tessera_core::spectrum::*;

/// Implements ambient occlusion: the fraction of cosine weighted directions
/// above the first visible surface that are not blocked within a given
/// distance.
pub struct AmbientOcclusionIntegrator {
    /// Number of occlusion rays per camera ray.
    samples: usize,

    /// Maximum distance at which geometry occludes.
    distance: Float,
}

impl AmbientOcclusionIntegrator {
    /// Create a new `AmbientOcclusionIntegrator`.
    ///
    /// * `samples`  - Number of occlusion rays per camera ray.
    /// * `distance` - Maximum distance at which geometry occludes.
    pub fn new(samples: usize, distance: Float) -> Self {
        Self {
            samples: samples.max(1),
            distance,
        }
    }
}

impl Integrator for AmbientOcclusionIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        let mut ray = *ray;
        let its = match next_scattering_surface(scene, &mut ray) {
            Some((its, _)) => its,
            None => return Spectrum::ZERO,
        };

        // Sample the hemisphere on the side the ray came from.
        let flip = if its.to_local(&-ray.d).z < 0.0 { -1.0 } else { 1.0 };

        let mut unoccluded = 0_usize;
        for _ in 0..self.samples {
            let mut w = cosine_sample_hemisphere(&sampler.get_2d());
            w.z *= flip;
            let mut ao_ray = its.spawn_ray(&its.to_world(&w), None);
            ao_ray.t_max = self.distance;
            if !scene.ray_intersect_p(&ao_ray) {
                unoccluded += 1;
            }
        }

        Spectrum::new(unoccluded as Float / self.samples as Float)
    }

    fn name(&self) -> &'static str {
        "ao"
    }
}

impl From<&ParamSet> for AmbientOcclusionIntegrator {
    /// Create a `AmbientOcclusionIntegrator` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let samples = params.find_one_count("nsamples", 16);
        let distance = params.find_one_positive_float("distance", INFINITY);
        Self::new(samples, distance)
    }
}
