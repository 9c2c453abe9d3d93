//! Path Integrator

use tessera_core::geometry::*;
use tessera_core::integrator::*;
use tessera_core::paramset::*;
use tessera_core::sampler::*;
use tessera_core::scene::*;
use tessera_core::spectrum::*;

/// Implements a path tracer that extends paths by sampling the BSDF only.
/// Emitted light is picked up whenever a path happens to hit an emitter,
/// so point and directional lights are never seen.
pub struct PathIntegrator {
    /// Maximum number of bounces.
    max_depth: usize,

    /// Number of bounces before Russian roulette starts.
    rr_depth: usize,
}

impl PathIntegrator {
    /// Create a new `PathIntegrator`.
    ///
    /// * `max_depth` - Maximum number of bounces.
    /// * `rr_depth`  - Number of bounces before Russian roulette starts.
    pub fn new(max_depth: usize, rr_depth: usize) -> Self {
        Self { max_depth, rr_depth }
    }
}

impl Integrator for PathIntegrator {
    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `ray`     - The ray.
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        let mut l = Spectrum::ZERO;
        let mut throughput = Spectrum::ONE;
        let mut ray = *ray;
        let mut depth = 0_usize;

        loop {
            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => {
                    l += throughput * scene.eval_env_light(&ray);
                    break;
                }
            };

            let wo = -ray.d;
            l += throughput * scene.le(&its, &wo);

            if depth >= self.max_depth {
                break;
            }

            let bsdf = match scene.shape_bsdf(its.shape) {
                Some(bsdf) => bsdf,
                None => break,
            };
            let scatter = Scatter::surface(&its, bsdf, &wo);
            let ss = match scatter.sample(&sampler.get_2d()) {
                Some(ss) => ss,
                None => break,
            };
            throughput *= ss.weight;
            ray = scatter.spawn_ray(scene, &ss.wi);

            depth += 1;
            if !russian_roulette(depth, self.rr_depth, &mut throughput, sampler) {
                break;
            }
        }

        l
    }

    fn name(&self) -> &'static str {
        "path"
    }
}

impl From<&ParamSet> for PathIntegrator {
    /// Create a `PathIntegrator` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let max_depth = params.find_one_count("maxdepth", DEFAULT_MAX_DEPTH);
        let rr_depth = params.find_one_count("rrdepth", DEFAULT_RR_DEPTH);
        Self::new(max_depth, rr_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scenes::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn point_lights_are_invisible() {
        let (scene, ray, _) = point_lit_sphere(0.8, 100.0);
        let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        assert!(integrator.li(&scene, &mut sampler(0), &ray).is_black());
    }

    #[test]
    fn emitter_seen_directly() {
        let (scene, ray, radiance) = area_lit_sphere(2.0);
        let integrator = PathIntegrator::new(0, DEFAULT_RR_DEPTH);
        assert_eq!(integrator.li(&scene, &mut sampler(0), &ray), Spectrum::new(radiance));
    }

    proptest! {
        #[test]
        fn convex_furnace_is_exact(albedo in 0.0..1.0_f32, seed in 0..1000_u64) {
            // Every bounce off a convex object escapes to the environment,
            // so each path carries exactly the albedo.
            let (scene, ray) = furnace(albedo);
            let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
            let l = integrator.li(&scene, &mut sampler(seed), &ray);
            prop_assert!(approx_eq!(f32, l[1], albedo, epsilon = 1e-4));
        }
    }
}
