//! Path Integrator with Multiple Importance Sampling

use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::integrator::*;
use tessera_core::paramset::*;
use tessera_core::sampler::*;
use tessera_core::scene::*;
use tessera_core::spectrum::*;

/// Implements a path tracer that samples a light and the BSDF at every
/// vertex and combines both with the power heuristic. The BSDF half of the
/// estimate is accounted for when the next vertex turns out to be an emitter
/// or the path escapes to the environment.
pub struct PathMisIntegrator {
    /// Maximum number of bounces.
    max_depth: usize,

    /// Number of bounces before Russian roulette starts.
    rr_depth: usize,
}

impl PathMisIntegrator {
    /// Create a new `PathMisIntegrator`.
    ///
    /// * `max_depth` - Maximum number of bounces.
    /// * `rr_depth`  - Number of bounces before Russian roulette starts.
    pub fn new(max_depth: usize, rr_depth: usize) -> Self {
        Self { max_depth, rr_depth }
    }
}

impl Integrator for PathMisIntegrator {
    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `ray`     - The ray.
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        let mut l = Spectrum::ZERO;
        let mut throughput = Spectrum::ONE;
        let mut ray = *ray;

        // Camera rays count as specular: emitters they hit are not weighted.
        let mut specular = true;
        let mut prev_pdf: Float = 0.0;
        let mut prev_p = ray.o;
        let mut depth = 0_usize;

        loop {
            debug!("Path MIS bounce {depth}, current L = {l}, throughput = {throughput}");

            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => {
                    let le = scene.eval_env_light(&ray);
                    if !le.is_black() {
                        let weight = if specular {
                            1.0
                        } else {
                            mis_weight(prev_pdf, scene.pdf_env_light(&prev_p, &ray.d))
                        };
                        l += throughput * le * weight;
                    }
                    break;
                }
            };

            let wo = -ray.d;
            let le = scene.le(&its, &wo);
            if !le.is_black() {
                let weight = if specular {
                    1.0
                } else {
                    mis_weight(prev_pdf, light_pdf_at(scene, &prev_p, &its, &ray.d))
                };
                l += throughput * le * weight;
            }

            if depth >= self.max_depth {
                break;
            }

            let bsdf = match scene.shape_bsdf(its.shape) {
                Some(bsdf) => bsdf,
                None => break,
            };
            let scatter = Scatter::surface(&its, bsdf, &wo);

            // Light sampling is pointless for delta lobes.
            if !scatter.is_delta() {
                l += throughput * sample_light_direct(scene, sampler, &scatter, false, true);
            }

            let ss = match scatter.sample(&sampler.get_2d()) {
                Some(ss) => ss,
                None => break,
            };
            throughput *= ss.weight;
            specular = ss.is_delta;
            prev_pdf = ss.pdf;
            prev_p = its.p;
            ray = scatter.spawn_ray(scene, &ss.wi);

            depth += 1;
            if !russian_roulette(depth, self.rr_depth, &mut throughput, sampler) {
                break;
            }
        }

        l
    }

    fn name(&self) -> &'static str {
        "path_mis"
    }
}

impl From<&ParamSet> for PathMisIntegrator {
    /// Create a `PathMisIntegrator` from given parameter set.
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

    #[test]
    fn point_lit_sphere_is_exact() {
        let (scene, ray, expected) = point_lit_sphere(0.8, 100.0);
        let integrator = PathMisIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        let mut sampler = sampler(3);
        for _ in 0..16 {
            let l = integrator.li(&scene, &mut sampler, &ray);
            assert!(approx_eq!(f32, l[0], expected, epsilon = 1e-4), "{l} vs {expected}");
        }
    }

    #[test]
    fn shadowed_point_light_is_rejected() {
        // The blocker is black and the sphere convex, so no path reaches the
        // shaded point once the light is hidden.
        let integrator = PathMisIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        let mut sampler = sampler(8);
        let (open, ray, expected) = shadowed_sphere(0.8, 100.0, false);
        let l = integrator.li(&open, &mut sampler, &ray);
        assert!(approx_eq!(f32, l[0], expected, epsilon = 1e-4), "{l} vs {expected}");

        let (blocked, ray, _) = shadowed_sphere(0.8, 100.0, true);
        for _ in 0..16 {
            assert!(integrator.li(&blocked, &mut sampler, &ray).is_black());
        }
    }

    #[test]
    fn furnace_converges_to_albedo() {
        let (scene, ray) = furnace(0.6);
        let integrator = PathMisIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        let mean = mean_radiance(&integrator, &scene, &ray, 4096, 11);
        assert!(approx_eq!(f32, mean, 0.6, epsilon = 0.03), "{mean}");
    }

    #[test]
    fn zero_depth_sees_only_emission() {
        let (scene, ray, radiance) = area_lit_sphere(3.0);
        let integrator = PathMisIntegrator::new(0, DEFAULT_RR_DEPTH);
        assert_eq!(integrator.li(&scene, &mut sampler(0), &ray), Spectrum::new(radiance));

        let (scene, ray, _) = point_lit_sphere(0.8, 100.0);
        assert!(integrator.li(&scene, &mut sampler(0), &ray).is_black());
    }

    #[test]
    fn from_params() {
        let params = ParamSet::new().with_int("maxdepth", 3).with_int("rrdepth", 1);
        let integrator = PathMisIntegrator::from(&params);
        assert_eq!(integrator.max_depth, 3);
        assert_eq!(integrator.rr_depth, 1);
        assert_eq!(integrator.name(), "path_mis");
    }
}
