//! Volumetric Path Integrator

use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::integrator::*;
use tessera_core::paramset::*;
use tessera_core::sampler::*;
use tessera_core::scene::*;
use tessera_core::spectrum::*;

/// Implements a path tracer that accounts for scattering and attenuation
/// from participating media. Media are delimited by passthrough surfaces
/// which are crossed without counting as a bounce.
pub struct VolPathIntegrator {
    /// Maximum number of bounces.
    max_depth: usize,

    /// Number of bounces before Russian roulette starts.
    rr_depth: usize,
}

impl VolPathIntegrator {
    /// Create a new `VolPathIntegrator`.
    ///
    /// * `max_depth` - Maximum number of bounces.
    /// * `rr_depth`  - Number of bounces before Russian roulette starts.
    pub fn new(max_depth: usize, rr_depth: usize) -> Self {
        Self { max_depth, rr_depth }
    }
}

impl Integrator for VolPathIntegrator {
    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `ray`     - The ray.
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        let mut l = Spectrum::ZERO;
        let mut throughput = Spectrum::ONE;
        let mut ray = *ray;

        let mut specular = true;
        let mut prev_pdf: Float = 0.0;
        let mut prev_p = ray.o;
        let mut depth = 0_usize;
        let mut crossings = 0_usize;

        loop {
            debug!("Volumetric path bounce {depth}, current L = {l}, throughput = {throughput}");

            let its = scene.ray_intersect(&ray);
            if let Some(its) = its.as_ref() {
                ray.t_max = its.t;
            }

            // Sample the participating medium, if any.
            let mut mi = None;
            if let Some(medium) = ray.medium {
                let (weight, sampled) = scene.medium(medium).sample(&ray, sampler);
                throughput *= weight;
                mi = sampled.map(|mut mi| {
                    mi.medium = Some(medium);
                    mi
                });
            }
            if throughput.is_black() {
                break;
            }

            if let Some(mi) = mi {
                // Handle scattering at a point in the medium.
                if depth >= self.max_depth {
                    break;
                }
                let scatter = Scatter::Medium { mi: &mi };
                l += throughput * sample_light_direct(scene, sampler, &scatter, true, true);

                let ss = match scatter.sample(&sampler.get_2d()) {
                    Some(ss) => ss,
                    None => break,
                };
                throughput *= ss.weight;
                specular = false;
                prev_pdf = ss.pdf;
                prev_p = mi.p;
                ray = scatter.spawn_ray(scene, &ss.wi);
            } else {
                // Handle scattering at a surface or escape.
                let its = match its {
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

                let bsdf = match scene.shape_bsdf(its.shape) {
                    Some(bsdf) => bsdf,
                    None => break,
                };
                if bsdf.is_passthrough() {
                    // Step into the medium on the other side.
                    crossings += 1;
                    if crossings > MAX_PASSTHROUGH_CROSSINGS {
                        warn!("Path crossed {crossings} passthrough surfaces. Terminating.");
                        break;
                    }
                    let medium = its.medium_towards(&ray.d, &scene.shape(its.shape).medium_interface);
                    ray = its.spawn_ray(&ray.d, medium);
                    continue;
                }

                if depth >= self.max_depth {
                    break;
                }
                let scatter = Scatter::surface(&its, bsdf, &wo);
                if !scatter.is_delta() {
                    l += throughput * sample_light_direct(scene, sampler, &scatter, true, true);
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
            }

            depth += 1;
            if !russian_roulette(depth, self.rr_depth, &mut throughput, sampler) {
                break;
            }
        }

        l
    }

    fn name(&self) -> &'static str {
        "volpath"
    }
}

impl From<&ParamSet> for VolPathIntegrator {
    /// Create a `VolPathIntegrator` from given parameter set.
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
    use tessera_core::medium::*;

    #[test]
    fn matches_path_mis_without_media() {
        let (scene, ray, expected) = point_lit_sphere(0.5, 40.0);
        let integrator = VolPathIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        let l = integrator.li(&scene, &mut sampler(5), &ray);
        assert!(approx_eq!(f32, l[2], expected, epsilon = 1e-4), "{l} vs {expected}");
    }

    #[test]
    fn absorbing_ball_follows_beer_lambert() {
        let (scene, ray) = absorbing_ball(0.5);
        let integrator = VolPathIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        let mean = mean_radiance(&integrator, &scene, &ray, 20_000, 17);
        let expected = (-1.0 as Float).exp();
        assert!(approx_eq!(f32, mean, expected, epsilon = 0.02), "{mean} vs {expected}");
    }

    #[test]
    fn scattering_ball_conserves_energy() {
        // A non-absorbing ball in a white furnace is invisible on average.
        let integrator = VolPathIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        for phase in [PhaseFunction::Isotropic, PhaseFunction::HenyeyGreenstein { g: 0.6 }] {
            let (scene, ray) = medium_ball(0.0, 2.0, phase);
            let mean = mean_radiance(&integrator, &scene, &ray, 20_000, 23);
            assert!(approx_eq!(f32, mean, 1.0, epsilon = 0.03), "{phase:?}: {mean}");
        }
    }

    #[test]
    fn occluded_point_light_contributes_nothing() {
        let integrator = VolPathIntegrator::new(DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH);
        let (scene, ray, _) = shadowed_sphere(0.8, 100.0, true);
        assert!(integrator.li(&scene, &mut sampler(3), &ray).is_black());
    }

    #[test]
    fn passthrough_boundaries_do_not_count_as_bounces() {
        // With no bounces allowed the environment is still reached through
        // the empty ball.
        let (scene, ray) = absorbing_ball(0.0);
        let integrator = VolPathIntegrator::new(0, DEFAULT_RR_DEPTH);
        let l = integrator.li(&scene, &mut sampler(0), &ray);
        assert!(approx_eq!(f32, l[0], 1.0, epsilon = 1e-5), "{l}");
    }
}
