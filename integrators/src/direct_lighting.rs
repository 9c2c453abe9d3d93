//! Direct Lighting Integrator

use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::integrator::*;
use tessera_core::paramset::*;
use tessera_core::sampler::*;
use tessera_core::scene::*;
use tessera_core::spectrum::*;
use std::fmt;

/// Direct light sampling strategy.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DirectLightStrategy {
    /// Sample the lights only.
    Emitter,

    /// Sample the BSDF only and look for emitters along the sampled
    /// direction.
    Material,

    /// Take one sample of each kind and combine them with the power
    /// heuristic.
    Mis,
}

impl From<&str> for DirectLightStrategy {
    /// Parse a strategy name. Unknown names fall back to `Mis`.
    ///
    /// * `s` - Strategy name.
    fn from(s: &str) -> Self {
        match s {
            "emitter" | "light" => Self::Emitter,
            "material" | "bsdf" => Self::Material,
            "mis" => Self::Mis,
            _ => {
                warn!("Direct lighting strategy '{s}' unknown. Using 'mis'.");
                Self::Mis
            }
        }
    }
}

impl fmt::Display for DirectLightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emitter => write!(f, "emitter"),
            Self::Material => write!(f, "material"),
            Self::Mis => write!(f, "mis"),
        }
    }
}

/// Implements the direct lighting integrator. Only light that reaches the
/// first visible surface straight from an emitter is accounted for.
pub struct DirectLightingIntegrator {
    /// Direct light sampling strategy.
    strategy: DirectLightStrategy,

    /// Number of estimates averaged per camera ray.
    samples: usize,
}

impl DirectLightingIntegrator {
    /// Create a new `DirectLightingIntegrator`.
    ///
    /// * `strategy` - Light sampling strategy.
    /// * `samples`  - Number of estimates averaged per camera ray.
    pub fn new(strategy: DirectLightStrategy, samples: usize) -> Self {
        Self {
            strategy,
            samples: samples.max(1),
        }
    }

    /// Returns the sampling strategy.
    pub fn strategy(&self) -> DirectLightStrategy {
        self.strategy
    }
}

impl Integrator for DirectLightingIntegrator {
    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `ray`     - The ray.
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        let mut ray = *ray;
        let (its, bsdf) = match next_scattering_surface(scene, &mut ray) {
            Some(hit) => hit,
            None => return scene.eval_env_light(&ray),
        };

        // Emitted light is seen directly by the camera.
        let wo = -ray.d;
        let mut l = scene.le(&its, &wo);

        let scatter = Scatter::surface(&its, bsdf, &wo);
        let mut ld = Spectrum::ZERO;
        for _ in 0..self.samples {
            ld += match self.strategy {
                DirectLightStrategy::Emitter if scatter.is_delta() => Spectrum::ZERO,
                DirectLightStrategy::Emitter => sample_light_direct(scene, sampler, &scatter, false, false),
                DirectLightStrategy::Material => sample_bsdf_direct(scene, sampler, &scatter, false, false),
                DirectLightStrategy::Mis => uniform_sample_one_light(scene, sampler, &scatter, false),
            };
        }
        l += ld / self.samples as Float;

        l
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

impl From<&ParamSet> for DirectLightingIntegrator {
    /// Create a `DirectLightingIntegrator` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let strategy = params.find_one_string("strategy", String::from("mis"));
        let samples = params.find_one_count("samples", 1);
        Self::new(DirectLightStrategy::from(strategy.as_str()), samples)
    }
}
