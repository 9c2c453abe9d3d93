//! Homogeneous Medium

use super::phase_function::*;
use crate::base::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::sampler::*;
use crate::spectrum::*;

/// Implements a homogeneous medium representing a region of space with constant
/// σa and σs values throughout its extent.
#[derive(Clone, Debug)]
pub struct HomogeneousMedium {
    /// Absorption coefficient σa.
    pub sigma_a: Spectrum,

    /// Scattering coefficient σs.
    pub sigma_s: Spectrum,

    /// Extinction σt = σs + σa.
    sigma_t: Spectrum,

    /// Phase function.
    pub phase: PhaseFunction,
}

impl HomogeneousMedium {
    /// Create a new `HomogeneousMedium `.
    ///
    /// * `sigma_a` - Absorption coefficient σa.
    /// * `sigma_s` - Scattering coefficient σs.
    /// * `phase`   - Phase function.
    pub fn new(sigma_a: Spectrum, sigma_s: Spectrum, phase: PhaseFunction) -> Self {
        Self {
            sigma_a,
            sigma_s,
            sigma_t: sigma_s + sigma_a,
            phase,
        }
    }

    /// Returns the extinction coefficient.
    pub fn sigma_t(&self) -> Spectrum {
        self.sigma_t
    }

    /// Returns the beam transmittance along a given ray.
    ///
    /// * `ray`      - The ray.
    /// * `_sampler` - The sampler.
    pub fn tr(&self, ray: &Ray, _sampler: &mut dyn Sampler) -> Spectrum {
        let dist = min(ray.t_max * ray.d.length(), Float::MAX);
        (-self.sigma_t * dist).map(|v| if v.is_nan() { 0.0 } else { v }).exp()
    }

    /// Samples a medium scattering interaction along a world-space ray by
    /// picking a colour channel uniformly and sampling a free-flight distance
    /// proportional to that channel's transmittance.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    pub fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>) {
        // Sample a channel and distance along the ray.
        let channel = min((sampler.get_1d() * RGB_SAMPLES as Float) as usize, RGB_SAMPLES - 1);
        let ray_len = ray.d.length();
        let dist = -(1.0 - sampler.get_1d()).ln() / self.sigma_t[channel];
        let t = min(dist / ray_len, ray.t_max);
        let sampled_medium = t < ray.t_max;

        let mi = sampled_medium.then(|| MediumInteraction {
            p: ray.at(t),
            wo: -ray.d.normalize(),
            time: ray.time,
            medium: None,
            phase: self.phase,
        });

        // Compute the transmittance and sampling density
        let tr = (-self.sigma_t * min(t * ray_len, Float::MAX))
            .map(|v| if v.is_nan() { 0.0 } else { v })
            .exp();
        let density = if sampled_medium { self.sigma_t * tr } else { tr };
        let pdf = density.average();
        if pdf == 0.0 {
            return (Spectrum::ZERO, mi);
        }

        // Return weighting factor for scattering from homogeneous medium
        let s = if sampled_medium {
            tr * self.sigma_s / pdf
        } else {
            tr / pdf
        };

        (s, mi)
    }
}
