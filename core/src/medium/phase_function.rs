//! Phase Function

use super::henyey_greenstein::*;
use crate::base::*;
use crate::geometry::*;
use crate::sampling::*;
use std::fmt;

/// The outcome of sampling a phase function. `pdf` equals the phase
/// function value for every supported variant.
#[derive(Copy, Clone, Debug)]
pub struct PhaseSample {
    /// Sampled incident direction.
    pub wi: Vector3f,

    /// Density (and value) of the sample.
    pub pdf: Float,
}

/// Models scattering properties in volumetric media. Directions follow the
/// convention that both `wo` and `wi` point away from the scattering point.
#[derive(Copy, Clone, Debug)]
pub enum PhaseFunction {
    Isotropic,
    HenyeyGreenstein { g: Float },
}

impl PhaseFunction {
    /// Returns the value of the phase function for the given pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Self::Isotropic => INV_FOUR_PI,
            Self::HenyeyGreenstein { g } => phase_hg(wo.dot(wi), *g),
        }
    }

    /// Returns the sampling density of `wi`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        self.p(wo, wi)
    }

    /// Sample an incident direction given the outgoing direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> PhaseSample {
        match self {
            Self::Isotropic => PhaseSample {
                wi: uniform_sample_sphere(u),
                pdf: INV_FOUR_PI,
            },
            Self::HenyeyGreenstein { g } => sample_hg(wo, *g, u),
        }
    }
}

impl fmt::Display for PhaseFunction {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isotropic => write!(f, "[PhaseFunction isotropic]"),
            Self::HenyeyGreenstein { g } => write!(f, "[PhaseFunction hg g={g}]"),
        }
    }
}
