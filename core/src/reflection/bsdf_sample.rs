//! BSDF Sample

use super::bsdf_type::*;
use crate::base::*;
use crate::geometry::*;

/// The outcome of sampling a BSDF. Lives for a single estimator step.
#[derive(Copy, Clone, Debug)]
pub struct BSDFSample {
    /// Sampled incident direction in the local shading frame.
    pub wi: Vector3f,

    /// Density of `wi` in `measure`.
    pub pdf: Float,

    /// Relative index of refraction along the sampled path (1 for reflection).
    pub eta: Float,

    /// Measure of `pdf`.
    pub measure: Measure,

    /// The lobe that produced the sample.
    pub sampled_type: BSDFType,
}

impl BSDFSample {
    /// Create a sample from a lobe with a finite density.
    ///
    /// * `wi`           - Incident direction.
    /// * `pdf`          - Solid angle density.
    /// * `sampled_type` - The sampled lobe.
    pub fn solid_angle(wi: Vector3f, pdf: Float, sampled_type: BSDFType) -> Self {
        Self {
            wi,
            pdf,
            eta: 1.0,
            measure: Measure::SolidAngle,
            sampled_type,
        }
    }

    /// Create a sample from a delta lobe.
    ///
    /// * `wi`           - Incident direction.
    /// * `pdf`          - Discrete probability of picking the lobe.
    /// * `eta`          - Relative index of refraction.
    /// * `sampled_type` - The sampled lobe.
    pub fn discrete(wi: Vector3f, pdf: Float, eta: Float, sampled_type: BSDFType) -> Self {
        Self {
            wi,
            pdf,
            eta,
            measure: Measure::Discrete,
            sampled_type,
        }
    }

    /// Returns true if the sample came from a delta lobe.
    pub fn is_delta(&self) -> bool {
        self.measure == Measure::Discrete
    }
}
