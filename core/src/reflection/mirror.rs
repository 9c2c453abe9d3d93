//! Mirror BSDF

use super::*;

/// Perfectly smooth two-sided mirror.
#[derive(Clone, Debug)]
pub struct MirrorBSDF {
    /// Reflectance.
    pub reflectance: Spectrum,
}

impl MirrorBSDF {
    /// Create a new instance of `MirrorBSDF`.
    ///
    /// * `reflectance` - Reflectance.
    pub fn new(reflectance: Spectrum) -> Self {
        Self { reflectance }
    }

    /// Sample the mirror direction.
    ///
    /// * `wo` - Outgoing direction.
    pub fn sample(&self, wo: &Vector3f) -> Option<(Spectrum, BSDFSample)> {
        if cos_theta(wo) == 0.0 {
            return None;
        }
        let wi = reflect(wo);
        Some((
            self.reflectance,
            BSDFSample::discrete(wi, 1.0, 1.0, BSDFType::DELTA),
        ))
    }
}
