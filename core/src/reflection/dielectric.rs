//! Smooth Dielectric BSDF

use super::*;

/// Smooth dielectric interface (glass, water) that reflects or refracts
/// according to the Fresnel equations.
#[derive(Clone, Debug)]
pub struct DielectricBSDF {
    /// Index of refraction of the interior.
    pub int_ior: Float,

    /// Index of refraction of the exterior.
    pub ext_ior: Float,
}

impl DielectricBSDF {
    /// Create a new instance of `DielectricBSDF`.
    ///
    /// * `int_ior` - Index of refraction of the interior.
    /// * `ext_ior` - Index of refraction of the exterior.
    pub fn new(int_ior: Float, ext_ior: Float) -> Self {
        Self { int_ior, ext_ior }
    }

    /// Choose reflection or refraction with probability given by the Fresnel
    /// reflectance; the selection cancels the Fresnel factor in the weight.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample(&self, wo: &Vector3f, u: &Point2f) -> Option<(Spectrum, BSDFSample)> {
        let cos_o = cos_theta(wo);
        if cos_o == 0.0 {
            return None;
        }

        let f = fr_dielectric(cos_o, self.ext_ior, self.int_ior);
        if u.x < f {
            let wi = reflect(wo);
            return Some((
                Spectrum::ONE,
                BSDFSample::discrete(wi, f, 1.0, BSDFType::DELTA),
            ));
        }

        // Figure out which η is incident and which is transmitted.
        let entering = cos_o > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.ext_ior, self.int_ior)
        } else {
            (self.int_ior, self.ext_ior)
        };
        let n = Normal3f::new(0.0, 0.0, 1.0).face_forward(wo);
        let wi = refract(wo, &n, eta_i / eta_t)?;

        // Radiance is scaled by the squared ratio of indices on refraction.
        let scale = (eta_i * eta_i) / (eta_t * eta_t);
        Some((
            Spectrum::new(scale),
            BSDFSample::discrete(wi, 1.0 - f, eta_t / eta_i, BSDFType::DELTA),
        ))
    }
}
