//! Diffuse (Lambertian) BSDF

use super::*;

/// Two-sided Lambertian reflector that scatters incident illumination
/// equally in all directions of the hemisphere containing `wo`.
#[derive(Clone, Debug)]
pub struct DiffuseBSDF {
    /// Fraction of incident light that is scattered.
    pub albedo: Spectrum,
}

impl DiffuseBSDF {
    /// Create a new instance of `DiffuseBSDF`.
    ///
    /// * `albedo` - Fraction of incident light that is scattered.
    pub fn new(albedo: Spectrum) -> Self {
        Self { albedo }
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if same_hemisphere(wo, wi) {
            self.albedo * INV_PI
        } else {
            Spectrum::ZERO
        }
    }

    /// Returns the cosine-weighted sampling density.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if same_hemisphere(wo, wi) {
            cosine_hemisphere_pdf(abs_cos_theta(wi))
        } else {
            0.0
        }
    }

    /// Samples an incident direction with cosine-weighted importance. The
    /// weight `eval * |cos θi| / pdf` reduces to the albedo.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample(&self, wo: &Vector3f, u: &Point2f) -> Option<(Spectrum, BSDFSample)> {
        if cos_theta(wo) == 0.0 {
            return None;
        }
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        let pdf = self.pdf(wo, &wi);
        if pdf == 0.0 {
            return None;
        }
        Some((self.albedo, BSDFSample::solid_angle(wi, pdf, BSDFType::DIFFUSE)))
    }
}
