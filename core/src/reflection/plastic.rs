//! Smooth Plastic BSDF

use super::*;

/// A diffuse base under a smooth dielectric coating. The coating is a delta
/// lobe; the base is Lambertian, attenuated by transmission through the
/// coating in both directions. Two-sided.
#[derive(Clone, Debug)]
pub struct PlasticBSDF {
    /// Albedo of the diffuse base.
    pub diffuse: Spectrum,

    /// Tint of the specular coating.
    pub specular: Spectrum,

    /// Relative index of refraction of the coating.
    pub eta: Float,
}

impl PlasticBSDF {
    /// Create a new instance of `PlasticBSDF`.
    ///
    /// * `diffuse`  - Albedo of the diffuse base.
    /// * `specular` - Tint of the specular coating.
    /// * `eta`      - Relative index of refraction of the coating.
    pub fn new(diffuse: Spectrum, specular: Spectrum, eta: Float) -> Self {
        Self {
            diffuse,
            specular,
            eta,
        }
    }

    /// Returns the probability of sampling the specular coating.
    ///
    /// * `f_o` - Fresnel reflectance for the outgoing direction.
    fn specular_probability(&self, f_o: Float) -> Float {
        let s = f_o * self.specular.average();
        let d = (1.0 - f_o) * self.diffuse.average();
        if s + d > 0.0 {
            s / (s + d)
        } else {
            0.0
        }
    }

    /// Returns the value of the diffuse base for the given pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if !same_hemisphere(wo, wi) {
            return Spectrum::ZERO;
        }
        let f_o = fr_dielectric(abs_cos_theta(wo), 1.0, self.eta);
        let f_i = fr_dielectric(abs_cos_theta(wi), 1.0, self.eta);
        self.diffuse * (INV_PI * (1.0 - f_o) * (1.0 - f_i))
    }

    /// Returns the solid angle density of the diffuse base.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        let f_o = fr_dielectric(abs_cos_theta(wo), 1.0, self.eta);
        (1.0 - self.specular_probability(f_o)) * cosine_hemisphere_pdf(abs_cos_theta(wi))
    }

    /// Sample either the coating or the base.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample(&self, wo: &Vector3f, u: &Point2f) -> Option<(Spectrum, BSDFSample)> {
        if cos_theta(wo) == 0.0 {
            return None;
        }
        let f_o = fr_dielectric(abs_cos_theta(wo), 1.0, self.eta);
        let p_spec = self.specular_probability(f_o);

        if u.x < p_spec {
            let wi = reflect(wo);
            let weight = self.specular * (f_o / p_spec);
            return Some((weight, BSDFSample::discrete(wi, p_spec, 1.0, BSDFType::DELTA)));
        }

        let remapped = Point2f::new(
            min((u.x - p_spec) / (1.0 - p_spec), crate::rng::ONE_MINUS_EPSILON),
            u.y,
        );
        let mut wi = cosine_sample_hemisphere(&remapped);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        let pdf = self.pdf(wo, &wi);
        if pdf == 0.0 {
            return None;
        }
        let weight = self.eval(wo, &wi) * abs_cos_theta(&wi) / pdf;
        Some((weight, BSDFSample::solid_angle(wi, pdf, BSDFType::DIFFUSE)))
    }
}
