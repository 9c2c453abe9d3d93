//! Rough Conductor BSDF

use super::*;
use crate::microfacet::*;

/// Glossy metal modelled with a GGX microfacet distribution and Schlick's
/// Fresnel approximation. Two-sided.
#[derive(Clone, Debug)]
pub struct RoughConductorBSDF {
    /// Reflectance at normal incidence.
    pub reflectance: Spectrum,

    /// Microfacet distribution.
    pub distribution: TrowbridgeReitzDistribution,
}

/// Flip a pair of local directions so `wo` lies in the upper hemisphere.
#[inline(always)]
fn to_upper(wo: &Vector3f, wi: &Vector3f) -> (Vector3f, Vector3f) {
    if wo.z < 0.0 {
        (
            Vector3f::new(wo.x, wo.y, -wo.z),
            Vector3f::new(wi.x, wi.y, -wi.z),
        )
    } else {
        (*wo, *wi)
    }
}

impl RoughConductorBSDF {
    /// Create a new instance of `RoughConductorBSDF`.
    ///
    /// * `reflectance` - Reflectance at normal incidence.
    /// * `alpha`       - Microfacet roughness α.
    pub fn new(reflectance: Spectrum, alpha: Float) -> Self {
        Self {
            reflectance,
            distribution: TrowbridgeReitzDistribution::new(alpha),
        }
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let (wo, wi) = to_upper(wo, wi);
        let cos_o = cos_theta(&wo);
        let cos_i = cos_theta(&wi);
        if cos_o <= 0.0 || cos_i <= 0.0 {
            return Spectrum::ZERO;
        }
        let wh = wi + wo;
        if wh.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        let wh = wh.normalize();
        let f = fr_schlick(self.reflectance, wi.dot(&wh));
        f * (self.distribution.d(&wh) * self.distribution.g(&wo, &wi) / (4.0 * cos_o * cos_i))
    }

    /// Returns the density of sampling `wi` through a microfacet normal.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        let (wo, wi) = to_upper(wo, wi);
        if cos_theta(&wo) <= 0.0 || cos_theta(&wi) <= 0.0 {
            return 0.0;
        }
        let wh = (wo + wi).normalize();
        let wo_dot_wh = wo.dot(&wh);
        if wo_dot_wh <= 0.0 {
            return 0.0;
        }
        self.distribution.pdf(&wh) / (4.0 * wo_dot_wh)
    }

    /// Sample a microfacet normal and reflect `wo` about it.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample(&self, wo: &Vector3f, u: &Point2f) -> Option<(Spectrum, BSDFSample)> {
        if cos_theta(wo) == 0.0 {
            return None;
        }
        let wh = self.distribution.sample_wh(wo, u);
        if wo.dot(&wh) <= 0.0 {
            return None;
        }
        let wi = reflect_about(wo, &wh);
        if !same_hemisphere(wo, &wi) {
            return None;
        }

        let pdf = self.pdf(wo, &wi);
        if pdf == 0.0 {
            return None;
        }
        let weight = self.eval(wo, &wi) * abs_cos_theta(&wi) / pdf;
        Some((weight, BSDFSample::solid_angle(wi, pdf, BSDFType::GLOSSY)))
    }
}
