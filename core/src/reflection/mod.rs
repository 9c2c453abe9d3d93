//! Reflection Models

use crate::base::*;
use crate::geometry::*;
use crate::sampling::*;
use crate::spectrum::*;

mod bsdf_sample;
mod bsdf_type;
mod dielectric;
mod diffuse;
mod fresnel;
mod mirror;
mod plastic;
mod rough_conductor;

// Re-export
pub use bsdf_sample::*;
pub use bsdf_type::*;
pub use dielectric::*;
pub use diffuse::*;
pub use fresnel::*;
pub use mirror::*;
pub use plastic::*;
pub use rough_conductor::*;

/// Scattering models. All directions are expressed in the local shading
/// frame where the normal is +z and both `wo` and `wi` point away from the
/// surface.
#[derive(Clone, Debug)]
pub enum BSDF {
    /// Lambertian reflection.
    Diffuse(DiffuseBSDF),

    /// Perfect specular reflection.
    Mirror(MirrorBSDF),

    /// Smooth glass.
    Dielectric(DielectricBSDF),

    /// GGX microfacet metal.
    RoughConductor(RoughConductorBSDF),

    /// Diffuse base with a smooth coating.
    Plastic(PlasticBSDF),

    /// Index-matched boundary used to delimit participating media. Light
    /// passes through unchanged.
    Null,
}

impl BSDF {
    /// Returns the lobes this BSDF is made of.
    pub fn bsdf_type(&self) -> BSDFType {
        match self {
            Self::Diffuse(_) => BSDFType::DIFFUSE,
            Self::Mirror(_) => BSDFType::DELTA,
            Self::Dielectric(_) => BSDFType::DELTA,
            Self::RoughConductor(_) => BSDFType::GLOSSY,
            Self::Plastic(_) => BSDFType::DELTA | BSDFType::DIFFUSE,
            Self::Null => BSDFType::PASSTHROUGH,
        }
    }

    /// Returns true if the BSDF has no lobe with a finite density, so
    /// evaluating it for an arbitrary pair of directions always gives zero.
    pub fn is_delta(&self) -> bool {
        !self.bsdf_type().has_smooth_component()
    }

    /// Returns true for index-matched boundaries.
    pub fn is_passthrough(&self) -> bool {
        self.bsdf_type().contains(BSDFType::PASSTHROUGH)
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions, excluding the cosine foreshortening term. Delta lobes
    /// contribute nothing.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            Self::Diffuse(b) => b.eval(wo, wi),
            Self::RoughConductor(b) => b.eval(wo, wi),
            Self::Plastic(b) => b.eval(wo, wi),
            Self::Mirror(_) | Self::Dielectric(_) | Self::Null => Spectrum::ZERO,
        }
    }

    /// Returns the solid angle density with which `sample` generates `wi`,
    /// ignoring delta lobes.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Self::Diffuse(b) => b.pdf(wo, wi),
            Self::RoughConductor(b) => b.pdf(wo, wi),
            Self::Plastic(b) => b.pdf(wo, wi),
            Self::Mirror(_) | Self::Dielectric(_) | Self::Null => 0.0,
        }
    }

    /// Sample an incident direction. Returns the weight
    /// `eval * |cos θi| / pdf` (or its delta analog) and the sample record.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample(&self, wo: &Vector3f, u: &Point2f) -> Option<(Spectrum, BSDFSample)> {
        match self {
            Self::Diffuse(b) => b.sample(wo, u),
            Self::Mirror(b) => b.sample(wo),
            Self::Dielectric(b) => b.sample(wo, u),
            Self::RoughConductor(b) => b.sample(wo, u),
            Self::Plastic(b) => b.sample(wo, u),
            Self::Null => Some((
                Spectrum::ONE,
                BSDFSample::discrete(-*wo, 1.0, 1.0, BSDFType::PASSTHROUGH),
            )),
        }
    }
}

impl Default for BSDF {
    /// Returns a diffuse BSDF with 50% albedo.
    fn default() -> Self {
        Self::Diffuse(DiffuseBSDF::new(Spectrum::new(0.5)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn all_bsdfs() -> Vec<BSDF> {
        vec![
            BSDF::Diffuse(DiffuseBSDF::new(Spectrum::rgb(0.8, 0.5, 0.2))),
            BSDF::Mirror(MirrorBSDF::new(Spectrum::new(0.9))),
            BSDF::Dielectric(DielectricBSDF::new(1.5, 1.0)),
            BSDF::RoughConductor(RoughConductorBSDF::new(Spectrum::rgb(0.9, 0.6, 0.3), 0.3)),
            BSDF::Plastic(PlasticBSDF::new(Spectrum::new(0.5), Spectrum::ONE, 1.5)),
            BSDF::Null,
        ]
    }

    fn direction(u: Point2f) -> Vector3f {
        uniform_sample_sphere(&u)
    }

    #[test]
    fn lambertian_weight_is_albedo() {
        let albedo = Spectrum::rgb(0.8, 0.5, 0.2);
        let bsdf = BSDF::Diffuse(DiffuseBSDF::new(albedo));
        let wo = Vector3f::new(0.3, -0.2, 0.9).normalize();
        let (weight, s) = bsdf.sample(&wo, &Point2f::new(0.37, 0.81)).unwrap();
        assert_eq!(weight, albedo);

        let ratio = bsdf.eval(&wo, &s.wi) * abs_cos_theta(&s.wi) / bsdf.pdf(&wo, &s.wi);
        for c in 0..3 {
            assert!(approx_eq!(f32, ratio[c], albedo[c], epsilon = 1e-5));
        }
    }

    #[test]
    fn delta_bsdfs_have_zero_pdf() {
        let wo = Vector3f::new(0.1, 0.2, 0.8).normalize();
        for bsdf in [
            BSDF::Mirror(MirrorBSDF::new(Spectrum::ONE)),
            BSDF::Dielectric(DielectricBSDF::new(1.5, 1.0)),
            BSDF::Null,
        ] {
            assert!(bsdf.is_delta());
            let (_, s) = bsdf.sample(&wo, &Point2f::new(0.5, 0.5)).unwrap();
            assert_eq!(s.measure, Measure::Discrete);
            assert_eq!(bsdf.pdf(&wo, &s.wi), 0.0);
            assert!(bsdf.eval(&wo, &s.wi).is_black());
        }
    }

    #[test]
    fn null_bsdf_passes_through() {
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let (weight, s) = BSDF::Null.sample(&wo, &Point2f::new(0.1, 0.9)).unwrap();
        assert_eq!(weight, Spectrum::ONE);
        assert_eq!(s.wi, -wo);
        assert!(BSDF::Null.is_passthrough());
    }

    #[test]
    fn mirror_reflects() {
        let bsdf = BSDF::Mirror(MirrorBSDF::new(Spectrum::ONE));
        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let (_, s) = bsdf.sample(&wo, &Point2f::new(0.0, 0.0)).unwrap();
        assert!(approx_eq!(f32, s.wi.x, -0.6, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.wi.z, 0.8, epsilon = 1e-6));
    }

    #[test]
    fn dielectric_refracts_at_normal_incidence() {
        let bsdf = BSDF::Dielectric(DielectricBSDF::new(1.5, 1.0));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        // Fresnel reflectance at normal incidence is 0.04.
        let (weight, s) = bsdf.sample(&wo, &Point2f::new(0.5, 0.5)).unwrap();
        assert!(approx_eq!(f32, s.wi.z, -1.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, weight[0], 1.0 / 2.25, epsilon = 1e-5));
        let (_, s) = bsdf.sample(&wo, &Point2f::new(0.01, 0.5)).unwrap();
        assert!(approx_eq!(f32, s.wi.z, 1.0, epsilon = 1e-5));
    }

    #[test]
    fn rough_conductor_white_furnace_bounded() {
        let bsdf = BSDF::RoughConductor(RoughConductorBSDF::new(Spectrum::ONE, 0.2));
        let wo = Vector3f::new(0.4, 0.1, 0.9).normalize();
        let mut rng = crate::rng::RNG::default();
        let n = 20000;
        let mut sum = 0.0;
        for _ in 0..n {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            if let Some((w, _)) = bsdf.sample(&wo, &u) {
                sum += w[0];
            }
        }
        let albedo = sum / n as Float;
        assert!(albedo > 0.8 && albedo <= 1.01, "albedo = {}", albedo);
    }

    proptest! {
        #[test]
        fn sampled_directions_are_consistent(
            ox in 0.0f32..1.0, oy in 0.0f32..1.0,
            ux in 0.0f32..1.0, uy in 0.0f32..1.0,
        ) {
            let wo = direction(Point2f::new(ox, oy));
            for bsdf in all_bsdfs() {
                if let Some((weight, s)) = bsdf.sample(&wo, &Point2f::new(ux, uy)) {
                    prop_assert!(weight.is_valid());
                    if s.measure == Measure::SolidAngle {
                        let pdf = bsdf.pdf(&wo, &s.wi);
                        prop_assert!(pdf > 0.0);
                        prop_assert!(approx_eq!(f32, pdf, s.pdf, epsilon = 1e-3 * pdf.max(1.0)));
                    }
                }
            }
        }

        #[test]
        fn positive_pdf_implies_valid_eval(
            ox in 0.0f32..1.0, oy in 0.0f32..1.0,
            ix in 0.0f32..1.0, iy in 0.0f32..1.0,
        ) {
            let wo = direction(Point2f::new(ox, oy));
            let wi = direction(Point2f::new(ix, iy));
            for bsdf in all_bsdfs() {
                if bsdf.pdf(&wo, &wi) > 0.0 {
                    prop_assert!(bsdf.eval(&wo, &wi).is_valid());
                }
            }
        }
    }
}
