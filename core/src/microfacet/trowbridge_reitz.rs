//! Trowbridge-Reitz (GGX) Microfacet Distribution

use crate::base::*;
use crate::geometry::*;

/// Isotropic Trowbridge-Reitz (GGX) distribution of microfacet normals.
#[derive(Copy, Clone, Debug)]
pub struct TrowbridgeReitzDistribution {
    /// Roughness α.
    pub alpha: Float,
}

impl TrowbridgeReitzDistribution {
    /// Create a new distribution, clamping α away from zero.
    ///
    /// * `alpha` - Roughness α.
    pub fn new(alpha: Float) -> Self {
        Self {
            alpha: alpha.max(1e-3),
        }
    }

    /// Maps a perceptual roughness in [0, 1] to α.
    ///
    /// * `roughness` - Perceptual roughness.
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        let r = clamp(roughness, 1e-3, 1.0);
        r * r
    }

    /// Return the differential area of microfacets oriented with the surface
    /// normal `wh`.
    ///
    /// * `wh` - A sample normal from the distrubition of normal vectors.
    pub fn d(&self, wh: &Vector3f) -> Float {
        let tan2 = tan2_theta(wh);
        if tan2.is_infinite() || tan2.is_nan() {
            return 0.0;
        }
        let cos4 = wh.z * wh.z * wh.z * wh.z;
        let a2 = self.alpha * self.alpha;
        let e = 1.0 + tan2 / a2;
        1.0 / (PI * a2 * cos4 * e * e)
    }

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - The direction from camera/viewer.
    pub fn lambda(&self, w: &Vector3f) -> Float {
        let tan2 = tan2_theta(w);
        if tan2.is_infinite() || tan2.is_nan() {
            return 0.0;
        }
        let a2_tan2 = self.alpha * self.alpha * tan2;
        (-1.0 + (1.0 + a2_tan2).sqrt()) / 2.0
    }

    /// Smith's masking-shadowing function for a pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Samples a microfacet normal proportional to `D(wh) |cos θh|`, in the
    /// hemisphere of `wo`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        let tan2 = self.alpha * self.alpha * u.x / (1.0 - u.x);
        let cos_theta = 1.0 / (1.0 + tan2).sqrt();
        let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);
        let phi = TWO_PI * u.y;
        let wh = Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
        if same_hemisphere(wo, &wh) {
            wh
        } else {
            -wh
        }
    }

    /// Returns the density of `sample_wh` generating `wh`.
    ///
    /// * `wh` - Microfacet normal.
    pub fn pdf(&self, wh: &Vector3f) -> Float {
        self.d(wh) * abs_cos_theta(wh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use crate::sampling::*;

    #[test]
    fn projected_area_integrates_to_one() {
        // ∫ D(wh) cos θh dωh = 1 over the hemisphere; estimate with uniform
        // sphere sampling restricted to the upper half.
        let dist = TrowbridgeReitzDistribution::new(0.5);
        let mut rng = RNG::new(11);
        let n = 200_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let w = uniform_sample_sphere(&Point2f::new(rng.uniform_float(), rng.uniform_float()));
            if w.z > 0.0 {
                sum += (dist.d(&w) * w.z / uniform_sphere_pdf()) as f64;
            }
        }
        let estimate = sum / n as f64;
        assert!((estimate - 1.0).abs() < 0.05, "estimate = {estimate}");
    }

    #[test]
    fn sampled_normals_follow_wo_hemisphere() {
        let dist = TrowbridgeReitzDistribution::new(0.3);
        let wo = Vector3f::new(0.0, 0.0, -1.0);
        let wh = dist.sample_wh(&wo, &Point2f::new(0.4, 0.2));
        assert!(wh.z < 0.0);
    }
}
