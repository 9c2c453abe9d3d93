//! Fresnel Dielectrics and Conductors

use crate::base::*;
use crate::geometry::*;
use crate::spectrum::*;

/// Computes the Fresnel reflection formula for dielectric materials and
/// unpolarized light.
///
/// * `cos_theta_i` - Cosine of the incident angle w.r.t. the normal; a
///                   negative value means the direction is on the inside.
/// * `eta_i`       - Index of refraction on the outside.
/// * `eta_t`       - Index of refraction on the inside.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);

    // Potentially swap indices of refraction.
    let (eta_i, eta_t) = if cos_theta_i > 0.0 {
        (eta_i, eta_t)
    } else {
        cos_theta_i = cos_theta_i.abs();
        (eta_t, eta_i)
    };

    // Compute `cos_theta_t` using Snell's law.
    let sin_theta_i = safe_sqrt(1.0 - cos_theta_i * cos_theta_i);
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = safe_sqrt(1.0 - sin_theta_t * sin_theta_t);
    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

/// Schlick's approximation of conductor reflectance.
///
/// * `r0`        - Reflectance at normal incidence.
/// * `cos_theta` - Cosine of the angle to the normal.
pub fn fr_schlick(r0: Spectrum, cos_theta: Float) -> Spectrum {
    let m = clamp(1.0 - cos_theta.abs(), 0.0, 1.0);
    let m5 = (m * m) * (m * m) * m;
    r0 + (Spectrum::ONE - r0) * m5
}

/// Refract `wi` through a surface with normal `n` (on the same side as
/// `wi`). Returns `None` on total internal reflection.
///
/// * `wi`  - Incident direction pointing away from the surface.
/// * `n`   - Normal on the side of `wi`.
/// * `eta` - Ratio of indices `eta_i / eta_t`.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    let cos_theta_i = n.dot(wi);
    let sin2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin2_theta_t = eta * eta * sin2_theta_i;
    if sin2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some(-*wi * eta + *n * (eta * cos_theta_i - cos_theta_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn normal_incidence_reflectance() {
        // ((1 - 1.5) / (1 + 1.5))^2 = 0.04
        assert!(approx_eq!(Float, fr_dielectric(1.0, 1.0, 1.5), 0.04, epsilon = 1e-6));
    }

    #[test]
    fn total_internal_reflection_from_inside() {
        assert_eq!(fr_dielectric(-0.1, 1.0, 1.5), 1.0);
    }

    #[test]
    fn refraction_bends_towards_normal() {
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wt = refract(&wi, &n, 1.0 / 1.5).unwrap();
        assert!(wt.z < 0.0);
        assert!(approx_eq!(Float, wt.length(), 1.0, epsilon = 1e-5));
        // Snell: sin θt = sin θi / 1.5
        assert!(approx_eq!(Float, -wt.x, 0.4, epsilon = 1e-5));
    }

    #[test]
    fn schlick_goes_to_one_at_grazing() {
        let r = fr_schlick(Spectrum::new(0.5), 0.0);
        assert!(approx_eq!(Float, r[0], 1.0, epsilon = 1e-6));
    }
}
