//! Henyey-Greenstein

use super::phase_function::PhaseSample;
use crate::base::*;
use crate::geometry::*;

/// Computes the Henyey-Greenstein phase function which can be used by other
/// phase function
///
/// * `cos_theta` - Angle between two direction vectors.
/// * `g`         - Asymmetry parametery.
#[inline]
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g + 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * safe_sqrt(denom))
}

/// Sample the Henyey-Greenstein distribution around `wo`.
///
/// * `wo` - Outgoing direction.
/// * `g`  - Asymmetry parameter.
/// * `u`  - Sample value in [0, 1)^2.
pub fn sample_hg(wo: &Vector3f, g: Float, u: &Point2f) -> PhaseSample {
    // Compute $\cos \theta$ for Henyey--Greenstein sample
    let cos_theta = if g.abs() < 1e-3 {
        1.0 - 2.0 * u.x
    } else {
        let sqr_term = (1.0 - g * g) / (1.0 + g - 2.0 * g * u.x);
        -(1.0 + g * g - sqr_term * sqr_term) / (2.0 * g)
    };

    // Compute direction _wi_ for Henyey--Greenstein sample
    let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);
    let phi = TWO_PI * u.y;
    let frame = Frame::from_normal(wo);
    let wi = frame.to_world(&Vector3f::new(
        sin_theta * phi.cos(),
        sin_theta * phi.sin(),
        cos_theta,
    ));

    PhaseSample {
        wi,
        pdf: phase_hg(cos_theta, g),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn isotropic_limit() {
        assert!(approx_eq!(Float, phase_hg(0.3, 0.0), INV_FOUR_PI, epsilon = 1e-7));
    }

    proptest! {
        #[test]
        fn sampled_pdf_matches_evaluation(
            g in -0.9..0.9f32,
            u0 in 0.0..1.0f32,
            u1 in 0.0..1.0f32,
        ) {
            let wo = Vector3f::new(0.0, 0.6, 0.8);
            let s = sample_hg(&wo, g, &Point2f::new(u0, u1));
            let p = phase_hg(wo.dot(&s.wi), g);
            prop_assert!(approx_eq!(Float, s.pdf, p, epsilon = 1e-3 * p.max(1.0)));
            prop_assert!(approx_eq!(Float, s.wi.length(), 1.0, epsilon = 1e-4));
        }
    }
}
