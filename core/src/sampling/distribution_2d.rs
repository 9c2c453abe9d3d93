//! 2D Distribution.

use crate::base::*;
use crate::geometry::*;
use crate::sampling::Distribution1D;

/// Represents a piecewise-constant 2D function’s PDF and CDF as a marginal
/// distribution over rows and a conditional distribution per row.
#[derive(Clone, Debug)]
pub struct Distribution2D {
    /// 1D conditional sampling density `p[ũ|ṽ]` for each `nv`.
    p_conditional_v: Vec<Distribution1D>,

    /// Marginal sampling density p[ṽ].
    p_marginal: Distribution1D,
}

impl Distribution2D {
    /// Returns a new `Distribution2D` for a function stored row by row.
    ///
    /// - `func` - Function values, `nu * nv` entries.
    /// - `nu`   - Number of columns.
    /// - `nv`   - Number of rows.
    pub fn new(func: &[Float], nu: usize, nv: usize) -> Self {
        debug_assert!(func.len() >= nu * nv);
        let p_conditional_v: Vec<Distribution1D> = (0..nv)
            .map(|v| Distribution1D::new(func[v * nu..(v + 1) * nu].to_vec()))
            .collect();
        let marginal_func: Vec<Float> = p_conditional_v.iter().map(|pcv| pcv.func_int).collect();
        let p_marginal = Distribution1D::new(marginal_func);
        Self {
            p_conditional_v,
            p_marginal,
        }
    }

    /// Return a sample point in [0, 1)^2 and its PDF given a random sample.
    ///
    /// - `u` - The random sample.
    pub fn sample_continuous(&self, u: &Point2f) -> (Point2f, Float) {
        // Draw a sample from the p[ṽ] marginal distribution in order to find the
        // ṽ coordinate.
        let (d1, pdf1, v) = self.p_marginal.sample_continuous(u.y);

        // Use ṽ to find the precomputed conditional distribution to use for
        // sampling ũ.
        let (d0, pdf0, _) = self.p_conditional_v[v].sample_continuous(u.x);

        (Point2f::new(d0, d1), pdf0 * pdf1)
    }

    /// Return the PDF value for a given sample value.
    ///
    /// * `p` - Sample value.
    pub fn pdf(&self, p: &Point2f) -> Float {
        if self.p_marginal.func_int == 0.0 {
            return 0.0;
        }
        let nu = self.p_conditional_v[0].count();
        let nv = self.p_marginal.count();
        let iu = clamp((p.x * nu as Float) as usize, 0, nu - 1);
        let iv = clamp((p.y * nv as Float) as usize, 0, nv - 1);
        self.p_conditional_v[iv].func[iu] / self.p_marginal.func_int
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn sample_pdf_matches_pdf_lookup() {
        let func = [1.0, 2.0, 3.0, 4.0, 0.0, 6.0];
        let d = Distribution2D::new(&func, 3, 2);
        for (u0, u1) in [(0.1, 0.2), (0.5, 0.5), (0.9, 0.95)] {
            let (p, pdf) = d.sample_continuous(&Point2f::new(u0, u1));
            assert!(approx_eq!(Float, pdf, d.pdf(&p), epsilon = 1e-4));
        }
    }

    #[test]
    fn constant_function_has_unit_pdf() {
        let d = Distribution2D::new(&[2.0; 16], 4, 4);
        assert!(approx_eq!(Float, d.pdf(&Point2f::new(0.3, 0.7)), 1.0, epsilon = 1e-6));
    }
}
