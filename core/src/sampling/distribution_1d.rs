//! 1D Distribution.

use crate::base::*;

/// Represents a piecewise-constant 1D function’s PDF and CDF and provides
/// methods to sample it, both as a continuous density on [0, 1) and as a
/// discrete distribution over its entries.
///
/// The table can be built in one go with `new()` or incrementally with
/// `append()` followed by `normalize()`.
#[derive(Clone, Debug, Default)]
pub struct Distribution1D {
    /// Piecewise-constant function.
    pub func: Vec<Float>,

    /// CDF for `func` with `func.len() + 1` entries.
    pub cdf: Vec<Float>,

    /// Integral of `func` over [0, 1].
    pub func_int: Float,

    /// Whether `cdf` reflects the current contents of `func`.
    normalized: bool,
}

impl Distribution1D {
    /// Returns a new `Distribution1D` for given piecewise-constant function.
    ///
    /// - `f` - Piecewise-constant 1D function.
    pub fn new(f: Vec<Float>) -> Self {
        let mut d = Self {
            func: f,
            cdf: vec![],
            func_int: 0.0,
            normalized: false,
        };
        d.normalize();
        d
    }

    /// Append an entry to the function. The table must be normalized again
    /// before sampling.
    ///
    /// * `value` - The function value; negative values are treated as 0.
    pub fn append(&mut self, value: Float) {
        self.func.push(value.max(0.0));
        self.normalized = false;
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.func.clear();
        self.cdf.clear();
        self.func_int = 0.0;
        self.normalized = false;
    }

    /// Rebuild the normalized CDF from the function values and return the
    /// unnormalized sum of the entries. The CDF is always recomputed from
    /// `func`, so normalizing an already normalized table leaves it
    /// unchanged. A function that sums to zero yields a uniform CDF.
    pub fn normalize(&mut self) -> Float {
        let n = self.func.len();

        // Compute integral of step function at `x_i`
        self.cdf.clear();
        self.cdf.reserve(n + 1);
        self.cdf.push(0.0);
        let mut sum = 0.0;
        for &f in self.func.iter() {
            sum += f;
            self.cdf.push(sum);
        }

        // Transform step function integral into CDF.
        if sum > 0.0 {
            let inv_sum = 1.0 / sum;
            for v in self.cdf.iter_mut().skip(1) {
                *v *= inv_sum;
            }
        } else {
            for (i, v) in self.cdf.iter_mut().enumerate().skip(1) {
                *v = i as Float / n as Float;
            }
        }
        if let Some(last) = self.cdf.last_mut() {
            if n > 0 {
                *last = 1.0;
            }
        }

        self.func_int = if n > 0 { sum / n as Float } else { 0.0 };
        self.normalized = true;
        sum
    }

    /// Returns true if the CDF is up to date.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Returns the number of sample points for the piecewise-constant function.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.func.is_empty()
    }

    /// Returns the unnormalized sum of the entries.
    pub fn sum(&self) -> Float {
        self.func_int * self.count() as Float
    }

    /// Locate the CDF segment containing `u`.
    ///
    /// * `u` - The random sample.
    fn find_segment(&self, u: Float) -> usize {
        debug_assert!(self.normalized, "sampling a table that is not normalized");
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);

        // Skip over zero-probability entries that share a CDF value.
        let mut offset = offset;
        while offset + 1 < self.count() && self.cdf[offset + 1] <= self.cdf[offset] {
            offset += 1;
        }
        offset
    }

    /// Return a sample in [0, 1), PDF and offset from the distribution given a random sample.
    ///
    /// - `u` - The random sample.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        // Find surrounding CDF segments and `offset`.
        let offset = self.find_segment(u);

        // Compute offset along CDF segment.
        let mut du = u - self.cdf[offset];
        let width = self.cdf[offset + 1] - self.cdf[offset];
        if width > 0.0 {
            du /= width;
        }
        let du = clamp(du, 0.0, ONE_MINUS_EPSILON_F);

        // Compute PDF for sampled offset.
        let pdf = if self.func_int > 0.0 {
            self.func[offset] / self.func_int
        } else {
            0.0
        };

        // Return `x` in [0,1) corresponding to sample, PDF and offset.
        let x = (offset as Float + du) / self.count() as Float;
        (min(x, ONE_MINUS_EPSILON_F), pdf, offset)
    }

    /// Return a sample from the discrete distribution given a random sample.
    /// Returns the index and its probability.
    ///
    /// - `u` - The random sample.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float) {
        let offset = self.find_segment(u);
        (offset, self.discrete_pdf(offset))
    }

    /// Sample an index and rescale `u` so it can be used again as a fresh
    /// uniform sample.
    ///
    /// - `u` - The random sample; on return, the remapped sample.
    pub fn sample_reuse(&self, u: &mut Float) -> (usize, Float) {
        let offset = self.find_segment(*u);
        let width = self.cdf[offset + 1] - self.cdf[offset];
        *u = if width > 0.0 {
            clamp((*u - self.cdf[offset]) / width, 0.0, ONE_MINUS_EPSILON_F)
        } else {
            0.0
        };
        (offset, self.discrete_pdf(offset))
    }

    /// Return the PDF for sampling a given value from the discrete PDF.
    ///
    /// * `index` - Sample index.
    pub fn discrete_pdf(&self, index: usize) -> Float {
        if index >= self.count() {
            return 0.0;
        }
        self.cdf[index + 1] - self.cdf[index]
    }
}

/// Largest value below 1 in `Float` precision.
const ONE_MINUS_EPSILON_F: Float = crate::rng::ONE_MINUS_EPSILON;

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn append_then_normalize_matches_new() {
        let mut a = Distribution1D::default();
        for v in [1.0, 3.0, 0.0, 4.0] {
            a.append(v);
        }
        assert!(!a.is_normalized());
        let sum = a.normalize();
        let b = Distribution1D::new(vec![1.0, 3.0, 0.0, 4.0]);
        assert_eq!(sum, 8.0);
        assert_eq!(a.cdf, b.cdf);
        assert!(approx_eq!(Float, a.discrete_pdf(1), 0.375, ulps = 2));
    }

    #[test]
    fn zero_function_gives_uniform_cdf() {
        let d = Distribution1D::new(vec![0.0; 4]);
        assert_eq!(d.cdf, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(d.sum(), 0.0);
    }

    #[test]
    fn discrete_sampling_skips_zero_entries() {
        let d = Distribution1D::new(vec![1.0, 0.0, 1.0]);
        let (i, pdf) = d.sample_discrete(0.5);
        assert_eq!(i, 2);
        assert_eq!(pdf, 0.5);
        let (i, _) = d.sample_discrete(0.25);
        assert_eq!(i, 0);
    }

    #[test]
    fn sample_reuse_remaps_into_unit_interval() {
        let d = Distribution1D::new(vec![1.0, 1.0]);
        let mut u = 0.75;
        let (i, pdf) = d.sample_reuse(&mut u);
        assert_eq!(i, 1);
        assert_eq!(pdf, 0.5);
        assert!(approx_eq!(Float, u, 0.5, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(f in prop::collection::vec(0.0..100.0f32, 1..64)) {
            let mut d = Distribution1D::default();
            for v in f.iter() {
                d.append(*v);
            }
            d.normalize();
            let once = d.cdf.clone();
            d.normalize();
            prop_assert_eq!(once, d.cdf.clone());
        }

        #[test]
        fn cdf_is_monotonic_and_ends_at_one(f in prop::collection::vec(0.0..100.0f32, 1..64)) {
            let d = Distribution1D::new(f);
            prop_assert!(d.cdf.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(*d.cdf.last().unwrap(), 1.0);
        }

        #[test]
        fn continuous_sample_is_in_unit_interval(
            f in prop::collection::vec(0.0..100.0f32, 1..64),
            u in 0.0..1.0f32,
        ) {
            let d = Distribution1D::new(f);
            let (x, pdf, offset) = d.sample_continuous(u);
            prop_assert!((0.0..1.0).contains(&x));
            prop_assert!(offset < d.count());
            prop_assert!(pdf >= 0.0);
        }
    }
}
