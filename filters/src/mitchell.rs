//! Mitchell Filter

use tessera_core::base::*;
use tessera_core::filter::*;
use tessera_core::paramset::*;

/// Implements the Mitchell-Netravali filter.
pub struct MitchellFilter {
    /// Radius of the filter.
    pub radius: Float,

    /// Parameter `B`.
    pub b: Float,

    /// Parameter `C`.
    pub c: Float,
}

impl MitchellFilter {
    /// Returns a new instance of `MitchellFilter`. Ideally the 2 parameters
    /// `B` and `C` should satisfy `B + 2C = 1`.
    ///
    /// * `radius` - Radius of the filter; beyond this filter is 0.
    /// * `b`      - Parameter `B`.
    /// * `c`      - Parameter `C`.
    pub fn new(radius: Float, b: Float, c: Float) -> Self {
        Self { radius, b, c }
    }

    /// Calculates the 1D filter function over [-1, 1].
    ///
    /// * `x` - Distance from center of filter divided by the radius.
    fn mitchell_1d(&self, x: Float) -> Float {
        let x = (2.0 * x).abs();
        let (b, c) = (self.b, self.c);

        if x > 2.0 {
            0.0
        } else if x > 1.0 {
            ((-b - 6.0 * c) * x * x * x + (6.0 * b + 30.0 * c) * x * x + (-12.0 * b - 48.0 * c) * x + (8.0 * b + 24.0 * c))
                * (1.0 / 6.0)
        } else {
            ((12.0 - 9.0 * b - 6.0 * c) * x * x * x + (-18.0 + 12.0 * b + 6.0 * c) * x * x + (6.0 - 2.0 * b))
                * (1.0 / 6.0)
        }
    }
}

impl Default for MitchellFilter {
    fn default() -> Self {
        Self::new(2.0, 1.0 / 3.0, 1.0 / 3.0)
    }
}

impl Filter for MitchellFilter {
    fn radius(&self) -> Float {
        self.radius
    }

    fn evaluate(&self, x: Float) -> Float {
        if self.radius == 0.0 {
            return 1.0;
        }
        self.mitchell_1d(x / self.radius)
    }

    fn name(&self) -> &'static str {
        "mitchell"
    }
}

impl From<&ParamSet> for MitchellFilter {
    /// Create a `MitchellFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let radius = crate::find_radius(params, 2.0);
        let b = params.find_one_float("B", 1.0 / 3.0);
        let c = params.find_one_float("C", 1.0 / 3.0);
        Self::new(radius, b, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn mitchell_is_continuous_at_knot() {
        let f = MitchellFilter::default();
        let below = f.evaluate(0.999 * f.radius / 2.0);
        let above = f.evaluate(1.001 * f.radius / 2.0);
        assert!((below - above).abs() < 1e-2);
        assert!(approx_eq!(Float, f.evaluate(f.radius), 0.0, epsilon = 1e-6));
    }

    #[test]
    fn mitchell_peaks_at_center() {
        let f = MitchellFilter::default();
        assert!(approx_eq!(Float, f.evaluate(0.0), (6.0 - 2.0 / 3.0) / 6.0, epsilon = 1e-6));
    }

    #[test]
    fn gaussian_reaches_zero_at_radius() {
        let f = GaussianFilter::default();
        assert!(approx_eq!(Float, f.evaluate(2.0), 0.0, epsilon = 1e-6));
        assert!(f.evaluate(0.0) > f.evaluate(0.5));
    }

    #[test]
    fn param_defaults() {
        let params = ParamSet::new();
        assert_eq!(BoxFilter::from(&params).radius(), 0.5);
        assert_eq!(TentFilter::from(&params).radius(), 1.0);
        assert_eq!(GaussianFilter::from(&params).radius(), 2.0);
        assert_eq!(MitchellFilter::from(&params).radius(), 2.0);
    }

    #[test]
    fn negative_radius_falls_back() {
        let params = ParamSet::new().with_float("radius", -3.0);
        assert_eq!(TentFilter::from(&params).radius(), 1.0);
    }

    proptest! {
        #[test]
        fn filters_vanish_outside_radius(x in 2.0..10.0 as Float) {
            let filters: Vec<Box<dyn Filter>> = vec![
                Box::new(BoxFilter::default()),
                Box::new(TentFilter::default()),
                Box::new(GaussianFilter::default()),
                Box::new(MitchellFilter::default()),
            ];
            for f in filters.iter() {
                prop_assert!(f.evaluate(x + 0.001).abs() < 1e-6, "{} at {}", f.name(), x);
                prop_assert!(f.evaluate(-(x + 0.001)).abs() < 1e-6, "{} at {}", f.name(), -x);
            }
        }

        #[test]
        fn filters_are_symmetric(x in 0.0..2.0 as Float) {
            let filters: Vec<Box<dyn Filter>> = vec![
                Box::new(TentFilter::default()),
                Box::new(GaussianFilter::default()),
                Box::new(MitchellFilter::default()),
            ];
            for f in filters.iter() {
                prop_assert!((f.evaluate(x) - f.evaluate(-x)).abs() < 1e-6);
            }
        }
    }
}
