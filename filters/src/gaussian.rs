//! Gaussian Filter

use tessera_core::base::*;
use tessera_core::filter::*;
use tessera_core::paramset::*;

/// Implements the Gaussian filter which applies a bump that is centered at the
/// pixel and radially symmetric around it. The curve is shifted down so it
/// reaches 0 at the radius.
pub struct GaussianFilter {
    /// Radius of the filter.
    pub radius: Float,

    /// Falloff rate `1 / (2 stddev^2)`.
    pub alpha: Float,

    /// Stores e^(-alpha * radius^2).
    pub exp_r: Float,
}

impl GaussianFilter {
    /// Returns a new instance of `GaussianFilter`.
    ///
    /// * `radius` - Radius of the filter; beyond this filter is 0.
    /// * `stddev` - Standard deviation.
    pub fn new(radius: Float, stddev: Float) -> Self {
        let alpha = 1.0 / (2.0 * stddev * stddev);
        Self {
            radius,
            alpha,
            exp_r: (-alpha * radius * radius).exp(),
        }
    }
}

impl Default for GaussianFilter {
    fn default() -> Self {
        Self::new(2.0, 0.5)
    }
}

impl Filter for GaussianFilter {
    fn radius(&self) -> Float {
        self.radius
    }

    fn evaluate(&self, x: Float) -> Float {
        max(0.0, (-self.alpha * x * x).exp() - self.exp_r)
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }
}

impl From<&ParamSet> for GaussianFilter {
    /// Create a `GaussianFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let radius = crate::find_radius(params, 2.0);
        let stddev = params.find_one_float("stddev", 0.5);
        if stddev > 0.0 {
            Self::new(radius, stddev)
        } else {
            warn!("Invalid Gaussian stddev {}. Using 0.5.", stddev);
            Self::new(radius, 0.5)
        }
    }
}
