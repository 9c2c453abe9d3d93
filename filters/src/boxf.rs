//! Box Filter

use tessera_core::base::*;
use tessera_core::filter::*;
use tessera_core::paramset::*;

/// Equally weights all samples within a square region of the image. A zero
/// radius gives every sample to the pixel it falls in.
pub struct BoxFilter {
    /// Radius of the filter.
    pub radius: Float,
}

impl BoxFilter {
    /// Returns a new instance of `BoxFilter`.
    ///
    /// * `radius` - Radius of the filter; beyond this filter is 0.
    pub fn new(radius: Float) -> Self {
        Self { radius }
    }
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Filter for BoxFilter {
    fn radius(&self) -> Float {
        self.radius
    }

    fn evaluate(&self, x: Float) -> Float {
        if x.abs() <= self.radius {
            1.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &'static str {
        "box"
    }
}

impl From<&ParamSet> for BoxFilter {
    /// Create a `BoxFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        Self::new(crate::find_radius(params, 0.5))
    }
}
