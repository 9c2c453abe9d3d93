//! Tent Filter

use tessera_core::base::*;
use tessera_core::filter::*;
use tessera_core::paramset::*;

/// Implements the tent (triangle) filter in which the weight falls off
/// linearly from the filter center.
pub struct TentFilter {
    /// Radius of the filter.
    pub radius: Float,
}

impl TentFilter {
    /// Returns a new instance of `TentFilter`.
    ///
    /// * `radius` - Radius of the filter; beyond this filter is 0.
    pub fn new(radius: Float) -> Self {
        Self { radius }
    }
}

impl Default for TentFilter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Filter for TentFilter {
    fn radius(&self) -> Float {
        self.radius
    }

    /// Returns value of the filter at a given offset.
    ///
    /// * `x` - Offset from the filter center.
    fn evaluate(&self, x: Float) -> Float {
        max(0.0, self.radius - x.abs())
    }

    fn name(&self) -> &'static str {
        "tent"
    }
}

impl From<&ParamSet> for TentFilter {
    /// Create a `TentFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        Self::new(crate::find_radius(params, 1.0))
    }
}
