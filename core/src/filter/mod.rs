//! Filter

use crate::base::*;

/// Separable image reconstruction filter. The 2D weight of an offset
/// `(dx, dy)` is `evaluate(dx) * evaluate(dy)`.
pub trait Filter: Send + Sync {
    /// Returns the filter radius. Samples further than this along either axis
    /// from a pixel center do not contribute to it.
    fn radius(&self) -> Float;

    /// Evaluate the 1D filter profile.
    ///
    /// * `x` - Offset from the pixel center.
    fn evaluate(&self, x: Float) -> Float;

    /// Returns the filter name.
    fn name(&self) -> &'static str;
}
