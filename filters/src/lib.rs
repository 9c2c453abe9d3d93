//! Filters

#[macro_use]
extern crate log;

mod boxf; // box is reserved keyword
mod gaussian;
mod mitchell;
mod tent;

// Re-export.
pub use boxf::*;
pub use gaussian::*;
pub use mitchell::*;
pub use tent::*;

use tessera_core::base::*;

/// Read a filter radius parameter, falling back to `default` for
/// non-positive or non-finite values.
///
/// * `params`  - Parameter set.
/// * `default` - Default radius.
pub(crate) fn find_radius(params: &tessera_core::paramset::ParamSet, default: Float) -> Float {
    let radius = params.find_one_float("radius", default);
    if radius.is_finite() && radius >= 0.0 {
        radius
    } else {
        warn!("Invalid filter radius {}. Using {}.", radius, default);
        default
    }
}
