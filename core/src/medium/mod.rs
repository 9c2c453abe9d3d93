//! Participating Media

mod henyey_greenstein;
mod homogeneous;
mod phase_function;

use crate::geometry::*;
use crate::interaction::*;
use crate::sampler::*;
use crate::scene::MediumId;
use crate::spectrum::*;

// Re-export
pub use henyey_greenstein::*;
pub use homogeneous::*;
pub use phase_function::*;

/// The media on either side of a surface. `inside` is on the opposite side
/// of the geometric normal and `outside` on the same side. `None` is vacuum.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MediumInterface {
    /// Medium on the side opposite the normal.
    pub inside: Option<MediumId>,

    /// Medium on the side of the normal.
    pub outside: Option<MediumId>,
}

impl MediumInterface {
    /// Create a new medium interface.
    ///
    /// * `inside`  - Medium on the side opposite the normal.
    /// * `outside` - Medium on the side of the normal.
    pub fn new(inside: Option<MediumId>, outside: Option<MediumId>) -> Self {
        Self { inside, outside }
    }

    /// Returns true if the surface separates two different media.
    pub fn is_transition(&self) -> bool {
        self.inside != self.outside
    }
}

/// The closed set of participating media.
#[derive(Clone, Debug)]
pub enum Medium {
    Homogeneous(HomogeneousMedium),
}

impl Medium {
    /// Returns the beam transmittance along a given ray segment.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    pub fn tr(&self, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum {
        match self {
            Self::Homogeneous(m) => m.tr(ray, sampler),
        }
    }

    /// Samples a scattering event along the ray segment. Returns the path
    /// throughput weight and, if the event happens before `t_max`, the
    /// interaction. The caller assigns the medium id to the interaction.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    pub fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>) {
        match self {
            Self::Homogeneous(m) => m.sample(ray, sampler),
        }
    }
}
