//! BSDF Types

use bitflags::bitflags;

bitflags! {
    /// Stores combination of flags for scattering lobes.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BSDFType: u8 {
        /// Lambertian-like lobe with a finite density.
        const DIFFUSE = 1;

        /// Rough lobe with a finite density.
        const GLOSSY = 2;

        /// Perfectly specular lobe without a solid angle density.
        const DELTA = 4;

        /// Index-matched boundary that lets light through unchanged.
        const PASSTHROUGH = 8;
    }
}

impl BSDFType {
    /// Returns true if any lobe has a finite solid angle density.
    pub fn has_smooth_component(&self) -> bool {
        self.intersects(Self::DIFFUSE | Self::GLOSSY)
    }
}

/// The measure a sampled density is expressed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Measure {
    /// Density per unit solid angle.
    SolidAngle,

    /// Discrete probability of a delta lobe.
    Discrete,
}
