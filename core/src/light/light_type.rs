//! Light Types

use bitflags::bitflags;

bitflags! {
    /// Classifies a light by how it can be sampled.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct LightType: u8 {
        /// Emits from a single point.
        const DELTA_POSITION = 1;

        /// Emits along a single direction.
        const DELTA_DIRECTION = 2;

        /// Attached to a shape.
        const AREA = 4;

        /// Surrounds the scene at infinity.
        const ENVIRONMENT = 8;
    }
}

impl LightType {
    /// Returns true if the light can only be reached by light sampling.
    pub fn is_delta(&self) -> bool {
        self.intersects(Self::DELTA_POSITION | Self::DELTA_DIRECTION)
    }

    /// Returns true for lights at infinity.
    pub fn is_environment(&self) -> bool {
        self.contains(Self::ENVIRONMENT)
    }
}
