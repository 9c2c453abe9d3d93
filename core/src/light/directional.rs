//! Directional Light Source

use super::*;

/// A light infinitely far away that illuminates the scene from a single
/// direction.
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    /// Direction the light travels in.
    pub direction: Vector3f,

    /// Irradiance on a surface perpendicular to `direction`.
    pub irradiance: Spectrum,

    /// Radius of the scene bounding sphere; set by `preprocess`.
    pub world_radius: Float,
}

impl DirectionalLight {
    /// Returns a new `DirectionalLight`.
    ///
    /// * `direction`  - Direction the light travels in.
    /// * `irradiance` - Irradiance.
    pub fn new(direction: Vector3f, irradiance: Spectrum) -> Self {
        Self {
            direction: direction.normalize(),
            irradiance,
            world_radius: 0.0,
        }
    }

    /// Return the irradiance arriving at a reference point.
    pub fn sample_li(&self) -> (Spectrum, LightSample) {
        let wi = -self.direction;
        let ls = LightSample {
            p: Point3f::ZERO,
            n: self.direction,
            wi,
            dist: INFINITY,
            pdf: 1.0,
            measure: Measure::Discrete,
            light: None,
        };
        (self.irradiance, ls)
    }

    /// Return the power falling on a disk covering the scene.
    pub fn power(&self) -> Spectrum {
        self.irradiance * (PI * self.world_radius * self.world_radius)
    }
}
