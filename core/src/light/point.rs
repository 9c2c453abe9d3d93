//! Point Light Source

use super::*;

/// Isotropic point light source that emits the same amount of light in all
/// directions.
#[derive(Clone, Debug)]
pub struct PointLight {
    /// Position.
    pub position: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `position`  - Position.
    /// * `intensity` - Intensity.
    pub fn new(position: Point3f, intensity: Spectrum) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Return the radiance arriving at a reference point.
    ///
    /// * `ref_p` - Reference point.
    pub fn sample_li(&self, ref_p: &Point3f) -> (Spectrum, LightSample) {
        let d = self.position - *ref_p;
        let dist2 = d.length_squared();
        if dist2 == 0.0 {
            return (Spectrum::ZERO, LightSample::default());
        }
        let dist = dist2.sqrt();
        let wi = d / dist;
        let ls = LightSample {
            p: self.position,
            n: -wi,
            wi,
            dist,
            pdf: 1.0,
            measure: Measure::Discrete,
            light: None,
        };
        (self.intensity / dist2, ls)
    }

    /// Return the total emitted power.
    pub fn power(&self) -> Spectrum {
        self.intensity * FOUR_PI
    }
}
