//! Camera

use crate::base::*;
use crate::geometry::*;
use crate::scene::MediumId;
use crate::spectrum::*;

/// Holds all the sample values needed to specify a camera ray.
#[derive(Copy, Clone, Debug, Default)]
pub struct CameraSample {
    /// Point on the film in raster coordinates; pixel `(x, y)` covers
    /// `[x, x + 1) × [y, y + 1)`.
    pub p_film: Point2f,

    /// Point on the lens in [0, 1)^2.
    pub p_lens: Point2f,

    /// Time at which the ray should sample the scene.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - Point on the film.
    /// * `p_lens` - Point on the lens.
    /// * `time`   - Time.
    pub fn new(p_film: Point2f, p_lens: Point2f, time: Float) -> Self {
        Self { p_film, p_lens, time }
    }
}

/// Camera interface.
pub trait Camera: Send + Sync {
    /// Returns a world-space ray for the given sample and the importance
    /// weight of the ray.
    ///
    /// * `sample` - The camera sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Spectrum);

    /// Returns the output image resolution.
    fn resolution(&self) -> Point2i;

    /// Change the output image resolution.
    ///
    /// * `resolution` - The new resolution.
    fn set_resolution(&mut self, resolution: Point2i);

    /// Returns the medium the camera sits in.
    fn medium(&self) -> Option<MediumId> {
        None
    }

    /// Returns the camera name.
    fn name(&self) -> &'static str;
}
