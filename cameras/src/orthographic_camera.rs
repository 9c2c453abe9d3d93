//! Orthographic Camera

use crate::common::*;
use tessera_core::base::*;
use tessera_core::camera::*;
use tessera_core::geometry::*;
use tessera_core::paramset::*;
use tessera_core::scene::MediumId;
use tessera_core::spectrum::*;

/// Orthographic camera. All rays are parallel to the view direction.
pub struct OrthographicCamera {
    /// Camera placement.
    pub frame: ViewFrame,

    /// Image resolution.
    resolution: Point2i,

    /// World-space half size of the shorter image axis.
    pub scale: Float,

    /// Screen window half extents.
    screen: Point2f,

    /// Medium the camera sits in.
    pub medium: Option<MediumId>,
}

impl OrthographicCamera {
    /// Create a new orthographic camera.
    ///
    /// * `frame`      - Camera placement.
    /// * `resolution` - Image resolution.
    /// * `scale`      - World-space half size of the shorter image axis.
    /// * `medium`     - Scattering medium the camera lies in.
    pub fn new(frame: ViewFrame, resolution: Point2i, scale: Float, medium: Option<MediumId>) -> Self {
        Self {
            frame,
            resolution,
            scale,
            screen: screen_half_extent(&resolution),
            medium,
        }
    }
}

impl Camera for OrthographicCamera {
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Spectrum) {
        let p = raster_to_screen(&sample.p_film, &self.resolution, &self.screen) * self.scale;
        let o = self.frame.origin + self.frame.to_world(&Vector3f::new(p.x, p.y, 0.0));
        let mut ray = Ray::new(o, self.frame.forward).with_medium(self.medium);
        ray.time = sample.time;
        (ray, Spectrum::ONE)
    }

    fn resolution(&self) -> Point2i {
        self.resolution
    }

    fn set_resolution(&mut self, resolution: Point2i) {
        self.resolution = resolution;
        self.screen = screen_half_extent(&resolution);
    }

    fn medium(&self) -> Option<MediumId> {
        self.medium
    }

    fn name(&self) -> &'static str {
        "orthographic"
    }
}

impl From<&ParamSet> for OrthographicCamera {
    /// Create a `OrthographicCamera` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let common = CommonCameraParams::from(params);
        let scale = params.find_one_positive_float("scale", 1.0);
        Self::new(common.frame, common.resolution, scale, medium_from_params(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn rays_are_parallel() {
        let params = ParamSet::new()
            .with_point3f("position", Point3f::new(1.0, 2.0, 3.0))
            .with_point3f("lookat", Point3f::new(1.0, 2.0, 10.0))
            .with_int("xres", 10)
            .with_int("yres", 10)
            .with_float("scale", 2.0);
        let cam = OrthographicCamera::from(&params);

        let (a, _) = cam.generate_ray(&CameraSample::new(Point2f::new(0.0, 0.0), Point2f::zero(), 0.0));
        let (b, _) = cam.generate_ray(&CameraSample::new(Point2f::new(10.0, 10.0), Point2f::zero(), 0.0));
        assert_eq!(a.d, b.d);
        assert!(approx_eq!(f32, a.d.z, 1.0, epsilon = 1e-6));

        // Corners span the scaled window.
        assert!(approx_eq!(f32, a.o.distance(&b.o), 4.0 * (2.0 as Float).sqrt(), epsilon = 1e-4));
        assert!(approx_eq!(f32, a.o.y, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, b.o.y, 0.0, epsilon = 1e-5));
    }

    #[test]
    fn medium_parameter() {
        let cam = OrthographicCamera::from(&ParamSet::new().with_int("medium", 2));
        assert_eq!(cam.medium(), Some(MediumId(2)));
        assert_eq!(cam.name(), "orthographic");
    }
}
