//! Perspective Camera

use crate::common::*;
use tessera_core::base::*;
use tessera_core::camera::*;
use tessera_core::geometry::*;
use tessera_core::paramset::*;
use tessera_core::scene::MediumId;
use tessera_core::sampling::*;
use tessera_core::spectrum::*;

/// Perspective camera. A zero lens radius gives a pinhole; otherwise a thin
/// lens focused at `focal_distance` models depth of field.
pub struct PerspectiveCamera {
    /// Camera placement.
    pub frame: ViewFrame,

    /// Image resolution.
    resolution: Point2i,

    /// Field of view in degrees along the shorter image axis.
    pub fov: Float,

    /// `tan(fov / 2)`.
    tan_half_fov: Float,

    /// Screen window half extents.
    screen: Point2f,

    /// Radius of camera lens.
    pub lens_radius: Float,

    /// Distance to the plane of focus.
    pub focal_distance: Float,

    /// Medium the camera sits in.
    pub medium: Option<MediumId>,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `frame`          - Camera placement.
    /// * `resolution`     - Image resolution.
    /// * `fov`            - The field-of-view angle in degrees.
    /// * `lens_radius`    - Radius of camera lens.
    /// * `focal_distance` - Focal distance.
    /// * `medium`         - Scattering medium the camera lies in.
    pub fn new(
        frame: ViewFrame,
        resolution: Point2i,
        fov: Float,
        lens_radius: Float,
        focal_distance: Float,
        medium: Option<MediumId>,
    ) -> Self {
        Self {
            frame,
            resolution,
            fov,
            tan_half_fov: (radians(fov) * 0.5).tan(),
            screen: screen_half_extent(&resolution),
            lens_radius,
            focal_distance,
            medium,
        }
    }
}

impl Camera for PerspectiveCamera {
    /// Returns a ray corresponding to a given sample. It also returns the
    /// importance weight of the ray.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Spectrum) {
        // Compute raster and camera sample positions.
        let p_screen = raster_to_screen(&sample.p_film, &self.resolution, &self.screen);
        let p_camera = Vector3f::new(p_screen.x * self.tan_half_fov, p_screen.y * self.tan_half_fov, 1.0);

        let (o, d) = if self.lens_radius > 0.0 {
            // Sample point on lens.
            let p_lens = concentric_sample_disk(&sample.p_lens) * self.lens_radius;

            // Compute point on plane of focus. Camera space direction has z = 1.
            let p_focus = p_camera * self.focal_distance;

            // Update ray for effect of lens.
            let o = Vector3f::new(p_lens.x, p_lens.y, 0.0);
            (o, p_focus - o)
        } else {
            (Vector3f::ZERO, p_camera)
        };

        let mut ray = Ray::new(self.frame.origin + self.frame.to_world(&o), self.frame.to_world(&d).normalize())
            .with_medium(self.medium);
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
        "perspective"
    }
}

impl From<&ParamSet> for PerspectiveCamera {
    /// Create a `PerspectiveCamera` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let common = CommonCameraParams::from(params);

        let lens_radius = params.find_one_float("lensradius", 0.0);
        let lens_radius = if lens_radius >= 0.0 {
            lens_radius
        } else {
            warn!("Negative lens radius {lens_radius}. Using a pinhole.");
            0.0
        };
        let focal_distance = params.find_one_positive_float("focaldistance", 1e6);

        let mut fov = params.find_one_float("fov", 90.0);
        if !(fov > 0.0 && fov < 180.0) {
            warn!("Field of view {fov} out of range (0, 180). Using 90.");
            fov = 90.0;
        }

        Self::new(
            common.frame,
            common.resolution,
            fov,
            lens_radius,
            focal_distance,
            medium_from_params(params),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn camera(lens_radius: Float) -> PerspectiveCamera {
        let frame = ViewFrame::look_at(
            Point3f::new(0.0, 0.0, -5.0),
            Point3f::ZERO,
            Vector3f::new(0.0, 1.0, 0.0),
        );
        PerspectiveCamera::new(frame, Point2i::new(200, 100), 90.0, lens_radius, 5.0, None)
    }

    #[test]
    fn center_ray_looks_at_target() {
        let cam = camera(0.0);
        let sample = CameraSample::new(Point2f::new(100.0, 50.0), Point2f::new(0.5, 0.5), 0.0);
        let (ray, weight) = cam.generate_ray(&sample);
        assert!(approx_eq!(f32, ray.d.z, 1.0, epsilon = 1e-6));
        assert_eq!(ray.o, Point3f::new(0.0, 0.0, -5.0));
        assert_eq!(weight, Spectrum::ONE);
    }

    #[test]
    fn image_orientation() {
        let cam = camera(0.0);

        // Looking down +z with +y up, image right is -x.
        let (right, _) = cam.generate_ray(&CameraSample::new(Point2f::new(200.0, 50.0), Point2f::zero(), 0.0));
        assert!(right.d.x < 0.0);

        // Top row points up.
        let (top, _) = cam.generate_ray(&CameraSample::new(Point2f::new(100.0, 0.0), Point2f::zero(), 0.0));
        assert!(top.d.y > 0.0);
        // Shorter axis spans the field of view: 45 degrees off axis.
        assert!(approx_eq!(f32, top.d.y, top.d.z, epsilon = 1e-5));
    }

    #[test]
    fn set_resolution_keeps_aspect_consistent() {
        let mut cam = camera(0.0);
        cam.set_resolution(Point2i::new(100, 200));
        assert_eq!(cam.resolution(), Point2i::new(100, 200));
        let (ray, _) = cam.generate_ray(&CameraSample::new(Point2f::new(100.0, 100.0), Point2f::zero(), 0.0));
        assert!(approx_eq!(f32, -ray.d.x, ray.d.z, epsilon = 1e-5));
    }

    #[test]
    fn from_params_rejects_bad_values() {
        let params = ParamSet::new().with_float("fov", 200.0).with_float("lensradius", -1.0);
        let cam = PerspectiveCamera::from(&params);
        assert_eq!(cam.fov, 90.0);
        assert_eq!(cam.lens_radius, 0.0);
        assert_eq!(cam.resolution(), DEFAULT_RESOLUTION);
        assert_eq!(cam.medium(), None);
    }

    proptest! {
        #[test]
        fn thin_lens_rays_meet_on_focal_plane(
            x in 0.0..200.0_f32,
            y in 0.0..100.0_f32,
            u in 0.0..1.0_f32,
            v in 0.0..1.0_f32,
        ) {
            let pinhole = camera(0.0);
            let lens = camera(0.5);
            let (r0, _) = pinhole.generate_ray(&CameraSample::new(Point2f::new(x, y), Point2f::new(u, v), 0.0));
            let (r1, _) = lens.generate_ray(&CameraSample::new(Point2f::new(x, y), Point2f::new(u, v), 0.0));

            // Both rays reach the plane z = 0 (focal distance 5) at the same point.
            let p0 = r0.at((0.0 - r0.o.z) / r0.d.z);
            let p1 = r1.at((0.0 - r1.o.z) / r1.d.z);
            prop_assert!(p0.distance(&p1) < 1e-3);
            prop_assert!(approx_eq!(f32, r1.d.length(), 1.0, epsilon = 1e-5));
        }
    }
}
