//! Common camera helpers

use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::paramset::*;
use tessera_core::scene::MediumId;

/// Default image resolution when none is given.
pub const DEFAULT_RESOLUTION: Point2i = Point2i { x: 640, y: 480 };

/// Camera placement. The basis is right-handed: `right` points to the right
/// of the image, `up` to its top and `forward` into the scene.
#[derive(Copy, Clone, Debug)]
pub struct ViewFrame {
    /// Camera position.
    pub origin: Point3f,

    /// Image x-axis in world space.
    pub right: Vector3f,

    /// Image y-axis (upwards) in world space.
    pub up: Vector3f,

    /// Viewing direction.
    pub forward: Vector3f,
}

impl ViewFrame {
    /// Create a view frame looking from `origin` towards `target`.
    ///
    /// * `origin` - Camera position.
    /// * `target` - Point the camera looks at.
    /// * `up`     - Approximate up vector.
    pub fn look_at(origin: Point3f, target: Point3f, up: Vector3f) -> Self {
        let mut forward = target - origin;
        if forward.length_squared() == 0.0 {
            warn!("Camera position and target coincide. Looking down +z.");
            forward = Vector3f::new(0.0, 0.0, 1.0);
        }
        let forward = forward.normalize();

        let mut right = forward.cross(&up);
        if right.length_squared() < 1e-12 {
            warn!("Camera up vector {up} is parallel to the view direction. Picking another.");
            let (s, _) = coordinate_system(&forward);
            right = s;
        }
        let right = right.normalize();
        let up = right.cross(&forward);

        Self {
            origin,
            right,
            up,
            forward,
        }
    }

    /// Transform a camera space vector `(x right, y up, z forward)` to world
    /// space.
    ///
    /// * `v` - Camera space vector.
    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.right * v.x + self.up * v.y + self.forward * v.z
    }
}

/// Half extents of the screen window. The shorter image axis spans `[-1, 1]`.
///
/// * `resolution` - Image resolution.
pub fn screen_half_extent(resolution: &Point2i) -> Point2f {
    let aspect = resolution.x.max(1) as Float / resolution.y.max(1) as Float;
    if aspect > 1.0 {
        Point2f::new(aspect, 1.0)
    } else {
        Point2f::new(1.0, 1.0 / aspect)
    }
}

/// Map a raster position to screen space with `y` pointing up.
///
/// * `p_film`     - Raster position.
/// * `resolution` - Image resolution.
/// * `half`       - Screen window half extents.
pub fn raster_to_screen(p_film: &Point2f, resolution: &Point2i, half: &Point2f) -> Point2f {
    let u = p_film.x / resolution.x.max(1) as Float;
    let v = p_film.y / resolution.y.max(1) as Float;
    Point2f::new((2.0 * u - 1.0) * half.x, (1.0 - 2.0 * v) * half.y)
}

/// Parameters shared by all camera types.
pub struct CommonCameraParams {
    /// Placement.
    pub frame: ViewFrame,

    /// Image resolution.
    pub resolution: Point2i,
}

impl From<&ParamSet> for CommonCameraParams {
    /// Reads `position`, `lookat`, `up`, `xres` and `yres`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let origin = params.find_one_point3f("position", Point3f::ZERO);
        let target = params.find_one_point3f("lookat", Point3f::new(0.0, 0.0, 1.0));
        let up = params.find_one_vector3f("up", Vector3f::new(0.0, 1.0, 0.0));

        let x = params.find_one_int("xres", DEFAULT_RESOLUTION.x);
        let y = params.find_one_int("yres", DEFAULT_RESOLUTION.y);
        let resolution = if x > 0 && y > 0 {
            Point2i::new(x, y)
        } else {
            warn!("Invalid camera resolution {x}x{y}. Using {DEFAULT_RESOLUTION}.");
            DEFAULT_RESOLUTION
        };

        Self {
            frame: ViewFrame::look_at(origin, target, up),
            resolution,
        }
    }
}

/// Camera medium id from parameters; negative values mean vacuum.
///
/// * `params` - Parameter set.
pub fn medium_from_params(params: &ParamSet) -> Option<MediumId> {
    let id = params.find_one_int("medium", -1);
    (id >= 0).then(|| MediumId(id as u32))
}
