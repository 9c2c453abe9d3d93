//! Light

use crate::base::*;
use crate::geometry::*;
use crate::reflection::Measure;
use crate::sampling::*;
use crate::scene::ShapeId;
use crate::shape::Shape;
use crate::spectrum::*;

mod area;
mod directional;
mod environment;
mod light_sample;
mod light_type;
mod point;

// Re-export
pub use area::*;
pub use directional::*;
pub use environment::*;
pub use light_sample::*;
pub use light_type::*;
pub use point::*;

/// The closed set of light sources.
#[derive(Clone, Debug)]
pub enum Light {
    Point(PointLight),
    Directional(DirectionalLight),
    Area(AreaLight),
    ConstantEnvironment(ConstantEnvironmentLight),
    EnvironmentMap(EnvironmentMapLight),
}

impl Light {
    /// Returns the type of light.
    pub fn light_type(&self) -> LightType {
        match self {
            Self::Point(_) => LightType::DELTA_POSITION,
            Self::Directional(_) => LightType::DELTA_DIRECTION,
            Self::Area(_) => LightType::AREA,
            Self::ConstantEnvironment(_) | Self::EnvironmentMap(_) => LightType::ENVIRONMENT,
        }
    }

    /// Returns true if the light is described by a delta distribution.
    pub fn is_delta(&self) -> bool {
        self.light_type().is_delta()
    }

    /// Returns true for lights at infinity that escaping rays can see.
    pub fn is_environment(&self) -> bool {
        self.light_type().is_environment()
    }

    /// Sample the incident illumination at a reference point. Returns the
    /// contribution pre-divided by the sample pdf along with the sample. A
    /// failed sample has a zero contribution and pdf 0.
    ///
    /// * `shapes` - The scene shapes.
    /// * `ref_p`  - Reference point.
    /// * `u`      - Sample value in [0, 1)^2.
    pub fn sample_li(&self, shapes: &[Shape], ref_p: &Point3f, u: &Point2f) -> (Spectrum, LightSample) {
        match self {
            Self::Point(l) => l.sample_li(ref_p),
            Self::Directional(l) => l.sample_li(),
            Self::Area(l) => l.sample_li(shapes, ref_p, u),
            Self::ConstantEnvironment(l) => l.sample_li(u),
            Self::EnvironmentMap(l) => l.sample_li(u),
        }
    }

    /// Returns the solid angle density with which `sample_li` would produce
    /// `ls`. Delta lights return 0.
    ///
    /// * `shapes` - The scene shapes.
    /// * `ref_p`  - Reference point.
    /// * `ls`     - The light sample.
    pub fn pdf_li(&self, shapes: &[Shape], ref_p: &Point3f, ls: &LightSample) -> Float {
        match self {
            Self::Point(_) | Self::Directional(_) => 0.0,
            Self::Area(l) => l.pdf_li(shapes, ref_p, ls),
            Self::ConstantEnvironment(_) => uniform_sphere_pdf(),
            Self::EnvironmentMap(l) => l.pdf_li(&ls.wi),
        }
    }

    /// Returns radiance emitted from a point on an area light with geometric
    /// normal `n` in direction `w`.
    ///
    /// * `n` - Geometric normal at the emitting point.
    /// * `w` - Outgoing direction.
    pub fn le(&self, n: &Normal3f, w: &Vector3f) -> Spectrum {
        match self {
            Self::Area(l) => l.le(n, w),
            _ => Spectrum::ZERO,
        }
    }

    /// Returns the radiance carried by a ray that escapes the scene in
    /// direction `d`.
    ///
    /// * `d` - Ray direction.
    pub fn eval_environment(&self, d: &Vector3f) -> Spectrum {
        match self {
            Self::ConstantEnvironment(l) => l.radiance,
            Self::EnvironmentMap(l) => l.eval(d),
            _ => Spectrum::ZERO,
        }
    }

    /// Return the total emitted power.
    ///
    /// * `shapes` - The scene shapes.
    pub fn power(&self, shapes: &[Shape]) -> Spectrum {
        match self {
            Self::Point(l) => l.power(),
            Self::Directional(l) => l.power(),
            Self::Area(l) => l.power(shapes),
            Self::ConstantEnvironment(l) => l.power(),
            Self::EnvironmentMap(l) => l.power(),
        }
    }

    /// Returns the shape an area light is attached to.
    pub fn shape(&self) -> Option<ShapeId> {
        match self {
            Self::Area(l) => Some(l.shape),
            _ => None,
        }
    }

    /// Record the scene extent for lights whose power depends on it.
    ///
    /// * `world_bound` - Bounds of the scene geometry.
    pub fn preprocess(&mut self, world_bound: &Bounds3f) {
        let radius = if world_bound.is_empty() {
            0.0
        } else {
            world_bound.bounding_sphere().1
        };
        match self {
            Self::Directional(l) => l.world_radius = radius,
            Self::ConstantEnvironment(l) => l.world_radius = radius,
            Self::EnvironmentMap(l) => l.world_radius = radius,
            Self::Point(_) | Self::Area(_) => {}
        }
    }
}
