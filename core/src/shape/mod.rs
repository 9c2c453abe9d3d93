//! Shapes

mod rectangle;
mod sphere;
mod triangle;

use crate::base::*;
use crate::geometry::*;
use crate::medium::*;
use crate::scene::*;

// Re-export
pub use rectangle::*;
pub use sphere::*;
pub use triangle::*;

/// Geometric data of a ray-shape intersection.
#[derive(Copy, Clone, Debug)]
pub struct ShapeHit {
    /// Parametric distance.
    pub t: Float,

    /// Hit point.
    pub p: Point3f,

    /// Geometric normal.
    pub n: Normal3f,

    /// Shading normal.
    pub ns: Normal3f,

    /// Surface parameterization.
    pub uv: Point2f,

    /// Parametric partial derivative ∂p/∂u used to orient the shading frame.
    pub dpdu: Vector3f,
}

/// A point sampled on a shape surface. `pdf` is expressed with respect to
/// area or solid angle depending on the sampling routine that produced it.
#[derive(Copy, Clone, Debug)]
pub struct ShapeSample {
    /// Sampled point.
    pub p: Point3f,

    /// Surface normal at `p`.
    pub n: Normal3f,

    /// Density of the sample.
    pub pdf: Float,
}

/// The closed set of supported geometric primitives.
#[derive(Clone, Debug)]
pub enum ShapeKind {
    Sphere(Sphere),
    Rectangle(Rectangle),
    Triangle(Triangle),
}

impl ShapeKind {
    /// Returns the nearest intersection within the ray's parametric range.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        match self {
            Self::Sphere(s) => s.intersect(ray),
            Self::Rectangle(s) => s.intersect(ray),
            Self::Triangle(s) => s.intersect(ray),
        }
    }

    /// Returns true if the ray hits the shape within its parametric range.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        match self {
            Self::Sphere(s) => s.intersect_p(ray),
            _ => self.intersect(ray).is_some(),
        }
    }

    /// Returns the world space bounding box.
    pub fn bounds(&self) -> Bounds3f {
        match self {
            Self::Sphere(s) => s.bounds(),
            Self::Rectangle(s) => s.bounds(),
            Self::Triangle(s) => s.bounds(),
        }
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        match self {
            Self::Sphere(s) => s.area(),
            Self::Rectangle(s) => s.area(),
            Self::Triangle(s) => s.area(),
        }
    }

    /// Sample a point uniformly by area. The returned pdf is `1 / area`.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    pub fn sample_area(&self, u: &Point2f) -> ShapeSample {
        match self {
            Self::Sphere(s) => s.sample_area(u),
            Self::Rectangle(s) => s.sample_area(u),
            Self::Triangle(s) => s.sample_area(u),
        }
    }

    /// Sample a point visible from `ref_p`. The returned pdf is with respect
    /// to solid angle at `ref_p`. Returns `None` for degenerate samples.
    ///
    /// * `ref_p` - Reference point.
    /// * `u`     - Sample value in [0, 1)^2.
    pub fn sample_solid_angle(&self, ref_p: &Point3f, u: &Point2f) -> Option<ShapeSample> {
        match self {
            Self::Sphere(s) if s.is_outside(ref_p) => Some(s.sample_cone(ref_p, u)),
            _ => {
                let ss = self.sample_area(u);
                let pdf = area_to_solid_angle(ss.pdf, ref_p, &ss.p, &ss.n);
                (pdf > 0.0 && pdf.is_finite()).then_some(ShapeSample { pdf, ..ss })
            }
        }
    }

    /// Returns the solid angle density at `ref_p` of `sample_solid_angle`
    /// producing the point `p` with normal `n`.
    ///
    /// * `ref_p` - Reference point.
    /// * `p`     - Point on the shape.
    /// * `n`     - Surface normal at `p`.
    pub fn pdf_solid_angle(&self, ref_p: &Point3f, p: &Point3f, n: &Normal3f) -> Float {
        match self {
            Self::Sphere(s) if s.is_outside(ref_p) => s.pdf_cone(ref_p),
            _ => {
                let pdf = area_to_solid_angle(1.0 / self.area(), ref_p, p, n);
                if pdf.is_finite() {
                    pdf
                } else {
                    0.0
                }
            }
        }
    }
}

/// Convert an area density at `p` into a solid angle density at `ref_p`.
///
/// * `pdf_area` - Area density.
/// * `ref_p`    - Reference point.
/// * `p`        - Point on the surface.
/// * `n`        - Surface normal at `p`.
pub fn area_to_solid_angle(pdf_area: Float, ref_p: &Point3f, p: &Point3f, n: &Normal3f) -> Float {
    let wi = *p - *ref_p;
    let dist2 = wi.length_squared();
    if dist2 == 0.0 {
        return 0.0;
    }
    let cos = n.abs_dot(&wi) / dist2.sqrt();
    if cos == 0.0 {
        0.0
    } else {
        pdf_area * dist2 / cos
    }
}

/// A shape together with its scene attachments. The attachments are arena
/// ids assigned while the scene is built and never reassigned afterwards.
#[derive(Clone, Debug)]
pub struct Shape {
    /// Geometry.
    pub kind: ShapeKind,

    /// Surface scattering model; `None` means the surface is invisible to
    /// shading and only delimits media.
    pub bsdf: Option<BsdfId>,

    /// Area light attached to the surface.
    pub light: Option<LightId>,

    /// Media on either side of the surface.
    pub medium_interface: MediumInterface,
}

impl Shape {
    /// Create a shape without attachments.
    ///
    /// * `kind` - Geometry.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            bsdf: None,
            light: None,
            medium_interface: MediumInterface::default(),
        }
    }

    /// Returns the shape with the given BSDF.
    ///
    /// * `bsdf` - The BSDF id.
    pub fn with_bsdf(mut self, bsdf: BsdfId) -> Self {
        self.bsdf = Some(bsdf);
        self
    }

    /// Returns the shape with the given medium interface.
    ///
    /// * `mi` - The medium interface.
    pub fn with_medium_interface(mut self, mi: MediumInterface) -> Self {
        self.medium_interface = mi;
        self
    }

    /// Returns true if an area light is attached.
    pub fn is_emitter(&self) -> bool {
        self.light.is_some()
    }
}
