//! Aggregate

use crate::geometry::*;
use crate::scene::ShapeId;
use crate::shape::*;

/// Ray-intersection service over the scene shapes. Implementations are
/// built once and only read afterwards, so they can be shared by all render
/// workers.
pub trait Aggregate: Send + Sync {
    /// Returns the world space bounds of all shapes.
    fn bounds(&self) -> Bounds3f;

    /// Returns the nearest hit within the ray's parametric range.
    ///
    /// * `shapes` - The scene shapes the aggregate was built over.
    /// * `ray`    - The ray.
    fn intersect(&self, shapes: &[Shape], ray: &Ray) -> Option<(ShapeId, ShapeHit)>;

    /// Returns true if anything is hit within the ray's parametric range.
    ///
    /// * `shapes` - The scene shapes the aggregate was built over.
    /// * `ray`    - The ray.
    fn intersect_p(&self, shapes: &[Shape], ray: &Ray) -> bool;

    /// Returns the aggregate name.
    fn name(&self) -> &'static str;
}

/// Tests every shape in turn. Used when no acceleration structure has been
/// configured.
#[derive(Clone, Debug)]
pub struct LinearAggregate {
    /// Bounds of all shapes.
    bounds: Bounds3f,
}

impl LinearAggregate {
    /// Create a new `LinearAggregate`.
    ///
    /// * `shapes` - The scene shapes.
    pub fn new(shapes: &[Shape]) -> Self {
        let bounds = shapes
            .iter()
            .fold(Bounds3f::empty(), |b, s| b.union(&s.kind.bounds()));
        Self { bounds }
    }
}

impl Aggregate for LinearAggregate {
    fn bounds(&self) -> Bounds3f {
        self.bounds
    }

    fn intersect(&self, shapes: &[Shape], ray: &Ray) -> Option<(ShapeId, ShapeHit)> {
        let mut r = *ray;
        let mut nearest = None;
        for (i, shape) in shapes.iter().enumerate() {
            if let Some(hit) = shape.kind.intersect(&r) {
                r.t_max = hit.t;
                nearest = Some((ShapeId::from(i), hit));
            }
        }
        nearest
    }

    fn intersect_p(&self, shapes: &[Shape], ray: &Ray) -> bool {
        shapes.iter().any(|s| s.kind.intersect_p(ray))
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
