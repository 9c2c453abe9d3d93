//! Rays

use super::vector3::*;
use crate::base::*;
use crate::scene::MediumId;
use std::fmt;

/// A semi-infinite line with a valid parametric range `[t_min, t_max]`.
///
/// The inverse direction is cached for slab tests and must be refreshed by
/// calling `update()` whenever `d` is changed in place.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Component-wise reciprocal of `d`.
    pub inv_d: Vector3f,

    /// Minimum parametric distance.
    pub t_min: Float,

    /// Maximum parametric distance.
    pub t_max: Float,

    /// Time value.
    pub time: Float,

    /// Medium containing the ray origin.
    pub medium: Option<MediumId>,
}

impl Ray {
    /// Creates a ray over `[RAY_EPSILON, ∞)`.
    ///
    /// * `o` - Origin.
    /// * `d` - Direction.
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Self::segment(o, d, RAY_EPSILON, INFINITY)
    }

    /// Creates a ray over `[t_min, t_max]`.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn segment(o: Point3f, d: Vector3f, t_min: Float, t_max: Float) -> Self {
        Self {
            o,
            d,
            inv_d: d.recip(),
            t_min,
            t_max,
            time: 0.0,
            medium: None,
        }
    }

    /// Returns the ray with the given medium.
    ///
    /// * `medium` - Medium containing the origin.
    pub fn with_medium(mut self, medium: Option<MediumId>) -> Self {
        self.medium = medium;
        self
    }

    /// Recompute the cached inverse direction.
    pub fn update(&mut self) {
        self.inv_d = self.d.recip();
    }

    /// Returns the point at parametric distance `t`.
    ///
    /// * `t` - Parametric distance.
    #[inline(always)]
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns true if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_max.is_nan()
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[o={}, d={}, t=[{}, {}]]",
            self.o, self.d, self.t_min, self.t_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_refreshes_inverse_direction() {
        let mut r = Ray::new(Point3f::ZERO, Vector3f::new(1.0, 2.0, 4.0));
        assert_eq!(r.inv_d, Vector3f::new(1.0, 0.5, 0.25));
        r.d = Vector3f::new(2.0, 4.0, 8.0);
        r.update();
        assert_eq!(r.inv_d, Vector3f::new(0.5, 0.25, 0.125));
    }

    #[test]
    fn at_walks_along_direction() {
        let r = Ray::new(Point3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(r.at(3.0), Point3f::new(1.0, 3.0, 0.0));
    }
}
