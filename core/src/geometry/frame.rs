//! Orthonormal shading frames

use super::vector3::*;
use crate::base::*;

/// An orthonormal basis `(s, t, n)`. Local coordinates put `n` on the
/// z-axis, which is the convention used by every BSDF and phase function.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// First tangent.
    pub s: Vector3f,

    /// Second tangent.
    pub t: Vector3f,

    /// Normal.
    pub n: Normal3f,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            s: Vector3f::new(1.0, 0.0, 0.0),
            t: Vector3f::new(0.0, 1.0, 0.0),
            n: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

impl Frame {
    /// Builds a frame around a unit normal.
    ///
    /// * `n` - The normal.
    pub fn from_normal(n: &Normal3f) -> Self {
        let (s, t) = coordinate_system(n);
        Self { s, t, n: *n }
    }

    /// Builds a frame from a normal and a preferred first tangent which
    /// is orthogonalized against the normal.
    ///
    /// * `n`    - The normal.
    /// * `dpdu` - The preferred tangent.
    pub fn from_normal_tangent(n: &Normal3f, dpdu: &Vector3f) -> Self {
        let s = *dpdu - *n * n.dot(dpdu);
        if s.length_squared() < 1e-12 {
            return Self::from_normal(n);
        }
        let s = s.normalize();
        Self { s, t: n.cross(&s), n: *n }
    }

    /// Camera style basis: `n` points along `forward`, `t` is as close to
    /// `up` as possible.
    ///
    /// * `forward` - Viewing direction.
    /// * `up`      - Up vector.
    pub fn look_at(forward: &Vector3f, up: &Vector3f) -> Self {
        let n = forward.normalize();
        let mut s = up.cross(&n);
        if s.length_squared() < 1e-12 {
            return Self::from_normal(&n);
        }
        s = s.normalize();
        let t = n.cross(&s);
        Self { s, t, n }
    }

    /// World to local coordinates.
    ///
    /// * `v` - The world-space vector.
    #[inline(always)]
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.s), v.dot(&self.t), v.dot(&self.n))
    }

    /// Local to world coordinates.
    ///
    /// * `v` - The local vector.
    #[inline(always)]
    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.s * v.x + self.t * v.y + self.n * v.z
    }
}

/// Construct two tangents completing an orthonormal basis around a unit
/// vector (Duff et al. branchless construction).
///
/// * `n` - The unit vector.
pub fn coordinate_system(n: &Vector3f) -> (Vector3f, Vector3f) {
    let sign = 1.0_f32.copysign(n.z);
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;
    (
        Vector3f::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x),
        Vector3f::new(b, sign + n.y * n.y * a, -n.y),
    )
}

/// Cosine of the polar angle of a local direction.
#[inline(always)]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Absolute cosine of the polar angle of a local direction.
#[inline(always)]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

/// Squared sine of the polar angle of a local direction.
#[inline(always)]
pub fn sin2_theta(w: &Vector3f) -> Float {
    (1.0 - w.z * w.z).max(0.0)
}

/// Squared tangent of the polar angle of a local direction.
#[inline(always)]
pub fn tan2_theta(w: &Vector3f) -> Float {
    sin2_theta(w) / (w.z * w.z)
}

/// Returns true if two local directions lie in the same hemisphere.
#[inline(always)]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Mirror `wo` about the local normal.
#[inline(always)]
pub fn reflect(wo: &Vector3f) -> Vector3f {
    Vector3f::new(-wo.x, -wo.y, wo.z)
}

/// Mirror `wo` about an arbitrary unit vector.
///
/// * `wo` - Direction to reflect.
/// * `n`  - The mirror normal.
#[inline(always)]
pub fn reflect_about(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -*wo + *n * (2.0 * wo.dot(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn local_world_round_trip(
            nx in -1.0..1.0f32,
            ny in -1.0..1.0f32,
            nz in -1.0..1.0f32,
            vx in -1.0..1.0f32,
            vy in -1.0..1.0f32,
            vz in -1.0..1.0f32,
        ) {
            let n = Vector3f::new(nx, ny, nz);
            prop_assume!(n.length() > 0.1);
            let f = Frame::from_normal(&n.normalize());
            let v = Vector3f::new(vx, vy, vz);
            let w = f.to_world(&f.to_local(&v));
            prop_assert!(approx_eq!(Float, w.x, v.x, epsilon = 1e-4));
            prop_assert!(approx_eq!(Float, w.y, v.y, epsilon = 1e-4));
            prop_assert!(approx_eq!(Float, w.z, v.z, epsilon = 1e-4));
        }
    }

    #[test]
    fn look_at_points_normal_forward() {
        let f = Frame::look_at(&Vector3f::new(0.0, 0.0, -2.0), &Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(f.n, Vector3f::new(0.0, 0.0, -1.0));
        assert!(approx_eq!(Float, f.t.y, 1.0, epsilon = 1e-6));
    }
}
