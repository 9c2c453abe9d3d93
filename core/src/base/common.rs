//! Common

use num_traits::Num;
use std::ops::{Add, Mul};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// Offset used to shrink shadow ray segments so they stop short of the light.
pub const SHADOW_EPSILON: Float = 0.0001;

/// Minimum parametric distance for rays spawned off a surface.
pub const RAY_EPSILON: Float = 1e-4;

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Clamps a value to the range [low, high].
///
/// * `val`  - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd + Copy,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Square root that returns 0 for (slightly) negative inputs caused by
/// round-off.
///
/// * `x` - The value.
#[inline(always)]
pub fn safe_sqrt(x: Float) -> Float {
    x.max(0.0).sqrt()
}

/// Arc cosine with the argument clamped to [-1, 1].
///
/// * `x` - The value.
#[inline(always)]
pub fn safe_acos(x: Float) -> Float {
    clamp(x, -1.0, 1.0).acos()
}

/// Returns gamma corrected values for use in 8-bit images.
///
/// * `value` - Value to correct.
#[inline(always)]
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Returns linear values for sRGB encoded 8-bit image values in [0, 1].
///
/// * `value` - Value to convert.
#[inline(always)]
pub fn inverse_gamma_correct(value: Float) -> Float {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert from angle expressed in degrees to radians.
///
/// * `deg` - Angle in degrees.
#[inline(always)]
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Bisection search that returns the largest index `i` in `[0, size - 2]`
/// for which `pred(i)` holds. The predicate must be monotonic: true for a
/// prefix of indices and false afterwards.
///
/// * `size` - Number of entries.
/// * `pred` - The predicate.
pub fn find_interval<P>(size: usize, pred: P) -> usize
where
    P: Fn(usize) -> bool,
{
    if size < 2 {
        return 0;
    }

    let mut first = 0;
    let mut len = size;
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }
    clamp(first as isize - 1, 0, size as isize - 2) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn find_interval_brackets_value() {
        let v = [0.0, 0.25, 0.5, 0.75, 1.0];
        assert_eq!(find_interval(v.len(), |i| v[i] <= 0.3), 1);
        assert_eq!(find_interval(v.len(), |i| v[i] <= 0.0), 0);
        assert_eq!(find_interval(v.len(), |i| v[i] <= 1.0), 3);
        assert_eq!(find_interval(v.len(), |i| v[i] <= -1.0), 0);
    }

    #[test]
    fn clamp_and_lerp() {
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-2, 0, 1), 0);
        assert!(approx_eq!(Float, lerp(0.25, 0.0, 4.0), 1.0, ulps = 2));
    }

    #[test]
    fn safe_functions_tolerate_round_off() {
        assert_eq!(safe_sqrt(-1e-7), 0.0);
        assert!(approx_eq!(Float, safe_acos(1.0000001), 0.0, epsilon = 1e-6));
    }
}
