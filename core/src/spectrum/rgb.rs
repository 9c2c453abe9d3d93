//! RGB Spectrum

use crate::base::*;
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// Number of samples in a `Spectrum`.
pub const RGB_SAMPLES: usize = 3;

/// Linear RGB tristimulus radiance value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    /// The red, green and blue components.
    c: [Float; RGB_SAMPLES],
}

impl Spectrum {
    /// Black.
    pub const ZERO: Self = Self::new(0.0);

    /// White.
    pub const ONE: Self = Self::new(1.0);

    /// Create a spectrum with every component set to `v`.
    ///
    /// * `v` - The value.
    pub const fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Create a spectrum from components.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub const fn rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the components.
    pub fn to_rgb(&self) -> [Float; RGB_SAMPLES] {
        self.c
    }

    /// Returns true if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if every component is exactly zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns true if every component is finite and non-negative. Samples
    /// failing this check must not be accumulated.
    pub fn is_valid(&self) -> bool {
        self.c.iter().all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Returns the largest component.
    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }

    /// Returns the average of the components.
    pub fn average(&self) -> Float {
        (self.c[0] + self.c[1] + self.c[2]) / 3.0
    }

    /// Returns the luminance (the y-coefficient of XYZ colour).
    pub fn y(&self) -> Float {
        0.212671 * self.c[0] + 0.715160 * self.c[1] + 0.072169 * self.c[2]
    }

    /// Returns `e^v` per component.
    pub fn exp(&self) -> Self {
        self.map(|v| v.exp())
    }

    /// Returns the square root per component.
    pub fn sqrt(&self) -> Self {
        self.map(|v| v.sqrt())
    }

    /// Clamps each component to `[low, high]`.
    ///
    /// * `low`  - Lower bound.
    /// * `high` - Upper bound.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        self.map(|v| clamp(v, low, high))
    }

    /// Applies a function per component.
    ///
    /// * `f` - The function.
    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self::rgb(f(self.c[0]), f(self.c[1]), f(self.c[2]))
    }

    /// Divides per component, treating `x / 0` as 0.
    ///
    /// * `other` - The divisor.
    pub fn safe_div(&self, other: &Self) -> Self {
        let mut r = *self;
        for i in 0..RGB_SAMPLES {
            r.c[i] = if other.c[i] != 0.0 {
                self.c[i] / other.c[i]
            } else {
                0.0
            };
        }
        r
    }
}

impl Add for Spectrum {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::rgb(
            self.c[0] + other.c[0],
            self.c[1] + other.c[1],
            self.c[2] + other.c[2],
        )
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Spectrum {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::rgb(
            self.c[0] - other.c[0],
            self.c[1] - other.c[1],
            self.c[2] - other.c[2],
        )
    }
}

impl SubAssign for Spectrum {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul for Spectrum {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self::rgb(
            self.c[0] * other.c[0],
            self.c[1] * other.c[1],
            self.c[2] * other.c[2],
        )
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for Spectrum {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        self.map(|v| v * f)
    }
}

impl Mul<Spectrum> for Float {
    type Output = Spectrum;

    fn mul(self, s: Spectrum) -> Self::Output {
        s * self
    }
}

impl MulAssign<Float> for Spectrum {
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div for Spectrum {
    type Output = Self;

    fn div(self, other: Self) -> Self::Output {
        Self::rgb(
            self.c[0] / other.c[0],
            self.c[1] / other.c[1],
            self.c[2] / other.c[2],
        )
    }
}

impl Div<Float> for Spectrum {
    type Output = Self;

    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl DivAssign<Float> for Spectrum {
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Neg for Spectrum {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.map(|v| -v)
    }
}

impl Index<usize> for Spectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl IndexMut<usize> for Spectrum {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.c[i]
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn validity_checks() {
        assert!(Spectrum::ONE.is_valid());
        assert!(Spectrum::ZERO.is_black());
        assert!(!Spectrum::rgb(1.0, -0.1, 0.0).is_valid());
        assert!(!Spectrum::rgb(Float::NAN, 0.0, 0.0).is_valid());
        assert!(Spectrum::rgb(Float::NAN, 0.0, 0.0).has_nans());
        assert!(!Spectrum::rgb(Float::INFINITY, 0.0, 0.0).is_valid());
    }

    #[test]
    fn white_has_unit_luminance() {
        assert!(approx_eq!(Float, Spectrum::ONE.y(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn safe_div_ignores_zero_divisor() {
        let s = Spectrum::rgb(1.0, 2.0, 3.0).safe_div(&Spectrum::rgb(2.0, 0.0, 3.0));
        assert_eq!(s, Spectrum::rgb(0.5, 0.0, 1.0));
    }

    proptest! {
        #[test]
        fn max_component_bounds_every_channel(
            r in 0.0..10.0f32,
            g in 0.0..10.0f32,
            b in 0.0..10.0f32,
        ) {
            let s = Spectrum::rgb(r, g, b);
            let m = s.max_component_value();
            prop_assert!(m >= r && m >= g && m >= b);
            prop_assert!(s.average() <= m);
        }
    }
}
