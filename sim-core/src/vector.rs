//! Mutable 2-D vector used for particle state and force accumulation.
//!
//! [`Vector2`] mirrors the usual value-type vector but exposes in-place,
//! chainable operations (`add_in_place`, `scale`, `normalize`, ...) so force
//! elements can accumulate into particle state without temporaries. The
//! arithmetic operators (`+`, `-`, `*`, `/`) are also implemented and are
//! what the integrator uses for its stage combinations.
//!
//! Length-dependent operations are guarded: dividing by a zero scalar
//! resets the vector to `(0, 0)` instead of producing infinities.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use glam::DVec2;
use serde::Deserialize;

/// Distance below which two vectors compare equal and a vector counts as zero.
pub const TOLERANCE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn copy_from(&mut self, v: &Vector2) -> &mut Self {
        self.x = v.x;
        self.y = v.y;
        self
    }

    /// Zeroes both components.
    pub fn clear(&mut self) -> &mut Self {
        self.set(0.0, 0.0)
    }

    /// Writes `v1 + v2` into `self`.
    pub fn add_of(&mut self, v1: &Vector2, v2: &Vector2) -> &mut Self {
        self.x = v1.x + v2.x;
        self.y = v1.y + v2.y;
        self
    }

    /// Writes `v1 - v2` into `self`.
    pub fn sub_of(&mut self, v1: &Vector2, v2: &Vector2) -> &mut Self {
        self.x = v1.x - v2.x;
        self.y = v1.y - v2.y;
        self
    }

    pub fn add_in_place(&mut self, v: &Vector2) -> &mut Self {
        self.x += v.x;
        self.y += v.y;
        self
    }

    pub fn sub_in_place(&mut self, v: &Vector2) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self
    }

    /// Componentwise product.
    pub fn multiply_in_place(&mut self, v: &Vector2) -> &mut Self {
        self.x *= v.x;
        self.y *= v.y;
        self
    }

    pub fn scale(&mut self, s: f64) -> &mut Self {
        self.x *= s;
        self.y *= s;
        self
    }

    /// Divides both components by `s`, or resets to `(0, 0)` when `s` is zero
    /// or NaN.
    pub fn divide_scale(&mut self, s: f64) -> &mut Self {
        if s != 0.0 && !s.is_nan() {
            self.x /= s;
            self.y /= s;
        } else {
            self.clear();
        }
        self
    }

    pub fn negate(&mut self) -> &mut Self {
        self.scale(-1.0)
    }

    #[inline]
    pub fn dot(&self, v: &Vector2) -> f64 {
        self.as_dvec2().dot(v.as_dvec2())
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.as_dvec2().length_squared()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Scales to unit length. A zero vector stays zero.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        self.divide_scale(len)
    }

    #[inline]
    pub fn distance_to_squared(&self, v: &Vector2) -> f64 {
        let dx = self.x - v.x;
        let dy = self.y - v.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance_to(&self, v: &Vector2) -> f64 {
        self.distance_to_squared(v).sqrt()
    }

    pub fn set_length(&mut self, l: f64) -> &mut Self {
        self.normalize().scale(l)
    }

    /// Moves `self` towards `v` by the fraction `t`.
    pub fn lerp(&mut self, v: &Vector2, t: f64) -> &mut Self {
        let x = (v.x - self.x) * t + self.x;
        let y = (v.y - self.y) * t + self.y;
        self.set(x, y)
    }

    /// True when the two vectors are closer than [`TOLERANCE`].
    pub fn equals(&self, v: &Vector2) -> bool {
        self.distance_to(v) < TOLERANCE
    }

    /// True when the length is below [`TOLERANCE`].
    pub fn is_zero(&self) -> bool {
        self.length() < TOLERANCE
    }

    #[inline]
    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Vector2 {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for DVec2 {
    fn from(v: Vector2) -> Self {
        v.as_dvec2()
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

impl Mul<Vector2> for f64 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        Vector2::new(self * v.x, self * v.y)
    }
}

/// Plain division. Unlike [`Vector2::divide_scale`] this is not guarded, so
/// dividing by zero yields non-finite components.
impl Div<f64> for Vector2 {
    type Output = Self;

    fn div(self, s: f64) -> Self {
        Self::new(self.x / s, self.y / s)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.add_in_place(&rhs);
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.sub_in_place(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn new_and_default_hold_components() {
        let v = Vector2::default();
        assert_eq!(v, Vector2::ZERO);

        let v = Vector2::new(3.0, 2.0);
        assert_eq!(v.x, 3.0);
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn set_copy_and_clear() {
        let mut v = Vector2::new(3.0, 2.0);
        v.set(5.0, 6.0);
        assert_eq!(v, Vector2::new(5.0, 6.0));

        let mut w = Vector2::ZERO;
        w.copy_from(&v);
        assert_eq!(w, Vector2::new(5.0, 6.0));

        w.clear();
        assert_eq!(w, Vector2::ZERO);
    }

    #[test]
    fn binary_ops_write_into_self() {
        let v1 = Vector2::new(2.0, 3.0);
        let v2 = Vector2::new(3.0, 6.0);
        let mut v3 = Vector2::ZERO;

        v3.add_of(&v1, &v2);
        assert_eq!(v3, Vector2::new(5.0, 9.0));

        v3.sub_of(&v1, &v2);
        assert_eq!(v3, Vector2::new(-1.0, -3.0));
    }

    #[test]
    fn in_place_ops_chain() {
        let mut v = Vector2::new(2.0, 3.0);
        v.add_in_place(&Vector2::new(3.0, 6.0))
            .sub_in_place(&Vector2::new(1.0, 1.0))
            .multiply_in_place(&Vector2::new(2.0, 0.5))
            .scale(2.0);
        assert_eq!(v, Vector2::new(16.0, 8.0));

        v.negate();
        assert_eq!(v, Vector2::new(-16.0, -8.0));
    }

    #[test]
    fn divide_scale_by_zero_resets_to_origin() {
        let mut v = Vector2::new(2.0, 4.0);
        v.divide_scale(0.0);
        assert_eq!(v, Vector2::ZERO);
        assert!(v.x.is_finite() && v.y.is_finite());

        let mut v = Vector2::new(2.0, 4.0);
        v.divide_scale(2.0);
        assert_eq!(v, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn divide_scale_by_nan_resets_to_origin() {
        let mut v = Vector2::new(1.0, 2.0);
        v.divide_scale(f64::NAN);
        assert_eq!(v, Vector2::ZERO);

        // infinity is a real divisor
        let mut v = Vector2::new(1.0, 2.0);
        v.divide_scale(f64::INFINITY);
        assert_eq!(v, Vector2::ZERO);
        assert!(v.x.is_sign_positive());
    }

    #[test]
    fn length_and_normalize_match_reference_values() {
        let v = Vector2::new(2.0, 4.0);
        assert_relative_eq!(v.length(), 4.47213595499958, epsilon = 1e-12);

        let mut n = v;
        n.normalize();
        assert_relative_eq!(n.x, 0.4472135954999579, epsilon = 1e-12);
        assert_relative_eq!(n.y, 0.8944271909999159, epsilon = 1e-12);
    }

    #[test]
    fn normalize_zero_vector_stays_zero() {
        let mut v = Vector2::ZERO;
        v.normalize();
        assert_eq!(v, Vector2::ZERO);

        v.set_length(5.0);
        assert_eq!(v, Vector2::ZERO);
    }

    #[test]
    fn set_length_rescales() {
        let mut v = Vector2::new(3.0, 4.0);
        v.set_length(10.0);
        assert_relative_eq!(v.x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn distances_and_dot() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(4.0, 5.0);
        assert_eq!(a.distance_to_squared(&b), 25.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(a.dot(&b), 9.0);
    }

    #[test]
    fn lerp_moves_fraction_of_the_way() {
        let mut v = Vector2::new(0.0, 0.0);
        v.lerp(&Vector2::new(10.0, -4.0), 0.25);
        assert_eq!(v, Vector2::new(2.5, -1.0));
    }

    #[test]
    fn equals_uses_tolerance() {
        let a = Vector2::new(5.0, 5.0);
        let mut b = Vector2::new(5.0, 5.0);
        assert!(a.equals(&b));

        b.set(5.0, 5.0 + 1e-5);
        assert!(a.equals(&b));

        b.set(1.0, 1.0);
        assert!(!a.equals(&b));
    }

    #[test]
    fn is_zero_uses_tolerance() {
        assert!(Vector2::ZERO.is_zero());
        assert!(Vector2::new(5e-5, 0.0).is_zero());
        assert!(!Vector2::new(1e-3, 0.0).is_zero());
    }

    #[test]
    fn operator_division_is_unguarded() {
        let v = Vector2::new(1.0, -1.0) / 0.0;
        assert!(v.x.is_infinite() && v.y.is_infinite());
    }

    #[test]
    fn dvec2_conversion_roundtrips() {
        let v = Vector2::new(1.5, -2.5);
        let d: DVec2 = v.into();
        assert_eq!(d, DVec2::new(1.5, -2.5));
        assert_eq!(Vector2::from(d), v);
    }

    proptest! {
        #[test]
        fn length_squared_is_sum_of_squares(x in -1e6f64..1e6, y in -1e6f64..1e6) {
            let v = Vector2::new(x, y);
            prop_assert_eq!(v.length_squared(), x * x + y * y);
        }

        #[test]
        fn normalized_nonzero_vectors_have_unit_length(x in -1e3f64..1e3, y in -1e3f64..1e3) {
            prop_assume!(x.abs() > 1e-3 || y.abs() > 1e-3);
            let mut v = Vector2::new(x, y);
            v.normalize();
            prop_assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }
}
