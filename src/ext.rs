//! Extended-precision real scalar used by the root finder.
//!
//! [`Ext`] is a double-double: an unevaluated sum `hi + lo` of two `f64`
//! values with `|lo| <= ulp(hi) / 2`, giving roughly 106 bits of significand.
//! That comfortably exceeds the 64-bit significand of an x87 long double,
//! which the convergence thresholds in [`crate::roots`] are calibrated against.
//!
//! Only the arithmetic the polynomial solvers need is provided: the four
//! field operations, negation, `abs`, `sqrt`, `cbrt`, ordering, and
//! conversion to and from `f64`.
//!
//! # Examples
//!
//! ```
//! use iirkit::Ext;
//!
//! let third = Ext::from(1.0) / Ext::from(3.0);
//! let one = third * Ext::from(3.0);
//! assert!((one - Ext::from(1.0)).abs() < Ext::from(1e-30));
//! ```

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

/// Double-double extended-precision real number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ext {
    hi: f64,
    lo: f64,
}

// Error-free transformations. Non-finite sums carry no tail.

#[inline]
fn two_sum(a: f64, b: f64) -> Ext {
    let s = a + b;
    if !s.is_finite() {
        return Ext { hi: s, lo: 0.0 };
    }
    let bb = s - a;
    let e = (a - (s - bb)) + (b - bb);
    Ext { hi: s, lo: e }
}

#[inline]
fn quick_two_sum(a: f64, b: f64) -> Ext {
    let s = a + b;
    if !s.is_finite() {
        return Ext { hi: s, lo: 0.0 };
    }
    Ext {
        hi: s,
        lo: b - (s - a),
    }
}

#[inline]
fn two_prod(a: f64, b: f64) -> Ext {
    let p = a * b;
    if !p.is_finite() {
        return Ext { hi: p, lo: 0.0 };
    }
    Ext {
        hi: p,
        lo: a.mul_add(b, -p),
    }
}

impl Ext {
    /// Additive identity.
    pub const ZERO: Ext = Ext { hi: 0.0, lo: 0.0 };
    /// Multiplicative identity.
    pub const ONE: Ext = Ext { hi: 1.0, lo: 0.0 };

    /// Leading (most significant) component.
    #[inline]
    pub fn hi(self) -> f64 {
        self.hi
    }

    /// Trailing correction term.
    #[inline]
    pub fn lo(self) -> f64 {
        self.lo
    }

    /// Round to the nearest `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.hi + self.lo
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.hi.is_finite() && self.lo.is_finite()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.hi == 0.0
    }

    #[inline]
    pub fn is_sign_negative(self) -> bool {
        self.hi < 0.0 || (self.hi == 0.0 && self.lo < 0.0)
    }

    #[inline]
    pub fn abs(self) -> Ext {
        if self.is_sign_negative() {
            -self
        } else {
            self
        }
    }

    /// Reciprocal `1 / self`.
    #[inline]
    pub fn recip(self) -> Ext {
        Ext::ONE / self
    }

    /// Square root. Negative input yields NaN.
    ///
    /// One Newton correction on top of the `f64` estimate doubles the
    /// number of correct bits.
    pub fn sqrt(self) -> Ext {
        if self.hi == 0.0 {
            return Ext::ZERO;
        }
        if self.hi < 0.0 {
            return Ext::from(f64::NAN);
        }
        let x = self.hi.sqrt();
        let residual = self - two_prod(x, x);
        quick_two_sum(x, residual.hi / (2.0 * x))
    }

    /// Real cube root (sign-preserving).
    pub fn cbrt(self) -> Ext {
        if self.hi == 0.0 {
            return Ext::ZERO;
        }
        let y = Ext::from(self.hi.cbrt());
        // y ← y − (y³ − a) / (3y²)
        let y2 = y * y;
        y - (y2 * y - self) / (y2 * 3.0)
    }

    /// Integer power by repeated squaring.
    pub fn powi(self, n: i32) -> Ext {
        let mut base = if n < 0 { self.recip() } else { self };
        let mut e = n.unsigned_abs();
        let mut acc = Ext::ONE;
        while e > 0 {
            if e & 1 == 1 {
                acc *= base;
            }
            base *= base;
            e >>= 1;
        }
        acc
    }

    /// The larger of two values (NaN-propagation is not attempted).
    #[inline]
    pub fn max(self, other: Ext) -> Ext {
        if other > self {
            other
        } else {
            self
        }
    }
}

impl From<f64> for Ext {
    #[inline]
    fn from(x: f64) -> Self {
        Ext { hi: x, lo: 0.0 }
    }
}

impl From<Ext> for f64 {
    #[inline]
    fn from(x: Ext) -> Self {
        x.to_f64()
    }
}

impl PartialOrd for Ext {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi) {
            Some(Ordering::Equal) => self.lo.partial_cmp(&other.lo),
            ord => ord,
        }
    }
}

impl Neg for Ext {
    type Output = Ext;
    #[inline]
    fn neg(self) -> Ext {
        Ext {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Add for Ext {
    type Output = Ext;
    #[inline]
    fn add(self, rhs: Ext) -> Ext {
        let s = two_sum(self.hi, rhs.hi);
        let t = two_sum(self.lo, rhs.lo);
        let s = quick_two_sum(s.hi, s.lo + t.hi);
        quick_two_sum(s.hi, s.lo + t.lo)
    }
}

impl Sub for Ext {
    type Output = Ext;
    #[inline]
    fn sub(self, rhs: Ext) -> Ext {
        self + (-rhs)
    }
}

impl Mul for Ext {
    type Output = Ext;
    #[inline]
    fn mul(self, rhs: Ext) -> Ext {
        let p = two_prod(self.hi, rhs.hi);
        quick_two_sum(p.hi, p.lo + (self.hi * rhs.lo + self.lo * rhs.hi))
    }
}

impl Div for Ext {
    type Output = Ext;
    fn div(self, rhs: Ext) -> Ext {
        let q1 = self.hi / rhs.hi;
        if !q1.is_finite() || rhs.hi == 0.0 {
            return Ext::from(q1);
        }
        let r = self - rhs * q1;
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * q2;
        let q3 = r.hi / rhs.hi;
        quick_two_sum(q1, q2) + Ext::from(q3)
    }
}

impl Mul<f64> for Ext {
    type Output = Ext;
    #[inline]
    fn mul(self, rhs: f64) -> Ext {
        let p = two_prod(self.hi, rhs);
        quick_two_sum(p.hi, p.lo + self.lo * rhs)
    }
}

impl Div<f64> for Ext {
    type Output = Ext;
    #[inline]
    fn div(self, rhs: f64) -> Ext {
        self / Ext::from(rhs)
    }
}

impl Add<f64> for Ext {
    type Output = Ext;
    #[inline]
    fn add(self, rhs: f64) -> Ext {
        self + Ext::from(rhs)
    }
}

impl Sub<f64> for Ext {
    type Output = Ext;
    #[inline]
    fn sub(self, rhs: f64) -> Ext {
        self - Ext::from(rhs)
    }
}

impl AddAssign for Ext {
    #[inline]
    fn add_assign(&mut self, rhs: Ext) {
        *self = *self + rhs;
    }
}

impl SubAssign for Ext {
    #[inline]
    fn sub_assign(&mut self, rhs: Ext) {
        *self = *self - rhs;
    }
}

impl MulAssign for Ext {
    #[inline]
    fn mul_assign(&mut self, rhs: Ext) {
        *self = *self * rhs;
    }
}

impl MulAssign<f64> for Ext {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl DivAssign for Ext {
    #[inline]
    fn div_assign(&mut self, rhs: Ext) {
        *self = *self / rhs;
    }
}

impl Zero for Ext {
    #[inline]
    fn zero() -> Self {
        Ext::ZERO
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self.hi == 0.0
    }
}

impl One for Ext {
    #[inline]
    fn one() -> Self {
        Ext::ONE
    }
}

impl core::fmt::Display for Ext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:e}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_times_three_is_exact_to_double_double() {
        let third = Ext::from(1.0) / Ext::from(3.0);
        let err = (third * 3.0 - Ext::ONE).abs();
        assert!(err.to_f64() < 1e-31, "err = {}", err);
        // The tail carries information an f64 cannot hold
        assert!(third.lo() != 0.0);
    }

    #[test]
    fn sqrt_two_squared() {
        let r = Ext::from(2.0).sqrt();
        let err = (r * r - Ext::from(2.0)).abs();
        assert!(err.to_f64() < 1e-30);
        assert_eq!(Ext::ZERO.sqrt(), Ext::ZERO);
        assert!(!Ext::from(-1.0).sqrt().is_finite());
    }

    #[test]
    fn cbrt_recovers_cube() {
        for &x in &[27.0, -8.0, 0.125, 3.0] {
            let c = Ext::from(x).cbrt();
            let err = (c * c * c - Ext::from(x)).abs();
            assert!(err.to_f64() < 1e-28 * x.abs(), "x = {}", x);
        }
    }

    #[test]
    fn small_addend_survives() {
        let big = Ext::from(1.0);
        let tiny = Ext::from(1e-20);
        let sum = big + tiny;
        assert_eq!(sum.hi(), 1.0);
        assert_eq!((sum - big).to_f64(), 1e-20);
    }

    #[test]
    fn ordering_uses_tail() {
        let a = Ext::ONE + Ext::from(1e-25);
        assert!(a > Ext::ONE);
        assert!(-a < -Ext::ONE);
        assert!(Ext::from(f64::NAN).partial_cmp(&Ext::ONE).is_none());
    }

    #[test]
    fn powi_matches_repeated_multiplication() {
        let x = Ext::from(1.5);
        assert_eq!(x.powi(3), x * x * x);
        let inv = x.powi(-2) * x * x;
        assert!((inv - Ext::ONE).abs().to_f64() < 1e-30);
        assert_eq!(x.powi(0), Ext::ONE);
    }

    #[test]
    fn overflow_stays_infinite() {
        let huge = Ext::from(1e300) * Ext::from(1e300);
        assert!(!huge.is_finite());
        assert!(huge > Ext::from(1e200));
    }
}
