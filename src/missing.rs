//! Per-type "missing data" sentinels and the arithmetic used by the
//! element-wise operators.
//!
//! | type              | sentinel                     | propagated value        |
//! |-------------------|------------------------------|-------------------------|
//! | `i16`/`i32`/`i64` | the type's minimum value     | the sentinel            |
//! | `f32`/`f64`       | NaN                          | NaN                     |
//! | `Complex<_>`      | real or imaginary part NaN   | first invalid operand   |
//! | `bool`            | none                         | operator always runs    |
//!
//! Sentinels are ordinary values, not `Option`: they flow through arithmetic
//! without raising.

use num_complex::Complex;
use num_traits::Float;

/// Element types with a reserved "missing" value.
pub trait Missing: Copy {
    /// Whether this type reserves a sentinel at all.
    const HAS_SENTINEL: bool;

    /// The reserved marker. Types without a sentinel return an ordinary
    /// value that is never produced by propagation.
    fn missing_value() -> Self;

    /// Whether `self` is the missing marker.
    fn is_missing(&self) -> bool;

    /// Value to write when an operator is short-circuited, or `None` when
    /// both operands are valid and the operator must run.
    #[inline]
    fn propagate(a: Self, b: Self) -> Option<Self> {
        if a.is_missing() || b.is_missing() {
            Some(Self::missing_value())
        } else {
            None
        }
    }
}

macro_rules! impl_missing_int {
    ($($t:ty),*) => {
        $(
            impl Missing for $t {
                const HAS_SENTINEL: bool = true;

                #[inline(always)]
                fn missing_value() -> Self { <$t>::MIN }

                #[inline(always)]
                fn is_missing(&self) -> bool { *self == <$t>::MIN }
            }
        )*
    };
}

macro_rules! impl_missing_float {
    ($($t:ty),*) => {
        $(
            impl Missing for $t {
                const HAS_SENTINEL: bool = true;

                #[inline(always)]
                fn missing_value() -> Self { <$t>::NAN }

                #[inline(always)]
                fn is_missing(&self) -> bool { self.is_nan() }
            }
        )*
    };
}

impl_missing_int!(i16, i32, i64);
impl_missing_float!(f32, f64);

impl Missing for bool {
    const HAS_SENTINEL: bool = false;

    #[inline(always)]
    fn missing_value() -> Self {
        false
    }

    #[inline(always)]
    fn is_missing(&self) -> bool {
        false
    }

    #[inline(always)]
    fn propagate(_a: Self, _b: Self) -> Option<Self> {
        None
    }
}

impl<T: Float> Missing for Complex<T> {
    const HAS_SENTINEL: bool = true;

    #[inline]
    fn missing_value() -> Self {
        Complex::new(T::nan(), T::nan())
    }

    #[inline]
    fn is_missing(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    /// Returns the first invalid operand unchanged rather than a fresh
    /// NaN pair. Kept for compatibility with existing data pipelines.
    #[inline]
    fn propagate(a: Self, b: Self) -> Option<Self> {
        if a.is_missing() {
            Some(a)
        } else if b.is_missing() {
            Some(b)
        } else {
            None
        }
    }
}

/// Binary arithmetic evaluated once both operands passed the missing check.
///
/// Integer arithmetic wraps on overflow. Integer division by zero (and
/// `MIN / -1`) yields the missing sentinel. Integer `pow` is evaluated in
/// `f64` and truncated back, so negative exponents give `0`, `1` or `-1`.
pub trait Arithmetic: Missing {
    fn add_elem(self, rhs: Self) -> Self;
    fn sub_elem(self, rhs: Self) -> Self;
    fn mul_elem(self, rhs: Self) -> Self;
    fn div_elem(self, rhs: Self) -> Self;
    fn pow_elem(self, rhs: Self) -> Self;
}

macro_rules! impl_arithmetic_int {
    ($($t:ty),*) => {
        $(
            impl Arithmetic for $t {
                #[inline(always)]
                fn add_elem(self, rhs: Self) -> Self { self.wrapping_add(rhs) }
                #[inline(always)]
                fn sub_elem(self, rhs: Self) -> Self { self.wrapping_sub(rhs) }
                #[inline(always)]
                fn mul_elem(self, rhs: Self) -> Self { self.wrapping_mul(rhs) }
                #[inline(always)]
                fn div_elem(self, rhs: Self) -> Self {
                    self.checked_div(rhs).unwrap_or(<$t>::MIN)
                }
                #[inline]
                fn pow_elem(self, rhs: Self) -> Self {
                    (self as f64).powf(rhs as f64) as $t
                }
            }
        )*
    };
}

macro_rules! impl_arithmetic_float {
    ($($t:ty),*) => {
        $(
            impl Arithmetic for $t {
                #[inline(always)]
                fn add_elem(self, rhs: Self) -> Self { self + rhs }
                #[inline(always)]
                fn sub_elem(self, rhs: Self) -> Self { self - rhs }
                #[inline(always)]
                fn mul_elem(self, rhs: Self) -> Self { self * rhs }
                #[inline(always)]
                fn div_elem(self, rhs: Self) -> Self { self / rhs }
                #[inline(always)]
                fn pow_elem(self, rhs: Self) -> Self { self.powf(rhs) }
            }
        )*
    };
}

impl_arithmetic_int!(i16, i32, i64);
impl_arithmetic_float!(f32, f64);

impl<T: Float> Arithmetic for Complex<T> {
    #[inline(always)]
    fn add_elem(self, rhs: Self) -> Self {
        self + rhs
    }
    #[inline(always)]
    fn sub_elem(self, rhs: Self) -> Self {
        self - rhs
    }
    #[inline(always)]
    fn mul_elem(self, rhs: Self) -> Self {
        self * rhs
    }
    #[inline(always)]
    fn div_elem(self, rhs: Self) -> Self {
        self / rhs
    }
    #[inline]
    fn pow_elem(self, rhs: Self) -> Self {
        self.powc(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_int_sentinel() {
        assert!(i32::MIN.is_missing());
        assert!(!0i32.is_missing());
        assert_eq!(i32::propagate(3, i32::MIN), Some(i32::MIN));
        assert_eq!(i16::propagate(i16::MIN, 2), Some(i16::MIN));
        assert_eq!(i64::propagate(1, 2), None);
    }

    #[test]
    fn test_float_sentinel() {
        assert!(f64::propagate(f64::NAN, 1.0).unwrap().is_nan());
        assert!(f32::propagate(1.0, f32::NAN).unwrap().is_nan());
        assert!(f64::propagate(1.0, 2.0).is_none());
    }

    #[test]
    fn test_bool_never_short_circuits() {
        assert!(!bool::HAS_SENTINEL);
        assert_eq!(bool::propagate(true, false), None);
    }

    #[test]
    fn test_complex_returns_first_invalid_operand() {
        let a = Complex64::new(f64::NAN, 1.5);
        let b = Complex64::new(2.0, f64::NAN);
        let out = Complex64::propagate(a, b).unwrap();
        assert!(out.re.is_nan());
        assert_eq!(out.im, 1.5);

        let out = Complex64::propagate(Complex64::new(1.0, 1.0), b).unwrap();
        assert_eq!(out.re, 2.0);
        assert!(out.im.is_nan());
    }

    #[test]
    fn test_int_division_by_zero_is_missing() {
        assert_eq!(7i32.div_elem(0), i32::MIN);
        assert_eq!(i32::MIN.div_elem(-1), i32::MIN);
        assert_eq!(7i32.div_elem(2), 3);
    }

    #[test]
    fn test_int_pow() {
        assert_eq!(2i32.pow_elem(10), 1024);
        assert_eq!(2i32.pow_elem(-1), 0);
        assert_eq!((-1i64).pow_elem(-3), -1);
    }

    #[test]
    fn test_int_wraps() {
        assert_eq!(i32::MAX.add_elem(1), i32::MIN);
        assert_eq!(3i16.mul_elem(4), 12);
    }
}
