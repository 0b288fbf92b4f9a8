//! Deterministic 24.8 fixed-point arithmetic.
//!
//! All gameplay positions, velocities and angles go through [`Fix`] so a
//! session replays identically on every platform. Transcendental helpers
//! marked *slow* fall back to real floating point and must stay off
//! per-pixel / per-sprite hot paths; angular stepping uses the lookup
//! tables in [`table`].

pub mod rng;
pub mod table;
pub mod vec;

pub use self::rng::FixRandom;
pub use self::table::{DELTA_SINE, TABLE_SIZE, table_cos, table_index, table_sin};
pub use self::vec::{Fix2D, FixPolar2D, fix_norm, subtract_angles};

use std::{
    fmt,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

/// Floating type backing the slow paths.
#[cfg(feature = "single-precision")]
pub type Real = f32;
#[cfg(not(feature = "single-precision"))]
pub type Real = f64;

/// Number of fractional bits.
pub const FIX_SHIFT: u32 = 8;
const FIX_SCALE: i32 = 1 << FIX_SHIFT;

/// Signed fixed-point value: `raw / 256`.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fix(i32);

impl Fix {
    pub const ZERO: Fix = Fix(0);
    pub const ONE: Fix = Fix(FIX_SCALE);
    pub const HALF: Fix = Fix(FIX_SCALE / 2);
    pub const PI: Fix = Fix(804);
    pub const TAU: Fix = Fix(1608);
    pub const MAX: Fix = Fix(i32::MAX);
    pub const MIN: Fix = Fix(i32::MIN);

    #[inline]
    pub const fn from_raw(raw: i32) -> Fix {
        Fix(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_int(v: i32) -> Fix {
        Fix(v << FIX_SHIFT)
    }

    /// `v * 256`, truncated toward zero.
    #[inline]
    pub fn from_float(v: Real) -> Fix {
        Fix((v * FIX_SCALE as Real) as i32)
    }

    /// Whole part via arithmetic shift (floors toward -inf).
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FIX_SHIFT
    }

    /// Nearest integer, halves rounding up.
    #[inline]
    pub const fn round(self) -> i32 {
        (self.0 + FIX_SCALE / 2) >> FIX_SHIFT
    }

    #[inline]
    pub const fn floor(self) -> Fix {
        Fix(self.0 & !(FIX_SCALE - 1))
    }

    #[inline]
    pub const fn abs(self) -> Fix {
        Fix(self.0.wrapping_abs())
    }

    #[inline]
    pub fn to_float(self) -> Real {
        self.0 as Real / FIX_SCALE as Real
    }

    /* ---------------------------------------------------------------- */
    /* slow paths                                                        */
    /* ---------------------------------------------------------------- */

    /// Square root. Slow. Negative input yields zero.
    pub fn sqrt(self) -> Fix {
        if self.0 <= 0 {
            return Fix::ZERO;
        }
        Fix::from_float(self.to_float().sqrt())
    }

    /// Exact sine. Slow; prefer [`table_sin`] for stepping.
    pub fn sin(self) -> Fix {
        Fix::from_float(self.to_float().sin())
    }

    /// Exact cosine. Slow; prefer [`table_cos`] for stepping.
    pub fn cos(self) -> Fix {
        Fix::from_float(self.to_float().cos())
    }

    /// Angle of `(x, y)` in `(-π, π]`. Slow.
    pub fn atan2(y: Fix, x: Fix) -> Fix {
        Fix::from_float((y.0 as Real).atan2(x.0 as Real))
    }
}

/// Euclidean remainder: never negative for a positive divisor.
#[inline]
pub fn remainder(a: i32, b: i32) -> i32 {
    a.rem_euclid(b)
}

impl fmt::Debug for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fix({} /*{}*/)", self.to_float(), self.0)
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_float())
    }
}

impl From<i32> for Fix {
    #[inline]
    fn from(v: i32) -> Fix {
        Fix::from_int(v)
    }
}

/*──────────────────────────── Fix ∘ Fix ────────────────────────────*/

impl Add for Fix {
    type Output = Fix;
    #[inline]
    fn add(self, rhs: Fix) -> Fix {
        Fix(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fix {
    type Output = Fix;
    #[inline]
    fn sub(self, rhs: Fix) -> Fix {
        Fix(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Fix {
    type Output = Fix;
    #[inline]
    fn mul(self, rhs: Fix) -> Fix {
        Fix(((self.0 as i64 * rhs.0 as i64) >> FIX_SHIFT) as i32)
    }
}

impl Div for Fix {
    type Output = Fix;
    /// Division by raw zero saturates to the sign of the dividend
    /// (`0 / 0 == 0`); out-of-range quotients saturate as well.
    #[inline]
    fn div(self, rhs: Fix) -> Fix {
        if rhs.0 == 0 {
            return match self.0.signum() {
                1 => Fix::MAX,
                -1 => Fix::MIN,
                _ => Fix::ZERO,
            };
        }
        let q = ((self.0 as i64) << FIX_SHIFT) / rhs.0 as i64;
        Fix(q.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}

impl Neg for Fix {
    type Output = Fix;
    #[inline]
    fn neg(self) -> Fix {
        Fix(self.0.wrapping_neg())
    }
}

/*──────────────────────────── Fix ∘ i32 ────────────────────────────*/

impl Add<i32> for Fix {
    type Output = Fix;
    #[inline]
    fn add(self, rhs: i32) -> Fix {
        self + Fix::from_int(rhs)
    }
}

impl Sub<i32> for Fix {
    type Output = Fix;
    #[inline]
    fn sub(self, rhs: i32) -> Fix {
        self - Fix::from_int(rhs)
    }
}

impl Mul<i32> for Fix {
    type Output = Fix;
    #[inline]
    fn mul(self, rhs: i32) -> Fix {
        Fix(self.0.wrapping_mul(rhs))
    }
}

impl Div<i32> for Fix {
    type Output = Fix;
    #[inline]
    fn div(self, rhs: i32) -> Fix {
        self / Fix::from_int(rhs)
    }
}

macro_rules! assign_ops {
    ($($tr:ident $m:ident $op:tt),*) => {$(
        impl $tr for Fix {
            #[inline]
            fn $m(&mut self, rhs: Fix) { *self = *self $op rhs; }
        }
        impl $tr<i32> for Fix {
            #[inline]
            fn $m(&mut self, rhs: i32) { *self = *self $op rhs; }
        }
    )*};
}

assign_ops!(AddAssign add_assign +, SubAssign sub_assign -, MulAssign mul_assign *, DivAssign div_assign /);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn int_conversion_shifts() {
        assert_eq!(Fix::from_int(3).raw(), 768);
        assert_eq!(Fix::from_raw(-1).to_int(), -1);
        assert_eq!(Fix::from_raw(383).to_int(), 1);
        assert_eq!(Fix::from_raw(384).round(), 2);
    }

    #[test]
    fn float_conversion_truncates() {
        assert_eq!(Fix::from_float(1.999).raw(), 511);
        assert_eq!(Fix::from_float(-0.5).raw(), -128);
    }

    #[test]
    fn mul_div_use_wide_intermediate() {
        let big = Fix::from_int(30_000);
        assert_eq!((big * Fix::from_int(2) / Fix::from_int(4)).to_int(), 15_000);
        assert_eq!(Fix::from_int(3) / Fix::from_int(2), Fix::from_raw(384));
    }

    #[test]
    fn divide_by_zero_saturates() {
        assert_eq!(Fix::ONE / Fix::ZERO, Fix::MAX);
        assert_eq!(-Fix::ONE / Fix::ZERO, Fix::MIN);
        assert_eq!(Fix::ZERO / Fix::ZERO, Fix::ZERO);
    }

    #[test]
    fn integer_operands_promote() {
        let a = Fix::from_raw(640);
        assert_eq!(a + 1, Fix::from_raw(896));
        assert_eq!(a * 2, Fix::from_raw(1280));
        assert_eq!(a / 2, Fix::from_raw(320));
        let mut b = a;
        b -= 2;
        assert_eq!(b, Fix::from_raw(128));
    }

    #[test]
    fn euclidean_remainder() {
        assert_eq!(remainder(-3, 8), 5);
        assert_eq!(remainder(11, 8), 3);
        assert_eq!(remainder(-16, 8), 0);
    }

    #[test]
    fn slow_paths() {
        assert_eq!(Fix::from_int(16).sqrt(), Fix::from_int(4));
        assert_eq!(Fix::from_int(-4).sqrt(), Fix::ZERO);
        assert_eq!(Fix::atan2(Fix::ZERO, -Fix::ONE).raw(), Fix::PI.raw());
        assert_eq!(Fix::ZERO.cos(), Fix::ONE);
    }

    proptest! {
        #[test]
        fn add_is_raw_sum(a in -1_000_000i32..1_000_000, b in -1_000_000i32..1_000_000) {
            prop_assert_eq!((Fix::from_raw(a) + Fix::from_raw(b)).raw(), a + b);
        }

        #[test]
        fn sub_self_is_zero(a in any::<i32>()) {
            let f = Fix::from_raw(a);
            prop_assert_eq!(f - f, Fix::ZERO);
            prop_assert_eq!(-(-f), f);
        }

        #[test]
        fn remainder_never_negative(a in any::<i32>(), b in 1i32..10_000) {
            let r = remainder(a, b);
            prop_assert!((0..b).contains(&r));
        }
    }
}
