use super::{Fix, Real, table_cos, table_sin};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Rectangular fixed-point vector.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fix2D {
    pub x: Fix,
    pub y: Fix,
}

impl Fix2D {
    pub const ZERO: Fix2D = Fix2D { x: Fix::ZERO, y: Fix::ZERO };

    #[inline]
    pub const fn new(x: Fix, y: Fix) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fix::from_int(x), Fix::from_int(y))
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == Fix::ZERO && self.y == Fix::ZERO
    }

    #[inline]
    pub fn dot(self, o: Fix2D) -> Fix {
        self.x * o.x + self.y * o.y
    }

    /// Euclidean length, rounded to the nearest raw unit. Slow.
    pub fn length(self) -> Fix {
        Fix::from_raw(raw_hypot(self).round() as i32)
    }

    /// Cheap octagonal length estimate, good for ordering by distance.
    pub fn approx_length(self) -> Fix {
        let (ax, ay) = (self.x.abs(), self.y.abs());
        let (hi, lo) = if ax > ay { (ax, ay) } else { (ay, ax) };
        hi + lo * 3 / 8
    }

    /// Rotate by `angle` radians via exact polar form. Slow.
    pub fn rotate(self, angle: Fix) -> Fix2D {
        let mut p = FixPolar2D::from(self);
        p.angle += angle;
        p.to_rect_exact()
    }
}

fn raw_hypot(v: Fix2D) -> Real {
    (v.x.raw() as Real).hypot(v.y.raw() as Real)
}

/// Scale `v` to length `len`. A zero vector stays zero.
pub fn fix_norm(v: Fix2D, len: Fix) -> Fix2D {
    if v.is_zero() {
        return Fix2D::ZERO;
    }
    let k = len.raw() as Real / raw_hypot(v);
    Fix2D::new(
        Fix::from_raw((v.x.raw() as Real * k).round() as i32),
        Fix::from_raw((v.y.raw() as Real * k).round() as i32),
    )
}

/// `a - b` wrapped into `(-π, π]`.
pub fn subtract_angles(a: Fix, b: Fix) -> Fix {
    let mut d = (a - b).raw().rem_euclid(Fix::TAU.raw());
    if d > Fix::PI.raw() {
        d -= Fix::TAU.raw();
    }
    Fix::from_raw(d)
}

impl Add for Fix2D {
    type Output = Fix2D;
    #[inline]
    fn add(self, o: Fix2D) -> Fix2D {
        Fix2D::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Fix2D {
    type Output = Fix2D;
    #[inline]
    fn sub(self, o: Fix2D) -> Fix2D {
        Fix2D::new(self.x - o.x, self.y - o.y)
    }
}

impl Neg for Fix2D {
    type Output = Fix2D;
    #[inline]
    fn neg(self) -> Fix2D {
        Fix2D::new(-self.x, -self.y)
    }
}

impl Mul<Fix> for Fix2D {
    type Output = Fix2D;
    #[inline]
    fn mul(self, k: Fix) -> Fix2D {
        Fix2D::new(self.x * k, self.y * k)
    }
}

impl Div<Fix> for Fix2D {
    type Output = Fix2D;
    #[inline]
    fn div(self, k: Fix) -> Fix2D {
        Fix2D::new(self.x / k, self.y / k)
    }
}

impl AddAssign for Fix2D {
    #[inline]
    fn add_assign(&mut self, o: Fix2D) {
        *self = *self + o;
    }
}

impl SubAssign for Fix2D {
    #[inline]
    fn sub_assign(&mut self, o: Fix2D) {
        *self = *self - o;
    }
}

/// Polar vector: length plus angle in radians.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixPolar2D {
    pub length: Fix,
    pub angle: Fix,
}

impl FixPolar2D {
    #[inline]
    pub const fn new(length: Fix, angle: Fix) -> Self {
        Self { length, angle }
    }

    /// Table-driven conversion; angle resolution is 1/128 turn.
    #[inline]
    pub fn to_rect(self) -> Fix2D {
        Fix2D::new(self.length * table_cos(self.angle), self.length * table_sin(self.angle))
    }

    /// Exact conversion. Slow.
    pub fn to_rect_exact(self) -> Fix2D {
        let a = self.angle.to_float();
        let l = self.length.raw() as Real;
        Fix2D::new(
            Fix::from_raw((l * a.cos()).round() as i32),
            Fix::from_raw((l * a.sin()).round() as i32),
        )
    }
}

impl From<Fix2D> for FixPolar2D {
    /// Slow: goes through `atan2` and `sqrt`.
    fn from(v: Fix2D) -> Self {
        FixPolar2D::new(v.length(), Fix::atan2(v.y, v.x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(fix_norm(Fix2D::ZERO, Fix::from_int(4)), Fix2D::ZERO);
    }

    #[test]
    fn angle_difference_takes_short_way_round() {
        let a = Fix::from_raw(100);
        let b = Fix::from_raw(1500);
        assert_eq!(subtract_angles(a, b), Fix::from_raw(208));
        assert_eq!(subtract_angles(b, a), Fix::from_raw(-208));
        assert_eq!(subtract_angles(Fix::PI, Fix::ZERO), Fix::PI);
        assert_eq!(subtract_angles(-Fix::PI, Fix::ZERO), Fix::PI);
    }

    #[test]
    fn polar_to_rect_uses_table() {
        let p = FixPolar2D::new(Fix::from_int(6), Fix::PI);
        assert_eq!(p.to_rect(), Fix2D::from_ints(-6, 0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = Fix2D::from_ints(4, 0).rotate(Fix::from_raw(402));
        assert!(v.x.raw().abs() <= 2);
        assert!((v.y.raw() - 1024).abs() <= 2);
    }

    #[test]
    fn approx_length_orders_like_length() {
        let near = Fix2D::from_ints(3, 4);
        let far = Fix2D::from_ints(6, 1);
        assert!(near.approx_length() < far.approx_length());
    }

    proptest! {
        #[test]
        fn norm_hits_requested_length(
            x in -20_000i32..20_000,
            y in -20_000i32..20_000,
            len in 1i32..4_096,
        ) {
            prop_assume!(x != 0 || y != 0);
            let v = fix_norm(Fix2D::new(Fix::from_raw(x), Fix::from_raw(y)), Fix::from_raw(len));
            prop_assert!((v.length().raw() - len).abs() <= 1);
        }

        #[test]
        fn angle_difference_in_half_open_range(a in -100_000i32..100_000, b in -100_000i32..100_000) {
            let d = subtract_angles(Fix::from_raw(a), Fix::from_raw(b)).raw();
            prop_assert!(d > -Fix::PI.raw() && d <= Fix::PI.raw());
        }
    }
}
