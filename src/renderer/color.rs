use crate::defs::S_MAX_COLOR;
use std::ops::{Add, AddAssign, Sub, SubAssign};

const OPAQUE: u16 = 0x8000;

/// Packed 4:4:4 colour plus an opacity bit (`0x8RGB`).
///
/// The raw value `0` is the transparent sentinel; every colour built
/// through [`Color::rgb`] carries the opacity bit, so opaque black is
/// `0x8000`.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u16);

#[inline]
fn clamp_channel(v: i32) -> u16 {
    v.clamp(0, S_MAX_COLOR) as u16
}

impl Color {
    pub const TRANSPARENT: Color = Color(0);
    pub const BLACK: Color = Color(OPAQUE);
    pub const WHITE: Color = Color(OPAQUE | 0x0FFF);

    /// Opaque colour; channels are clamped to `0..=15`.
    #[inline]
    pub fn rgb(r: i32, g: i32, b: i32) -> Color {
        Color(OPAQUE | clamp_channel(r) << 8 | clamp_channel(g) << 4 | clamp_channel(b))
    }

    #[inline]
    pub fn gray(level: i32) -> Color {
        Color::rgb(level, level, level)
    }

    #[inline]
    pub const fn from_raw(raw: u16) -> Color {
        Color(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn r(self) -> i32 {
        ((self.0 >> 8) & 0xF) as i32
    }

    #[inline]
    pub const fn g(self) -> i32 {
        ((self.0 >> 4) & 0xF) as i32
    }

    #[inline]
    pub const fn b(self) -> i32 {
        (self.0 & 0xF) as i32
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.0 == 0
    }

    /// True when every channel is zero (opaque black or transparent).
    #[inline]
    pub const fn is_dark(self) -> bool {
        self.0 & 0x0FFF == 0
    }

    /// 0x00RRGGBB for the presentation backend. Transparent shows as black.
    #[inline]
    pub const fn to_rgb32(self) -> u32 {
        let r = self.r() as u32 * 17;
        let g = self.g() as u32 * 17;
        let b = self.b() as u32 * 17;
        r << 16 | g << 8 | b
    }
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_transparent() {
            f.write_str("Color(transparent)")
        } else {
            write!(f, "Color({:X}{:X}{:X})", self.r(), self.g(), self.b())
        }
    }
}

/// Per-channel saturating add; the result is always opaque.
impl Add for Color {
    type Output = Color;
    #[inline]
    fn add(self, o: Color) -> Color {
        Color::rgb(self.r() + o.r(), self.g() + o.g(), self.b() + o.b())
    }
}

/// Per-channel saturating subtract; the result is always opaque.
impl Sub for Color {
    type Output = Color;
    #[inline]
    fn sub(self, o: Color) -> Color {
        Color::rgb(self.r() - o.r(), self.g() - o.g(), self.b() - o.b())
    }
}

impl AddAssign for Color {
    #[inline]
    fn add_assign(&mut self, o: Color) {
        *self = *self + o;
    }
}

impl SubAssign for Color {
    #[inline]
    fn sub_assign(&mut self, o: Color) {
        *self = *self - o;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn packing() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(c.raw(), 0x8123);
        assert_eq!((c.r(), c.g(), c.b()), (1, 2, 3));
        assert!(!Color::BLACK.is_transparent());
        assert!(Color::TRANSPARENT.is_transparent());
    }

    #[test]
    fn add_saturates_instead_of_wrapping() {
        let c = Color::rgb(15, 15, 15) + Color::rgb(5, 0, 0);
        assert_eq!(c.r(), 15);
        assert_eq!(c, Color::WHITE);
        assert_eq!(Color::rgb(2, 9, 0) - Color::rgb(5, 1, 1), Color::rgb(0, 8, 0));
    }

    #[test]
    fn rgb32_expands_nibbles() {
        assert_eq!(Color::WHITE.to_rgb32(), 0x00FF_FFFF);
        assert_eq!(Color::rgb(1, 0, 0xA).to_rgb32(), 0x0011_00AA);
        assert_eq!(Color::TRANSPARENT.to_rgb32(), 0);
    }

    proptest! {
        #[test]
        fn channels_stay_in_range(
            a in (0i32..16, 0i32..16, 0i32..16),
            b in (0i32..16, 0i32..16, 0i32..16),
        ) {
            let x = Color::rgb(a.0, a.1, a.2);
            let y = Color::rgb(b.0, b.1, b.2);
            let s = x + y;
            let d = x - y;
            prop_assert_eq!(s.r(), (a.0 + b.0).min(15));
            prop_assert_eq!(s.b(), (a.2 + b.2).min(15));
            prop_assert_eq!(d.g(), (a.1 - b.1).max(0));
            prop_assert!(!s.is_transparent() && !d.is_transparent());
        }
    }
}
