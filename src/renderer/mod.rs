//! Software compositor.
//!
//! Everything draws into [`Image`]s of [`Color`]. The scheduler owns a
//! [`FrameBuffers`] pair: the back buffer receives the mode's drawing, the
//! front buffer is derived from it each frame (fade or flash applied) and
//! is what the presentation backend converts with [`to_rgb32`].

pub mod color;
pub mod image;
pub mod sheet;

pub use self::color::Color;
pub use self::image::{Blend, Image, ImageError, Wrap};
pub use self::sheet::SpriteSheet;

use crate::defs::{S_HEIGHT, S_WIDTH};

/// Pixel format handed to the window backend (0x00RRGGBB).
pub type Rgb32 = u32;

pub struct FrameBuffers {
    pub back: Image,
    pub front: Image,
    /// Additive full-screen flash, decays one level per tick.
    flash: Color,
}

impl Default for FrameBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffers {
    pub fn new() -> Self {
        Self {
            back: Image::filled(S_WIDTH, S_HEIGHT, Color::BLACK),
            front: Image::filled(S_WIDTH, S_HEIGHT, Color::BLACK),
            flash: Color::BLACK,
        }
    }

    pub fn clear_back(&mut self) {
        self.back.fill(Color::BLACK);
    }

    /// Stack another flash on top of the current one.
    pub fn flash(&mut self, c: Color) {
        self.flash += c;
    }

    pub fn flash_color(&self) -> Color {
        self.flash
    }

    pub fn decay_flash(&mut self) {
        if !self.flash.is_dark() {
            self.flash -= Color::gray(1);
        }
    }

    /// Derive the presentable frame: darken by `fade_level` (0..=15) while a
    /// fade is running, otherwise apply the flash, otherwise plain copy.
    pub fn compose_front(&mut self, fade_level: i32) {
        self.front.copy_from(&self.back);
        if fade_level > 0 {
            self.front.subtract(Color::gray(fade_level));
        } else if !self.flash.is_dark() {
            self.front.add(self.flash);
        }
    }
}

/// Convert a canvas to the backend's pixel format, reusing `out`.
pub fn to_rgb32(img: &Image, out: &mut Vec<Rgb32>) {
    out.clear();
    out.extend(img.data().iter().map(|c| c.to_rgb32()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_darkens_front_only() {
        let mut fb = FrameBuffers::new();
        fb.back.fill(Color::rgb(10, 4, 15));
        fb.compose_front(5);
        assert_eq!(fb.front.pixel(0, 0), Color::rgb(5, 0, 10));
        assert_eq!(fb.back.pixel(0, 0), Color::rgb(10, 4, 15));
        fb.compose_front(0);
        assert_eq!(fb.front, fb.back);
    }

    #[test]
    fn flash_brightens_then_decays() {
        let mut fb = FrameBuffers::new();
        fb.flash(Color::gray(2));
        fb.compose_front(0);
        assert_eq!(fb.front.pixel(3, 3), Color::gray(2));
        fb.decay_flash();
        fb.decay_flash();
        fb.compose_front(0);
        assert_eq!(fb.front.pixel(3, 3), Color::BLACK);
        // fade wins over flash
        fb.flash(Color::gray(9));
        fb.back.fill(Color::gray(4));
        fb.compose_front(4);
        assert_eq!(fb.front.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn rgb32_conversion_reuses_buffer() {
        let img = Image::filled(2, 2, Color::WHITE);
        let mut out = vec![7; 10];
        to_rgb32(&img, &mut out);
        assert_eq!(out, vec![0x00FF_FFFF; 4]);
    }
}
