//! Scrolling background / terrain / foreground layers.
//!
//! A layer maps the world scroll position through its own multipliers
//! (parallax) and pixel offset to a source origin, then draws the
//! game-area-sized window at that origin. All variants implement
//! [`Layer`]; the stage keeps them as trait objects in draw order.

use crate::fix::Fix;
use crate::renderer::{Blend, Image, Wrap};
use std::rc::Rc;

/// World scroll: `x` grows monotonically as the stage advances, `y` is the
/// top of the view in level space.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerScroll {
    pub x: Fix,
    pub y: Fix,
}

impl LayerScroll {
    pub const fn new(x: Fix, y: Fix) -> Self {
        Self { x, y }
    }
}

/// Parallax multipliers plus the screen position of the source origin
/// at zero scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub offset_x: i32,
    pub offset_y: i32,
    pub mul_x: Fix,
    pub mul_y: Fix,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            mul_x: Fix::ONE,
            mul_y: Fix::ONE,
        }
    }
}

impl Placement {
    /// Source pixel that lands on the top-left of the game area.
    #[inline]
    pub fn origin(&self, scroll: LayerScroll) -> (i32, i32) {
        (
            (scroll.x * self.mul_x).to_int() - self.offset_x,
            (scroll.y * self.mul_y).to_int() - self.offset_y,
        )
    }
}

pub trait Layer {
    /// Advance per-tick state (ring-buffer columns, wave phase).
    fn update(&mut self, _scroll: LayerScroll) {}

    /// Draw into the game-area canvas.
    fn blit(&self, dst: &mut Image, scroll: LayerScroll);

    /// Pixel test for `img` drawn at game-area position `(x, y)`.
    /// Layers that never act as terrain keep the default.
    fn hits_sprite(&self, _img: &Image, _scroll: LayerScroll, _x: i32, _y: i32) -> bool {
        false
    }

    fn visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);
}

/// One image drawn once per frame, optionally repeating and/or additive.
pub struct ImageLayer {
    image: Rc<Image>,
    place: Placement,
    wrap: Wrap,
    blend: Blend,
    visible: bool,
}

impl ImageLayer {
    pub fn new(image: Rc<Image>, place: Placement, wrap: Wrap, blend: Blend) -> Self {
        Self {
            image,
            place,
            wrap,
            blend,
            visible: true,
        }
    }
}

impl Layer for ImageLayer {
    fn blit(&self, dst: &mut Image, scroll: LayerScroll) {
        let (sx, sy) = self.place.origin(scroll);
        let (w, h) = (dst.width(), dst.height());
        dst.blit_wrapped(&self.image, sx, sy, 0, 0, w, h, self.wrap, self.blend);
    }

    fn hits_sprite(&self, img: &Image, scroll: LayerScroll, x: i32, y: i32) -> bool {
        if !self.visible {
            return false;
        }
        let (sx, sy) = self.place.origin(scroll);
        self.image.overlaps_wrapped(img, x + sx, y + sy, self.wrap)
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Color;

    fn scroll(x: i32, y: i32) -> LayerScroll {
        LayerScroll::new(Fix::from_int(x), Fix::from_int(y))
    }

    #[test]
    fn parallax_origin() {
        let p = Placement {
            offset_x: 4,
            offset_y: 0,
            mul_x: Fix::HALF,
            mul_y: Fix::ZERO,
        };
        assert_eq!(p.origin(scroll(100, 30)), (46, 0));
    }

    #[test]
    fn horizontal_wrap_repeats_but_clips_rows() {
        let mut strip = Image::new(4, 1);
        strip.set(0, 0, Color::WHITE);
        let layer = ImageLayer::new(Rc::new(strip), Placement::default(), Wrap::Horizontal, Blend::Normal);
        let mut dst = Image::new(9, 2);
        layer.blit(&mut dst, scroll(-1, 0));
        assert_eq!(dst.pixel(1, 0), Color::WHITE);
        assert_eq!(dst.pixel(5, 0), Color::WHITE);
        assert!(dst.pixel(0, 0).is_transparent());
        assert!(dst.pixel(1, 1).is_transparent());
    }

    #[test]
    fn negative_scroll_tiles_like_positive() {
        let mut tile = Image::new(4, 4);
        tile.set(1, 2, Color::WHITE);
        let layer = ImageLayer::new(Rc::new(tile), Placement::default(), Wrap::Both, Blend::Normal);
        let mut a = Image::new(8, 8);
        let mut b = Image::new(8, 8);
        layer.blit(&mut a, scroll(-3, -7));
        layer.blit(&mut b, scroll(1, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn hidden_layer_is_not_terrain() {
        let layer_img = Image::filled(8, 8, Color::WHITE);
        let mut layer = ImageLayer::new(Rc::new(layer_img), Placement::default(), Wrap::None, Blend::Normal);
        let dot = Image::filled(1, 1, Color::WHITE);
        assert!(layer.hits_sprite(&dot, scroll(2, 0), 3, 3));
        assert!(!layer.hits_sprite(&dot, scroll(2, 0), 6, 3));
        layer.set_visible(false);
        assert!(!layer.hits_sprite(&dot, scroll(2, 0), 3, 3));
    }
}
