//! Scanline-distorted layers. Both redraw every row each frame with a
//! per-row horizontal shift driven by a counter advanced in `update`.

use super::layer::{Layer, LayerScroll, Placement};
use crate::fix::{Fix, TABLE_SIZE, table::SINE};
use crate::renderer::{Blend, Image, Wrap};
use std::rc::Rc;

const PHASE_MASK: i32 = TABLE_SIZE as i32 - 1;

/// Rows sway along a sine wave (water, heat haze).
pub struct WaveLayer {
    image: Rc<Image>,
    place: Placement,
    /// Peak shift in pixels.
    amplitude: Fix,
    /// Phase advance per tick, in table steps.
    speed: i32,
    /// Phase difference between adjacent rows.
    row_step: i32,
    phase: i32,
    blend: Blend,
    visible: bool,
}

impl WaveLayer {
    pub fn new(image: Rc<Image>, place: Placement, amplitude: Fix, speed: i32, row_step: i32) -> Self {
        Self {
            image,
            place,
            amplitude,
            speed,
            row_step,
            phase: 0,
            blend: Blend::Normal,
            visible: true,
        }
    }

    pub fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    pub fn phase(&self) -> i32 {
        self.phase
    }

    fn row_shift(&self, sy: i32) -> i32 {
        let i = (self.phase + sy * self.row_step) & PHASE_MASK;
        (self.amplitude * SINE[i as usize]).to_int()
    }
}

impl Layer for WaveLayer {
    fn update(&mut self, _scroll: LayerScroll) {
        self.phase = (self.phase + self.speed) & PHASE_MASK;
    }

    fn blit(&self, dst: &mut Image, scroll: LayerScroll) {
        let (sx, sy) = self.place.origin(scroll);
        let w = dst.width();
        for r in 0..dst.height() {
            let shift = self.row_shift(sy + r);
            dst.blit_wrapped(&self.image, sx + shift, sy + r, 0, r, w, 1, Wrap::Horizontal, self.blend);
        }
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Fixed-point denominator of the ramp's per-row speed factors.
pub const RAMP_DENOM: i32 = 16;

/// Rows slide at linearly interpolated speeds (perspective floors and
/// ceilings): row speed goes from `top / 16` to `bottom / 16` pixels
/// per tick.
pub struct RampLayer {
    image: Rc<Image>,
    place: Placement,
    top: i32,
    bottom: i32,
    counter: i32,
    visible: bool,
}

impl RampLayer {
    pub fn new(image: Rc<Image>, place: Placement, top: i32, bottom: i32) -> Self {
        Self {
            image,
            place,
            top,
            bottom,
            counter: 0,
            visible: true,
        }
    }

    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Shift of source row `row` at the current counter.
    fn row_shift(&self, row: i32) -> i32 {
        let span = (self.image.height() - 1).max(1);
        let num = self.top + (self.bottom - self.top) * row / span;
        self.counter * num / RAMP_DENOM
    }
}

impl Layer for RampLayer {
    /// The counter wraps after one full image width at speed 1 so every
    /// integer-speed row is back at its start.
    fn update(&mut self, _scroll: LayerScroll) {
        let period = (self.image.width() * RAMP_DENOM).max(1);
        self.counter = (self.counter + 1) % period;
    }

    fn blit(&self, dst: &mut Image, scroll: LayerScroll) {
        let (sx, sy) = self.place.origin(scroll);
        let w = dst.width();
        for r in 0..dst.height() {
            let row = sy + r;
            if row < 0 || row >= self.image.height() {
                continue;
            }
            let shift = self.row_shift(row);
            dst.blit_wrapped(&self.image, sx + shift, row, 0, r, w, 1, Wrap::Horizontal, Blend::Normal);
        }
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

    fn marker(w: i32, h: i32) -> Rc<Image> {
        let mut img = Image::new(w, h);
        for y in 0..h {
            img.set(0, y, Color::WHITE);
        }
        Rc::new(img)
    }

    fn first_lit(img: &Image, row: i32) -> Option<i32> {
        (0..img.width()).find(|&x| !img.pixel(x, row).is_transparent())
    }

    #[test]
    fn wave_phase_wraps() {
        let mut layer = WaveLayer::new(marker(8, 4), Placement::default(), Fix::from_int(2), 5, 8);
        for _ in 0..26 {
            layer.update(LayerScroll::default());
        }
        assert_eq!(layer.phase(), 130 & 127);
    }

    #[test]
    fn wave_rows_shift_along_sine() {
        // row_step 32 puts row 1 at the peak of the table
        let layer = WaveLayer::new(marker(16, 2), Placement::default(), Fix::from_int(3), 1, 32);
        let mut dst = Image::new(16, 2);
        layer.blit(&mut dst, LayerScroll::default());
        assert_eq!(first_lit(&dst, 0), Some(0));
        assert_eq!(first_lit(&dst, 1), Some(13));
    }

    #[test]
    fn ramp_rows_move_at_different_speeds() {
        let mut layer = RampLayer::new(marker(64, 3), Placement::default(), 0, 32);
        for _ in 0..4 {
            layer.update(LayerScroll::default());
        }
        let mut dst = Image::new(64, 3);
        layer.blit(&mut dst, LayerScroll::default());
        assert_eq!(first_lit(&dst, 0), Some(0));
        // row 1: 4 * 16 / 16 = 4 px; row 2: 4 * 32 / 16 = 8 px
        assert_eq!(first_lit(&dst, 1), Some(60));
        assert_eq!(first_lit(&dst, 2), Some(56));
    }

    #[test]
    fn ramp_counter_wraps_at_period() {
        let mut layer = RampLayer::new(marker(2, 1), Placement::default(), 16, 16);
        for _ in 0..2 * RAMP_DENOM {
            layer.update(LayerScroll::default());
        }
        assert_eq!(layer.counter(), 0);
    }
}
