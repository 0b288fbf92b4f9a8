//! Status bar above the game area.

use super::world::{Context, MAX_SPEED};
use crate::defs::{S_HUD_HEIGHT, S_WIDTH, WeaponKind};
use crate::renderer::{Color, Image};

/// 3×5 digit glyphs, one byte per row, bit 2 is the left column.
const GLYPHS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const GLYPH_W: i32 = 3;
const GLYPH_H: i32 = 5;

const HUD_BG: Color = Color::from_raw(0x8003);
const HUD_LINE: Color = Color::from_raw(0x8666);

/// Draw `value` zero-padded to `width` digits with `scale`× pixels.
/// Returns the x just past the last digit.
pub fn draw_number(dst: &mut Image, x: i32, y: i32, value: u32, width: usize, scale: i32, c: Color) -> i32 {
    let text = format!("{value:0width$}");
    let mut cx = x;
    for d in text.bytes().map(|b| (b - b'0') as usize) {
        for (row, bits) in GLYPHS[d].iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                    dst.fill_rect(cx + col * scale, y + row as i32 * scale, scale, scale, c);
                }
            }
        }
        cx += (GLYPH_W + 1) * scale;
    }
    cx
}

/// Score, high score, reserve ships, speed and weapons into rows
/// `0..S_HUD_HEIGHT` of `dst`.
pub fn draw_hud(dst: &mut Image, ctx: &Context) {
    dst.fill_rect(0, 0, S_WIDTH, S_HUD_HEIGHT, HUD_BG);
    dst.fill_rect(0, S_HUD_HEIGHT - 1, S_WIDTH, 1, HUD_LINE);

    draw_number(dst, 8, 4, ctx.score, 8, 2, Color::WHITE);
    draw_number(dst, 120, 4, ctx.high_score, 8, 2, Color::rgb(15, 12, 4));

    let ship = ctx.sheets.ship.frame(0);
    dst.blit_all(&ship, 8, 17);
    draw_number(dst, 8 + ship.width() + 4, 20, ctx.player.lives, 1, 2, Color::WHITE);

    // speed pips
    for i in 0..MAX_SPEED {
        let c = if i < ctx.player.speed {
            Color::rgb(4, 15, 4)
        } else {
            Color::gray(4)
        };
        dst.fill_rect(72 + i * 6, 22, 4, 6, c);
    }

    // owned weapons, the selected one underlined, levels as dots
    for w in WeaponKind::ALL {
        if !ctx.player.owns(w) {
            continue;
        }
        let x = 224 + w.index() as i32 * 24;
        let icon = ctx.sheets.powerups.frame(2 + w.index());
        dst.blit_all(&icon, x, 4);
        for l in 0..=ctx.player.level(w) as i32 {
            dst.fill_rect(x + l * 4, 20, 2, 2, Color::WHITE);
        }
        if w == ctx.player.weapon {
            dst.fill_rect(x, 26, icon.width(), 2, Color::rgb(15, 8, 0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testutil::empty_world;

    #[test]
    fn zero_has_a_hole() {
        let mut img = Image::new(8, 8);
        let end = draw_number(&mut img, 0, 0, 0, 1, 1, Color::WHITE);
        assert_eq!(end, 4);
        assert_eq!(img.pixel(0, 0), Color::WHITE);
        assert!(img.pixel(1, 2).is_transparent());
        assert_eq!(img.pixel(2, 4), Color::WHITE);
    }

    #[test]
    fn numbers_are_zero_padded() {
        let mut a = Image::new(32, 8);
        draw_number(&mut a, 0, 0, 7, 3, 1, Color::WHITE);
        let mut b = Image::new(32, 8);
        draw_number(&mut b, 0, 0, 0, 1, 1, Color::WHITE);
        draw_number(&mut b, 4, 0, 0, 1, 1, Color::WHITE);
        draw_number(&mut b, 8, 0, 7, 1, 1, Color::WHITE);
        assert_eq!(a, b);
    }

    #[test]
    fn hud_stays_in_its_band() {
        let w = empty_world();
        let mut img = Image::new(S_WIDTH, 240);
        draw_hud(&mut img, &w.ctx);
        assert!(!img.pixel(0, 0).is_transparent());
        assert!(img.pixel(0, S_HUD_HEIGHT).is_transparent());
    }
}
