//! Tile-map terrain rendered through a sliding ring buffer.

use super::layer::{Layer, LayerScroll, Placement};
use crate::defs::S_WIDTH;
use crate::renderer::{Blend, Image, SpriteSheet, Wrap};

pub const TILE_WIDTH: i32 = 16;
pub const TILE_HEIGHT: i32 = 16;
/// Tile index that draws nothing; index `n > 0` is sheet frame `n - 1`.
pub const EMPTY_TILE: u16 = 0;

/// Backing width: one viewport plus one spare column.
pub const BACKING_WIDTH: i32 = S_WIDTH + TILE_WIDTH;
const RING_COLUMNS: i32 = BACKING_WIDTH / TILE_WIDTH;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("tilemap {width}x{height} needs {expected} tiles, got {len}")]
pub struct TilemapError {
    pub width: i32,
    pub height: i32,
    pub expected: usize,
    pub len: usize,
}

/// Decoded tile map, stored column-major (`tiles[col * height + row]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap {
    width: i32,
    height: i32,
    tiles: Vec<u16>,
}

impl Tilemap {
    pub fn new(width: i32, height: i32, tiles: Vec<u16>) -> Result<Self, TilemapError> {
        let expected = (width.max(0) as usize) * (height.max(0) as usize);
        if width < 0 || height < 0 || tiles.len() != expected {
            return Err(TilemapError {
                width,
                height,
                expected,
                len: tiles.len(),
            });
        }
        Ok(Self { width, height, tiles })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// `EMPTY_TILE` outside the map.
    pub fn tile(&self, col: i32, row: i32) -> u16 {
        if col < 0 || row < 0 || col >= self.width || row >= self.height {
            return EMPTY_TILE;
        }
        self.tiles[(col * self.height + row) as usize]
    }
}

/// Terrain built from a tilemap. Only the columns around the view are
/// rendered, into a backing image `BACKING_WIDTH` wide that wraps
/// horizontally: map column `c` lives at backing x `c * 16 mod 336`.
pub struct TileLayer {
    map: Tilemap,
    tiles: SpriteSheet,
    backing: Image,
    place: Placement,
    /// Next map column to render; `None` until the first update.
    next_col: Option<i32>,
    visible: bool,
}

impl TileLayer {
    pub fn new(map: Tilemap, tiles: SpriteSheet, place: Placement) -> Self {
        let backing = Image::new(BACKING_WIDTH, map.height() * TILE_HEIGHT);
        Self {
            map,
            tiles,
            backing,
            place,
            next_col: None,
            visible: true,
        }
    }

    pub fn map(&self) -> &Tilemap {
        &self.map
    }

    /// Render any newly revealed columns. Jumps ahead (dropping the stale
    /// window) when the scroll moved more than one ring's worth.
    fn extend(&mut self, scroll: LayerScroll) {
        let (sx, _) = self.place.origin(scroll);
        let first = sx.div_euclid(TILE_WIDTH);
        let last = (sx + S_WIDTH - 1).div_euclid(TILE_WIDTH);
        let mut next = match self.next_col {
            Some(n) if n >= first && n - RING_COLUMNS <= first => n,
            _ => first,
        };
        while next <= last {
            self.draw_column(next);
            next += 1;
        }
        self.next_col = Some(next);
    }

    fn draw_column(&mut self, col: i32) {
        let x = (col * TILE_WIDTH).rem_euclid(BACKING_WIDTH);
        self.backing.clear_rect(x, 0, TILE_WIDTH, self.backing.height());
        for row in 0..self.map.height() {
            let t = self.map.tile(col, row);
            if t == EMPTY_TILE {
                continue;
            }
            self.tiles.blit_frame(&mut self.backing, (t - 1) as usize, x, row * TILE_HEIGHT);
        }
    }
}

impl Layer for TileLayer {
    fn update(&mut self, scroll: LayerScroll) {
        self.extend(scroll);
    }

    fn blit(&self, dst: &mut Image, scroll: LayerScroll) {
        let (sx, sy) = self.place.origin(scroll);
        let (w, h) = (dst.width(), dst.height());
        dst.blit_wrapped(&self.backing, sx, sy, 0, 0, w, h, Wrap::Horizontal, Blend::Normal);
    }

    fn hits_sprite(&self, img: &Image, scroll: LayerScroll, x: i32, y: i32) -> bool {
        if !self.visible {
            return false;
        }
        let (sx, sy) = self.place.origin(scroll);
        self.backing.overlaps_wrapped(img, x + sx, y + sy, Wrap::Horizontal)
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
    use crate::fix::Fix;
    use crate::renderer::Color;

    fn solid_tiles() -> SpriteSheet {
        SpriteSheet::from_images(vec![Image::filled(TILE_WIDTH, TILE_HEIGHT, Color::WHITE)])
    }

    /// 40 columns, 2 rows; every 5th column has a block in the bottom row.
    fn fence() -> Tilemap {
        let mut tiles = vec![EMPTY_TILE; 80];
        for col in (0..40).step_by(5) {
            tiles[col * 2 + 1] = 1;
        }
        Tilemap::new(40, 2, tiles).expect("valid map")
    }

    fn at(x: i32) -> LayerScroll {
        LayerScroll::new(Fix::from_int(x), Fix::ZERO)
    }

    #[test]
    fn tilemap_validates_length() {
        assert!(Tilemap::new(3, 2, vec![0; 5]).is_err());
        let m = Tilemap::new(2, 2, vec![1, 2, 3, 4]).expect("valid map");
        assert_eq!(m.tile(1, 0), 3);
        assert_eq!(m.tile(5, 0), EMPTY_TILE);
    }

    #[test]
    fn renders_and_collides_as_scroll_advances() {
        let mut layer = TileLayer::new(fence(), solid_tiles(), Placement::default());
        let dot = Image::filled(1, 1, Color::WHITE);

        layer.update(at(0));
        assert!(layer.hits_sprite(&dot, at(0), 0, 16));
        assert!(!layer.hits_sprite(&dot, at(0), 16, 16));
        assert!(!layer.hits_sprite(&dot, at(0), 0, 0));

        // column 25 becomes visible only after scrolling
        layer.update(at(200));
        assert!(layer.hits_sprite(&dot, at(200), 400 - 200, 20));
        let mut view = Image::new(S_WIDTH, 32);
        layer.blit(&mut view, at(200));
        assert_eq!(view.pixel(200, 20), Color::WHITE);
        assert!(view.pixel(199, 20).is_transparent());
    }

    #[test]
    fn big_jump_redraws_window() {
        let mut layer = TileLayer::new(fence(), solid_tiles(), Placement::default());
        layer.update(at(0));
        layer.update(at(400));
        let dot = Image::filled(1, 1, Color::WHITE);
        assert!(layer.hits_sprite(&dot, at(400), 0, 16));
        assert!(layer.hits_sprite(&dot, at(400), 80, 16));
        assert!(!layer.hits_sprite(&dot, at(400), 16, 16));
    }

    #[test]
    fn past_the_end_is_empty() {
        let mut layer = TileLayer::new(fence(), solid_tiles(), Placement::default());
        layer.update(at(40 * 16));
        let dot = Image::filled(1, 1, Color::WHITE);
        assert!((0..S_WIDTH).all(|x| !layer.hits_sprite(&dot, at(640), x, 16)));
    }
}
