//! Common state of every on-screen object.
//!
//! `x` is in screen space (0 = left edge of the view), `y` is in level
//! space (0 = top of the level; the view starts at `scroll.y`).

use crate::defs::{S_GAME_HEIGHT, S_WIDTH, SpriteFlags};
use crate::fix::{Fix, Fix2D};
use crate::renderer::Image;
use std::rc::Rc;

pub type SpriteId = u32;

/// Grid is 4×4 cells over the playfield width and the level height.
pub const GRID_CELLS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Pickup,
    Explosion,
    /// Invisible bookkeeping objects (delayed spawns, layer scripts).
    Script,
}

/// Collision rectangle relative to the sprite position.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    pub kind: SpriteKind,
    pub x: Fix,
    pub y: Fix,
    image: Option<Rc<Image>>,
    pub hitbox: Hitbox,
    pub flags: SpriteFlags,
    dead: bool,
    grid: u16,
}

impl Sprite {
    pub fn new(id: SpriteId, kind: SpriteKind, x: Fix, y: Fix, flags: SpriteFlags) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            image: None,
            hitbox: Hitbox::default(),
            flags,
            dead: false,
            grid: 0,
        }
    }

    pub fn with_image(mut self, img: Rc<Image>) -> Self {
        self.update_image(img, true);
        self
    }

    /// Dead, imageless filler used while the real occupant of a slot is
    /// being ticked.
    pub fn tombstone() -> Self {
        let mut s = Self::new(0, SpriteKind::Script, Fix::ZERO, Fix::ZERO, SpriteFlags::NO_DRAW);
        s.dead = true;
        s
    }

    #[inline]
    pub fn image(&self) -> Option<&Rc<Image>> {
        self.image.as_ref()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.image.as_ref().map_or(0, |i| i.width())
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.image.as_ref().map_or(0, |i| i.height())
    }

    /// Swap the visual; optionally fit the hitbox to the new image.
    pub fn update_image(&mut self, img: Rc<Image>, reset_hitbox: bool) {
        if reset_hitbox {
            self.hitbox = Hitbox {
                x: 0,
                y: 0,
                w: img.width(),
                h: img.height(),
            };
        }
        self.image = Some(img);
    }

    /// Swap the visual keeping the sprite's centre where it was.
    pub fn update_image_centered(&mut self, img: Rc<Image>) {
        let dw = self.width() - img.width();
        let dh = self.height() - img.height();
        self.x += Fix::from_int(dw) / 2;
        self.y += Fix::from_int(dh) / 2;
        self.update_image(img, true);
    }

    #[inline]
    pub fn pos(&self) -> Fix2D {
        Fix2D::new(self.x, self.y)
    }

    pub fn center(&self) -> Fix2D {
        Fix2D::new(
            self.x + Fix::from_int(self.width()) / 2,
            self.y + Fix::from_int(self.height()) / 2,
        )
    }

    /// Point homing shots steer toward.
    pub fn track_point(&self) -> Fix2D {
        Fix2D::new(
            self.x + Fix::from_int(self.hitbox.x + self.hitbox.w / 2),
            self.y + Fix::from_int(self.hitbox.y + self.hitbox.h / 2),
        )
    }

    #[inline]
    pub fn move_by(&mut self, dx: Fix, dy: Fix) {
        self.x += dx;
        self.y += dy;
    }

    #[inline]
    pub fn kill(&mut self) {
        self.dead = true;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Integer hitbox corners `(left, top, right, bottom)`, exclusive end.
    fn hit_rect(&self) -> (i32, i32, i32, i32) {
        let l = self.x.to_int() + self.hitbox.x;
        let t = self.y.to_int() + self.hitbox.y;
        (l, t, l + self.hitbox.w, t + self.hitbox.h)
    }

    /// Recompute which of the 4×4 playfield cells the hitbox touches.
    /// Cells are `S_WIDTH / 4` wide and `level_height / 4` tall; anything
    /// beyond the edges counts toward the border cells.
    pub fn compute_collision_grid(&mut self, level_height: i32) {
        if self.hitbox.w <= 0 || self.hitbox.h <= 0 {
            self.grid = 0;
            return;
        }
        let cw = S_WIDTH / GRID_CELLS;
        let ch = (level_height / GRID_CELLS).max(1);
        let (l, t, r, b) = self.hit_rect();
        let cell = |v: i32, size: i32| v.div_euclid(size).clamp(0, GRID_CELLS - 1);
        let (x0, x1) = (cell(l, cw), cell(r - 1, cw));
        let (y0, y1) = (cell(t, ch), cell(b - 1, ch));

        let mut mask = 0u16;
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                mask |= 1 << (cy * GRID_CELLS + cx);
            }
        }
        self.grid = mask;
    }

    #[inline]
    pub fn collision_grid(&self) -> u16 {
        self.grid
    }

    /// Override the grid mask directly.
    pub fn set_collision_grid(&mut self, mask: u16) {
        self.grid = mask;
    }

    /// Grid mask, then hitbox rectangles, then pixels (unless either side
    /// is box-check-only or has no image).
    pub fn hits(&self, other: &Sprite) -> bool {
        if self.dead || other.dead || self.grid & other.grid == 0 {
            return false;
        }
        let (al, at, ar, ab) = self.hit_rect();
        let (bl, bt, br, bb) = other.hit_rect();
        if al >= br || bl >= ar || at >= bb || bt >= ab {
            return false;
        }
        if self.flags.contains(SpriteFlags::BOX_CHECK_ONLY)
            || other.flags.contains(SpriteFlags::BOX_CHECK_ONLY)
        {
            return true;
        }
        match (&self.image, &other.image) {
            (Some(a), Some(b)) => a.overlaps(
                b,
                other.x.to_int() - self.x.to_int(),
                other.y.to_int() - self.y.to_int(),
            ),
            _ => true,
        }
    }

    /// How far the sprite has left the visible playfield, 0 while any
    /// part of it is on screen.
    pub fn off_screen_distance(&self, view_y: i32) -> i32 {
        let x = self.x.to_int();
        let y = self.y.to_int() - view_y;
        let (w, h) = (self.width(), self.height());
        (-(x + w))
            .max(x - S_WIDTH)
            .max(-(y + h))
            .max(y - S_GAME_HEIGHT)
            .max(0)
    }

    /// Draw at screen position; `view_y` converts level y to the canvas.
    pub fn blit(&self, dst: &mut Image, view_y: i32) {
        if self.flags.contains(SpriteFlags::NO_DRAW) {
            return;
        }
        if let Some(img) = &self.image {
            dst.blit_all(img, self.x.to_int(), self.y.to_int() - view_y);
        }
    }
}
