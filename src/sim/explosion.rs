use super::behavior::{Behavior, Entity, Status};
use super::sprite::{Sprite, SpriteKind};
use super::world::{Context, World};
use crate::defs::SpriteFlags;
use crate::fix::{Fix, Fix2D};

/// Explosion animations, laid out back to back in the `explosions` sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplosionSize {
    TinyWarm,
    TinyCool,
    Small,
    Medium,
    Large,
    Spark,
}

const FRAMES: [usize; 6] = [3, 3, 6, 6, 8, 2];
const DIVIDERS: [u32; 6] = [2, 2, 3, 3, 4, 2];

impl ExplosionSize {
    pub const TOTAL_FRAMES: usize = 28;

    pub const fn frames(self) -> usize {
        FRAMES[self as usize]
    }

    pub fn first_frame(self) -> usize {
        FRAMES[..self as usize].iter().sum()
    }

    /// Ticks each frame stays on screen.
    pub const fn divider(self) -> u32 {
        DIVIDERS[self as usize]
    }
}

pub struct Explosion {
    size: ExplosionSize,
    frame: usize,
    ticks: u32,
}

impl Explosion {
    /// Entity centred on `center`.
    pub fn entity(ctx: &mut Context, center: Fix2D, size: ExplosionSize) -> Entity {
        let img = ctx.sheets.explosions.frame(size.first_frame());
        let x = center.x - Fix::from_int(img.width()) / 2;
        let y = center.y - Fix::from_int(img.height()) / 2;
        let sprite = Sprite::new(ctx.next_id(), SpriteKind::Explosion, x, y, SpriteFlags::NO_SCROLL).with_image(img);
        Entity::new(
            sprite,
            Explosion {
                size,
                frame: 0,
                ticks: 0,
            },
        )
    }
}

impl Behavior for Explosion {
    fn tick(&mut self, me: &mut Sprite, world: &mut World) -> Status {
        self.ticks += 1;
        if self.ticks % self.size.divider() != 0 {
            return Status::Continue;
        }
        self.frame += 1;
        if self.frame >= self.size.frames() {
            return Status::Die;
        }
        let img = world.ctx.sheets.explosions.frame(self.size.first_frame() + self.frame);
        me.update_image_centered(img);
        Status::Continue
    }
}
