use super::sprite::Sprite;
use super::world::{Context, World};
use crate::renderer::Image;

/// Result of a behaviour hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Die,
}

/// Per-kind logic attached to a sprite.
///
/// The sprite is passed separately so a behaviour can move and restyle
/// it while also reaching into the rest of the world; during `tick` the
/// entity is lifted out of its layer, so scans over `world.layers` never
/// alias `me`.
pub trait Behavior {
    fn tick(&mut self, me: &mut Sprite, world: &mut World) -> Status;

    /// Called when something damages this entity. Default: invulnerable.
    fn on_damage(&mut self, _me: &mut Sprite, _amount: i32, _ctx: &mut Context) -> Status {
        Status::Continue
    }

    fn blit(&self, me: &Sprite, dst: &mut Image, view_y: i32) {
        me.blit(dst, view_y);
    }
}

pub struct Entity {
    pub sprite: Sprite,
    pub behavior: Box<dyn Behavior>,
}

impl Entity {
    pub fn new(sprite: Sprite, behavior: impl Behavior + 'static) -> Self {
        Self {
            sprite,
            behavior: Box::new(behavior),
        }
    }

    /// Dead slot filler; see [`Sprite::tombstone`].
    pub fn placeholder() -> Self {
        Self::new(Sprite::tombstone(), Inert)
    }

    pub fn blit(&self, dst: &mut Image, view_y: i32) {
        self.behavior.blit(&self.sprite, dst, view_y);
    }
}

/// Does nothing.
pub struct Inert;

impl Behavior for Inert {
    fn tick(&mut self, _me: &mut Sprite, _world: &mut World) -> Status {
        Status::Continue
    }
}
