//! The player's ship.

use super::behavior::{Behavior, Entity, Status};
use super::explosion::ExplosionSize;
use super::sprite::{Hitbox, Sprite, SpriteKind};
use super::weapon;
use super::world::{Context, World};
use crate::audio::Sfx;
use crate::defs::{S_WIDTH, SpriteFlags};
use crate::fix::Fix;
use crate::input::Buttons;
use crate::renderer::Color;
use log::info;

/// Spawn point, screen x and offset below the top of the view.
pub const SPAWN_X: i32 = 48;
pub const SPAWN_Y: i32 = 96;
/// Ticks between losing a ship and the next one appearing.
pub const RESPAWN_TICKS: u32 = 120;
/// Blinking grace period after a respawn.
pub const INVULNERABLE_TICKS: u32 = 120;
/// Largest per-axis step value; movement is `step * speed / 2` pixels.
const MAX_STEP: i32 = 4;

/// Ship frames: level, up, hard up, down, hard down.
fn ship_frame(dy: i32) -> usize {
    match dy {
        d if d <= -MAX_STEP => 2,
        d if d < 0 => 1,
        d if d >= MAX_STEP => 4,
        d if d > 0 => 3,
        _ => 0,
    }
}

/// Steps ramp up 1, 2, 4 while a direction is held and reset on release
/// or reversal.
fn accelerate(step: i32, dir: i32) -> i32 {
    if dir == 0 {
        0
    } else if step.signum() == dir {
        (step * 2).clamp(-MAX_STEP, MAX_STEP)
    } else {
        dir
    }
}

pub struct Player {
    dx: i32,
    dy: i32,
    cooldown: u32,
    invulnerable: u32,
}

impl Player {
    /// Fresh ship at the spawn point; sets the session's alive flag.
    pub fn spawn(ctx: &mut Context, invulnerable: u32) -> Entity {
        let img = ctx.sheets.ship.frame(0);
        let (w, h) = (img.width(), img.height());
        let flags = SpriteFlags::COLLIDE_SPRITES | SpriteFlags::COLLIDE_TERRAIN | SpriteFlags::NO_SCROLL;
        let y = ctx.scroll.y + SPAWN_Y;
        let mut sprite = Sprite::new(ctx.next_id(), SpriteKind::Player, Fix::from_int(SPAWN_X), y, flags).with_image(img);
        // forgiving hitbox
        sprite.hitbox = Hitbox {
            x: w / 6,
            y: h / 4,
            w: w - w / 3,
            h: h - h / 2,
        };
        ctx.player.alive = true;
        ctx.player.pos = sprite.center();
        info!("player spawned, {} ships in reserve", ctx.player.lives);
        Entity::new(
            sprite,
            Player {
                dx: 0,
                dy: 0,
                cooldown: 0,
                invulnerable,
            },
        )
    }

    pub fn invulnerable(&self) -> bool {
        self.invulnerable > 0
    }

    fn die(&mut self, me: &Sprite, ctx: &mut Context) -> Status {
        ctx.explode(me.center(), ExplosionSize::Large);
        ctx.play(Sfx::PlayerDeath, me.x);
        ctx.flash(Color::gray(8));
        ctx.player.alive = false;
        ctx.player.respawn_ticks = RESPAWN_TICKS;
        info!("player destroyed at ({}, {})", me.x, me.y);
        Status::Die
    }
}

impl Behavior for Player {
    fn tick(&mut self, me: &mut Sprite, world: &mut World) -> Status {
        let ctx = &mut world.ctx;
        let (ix, iy) = ctx.input.direction();
        self.dx = accelerate(self.dx, ix);
        self.dy = accelerate(self.dy, iy);
        let speed = ctx.player.speed;
        me.move_by(
            Fix::from_int(self.dx * speed) / 2,
            Fix::from_int(self.dy * speed) / 2,
        );
        me.x = me.x.clamp(Fix::ZERO, Fix::from_int(S_WIDTH - me.width()));
        me.y = me.y.clamp(Fix::ZERO, Fix::from_int(ctx.level_height - me.height()));
        me.update_image(ctx.sheets.ship.frame(ship_frame(self.dy)), false);

        if self.invulnerable > 0 {
            self.invulnerable -= 1;
            me.flags.set(SpriteFlags::NO_DRAW, self.invulnerable & 4 != 0);
        } else {
            me.flags.remove(SpriteFlags::NO_DRAW);
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown == 0 && ctx.input.held(Buttons::FIRE) {
            self.cooldown = weapon::fire(ctx, me);
        }
        ctx.player.pos = me.center();

        if self.invulnerable == 0 && world.hits_terrain(me) {
            return self.die(me, &mut world.ctx);
        }
        Status::Continue
    }

    fn on_damage(&mut self, me: &mut Sprite, _amount: i32, ctx: &mut Context) -> Status {
        if self.invulnerable > 0 {
            return Status::Continue;
        }
        self.die(me, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSnapshot;
    use crate::sim::testutil::empty_world;
    use crate::sim::world::{LAYER_BULLET, LAYER_PLAYER};

    fn with_ship(invulnerable: u32) -> World {
        let mut w = empty_world();
        let e = Player::spawn(&mut w.ctx, invulnerable);
        w.layers[LAYER_PLAYER].push(e);
        w
    }

    fn hold(w: &mut World, b: Buttons) {
        w.ctx.input = InputSnapshot::default().next(b);
    }

    #[test]
    fn steps_ramp_up_and_reset() {
        assert_eq!(accelerate(0, 1), 1);
        assert_eq!(accelerate(1, 1), 2);
        assert_eq!(accelerate(2, 1), 4);
        assert_eq!(accelerate(4, 1), 4);
        assert_eq!(accelerate(4, -1), -1);
        assert_eq!(accelerate(-2, 0), 0);
    }

    #[test]
    fn ship_stays_on_screen() {
        let mut w = with_ship(0);
        hold(&mut w, Buttons::LEFT | Buttons::UP);
        for _ in 0..100 {
            w.tick_layer(LAYER_PLAYER);
        }
        let s = w.player().expect("alive");
        assert_eq!((s.x, s.y), (Fix::ZERO, Fix::ZERO));
        assert_eq!(w.ctx.player.pos, s.center());
    }

    #[test]
    fn holding_fire_respects_cooldown() {
        let mut w = with_ship(0);
        hold(&mut w, Buttons::FIRE);
        for _ in 0..9 {
            w.tick_layer(LAYER_PLAYER);
        }
        // first shot on tick 1, second once the 8 tick cooldown is over
        assert_eq!(w.layers[LAYER_BULLET].len(), 2);
    }

    #[test]
    fn damage_ignored_while_blinking() {
        let mut w = with_ship(INVULNERABLE_TICKS);
        assert!(!w.damage(LAYER_PLAYER, 0, 1));
        assert!(w.ctx.player.alive);

        let mut w = with_ship(0);
        assert!(w.damage(LAYER_PLAYER, 0, 1));
        assert!(!w.ctx.player.alive);
        assert_eq!(w.ctx.player.respawn_ticks, RESPAWN_TICKS);
    }
}
