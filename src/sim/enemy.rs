//! Enemy behaviours.

use super::behavior::{Behavior, Entity, Status};
use super::bullet::Bullet;
use super::explosion::ExplosionSize;
use super::powerup::Powerup;
use super::sprite::{Sprite, SpriteKind};
use super::world::{BULLET_ENEMY_FRAME, Context, ENEMY_BULLET_FRAMES, LAYER_ENEMY, World};
use crate::audio::Sfx;
use crate::defs::{EnemyKind, PowerupKind, SpriteFlags};
use crate::fix::{DELTA_SINE, Fix, Fix2D, fix_norm};
use crate::renderer::{Color, Image};

/// Ticks an enemy stays tinted after a non-fatal hit.
const HIT_FLASH: i32 = 4;
/// Base speed of enemy shots before the difficulty multiplier.
const ENEMY_BULLET_SPEED: i32 = 3;
/// Vertical swing of a Waver per unit of its multiplier.
const WAVE_SCALE: i32 = 16;
/// Ticks per animation frame.
const ANIM_TICKS: u32 = 8;

pub struct Enemy {
    kind: EnemyKind,
    hp: i32,
    fire_ticks: i32,
    ticks: u32,
    flash: i32,
    /// Wave amplitude multiplier (Waver).
    sine_mul: i32,
    /// Altitude to settle at (Gunner); `None` once reached.
    final_y: Option<Fix>,
    drop: Option<PowerupKind>,
}

impl Enemy {
    pub fn entity(
        ctx: &mut Context,
        kind: EnemyKind,
        subtype: i32,
        x: Fix,
        y: Fix,
        drop: Option<PowerupKind>,
    ) -> Entity {
        let info = kind.info();
        let img = ctx.sheets.enemies.frame(info.frame);
        // scrolled here rather than by the world so contact is tested where
        // the sprite ends the tick
        let flags = SpriteFlags::COLLIDE_SPRITES | SpriteFlags::TRACKABLE | SpriteFlags::NO_SCROLL;
        let sprite = Sprite::new(ctx.next_id(), SpriteKind::Enemy, x, y, flags).with_image(img);

        let fire_ticks = if info.fire_ticks > 0 {
            // staggered so a formation does not fire in unison
            let xr = (ctx.rng.next_int() & 0xFFFF) as i32;
            ctx.scale_fire_ticks(((xr ^ ((xr >> 8) + 79)) * 37) & 127)
        } else {
            0
        };
        let sine_mul = (if subtype & 1 == 1 { 1 } else { -1 }) * ((subtype + 1) / 2);
        let final_y = match (kind, subtype) {
            (EnemyKind::Gunner, 0) => Some(ctx.player.pos.y),
            (EnemyKind::Gunner, n) => Some(ctx.scroll.y + 16 + (n - 1) * 48),
            _ => None,
        };

        Entity::new(
            sprite,
            Enemy {
                kind,
                hp: info.hp,
                fire_ticks,
                ticks: 0,
                flash: 0,
                sine_mul,
                final_y,
                drop,
            },
        )
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Velocity for this tick, relative to the scrolling terrain.
    fn step(&mut self, me: &Sprite, ctx: &Context) -> Fix2D {
        let speed = self.kind.info().speed;
        match self.kind {
            EnemyKind::Drifter => Fix2D::new(-speed, Fix::ZERO),
            EnemyKind::Waver => {
                let phase = ((self.ticks << 2) & 127) as usize;
                Fix2D::new(-speed, DELTA_SINE[phase] * (WAVE_SCALE * self.sine_mul))
            }
            EnemyKind::Gunner => match self.final_y {
                Some(target) => {
                    let diff = target - me.y;
                    if diff.abs() <= Fix::ONE {
                        self.final_y = None;
                        Fix2D::new(ctx.x_speed / 2, diff)
                    } else if diff > Fix::ZERO {
                        Fix2D::new(ctx.x_speed / 2, Fix::ONE)
                    } else {
                        Fix2D::new(ctx.x_speed / 2, -Fix::ONE)
                    }
                }
                None => Fix2D::new(-speed, Fix::ZERO),
            },
        }
    }

    fn fire(&self, me: &Sprite, ctx: &mut Context) {
        let from = me.center();
        let dir = match self.kind {
            EnemyKind::Gunner => fix_norm(ctx.player.pos - from, Fix::from_int(ENEMY_BULLET_SPEED)),
            _ => Fix2D::from_ints(-ENEMY_BULLET_SPEED, 0),
        };
        if dir.is_zero() {
            return;
        }
        let vel = dir * ctx.difficulty.enemy_bullet_speed();
        let e = Bullet::new(vel, 1)
            .hostile()
            .frames(BULLET_ENEMY_FRAME, ENEMY_BULLET_FRAMES, 4)
            .into_entity(ctx, from);
        ctx.spawn(super::world::LAYER_BULLET, e);
        ctx.play(Sfx::EnemyFire, me.x);
    }
}

impl Behavior for Enemy {
    fn tick(&mut self, me: &mut Sprite, world: &mut World) -> Status {
        self.ticks += 1;
        self.flash = (self.flash - 1).max(0);

        let v = self.step(me, &world.ctx);
        me.move_by(v.x - world.ctx.x_speed, v.y);

        let info = self.kind.info();
        let frame = info.frame + (self.ticks / ANIM_TICKS) as usize % info.frames;
        me.update_image(world.ctx.sheets.enemies.frame(frame), false);

        if info.fire_ticks > 0 {
            self.fire_ticks -= 1;
            if self.fire_ticks <= 0 {
                self.fire_ticks += world.ctx.scale_fire_ticks(info.fire_ticks).max(1);
                if world.ctx.player.alive {
                    self.fire(me, &mut world.ctx);
                }
            }
        }

        me.compute_collision_grid(world.ctx.level_height);
        world.damage_player_on_touch(me, 1);
        Status::Continue
    }

    fn on_damage(&mut self, me: &mut Sprite, amount: i32, ctx: &mut Context) -> Status {
        self.hp -= amount;
        if self.hp > 0 {
            self.flash = HIT_FLASH;
            ctx.play(Sfx::Hit, me.x);
            return Status::Continue;
        }
        ctx.add_score(self.kind.info().score);
        ctx.explode(me.center(), ExplosionSize::Medium);
        ctx.play(Sfx::Explosion, me.x);
        if let Some(kind) = self.drop {
            let e = Powerup::entity(ctx, kind, me.center());
            ctx.spawn(LAYER_ENEMY, e);
        }
        Status::Die
    }

    fn blit(&self, me: &Sprite, dst: &mut Image, view_y: i32) {
        match me.image() {
            Some(img) if self.flash > 0 && !me.flags.contains(SpriteFlags::NO_DRAW) => {
                let mut lit = Image::clone(img);
                lit.add_solid(Color::gray(self.flash * 3));
                dst.blit_all(&lit, me.x.to_int(), me.y.to_int() - view_y);
            }
            _ => me.blit(dst, view_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testutil::empty_world;
    use crate::sim::world::{LAYER_BULLET, LAYER_EFFECT, LAYER_PLAYER};
    use std::cell::Cell;
    use std::rc::Rc;

    fn spawn(w: &mut World, kind: EnemyKind, subtype: i32, drop: Option<PowerupKind>) -> usize {
        let e = Enemy::entity(&mut w.ctx, kind, subtype, Fix::from_int(200), Fix::from_int(100), drop);
        w.layers[LAYER_ENEMY].push(e);
        w.layers[LAYER_ENEMY].len() - 1
    }

    #[test]
    fn kill_scores_explodes_and_drops() {
        let mut w = empty_world();
        let i = spawn(&mut w, EnemyKind::Drifter, 0, Some(PowerupKind::Beam));
        assert!(!w.damage(LAYER_ENEMY, i, 1));
        assert_eq!(w.ctx.score, 0);
        assert!(w.damage(LAYER_ENEMY, i, 1));
        assert_eq!(w.ctx.score, 100);
        w.flush_spawns();
        assert_eq!(w.layers[LAYER_EFFECT].len(), 1);
        assert_eq!(w.count(SpriteKind::Pickup), 1);
    }

    /// Player-kind box that counts the hits it takes.
    struct Ship(Rc<Cell<i32>>);

    impl Behavior for Ship {
        fn tick(&mut self, _me: &mut Sprite, _world: &mut World) -> Status {
            Status::Continue
        }

        fn on_damage(&mut self, _me: &mut Sprite, _amount: i32, _ctx: &mut Context) -> Status {
            self.0.set(self.0.get() + 1);
            Status::Continue
        }
    }

    #[test]
    fn contact_is_tested_where_the_enemy_ends_the_tick() {
        let mut w = empty_world();
        w.ctx.x_speed = Fix::from_int(8);
        let hits = Rc::new(Cell::new(0));
        let flags = SpriteFlags::COLLIDE_SPRITES | SpriteFlags::NO_SCROLL | SpriteFlags::BOX_CHECK_ONLY;
        let mut ship = Sprite::new(w.ctx.next_id(), SpriteKind::Player, Fix::from_int(100), Fix::from_int(100), flags)
            .with_image(Rc::new(Image::filled(16, 16, Color::WHITE)));
        ship.compute_collision_grid(w.ctx.level_height);
        w.layers[LAYER_PLAYER].push(Entity::new(ship, Ship(Rc::clone(&hits))));

        // after its own step the drifter sits at 120, clear of the ship;
        // the scroll then carries it to 112
        let i = spawn(&mut w, EnemyKind::Drifter, 0, None);
        let speed = EnemyKind::Drifter.info().speed;
        w.layers[LAYER_ENEMY][i].sprite.x = Fix::from_int(120) + speed;
        w.tick_layer(LAYER_ENEMY);

        assert_eq!(w.layers[LAYER_ENEMY][i].sprite.x, Fix::from_int(112));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn waver_oscillates() {
        let mut w = empty_world();
        spawn(&mut w, EnemyKind::Waver, 3, None);
        let mut ys = Vec::new();
        for _ in 0..32 {
            w.tick_layer(LAYER_ENEMY);
            ys.push(w.layers[LAYER_ENEMY][0].sprite.y);
        }
        let lo = ys.iter().min().copied().unwrap_or_default();
        let hi = ys.iter().max().copied().unwrap_or_default();
        assert!(hi - lo > Fix::from_int(4));
    }

    #[test]
    fn gunner_settles_then_aims() {
        let mut w = empty_world();
        w.ctx.player.alive = true;
        w.ctx.player.pos = Fix2D::from_ints(40, 60);
        spawn(&mut w, EnemyKind::Gunner, 2, None);
        // target altitude 16 + 48
        for _ in 0..60 {
            w.tick_layer(LAYER_ENEMY);
        }
        assert_eq!(w.layers[LAYER_ENEMY][0].sprite.y, Fix::from_int(64));

        for _ in 0..200 {
            w.tick_layer(LAYER_ENEMY);
        }
        let shot = w.layers[LAYER_BULLET]
            .iter()
            .find(|b| b.sprite.kind == SpriteKind::EnemyBullet);
        assert!(shot.is_some());
    }
}
