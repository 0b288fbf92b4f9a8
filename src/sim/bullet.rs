//! Player and enemy shots.
//!
//! Shots move in two half steps per tick so fast bullets cannot tunnel
//! through thin sprites or terrain.

use super::behavior::{Behavior, Entity, Status};
use super::explosion::ExplosionSize;
use super::sprite::{Sprite, SpriteId, SpriteKind};
use super::world::{BULLET_TRACK_FRAME, Context, LAYER_ENEMY, TRACK_FRAMES, World};
use crate::defs::SpriteFlags;
use crate::fix::{Fix, Fix2D, FixPolar2D, subtract_angles};
use smallvec::SmallVec;

/// Speed of homing shots, pixels per tick.
pub const TRACK_VEL: i32 = 6;

/// Homing parameters per weapon level: acquisition cone half-angle and
/// the largest turn per tick.
const TRACK_CONE: [Fix; 3] = [Fix::from_raw(134), Fix::from_raw(402), Fix::MAX];
const TRACK_TURN: [Fix; 3] = [Fix::from_raw(10), Fix::from_raw(20), Fix::from_raw(40)];

#[derive(Debug, Clone, Copy)]
struct Tracking {
    level: usize,
    angle: Fix,
    target: Option<SpriteId>,
}

pub struct Bullet {
    vel: Fix2D,
    damage: i32,
    pierce: bool,
    hostile: bool,
    expl: ExplosionSize,
    first_frame: usize,
    frames: usize,
    anim: u32,
    ticks: u32,
    track: Option<Tracking>,
    /// Targets already struck; a piercing shot hurts each one once.
    struck: SmallVec<[SpriteId; 4]>,
}

impl Bullet {
    pub fn new(vel: Fix2D, damage: i32) -> Self {
        Self {
            vel,
            damage,
            pierce: false,
            hostile: false,
            expl: ExplosionSize::TinyWarm,
            first_frame: 0,
            frames: 1,
            anim: 1,
            ticks: 0,
            track: None,
            struck: SmallVec::new(),
        }
    }

    /// Animate over `frames` sheet frames, advancing every `anim` ticks.
    pub fn frames(mut self, first: usize, frames: usize, anim: u32) -> Self {
        self.first_frame = first;
        self.frames = frames.max(1);
        self.anim = anim.max(1);
        self
    }

    pub fn piercing(mut self) -> Self {
        self.pierce = true;
        self
    }

    /// Fired by enemies: hurts the player instead of enemies.
    pub fn hostile(mut self) -> Self {
        self.hostile = true;
        self.expl = ExplosionSize::TinyCool;
        self
    }

    pub fn explodes_as(mut self, size: ExplosionSize) -> Self {
        self.expl = size;
        self
    }

    /// Steer toward trackable enemies, starting along `angle`.
    pub fn tracking(mut self, level: u8, angle: Fix) -> Self {
        self.track = Some(Tracking {
            level: (level as usize).min(TRACK_CONE.len() - 1),
            angle,
            target: None,
        });
        self.vel = FixPolar2D::new(Fix::from_int(TRACK_VEL), angle).to_rect();
        self.first_frame = track_frame(angle);
        self.frames = 1;
        self
    }

    pub fn vel(&self) -> Fix2D {
        self.vel
    }

    /// Build the entity centred on `center`.
    pub fn into_entity(self, ctx: &mut Context, center: Fix2D) -> Entity {
        let img = ctx.sheets.bullets.frame(self.first_frame);
        let kind = if self.hostile {
            SpriteKind::EnemyBullet
        } else {
            SpriteKind::PlayerBullet
        };
        let x = center.x - Fix::from_int(img.width()) / 2;
        let y = center.y - Fix::from_int(img.height()) / 2;
        let flags = SpriteFlags::COLLIDE_SPRITES | SpriteFlags::COLLIDE_TERRAIN | SpriteFlags::NO_SCROLL;
        let sprite = Sprite::new(ctx.next_id(), kind, x, y, flags).with_image(img);
        Entity::new(sprite, self)
    }

    fn animate(&mut self, me: &mut Sprite, ctx: &Context) {
        if let Some(t) = self.track {
            me.update_image_centered(ctx.sheets.bullets.frame(track_frame(t.angle)));
        } else if self.frames > 1 && self.ticks % self.anim == 0 {
            let f = self.first_frame + (self.ticks / self.anim) as usize % self.frames;
            me.update_image_centered(ctx.sheets.bullets.frame(f));
        }
    }

    /// Pick a target if needed and turn toward it.
    fn steer(&mut self, me: &Sprite, world: &World) {
        let Some(t) = self.track.as_mut() else { return };
        let here = me.center();

        let locked = t.target.and_then(|id| world.find(LAYER_ENEMY, id));
        let target = match locked {
            Some(i) => Some(i),
            None => {
                let cone = TRACK_CONE[t.level];
                let angle = t.angle;
                let best = world.layers[LAYER_ENEMY]
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| !e.sprite.is_dead() && e.sprite.flags.contains(SpriteFlags::TRACKABLE))
                    .filter_map(|(i, e)| {
                        let d = e.sprite.track_point() - here;
                        let off = subtract_angles(Fix::atan2(d.y, d.x), angle).abs();
                        (off <= cone).then(|| (d.approx_length(), i))
                    })
                    .min_by_key(|&(dist, _)| dist);
                best.map(|(_, i)| i)
            }
        };
        t.target = target.map(|i| world.layers[LAYER_ENEMY][i].sprite.id);

        if let Some(i) = target {
            let d = world.layers[LAYER_ENEMY][i].sprite.track_point() - here;
            let max = TRACK_TURN[t.level];
            let turn = subtract_angles(Fix::atan2(d.y, d.x), t.angle).clamp(-max, max);
            t.angle += turn;
        }
        self.vel = FixPolar2D::new(Fix::from_int(TRACK_VEL), t.angle).to_rect();
    }

    /// Damage enemies under the shot, nearest along the flight path first.
    /// Returns `true` once the shot is spent.
    fn strike(&mut self, me: &Sprite, world: &mut World) -> bool {
        let here = me.center();
        let mut hits: SmallVec<[(Fix, usize); 4]> = world.layers[LAYER_ENEMY]
            .iter()
            .enumerate()
            .filter(|(_, e)| e.sprite.kind == SpriteKind::Enemy && !self.struck.contains(&e.sprite.id))
            .filter(|(_, e)| me.hits(&e.sprite))
            .map(|(i, e)| ((e.sprite.center() - here).dot(self.vel), i))
            .collect();
        hits.sort_by_key(|&(along, _)| along);

        for (_, i) in hits {
            self.struck.push(world.layers[LAYER_ENEMY][i].sprite.id);
            let died = world.damage(LAYER_ENEMY, i, self.damage);
            if !died || !self.pierce {
                return true;
            }
        }
        false
    }
}

/// Frame of the rotated homing shot closest to `angle`.
fn track_frame(angle: Fix) -> usize {
    let step = (angle * TRACK_FRAMES as i32 / Fix::TAU).round();
    BULLET_TRACK_FRAME + step.rem_euclid(TRACK_FRAMES as i32) as usize
}

impl Behavior for Bullet {
    fn tick(&mut self, me: &mut Sprite, world: &mut World) -> Status {
        self.ticks += 1;
        self.steer(me, world);
        self.animate(me, &world.ctx);

        let half = self.vel / Fix::from_int(2);
        for _ in 0..2 {
            me.move_by(half.x, half.y);
            me.compute_collision_grid(world.ctx.level_height);
            let spent = if world.hits_terrain(me) {
                true
            } else if self.hostile {
                world.damage_player_on_touch(me, 1)
            } else {
                self.strike(me, world)
            };
            if spent {
                world.ctx.explode(me.center(), self.expl);
                return Status::Die;
            }
        }
        Status::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testutil::{Target, empty_world};
    use crate::sim::world::LAYER_BULLET;

    fn fire(world: &mut World, b: Bullet, x: i32, y: i32) {
        let e = b.into_entity(&mut world.ctx, Fix2D::from_ints(x, y));
        world.layers[LAYER_BULLET].push(e);
    }

    #[test]
    fn track_frames_follow_angle() {
        assert_eq!(track_frame(Fix::ZERO), BULLET_TRACK_FRAME);
        assert_eq!(track_frame(Fix::PI), BULLET_TRACK_FRAME + 8);
        assert_eq!(track_frame(-Fix::PI / 2), BULLET_TRACK_FRAME + 12);
    }

    #[test]
    fn plain_shot_stops_at_first_target() {
        let mut w = empty_world();
        let (a, hits_a) = Target::spawn(&mut w, 120, 100, 1);
        let (_, hits_b) = Target::spawn(&mut w, 136, 100, 1);
        fire(&mut w, Bullet::new(Fix2D::from_ints(8, 0), 5), 100, 108);
        for _ in 0..10 {
            w.tick_layer(LAYER_BULLET);
        }
        assert_eq!(hits_a.get(), 1);
        assert_eq!(hits_b.get(), 0);
        assert!(w.find(LAYER_ENEMY, a).is_none());
        assert!(w.layers[LAYER_BULLET].is_empty());
    }

    #[test]
    fn piercing_shot_passes_through_kills() {
        let mut w = empty_world();
        let (_, hits_a) = Target::spawn(&mut w, 120, 100, 1);
        let (_, hits_b) = Target::spawn(&mut w, 160, 100, 1);
        fire(&mut w, Bullet::new(Fix2D::from_ints(8, 0), 5).piercing(), 100, 108);
        for _ in 0..12 {
            w.tick_layer(LAYER_BULLET);
        }
        assert_eq!(hits_a.get(), 1);
        assert_eq!(hits_b.get(), 1);
    }

    #[test]
    fn piercing_shot_stopped_by_survivor() {
        let mut w = empty_world();
        let (_, hits_a) = Target::spawn(&mut w, 120, 100, 50);
        let (_, hits_b) = Target::spawn(&mut w, 160, 100, 1);
        fire(&mut w, Bullet::new(Fix2D::from_ints(8, 0), 5).piercing(), 100, 108);
        for _ in 0..12 {
            w.tick_layer(LAYER_BULLET);
        }
        assert_eq!(hits_a.get(), 1);
        assert_eq!(hits_b.get(), 0);
    }

    #[test]
    fn homing_shot_turns_toward_target() {
        let mut w = empty_world();
        Target::spawn(&mut w, 200, 20, 100);
        fire(&mut w, Bullet::new(Fix2D::ZERO, 1).tracking(2, Fix::ZERO), 100, 150);
        let y0 = w.layers[LAYER_BULLET][0].sprite.center().y;
        w.tick_layer(LAYER_BULLET);
        let y1 = w.layers[LAYER_BULLET]
            .first()
            .map(|e| e.sprite.center().y)
            .expect("still flying");
        // climbing toward the target
        assert!(y1 < y0);
    }
}
