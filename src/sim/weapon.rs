//! Player weapon fire patterns.

use super::bullet::Bullet;
use super::explosion::ExplosionSize;
use super::sprite::Sprite;
use super::world::{BULLET_BEAM_FRAME, BULLET_PULSE_FRAME, BULLET_SPRAY_FRAME, Context, LAYER_BULLET};
use crate::audio::Sfx;
use crate::defs::{MAX_WEAPON_LEVEL, WeaponKind};
use crate::fix::{Fix, Fix2D, FixPolar2D};

const LEVELS: usize = MAX_WEAPON_LEVEL as usize + 1;

/// Per-level numbers of one weapon.
struct WeaponStats {
    cooldown: [u32; LEVELS],
    damage: [i32; LEVELS],
    shots: [usize; LEVELS],
    speed: i32,
}

static STATS: [WeaponStats; 4] = [
    // pulse: parallel shots
    WeaponStats {
        cooldown: [8, 7, 6],
        damage: [10, 6, 8],
        shots: [1, 2, 3],
        speed: 6,
    },
    // spray: fan of shots
    WeaponStats {
        cooldown: [12, 12, 12],
        damage: [8, 9, 9],
        shots: [3, 5, 7],
        speed: 5,
    },
    // beam: one piercing shot
    WeaponStats {
        cooldown: [14, 14, 14],
        damage: [14, 16, 18],
        shots: [1, 1, 1],
        speed: 8,
    },
    // track: homing shots
    WeaponStats {
        cooldown: [16, 16, 16],
        damage: [6, 9, 12],
        shots: [1, 2, 3],
        speed: super::bullet::TRACK_VEL,
    },
];

/// Vertical spacing between parallel pulse shots.
const PULSE_SPACING: i32 = 6;
/// Angle between neighbouring spray shots (π/16).
const SPRAY_SPREAD: Fix = Fix::from_raw(50);
/// Angle between neighbouring homing shots at launch (π/8).
const TRACK_SPREAD: Fix = Fix::from_raw(100);

/// Ticks until the weapon can fire again.
pub fn cooldown(kind: WeaponKind, level: u8) -> u32 {
    STATS[kind.index()].cooldown[level.min(MAX_WEAPON_LEVEL) as usize]
}

/// `n` values centred on zero, `step` apart.
fn spread(n: usize, step: Fix) -> impl Iterator<Item = Fix> {
    (0..n).map(move |i| step * (2 * i as i32 - (n as i32 - 1)) / 2)
}

/// Fire the selected weapon from the ship's nose. Returns the cooldown.
pub fn fire(ctx: &mut Context, ship: &Sprite) -> u32 {
    let kind = ctx.player.weapon;
    let level = ctx.player.level(kind) as usize;
    let st = &STATS[kind.index()];
    let (damage, shots, speed) = (st.damage[level], st.shots[level], Fix::from_int(st.speed));
    let nose = Fix2D::new(
        ship.x + Fix::from_int(ship.width()),
        ship.y + Fix::from_int(ship.height()) / 2,
    );

    let mut bullets = Vec::with_capacity(shots);
    match kind {
        WeaponKind::Pulse => {
            for dy in spread(shots, Fix::from_int(PULSE_SPACING)) {
                let b = Bullet::new(Fix2D::new(speed, Fix::ZERO), damage).frames(BULLET_PULSE_FRAME, 1, 1);
                bullets.push((b, Fix2D::new(nose.x, nose.y + dy)));
            }
        }
        WeaponKind::Spray => {
            for angle in spread(shots, SPRAY_SPREAD) {
                let vel = FixPolar2D::new(speed, angle).to_rect();
                let b = Bullet::new(vel, damage).frames(BULLET_SPRAY_FRAME, 1, 1);
                bullets.push((b, nose));
            }
        }
        WeaponKind::Beam => {
            let b = Bullet::new(Fix2D::new(speed, Fix::ZERO), damage)
                .frames(BULLET_BEAM_FRAME, 1, 1)
                .piercing()
                .explodes_as(ExplosionSize::Small);
            bullets.push((b, nose));
        }
        WeaponKind::Track => {
            for angle in spread(shots, TRACK_SPREAD) {
                let b = Bullet::new(Fix2D::ZERO, damage).tracking(level as u8, angle);
                bullets.push((b, nose));
            }
        }
    }

    for (b, at) in bullets {
        let e = b.into_entity(ctx, at);
        ctx.spawn(LAYER_BULLET, e);
    }
    ctx.play(Sfx::PlayerFire, ship.x);
    cooldown(kind, level as u8)
}
