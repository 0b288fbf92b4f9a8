use super::behavior::{Behavior, Entity, Status};
use super::sprite::{Sprite, SpriteKind};
use super::world::{Context, LAYER_PLAYER, World};
use crate::audio::Sfx;
use crate::defs::{POWERUP_SCORE, PowerupKind, SpriteFlags};
use crate::fix::{Fix, Fix2D};
use log::debug;

/// Pickup that drifts with the terrain until the ship touches it.
pub struct Powerup {
    kind: PowerupKind,
}

impl Powerup {
    pub fn entity(ctx: &mut Context, kind: PowerupKind, center: Fix2D) -> Entity {
        let img = ctx.sheets.powerups.frame(kind.frame());
        let x = center.x - Fix::from_int(img.width()) / 2;
        let y = center.y - Fix::from_int(img.height()) / 2;
        let sprite = Sprite::new(ctx.next_id(), SpriteKind::Pickup, x, y, SpriteFlags::COLLIDE_SPRITES)
            .with_image(img);
        Entity::new(sprite, Powerup { kind })
    }
}

/// Apply a pickup to the session. Anything that cannot be used any more
/// (full lives, maxed weapon) turns into points.
pub fn collect(kind: PowerupKind, ctx: &mut Context, x: Fix) {
    let used = match kind {
        PowerupKind::Score => false,
        PowerupKind::OneUp => ctx.player.collect_one_up(),
        _ => kind.weapon().is_some_and(|w| ctx.player.collect_weapon(w)),
    };
    if !used {
        ctx.add_score(POWERUP_SCORE);
    }
    let sfx = if kind == PowerupKind::OneUp && used {
        Sfx::OneUp
    } else {
        Sfx::Powerup
    };
    ctx.play(sfx, x);
    debug!("collected {kind:?}, used: {used}");
}

impl Behavior for Powerup {
    fn tick(&mut self, me: &mut Sprite, world: &mut World) -> Status {
        me.compute_collision_grid(world.ctx.level_height);
        let touched = world
            .player_index()
            .is_some_and(|i| me.hits(&world.layers[LAYER_PLAYER][i].sprite));
        if touched {
            collect(self.kind, &mut world.ctx, me.x);
            return Status::Die;
        }
        Status::Continue
    }
}
