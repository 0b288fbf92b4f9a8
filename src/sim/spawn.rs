//! Turning stage timeline entries into live entities.

use super::behavior::{Behavior, Entity, Status};
use super::enemy::Enemy;
use super::powerup::Powerup;
use super::sprite::{Sprite, SpriteKind};
use super::world::{Context, LAYER_BACK, LAYER_ENEMY, World};
use crate::assets::{LayerRole, SpawnDesc, SpawnKind};
use crate::defs::{S_WIDTH, SpriteFlags};
use crate::fix::{Fix, Fix2D};
use log::debug;

const HIDDEN: SpriteFlags = SpriteFlags::NO_DRAW
    .union(SpriteFlags::NO_SCROLL)
    .union(SpriteFlags::SURVIVE_OFF_SCREEN);

/// Build the entity for `desc` and the layer it belongs in. Objects enter
/// at the right screen edge plus `x_rel`.
pub fn spawn_object(desc: &SpawnDesc, ctx: &mut Context) -> (usize, Entity) {
    if desc.delay > 0 {
        let sprite = Sprite::new(ctx.next_id(), SpriteKind::Script, Fix::ZERO, Fix::ZERO, HIDDEN);
        let inner = SpawnDesc { delay: 0, ..*desc };
        return (
            LAYER_BACK,
            Entity::new(
                sprite,
                Delayed {
                    ticks: desc.delay,
                    desc: inner,
                },
            ),
        );
    }

    let x = Fix::from_int(S_WIDTH + desc.x_rel);
    let y = Fix::from_int(desc.y);
    match desc.kind {
        SpawnKind::Enemy(kind) => (
            LAYER_ENEMY,
            Enemy::entity(ctx, kind, desc.subtype, x, y, desc.drop),
        ),
        SpawnKind::Powerup(kind) => {
            let e = Powerup::entity(ctx, kind, Fix2D::new(x, y));
            (LAYER_ENEMY, e)
        }
        SpawnKind::Script { role, index, visible } => {
            let sprite = Sprite::new(ctx.next_id(), SpriteKind::Script, x, y, HIDDEN);
            (LAYER_BACK, Entity::new(sprite, LayerScript { role, index, visible }))
        }
    }
}

/// Holds a timeline entry back for a number of ticks.
pub struct Delayed {
    ticks: u32,
    desc: SpawnDesc,
}

impl Behavior for Delayed {
    fn tick(&mut self, _me: &mut Sprite, world: &mut World) -> Status {
        self.ticks = self.ticks.saturating_sub(1);
        if self.ticks > 0 {
            return Status::Continue;
        }
        let (layer, e) = spawn_object(&self.desc, &mut world.ctx);
        world.ctx.spawn(layer, e);
        Status::Die
    }
}

/// Shows or hides one stage layer, then goes away.
pub struct LayerScript {
    role: LayerRole,
    index: usize,
    visible: bool,
}

impl Behavior for LayerScript {
    fn tick(&mut self, _me: &mut Sprite, world: &mut World) -> Status {
        debug!("{:?} layer {} visible: {}", self.role, self.index, self.visible);
        world.stage.set_visible(self.role, self.index, self.visible);
        Status::Die
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{EnemyKind, PowerupKind};
    use crate::sim::testutil::empty_world;

    #[test]
    fn enemies_enter_at_the_right_edge() {
        let mut w = empty_world();
        let mut d = SpawnDesc::new(0, SpawnKind::Enemy(EnemyKind::Drifter), 50);
        d.x_rel = 8;
        let (layer, e) = spawn_object(&d, &mut w.ctx);
        assert_eq!(layer, LAYER_ENEMY);
        assert_eq!((e.sprite.x, e.sprite.y), (Fix::from_int(328), Fix::from_int(50)));
        assert!(e.sprite.flags.contains(SpriteFlags::TRACKABLE));
    }

    #[test]
    fn delayed_entry_waits() {
        let mut w = empty_world();
        let mut d = SpawnDesc::new(0, SpawnKind::Powerup(PowerupKind::Score), 50);
        d.delay = 3;
        let (layer, e) = spawn_object(&d, &mut w.ctx);
        w.layers[layer].push(e);
        w.tick_layer(LAYER_BACK);
        w.tick_layer(LAYER_BACK);
        assert_eq!(w.count(SpriteKind::Pickup), 0);
        w.tick_layer(LAYER_BACK);
        assert_eq!(w.count(SpriteKind::Pickup), 1);
        assert!(w.layers[LAYER_BACK].is_empty());
    }
}
