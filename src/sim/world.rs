//! Game-session state shared by all behaviours during a tick.

use super::behavior::{Entity, Status};
use super::explosion::{Explosion, ExplosionSize};
use super::sprite::{Sprite, SpriteId, SpriteKind};
use crate::assets::{AssetError, AssetLoader};
use crate::audio::{SampleParams, Sfx};
use crate::defs::{
    Difficulty, MAX_LIVES, MAX_WEAPON_LEVEL, SpriteFlags, WeaponKind,
};
use crate::fix::{Fix, Fix2D, FixRandom};
use crate::input::InputSnapshot;
use crate::renderer::{Color, SpriteSheet};
use crate::world::{LayerScroll, Stage};
use log::debug;
use std::rc::Rc;

/// Sprite layers in update and draw order.
pub const LAYER_COUNT: usize = 5;
/// Drawn under the terrain: ground objects, timers, scripts.
pub const LAYER_BACK: usize = 0;
pub const LAYER_PLAYER: usize = 1;
pub const LAYER_ENEMY: usize = 2;
pub const LAYER_BULLET: usize = 3;
pub const LAYER_EFFECT: usize = 4;

/// Frame layout of the `bullets` sheet.
pub const BULLET_PULSE_FRAME: usize = 0;
pub const BULLET_SPRAY_FRAME: usize = 1;
pub const BULLET_BEAM_FRAME: usize = 2;
pub const BULLET_TRACK_FRAME: usize = 3;
pub const TRACK_FRAMES: usize = 16;
pub const BULLET_ENEMY_FRAME: usize = BULLET_TRACK_FRAME + TRACK_FRAMES;
pub const ENEMY_BULLET_FRAMES: usize = 4;
pub const BULLET_SHEET_LEN: usize = BULLET_ENEMY_FRAME + ENEMY_BULLET_FRAMES;

/// Distance past the view edge at which sprites are culled.
pub const OFF_SCREEN_MARGIN: i32 = 16;

/// Ship sheet: level, up, hard up, down, hard down.
pub const SHIP_FRAMES: usize = 5;

/// Sprite sheets every game session needs.
pub struct GameSheets {
    pub ship: SpriteSheet,
    pub bullets: SpriteSheet,
    pub explosions: SpriteSheet,
    pub powerups: SpriteSheet,
    pub enemies: SpriteSheet,
}

impl GameSheets {
    pub fn load(loader: &dyn AssetLoader) -> Result<Self, AssetError> {
        let sheets = Self {
            ship: loader.load_sprite_sheet("ship")?,
            bullets: loader.load_sprite_sheet("bullets")?,
            explosions: loader.load_sprite_sheet("explosions")?,
            powerups: loader.load_sprite_sheet("powerups")?,
            enemies: loader.load_sprite_sheet("enemies")?,
        };
        let need = [
            ("ship", sheets.ship.len(), SHIP_FRAMES),
            ("bullets", sheets.bullets.len(), BULLET_SHEET_LEN),
            ("explosions", sheets.explosions.len(), ExplosionSize::TOTAL_FRAMES),
            ("powerups", sheets.powerups.len(), 6),
            ("enemies", sheets.enemies.len(), 6),
        ];
        for (name, have, want) in need {
            if have < want {
                return Err(AssetError::malformed(
                    name,
                    format!("{have} frames, at least {want} required"),
                ));
            }
        }
        Ok(sheets)
    }
}

/// Lives, weapons and the last known position of the ship.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub lives: u32,
    /// Ship speed setting, 1..=4.
    pub speed: i32,
    pub weapon: WeaponKind,
    /// Per weapon: -1 not owned, otherwise upgrade level.
    pub levels: [i8; 4],
    pub alive: bool,
    pub respawn_ticks: u32,
    /// Centre of the ship, level space.
    pub pos: Fix2D,
}

pub const MIN_SPEED: i32 = 1;
pub const MAX_SPEED: i32 = 4;

impl PlayerState {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            speed: 2,
            weapon: WeaponKind::Pulse,
            levels: [0, -1, -1, -1],
            alive: false,
            respawn_ticks: 0,
            pos: Fix2D::ZERO,
        }
    }

    pub fn owns(&self, w: WeaponKind) -> bool {
        self.levels[w.index()] >= 0
    }

    pub fn level(&self, w: WeaponKind) -> u8 {
        self.levels[w.index()].max(0) as u8
    }

    /// Acquire or upgrade; `false` when already at the top level.
    pub fn collect_weapon(&mut self, w: WeaponKind) -> bool {
        let l = &mut self.levels[w.index()];
        if *l >= MAX_WEAPON_LEVEL as i8 {
            return false;
        }
        *l += 1;
        self.weapon = w;
        true
    }

    pub fn collect_one_up(&mut self) -> bool {
        if self.lives >= MAX_LIVES {
            return false;
        }
        self.lives += 1;
        true
    }

    /// Step to the next (or previous) owned weapon. Returns whether the
    /// selection changed.
    pub fn cycle_weapon(&mut self, forward: bool) -> bool {
        let old = self.weapon;
        let mut w = old;
        loop {
            w = if forward { w.next() } else { w.prev() };
            if self.owns(w) {
                break;
            }
        }
        self.weapon = w;
        w != old
    }
}

/// Everything a behaviour may read or change besides the sprite layers.
pub struct Context {
    pub tick: u32,
    pub scroll: LayerScroll,
    pub x_speed: Fix,
    pub level_height: i32,
    pub difficulty: Difficulty,
    pub input: InputSnapshot,
    pub sheets: Rc<GameSheets>,
    pub score: u32,
    pub high_score: u32,
    pub player: PlayerState,
    pub rng: FixRandom,
    next_id: SpriteId,
    spawned: Vec<(usize, Entity)>,
    sounds: Vec<(Sfx, SampleParams)>,
    flash: Color,
}

impl Context {
    pub fn new(sheets: Rc<GameSheets>, difficulty: Difficulty, lives: u32, high_score: u32, seed: u32) -> Self {
        Self {
            tick: 0,
            scroll: LayerScroll::default(),
            x_speed: Fix::ONE,
            level_height: crate::defs::S_GAME_HEIGHT,
            difficulty,
            input: InputSnapshot::default(),
            sheets,
            score: 0,
            high_score,
            player: PlayerState::new(lives),
            rng: FixRandom::new(seed),
            next_id: 1,
            spawned: Vec::new(),
            sounds: Vec::new(),
            flash: Color::BLACK,
        }
    }

    pub fn next_id(&mut self) -> SpriteId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    #[inline]
    pub fn view_y(&self) -> i32 {
        self.scroll.y.to_int()
    }

    /// Queue an entity; it joins `layer` right after the current entity.
    pub fn spawn(&mut self, layer: usize, e: Entity) {
        self.spawned.push((layer, e));
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<(usize, Entity)> {
        std::mem::take(&mut self.spawned)
    }

    pub fn play(&mut self, sfx: Sfx, x: Fix) {
        self.sounds.push((sfx, SampleParams::panned(x.to_int())));
    }

    pub fn take_sounds(&mut self) -> Vec<(Sfx, SampleParams)> {
        std::mem::take(&mut self.sounds)
    }

    pub fn flash(&mut self, c: Color) {
        self.flash += c;
    }

    pub fn take_flash(&mut self) -> Color {
        std::mem::replace(&mut self.flash, Color::BLACK)
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    #[inline]
    pub fn scale_fire_ticks(&self, v: i32) -> i32 {
        self.difficulty.scale_fire_ticks(v)
    }

    pub fn explode(&mut self, center: Fix2D, size: ExplosionSize) {
        let e = Explosion::entity(self, center, size);
        self.spawn(LAYER_EFFECT, e);
    }
}

pub struct World {
    pub layers: [Vec<Entity>; LAYER_COUNT],
    pub stage: Stage,
    pub ctx: Context,
}

impl World {
    pub fn new(stage: Stage, mut ctx: Context) -> Self {
        ctx.level_height = stage.level_height;
        ctx.x_speed = stage.x_speed;
        Self {
            layers: Default::default(),
            stage,
            ctx,
        }
    }

    /// Run one layer's behaviours in order, then drop the dead.
    ///
    /// Each entity is lifted out of its slot while it runs. Whatever it
    /// spawned joins the target layer as soon as it finishes, so spawns
    /// into a later layer (or later in this one) still run this tick.
    pub fn tick_layer(&mut self, layer: usize) {
        let mut i = 0;
        while i < self.layers[layer].len() {
            if !self.layers[layer][i].sprite.is_dead() {
                let mut e = std::mem::replace(&mut self.layers[layer][i], Entity::placeholder());
                self.tick_entity(&mut e);
                self.layers[layer][i] = e;
                self.flush_spawns();
            }
            i += 1;
        }
        self.layers[layer].retain(|e| !e.sprite.is_dead());
    }

    fn tick_entity(&mut self, e: &mut Entity) {
        if e.behavior.tick(&mut e.sprite, self) == Status::Die {
            e.sprite.kill();
            return;
        }
        let s = &mut e.sprite;
        if !s.flags.contains(SpriteFlags::NO_SCROLL) {
            s.x -= self.ctx.x_speed;
        }
        if s.flags.contains(SpriteFlags::COLLIDE_SPRITES) {
            s.compute_collision_grid(self.ctx.level_height);
        }
        if !s.flags.contains(SpriteFlags::SURVIVE_OFF_SCREEN)
            && s.off_screen_distance(self.ctx.view_y()) > OFF_SCREEN_MARGIN
        {
            s.kill();
        }
    }

    /// Move queued spawns into their layers.
    pub fn flush_spawns(&mut self) {
        for (layer, e) in self.ctx.take_spawned() {
            debug!("spawned #{} {:?} in layer {layer}", e.sprite.id, e.sprite.kind);
            self.layers[layer].push(e);
        }
    }

    /// Pixel test against visible terrain, for sprites that collide with it.
    pub fn hits_terrain(&self, s: &Sprite) -> bool {
        if !s.flags.contains(SpriteFlags::COLLIDE_TERRAIN) {
            return false;
        }
        let Some(img) = s.image() else { return false };
        let vy = self.ctx.view_y();
        self.stage
            .hits_terrain(img, self.ctx.scroll, s.x.to_int(), s.y.to_int() - vy)
    }

    pub fn find(&self, layer: usize, id: SpriteId) -> Option<usize> {
        self.layers[layer]
            .iter()
            .position(|e| e.sprite.id == id && !e.sprite.is_dead())
    }

    pub fn player_index(&self) -> Option<usize> {
        self.layers[LAYER_PLAYER]
            .iter()
            .position(|e| e.sprite.kind == SpriteKind::Player && !e.sprite.is_dead())
    }

    pub fn player(&self) -> Option<&Sprite> {
        self.player_index().map(|i| &self.layers[LAYER_PLAYER][i].sprite)
    }

    /// Deliver damage; returns `true` if the target died from it.
    pub fn damage(&mut self, layer: usize, idx: usize, amount: i32) -> bool {
        let World { layers, ctx, .. } = self;
        let Some(e) = layers[layer].get_mut(idx) else { return false };
        if e.sprite.is_dead() {
            return false;
        }
        match e.behavior.on_damage(&mut e.sprite, amount, ctx) {
            Status::Die => {
                e.sprite.kill();
                true
            }
            Status::Continue => false,
        }
    }

    /// Hurt the player if `me` touches the ship.
    pub fn damage_player_on_touch(&mut self, me: &Sprite, amount: i32) -> bool {
        match self.player_index() {
            Some(i) if me.hits(&self.layers[LAYER_PLAYER][i].sprite) => {
                self.damage(LAYER_PLAYER, i, amount);
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, kind: SpriteKind) -> usize {
        self.layers
            .iter()
            .flatten()
            .filter(|e| e.sprite.kind == kind && !e.sprite.is_dead())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::behavior::Behavior;
    use crate::sim::testutil::empty_world;
    use crate::renderer::Image;
    use std::cell::Cell;

    /// Jumps 100 px right every tick.
    struct Mover;

    impl Behavior for Mover {
        fn tick(&mut self, me: &mut Sprite, _world: &mut World) -> Status {
            me.x += Fix::from_int(100);
            Status::Continue
        }
    }

    /// Records whether it touched the ship this tick.
    struct Toucher(Rc<Cell<bool>>);

    impl Behavior for Toucher {
        fn tick(&mut self, me: &mut Sprite, world: &mut World) -> Status {
            self.0.set(world.player().is_some_and(|p| me.hits(p)));
            Status::Continue
        }
    }

    #[test]
    fn later_layers_see_moves_made_earlier_in_the_tick() {
        let mut w = empty_world();
        let flags = SpriteFlags::COLLIDE_SPRITES | SpriteFlags::NO_SCROLL | SpriteFlags::BOX_CHECK_ONLY;
        let img = Rc::new(Image::filled(16, 16, Color::WHITE));

        let mut ship = Sprite::new(w.ctx.next_id(), SpriteKind::Player, Fix::ZERO, Fix::from_int(100), flags)
            .with_image(Rc::clone(&img));
        ship.compute_collision_grid(w.ctx.level_height);
        w.layers[LAYER_PLAYER].push(Entity::new(ship, Mover));

        let mut foe = Sprite::new(w.ctx.next_id(), SpriteKind::Enemy, Fix::from_int(104), Fix::from_int(100), flags)
            .with_image(img);
        foe.compute_collision_grid(w.ctx.level_height);
        let touching = Rc::new(Cell::new(false));
        w.layers[LAYER_ENEMY].push(Entity::new(foe, Toucher(Rc::clone(&touching))));

        for layer in LAYER_BACK..LAYER_COUNT {
            w.tick_layer(layer);
        }
        assert!(touching.get());
    }

    #[test]
    fn weapon_pickups_upgrade_then_saturate() {
        let mut p = PlayerState::new(2);
        assert!(!p.owns(WeaponKind::Beam));
        assert!(p.collect_weapon(WeaponKind::Beam));
        assert_eq!(p.weapon, WeaponKind::Beam);
        assert_eq!(p.level(WeaponKind::Beam), 0);
        assert!(p.collect_weapon(WeaponKind::Beam));
        assert!(p.collect_weapon(WeaponKind::Beam));
        assert!(!p.collect_weapon(WeaponKind::Beam));
        assert_eq!(p.level(WeaponKind::Beam), MAX_WEAPON_LEVEL);
    }

    #[test]
    fn cycling_skips_missing_weapons() {
        let mut p = PlayerState::new(2);
        assert!(!p.cycle_weapon(true));
        p.levels[WeaponKind::Track.index()] = 0;
        assert!(p.cycle_weapon(true));
        assert_eq!(p.weapon, WeaponKind::Track);
        assert!(p.cycle_weapon(true));
        assert_eq!(p.weapon, WeaponKind::Pulse);
        assert!(p.cycle_weapon(false));
        assert_eq!(p.weapon, WeaponKind::Track);
    }

    #[test]
    fn one_ups_cap_at_max() {
        let mut p = PlayerState::new(MAX_LIVES - 1);
        assert!(p.collect_one_up());
        assert!(!p.collect_one_up());
    }
}
