//! One play-through: stage, sprite layers, scrolling, pause menu, HUD.

use super::behavior::Entity;
use super::hud::draw_hud;
use super::player::{INVULNERABLE_TICKS, Player};
use super::spawn::spawn_object;
use super::world::{
    Context, GameSheets, LAYER_BACK, LAYER_COUNT, LAYER_PLAYER, MAX_SPEED, MIN_SPEED, World,
};
use crate::assets::{AssetError, AssetLoader, LayerRole};
use crate::audio::{SampleParams, Sfx};
use crate::defs::{Difficulty, S_GAME_HEIGHT, S_HUD_HEIGHT, S_WIDTH};
use crate::fix::Fix;
use crate::input::{Buttons, InputSnapshot};
use crate::renderer::{Color, Image};
use crate::world::{LayerScroll, Stage};
use log::info;
use std::rc::Rc;

/// Largest vertical scroll step per tick while following the ship.
const SCROLL_Y_STEP: i32 = 4;
/// Pause menu entries: continue, quit.
const PAUSE_ITEMS: u32 = 2;

/// Something the scheduler has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    GameOver,
    StageClear,
    Quit,
}

/// How to start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSetup {
    pub stage: u32,
    pub difficulty: Difficulty,
    pub lives: u32,
    pub high_score: u32,
    pub seed: u32,
}

pub struct Session {
    pub world: World,
    paused: bool,
    pause_cursor: u32,
    canvas: Image,
}

impl Session {
    pub fn new(loader: &dyn AssetLoader, setup: SessionSetup) -> Result<Self, AssetError> {
        let sheets = Rc::new(GameSheets::load(loader)?);
        let ctx = Context::new(sheets, setup.difficulty, setup.lives, setup.high_score, setup.seed);
        let stage = Stage::load(&loader.load_stage(setup.stage)?, loader)?;
        let mut s = Session {
            world: World::new(stage, ctx),
            paused: false,
            pause_cursor: 0,
            canvas: Image::filled(S_WIDTH, S_GAME_HEIGHT, Color::BLACK),
        };
        s.enter_stage();
        Ok(s)
    }

    /// Replace the stage, keeping score, lives and weapons.
    pub fn load_stage(&mut self, number: u32, loader: &dyn AssetLoader) -> Result<(), AssetError> {
        let stage = Stage::load(&loader.load_stage(number)?, loader)?;
        self.world.ctx.level_height = stage.level_height;
        self.world.ctx.x_speed = stage.x_speed;
        self.world.stage = stage;
        self.world.layers = Default::default();
        self.enter_stage();
        Ok(())
    }

    fn enter_stage(&mut self) {
        let ctx = &mut self.world.ctx;
        ctx.scroll = LayerScroll::new(
            Fix::ZERO,
            Fix::from_int(self.world.stage.max_scroll_y() / 2),
        );
        ctx.tick = 0;
        // layers are always extended for the scroll they are drawn at
        self.world.stage.update_layers(ctx.scroll);
        let ship = Player::spawn(ctx, 0);
        self.world.layers[LAYER_PLAYER].push(ship);
        self.paused = false;
        info!("entered stage {}", self.world.stage.number);
    }

    #[inline]
    pub fn stage_number(&self) -> u32 {
        self.world.stage.number
    }

    pub fn music(&self) -> Option<&str> {
        self.world.stage.music.as_deref()
    }

    #[inline]
    pub fn paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.world.ctx.score
    }

    #[inline]
    pub fn high_score(&self) -> u32 {
        self.world.ctx.high_score
    }

    pub fn drain_sounds(&mut self) -> Vec<(Sfx, SampleParams)> {
        self.world.ctx.take_sounds()
    }

    pub fn take_flash(&mut self) -> Color {
        self.world.ctx.take_flash()
    }

    /// Push an extra entity straight into a layer.
    pub fn insert(&mut self, layer: usize, e: Entity) {
        self.world.layers[layer].push(e);
    }

    /// Advance one tick.
    pub fn tick(&mut self, input: InputSnapshot) -> Option<SessionEvent> {
        self.world.ctx.input = input;
        if input.pressed(Buttons::PAUSE | Buttons::EXIT) {
            self.paused = !self.paused;
            self.pause_cursor = 0;
            self.world.ctx.play(Sfx::Select, Fix::from_int(S_WIDTH / 2));
            return None;
        }
        if self.paused {
            return self.pause_menu(input);
        }

        self.handle_options(input);
        if let Some(ev) = self.respawn() {
            return Some(ev);
        }

        let World { stage, ctx, .. } = &mut self.world;
        for d in stage.spawn_due(ctx.scroll.x.to_int()) {
            let (layer, e) = spawn_object(&d, ctx);
            ctx.spawn(layer, e);
        }
        self.world.flush_spawns();

        for layer in LAYER_BACK..LAYER_COUNT {
            self.world.tick_layer(layer);
        }

        self.scroll();
        self.world.stage.update_layers(self.world.ctx.scroll);
        self.world.ctx.tick += 1;
        if self.world.ctx.scroll.x.to_int() >= self.world.stage.length {
            info!("stage {} clear, score {}", self.world.stage.number, self.world.ctx.score);
            return Some(SessionEvent::StageClear);
        }
        None
    }

    fn pause_menu(&mut self, input: InputSnapshot) -> Option<SessionEvent> {
        if input.pressed(Buttons::UP) {
            self.pause_cursor = (self.pause_cursor + PAUSE_ITEMS - 1) % PAUSE_ITEMS;
        }
        if input.pressed(Buttons::DOWN) {
            self.pause_cursor = (self.pause_cursor + 1) % PAUSE_ITEMS;
        }
        if input.pressed(Buttons::FIRE | Buttons::SELECT) {
            if self.pause_cursor == 1 {
                return Some(SessionEvent::Quit);
            }
            self.paused = false;
        }
        None
    }

    /// Ship speed and weapon selection.
    fn handle_options(&mut self, input: InputSnapshot) {
        let p = &mut self.world.ctx.player;
        if input.pressed(Buttons::SPEED_UP) {
            p.speed = (p.speed + 1).min(MAX_SPEED);
        }
        if input.pressed(Buttons::SPEED_DOWN) {
            p.speed = (p.speed - 1).max(MIN_SPEED);
        }
        let mut changed = false;
        if input.pressed(Buttons::WEAPON_NEXT) {
            changed |= p.cycle_weapon(true);
        }
        if input.pressed(Buttons::WEAPON_PREV) {
            changed |= p.cycle_weapon(false);
        }
        if changed {
            let x = p.pos.x;
            self.world.ctx.play(Sfx::Select, x);
        }
    }

    /// Count down after a lost ship; bring the next one in or end the game.
    fn respawn(&mut self) -> Option<SessionEvent> {
        let ctx = &mut self.world.ctx;
        if ctx.player.alive {
            return None;
        }
        ctx.player.respawn_ticks = ctx.player.respawn_ticks.saturating_sub(1);
        if ctx.player.respawn_ticks > 0 {
            return None;
        }
        if ctx.player.lives == 0 {
            info!("game over, score {}", ctx.score);
            return Some(SessionEvent::GameOver);
        }
        ctx.player.lives -= 1;
        let ship = Player::spawn(ctx, INVULNERABLE_TICKS);
        self.world.layers[LAYER_PLAYER].push(ship);
        None
    }

    /// Horizontal scroll at stage speed; vertical follows the ship.
    fn scroll(&mut self) {
        let max_y = self.world.stage.max_scroll_y();
        let ctx = &mut self.world.ctx;
        ctx.scroll.x += ctx.x_speed;
        if ctx.player.alive {
            let want = (ctx.player.pos.y.to_int() - S_GAME_HEIGHT / 2).clamp(0, max_y);
            let step = (want - ctx.view_y()).clamp(-SCROLL_Y_STEP, SCROLL_Y_STEP);
            ctx.scroll.y += step;
        }
        ctx.scroll.y = ctx.scroll.y.clamp(Fix::ZERO, Fix::from_int(max_y));
    }

    /// Draw the stage, sprites and HUD into a full-screen `dst`.
    pub fn render(&mut self, dst: &mut Image) {
        let World { stage, layers, ctx } = &self.world;
        let scroll = ctx.scroll;
        let vy = ctx.view_y();
        let canvas = &mut self.canvas;

        canvas.fill(Color::BLACK);
        stage.blit_role(LayerRole::Background, canvas, scroll);
        for e in &layers[LAYER_BACK] {
            e.blit(canvas, vy);
        }
        stage.blit_role(LayerRole::Terrain, canvas, scroll);
        for layer in &layers[LAYER_BACK + 1..] {
            for e in layer {
                e.blit(canvas, vy);
            }
        }
        stage.blit_role(LayerRole::Foreground, canvas, scroll);

        dst.blit_fast(canvas, 0, 0, 0, S_HUD_HEIGHT, S_WIDTH, S_GAME_HEIGHT);
        draw_hud(dst, ctx);

        if self.paused {
            dst.subtract_solid_rect(0, S_HUD_HEIGHT, S_WIDTH, S_GAME_HEIGHT, Color::gray(8));
            let top = S_HUD_HEIGHT + S_GAME_HEIGHT / 2 - 16;
            for item in 0..PAUSE_ITEMS as i32 {
                let c = if item == 0 {
                    Color::rgb(4, 12, 4)
                } else {
                    Color::rgb(12, 4, 4)
                };
                dst.fill_rect(S_WIDTH / 2 - 32, top + item * 20, 64, 12, c);
            }
            let cy = top + self.pause_cursor as i32 * 20 + 3;
            dst.fill_rect(S_WIDTH / 2 - 44, cy, 6, 6, Color::WHITE);
        }
    }
}
