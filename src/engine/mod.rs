//! Fixed-tick mode scheduler.
//!
//! [`Engine`] owns the frame buffers, the audio backend and the active
//! [`Session`], and runs exactly one logic tick per call to
//! [`Engine::tick`]. Mode changes requested with [`Engine::jump_mode`] fade
//! the screen out first; while a fade is running no mode logic runs.

mod config;
mod fade;
mod mode;
mod tic;

pub use self::config::EngineConfig;
pub use self::fade::{Fade, FadePhase};
pub use self::mode::GameMode;
pub use self::tic::{Pacer, TIC};

use crate::assets::{AssetError, AssetLoader};
use crate::audio::{AudioBackend, try_play_music};
use crate::defs::{FADE_OUT_MS, S_HEIGHT, S_WIDTH, TICKS_PER_SECOND};
use crate::input::{Buttons, InputSnapshot};
use crate::renderer::{Color, FrameBuffers, Image, ImageError};
use crate::sim::{Session, SessionEvent, SessionSetup, draw_number};
use log::{debug, info, warn};
use std::rc::Rc;
use thiserror::Error;

/// How long the logo stays up without input.
pub const LOGO_TICKS: u32 = 5 * TICKS_PER_SECOND;

const CONFIRM: Buttons = Buttons::SELECT.union(Buttons::FIRE);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Runs once the new mode is active and the back buffer is cleared.
pub type ModeInit = Box<dyn FnOnce(&mut Engine) -> Result<(), EngineError>>;

/// Full-screen pictures for the non-game modes. Any of them may be missing.
#[derive(Default)]
struct Screens {
    logo: Option<Rc<Image>>,
    title: Option<Rc<Image>>,
    card: Option<Rc<Image>>,
}

impl Screens {
    fn load(assets: &dyn AssetLoader) -> Self {
        let get = |name: &str| match assets.load_image(name) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!("screen image: {e}");
                None
            }
        };
        Self {
            logo: get("logo"),
            title: get("title"),
            card: get("screen"),
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    mode: GameMode,
    pending: Option<(GameMode, Option<ModeInit>)>,
    fade: Fade,
    frames: FrameBuffers,
    input: InputSnapshot,
    assets: Box<dyn AssetLoader>,
    audio: Box<dyn AudioBackend>,
    screens: Screens,
    session: Option<Session>,
    mode_ticks: u32,
    high_score: u32,
    running: bool,
}

impl Engine {
    /// Build the scheduler and queue the first screen.
    pub fn new(config: EngineConfig, assets: Box<dyn AssetLoader>, mut audio: Box<dyn AudioBackend>) -> Self {
        match assets.load_sound_samples("sfx") {
            Ok(samples) => audio.install_samples(samples),
            Err(e) => warn!("sound effects: {e}"),
        }
        let screens = Screens::load(&*assets);
        let mut engine = Self {
            config,
            mode: GameMode::None,
            pending: None,
            fade: Fade::default(),
            frames: FrameBuffers::new(),
            input: InputSnapshot::default(),
            assets,
            audio,
            screens,
            session: None,
            mode_ticks: 0,
            high_score: 0,
            running: true,
        };
        if config.skip_logo {
            engine.to_title();
        } else {
            engine.jump_mode(GameMode::Logo, None);
        }
        engine
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn fade(&self) -> &Fade {
        &self.fade
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn audio(&self) -> &dyn AudioBackend {
        &*self.audio
    }

    pub fn frames(&self) -> &FrameBuffers {
        &self.frames
    }

    /// Switch after a fade-out. Leaving [`GameMode::None`] skips the fade.
    pub fn jump_mode(&mut self, mode: GameMode, init: Option<ModeInit>) {
        debug!("jump {:?} -> {mode:?}", self.mode);
        self.pending = Some((mode, init));
        if self.mode == GameMode::None {
            self.fade.finish_out();
        } else {
            self.fade.start_out();
            self.audio.fade_out_music(FADE_OUT_MS);
        }
    }

    /// Switch now: clear the screen and run `init` before returning.
    pub fn jump_mode_instant(&mut self, mode: GameMode, init: Option<ModeInit>) -> Result<(), EngineError> {
        self.pending = None;
        self.fade.reset();
        self.enter(mode, init)
    }

    fn enter(&mut self, mode: GameMode, init: Option<ModeInit>) -> Result<(), EngineError> {
        info!("mode {:?} -> {mode:?}", self.mode);
        self.mode = mode;
        self.mode_ticks = 0;
        self.frames.clear_back();
        if mode != GameMode::Game {
            self.session = None;
        }
        match init {
            Some(f) => f(self),
            None => Ok(()),
        }
    }

    fn to_title(&mut self) {
        self.jump_mode(GameMode::TitleScreen, Some(Box::new(Engine::enter_title)));
    }

    fn enter_title(&mut self) -> Result<(), EngineError> {
        try_play_music(&mut *self.audio, "title");
        Ok(())
    }

    /// Start a fresh game from the configured stage.
    pub fn start_game(&mut self) -> Result<(), EngineError> {
        let setup = SessionSetup {
            stage: self.config.first_stage,
            difficulty: self.config.difficulty,
            lives: self.config.lives,
            high_score: self.high_score,
            seed: self.config.seed,
        };
        let session = Session::new(&*self.assets, setup)?;
        self.session = Some(session);
        self.play_stage_music();
        Ok(())
    }

    fn continue_game(&mut self, stage: u32) -> Result<(), EngineError> {
        match self.session.as_mut() {
            Some(s) => s.load_stage(stage, &*self.assets)?,
            None => return self.start_game(),
        }
        self.play_stage_music();
        Ok(())
    }

    fn play_stage_music(&mut self) {
        if let Some(name) = self.session.as_ref().and_then(Session::music) {
            try_play_music(&mut *self.audio, name);
        }
    }

    /// One logic tick with `held` as the buttons currently down.
    pub fn tick(&mut self, held: Buttons) -> Result<(), EngineError> {
        self.input = self.input.next(held);
        match self.fade.phase() {
            FadePhase::Out | FadePhase::In => self.fade.tick(self.input.held(Buttons::SELECT)),
            FadePhase::OutDone => self.switch_pending()?,
            FadePhase::Idle => self.run_mode(),
        }
        self.forward_effects();
        self.frames.decay_flash();
        Ok(())
    }

    fn switch_pending(&mut self) -> Result<(), EngineError> {
        let Some((mode, init)) = self.pending.take() else {
            self.fade.reset();
            return Ok(());
        };
        self.enter(mode, init)?;
        self.fade.start_in();
        Ok(())
    }

    fn run_mode(&mut self) {
        self.mode_ticks += 1;
        match self.mode {
            GameMode::None => {}
            GameMode::Logo => {
                if self.mode_ticks >= LOGO_TICKS || self.input.pressed(CONFIRM) {
                    self.to_title();
                }
            }
            GameMode::TitleScreen => {
                if self.input.pressed(Buttons::EXIT) {
                    info!("exit requested");
                    self.running = false;
                } else if self.input.pressed(CONFIRM) {
                    self.jump_mode(GameMode::Game, Some(Box::new(Engine::start_game)));
                }
            }
            GameMode::Game => self.run_game(),
            m if m.is_static_screen() => {
                if self.input.pressed(CONFIRM | Buttons::EXIT) {
                    self.to_title();
                }
            }
            _ => {}
        }
    }

    fn run_game(&mut self) {
        let Some(session) = self.session.as_mut() else {
            warn!("game mode without a session");
            self.to_title();
            return;
        };
        let Some(event) = session.tick(self.input) else {
            return;
        };
        let (score, stage) = (session.score(), session.stage_number());
        info!("{event:?} on stage {stage}, score {score}");
        match event {
            SessionEvent::GameOver => {
                let record = score > 0 && score >= self.high_score;
                self.high_score = self.high_score.max(score);
                if record {
                    self.jump_mode(GameMode::NameEntry, None);
                } else {
                    self.to_title();
                }
            }
            SessionEvent::StageClear => match self.assets.load_stage(stage + 1) {
                Ok(_) => {
                    self.jump_mode(
                        GameMode::Game,
                        Some(Box::new(move |e: &mut Engine| e.continue_game(stage + 1))),
                    );
                }
                Err(AssetError::NotFound(_)) => {
                    self.high_score = self.high_score.max(score);
                    self.jump_mode(GameMode::Credits, None);
                }
                Err(e) => {
                    warn!("next stage: {e}");
                    self.to_title();
                }
            },
            SessionEvent::Quit => self.to_title(),
        }
    }

    /// Hand queued sounds and the screen flash over to their sinks.
    fn forward_effects(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for (sfx, params) in session.drain_sounds() {
            self.audio.play_sample(sfx, params);
        }
        let flash = session.take_flash();
        if !flash.is_dark() {
            self.frames.flash(flash);
        }
        self.high_score = self.high_score.max(session.high_score());
    }

    /// Compose the presentable frame. The back buffer is frozen while
    /// fading out.
    pub fn render(&mut self) -> &Image {
        if !matches!(self.fade.phase(), FadePhase::Out | FadePhase::OutDone) {
            self.draw_mode();
        }
        self.frames.compose_front(self.fade.level());
        &self.frames.front
    }

    fn draw_mode(&mut self) {
        let back = &mut self.frames.back;
        match self.mode {
            GameMode::None => back.fill(Color::BLACK),
            GameMode::Logo => draw_card(back, self.screens.logo.as_deref()),
            GameMode::TitleScreen => {
                draw_card(back, self.screens.title.as_deref());
                draw_number(back, (S_WIDTH - 8 * 8) / 2, S_HEIGHT - 24, self.high_score, 8, 2, Color::WHITE);
            }
            GameMode::Game => match self.session.as_mut() {
                Some(s) => s.render(back),
                None => back.fill(Color::BLACK),
            },
            _ => {
                draw_card(back, self.screens.card.as_deref());
                draw_number(back, (S_WIDTH - 8 * 16) / 2, 40, self.high_score, 8, 4, Color::rgb(15, 12, 4));
            }
        }
    }
}

fn draw_card(dst: &mut Image, card: Option<&Image>) {
    dst.fill(Color::BLACK);
    if let Some(img) = card {
        dst.blit_fast(img, 0, 0, 0, 0, img.width(), img.height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::demo::demo_assets;
    use crate::audio::NullAudio;

    fn engine(skip_logo: bool) -> Engine {
        let config = EngineConfig {
            skip_logo,
            ..EngineConfig::default()
        };
        Engine::new(config, Box::new(demo_assets()), Box::new(NullAudio::new()))
    }

    fn idle(e: &mut Engine, n: u32) {
        for _ in 0..n {
            e.tick(Buttons::empty()).expect("tick");
        }
    }

    #[test]
    fn first_jump_skips_the_fade_out() {
        let mut e = engine(false);
        assert_eq!(e.fade().phase(), FadePhase::OutDone);
        idle(&mut e, 1);
        assert_eq!(e.mode(), GameMode::Logo);
        assert_eq!(e.fade().phase(), FadePhase::In);
    }

    #[test]
    fn jump_waits_for_the_fade_out() {
        let mut e = engine(true);
        e.jump_mode_instant(GameMode::Game, Some(Box::new(Engine::start_game)))
            .expect("start game");
        assert!(e.audio().music_playing());
        assert!(e.session().is_some());

        e.jump_mode(GameMode::TitleScreen, None);
        for _ in 0..64 {
            e.tick(Buttons::empty()).expect("tick");
            assert_eq!(e.mode(), GameMode::Game);
            assert!(!e.audio().music_playing());
        }
        assert_eq!(e.fade().phase(), FadePhase::OutDone);
        e.tick(Buttons::empty()).expect("tick");
        assert_eq!(e.mode(), GameMode::TitleScreen);
        assert_eq!(e.fade().phase(), FadePhase::In);
        assert!(e.session().is_none());
    }

    #[test]
    fn fade_out_freezes_the_back_buffer() {
        let mut e = engine(true);
        e.jump_mode_instant(GameMode::Game, Some(Box::new(Engine::start_game)))
            .expect("start game");
        e.render();
        let before = e.frames().back.clone();
        e.jump_mode(GameMode::TitleScreen, None);
        idle(&mut e, 8);
        e.render();
        assert_eq!(e.frames().back, before);
        assert_ne!(e.frames().front, before);
    }

    #[test]
    fn logo_times_out_to_title() {
        let mut e = engine(false);
        idle(&mut e, 1 + 60);
        assert_eq!((e.mode(), e.fade().phase()), (GameMode::Logo, FadePhase::Idle));
        idle(&mut e, LOGO_TICKS);
        assert_eq!(e.fade().phase(), FadePhase::Out);
        idle(&mut e, 65);
        assert_eq!(e.mode(), GameMode::TitleScreen);
    }

    #[test]
    fn title_confirm_starts_a_game() {
        let mut e = engine(true);
        e.jump_mode_instant(GameMode::TitleScreen, None).expect("title");
        e.tick(Buttons::FIRE).expect("tick");
        assert_eq!(e.fade().phase(), FadePhase::Out);
        idle(&mut e, 65);
        assert_eq!(e.mode(), GameMode::Game);
        assert!(e.session().is_some());
        assert_eq!(e.session().map(Session::stage_number), Some(1));
    }

    #[test]
    fn exit_on_title_stops_the_engine() {
        let mut e = engine(true);
        e.jump_mode_instant(GameMode::TitleScreen, None).expect("title");
        e.tick(Buttons::EXIT).expect("tick");
        assert!(!e.running());
    }

    #[test]
    fn missing_stage_fails_the_init() {
        let config = EngineConfig {
            first_stage: 9,
            ..EngineConfig::default()
        };
        let mut e = Engine::new(config, Box::new(demo_assets()), Box::new(NullAudio::new()));
        let r = e.jump_mode_instant(GameMode::Game, Some(Box::new(Engine::start_game)));
        assert!(matches!(r, Err(EngineError::Asset(AssetError::NotFound(_)))));
    }

    #[test]
    fn static_screens_return_to_title() {
        let mut e = engine(true);
        e.jump_mode_instant(GameMode::Credits, None).expect("credits");
        e.tick(Buttons::SELECT).expect("tick");
        assert_eq!(e.fade().phase(), FadePhase::Out);
        idle(&mut e, 65);
        assert_eq!(e.mode(), GameMode::TitleScreen);
    }

    #[test]
    fn render_fills_the_whole_canvas() {
        let mut e = engine(true);
        let img = e.render();
        assert_eq!((img.width(), img.height()), (S_WIDTH, S_HEIGHT));
    }
}
