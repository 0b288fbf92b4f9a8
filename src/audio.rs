//! Audio backend seam.
//!
//! Sound is fire-and-forget: the core queues effect ids while ticking and
//! the scheduler forwards them to whatever [`AudioBackend`] the host
//! installed. A missing backend or missing samples simply means silence.

use log::{debug, warn};

/// Decoded PCM sample, mono 16-bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSample {
    pub rate: u32,
    pub frames: Vec<i16>,
}

/// Sound effects triggered by gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    PlayerFire,
    EnemyFire,
    Explosion,
    PlayerDeath,
    Powerup,
    OneUp,
    Hit,
    Select,
}

impl Sfx {
    /// Slot in the loaded sample bank.
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleParams {
    /// 0.0 ..= 1.0
    pub volume: f32,
    /// -1.0 (left) ..= 1.0 (right)
    pub pan: f32,
    /// Extra repetitions after the first play.
    pub loops: u32,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pan: 0.0,
            loops: 0,
        }
    }
}

impl SampleParams {
    /// Pan from a screen x position.
    pub fn panned(x: i32) -> Self {
        let half = crate::defs::S_WIDTH as f32 / 2.0;
        Self {
            pan: ((x as f32 - half) / half).clamp(-1.0, 1.0),
            ..Self::default()
        }
    }
}

pub trait AudioBackend {
    /// Hand decoded samples to the backend. Default: ignore them.
    fn install_samples(&mut self, _samples: Vec<SoundSample>) {}

    fn play_sample(&mut self, sfx: Sfx, params: SampleParams);

    /// Start a music track; returns `false` when it is unavailable.
    fn play_music(&mut self, name: &str) -> bool;

    fn fade_out_music(&mut self, ms: u32);

    fn stop_music(&mut self);

    fn music_playing(&self) -> bool;
}

/// Silent backend that still tracks music state.
#[derive(Debug, Default)]
pub struct NullAudio {
    music: Option<String>,
    has_samples: bool,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_music(&self) -> Option<&str> {
        self.music.as_deref()
    }
}

impl AudioBackend for NullAudio {
    fn install_samples(&mut self, samples: Vec<SoundSample>) {
        self.has_samples = !samples.is_empty();
    }

    fn play_sample(&mut self, _sfx: Sfx, _params: SampleParams) {}

    fn play_music(&mut self, name: &str) -> bool {
        debug!("music: {name}");
        self.music = Some(name.to_owned());
        true
    }

    fn fade_out_music(&mut self, ms: u32) {
        if self.music.take().is_some() {
            debug!("music fading out over {ms} ms");
        }
    }

    fn stop_music(&mut self) {
        self.music = None;
    }

    fn music_playing(&self) -> bool {
        self.music.is_some()
    }
}

/// Start music if the backend has it; log and carry on otherwise.
pub fn try_play_music(audio: &mut dyn AudioBackend, name: &str) {
    if !audio.play_music(name) {
        warn!("music `{name}` unavailable, continuing without it");
    }
}
