//! Asset access.
//!
//! Decoding binary formats is the host's business; the core only sees the
//! decoded shapes defined here and asks for them by name through
//! [`AssetLoader`]. [`MemoryAssets`] is a ready-made registry, filled
//! procedurally by [`demo::demo_assets`] for the bundled frontend and tests.

pub mod demo;

use crate::audio::SoundSample;
use crate::defs::{EnemyKind, PowerupKind};
use crate::fix::Fix;
use crate::renderer::{Blend, Image, ImageError, SpriteSheet, Wrap};
use crate::world::{Placement, Tilemap, TilemapError};
use std::{collections::HashMap, rc::Rc};

/// Why an asset could not be provided.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset `{0}` not found")]
    NotFound(String),

    #[error("asset `{name}` is malformed: {reason}")]
    Malformed { name: String, reason: String },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Tilemap(#[from] TilemapError),
}

impl AssetError {
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AssetError::Malformed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Host-provided asset source.
pub trait AssetLoader {
    fn load_image(&self, name: &str) -> Result<Rc<Image>, AssetError>;

    fn load_sprite_sheet(&self, name: &str) -> Result<SpriteSheet, AssetError>;

    fn load_tilemap(&self, name: &str) -> Result<Tilemap, AssetError>;

    fn load_stage(&self, number: u32) -> Result<StageDesc, AssetError>;

    /// Optional; the default host has no sound.
    fn load_sound_samples(&self, name: &str) -> Result<Vec<SoundSample>, AssetError> {
        Err(AssetError::NotFound(name.to_owned()))
    }
}

/* -------------------------------------------------------------------- */
/* decoded stage shapes                                                  */
/* -------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    Background,
    Terrain,
    Foreground,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Image { image: String, wrap: Wrap, blend: Blend },
    Tiles { tilemap: String, sheet: String },
    Wave { image: String, amplitude: Fix, speed: i32, row_step: i32, blend: Blend },
    Ramp { image: String, top: i32, bottom: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerDesc {
    pub role: LayerRole,
    pub kind: LayerKind,
    pub place: Placement,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Enemy(EnemyKind),
    Powerup(PowerupKind),
    /// Environment transition: show or hide one stage layer.
    Script {
        role: LayerRole,
        index: usize,
        visible: bool,
    },
}

/// One entry of the stage's spawn timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnDesc {
    /// Scroll position (pixels) at which the entry fires.
    pub scroll_x: i32,
    pub kind: SpawnKind,
    /// Behaviour variant within the kind.
    pub subtype: i32,
    /// Level-space y of the spawned object.
    pub y: i32,
    /// Horizontal offset from the right screen edge.
    pub x_rel: i32,
    /// Extra ticks to wait after the scroll trigger.
    pub delay: u32,
    /// Pickup dropped on death.
    pub drop: Option<PowerupKind>,
}

impl SpawnDesc {
    pub fn new(scroll_x: i32, kind: SpawnKind, y: i32) -> Self {
        Self {
            scroll_x,
            kind,
            subtype: 0,
            y,
            x_rel: 0,
            delay: 0,
            drop: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageDesc {
    pub number: u32,
    pub level_height: i32,
    /// Scroll position at which the stage is cleared.
    pub length: i32,
    pub x_speed: Fix,
    pub music: Option<String>,
    pub layers: Vec<LayerDesc>,
    pub spawns: Vec<SpawnDesc>,
}

/* -------------------------------------------------------------------- */
/* in-memory registry                                                    */
/* -------------------------------------------------------------------- */

#[derive(Default)]
pub struct MemoryAssets {
    images: HashMap<String, Rc<Image>>,
    sheets: HashMap<String, SpriteSheet>,
    tilemaps: HashMap<String, Tilemap>,
    stages: HashMap<u32, StageDesc>,
    sounds: HashMap<String, Vec<SoundSample>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, name: &str, img: Image) -> &mut Self {
        self.images.insert(name.to_owned(), Rc::new(img));
        self
    }

    pub fn insert_sheet(&mut self, name: &str, sheet: SpriteSheet) -> &mut Self {
        self.sheets.insert(name.to_owned(), sheet);
        self
    }

    pub fn insert_tilemap(&mut self, name: &str, map: Tilemap) -> &mut Self {
        self.tilemaps.insert(name.to_owned(), map);
        self
    }

    pub fn insert_stage(&mut self, stage: StageDesc) -> &mut Self {
        self.stages.insert(stage.number, stage);
        self
    }

    pub fn insert_sounds(&mut self, name: &str, samples: Vec<SoundSample>) -> &mut Self {
        self.sounds.insert(name.to_owned(), samples);
        self
    }
}

fn lookup<T: Clone>(map: &HashMap<String, T>, name: &str) -> Result<T, AssetError> {
    map.get(name)
        .cloned()
        .ok_or_else(|| AssetError::NotFound(name.to_owned()))
}

impl AssetLoader for MemoryAssets {
    fn load_image(&self, name: &str) -> Result<Rc<Image>, AssetError> {
        lookup(&self.images, name)
    }

    fn load_sprite_sheet(&self, name: &str) -> Result<SpriteSheet, AssetError> {
        lookup(&self.sheets, name)
    }

    fn load_tilemap(&self, name: &str) -> Result<Tilemap, AssetError> {
        lookup(&self.tilemaps, name)
    }

    fn load_stage(&self, number: u32) -> Result<StageDesc, AssetError> {
        self.stages
            .get(&number)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(format!("stage{number}")))
    }

    fn load_sound_samples(&self, name: &str) -> Result<Vec<SoundSample>, AssetError> {
        lookup(&self.sounds, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_assets_are_distinguishable() {
        let mut assets = MemoryAssets::new();
        assets.insert_image("logo", Image::new(2, 2));
        assert!(assets.load_image("logo").is_ok());
        assert_eq!(
            assets.load_image("nope").err(),
            Some(AssetError::NotFound("nope".into()))
        );
        assert!(matches!(assets.load_stage(9), Err(AssetError::NotFound(_))));
        assert!(assets.load_sound_samples("sfx").is_err());
    }

    #[test]
    fn images_are_shared_not_copied() {
        let mut assets = MemoryAssets::new();
        assets.insert_image("bg", Image::new(4, 4));
        let a = assets.load_image("bg").expect("present");
        let b = assets.load_image("bg").expect("present");
        assert!(Rc::ptr_eq(&a, &b));
    }
}
