//! A loaded stage: its layer stacks and the spawn timeline.

use super::layer::{ImageLayer, Layer, LayerScroll};
use super::tiled::TileLayer;
use super::wave::{RampLayer, WaveLayer};
use crate::assets::{AssetError, AssetLoader, LayerDesc, LayerKind, LayerRole, SpawnDesc, SpawnKind, StageDesc};
use crate::defs::S_GAME_HEIGHT;
use crate::fix::Fix;
use crate::renderer::Image;
use log::{debug, info};
use std::collections::VecDeque;

pub struct Stage {
    pub number: u32,
    pub backgrounds: Vec<Box<dyn Layer>>,
    pub terrain: Vec<Box<dyn Layer>>,
    pub foregrounds: Vec<Box<dyn Layer>>,
    /// Pending spawns ordered by trigger position.
    spawns: VecDeque<SpawnDesc>,
    pub level_height: i32,
    pub length: i32,
    pub x_speed: Fix,
    pub music: Option<String>,
}

fn build_layer(desc: &LayerDesc, loader: &dyn AssetLoader) -> Result<Box<dyn Layer>, AssetError> {
    let mut layer: Box<dyn Layer> = match &desc.kind {
        LayerKind::Image { image, wrap, blend } => Box::new(ImageLayer::new(
            loader.load_image(image)?,
            desc.place,
            *wrap,
            *blend,
        )),
        LayerKind::Tiles { tilemap, sheet } => Box::new(TileLayer::new(
            loader.load_tilemap(tilemap)?,
            loader.load_sprite_sheet(sheet)?,
            desc.place,
        )),
        LayerKind::Wave {
            image,
            amplitude,
            speed,
            row_step,
            blend,
        } => Box::new(
            WaveLayer::new(loader.load_image(image)?, desc.place, *amplitude, *speed, *row_step)
                .with_blend(*blend),
        ),
        LayerKind::Ramp { image, top, bottom } => Box::new(RampLayer::new(
            loader.load_image(image)?,
            desc.place,
            *top,
            *bottom,
        )),
    };
    layer.set_visible(desc.visible);
    Ok(layer)
}

impl Stage {
    /// Build every layer and validate the timeline. Any missing or
    /// inconsistent piece fails the whole load.
    pub fn load(desc: &StageDesc, loader: &dyn AssetLoader) -> Result<Stage, AssetError> {
        let name = format!("stage{}", desc.number);
        if desc.level_height < S_GAME_HEIGHT {
            return Err(AssetError::malformed(
                name,
                format!("level height {} is below the view height", desc.level_height),
            ));
        }

        let mut stage = Stage {
            number: desc.number,
            backgrounds: Vec::new(),
            terrain: Vec::new(),
            foregrounds: Vec::new(),
            spawns: VecDeque::new(),
            level_height: desc.level_height,
            length: desc.length,
            x_speed: desc.x_speed,
            music: desc.music.clone(),
        };
        for l in &desc.layers {
            let layer = build_layer(l, loader)?;
            stage.layers_mut(l.role).push(layer);
        }

        let mut spawns = desc.spawns.clone();
        for s in &spawns {
            if let SpawnKind::Script { role, index, .. } = s.kind {
                if index >= stage.layers(role).len() {
                    return Err(AssetError::malformed(
                        name,
                        format!("spawn at {} toggles missing {role:?} layer {index}", s.scroll_x),
                    ));
                }
            }
        }
        // stable: equal positions keep authoring order
        spawns.sort_by_key(|s| s.scroll_x);
        stage.spawns = spawns.into();

        info!(
            "stage {} loaded: {} bg / {} terrain / {} fg layers, {} spawns",
            desc.number,
            stage.backgrounds.len(),
            stage.terrain.len(),
            stage.foregrounds.len(),
            stage.spawns.len()
        );
        Ok(stage)
    }

    pub fn layers(&self, role: LayerRole) -> &[Box<dyn Layer>] {
        match role {
            LayerRole::Background => &self.backgrounds,
            LayerRole::Terrain => &self.terrain,
            LayerRole::Foreground => &self.foregrounds,
        }
    }

    fn layers_mut(&mut self, role: LayerRole) -> &mut Vec<Box<dyn Layer>> {
        match role {
            LayerRole::Background => &mut self.backgrounds,
            LayerRole::Terrain => &mut self.terrain,
            LayerRole::Foreground => &mut self.foregrounds,
        }
    }

    /// Pop every spawn whose trigger position has been reached.
    pub fn spawn_due(&mut self, scroll_x: i32) -> Vec<SpawnDesc> {
        let mut due = Vec::new();
        while self.spawns.front().is_some_and(|s| s.scroll_x <= scroll_x) {
            if let Some(s) = self.spawns.pop_front() {
                debug!("spawn due at {}: {:?}", scroll_x, s.kind);
                due.push(s);
            }
        }
        due
    }

    pub fn pending_spawns(&self) -> usize {
        self.spawns.len()
    }

    pub fn update_layers(&mut self, scroll: LayerScroll) {
        for l in self
            .backgrounds
            .iter_mut()
            .chain(self.terrain.iter_mut())
            .chain(self.foregrounds.iter_mut())
        {
            l.update(scroll);
        }
    }

    /// Pixel test of `img` at game-area `(x, y)` against visible terrain.
    pub fn hits_terrain(&self, img: &Image, scroll: LayerScroll, x: i32, y: i32) -> bool {
        self.terrain
            .iter()
            .any(|l| l.visible() && l.hits_sprite(img, scroll, x, y))
    }

    pub fn set_visible(&mut self, role: LayerRole, index: usize, visible: bool) {
        if let Some(l) = self.layers_mut(role).get_mut(index) {
            l.set_visible(visible);
        }
    }

    pub fn blit_role(&self, role: LayerRole, dst: &mut Image, scroll: LayerScroll) {
        for l in self.layers(role).iter().filter(|l| l.visible()) {
            l.blit(dst, scroll);
        }
    }

    /// Vertical scroll range is `0 ..= max_scroll_y`.
    pub fn max_scroll_y(&self) -> i32 {
        (self.level_height - S_GAME_HEIGHT).max(0)
    }
}
