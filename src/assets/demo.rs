//! Procedurally drawn stand-in content: every sheet, image, tilemap and
//! stage the session and the mode screens ask for. Lets the frontend run
//! and the tests load a real stage without any files on disk.

use super::{LayerDesc, LayerKind, LayerRole, MemoryAssets, SpawnDesc, SpawnKind, StageDesc};
use crate::defs::{EnemyKind, PowerupKind, S_GAME_HEIGHT, S_HEIGHT, S_WIDTH};
use crate::fix::{Fix, Fix2D, FixPolar2D};
use crate::renderer::{Blend, Color, Image, SpriteSheet, Wrap};
use crate::sim::ExplosionSize;
use crate::world::{Placement, TILE_HEIGHT, TILE_WIDTH, Tilemap, TilemapError};
use log::warn;

/// Columns of the stage 1 tilemap; the scroll stops well before its end.
const STAGE1_COLUMNS: i32 = 256;
const STAGE1_HEIGHT: i32 = 240;

/* -------------------------------------------------------------------- */
/* drawing helpers                                                       */
/* -------------------------------------------------------------------- */

/// Filled ellipse inscribed in a `w`×`h` image.
fn ellipse(w: i32, h: i32, c: Color) -> Image {
    let mut img = Image::new(w, h);
    let (rx, ry) = (w as f32 / 2.0, h as f32 / 2.0);
    for y in 0..h {
        for x in 0..w {
            let dx = (x as f32 + 0.5 - rx) / rx;
            let dy = (y as f32 + 0.5 - ry) / ry;
            if dx * dx + dy * dy <= 1.0 {
                img.set(x, y, c);
            }
        }
    }
    img
}

/// Square image with a filled disc of `radius` and a brighter core.
fn disc(size: i32, radius: f32, outer: Color, inner: Color) -> Image {
    let mut img = Image::new(size, size);
    let c = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - c;
            let dy = y as f32 + 0.5 - c;
            let d = (dx * dx + dy * dy).sqrt();
            if d <= radius / 2.0 {
                img.set(x, y, inner);
            } else if d <= radius {
                img.set(x, y, outer);
            }
        }
    }
    img
}

fn vertical_gradient(w: i32, h: i32, top: (i32, i32, i32), bottom: (i32, i32, i32)) -> Image {
    let mut img = Image::new(w, h);
    let lerp = |a: i32, b: i32, y: i32| a + (b - a) * y / (h - 1).max(1);
    for y in 0..h {
        let c = Color::rgb(lerp(top.0, bottom.0, y), lerp(top.1, bottom.1, y), lerp(top.2, bottom.2, y));
        img.fill_rect(0, y, w, 1, c);
    }
    img
}

/* -------------------------------------------------------------------- */
/* sprite sheets                                                         */
/* -------------------------------------------------------------------- */

fn ship_sheet() -> SpriteSheet {
    let hull = Color::rgb(10, 11, 13);
    let wing = Color::rgb(5, 6, 10);
    let glow = Color::rgb(15, 9, 2);
    // level, up, hard up, down, hard down: wing tilt in pixels
    let frames = [0, -1, -2, 1, 2].map(|tilt: i32| {
        let mut img = Image::new(24, 12);
        img.blit_all(&ellipse(20, 6, hull), 4, 3);
        img.fill_rect(4, 5 + tilt.signum() * 3, 10, 2, wing);
        img.fill_rect(2, 5 - tilt, 6, 2, wing);
        img.fill_rect(0, 5, 3, 2, glow);
        img.fill_rect(14, 4, 4, 2, Color::rgb(4, 12, 15));
        img
    });
    SpriteSheet::from_images(frames.into())
}

fn bullet_sheet() -> SpriteSheet {
    let mut frames = Vec::new();
    // pulse
    let mut pulse = Image::filled(8, 3, Color::rgb(15, 15, 8));
    pulse.fill_rect(0, 0, 2, 3, Color::rgb(15, 10, 2));
    frames.push(pulse);
    // spray
    frames.push(disc(6, 3.0, Color::rgb(4, 15, 6), Color::rgb(12, 15, 12)));
    // beam
    let mut beam = Image::filled(16, 4, Color::rgb(6, 10, 15));
    beam.fill_rect(0, 1, 16, 2, Color::rgb(13, 15, 15));
    frames.push(beam);
    // homing: 16 headings, bright tip toward the direction of travel
    for i in 0..16 {
        let mut img = disc(7, 3.0, Color::rgb(12, 5, 15), Color::rgb(15, 12, 15));
        let angle = Fix::TAU * i / 16;
        let tip = Fix2D::from_ints(3, 3) + FixPolar2D::new(Fix::from_int(2), angle).to_rect();
        img.set(tip.x.round(), tip.y.round(), Color::WHITE);
        frames.push(img);
    }
    // enemy shots, pulsing
    for level in [15, 12, 9, 12] {
        frames.push(disc(5, 2.5, Color::rgb(level, 3, 3), Color::rgb(15, level, level)));
    }
    SpriteSheet::from_images(frames)
}

fn explosion_sheet() -> SpriteSheet {
    let sizes = [
        (ExplosionSize::TinyWarm, 8, (15, 10, 2)),
        (ExplosionSize::TinyCool, 8, (6, 10, 15)),
        (ExplosionSize::Small, 16, (15, 8, 2)),
        (ExplosionSize::Medium, 24, (15, 7, 2)),
        (ExplosionSize::Large, 32, (15, 6, 1)),
        (ExplosionSize::Spark, 6, (15, 15, 10)),
    ];
    let mut frames = Vec::with_capacity(ExplosionSize::TOTAL_FRAMES);
    for (size, px, (r, g, b)) in sizes {
        let n = size.frames() as i32;
        for f in 0..n {
            // grows for the first half, then fades
            let radius = px as f32 / 2.0 * (f + 1).min(n / 2 + 1) as f32 / (n / 2 + 1) as f32;
            let fade = f * 8 / n;
            let outer = Color::rgb(r - fade, g - fade, b - fade);
            let inner = Color::rgb(15, 15, 15 - fade);
            frames.push(disc(px, radius.max(1.0), outer, inner));
        }
    }
    SpriteSheet::from_images(frames)
}

fn powerup_sheet() -> SpriteSheet {
    // score, one-up, pulse, spray, beam, track
    let colors = [(15, 13, 2), (15, 4, 10), (15, 15, 8), (4, 15, 6), (6, 10, 15), (12, 5, 15)];
    let frames = colors.map(|(r, g, b)| {
        let mut img = Image::filled(12, 12, Color::rgb(r / 3, g / 3, b / 3));
        img.fill_rect(2, 2, 8, 8, Color::rgb(r, g, b));
        img.fill_rect(4, 4, 4, 4, Color::WHITE);
        img
    });
    SpriteSheet::from_images(frames.into())
}

fn enemy_sheet() -> SpriteSheet {
    let mut frames = Vec::new();
    // drifter: saucer, blinking light
    for light in [Color::rgb(15, 4, 4), Color::rgb(6, 2, 2)] {
        let mut img = Image::new(16, 16);
        img.blit_all(&ellipse(16, 8, Color::rgb(9, 9, 10)), 0, 6);
        img.blit_all(&ellipse(8, 6, Color::rgb(5, 10, 12)), 4, 3);
        img.fill_rect(7, 9, 2, 2, light);
        frames.push(img);
    }
    // waver: flapping wings
    for span in [6, 3] {
        let mut img = Image::new(16, 16);
        img.blit_all(&ellipse(10, 10, Color::rgb(4, 12, 6)), 3, 3);
        img.fill_rect(0, 8 - span, 4, span * 2, Color::rgb(2, 8, 4));
        img.fill_rect(12, 8 - span, 4, span * 2, Color::rgb(2, 8, 4));
        frames.push(img);
    }
    // gunner: turret pod
    for barrel in [Color::rgb(12, 12, 12), Color::rgb(15, 10, 4)] {
        let mut img = Image::filled(16, 16, Color::rgb(8, 5, 3));
        img.fill_rect(2, 2, 12, 12, Color::rgb(12, 8, 4));
        img.fill_rect(0, 7, 8, 2, barrel);
        frames.push(img);
    }
    SpriteSheet::from_images(frames)
}

/// Tile 1 solid rock, 2 rock with a lit top edge, 3 rock with a dark
/// bottom edge, 4 crystal.
fn tile_sheet() -> SpriteSheet {
    let rock = Color::rgb(6, 4, 3);
    let mut solid = Image::filled(TILE_WIDTH, TILE_HEIGHT, rock);
    solid.fill_rect(3, 5, 3, 2, Color::rgb(5, 3, 2));
    solid.fill_rect(10, 11, 3, 2, Color::rgb(7, 5, 4));
    let mut top = solid.clone();
    top.fill_rect(0, 0, TILE_WIDTH, 2, Color::rgb(9, 8, 5));
    let mut bottom = solid.clone();
    bottom.fill_rect(0, TILE_HEIGHT - 2, TILE_WIDTH, 2, Color::rgb(3, 2, 1));
    let crystal = ellipse(TILE_WIDTH, TILE_HEIGHT, Color::rgb(8, 4, 14));
    SpriteSheet::from_images(vec![solid, top, bottom, crystal])
}

/* -------------------------------------------------------------------- */
/* stage 1                                                               */
/* -------------------------------------------------------------------- */

/// Cave ceiling and floor with a few stalactites; the middle band stays
/// clear so the ship always has room.
fn stage1_tilemap() -> Result<Tilemap, TilemapError> {
    let rows = STAGE1_HEIGHT / TILE_HEIGHT;
    let mut tiles = Vec::with_capacity((STAGE1_COLUMNS * rows) as usize);
    for col in 0..STAGE1_COLUMNS {
        // slow undulation, two rows of amplitude
        let phase = (col % 32 - 16).abs();
        let ceiling = 1 + phase / 8;
        let floor = rows - 1 - (16 - phase) / 8;
        let spike = col % 24 == 12 && col > 30;
        for row in 0..rows {
            let t = if row < ceiling - 1 || row > floor {
                1
            } else if row == ceiling - 1 {
                3
            } else if row == floor {
                2
            } else if spike && row == ceiling {
                4
            } else {
                0
            };
            tiles.push(t);
        }
    }
    Tilemap::new(STAGE1_COLUMNS, rows, tiles)
}

fn stage1() -> StageDesc {
    let layer = |role, kind, place, visible| LayerDesc {
        role,
        kind,
        place,
        visible,
    };
    let layers = vec![
        layer(
            LayerRole::Background,
            LayerKind::Image {
                image: "sky".into(),
                wrap: Wrap::Both,
                blend: Blend::Normal,
            },
            Placement {
                mul_x: Fix::from_raw(32),
                mul_y: Fix::HALF,
                ..Placement::default()
            },
            true,
        ),
        layer(
            LayerRole::Background,
            LayerKind::Image {
                image: "stars".into(),
                wrap: Wrap::Both,
                blend: Blend::Additive,
            },
            Placement {
                mul_x: Fix::from_raw(64),
                mul_y: Fix::HALF,
                ..Placement::default()
            },
            true,
        ),
        layer(
            LayerRole::Background,
            LayerKind::Ramp {
                image: "dunes".into(),
                top: 4,
                bottom: 16,
            },
            Placement {
                offset_y: 120,
                mul_x: Fix::HALF,
                ..Placement::default()
            },
            true,
        ),
        layer(
            LayerRole::Background,
            LayerKind::Wave {
                image: "water".into(),
                amplitude: Fix::from_int(3),
                speed: 2,
                row_step: 5,
                blend: Blend::Normal,
            },
            Placement {
                offset_y: 180,
                mul_x: Fix::from_raw(192),
                ..Placement::default()
            },
            true,
        ),
        layer(
            LayerRole::Terrain,
            LayerKind::Tiles {
                tilemap: "stage1".into(),
                sheet: "tiles".into(),
            },
            Placement::default(),
            true,
        ),
        layer(
            LayerRole::Foreground,
            LayerKind::Image {
                image: "mist".into(),
                wrap: Wrap::Both,
                blend: Blend::Additive,
            },
            Placement {
                mul_x: Fix::from_raw(384),
                ..Placement::default()
            },
            false,
        ),
    ];

    let mut spawns = Vec::new();
    let enemy = |at: i32, kind, subtype, y| SpawnDesc {
        subtype,
        ..SpawnDesc::new(at, SpawnKind::Enemy(kind), y)
    };
    // opening drifters in a staggered line
    for i in 0..5 {
        let mut s = enemy(120, EnemyKind::Drifter, 0, 60 + i * 20);
        s.delay = i as u32 * 12;
        spawns.push(s);
    }
    // wavers with growing swing
    for (i, at) in (400..900).step_by(100).enumerate() {
        spawns.push(enemy(at, EnemyKind::Waver, 1 + i as i32 % 4, 80 + (i as i32 % 3) * 30));
    }
    spawns.push(SpawnDesc {
        drop: Some(PowerupKind::Spray),
        ..enemy(950, EnemyKind::Drifter, 0, 110)
    });
    // gunners settle in rows, the first one at the ship's altitude
    for (i, at) in [1100, 1180, 1260].into_iter().enumerate() {
        spawns.push(SpawnDesc {
            drop: (i == 2).then_some(PowerupKind::Beam),
            ..enemy(at, EnemyKind::Gunner, i as i32, 40)
        });
    }
    spawns.push(SpawnDesc::new(1400, SpawnKind::Powerup(PowerupKind::Score), 120));
    spawns.push(SpawnDesc::new(
        1500,
        SpawnKind::Script {
            role: LayerRole::Foreground,
            index: 0,
            visible: true,
        },
        0,
    ));
    for i in 0..8 {
        let mut s = enemy(1550 + i * 40, EnemyKind::Waver, 1 + i % 2, 70 + (i % 4) * 25);
        s.x_rel = 8;
        spawns.push(s);
    }
    spawns.push(SpawnDesc {
        drop: Some(PowerupKind::Track),
        ..enemy(1900, EnemyKind::Gunner, 0, 100)
    });
    spawns.push(SpawnDesc::new(
        2200,
        SpawnKind::Script {
            role: LayerRole::Foreground,
            index: 0,
            visible: false,
        },
        0,
    ));
    spawns.push(SpawnDesc::new(2300, SpawnKind::Powerup(PowerupKind::OneUp), 110));
    for i in 0..6 {
        spawns.push(enemy(2400 + i * 50, EnemyKind::Gunner, 1 + i % 3, 30));
    }

    StageDesc {
        number: 1,
        level_height: STAGE1_HEIGHT,
        length: 3200,
        x_speed: Fix::ONE,
        music: Some("stage1".into()),
        layers,
        spawns,
    }
}

/* -------------------------------------------------------------------- */
/* screens and backdrops                                                 */
/* -------------------------------------------------------------------- */

fn stars() -> Image {
    let mut img = Image::new(256, 256);
    let mut seed = 0x2545_F491u32;
    for _ in 0..120 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let x = (seed >> 8) as i32 & 255;
        let y = (seed >> 18) as i32 & 255;
        let l = 4 + (seed & 7) as i32;
        img.set(x, y, Color::gray(l));
    }
    img
}

fn dunes() -> Image {
    let (w, h) = (256, 64);
    let mut img = Image::new(w, h);
    for x in 0..w {
        let top = 24 + (FixPolar2D::new(Fix::from_int(10), Fix::TAU * x / w).to_rect().y.to_int());
        for y in top.max(0)..h {
            let l = 2 + (y - top) / 12;
            img.set(x, y, Color::rgb(l + 2, l + 1, l));
        }
    }
    img
}

fn water() -> Image {
    let mut img = vertical_gradient(64, 60, (1, 4, 9), (0, 1, 4));
    for y in (4..60).step_by(7) {
        img.fill_rect((y * 13) % 64, y, 12, 1, Color::rgb(5, 9, 13));
    }
    img
}

fn mist() -> Image {
    let mut img = Image::new(160, S_GAME_HEIGHT);
    for y in 0..S_GAME_HEIGHT {
        for x in 0..160 {
            if (x * 7 + y * 3) % 11 == 0 {
                img.set(x, y, Color::rgb(2, 1, 3));
            }
        }
    }
    img
}

/// Full-screen card: gradient plus a centred emblem.
fn card(top: (i32, i32, i32), bottom: (i32, i32, i32), emblem: Color) -> Image {
    let mut img = vertical_gradient(S_WIDTH, S_HEIGHT, top, bottom);
    let e = ellipse(120, 60, emblem);
    img.blit_all(&e, (S_WIDTH - 120) / 2, (S_HEIGHT - 60) / 2);
    img
}

/// Everything the bundled frontend needs.
pub fn demo_assets() -> MemoryAssets {
    let mut a = MemoryAssets::new();
    a.insert_sheet("ship", ship_sheet())
        .insert_sheet("bullets", bullet_sheet())
        .insert_sheet("explosions", explosion_sheet())
        .insert_sheet("powerups", powerup_sheet())
        .insert_sheet("enemies", enemy_sheet())
        .insert_sheet("tiles", tile_sheet())
        .insert_image("sky", vertical_gradient(16, STAGE1_HEIGHT, (0, 0, 3), (4, 2, 6)))
        .insert_image("stars", stars())
        .insert_image("dunes", dunes())
        .insert_image("water", water())
        .insert_image("mist", mist())
        .insert_image("logo", card((0, 0, 0), (0, 0, 2), Color::rgb(12, 12, 15)))
        .insert_image("title", card((0, 0, 4), (6, 1, 3), Color::rgb(15, 10, 2)))
        .insert_image("screen", card((1, 1, 2), (0, 0, 0), Color::rgb(4, 4, 8)))
        .insert_stage(stage1());
    // a missing map surfaces as NotFound when the stage loads
    match stage1_tilemap() {
        Ok(map) => {
            a.insert_tilemap("stage1", map);
        }
        Err(e) => warn!("demo tilemap: {e}"),
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLoader;
    use crate::sim::GameSheets;
    use crate::world::Stage;

    #[test]
    fn sheets_have_the_required_frames() {
        assert!(GameSheets::load(&demo_assets()).is_ok());
    }

    #[test]
    fn stage_one_loads() {
        let a = demo_assets();
        let desc = a.load_stage(1).expect("stage 1");
        let stage = Stage::load(&desc, &a).expect("loads");
        assert_eq!(stage.backgrounds.len(), 4);
        assert_eq!(stage.terrain.len(), 1);
        assert!(!stage.foregrounds[0].visible());
        assert_eq!(stage.pending_spawns(), desc.spawns.len());
        assert!(matches!(a.load_stage(2), Err(crate::assets::AssetError::NotFound(_))));
    }

    #[test]
    fn ship_spawn_band_is_open() {
        let map = stage1_tilemap().expect("consistent map");
        // spawn point rows 6..8 (y 96..128) are clear across the stage
        for col in 0..STAGE1_COLUMNS {
            for row in 5..9 {
                assert_eq!(map.tile(col, row), crate::world::EMPTY_TILE, "col {col} row {row}");
            }
        }
    }
}
