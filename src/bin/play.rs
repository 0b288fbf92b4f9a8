//! Play the bundled demo stage in a window.
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- --scale 3 --difficulty hard
//! ```

use anyhow::Context as _;
use clap::Parser;
use minifb::{Key, Scale, Window, WindowOptions};
use std::thread;

use malpinx::{
    assets::demo::demo_assets,
    audio::NullAudio,
    defs::{Difficulty, S_HEIGHT, S_WIDTH},
    engine::{Engine, EngineConfig, Pacer},
    input::Buttons,
    renderer::to_rgb32,
};

/// Ticks replayed at most after a stall.
const MAX_CATCH_UP: u32 = 8;

const KEYMAP: &[(Key, Buttons)] = &[
    (Key::Up, Buttons::UP),
    (Key::Down, Buttons::DOWN),
    (Key::Left, Buttons::LEFT),
    (Key::Right, Buttons::RIGHT),
    (Key::Space, Buttons::FIRE),
    (Key::LeftCtrl, Buttons::FIRE),
    (Key::Enter, Buttons::SELECT),
    (Key::Escape, Buttons::EXIT),
    (Key::P, Buttons::PAUSE),
    (Key::X, Buttons::WEAPON_NEXT),
    (Key::Z, Buttons::WEAPON_PREV),
    (Key::A, Buttons::SPEED_UP),
    (Key::S, Buttons::SPEED_DOWN),
];

#[derive(Parser, Debug)]
#[command(version, about = "Side-scrolling shooter demo")]
struct Args {
    /// Window pixels per logical pixel (1, 2, 4 or 8).
    #[arg(long, default_value_t = 2)]
    scale: u32,
    #[arg(long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,
    /// First stage to play.
    #[arg(long, default_value_t = 1)]
    stage: u32,
    #[arg(long)]
    skip_logo: bool,
    /// Seed for the gameplay RNG.
    #[arg(long, default_value_t = 1)]
    seed: u32,
}

fn window_scale(n: u32) -> Scale {
    match n {
        0 | 1 => Scale::X1,
        2 | 3 => Scale::X2,
        4..=7 => Scale::X4,
        _ => Scale::X8,
    }
}

fn held_buttons(win: &Window) -> Buttons {
    KEYMAP
        .iter()
        .filter(|(key, _)| win.is_key_down(*key))
        .fold(Buttons::empty(), |acc, (_, b)| acc | *b)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = EngineConfig {
        difficulty: args.difficulty,
        skip_logo: args.skip_logo,
        first_stage: args.stage,
        seed: args.seed,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, Box::new(demo_assets()), Box::new(NullAudio::new()));

    let (w, h) = (S_WIDTH as usize, S_HEIGHT as usize);
    let mut win = Window::new(
        "malpinx",
        w,
        h,
        WindowOptions {
            scale: window_scale(args.scale),
            ..WindowOptions::default()
        },
    )
    .context("opening window")?;

    let mut pacer = Pacer::new(MAX_CATCH_UP);
    let mut buffer = Vec::with_capacity(w * h);

    while win.is_open() && engine.running() {
        let due = pacer.due();
        if due == 0 {
            thread::sleep(pacer.until_next());
            win.update();
            continue;
        }

        let held = held_buttons(&win);
        for _ in 0..due {
            engine.tick(held).context("mode init failed")?;
        }

        to_rgb32(engine.render(), &mut buffer);
        win.update_with_buffer(&buffer, w, h)
            .context("presenting frame")?;
    }
    log::info!("high score {}", engine.high_score());
    Ok(())
}
