pub mod flags;
pub mod info;

pub use self::flags::SpriteFlags;
pub use self::info::{
    ENEMY_INFO, EnemyInfo, EnemyKind, MAX_LIVES, MAX_WEAPON_LEVEL, POWERUP_SCORE, PowerupKind,
    WeaponKind,
};

use crate::fix::Fix;
use std::{fmt, str::FromStr};

/// Logical canvas size. Everything is drawn at this resolution and the
/// presentation backend is responsible for any scaling.
pub const S_WIDTH: i32 = 320;
pub const S_HEIGHT: i32 = 240;

/// Rows reserved at the top of the canvas for the status strip.
pub const S_HUD_HEIGHT: i32 = 32;
/// Visible height of the playfield below the status strip.
pub const S_GAME_HEIGHT: i32 = S_HEIGHT - S_HUD_HEIGHT;

/// Logical simulation rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Distinct values in one colour channel.
pub const S_COLORS: i32 = 16;
pub const S_MAX_COLOR: i32 = S_COLORS - 1;

/// A fade advances one colour level every this many ticks.
pub const FADE_DIVIDER: u32 = 4;
/// Wall-clock length of a full fade-out; music fades over the same span.
pub const FADE_OUT_MS: u32 = (S_COLORS as u32 * 1000 * FADE_DIVIDER) / TICKS_PER_SECOND;

/// Difficulty setting. Scales enemy fire rates and bullet speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Bizarre,
}

impl Difficulty {
    /// Scale a fire interval (in ticks).
    ///
    /// The integer divisions truncate on purpose: these are the tuned
    /// intervals, bias included.
    pub fn scale_fire_ticks(self, value: i32) -> i32 {
        match self {
            Difficulty::Easy => (value * 6) / 4,
            Difficulty::Normal => value,
            Difficulty::Hard => value / 2,
            Difficulty::Bizarre => value / 3,
        }
    }

    /// Multiplier on enemy bullet velocity.
    pub fn enemy_bullet_speed(self) -> Fix {
        match self {
            Difficulty::Easy => Fix::from_raw(160),
            Difficulty::Normal => Fix::ONE,
            Difficulty::Hard | Difficulty::Bizarre => Fix::from_raw(384),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Bizarre => "bizarre",
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown difficulty `{0}` (expected easy, normal, hard or bizarre)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "bizarre" => Ok(Difficulty::Bizarre),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_ticks_keep_integer_truncation() {
        assert_eq!(Difficulty::Easy.scale_fire_ticks(127), 190);
        assert_eq!(Difficulty::Normal.scale_fire_ticks(127), 127);
        assert_eq!(Difficulty::Hard.scale_fire_ticks(127), 63);
        assert_eq!(Difficulty::Bizarre.scale_fire_ticks(127), 42);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("medium".parse::<Difficulty>().is_err());
    }

    #[test]
    fn fade_out_spans_sixteen_throttled_levels() {
        assert_eq!(FADE_OUT_MS, 1066);
    }
}
