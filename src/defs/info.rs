//! Static gameplay tables: enemy stats, weapon and pickup kinds.

use crate::fix::Fix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Pulse,
    Spray,
    Beam,
    Track,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Pulse,
        WeaponKind::Spray,
        WeaponKind::Beam,
        WeaponKind::Track,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> WeaponKind {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> WeaponKind {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Highest upgrade level of a weapon (levels are `0..=MAX_WEAPON_LEVEL`).
pub const MAX_WEAPON_LEVEL: u8 = 2;
pub const MAX_LIVES: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    Score,
    OneUp,
    Pulse,
    Spray,
    Beam,
    Track,
}

impl PowerupKind {
    pub const fn weapon(self) -> Option<WeaponKind> {
        match self {
            PowerupKind::Pulse => Some(WeaponKind::Pulse),
            PowerupKind::Spray => Some(WeaponKind::Spray),
            PowerupKind::Beam => Some(WeaponKind::Beam),
            PowerupKind::Track => Some(WeaponKind::Track),
            PowerupKind::Score | PowerupKind::OneUp => None,
        }
    }

    /// Frame in the `powerups` sheet.
    pub const fn frame(self) -> usize {
        self as usize
    }
}

/// Points awarded for a pickup that can no longer upgrade anything.
pub const POWERUP_SCORE: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Flies straight left, fires forward now and then.
    Drifter,
    /// Sine-wave flight.
    Waver,
    /// Slows down and fires aimed shots at the player.
    Gunner,
}

#[derive(Debug, Clone, Copy)]
pub struct EnemyInfo {
    pub hp: i32,
    pub score: u32,
    /// First frame in the `enemies` sheet.
    pub frame: usize,
    pub frames: usize,
    /// Base interval between shots at normal difficulty; 0 never fires.
    pub fire_ticks: i32,
    /// Horizontal speed relative to the scroll, in pixels per tick.
    pub speed: Fix,
}

pub static ENEMY_INFO: [EnemyInfo; 3] = [
    EnemyInfo {
        hp: 2,
        score: 100,
        frame: 0,
        frames: 2,
        fire_ticks: 127,
        speed: Fix::from_raw(256),
    },
    EnemyInfo {
        hp: 3,
        score: 150,
        frame: 2,
        frames: 2,
        fire_ticks: 0,
        speed: Fix::from_raw(384),
    },
    EnemyInfo {
        hp: 6,
        score: 300,
        frame: 4,
        frames: 2,
        fire_ticks: 60,
        speed: Fix::from_raw(128),
    },
];

impl EnemyKind {
    pub fn info(self) -> &'static EnemyInfo {
        &ENEMY_INFO[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_cycle_wraps_both_ways() {
        assert_eq!(WeaponKind::Track.next(), WeaponKind::Pulse);
        assert_eq!(WeaponKind::Pulse.prev(), WeaponKind::Track);
    }

    #[test]
    fn enemy_table_lines_up_with_kinds() {
        assert_eq!(EnemyKind::Gunner.info().frame, 4);
        assert_eq!(PowerupKind::Spray.weapon(), Some(WeaponKind::Spray));
        assert_eq!(PowerupKind::OneUp.frame(), 1);
    }
}
