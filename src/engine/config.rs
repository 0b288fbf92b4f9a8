use crate::defs::Difficulty;

/// Startup options, filled from the command line by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    /// Spare ships at the start of a game.
    pub lives: u32,
    pub skip_logo: bool,
    pub first_stage: u32,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            lives: 3,
            skip_logo: false,
            first_stage: 1,
            seed: 1,
        }
    }
}
