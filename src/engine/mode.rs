/// Top-level screens the scheduler switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// Nothing shown yet; leaving it skips the fade-out.
    #[default]
    None,
    Logo,
    TitleScreen,
    HighScore,
    NameEntry,
    SelectLevel,
    Cutscene,
    Game,
    Credits,
}

impl GameMode {
    /// Screens that only show a card and wait for a key.
    pub const fn is_static_screen(self) -> bool {
        matches!(
            self,
            GameMode::HighScore
                | GameMode::NameEntry
                | GameMode::SelectLevel
                | GameMode::Cutscene
                | GameMode::Credits
        )
    }
}
