use bitflags::bitflags;

bitflags! {
    /// Behaviour / collision flags carried by every sprite at runtime.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SpriteFlags: u16 {
        // Skipped by the compositor (triggers, delayed spawns).
        const NO_DRAW            = 0x0001;
        // Takes part in sprite-vs-sprite tests; keeps a collision grid.
        const COLLIDE_SPRITES    = 0x0002;
        // Tests itself against terrain layers.
        const COLLIDE_TERRAIN    = 0x0004;
        // Never culled for leaving the playfield.
        const SURVIVE_OFF_SCREEN = 0x0008;
        // Not carried along by the horizontal world scroll.
        const NO_SCROLL          = 0x0010;
        // Valid target for homing shots.
        const TRACKABLE          = 0x0020;
        // Hitbox intersection is enough, no per-pixel test.
        const BOX_CHECK_ONLY     = 0x0040;
    }
}
