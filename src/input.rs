//! Input snapshot handed to the scheduler each tick.
//!
//! The backend reports which buttons are down (level-triggered); the
//! snapshot derives the edge-triggered "went down this tick" view.

use bitflags::bitflags;

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Buttons: u16 {
        const UP          = 0x0001;
        const DOWN        = 0x0002;
        const LEFT        = 0x0004;
        const RIGHT       = 0x0008;
        const FIRE        = 0x0010;
        const SELECT      = 0x0020;
        const EXIT        = 0x0040;
        const PAUSE       = 0x0080;
        const WEAPON_NEXT = 0x0100;
        const WEAPON_PREV = 0x0200;
        const SPEED_UP    = 0x0400;
        const SPEED_DOWN  = 0x0800;
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSnapshot {
    held: Buttons,
    pressed: Buttons,
}

impl InputSnapshot {
    /// Snapshot for this tick given the buttons currently down.
    pub fn next(self, held: Buttons) -> InputSnapshot {
        InputSnapshot {
            held,
            pressed: held.difference(self.held),
        }
    }

    /// Level-triggered.
    #[inline]
    pub fn held(&self, b: Buttons) -> bool {
        self.held.intersects(b)
    }

    /// Edge-triggered: down now, up last tick.
    #[inline]
    pub fn pressed(&self, b: Buttons) -> bool {
        self.pressed.intersects(b)
    }

    pub fn held_buttons(&self) -> Buttons {
        self.held
    }

    /// Direction from the held arrows, each component in `-1..=1`.
    pub fn direction(&self) -> (i32, i32) {
        let axis = |neg: Buttons, pos: Buttons| self.held(pos) as i32 - self.held(neg) as i32;
        (axis(Buttons::LEFT, Buttons::RIGHT), axis(Buttons::UP, Buttons::DOWN))
    }
}
