//! Screen fade state machine.
//!
//! The level is how many colour steps get subtracted from the back buffer
//! when the front buffer is composed: 0 is untouched, 15 is black.

use crate::defs::{FADE_DIVIDER, S_COLORS, S_MAX_COLOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadePhase {
    #[default]
    Idle,
    /// Darkening towards black.
    Out,
    /// Fully black, waiting for the pending mode switch.
    OutDone,
    /// Brightening back from black.
    In,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Fade {
    phase: FadePhase,
    level: i32,
    steps: i32,
    counter: u32,
}

impl Fade {
    #[inline]
    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    /// Darkness to apply this frame.
    pub fn level(&self) -> i32 {
        match self.phase {
            FadePhase::Idle => 0,
            FadePhase::OutDone => S_MAX_COLOR,
            FadePhase::Out | FadePhase::In => self.level,
        }
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.phase != FadePhase::Idle
    }

    pub fn start_out(&mut self) {
        *self = Fade {
            phase: FadePhase::Out,
            ..Fade::default()
        };
    }

    /// Skip straight to black.
    pub fn finish_out(&mut self) {
        *self = Fade {
            phase: FadePhase::OutDone,
            level: S_MAX_COLOR,
            steps: S_COLORS,
            counter: 0,
        };
    }

    pub fn start_in(&mut self) {
        *self = Fade {
            phase: FadePhase::In,
            level: S_MAX_COLOR,
            ..Fade::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Fade::default();
    }

    /// Advance one tick. Steps happen every [`FADE_DIVIDER`] ticks, or
    /// every tick when `fast` is set.
    pub fn tick(&mut self, fast: bool) {
        self.counter += 1;
        if !fast && self.counter % FADE_DIVIDER != 0 {
            return;
        }
        match self.phase {
            FadePhase::Out => {
                self.steps += 1;
                self.level = self.steps.min(S_MAX_COLOR);
                if self.steps >= S_COLORS {
                    self.phase = FadePhase::OutDone;
                }
            }
            FadePhase::In => {
                self.level -= 1;
                if self.level <= 0 {
                    self.reset();
                }
            }
            FadePhase::Idle | FadePhase::OutDone => {}
        }
    }
}
