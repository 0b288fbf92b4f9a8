use crate::defs::TICKS_PER_SECOND;
use std::time::{Duration, Instant};

pub const TIC: Duration = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

/// Turns wall-clock time into a number of due logic ticks.
pub struct Pacer {
    last: Instant,
    max_catch_up: u32,
}

impl Pacer {
    pub fn new(max_catch_up: u32) -> Self {
        Self::starting_at(Instant::now(), max_catch_up)
    }

    pub fn starting_at(start: Instant, max_catch_up: u32) -> Self {
        Self {
            last: start,
            max_catch_up: max_catch_up.max(1),
        }
    }

    #[inline]
    pub fn due(&mut self) -> u32 {
        self.due_at(Instant::now())
    }

    /// Ticks owed at `now`. After a stall longer than `max_catch_up` ticks
    /// the backlog is dropped instead of replayed.
    pub fn due_at(&mut self, now: Instant) -> u32 {
        let mut n = 0;
        while now.saturating_duration_since(self.last) >= TIC {
            self.last += TIC;
            n += 1;
            if n == self.max_catch_up {
                if now.saturating_duration_since(self.last) >= TIC {
                    self.last = now;
                }
                break;
            }
        }
        n
    }

    /// Time left until the next tick is owed.
    pub fn until_next(&self) -> Duration {
        (self.last + TIC).saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whole_ticks() {
        let t0 = Instant::now();
        let mut p = Pacer::starting_at(t0, 10);
        assert_eq!(p.due_at(t0), 0);
        assert_eq!(p.due_at(t0 + TIC * 3 + TIC / 2), 3);
        assert_eq!(p.due_at(t0 + TIC * 4), 1);
    }

    #[test]
    fn long_stalls_are_capped() {
        let t0 = Instant::now();
        let mut p = Pacer::starting_at(t0, 5);
        assert_eq!(p.due_at(t0 + TIC * 100), 5);
        assert_eq!(p.due_at(t0 + TIC * 100), 0);
        assert_eq!(p.due_at(t0 + TIC * 101), 1);
    }
}
