use super::Fix;

const MUL: u32 = 259_331_095;
const INC: u32 = 732_840_625;

/// Small reproducible linear-congruential generator.
///
/// Seeded explicitly, so a session started from the same seed replays
/// the same fire staggering and debris.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixRandom {
    seed: u32,
}

impl FixRandom {
    pub const fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn reset(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn next_int(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(MUL).wrapping_add(INC);
        self.seed
    }

    /// Uniform in `[0, 1)` at raw resolution.
    pub fn next_fix(&mut self) -> Fix {
        Fix::from_raw((self.next_int() & 0xFF) as i32)
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn next_angle(&mut self) -> Fix {
        let step = ((self.next_int() >> 3) & 0xFF) as i32;
        Fix::from_raw((step * Fix::TAU.raw()) >> 8)
    }

    /// Integer in `lo..hi`; returns `lo` for an empty range.
    pub fn next_range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        lo + ((self.next_int() >> 8) % (hi - lo) as u32) as i32
    }
}
