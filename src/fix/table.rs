// 128-entry trig tables covering one full turn.
//
// Index 0 is angle 0, index 64 is π. Gameplay code that steps angles every
// tick (rotation frames, homing turns, sine-wave movement) reads these
// instead of calling the slow float paths.

use super::{Fix, Real};
use once_cell::sync::Lazy;

pub const TABLE_SIZE: usize = 128;
const TABLE_MASK: i32 = TABLE_SIZE as i32 - 1;

fn build(f: fn(Real) -> Real) -> [Fix; TABLE_SIZE] {
    let mut t = [Fix::ZERO; TABLE_SIZE];
    for (i, v) in t.iter_mut().enumerate() {
        let a = i as Real * std::f64::consts::TAU as Real / TABLE_SIZE as Real;
        *v = Fix::from_raw((f(a) * 256.0).round() as i32);
    }
    t
}

pub static SINE: Lazy<[Fix; TABLE_SIZE]> = Lazy::new(|| build(Real::sin));
pub static COSINE: Lazy<[Fix; TABLE_SIZE]> = Lazy::new(|| build(Real::cos));

/// `SINE[i + 1] - SINE[i]`: summing it along a phase walks a sine wave
/// without accumulating drift.
pub static DELTA_SINE: Lazy<[Fix; TABLE_SIZE]> = Lazy::new(|| {
    let mut t = [Fix::ZERO; TABLE_SIZE];
    for (i, v) in t.iter_mut().enumerate() {
        *v = SINE[(i + 1) & TABLE_MASK as usize] - SINE[i];
    }
    t
});

/// Map any angle (radians, any sign) onto `0..128`.
#[inline]
pub fn table_index(angle: Fix) -> usize {
    let scaled = (angle.raw() as i64 * TABLE_SIZE as i64).div_euclid(Fix::TAU.raw() as i64);
    (scaled as i32 & TABLE_MASK) as usize
}

#[inline]
pub fn table_sin(angle: Fix) -> Fix {
    SINE[table_index(angle)]
}

#[inline]
pub fn table_cos(angle: Fix) -> Fix {
    COSINE[table_index(angle)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns() {
        assert_eq!(table_index(Fix::ZERO), 0);
        assert_eq!(table_index(Fix::PI), 64);
        assert_eq!(table_index(-Fix::PI), 64);
        assert_eq!(table_index(Fix::TAU), 0);
        assert_eq!(SINE[32], Fix::ONE);
        assert_eq!(COSINE[64], -Fix::ONE);
    }

    #[test]
    fn negative_angles_wrap() {
        // -π/2 lands on 3π/2
        assert_eq!(table_index(Fix::from_raw(-402)), 96);
        assert_eq!(table_sin(Fix::from_raw(-402)), -Fix::ONE);
    }

    #[test]
    fn delta_sine_sums_to_zero_over_a_turn() {
        let total = DELTA_SINE.iter().fold(Fix::ZERO, |acc, d| acc + *d);
        assert_eq!(total, Fix::ZERO);
    }
}
