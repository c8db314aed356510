//! Seeded draw stream for layout generation.
//!
//! Every draw first advances a 32-bit linear congruential state, then runs
//! the new state through an avalanche mix so that low bits are usable.
//! Consumers only ever see the mixed value, never the raw LCG state.
//!
//! ```
//! use tinyhouse_logic::rng::LayoutRng;
//!
//! let mut a = LayoutRng::new(42);
//! let mut b = LayoutRng::new(42);
//! assert_eq!(a.next_f64(), b.next_f64());
//! ```

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Deterministic `[0, 1)` stream keyed by a `u32` seed.
#[derive(Debug, Clone)]
pub struct LayoutRng {
    state: u32,
}

impl LayoutRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current LCG state (after the most recent advance).
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance the LCG and return the mixed value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        mix(self.state)
    }

    /// Uniform index into a collection of `len` items. Returns 0 for `len == 0`.
    pub fn index(&mut self, len: usize) -> usize {
        let r = self.next_f64();
        if len == 0 {
            return 0;
        }
        ((r * len as f64).floor() as usize).min(len - 1)
    }

    /// Uniform pick from a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let idx = self.index(items.len());
        items.get(idx)
    }
}

/// Avalanche mix: offset, xorshift, then two multiply-xor rounds.
fn mix(state: u32) -> f64 {
    let mut t = state.wrapping_add(0x6d2b_79f5);
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    (t ^ (t >> 14)) as f64 / 4_294_967_296.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = LayoutRng::new(7);
        let mut b = LayoutRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn values_in_unit_interval() {
        let mut rng = LayoutRng::new(0);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn state_advances_by_lcg_step() {
        let mut rng = LayoutRng::new(1);
        rng.next_f64();
        assert_eq!(rng.state(), 1_664_525u32.wrapping_add(1_013_904_223));
    }

    #[test]
    fn state_wraps_at_u32_max() {
        let mut rng = LayoutRng::new(u32::MAX);
        rng.next_f64();
        let expected = u32::MAX
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        assert_eq!(rng.state(), expected);
    }

    #[test]
    fn mixed_low_bit_is_balanced() {
        // A bare LCG alternates its low bit; the mixed stream should not.
        let mut rng = LayoutRng::new(12345);
        let below_half = (0..2000).filter(|_| rng.next_f64() < 0.5).count();
        assert!(
            (800..1200).contains(&below_half),
            "skewed stream: {below_half}/2000 below 0.5"
        );
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut rng = LayoutRng::new(99);
        for _ in 0..1000 {
            assert!(rng.index(8) < 8);
        }
        assert_eq!(rng.index(0), 0);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = LayoutRng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert!(rng.choose(&[1, 2, 3]).is_some());
    }
}
