//! Seeded pseudo-random stream.
//!
//! A string seed is folded into a 32-bit state with a polynomial rolling hash,
//! then expanded with mulberry32. The bit sequence is fixed: the same seed
//! must produce the same floats on every platform, otherwise previously
//! generated art can no longer be reproduced.

/// Additive constant applied to the state on every draw.
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32, maps a `u32` onto `[0, 1)`.
const U32_RANGE: f64 = 4_294_967_296.0;

/// Fold a seed string into a 32-bit value.
///
/// Each UTF-16 code unit is mixed in as `hash * 31 + unit` with 32-bit
/// wrapping arithmetic.
pub fn seed_to_u32(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Anything that can hand out uniform floats in `[0, 1)`.
///
/// Implemented by [`Mulberry32`] and by plain closures, which makes it easy to
/// drive synthesis from a scripted sequence.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// Mulberry32 generator with a single 32-bit state word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a generator from a raw state value.
    pub const fn new(state: u32) -> Self {
        Self { state }
    }

    /// Create a generator from a seed string.
    pub fn from_seed(seed: &str) -> Self {
        Self::new(seed_to_u32(seed))
    }

    /// Current state word.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance and return the next 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }
}

impl RandomSource for Mulberry32 {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_hash_values() {
        assert_eq!(seed_to_u32(""), 0);
        assert_eq!(seed_to_u32("a"), 97);
        assert_eq!(seed_to_u32("abc"), 96354);
        assert_eq!(seed_to_u32("default"), 1_544_803_905);
    }

    #[test]
    fn test_seed_hash_wraps() {
        // Long seeds overflow 32 bits many times over
        assert_eq!(seed_to_u32(&"x".repeat(1000)), 2_579_549_184);
        assert_eq!(seed_to_u32("randomart"), 3_467_426_496);
    }

    #[test]
    fn test_seed_hash_uses_utf16_units() {
        // U+1F600 is a surrogate pair: 0xD83D, 0xDE00
        let expected = 0xD83Du32.wrapping_mul(31).wrapping_add(0xDE00);
        assert_eq!(seed_to_u32("\u{1F600}"), expected);
    }

    #[test]
    fn test_default_seed_reference_sequence() {
        let mut rng = Mulberry32::from_seed("default");
        let drawn: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
        assert_eq!(
            drawn,
            vec![
                0.6542490690480918,
                0.36309170303866267,
                0.08514147973619401,
                0.012304447824135423,
                0.6533662939909846,
            ]
        );
    }

    #[test]
    fn test_empty_seed_reference_sequence() {
        let mut rng = Mulberry32::from_seed("");
        assert_eq!(rng.next_f64(), 0.26642920868471265);
        assert_eq!(rng.next_f64(), 0.0003297457005828619);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Mulberry32::from_seed("twin");
        let mut b = Mulberry32::from_seed("twin");
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut rng = Mulberry32::from_seed("range");
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_closure_source() {
        let mut values = [0.25, 0.75].into_iter().cycle();
        let mut source = move || values.next().unwrap_or(0.0);
        assert_eq!(source.next_f64(), 0.25);
        assert_eq!(source.next_f64(), 0.75);
        assert_eq!(source.next_f64(), 0.25);
    }
}
