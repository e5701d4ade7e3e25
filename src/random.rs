//! Deterministic 48-bit linear congruential generator.
//!
//! Bit-compatible with `java.util.Random`: the same seed yields the same
//! `next_int32` / `next_long` / `next_double` / `next_int(bound)` sequence.
//! Seeded sampling runs depend on this to reproduce reference output exactly,
//! so nothing here may be swapped for a "better" generator.
//!
//! State update: `state = (state * 0x5DEECE66D + 0xB) mod 2^48`.

use rand::{Rng, RngCore, SeedableRng};

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// A `java.util.Random`-compatible generator.
///
/// Each sampling run owns its own instance; there is no shared global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaRandom {
    state: u64,
}

impl JavaRandom {
    /// Create a generator from a seed, scrambled the way the reference generator does.
    pub fn new(seed: i64) -> Self {
        Self {
            state: (seed as u64 ^ MULTIPLIER) & MASK,
        }
    }

    /// Create a generator seeded from the thread-local entropy source.
    ///
    /// Not reproducible across processes.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random::<i64>())
    }

    /// Advance the state and return its top `bits` bits (1..=32) as a signed integer.
    #[inline]
    pub fn next_bits(&mut self, bits: u32) -> i32 {
        debug_assert!((1..=32).contains(&bits));
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        // Truncation to 32 bits is the sign-extension point for `bits == 32`.
        (self.state >> (48 - bits)) as u32 as i32
    }

    /// Uniform 32-bit draw over the full `i32` range.
    #[inline]
    pub fn next_int32(&mut self) -> i32 {
        self.next_bits(32)
    }

    /// Two consecutive 32-bit draws combined as `(hi << 32) + lo`, with `lo` sign-extended.
    #[inline]
    pub fn next_long(&mut self) -> i64 {
        let hi = self.next_int32() as i64;
        let lo = self.next_int32() as i64;
        (hi << 32).wrapping_add(lo)
    }

    /// Uniform `f64` in `[0, 1)` built from 53 random bits.
    #[inline]
    pub fn next_double(&mut self) -> f64 {
        let hi = self.next_bits(26) as i64;
        let lo = self.next_bits(27) as i64;
        ((hi << 27) + lo) as f64 * DOUBLE_UNIT
    }

    /// Uniform integer in `[0, bound)`.
    ///
    /// Powers of two take the high bits of one 31-bit draw; other bounds use
    /// rejection so every residue is equally likely.
    ///
    /// # Panics
    ///
    /// Panics if `bound <= 0`.
    pub fn next_int(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "next_int: bound must be positive (got {bound})");

        if bound & bound.wrapping_neg() == bound {
            return ((bound as i64 * self.next_bits(31) as i64) >> 31) as i32;
        }

        loop {
            let bits = self.next_bits(31);
            let val = bits % bound;
            // Overflow past i32::MAX marks a draw from the incomplete last block.
            if bits.wrapping_sub(val).wrapping_add(bound - 1) >= 0 {
                return val;
            }
        }
    }
}

impl RngCore for JavaRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_int32() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_long() as u64
    }

    /// Fills four bytes per 32-bit draw, least significant byte first.
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let mut rnd = self.next_int32();
            for byte in chunk {
                *byte = rnd as u8;
                rnd >>= 8;
            }
        }
    }
}

impl SeedableRng for JavaRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as i64)
    }
}
