//! Deterministic random source.
//!
//! Every draw in a battle (accuracy, critical hits, damage variance, status
//! chances) is a pure function of a seed. Seeds are derived from the session
//! seed, the action nonce, the acting character and a per-action roll
//! counter, so replaying the same actions reproduces the same battle.

/// Bounded integer draws from a seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Value in `[min, max]` inclusive. Returns `min` for an empty range.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min + 1;
        min + (self.next_u32(seed) % span)
    }

    /// Value in `0..100`, compared against percentage thresholds.
    fn percent(&self, seed: u64) -> u32 {
        self.range(seed, 0, 99)
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the inputs of one draw into a seed.
///
/// * `session_seed` - fixed for a save/session
/// * `nonce` - action sequence number
/// * `actor` - raw id of the acting character
/// * `roll` - index of the draw within the action (0, 1, 2, ...)
pub fn compute_seed(session_seed: u64, nonce: u64, actor: u32, roll: u32) -> u64 {
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(roll).wrapping_mul(0x85ebca6b);

    // SplitMix64 finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
