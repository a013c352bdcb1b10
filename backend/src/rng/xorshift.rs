//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers, so a dispatch run can be
//! replayed call for call from its seed and driver inputs.

use super::RandomSource;
use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use dispatch_center_core_rs::{RandomSource, RngManager};
///
/// let mut rng = RngManager::new(12345);
/// let duration = rng.range_inclusive(1, 20);
/// assert!((1..=20).contains(&duration));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    ///
    /// This advances the internal state and returns a random value.
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Get current RNG state
    ///
    /// `RngManager::new(rng.get_state())` continues the same sequence.
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

impl RandomSource for RngManager {
    fn next_u64(&mut self) -> u64 {
        self.next()
    }
}
