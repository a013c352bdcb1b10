//! Deterministic random number generation
//!
//! All randomness in the dispatch center (call durations, escalation draws,
//! arrival timing, caller names) MUST go through a [`RandomSource`]. The
//! default source is a seeded xorshift64* generator; tests may inject a
//! scripted source instead.

mod scripted;
mod xorshift;

pub use scripted::ScriptedSource;
pub use xorshift::RngManager;

/// Source of randomness consumed by the dispatch center
///
/// Implementors only need to supply raw 64-bit draws; the sampling helpers
/// are derived from them.
pub trait RandomSource: std::fmt::Debug {
    /// Next raw 64-bit value
    fn next_u64(&mut self) -> u64;

    /// Uniform f64 in [0.0, 1.0)
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform integer in the closed range [min, max]
    ///
    /// # Panics
    /// Panics if min > max
    fn range_inclusive(&mut self, min: u64, max: u64) -> u64 {
        assert!(min <= max, "min must not exceed max");
        match (max - min).checked_add(1) {
            Some(span) => min + self.next_u64() % span,
            None => self.next_u64(),
        }
    }

    /// Weighted yes/no draw: `true` with weight `p`, `false` with weight `1 - p`
    ///
    /// `p` is clamped to [0, 1], so `p == 0.0` never fires and `p == 1.0`
    /// always does.
    fn chance(&mut self, p: f64) -> bool {
        let p = p.clamp(0.0, 1.0);
        self.next_f64() < p
    }
}
