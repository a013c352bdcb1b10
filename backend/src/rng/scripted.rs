//! Scripted random source for reproducing exact draws in tests and drivers.

use super::RandomSource;

/// Replays a fixed list of raw values, cycling when exhausted
///
/// # Example
/// ```
/// use dispatch_center_core_rs::rng::{RandomSource, ScriptedSource};
///
/// // Raw value 0 maps to the low end of every range
/// let mut rng = ScriptedSource::new(vec![0]);
/// assert_eq!(rng.range_inclusive(1, 20), 1);
/// assert!(rng.chance(0.5));
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<u64>,
    cursor: usize,
}

impl ScriptedSource {
    /// # Panics
    /// Panics if `values` is empty
    pub fn new(values: Vec<u64>) -> Self {
        assert!(!values.is_empty(), "scripted source needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Build a source whose `next_f64` draws return `fractions` in order
    ///
    /// Each fraction is clamped to [0, 1).
    pub fn from_fractions(fractions: &[f64]) -> Self {
        let values = fractions
            .iter()
            .map(|f| {
                let f = f.clamp(0.0, 1.0 - f64::EPSILON);
                ((f * (1u64 << 53) as f64) as u64) << 11
            })
            .collect();
        Self::new(values)
    }

    /// Number of draws served so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_u64(&mut self) -> u64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
