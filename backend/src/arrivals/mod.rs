//! Arrival generation for the driver loop.
//!
//! Produces incoming calls for [`DispatchCenter::tick`](crate::DispatchCenter::tick)
//! one at a time. The next call is due a random `1..=max_call_interval_sec`
//! seconds later, is High priority with a fixed probability, and carries a
//! random caller name.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same arrivals
//! 2. **Single stream**: at most one call arrives per tick
//!
//! # Example
//!
//! ```
//! use dispatch_center_core_rs::arrivals::{ArrivalConfig, ArrivalGenerator};
//! use dispatch_center_core_rs::rng::RngManager;
//!
//! let mut rng = RngManager::new(42);
//! let mut generator = ArrivalGenerator::new(ArrivalConfig::default(), 0);
//!
//! // First call is due immediately
//! let call = generator.poll(0, &mut rng).unwrap();
//! assert!(!call.caller_name.is_empty());
//! assert!(generator.next_call_at() >= 1);
//! ```

use crate::core::time::Timestamp;
use crate::models::call::CallPriority;
use crate::orchestrator::ConfigurationError;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

const FIRST_NAMES: &[&str] = &[
    "Aiden", "Beatriz", "Carlos", "Dana", "Elif", "Farah", "Gustav", "Hana", "Ivan", "Jade",
    "Kofi", "Lena", "Mateo", "Nadia", "Oscar", "Priya", "Quinn", "Rosa", "Sven", "Tamsin",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Barros", "Chen", "Dlamini", "Eriksen", "Fischer", "Garcia", "Haddad", "Ito",
    "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov", "Rossi", "Silva",
];

/// Configuration for generated incoming calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalConfig {
    /// Largest gap, in seconds, between two consecutive calls
    pub max_call_interval_sec: u64,

    /// Probability that a generated call is High priority
    pub high_priority_prob: f64,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            max_call_interval_sec: 2,
            high_priority_prob: 0.3,
        }
    }
}

impl ArrivalConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_call_interval_sec == 0 {
            return Err(ConfigurationError::InvalidArrivals(
                "max_call_interval_sec must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.high_priority_prob) {
            return Err(ConfigurationError::InvalidArrivals(format!(
                "high_priority_prob must be between 0 and 1, got {}",
                self.high_priority_prob
            )));
        }

        Ok(())
    }
}

/// A call the generator wants dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCall {
    pub caller_name: String,
    pub priority: CallPriority,
}

/// Generator for incoming calls
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    config: ArrivalConfig,

    /// Second at which the next call is due
    next_call_at: Timestamp,
}

impl ArrivalGenerator {
    /// Create a generator whose first call is due at `first_call_at`
    pub fn new(config: ArrivalConfig, first_call_at: Timestamp) -> Self {
        Self {
            config,
            next_call_at: first_call_at,
        }
    }

    pub fn next_call_at(&self) -> Timestamp {
        self.next_call_at
    }

    /// Produce the call due at `now`, if any, and schedule the next one
    pub fn poll(&mut self, now: Timestamp, rng: &mut dyn RandomSource) -> Option<IncomingCall> {
        if now < self.next_call_at {
            return None;
        }

        let caller_name = random_caller_name(rng);
        let priority = if rng.chance(self.config.high_priority_prob) {
            CallPriority::High
        } else {
            CallPriority::Low
        };
        self.next_call_at = now + rng.range_inclusive(1, self.config.max_call_interval_sec);

        Some(IncomingCall {
            caller_name,
            priority,
        })
    }
}

/// Draw a "First Last" caller name
pub fn random_caller_name(rng: &mut dyn RandomSource) -> String {
    let first = FIRST_NAMES[rng.range_inclusive(0, FIRST_NAMES.len() as u64 - 1) as usize];
    let last = LAST_NAMES[rng.range_inclusive(0, LAST_NAMES.len() as u64 - 1) as usize];
    format!("{} {}", first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngManager, ScriptedSource};

    #[test]
    fn test_nothing_before_due_time() {
        let mut rng = RngManager::new(1);
        let mut generator = ArrivalGenerator::new(ArrivalConfig::default(), 5);

        for t in 0..5 {
            assert!(generator.poll(t, &mut rng).is_none());
        }
        assert!(generator.poll(5, &mut rng).is_some());
    }

    #[test]
    fn test_interval_within_bounds() {
        let mut rng = RngManager::new(99);
        let config = ArrivalConfig {
            max_call_interval_sec: 4,
            high_priority_prob: 0.3,
        };
        let mut generator = ArrivalGenerator::new(config, 0);

        let mut now = 0;
        for _ in 0..200 {
            generator.poll(now, &mut rng).unwrap();
            let gap = generator.next_call_at() - now;
            assert!((1..=4).contains(&gap), "gap {} out of range", gap);
            now = generator.next_call_at();
        }
    }

    #[test]
    fn test_priority_extremes() {
        let mut rng = RngManager::new(3);
        let mut all_high = ArrivalGenerator::new(
            ArrivalConfig {
                max_call_interval_sec: 1,
                high_priority_prob: 1.0,
            },
            0,
        );
        let mut all_low = ArrivalGenerator::new(
            ArrivalConfig {
                max_call_interval_sec: 1,
                high_priority_prob: 0.0,
            },
            0,
        );

        for t in 0..50 {
            assert_eq!(all_high.poll(t, &mut rng).unwrap().priority, CallPriority::High);
            assert_eq!(all_low.poll(t, &mut rng).unwrap().priority, CallPriority::Low);
        }
    }

    #[test]
    fn test_scripted_name() {
        let mut rng = ScriptedSource::new(vec![0]);
        assert_eq!(random_caller_name(&mut rng), "Aiden Abbott");
    }

    #[test]
    fn test_validate() {
        assert!(ArrivalConfig::default().validate().is_ok());
        assert!(ArrivalConfig {
            max_call_interval_sec: 0,
            high_priority_prob: 0.3
        }
        .validate()
        .is_err());
        assert!(ArrivalConfig {
            max_call_interval_sec: 2,
            high_priority_prob: 1.5
        }
        .validate()
        .is_err());
    }
}
