//! Time management for the dispatch center
//!
//! The center runs on a simulated clock measured in whole seconds. The
//! driver advances it explicitly, so call expiry is fully deterministic.

use serde::{Deserialize, Serialize};

/// A point on the simulated clock, in seconds since the center opened.
pub type Timestamp = u64;

/// Manages simulated time in discrete one-second steps
///
/// # Example
/// ```
/// use dispatch_center_core_rs::TimeManager;
///
/// let mut time = TimeManager::new();
/// assert_eq!(time.now(), 0);
///
/// time.advance_tick();
/// assert_eq!(time.now(), 1);
///
/// time.advance_by(5);
/// assert_eq!(time.now(), 6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeManager {
    /// Seconds elapsed since the center opened
    current_second: Timestamp,
}

impl TimeManager {
    /// Create a clock starting at second 0
    pub fn new() -> Self {
        Self { current_second: 0 }
    }

    /// Create a clock starting at an arbitrary second
    ///
    /// # Example
    /// ```
    /// use dispatch_center_core_rs::TimeManager;
    ///
    /// let time = TimeManager::starting_at(100);
    /// assert_eq!(time.now(), 100);
    /// ```
    pub fn starting_at(second: Timestamp) -> Self {
        Self {
            current_second: second,
        }
    }

    /// Advance time by one second (one driver tick)
    pub fn advance_tick(&mut self) {
        self.advance_by(1);
    }

    /// Advance time by `seconds`
    pub fn advance_by(&mut self, seconds: u64) {
        self.current_second = self.current_second.saturating_add(seconds);
    }

    /// Current simulated second
    pub fn now(&self) -> Timestamp {
        self.current_second
    }

    /// Seconds elapsed since `since`
    ///
    /// Returns 0 when `since` lies in the future.
    ///
    /// # Example
    /// ```
    /// use dispatch_center_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new();
    /// time.advance_by(10);
    /// assert_eq!(time.elapsed_since(4), 6);
    /// assert_eq!(time.elapsed_since(12), 0);
    /// ```
    pub fn elapsed_since(&self, since: Timestamp) -> u64 {
        self.current_second.saturating_sub(since)
    }
}
