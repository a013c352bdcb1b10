//! Employee (dispatcher) model
//!
//! Each employee has a global uid, a seniority tier and an availability
//! flag. Employees live in the [`EmployeeRegistry`](super::registry::EmployeeRegistry)
//! for the whole lifetime of the center.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seniority tier, which decides what kind of calls an employee may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seniority {
    Junior,
    Senior,
    Manager,
    Director,
}

impl Seniority {
    /// All tiers in registry (and uid) order
    pub const ALL: [Seniority; 4] = [
        Seniority::Junior,
        Seniority::Senior,
        Seniority::Manager,
        Seniority::Director,
    ];

    /// Position of this tier in [`Seniority::ALL`]
    pub fn index(self) -> usize {
        match self {
            Seniority::Junior => 0,
            Seniority::Senior => 1,
            Seniority::Manager => 2,
            Seniority::Director => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Seniority::Junior => "Junior",
            Seniority::Senior => "Senior",
            Seniority::Manager => "Manager",
            Seniority::Director => "Director",
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff member of the dispatch center
///
/// # Example
/// ```
/// use dispatch_center_core_rs::{Employee, Seniority};
///
/// let employee = Employee::new(0, Seniority::Junior);
/// assert!(employee.is_free());
/// assert_eq!(employee.seniority(), Seniority::Junior);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    uid: u64,
    seniority: Seniority,
    is_free: bool,
}

impl Employee {
    /// Create a free employee
    pub fn new(uid: u64, seniority: Seniority) -> Self {
        Self {
            uid,
            seniority,
            is_free: true,
        }
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn seniority(&self) -> Seniority {
        self.seniority
    }

    pub fn is_free(&self) -> bool {
        self.is_free
    }

    pub(crate) fn mark_busy(&mut self) {
        self.is_free = false;
    }

    pub(crate) fn mark_free(&mut self) {
        self.is_free = true;
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "uid: {} | seniority: {} | is_free: {}",
            self.uid, self.seniority, self.is_free
        )
    }
}
