//! Call model
//!
//! Represents one incoming call and its lifecycle:
//! - Created unassigned when the caller rings in
//! - Assigned to exactly one employee (or parked in the backlog)
//! - Expires once it has been assigned for `duration_sec` seconds
//! - Either terminates or, for Low priority, may escalate to High and be
//!   routed again
//!
//! The assignment is a single optional value holding both the employee
//! handle and the assignment time, so the two can never drift apart.

use crate::core::time::Timestamp;
use crate::models::employee::Seniority;
use crate::models::registry::EmployeeHandle;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Urgency of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallPriority {
    Low,
    High,
}

/// Tiers eligible for Low priority calls, in search order. Directors only
/// handle High priority work.
const LOW_PRIORITY_ORDER: [Seniority; 3] =
    [Seniority::Junior, Seniority::Senior, Seniority::Manager];

/// Tiers eligible for High priority calls, in search order
const HIGH_PRIORITY_ORDER: [Seniority; 2] = [Seniority::Manager, Seniority::Director];

impl CallPriority {
    /// Seniority tiers searched, in order, when routing a call of this priority
    ///
    /// # Example
    /// ```
    /// use dispatch_center_core_rs::{CallPriority, Seniority};
    ///
    /// assert!(!CallPriority::Low.assignment_order().contains(&Seniority::Director));
    /// assert_eq!(
    ///     CallPriority::High.assignment_order(),
    ///     &[Seniority::Manager, Seniority::Director]
    /// );
    /// ```
    pub fn assignment_order(self) -> &'static [Seniority] {
        match self {
            CallPriority::Low => &LOW_PRIORITY_ORDER,
            CallPriority::High => &HIGH_PRIORITY_ORDER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CallPriority::Low => "Low",
            CallPriority::High => "High",
        }
    }
}

impl fmt::Display for CallPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a call's assignment contract is violated
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CallError {
    #[error("Cannot assign call {call_id}: already assigned to employee {employee_uid}")]
    AlreadyAssigned { call_id: String, employee_uid: u64 },

    #[error("Cannot end call {call_id}: it is not assigned")]
    NotAssigned { call_id: String },
}

/// The person on the other end of the line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub uid: u64,
    pub name: String,
}

/// Who is handling a call, and since when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub employee: EmployeeHandle,
    pub assigned_at: Timestamp,
}

/// A call to the dispatch center
///
/// # Example
/// ```
/// use dispatch_center_core_rs::{Call, Caller, CallPriority};
///
/// let call = Call::new(
///     Caller { uid: 0, name: "Ada Byron".to_string() },
///     CallPriority::Low,
///     0,    // received at second 0
///     12,   // lasts 12 seconds once picked up
///     0.5,  // escalation probability
/// );
///
/// assert!(!call.is_assigned());
/// assert!(!call.is_expired(1_000)); // unassigned calls never expire
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    /// Unique call identifier (UUID)
    id: String,

    /// When the call was received
    timestamp: Timestamp,

    caller: Caller,

    /// Current priority; Low calls may be escalated to High
    priority: CallPriority,

    /// Seconds the call lasts once picked up
    duration_sec: u64,

    /// Probability that a Low call escalates when it ends
    escalation_probability: f64,

    assignment: Option<Assignment>,
}

impl Call {
    /// Create a new unassigned call with a random v4 UUID
    ///
    /// Centers use [`Call::with_id`] so ids come from their own random
    /// source; this is for staging calls outside a center.
    ///
    /// # Panics
    /// Panics if `duration_sec` is 0 or `escalation_probability` is outside [0, 1]
    pub fn new(
        caller: Caller,
        priority: CallPriority,
        timestamp: Timestamp,
        duration_sec: u64,
        escalation_probability: f64,
    ) -> Self {
        Self::with_id(
            uuid::Uuid::new_v4().to_string(),
            caller,
            priority,
            timestamp,
            duration_sec,
            escalation_probability,
        )
    }

    /// Create a new unassigned call with a caller-chosen id
    ///
    /// # Panics
    /// Panics if `duration_sec` is 0 or `escalation_probability` is outside [0, 1]
    pub fn with_id(
        id: String,
        caller: Caller,
        priority: CallPriority,
        timestamp: Timestamp,
        duration_sec: u64,
        escalation_probability: f64,
    ) -> Self {
        assert!(duration_sec > 0, "duration_sec must be positive");
        assert!(
            (0.0..=1.0).contains(&escalation_probability),
            "escalation_probability must be within [0, 1]"
        );

        Self {
            id,
            timestamp,
            caller,
            priority,
            duration_sec,
            escalation_probability,
            assignment: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn priority(&self) -> CallPriority {
        self.priority
    }

    pub fn duration_sec(&self) -> u64 {
        self.duration_sec
    }

    /// Override the call length, e.g. to stage a scenario
    ///
    /// # Panics
    /// Panics if `duration_sec` is 0
    pub fn set_duration_sec(&mut self, duration_sec: u64) {
        assert!(duration_sec > 0, "duration_sec must be positive");
        self.duration_sec = duration_sec;
    }

    pub fn escalation_probability(&self) -> f64 {
        self.escalation_probability
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// Handle of the employee currently on this call
    pub fn assigned_to(&self) -> Option<EmployeeHandle> {
        self.assignment.map(|a| a.employee)
    }

    pub fn assigned_at(&self) -> Option<Timestamp> {
        self.assignment.map(|a| a.assigned_at)
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// A call is expired once it has been assigned for at least `duration_sec`
    /// seconds. Unassigned calls never expire.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.assignment {
            Some(a) => now.saturating_sub(a.assigned_at) >= self.duration_sec,
            None => false,
        }
    }

    /// Decide whether this call escalates when it ends
    ///
    /// An explicit `escalate` wins; otherwise a weighted draw fires with
    /// probability `escalation_probability`.
    pub fn should_escalate(&self, escalate: Option<bool>, rng: &mut dyn RandomSource) -> bool {
        match escalate {
            Some(forced) => forced,
            None => rng.chance(self.escalation_probability),
        }
    }

    pub(crate) fn attach(&mut self, employee: EmployeeHandle, now: Timestamp) -> Result<(), CallError> {
        self.ensure_unassigned()?;
        self.assignment = Some(Assignment {
            employee,
            assigned_at: now,
        });
        Ok(())
    }

    /// Fails with [`CallError::AlreadyAssigned`] if the call has an assignee
    pub fn ensure_unassigned(&self) -> Result<(), CallError> {
        match self.assignment {
            Some(existing) => Err(CallError::AlreadyAssigned {
                call_id: self.id.clone(),
                employee_uid: existing.employee.uid(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn detach(&mut self) -> Result<Assignment, CallError> {
        self.assignment.take().ok_or_else(|| CallError::NotAssigned {
            call_id: self.id.clone(),
        })
    }

    pub(crate) fn escalate(&mut self) {
        self.priority = CallPriority::High;
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Call. Priority: {} | Caller ID: {} | Assigned to: ",
            self.priority, self.caller.uid
        )?;
        match &self.assignment {
            Some(a) => write!(f, "{} #{}", a.employee.seniority(), a.employee.uid())?,
            None => f.write_str("nobody")?,
        }
        write!(f, " | Duration: {}s", self.duration_sec)
    }
}
