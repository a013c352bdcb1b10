//! Event logging for dispatch replay and auditing.
//!
//! Every state change the dispatch center makes is captured as an [`Event`]
//! in an [`EventLog`], in the order it happened. Events enable:
//! - Deterministic replay checks (same seed → same log)
//! - Debugging (who took which call, and when)
//! - Analysis (backlog pressure, escalation rate)
//!
//! # Example
//!
//! ```rust
//! use dispatch_center_core_rs::models::Event;
//! use dispatch_center_core_rs::CallPriority;
//!
//! let event = Event::CallReceived {
//!     time: 10,
//!     call_id: "call-42".to_string(),
//!     caller_uid: 3,
//!     priority: CallPriority::High,
//!     duration_sec: 15,
//! };
//!
//! assert_eq!(event.time(), 10);
//! assert_eq!(event.event_type(), "CallReceived");
//! ```

use crate::core::time::Timestamp;
use crate::models::call::CallPriority;
use crate::models::employee::Seniority;

/// Dispatch event capturing a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// New call registered with the center
    CallReceived {
        time: Timestamp,
        call_id: String,
        caller_uid: u64,
        priority: CallPriority,
        duration_sec: u64,
    },

    /// Call picked up by an employee
    CallAssigned {
        time: Timestamp,
        call_id: String,
        employee_uid: u64,
        seniority: Seniority,
    },

    /// No eligible employee was free; call appended to the backlog
    CallBacklogged {
        time: Timestamp,
        call_id: String,
        backlog_len: usize,
    },

    /// Assigned call reached its duration and released its employee
    CallEnded {
        time: Timestamp,
        call_id: String,
        employee_uid: u64,
    },

    /// Low priority call promoted to High after ending
    CallEscalated { time: Timestamp, call_id: String },

    /// Call finished for good and left the center
    CallTerminated { time: Timestamp, call_id: String },
}

impl Event {
    /// Simulated second at which this event occurred
    pub fn time(&self) -> Timestamp {
        match self {
            Event::CallReceived { time, .. } => *time,
            Event::CallAssigned { time, .. } => *time,
            Event::CallBacklogged { time, .. } => *time,
            Event::CallEnded { time, .. } => *time,
            Event::CallEscalated { time, .. } => *time,
            Event::CallTerminated { time, .. } => *time,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::CallReceived { .. } => "CallReceived",
            Event::CallAssigned { .. } => "CallAssigned",
            Event::CallBacklogged { .. } => "CallBacklogged",
            Event::CallEnded { .. } => "CallEnded",
            Event::CallEscalated { .. } => "CallEscalated",
            Event::CallTerminated { .. } => "CallTerminated",
        }
    }

    pub fn call_id(&self) -> &str {
        match self {
            Event::CallReceived { call_id, .. } => call_id,
            Event::CallAssigned { call_id, .. } => call_id,
            Event::CallBacklogged { call_id, .. } => call_id,
            Event::CallEnded { call_id, .. } => call_id,
            Event::CallEscalated { call_id, .. } => call_id,
            Event::CallTerminated { call_id, .. } => call_id,
        }
    }

    /// Employee uid if the event involves a specific employee
    pub fn employee_uid(&self) -> Option<u64> {
        match self {
            Event::CallAssigned { employee_uid, .. } => Some(*employee_uid),
            Event::CallEnded { employee_uid, .. } => Some(*employee_uid),
            _ => None,
        }
    }
}

/// Event log for storing and querying dispatch events.
///
/// This is a simple wrapper around `Vec<Event>` with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events that occurred at a given second
    pub fn events_at(&self, time: Timestamp) -> Vec<&Event> {
        self.events.iter().filter(|e| e.time() == time).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get the full history of one call
    pub fn events_for_call(&self, call_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.call_id() == call_id)
            .collect()
    }

    /// Get events involving a specific employee
    pub fn events_for_employee(&self, employee_uid: u64) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.employee_uid() == Some(employee_uid))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
