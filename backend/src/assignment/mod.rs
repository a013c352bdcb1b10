//! Assignment Engine
//!
//! Routes a call to the first free employee allowed to take it, or parks it
//! at the tail of the backlog when nobody eligible is free.
//!
//! # Routing Table
//!
//! ```text
//! Low  priority → Junior → Senior → Manager
//! High priority → Manager → Director
//! ```
//!
//! Tiers are scanned in table order and employees in registry order; the
//! first free employee wins. There is no load balancing.
//!
//! # Critical Invariants
//!
//! - **Eligibility**: Low calls never reach a Director directly, High calls
//!   never reach a Junior or Senior
//! - **Atomicity**: preconditions are checked before any state changes; a
//!   call ends up either assigned and active, or unassigned and backlogged
//! - **FIFO**: unmatched calls join the backlog tail

use crate::core::time::Timestamp;
use crate::models::call::CallError;
use crate::models::employee::Seniority;
use crate::models::state::CenterState;
use thiserror::Error;

/// Errors raised by the assignment and escalation engines
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Call not found: {0}")]
    CallNotFound(String),

    #[error("Call {0} is already waiting in the backlog")]
    InBacklog(String),

    #[error("Call error: {0}")]
    Call(#[from] CallError),
}

/// Where a call landed after an assignment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Picked up by an employee and added to the active list
    Assigned {
        employee_uid: u64,
        seniority: Seniority,
    },

    /// No eligible employee free; appended to the backlog
    Backlogged {
        /// Backlog length after the append
        backlog_len: usize,
    },
}

impl Placement {
    pub fn is_assigned(&self) -> bool {
        matches!(self, Placement::Assigned { .. })
    }
}

/// Assign a call to the first free eligible employee, or backlog it
///
/// On a match the call records the employee and `now`, the employee turns
/// busy, and the call id is appended to the active list. Otherwise the id
/// is appended to the backlog tail and the call stays unassigned.
///
/// The caller must have removed the id from the backlog beforehand when
/// retrying a backlogged call.
///
/// # Errors
///
/// - `CallNotFound` if `call_id` is not in the call table
/// - `Call(AlreadyAssigned)` if the call already has an assignee; nothing
///   changes in that case
/// - `InBacklog` if the call is still queued; it keeps its backlog position
///
/// # Example
///
/// ```rust
/// use dispatch_center_core_rs::assignment::{assign, Placement};
/// use dispatch_center_core_rs::{Call, Caller, CallPriority, CenterState, EmployeeRegistry, Seniority};
///
/// let mut state = CenterState::new(EmployeeRegistry::new([1, 1, 1, 1]));
/// let call = Call::new(
///     Caller { uid: 0, name: "Grace Hopper".to_string() },
///     CallPriority::High,
///     0,
///     10,
///     0.1,
/// );
/// let call_id = call.id().to_string();
/// state.add_call(call);
///
/// let placement = assign(&mut state, &call_id, 0).unwrap();
/// assert_eq!(
///     placement,
///     Placement::Assigned { employee_uid: 2, seniority: Seniority::Manager }
/// );
/// assert_eq!(state.active_len(), 1);
/// ```
pub fn assign(
    state: &mut CenterState,
    call_id: &str,
    now: Timestamp,
) -> Result<Placement, RoutingError> {
    let call = state
        .get_call(call_id)
        .ok_or_else(|| RoutingError::CallNotFound(call_id.to_string()))?;
    call.ensure_unassigned()?;
    if state.is_backlogged(call_id) {
        return Err(RoutingError::InBacklog(call_id.to_string()));
    }

    let order = call.priority().assignment_order();
    let Some(handle) = state.registry().first_free(order) else {
        state.enqueue_backlog(call_id.to_string());
        return Ok(Placement::Backlogged {
            backlog_len: state.backlog_len(),
        });
    };

    if let Some(call) = state.get_call_mut(call_id) {
        call.attach(handle, now)?;
    }
    state.registry_mut().mark_busy(handle);
    state.push_active(call_id.to_string());

    Ok(Placement::Assigned {
        employee_uid: handle.uid(),
        seniority: handle.seniority(),
    })
}

/// Outcome of one pass over the backlog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BacklogReview {
    /// Ids of calls that found an employee, in the order they were placed
    pub assigned: Vec<String>,

    /// Number of calls that went back to the backlog
    pub requeued: usize,
}

/// Retry every call currently in the backlog exactly once, oldest first
///
/// The number of retries is fixed to the backlog length at entry. Calls that
/// still find nobody are re-appended by [`assign`] and wait for the next pass.
pub fn process_backlog(
    state: &mut CenterState,
    now: Timestamp,
) -> Result<BacklogReview, RoutingError> {
    let mut review = BacklogReview::default();
    let pending = state.backlog_len();

    for _ in 0..pending {
        let Some(call_id) = state.pop_backlog() else {
            break;
        };

        match assign(state, &call_id, now)? {
            Placement::Assigned { .. } => review.assigned.push(call_id),
            Placement::Backlogged { .. } => review.requeued += 1,
        }
    }

    Ok(review)
}
