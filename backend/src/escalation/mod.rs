//! Escalation Engine
//!
//! Ends an assigned call and decides what happens next:
//!
//! ```text
//! end(call)
//!   ├─ clear the assignment
//!   ├─ priority High              → free employee, Terminated
//!   └─ priority Low
//!        ├─ should_escalate = no  → free employee, Terminated
//!        └─ should_escalate = yes → priority := High, assign() again,
//!                                   then free employee
//!                                     ├─ other Manager/Director free → active
//!                                     └─ otherwise                   → backlog
//! ```
//!
//! Directors are the ceiling: a High call that ends always terminates. An
//! escalated call is never handed back to the employee who just ended it.
//!
//! The call is expected to still sit in the active list when this runs;
//! removing its old entry is the orchestrator's job. A successful
//! re-assignment appends a fresh entry at the active list tail.

use crate::assignment::{assign, Placement, RoutingError};
use crate::core::time::Timestamp;
use crate::models::call::CallPriority;
use crate::models::state::CenterState;
use crate::rng::RandomSource;

/// What happened to a call after it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// Call is finished and can be discarded
    Terminated {
        /// Employee freed by this call
        released_uid: u64,
    },

    /// Low call promoted to High and routed again
    Escalated {
        /// Employee freed by this call
        released_uid: u64,
        /// Where the escalated call landed
        placement: Placement,
    },
}

impl EndOutcome {
    pub fn released_uid(&self) -> u64 {
        match self {
            EndOutcome::Terminated { released_uid } => *released_uid,
            EndOutcome::Escalated { released_uid, .. } => *released_uid,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, EndOutcome::Terminated { .. })
    }
}

/// End an assigned call, possibly escalating it
///
/// `escalate` forces the escalation decision for Low calls; `None` draws it
/// from `rng` with the call's escalation probability. High calls ignore it
/// and never consume a draw.
///
/// An escalated call is routed before its previous employee is freed, so it
/// never lands back on that employee. When no other eligible employee is
/// free it waits in the backlog until the next `review_backlog`.
///
/// # Errors
///
/// - `CallNotFound` if `call_id` is not in the call table
/// - `Call(NotAssigned)` if the call has no assignee; nothing changes
///
/// # Example
///
/// ```rust
/// use dispatch_center_core_rs::assignment::assign;
/// use dispatch_center_core_rs::escalation::{end_call, EndOutcome};
/// use dispatch_center_core_rs::{Call, Caller, CallPriority, CenterState, EmployeeRegistry, RngManager};
///
/// let mut state = CenterState::new(EmployeeRegistry::new([1, 0, 0, 0]));
/// let call = Call::new(
///     Caller { uid: 0, name: "Alan Turing".to_string() },
///     CallPriority::Low,
///     0,
///     5,
///     0.9,
/// );
/// let call_id = call.id().to_string();
/// state.add_call(call);
/// assign(&mut state, &call_id, 0).unwrap();
///
/// let mut rng = RngManager::new(1);
/// let outcome = end_call(&mut state, &call_id, Some(false), &mut rng, 5).unwrap();
/// assert_eq!(outcome, EndOutcome::Terminated { released_uid: 0 });
/// assert_eq!(state.registry().free_staff(), 1);
/// ```
pub fn end_call(
    state: &mut CenterState,
    call_id: &str,
    escalate: Option<bool>,
    rng: &mut dyn RandomSource,
    now: Timestamp,
) -> Result<EndOutcome, RoutingError> {
    let call = state
        .get_call_mut(call_id)
        .ok_or_else(|| RoutingError::CallNotFound(call_id.to_string()))?;
    let assignment = call.detach()?;
    let released_uid = assignment.employee.uid();

    let escalating = call.priority() == CallPriority::Low && call.should_escalate(escalate, rng);
    if !escalating {
        state.registry_mut().mark_free(assignment.employee);
        return Ok(EndOutcome::Terminated { released_uid });
    }

    call.escalate();
    // Route while the previous employee is still busy so the call moves on
    let placement = assign(state, call_id, now);
    state.registry_mut().mark_free(assignment.employee);
    let placement = placement?;

    Ok(EndOutcome::Escalated {
        released_uid,
        placement,
    })
}
