//! Dispatch Center Core - Rust Engine
//!
//! Call-center dispatch engine for a fire station with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Simulated clock
//! - **models**: Domain types (Employee, Call, CenterState, events)
//! - **assignment**: Seniority-tier routing and the FIFO backlog
//! - **escalation**: Ending calls, Low → High escalation
//! - **arrivals**: Generated incoming calls for the driver loop
//! - **orchestrator**: `DispatchCenter`, the operations a driver calls
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. A call is either unassigned or assigned to exactly one employee
//! 2. A call sits in at most one of the active list and the backlog
//! 3. Low calls never reach Directors, High calls never reach Juniors or Seniors
//! 4. All randomness is deterministic (seeded or scripted source)

// Module declarations
pub mod arrivals;
pub mod assignment;
pub mod core;
pub mod escalation;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use arrivals::{ArrivalConfig, ArrivalGenerator, IncomingCall};
pub use assignment::{BacklogReview, Placement, RoutingError};
pub use crate::core::time::{TimeManager, Timestamp};
pub use escalation::EndOutcome;
pub use models::{
    call::{Assignment, Call, CallError, CallPriority, Caller},
    employee::{Employee, Seniority},
    event::{Event, EventLog},
    registry::{EmployeeHandle, EmployeeRegistry},
    state::CenterState,
};
pub use orchestrator::{
    ActiveReview, CenterConfig, CenterStatus, ConfigurationError, DispatchCenter, DispatchError,
    DispatchReceipt, TickResult, TierStatus,
};
pub use rng::{RandomSource, RngManager, ScriptedSource};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn dispatch_center_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::center::PyDispatchCenter>()?;
    Ok(())
}
