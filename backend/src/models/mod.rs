//! Domain models for the dispatch center

pub mod call;
pub mod employee;
pub mod event;
pub mod registry;
pub mod state;

// Re-exports
pub use call::{Assignment, Call, CallError, CallPriority, Caller};
pub use employee::{Employee, Seniority};
pub use event::{Event, EventLog};
pub use registry::{EmployeeHandle, EmployeeRegistry};
pub use state::CenterState;
