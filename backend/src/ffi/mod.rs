//! Python bindings (PyO3)
//!
//! Exposes [`DispatchCenter`](crate::DispatchCenter) to a Python driver as
//! `dispatch_center_core_rs.DispatchCenter`.

pub mod center;
pub mod types;
