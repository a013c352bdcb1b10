//! Orchestrator - the dispatch center and its driver loop
//!
//! See `engine.rs` for full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{
    ActiveReview, CenterConfig, CenterStatus, ConfigurationError, DispatchCenter, DispatchError,
    DispatchReceipt, TickResult, TierStatus,
};
