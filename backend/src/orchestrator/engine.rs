//! Dispatch Center Engine
//!
//! Owns the whole dispatch center and exposes the operations an external
//! driver calls on a fixed cadence:
//! - Call registration and immediate assignment (`dispatch_call`)
//! - Expiry sweep with escalation (`review_active_calls`)
//! - Backlog retry (`review_backlog`)
//! - Status queries for a display collaborator
//! - Event logging (complete dispatch history)
//!
//! # Driver Loop
//!
//! `tick()` bundles one step of the standard driver:
//!
//! ```text
//! For each second t:
//! 1. Review active calls (end expired ones, maybe escalate)
//! 2. Review backlog (retry waiting calls, oldest first)
//! 3. Dispatch a generated call if one is due
//! 4. Advance time by one second
//! ```
//!
//! # Example
//!
//! ```rust
//! use dispatch_center_core_rs::{CallPriority, CenterConfig, DispatchCenter};
//!
//! let config = CenterConfig {
//!     juniors: 1,
//!     seniors: 1,
//!     managers: 1,
//!     directors: 1,
//!     ..CenterConfig::default()
//! };
//!
//! let mut center = DispatchCenter::new(config).unwrap();
//! center.dispatch_call("Ada Byron", CallPriority::High).unwrap();
//! center.dispatch_call("Alan Turing", CallPriority::High).unwrap();
//! center.dispatch_call("Grace Hopper", CallPriority::High).unwrap();
//!
//! assert_eq!(center.active_call_count(), 2); // Manager + Director
//! assert_eq!(center.backlog_len(), 1);
//! ```

use crate::arrivals::{ArrivalConfig, ArrivalGenerator};
use crate::assignment::{self, BacklogReview, Placement, RoutingError};
use crate::core::time::{TimeManager, Timestamp};
use crate::escalation::{self, EndOutcome};
use crate::models::call::{Call, CallPriority, Caller};
use crate::models::employee::Seniority;
use crate::models::event::{Event, EventLog};
use crate::models::registry::EmployeeRegistry;
use crate::models::state::CenterState;
use crate::rng::{RandomSource, RngManager};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete dispatch center configuration
///
/// Staff counts are signed so that malformed input is reported as a
/// [`ConfigurationError`] rather than silently wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterConfig {
    pub juniors: i32,
    pub seniors: i32,
    pub managers: i32,
    pub directors: i32,

    /// Upper bound (inclusive) for the randomized per-call duration
    pub max_call_duration_sec: u64,

    /// Probability that a Low call escalates when it ends
    pub call_escalation_prob: f64,

    /// Seed for the default random source
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,

    /// Generated incoming calls for `tick()` (None = driver dispatches manually)
    #[serde(default)]
    pub arrivals: Option<ArrivalConfig>,
}

fn default_rng_seed() -> u64 {
    12345
}

impl Default for CenterConfig {
    /// Staffing of a standard fire station
    fn default() -> Self {
        Self {
            juniors: 5,
            seniors: 3,
            managers: 2,
            directors: 2,
            max_call_duration_sec: 20,
            call_escalation_prob: 0.5,
            rng_seed: default_rng_seed(),
            arrivals: None,
        }
    }
}

impl CenterConfig {
    /// Parse a configuration from JSON
    ///
    /// The result is not validated yet; [`DispatchCenter::new`] does that.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Check every field, failing on the first violation
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.call_escalation_prob) {
            return Err(ConfigurationError::EscalationProbabilityOutOfRange(
                self.call_escalation_prob,
            ));
        }

        for (seniority, count) in Seniority::ALL.iter().zip(self.staff_counts()) {
            if count < 0 {
                return Err(ConfigurationError::NegativeStaffCount {
                    seniority: *seniority,
                    count,
                });
            }
        }

        if self.max_call_duration_sec == 0 {
            return Err(ConfigurationError::ZeroMaxCallDuration);
        }

        if let Some(arrivals) = &self.arrivals {
            arrivals.validate()?;
        }

        Ok(())
    }

    /// Staff counts in [`Seniority::ALL`] order
    pub fn staff_counts(&self) -> [i32; 4] {
        [self.juniors, self.seniors, self.managers, self.directors]
    }
}

/// Invalid center configuration; nothing is built
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Escalation probability must be between 0 and 1, got {0}")]
    EscalationProbabilityOutOfRange(f64),

    #[error("Number of {seniority} employees must not be negative, got {count}")]
    NegativeStaffCount { seniority: Seniority, count: i32 },

    #[error("max_call_duration_sec must be at least 1")]
    ZeroMaxCallDuration,

    #[error("Invalid arrival config: {0}")]
    InvalidArrivals(String),

    #[error("Malformed config: {0}")]
    Parse(String),
}

/// Dispatch error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
}

// ============================================================================
// Results
// ============================================================================

/// Receipt for a dispatched call
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReceipt {
    pub call_id: String,
    pub caller_uid: u64,
    pub placement: Placement,
}

/// Outcome of one sweep over the active calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveReview {
    /// Calls that finished for good, in active-list order
    pub terminated: Vec<String>,

    /// Calls escalated to High priority, in active-list order
    pub escalated: Vec<String>,
}

impl ActiveReview {
    /// Number of calls found expired in this sweep
    pub fn expired(&self) -> usize {
        self.terminated.len() + self.escalated.len()
    }
}

/// Result of a single driver tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Second at which the tick ran
    pub time: Timestamp,

    /// Calls ended this tick
    pub num_expired: usize,

    /// Ended calls that escalated
    pub num_escalated: usize,

    /// Backlogged calls that found an employee
    pub num_backlog_assigned: usize,

    /// Generated call, if one arrived
    pub arrival: Option<DispatchReceipt>,

    /// Active list size after the tick
    pub active_calls: usize,

    /// Backlog size after the tick
    pub backlog: usize,
}

/// Free/total head count for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStatus {
    pub seniority: Seniority,
    pub free: usize,
    pub total: usize,
}

/// Snapshot for a status display
///
/// The `Display` impl renders the console status board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterStatus {
    pub time: Timestamp,
    pub free_staff: usize,
    pub total_staff: usize,
    pub tiers: [TierStatus; 4],
    pub active_calls: usize,
    pub backlog: usize,
}

impl CenterStatus {
    pub fn tier(&self, seniority: Seniority) -> &TierStatus {
        &self.tiers[seniority.index()]
    }
}

impl fmt::Display for CenterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fire Station Call Centre Current Status (t={}s)", self.time)?;
        writeln!(f)?;
        writeln!(f, "#### Employees (available/total):")?;
        writeln!(f, "## Staff Available: {} / {}", self.free_staff, self.total_staff)?;
        for tier in &self.tiers {
            writeln!(f, "## {}s: {} / {}", tier.seniority, tier.free, tier.total)?;
        }
        writeln!(f)?;
        writeln!(f, "#### Call Queues:")?;
        writeln!(f, "## Active Calls: {}", self.active_calls)?;
        write!(f, "## Calls in Backlog: {}", self.backlog)
    }
}

// ============================================================================
// Dispatch Center
// ============================================================================

/// The dispatch center: staff, calls, clock and randomness
///
/// # Determinism
///
/// All randomness goes through the owned [`RandomSource`]. With the default
/// seeded source, same seed + same config + same driver calls = identical
/// event log.
pub struct DispatchCenter {
    config: CenterConfig,

    /// Staff, call table, active list and backlog
    state: CenterState,

    time_manager: TimeManager,

    rng: Box<dyn RandomSource>,

    /// Generator for `tick()` arrivals
    arrival_generator: Option<ArrivalGenerator>,

    event_log: EventLog,

    /// Counter for caller uids (independent of employee uids)
    next_caller_uid: u64,
}

impl DispatchCenter {
    /// Create a center seeded from `config.rng_seed`
    ///
    /// # Errors
    ///
    /// `DispatchError::Configuration` if `config` fails validation
    pub fn new(config: CenterConfig) -> Result<Self, DispatchError> {
        let rng = Box::new(RngManager::new(config.rng_seed));
        Self::with_random_source(config, rng)
    }

    /// Create a center drawing from an injected random source
    ///
    /// # Example
    ///
    /// ```rust
    /// use dispatch_center_core_rs::rng::ScriptedSource;
    /// use dispatch_center_core_rs::{CallPriority, CenterConfig, DispatchCenter};
    ///
    /// // Raw draw 0 → every call lasts exactly 1 second
    /// let rng = Box::new(ScriptedSource::new(vec![0]));
    /// let mut center = DispatchCenter::with_random_source(CenterConfig::default(), rng).unwrap();
    ///
    /// let receipt = center.dispatch_call("Ada Byron", CallPriority::Low).unwrap();
    /// assert_eq!(center.state().get_call(&receipt.call_id).unwrap().duration_sec(), 1);
    /// ```
    pub fn with_random_source(
        config: CenterConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, DispatchError> {
        config.validate()?;

        let counts = config.staff_counts().map(|c| c as usize);
        let state = CenterState::new(EmployeeRegistry::new(counts));
        let time_manager = TimeManager::new();
        let arrival_generator = config
            .arrivals
            .clone()
            .map(|arrivals| ArrivalGenerator::new(arrivals, time_manager.now()));

        info!(
            juniors = config.juniors,
            seniors = config.seniors,
            managers = config.managers,
            directors = config.directors,
            escalation_prob = config.call_escalation_prob,
            "dispatch center opened"
        );

        Ok(Self {
            config,
            state,
            time_manager,
            rng,
            arrival_generator,
            event_log: EventLog::new(),
            next_caller_uid: 0,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current simulated second
    pub fn now(&self) -> Timestamp {
        self.time_manager.now()
    }

    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    pub fn state(&self) -> &CenterState {
        &self.state
    }

    /// Get mutable reference to the center state
    ///
    /// This is primarily for staging test scenarios. Direct mutation bypasses
    /// the event log.
    pub fn state_mut(&mut self) -> &mut CenterState {
        &mut self.state
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn free_staff(&self) -> usize {
        self.state.registry().free_staff()
    }

    pub fn free_staff_in(&self, seniority: Seniority) -> usize {
        self.state.registry().free_staff_in(seniority)
    }

    pub fn total_staff(&self) -> usize {
        self.state.registry().total_staff()
    }

    pub fn active_call_count(&self) -> usize {
        self.state.active_len()
    }

    pub fn backlog_len(&self) -> usize {
        self.state.backlog_len()
    }

    /// Snapshot for the status display
    pub fn status(&self) -> CenterStatus {
        let registry = self.state.registry();
        CenterStatus {
            time: self.now(),
            free_staff: registry.free_staff(),
            total_staff: registry.total_staff(),
            tiers: Seniority::ALL.map(|seniority| TierStatus {
                seniority,
                free: registry.free_staff_in(seniority),
                total: registry.staff_in(seniority),
            }),
            active_calls: self.state.active_len(),
            backlog: self.state.backlog_len(),
        }
    }

    /// Advance the clock without doing any work
    pub fn advance_time(&mut self, seconds: u64) {
        self.time_manager.advance_by(seconds);
    }

    // ========================================================================
    // Call Operations
    // ========================================================================

    /// Register a new unassigned call and return its id
    ///
    /// The caller gets the next caller uid; the duration is drawn uniformly
    /// from `[1, max_call_duration_sec]`.
    pub fn register_call(&mut self, caller_name: &str, priority: CallPriority) -> String {
        let caller = Caller {
            uid: self.next_caller_uid,
            name: caller_name.to_string(),
        };
        self.next_caller_uid += 1;

        let duration_sec = self
            .rng
            .range_inclusive(1, self.config.max_call_duration_sec);
        let call = Call::with_id(
            self.next_call_id(caller.uid),
            caller,
            priority,
            self.now(),
            duration_sec,
            self.config.call_escalation_prob,
        );
        let call_id = call.id().to_string();

        self.event_log.log(Event::CallReceived {
            time: self.now(),
            call_id: call_id.clone(),
            caller_uid: call.caller().uid,
            priority,
            duration_sec,
        });
        self.state.add_call(call);

        call_id
    }

    /// Route a registered, unassigned call
    pub fn assign_call(&mut self, call_id: &str) -> Result<Placement, DispatchError> {
        let now = self.now();
        let placement = assignment::assign(&mut self.state, call_id, now)?;
        self.log_placement(call_id, placement);
        Ok(placement)
    }

    /// Register a call and route it immediately
    pub fn dispatch_call(
        &mut self,
        caller_name: &str,
        priority: CallPriority,
    ) -> Result<DispatchReceipt, DispatchError> {
        let caller_uid = self.next_caller_uid;
        let call_id = self.register_call(caller_name, priority);
        let placement = self.assign_call(&call_id)?;

        Ok(DispatchReceipt {
            call_id,
            caller_uid,
            placement,
        })
    }

    /// End one assigned call now, whether or not it has expired
    ///
    /// Keeps the active list consistent: the call's old entry is removed, an
    /// escalated call may re-enter at the tail, and a terminated call is
    /// discarded.
    pub fn end_call(
        &mut self,
        call_id: &str,
        escalate: Option<bool>,
    ) -> Result<EndOutcome, DispatchError> {
        let now = self.now();
        let index = self.state.active_calls().iter().position(|id| id == call_id);
        let outcome =
            escalation::end_call(&mut self.state, call_id, escalate, self.rng.as_mut(), now)?;

        if let Some(index) = index {
            self.state.remove_active_at(&[index]);
        }
        self.finish_end(call_id, outcome);
        Ok(outcome)
    }

    /// End every expired active call
    ///
    /// `escalate` forces the escalation decision for every Low call ended in
    /// this sweep; `None` draws each one at random. The surviving calls keep
    /// their relative order.
    pub fn review_active_calls(
        &mut self,
        escalate: Option<bool>,
    ) -> Result<ActiveReview, DispatchError> {
        let now = self.now();
        let expired: Vec<(usize, String)> = self
            .state
            .active_calls()
            .iter()
            .enumerate()
            .filter(|(_, id)| {
                self.state
                    .get_call(id)
                    .is_some_and(|call| call.is_expired(now))
            })
            .map(|(index, id)| (index, id.clone()))
            .collect();

        let mut review = ActiveReview::default();
        let mut indices = Vec::with_capacity(expired.len());
        let mut outcomes = Vec::with_capacity(expired.len());

        for (index, call_id) in expired {
            let outcome = escalation::end_call(
                &mut self.state,
                &call_id,
                escalate,
                self.rng.as_mut(),
                now,
            )?;
            indices.push(index);
            outcomes.push((call_id, outcome));
        }

        // Remove back to front so remaining calls keep their order
        self.state.remove_active_at(&indices);

        for (call_id, outcome) in outcomes {
            self.finish_end(&call_id, outcome);
            match outcome {
                EndOutcome::Terminated { .. } => review.terminated.push(call_id),
                EndOutcome::Escalated { .. } => review.escalated.push(call_id),
            }
        }

        if review.expired() > 0 {
            debug!(
                time = now,
                terminated = review.terminated.len(),
                escalated = review.escalated.len(),
                "reviewed active calls"
            );
        }

        Ok(review)
    }

    /// Retry every backlogged call once, oldest first
    pub fn review_backlog(&mut self) -> Result<BacklogReview, DispatchError> {
        let now = self.now();
        let review = assignment::process_backlog(&mut self.state, now)?;

        for call_id in &review.assigned {
            if let Some(assignment) = self.state.get_call(call_id).and_then(Call::assignment) {
                let placement = Placement::Assigned {
                    employee_uid: assignment.employee.uid(),
                    seniority: assignment.employee.seniority(),
                };
                self.log_placement(call_id, placement);
            }
        }

        Ok(review)
    }

    // ========================================================================
    // Driver Tick
    // ========================================================================

    /// Execute one driver step and advance the clock by one second
    ///
    /// Ended Low calls escalate at random. A call is dispatched only when an
    /// arrival generator is configured and a call is due.
    pub fn tick(&mut self) -> Result<TickResult, DispatchError> {
        let now = self.now();

        let active = self.review_active_calls(None)?;
        let backlog = self.review_backlog()?;

        let incoming = match &mut self.arrival_generator {
            Some(generator) => generator.poll(now, self.rng.as_mut()),
            None => None,
        };
        let arrival = match incoming {
            Some(call) => Some(self.dispatch_call(&call.caller_name, call.priority)?),
            None => None,
        };

        let result = TickResult {
            time: now,
            num_expired: active.expired(),
            num_escalated: active.escalated.len(),
            num_backlog_assigned: backlog.assigned.len(),
            arrival,
            active_calls: self.state.active_len(),
            backlog: self.state.backlog_len(),
        };

        self.time_manager.advance_tick();
        Ok(result)
    }

    /// UUID built from one draw of the center's source and the caller uid
    ///
    /// The caller uid half keeps ids unique even when the source repeats.
    fn next_call_id(&mut self, caller_uid: u64) -> String {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.rng.next_u64().to_be_bytes());
        bytes[8..].copy_from_slice(&caller_uid.to_be_bytes());
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string()
    }

    // ========================================================================
    // Event Logging
    // ========================================================================

    fn log_placement(&mut self, call_id: &str, placement: Placement) {
        let time = self.now();
        match placement {
            Placement::Assigned {
                employee_uid,
                seniority,
            } => {
                debug!(time, call_id, employee_uid, %seniority, "call assigned");
                self.event_log.log(Event::CallAssigned {
                    time,
                    call_id: call_id.to_string(),
                    employee_uid,
                    seniority,
                });
            }
            Placement::Backlogged { backlog_len } => {
                debug!(time, call_id, backlog_len, "call backlogged");
                self.event_log.log(Event::CallBacklogged {
                    time,
                    call_id: call_id.to_string(),
                    backlog_len,
                });
            }
        }
    }

    /// Log an ended call and discard it if it terminated
    fn finish_end(&mut self, call_id: &str, outcome: EndOutcome) {
        let time = self.now();
        self.event_log.log(Event::CallEnded {
            time,
            call_id: call_id.to_string(),
            employee_uid: outcome.released_uid(),
        });

        match outcome {
            EndOutcome::Terminated { .. } => {
                self.event_log.log(Event::CallTerminated {
                    time,
                    call_id: call_id.to_string(),
                });
                self.state.remove_call(call_id);
            }
            EndOutcome::Escalated { placement, .. } => {
                debug!(time, call_id, "call escalated");
                self.event_log.log(Event::CallEscalated {
                    time,
                    call_id: call_id.to_string(),
                });
                self.log_placement(call_id, placement);
            }
        }
    }
}

impl fmt::Debug for DispatchCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchCenter")
            .field("time", &self.now())
            .field("total_staff", &self.total_staff())
            .field("free_staff", &self.free_staff())
            .field("active_calls", &self.active_call_count())
            .field("backlog", &self.backlog_len())
            .field("events", &self.event_log.len())
            .finish()
    }
}
