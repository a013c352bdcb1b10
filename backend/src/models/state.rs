//! Center State
//!
//! Holds everything the dispatch center mutates while running: the
//! employee registry, the table of live calls, the active-calls list and
//! the backlog queue.
//!
//! # Critical Invariants
//!
//! 1. **Exclusive membership**: between operations, a call id is in at most
//!    one of `active_calls` and `backlog`
//! 2. **Active means assigned**: every id in `active_calls` names an
//!    assigned call, every id in `backlog` an unassigned one
//! 3. **No orphans**: every queued id exists in the call table; terminated
//!    calls are removed from the table
//! 4. **FIFO backlog**: calls leave the backlog in arrival order

use crate::models::call::Call;
use crate::models::registry::EmployeeRegistry;
use std::collections::{HashMap, VecDeque};

/// Complete dispatch state
///
/// # Example
///
/// ```rust
/// use dispatch_center_core_rs::{CenterState, EmployeeRegistry};
///
/// let state = CenterState::new(EmployeeRegistry::new([5, 3, 2, 2]));
/// assert_eq!(state.registry().total_staff(), 12);
/// assert_eq!(state.backlog_len(), 0);
/// assert_eq!(state.active_len(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CenterState {
    registry: EmployeeRegistry,

    /// Live calls (active or backlogged), indexed by call id
    calls: HashMap<String, Call>,

    /// Ids of calls currently assigned to a busy employee
    active_calls: Vec<String>,

    /// Ids of calls waiting for a free eligible employee, oldest first
    backlog: VecDeque<String>,
}

impl CenterState {
    pub fn new(registry: EmployeeRegistry) -> Self {
        Self {
            registry,
            calls: HashMap::new(),
            active_calls: Vec::new(),
            backlog: VecDeque::new(),
        }
    }

    pub fn registry(&self) -> &EmployeeRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut EmployeeRegistry {
        &mut self.registry
    }

    /// Add a call to the call table
    ///
    /// # Panics
    ///
    /// Panics if the call id already exists
    pub fn add_call(&mut self, call: Call) {
        let id = call.id().to_string();
        assert!(
            !self.calls.contains_key(&id),
            "Call ID {} already exists",
            id
        );
        self.calls.insert(id, call);
    }

    pub fn get_call(&self, id: &str) -> Option<&Call> {
        self.calls.get(id)
    }

    /// Get mutable reference to a call by id
    ///
    /// Intended for staging scenarios; assignment state can only change
    /// through the assignment and escalation engines.
    pub fn get_call_mut(&mut self, id: &str) -> Option<&mut Call> {
        self.calls.get_mut(id)
    }

    pub(crate) fn remove_call(&mut self, id: &str) -> Option<Call> {
        self.calls.remove(id)
    }

    pub fn num_calls(&self) -> usize {
        self.calls.len()
    }

    pub fn calls(&self) -> &HashMap<String, Call> {
        &self.calls
    }

    pub fn active_calls(&self) -> &[String] {
        &self.active_calls
    }

    pub fn active_len(&self) -> usize {
        self.active_calls.len()
    }

    pub(crate) fn push_active(&mut self, id: String) {
        self.active_calls.push(id);
    }

    /// Remove the active entries at `indices`, keeping the rest in order
    pub(crate) fn remove_active_at(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for index in sorted {
            if index < self.active_calls.len() {
                self.active_calls.remove(index);
            }
        }
    }

    pub fn backlog(&self) -> &VecDeque<String> {
        &self.backlog
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn is_backlogged(&self, id: &str) -> bool {
        self.backlog.iter().any(|queued| queued == id)
    }

    /// Append a call to the backlog tail
    ///
    /// # Panics
    ///
    /// Panics if the call is not in the call table, is currently assigned,
    /// or is already in the backlog
    pub fn enqueue_backlog(&mut self, id: String) {
        let call = self
            .calls
            .get(&id)
            .unwrap_or_else(|| panic!("Cannot backlog non-existent call {}", id));
        assert!(!call.is_assigned(), "Cannot backlog assigned call {}", id);
        assert!(!self.is_backlogged(&id), "Call {} is already in the backlog", id);
        self.backlog.push_back(id);
    }

    pub(crate) fn pop_backlog(&mut self) -> Option<String> {
        self.backlog.pop_front()
    }

    /// Check the membership invariants, returning a description of the first
    /// violation found
    pub fn validate_invariants(&self) -> Result<(), String> {
        for id in &self.active_calls {
            match self.calls.get(id) {
                Some(call) if call.is_assigned() => {}
                Some(_) => return Err(format!("active call {} is unassigned", id)),
                None => return Err(format!("active call {} missing from table", id)),
            }
            if self.backlog.contains(id) {
                return Err(format!("call {} is both active and backlogged", id));
            }
        }

        for id in &self.backlog {
            match self.calls.get(id) {
                Some(call) if !call.is_assigned() => {}
                Some(_) => return Err(format!("backlogged call {} is assigned", id)),
                None => return Err(format!("backlogged call {} missing from table", id)),
            }
        }

        let busy = self.registry.total_staff() - self.registry.free_staff();
        if busy != self.active_calls.len() {
            return Err(format!(
                "{} busy employees but {} active calls",
                busy,
                self.active_calls.len()
            ));
        }

        Ok(())
    }
}
