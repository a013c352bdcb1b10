//! Employee Registry
//!
//! Fixed pool of employees grouped by seniority tier. Built once when the
//! center is constructed; employees are never added or removed afterwards.
//!
//! # Critical Invariants
//!
//! 1. **Uid order**: uids start at 0 and increase monotonically in tier
//!    order Junior → Senior → Manager → Director
//! 2. **Stable positions**: an employee's position within its tier never
//!    changes, so an [`EmployeeHandle`] stays valid for the registry's life

use crate::models::employee::{Employee, Seniority};
use serde::{Deserialize, Serialize};

/// Non-owning reference to an employee inside the registry
///
/// Calls hold one of these while assigned; the employee itself stays owned
/// by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeHandle {
    seniority: Seniority,
    position: usize,
    uid: u64,
}

impl EmployeeHandle {
    /// Uid of the employee this handle points at
    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn seniority(&self) -> Seniority {
        self.seniority
    }

    /// Position of the employee within its tier (registry order)
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Staff pool indexed by tier
///
/// # Example
/// ```
/// use dispatch_center_core_rs::{EmployeeRegistry, Seniority};
///
/// let registry = EmployeeRegistry::new([2, 1, 1, 0]);
/// assert_eq!(registry.total_staff(), 4);
/// assert_eq!(registry.tier(Seniority::Senior)[0].uid(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRegistry {
    tiers: [Vec<Employee>; 4],
}

impl EmployeeRegistry {
    /// Build the registry from per-tier head counts, indexed like [`Seniority::ALL`]
    pub fn new(counts: [usize; 4]) -> Self {
        let mut next_uid = 0u64;
        let tiers: [Vec<Employee>; 4] = Seniority::ALL.map(|seniority| {
            (0..counts[seniority.index()])
                .map(|_| {
                    let employee = Employee::new(next_uid, seniority);
                    next_uid += 1;
                    employee
                })
                .collect()
        });

        Self { tiers }
    }

    /// Employees of a tier in registry order
    pub fn tier(&self, seniority: Seniority) -> &[Employee] {
        &self.tiers[seniority.index()]
    }

    /// Look up the employee behind a handle
    pub fn get(&self, handle: EmployeeHandle) -> Option<&Employee> {
        self.tiers[handle.seniority.index()].get(handle.position)
    }

    /// First free employee across `order`, scanning tiers in the given order
    /// and employees by position within each tier
    pub fn first_free(&self, order: &[Seniority]) -> Option<EmployeeHandle> {
        order.iter().find_map(|&seniority| {
            self.tier(seniority)
                .iter()
                .enumerate()
                .find(|(_, employee)| employee.is_free())
                .map(|(position, employee)| EmployeeHandle {
                    seniority,
                    position,
                    uid: employee.uid(),
                })
        })
    }

    pub(crate) fn mark_busy(&mut self, handle: EmployeeHandle) {
        if let Some(employee) = self.get_mut(handle) {
            employee.mark_busy();
        }
    }

    pub(crate) fn mark_free(&mut self, handle: EmployeeHandle) {
        if let Some(employee) = self.get_mut(handle) {
            employee.mark_free();
        }
    }

    fn get_mut(&mut self, handle: EmployeeHandle) -> Option<&mut Employee> {
        self.tiers[handle.seniority.index()].get_mut(handle.position)
    }

    /// Iterate all employees in uid order
    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.tiers.iter().flatten()
    }

    pub fn total_staff(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    pub fn staff_in(&self, seniority: Seniority) -> usize {
        self.tier(seniority).len()
    }

    pub fn free_staff(&self) -> usize {
        self.iter().filter(|e| e.is_free()).count()
    }

    pub fn free_staff_in(&self, seniority: Seniority) -> usize {
        self.tier(seniority).iter().filter(|e| e.is_free()).count()
    }
}
