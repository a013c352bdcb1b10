//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, str).

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::arrivals::ArrivalConfig;
use crate::assignment::{BacklogReview, Placement};
use crate::models::call::CallPriority;
use crate::orchestrator::{ActiveReview, CenterConfig, CenterStatus, DispatchReceipt, TickResult};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to CenterConfig
///
/// Every field is optional and falls back to [`CenterConfig::default`].
/// Range checks happen when the center is built.
pub fn parse_center_config(py_config: &Bound<'_, PyDict>) -> PyResult<CenterConfig> {
    let defaults = CenterConfig::default();

    let arrivals = match py_config.get_item("arrivals")? {
        Some(value) if !value.is_none() => {
            let arrivals_dict: Bound<'_, PyDict> = value.downcast_into()?;
            Some(parse_arrival_config(&arrivals_dict)?)
        }
        _ => None,
    };

    Ok(CenterConfig {
        juniors: extract_with_default(py_config, "juniors", defaults.juniors)?,
        seniors: extract_with_default(py_config, "seniors", defaults.seniors)?,
        managers: extract_with_default(py_config, "managers", defaults.managers)?,
        directors: extract_with_default(py_config, "directors", defaults.directors)?,
        max_call_duration_sec: extract_with_default(
            py_config,
            "max_call_duration_sec",
            defaults.max_call_duration_sec,
        )?,
        call_escalation_prob: extract_with_default(
            py_config,
            "call_escalation_prob",
            defaults.call_escalation_prob,
        )?,
        rng_seed: extract_with_default(py_config, "rng_seed", defaults.rng_seed)?,
        arrivals,
    })
}

fn parse_arrival_config(py_arrivals: &Bound<'_, PyDict>) -> PyResult<ArrivalConfig> {
    let defaults = ArrivalConfig::default();
    Ok(ArrivalConfig {
        max_call_interval_sec: extract_with_default(
            py_arrivals,
            "max_call_interval_sec",
            defaults.max_call_interval_sec,
        )?,
        high_priority_prob: extract_with_default(
            py_arrivals,
            "high_priority_prob",
            defaults.high_priority_prob,
        )?,
    })
}

/// Parse "low"/"high" (case-insensitive)
pub fn parse_priority(priority: &str) -> PyResult<CallPriority> {
    match priority.to_ascii_lowercase().as_str() {
        "low" => Ok(CallPriority::Low),
        "high" => Ok(CallPriority::High),
        other => Err(PyValueError::new_err(format!(
            "Unknown priority '{}', expected 'low' or 'high'",
            other
        ))),
    }
}

// ========================================================================
// Result Converters
// ========================================================================

fn set_placement(dict: &Bound<'_, PyDict>, placement: &Placement) -> PyResult<()> {
    match placement {
        Placement::Assigned {
            employee_uid,
            seniority,
        } => {
            dict.set_item("placement", "assigned")?;
            dict.set_item("employee_uid", *employee_uid)?;
            dict.set_item("seniority", seniority.as_str())?;
        }
        Placement::Backlogged { backlog_len } => {
            dict.set_item("placement", "backlogged")?;
            dict.set_item("backlog_len", *backlog_len)?;
        }
    }
    Ok(())
}

pub fn receipt_to_py(py: Python, receipt: &DispatchReceipt) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("call_id", &receipt.call_id)?;
    dict.set_item("caller_uid", receipt.caller_uid)?;
    set_placement(&dict, &receipt.placement)?;
    Ok(dict.unbind())
}

pub fn active_review_to_py(py: Python, review: &ActiveReview) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("terminated", review.terminated.clone())?;
    dict.set_item("escalated", review.escalated.clone())?;
    Ok(dict.unbind())
}

pub fn backlog_review_to_py(py: Python, review: &BacklogReview) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("assigned", review.assigned.clone())?;
    dict.set_item("requeued", review.requeued)?;
    Ok(dict.unbind())
}

/// Convert TickResult to Python dict
pub fn tick_result_to_py(py: Python, result: &TickResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);

    dict.set_item("time", result.time)?;
    dict.set_item("num_expired", result.num_expired)?;
    dict.set_item("num_escalated", result.num_escalated)?;
    dict.set_item("num_backlog_assigned", result.num_backlog_assigned)?;
    dict.set_item("active_calls", result.active_calls)?;
    dict.set_item("backlog", result.backlog)?;

    match &result.arrival {
        Some(receipt) => dict.set_item("arrival", receipt_to_py(py, receipt)?)?,
        None => dict.set_item("arrival", py.None())?,
    }

    Ok(dict.unbind())
}

pub fn status_to_py(py: Python, status: &CenterStatus) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("time", status.time)?;
    dict.set_item("free_staff", status.free_staff)?;
    dict.set_item("total_staff", status.total_staff)?;
    dict.set_item("active_calls", status.active_calls)?;
    dict.set_item("backlog", status.backlog)?;

    let tiers = PyDict::new_bound(py);
    for tier in &status.tiers {
        let tier_dict = PyDict::new_bound(py);
        tier_dict.set_item("free", tier.free)?;
        tier_dict.set_item("total", tier.total)?;
        tiers.set_item(tier.seniority.as_str(), tier_dict)?;
    }
    dict.set_item("tiers", tiers)?;

    Ok(dict.unbind())
}
