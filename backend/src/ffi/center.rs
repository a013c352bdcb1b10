//! PyO3 wrapper for DispatchCenter
//!
//! This module provides the Python interface to the Rust dispatch center.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{
    active_review_to_py, backlog_review_to_py, parse_center_config, parse_priority,
    receipt_to_py, status_to_py, tick_result_to_py,
};
use crate::orchestrator::{DispatchCenter, DispatchError};

fn to_py_err(err: DispatchError) -> PyErr {
    match err {
        DispatchError::Configuration(e) => PyValueError::new_err(e.to_string()),
        DispatchError::Routing(e) => PyRuntimeError::new_err(e.to_string()),
    }
}

/// Python wrapper for Rust DispatchCenter
///
/// # Example (from Python)
///
/// ```python
/// from dispatch_center_core_rs import DispatchCenter
///
/// center = DispatchCenter.new({
///     "juniors": 5,
///     "seniors": 3,
///     "managers": 2,
///     "directors": 2,
///     "max_call_duration_sec": 20,
///     "call_escalation_prob": 0.5,
/// })
///
/// receipt = center.dispatch_call("Ada Byron", "high")
/// center.advance_time(20)
/// center.review_active_calls()
/// center.review_backlog()
/// ```
#[pyclass(name = "DispatchCenter", unsendable)]
pub struct PyDispatchCenter {
    inner: DispatchCenter,
}

#[pymethods]
impl PyDispatchCenter {
    /// Create a new dispatch center from configuration
    ///
    /// Raises ValueError on an invalid configuration.
    #[staticmethod]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_center_config(config)?;
        let inner = DispatchCenter::new(rust_config).map_err(to_py_err)?;
        Ok(PyDispatchCenter { inner })
    }

    /// Register a call and route it immediately
    ///
    /// `priority` is "low" or "high".
    fn dispatch_call(
        &mut self,
        py: Python,
        caller_name: &str,
        priority: &str,
    ) -> PyResult<Py<PyDict>> {
        let priority = parse_priority(priority)?;
        let receipt = self
            .inner
            .dispatch_call(caller_name, priority)
            .map_err(to_py_err)?;
        receipt_to_py(py, &receipt)
    }

    /// End every expired active call
    ///
    /// `escalate=None` draws escalation at random for each Low call.
    #[pyo3(signature = (escalate=None))]
    fn review_active_calls(
        &mut self,
        py: Python,
        escalate: Option<bool>,
    ) -> PyResult<Py<PyDict>> {
        let review = self
            .inner
            .review_active_calls(escalate)
            .map_err(to_py_err)?;
        active_review_to_py(py, &review)
    }

    /// Retry every backlogged call once, oldest first
    fn review_backlog(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let review = self.inner.review_backlog().map_err(to_py_err)?;
        backlog_review_to_py(py, &review)
    }

    fn advance_time(&mut self, seconds: u64) {
        self.inner.advance_time(seconds);
    }

    /// Execute one driver step and advance the clock by one second
    fn tick(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let result = self.inner.tick().map_err(to_py_err)?;
        tick_result_to_py(py, &result)
    }

    fn now(&self) -> u64 {
        self.inner.now()
    }

    fn free_staff(&self) -> usize {
        self.inner.free_staff()
    }

    fn active_call_count(&self) -> usize {
        self.inner.active_call_count()
    }

    fn backlog_len(&self) -> usize {
        self.inner.backlog_len()
    }

    fn status(&self, py: Python) -> PyResult<Py<PyDict>> {
        status_to_py(py, &self.inner.status())
    }

    /// Rendered status board
    fn status_board(&self) -> String {
        self.inner.status().to_string()
    }
}
