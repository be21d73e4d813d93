//! PyO3 wrapper for MatchingEngine
//!
//! # Example (from Python)
//!
//! ```python
//! from sl_market_core_rs import Market
//!
//! market = Market.new({
//!     "recall_age": 1,
//!     "initial_market_rate": 0.5,
//!     "available_shares": 15,
//!     "loans": [1.0],
//! })
//! snapshot = market.step([3.0, 2.0], [])
//! print(snapshot["market_rate"], market.depth())
//! ```

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{depth_to_py, market_error_to_py, parse_market_config, snapshot_to_py};
use crate::models::ids::LoanId;
use crate::orchestrator::MatchingEngine;

#[pyclass(name = "Market")]
pub struct PyMarket {
    inner: MatchingEngine,
}

#[pymethods]
impl PyMarket {
    /// Create a market from a configuration dict
    ///
    /// Raises ValueError if a field has the wrong type or a rate is not
    /// finite.
    #[staticmethod]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_market_config(config)?;
        let inner = MatchingEngine::new(rust_config).map_err(market_error_to_py)?;
        Ok(PyMarket { inner })
    }

    /// Run one tick and return its snapshot as a dict
    ///
    /// `returns` holds handles from `loan_ids()`.
    fn step(&mut self, py: Python<'_>, demand: Vec<f64>, returns: Vec<u64>) -> PyResult<Py<PyDict>> {
        let returns: Vec<LoanId> = returns.into_iter().map(LoanId::from).collect();
        let snapshot = self
            .inner
            .step(&demand, &returns)
            .map_err(market_error_to_py)?;

        snapshot_to_py(py, &snapshot)
    }

    fn snapshot(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        snapshot_to_py(py, &self.inner.snapshot())
    }

    fn current_tick(&self) -> usize {
        self.inner.current_tick()
    }

    fn market_rate(&self) -> f64 {
        self.inner.market_rate()
    }

    fn available_shares(&self) -> u64 {
        self.inner.available_shares()
    }

    fn loan_count(&self) -> usize {
        self.inner.loan_count()
    }

    fn demand_count(&self) -> usize {
        self.inner.demand_count()
    }

    fn recall_count(&self) -> usize {
        self.inner.recall_count()
    }

    fn mature_recall_count(&self) -> usize {
        self.inner.mature_recall_count()
    }

    fn max_demand_rate(&self) -> f64 {
        self.inner.max_demand_rate()
    }

    fn min_demand_rate(&self) -> f64 {
        self.inner.min_demand_rate()
    }

    fn min_borrower_rate(&self) -> f64 {
        self.inner.min_borrower_rate()
    }

    fn max_borrower_rate(&self) -> f64 {
        self.inner.max_borrower_rate()
    }

    fn global_min_rate(&self) -> f64 {
        self.inner.global_min_rate()
    }

    fn global_max_rate(&self) -> f64 {
        self.inner.global_max_rate()
    }

    /// Empty the event log, returning how many events it held
    fn clear_events(&mut self) -> usize {
        self.inner.drain_events().len()
    }

    /// Handles of every live loan, oldest first
    fn loan_ids(&self) -> Vec<u64> {
        self.inner.loans().map(|(id, _)| id.get()).collect()
    }

    /// Ledger sizes per reservation rate, for bar charts
    fn depth(&self, py: Python<'_>) -> PyResult<Py<PyList>> {
        depth_to_py(py, &self.inner.depth())
    }
}
