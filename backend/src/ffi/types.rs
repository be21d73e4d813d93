//! Type conversion utilities for FFI boundary

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::error::MarketError;
use crate::models::state::RateLevel;
use crate::orchestrator::{MarketConfig, MarketSnapshot};

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

/// Convert Python dict to MarketConfig
///
/// Missing keys fall back to `MarketConfig::default()`.
pub fn parse_market_config(py_config: &Bound<'_, PyDict>) -> PyResult<MarketConfig> {
    let defaults = MarketConfig::default();

    Ok(MarketConfig {
        recall_age: extract_with_default(py_config, "recall_age", defaults.recall_age)?,
        initial_market_rate: extract_with_default(
            py_config,
            "initial_market_rate",
            defaults.initial_market_rate,
        )?,
        rng_seed: extract_with_default(py_config, "rng_seed", defaults.rng_seed)?,
        available_shares: extract_with_default(
            py_config,
            "available_shares",
            defaults.available_shares,
        )?,
        loans: extract_with_default(py_config, "loans", defaults.loans)?,
        demand: extract_with_default(py_config, "demand", defaults.demand)?,
        recalls: extract_with_default(py_config, "recalls", defaults.recalls)?,
    })
}

/// Map engine errors onto Python exceptions
///
/// Bad caller input raises ValueError; anything else is a RuntimeError.
pub fn market_error_to_py(err: MarketError) -> PyErr {
    match err {
        MarketError::UnknownLoan(_)
        | MarketError::DuplicateReturn(_)
        | MarketError::InvalidRate(_)
        | MarketError::InvalidConfig(_) => {
            pyo3::exceptions::PyValueError::new_err(err.to_string())
        }
        _ => pyo3::exceptions::PyRuntimeError::new_err(err.to_string()),
    }
}

/// Convert MarketSnapshot to Python dict
pub fn snapshot_to_py(py: Python<'_>, snapshot: &MarketSnapshot) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("tick", snapshot.tick)?;
    dict.set_item("market_rate", snapshot.market_rate)?;
    dict.set_item("min_borrower_rate", snapshot.min_borrower_rate)?;
    dict.set_item("available_shares", snapshot.available_shares)?;
    dict.set_item("loan_count", snapshot.loan_count)?;
    dict.set_item("demand_count", snapshot.demand_count)?;
    dict.set_item("max_demand_rate", snapshot.max_demand_rate)?;
    dict.set_item("recall_count", snapshot.recall_count)?;
    dict.set_item("mature_recall_count", snapshot.mature_recall_count)?;

    let activity = PyDict::new(py);
    activity.set_item("arrived", snapshot.activity.arrived)?;
    activity.set_item("returned", snapshot.activity.returned)?;
    activity.set_item("lent", snapshot.activity.lent)?;
    activity.set_item("bought_in", snapshot.activity.bought_in)?;
    activity.set_item("cancelled", snapshot.activity.cancelled)?;
    activity.set_item("recalled", snapshot.activity.recalled)?;
    dict.set_item("activity", activity)?;

    Ok(dict.unbind())
}

/// Convert a depth profile to a Python list of dicts, ascending by rate
pub fn depth_to_py(py: Python<'_>, levels: &[RateLevel]) -> PyResult<Py<PyList>> {
    let list = PyList::empty(py);

    for level in levels {
        let dict = PyDict::new(py);
        dict.set_item("rate", level.rate)?;
        dict.set_item("demand", level.demand)?;
        dict.set_item("loans", level.loans)?;
        dict.set_item("recalls", level.recalls)?;
        list.append(dict)?;
    }

    Ok(list.unbind())
}
