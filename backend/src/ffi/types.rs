//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::models::strategy::StrategyEffect;
use crate::orchestrator::DayRecord;

/// Convert a population size from Python, rejecting negative values
pub fn parse_count(name: &str, value: i64) -> PyResult<usize> {
    usize::try_from(value).map_err(|_| {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "{} must be non-negative, got {}",
            name, value
        ))
    })
}

/// Convert `(name, effect)` pairs into strategy effects
pub fn parse_strategies(pairs: Vec<(String, f64)>) -> Vec<StrategyEffect> {
    pairs
        .into_iter()
        .map(|(name, effect)| StrategyEffect::new(name, effect))
        .collect()
}

/// Convert a day record to a Python dict
///
/// Keys match the CSV export columns.
pub fn day_record_to_py(py: Python<'_>, record: &DayRecord) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("day", record.day)?;
    dict.set_item("supply", record.supply_count)?;
    dict.set_item("demand", record.demand_count)?;
    dict.set_item("network_effect", record.network_effect)?;
    dict.set_item("new_supply", record.new_supply)?;
    dict.set_item("new_demand", record.new_demand)?;
    dict.set_item("churned_supply", record.churned_supply)?;
    dict.set_item("churned_demand", record.churned_demand)?;
    dict.set_item("supply_join_rate", record.supply_join_rate)?;
    dict.set_item("demand_join_rate", record.demand_join_rate)?;
    Ok(dict.unbind())
}

/// Convert a list of day records to a Python list of dicts
pub fn day_records_to_py(py: Python<'_>, records: &[DayRecord]) -> PyResult<Py<PyList>> {
    let list = PyList::empty_bound(py);
    for record in records {
        list.append(day_record_to_py(py, record)?)?;
    }
    Ok(list.unbind())
}

/// Convert strategy effects to `(name, effect)` tuples
pub fn strategies_to_py(strategies: &[StrategyEffect]) -> Vec<(String, f64)> {
    strategies
        .iter()
        .map(|s| (s.name.clone(), s.effect))
        .collect()
}
