//! PyO3 wrapper for the platform engine
//!
//! # Example (from Python)
//!
//! ```python
//! from platform_sim_core import PlatformModel
//!
//! model = PlatformModel(110, 7788, [("Freemium Model", 25.0)], seed=42)
//! for _ in range(365):
//!     model.day()
//! print(model.records()[-1]["network_effect"])
//! ```

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{
    day_record_to_py, day_records_to_py, parse_count, parse_strategies, strategies_to_py,
};
use crate::catalog;
use crate::orchestrator::{EngineConfig, PlatformEngine};

#[pyclass(name = "PlatformModel")]
pub struct PyPlatformModel {
    inner: PlatformEngine,
}

#[pymethods]
impl PyPlatformModel {
    /// Create a model with initial population sizes and adopted strategies
    ///
    /// # Errors
    ///
    /// Raises ValueError for negative counts or non-finite strategy effects.
    #[new]
    #[pyo3(signature = (initial_supply, initial_demand, strategies = Vec::new(), seed = None))]
    fn new(
        initial_supply: i64,
        initial_demand: i64,
        strategies: Vec<(String, f64)>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let mut config = EngineConfig::new(
            parse_count("initial_supply", initial_supply)?,
            parse_count("initial_demand", initial_demand)?,
        )
        .with_strategies(parse_strategies(strategies));
        config.seed = seed;

        let inner = PlatformEngine::new(config)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;

        Ok(PyPlatformModel { inner })
    }

    /// Advance one day and return its record
    fn day(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let record = self.inner.day();
        day_record_to_py(py, &record)
    }

    /// Days advanced so far
    fn day_index(&self) -> usize {
        self.inner.day_index()
    }

    /// All records so far
    fn records(&self, py: Python) -> PyResult<Py<PyList>> {
        day_records_to_py(py, self.inner.records())
    }

    /// Tracker history, oldest first
    fn network_effect_history(&self) -> Vec<f64> {
        self.inner.tracker().values()
    }

    fn supply_count(&self) -> usize {
        self.inner.population().supply_count()
    }

    fn demand_count(&self) -> usize {
        self.inner.population().demand_count()
    }

    /// Seed actually used (drawn from entropy when none was given)
    fn seed(&self) -> u64 {
        self.inner.rng_seed()
    }

    fn save_state(&self) -> PyResult<String> {
        self.inner
            .save_state()
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
    }
}

/// Built-in single measures as `(name, effect)` tuples
#[pyfunction]
pub fn catalog_measures() -> Vec<(String, f64)> {
    strategies_to_py(&catalog::single_measures())
}

/// Built-in clusters as `(name, effect)` tuples
#[pyfunction]
pub fn catalog_clusters() -> Vec<(String, f64)> {
    strategies_to_py(&catalog::clusters())
}
