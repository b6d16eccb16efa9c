//! Platform Simulator Core - Rust Engine
//!
//! Agent-based simulation of a two-sided platform whose growth is driven by a
//! rolling network-effect metric, with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Simulation clock (days, offer-day cycle)
//! - **models**: Domain types (supply/demand actors, population, events)
//! - **network**: Network-effect tracker and join-rate feedback
//! - **orchestrator**: Daily simulation loop and checkpoints
//! - **catalog**: Built-in strategy measures and clusters
//! - **experiment**: Replicate runs, rankings, aggregation
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Actor ids are unique and never reused within one engine
//! 2. All randomness is deterministic (one seeded RNG stream)
//! 3. FFI boundary is minimal and safe

// Module declarations
pub mod catalog;
pub mod core;
pub mod experiment;
pub mod models;
pub mod network;
pub mod orchestrator;
pub mod params;
pub mod rng;

// Re-exports for convenience
pub use core::time::SimulationClock;
pub use models::{
    actor::{ActorId, ActorKind, ChurnReason},
    demand::DemandActor,
    event::{Event, EventLog},
    population::Population,
    strategy::StrategyEffect,
    supply::SupplyActor,
};
pub use network::{join_rate, NetworkEffectTracker};
pub use orchestrator::{DayCounters, DayRecord, EngineConfig, PlatformEngine, SimulationError};
pub use params::ModelParameters;
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn platform_sim_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::model::PyPlatformModel>()?;
    m.add_function(wrap_pyfunction!(ffi::model::catalog_measures, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::model::catalog_clusters, m)?)?;
    Ok(())
}
