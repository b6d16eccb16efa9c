//! Orchestrator - daily simulation loop
//!
//! See `engine.rs` for the tick implementation and `checkpoint.rs` for
//! save/restore.

pub mod checkpoint;
pub mod engine;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use engine::{DayCounters, DayRecord, EngineConfig, PlatformEngine, SimulationError};

// Re-export checkpoint types
pub use checkpoint::{DemandSnapshot, EngineSnapshot, SupplySnapshot};
