//! Checkpoint - Save/Load Simulation State
//!
//! Enables serialization and deserialization of complete engine state
//! for pause/resume functionality.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored engine continues exactly like the engine it was saved from
//! - **Id Integrity**: ids are unique and below the next-id counter
//! - **Window Bound**: tracker history never exceeds its capacity
//! - **Config Matching**: state can only be loaded with matching config
//!
//! The event log is not part of a checkpoint; a restored engine starts with
//! an empty log.

use crate::core::time::SimulationClock;
use crate::models::actor::ActorId;
use crate::models::demand::DemandActor;
use crate::models::event::EventLog;
use crate::models::population::Population;
use crate::models::supply::SupplyActor;
use crate::network::NetworkEffectTracker;
use crate::orchestrator::engine::{DayCounters, DayRecord, EngineConfig, PlatformEngine};
use crate::orchestrator::SimulationError;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::warn;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete engine state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Days advanced so far
    pub day: usize,

    /// Next id to issue
    pub next_id: u64,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    /// Tracker history, oldest first
    pub tracker_history: Vec<f64>,

    /// Counters of the last completed day (feed the next record)
    pub counters: DayCounters,

    pub supply: Vec<SupplySnapshot>,
    pub demand: Vec<DemandSnapshot>,

    pub records: Vec<DayRecord>,

    /// SHA256 hash of the engine config (for validation)
    pub config_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplySnapshot {
    pub id: ActorId,
    pub ratings: Vec<u8>,
}

impl From<&SupplyActor> for SupplySnapshot {
    fn from(actor: &SupplyActor) -> Self {
        SupplySnapshot {
            id: actor.id(),
            ratings: actor.ratings().to_vec(),
        }
    }
}

impl From<SupplySnapshot> for SupplyActor {
    fn from(snapshot: SupplySnapshot) -> Self {
        SupplyActor::with_ratings(snapshot.id, snapshot.ratings)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandSnapshot {
    pub id: ActorId,
    pub cooldown: u32,
}

impl From<&DemandActor> for DemandSnapshot {
    fn from(actor: &DemandActor) -> Self {
        DemandSnapshot {
            id: actor.id(),
            cooldown: actor.cooldown(),
        }
    }
}

impl From<DemandSnapshot> for DemandActor {
    fn from(snapshot: DemandSnapshot) -> Self {
        DemandActor::with_cooldown(snapshot.id, snapshot.cooldown)
    }
}

// ============================================================================
// Save / Load
// ============================================================================

impl PlatformEngine {
    /// Capture the full engine state
    pub fn snapshot(&self) -> Result<EngineSnapshot, SimulationError> {
        Ok(EngineSnapshot {
            day: self.clock.current_day(),
            next_id: self.next_id,
            rng_state: self.rng.get_state(),
            tracker_history: self.tracker.values(),
            counters: self.counters,
            supply: self.population.supply().iter().map(SupplySnapshot::from).collect(),
            demand: self.population.demand().iter().map(DemandSnapshot::from).collect(),
            records: self.records.clone(),
            config_hash: simulation_config_hash(&self.config)?,
        })
    }

    /// Serialize the engine state to JSON
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::{EngineConfig, PlatformEngine};
    ///
    /// let mut engine = PlatformEngine::new(EngineConfig::new(5, 20).with_seed(3)).unwrap();
    /// engine.day();
    /// let json = engine.save_state().unwrap();
    ///
    /// let mut restored = PlatformEngine::load_state(engine.config().clone(), &json).unwrap();
    /// assert_eq!(restored.day_index(), 1);
    /// assert_eq!(restored.day(), engine.day());
    /// ```
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = self.snapshot()?;
        serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Rebuild an engine from `save_state` output
    ///
    /// `config` must equal the saved engine's `config()` (seed included).
    pub fn load_state(config: EngineConfig, json: &str) -> Result<Self, SimulationError> {
        let snapshot: EngineSnapshot = serde_json::from_str(json).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot parse failed: {}", e))
        })?;
        Self::from_snapshot(config, snapshot)
    }

    pub fn from_snapshot(
        config: EngineConfig,
        snapshot: EngineSnapshot,
    ) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let expected_hash = simulation_config_hash(&config)?;
        if snapshot.config_hash != expected_hash {
            warn!(
                expected = %expected_hash,
                found = %snapshot.config_hash,
                "rejected checkpoint: config mismatch"
            );
            return Err(SimulationError::StateValidationError(
                "Config hash mismatch: checkpoint was saved with a different config".to_string(),
            ));
        }

        if let Err(e) = validate_snapshot(&snapshot, config.parameters.network.window) {
            warn!(error = %e, "rejected checkpoint");
            return Err(e);
        }

        let mut population = Population::new();
        for actor in snapshot.supply {
            population.add_supply(actor.into());
        }
        for actor in snapshot.demand {
            population.add_demand(actor.into());
        }

        let tracker = NetworkEffectTracker::from_values(
            config.parameters.network.clone(),
            &snapshot.tracker_history,
        );

        Ok(Self {
            clock: SimulationClock::at_day(config.parameters.demand.offer_interval, snapshot.day),
            rng: RngManager::new(snapshot.rng_state),
            population,
            tracker,
            next_id: snapshot.next_id,
            counters: snapshot.counters,
            records: snapshot.records,
            event_log: EventLog::new(),
            config,
        })
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash of the fields that shape the simulation
///
/// `record_events` only controls logging, so a checkpoint can be resumed
/// with event recording switched on or off.
pub fn simulation_config_hash(config: &EngineConfig) -> Result<String, SimulationError> {
    let mut view = config.clone();
    view.record_events = false;
    compute_config_hash(&view)
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - Tracker history within the window
/// - Ids unique across both sides and below `next_id`
/// - Each side sorted by id
/// - One record per elapsed day
pub fn validate_snapshot(snapshot: &EngineSnapshot, window: usize) -> Result<(), SimulationError> {
    // 1. Window bound
    if snapshot.tracker_history.len() > window {
        return Err(SimulationError::StateValidationError(format!(
            "Tracker history holds {} values, window is {}",
            snapshot.tracker_history.len(),
            window
        )));
    }

    // 2. Id uniqueness and bound
    let mut seen = HashSet::new();
    let ids = snapshot
        .supply
        .iter()
        .map(|a| a.id)
        .chain(snapshot.demand.iter().map(|a| a.id));
    for id in ids {
        if id.0 >= snapshot.next_id {
            return Err(SimulationError::StateValidationError(format!(
                "Actor id {} not below next id {}",
                id, snapshot.next_id
            )));
        }
        if !seen.insert(id) {
            return Err(SimulationError::StateValidationError(format!(
                "Duplicate actor id {}",
                id
            )));
        }
    }

    // 3. Ordering
    let sorted = |ids: Vec<ActorId>| ids.windows(2).all(|w| w[0] < w[1]);
    if !sorted(snapshot.supply.iter().map(|a| a.id).collect())
        || !sorted(snapshot.demand.iter().map(|a| a.id).collect())
    {
        return Err(SimulationError::StateValidationError(
            "Actors are not ordered by id".to_string(),
        ));
    }

    // 4. Records
    if snapshot.records.len() != snapshot.day {
        return Err(SimulationError::StateValidationError(format!(
            "{} records for {} elapsed days",
            snapshot.records.len(),
            snapshot.day
        )));
    }

    Ok(())
}
