//! Platform Engine
//!
//! Daily simulation loop for a two-sided platform:
//! - Network-effect recording (rolling tracker)
//! - Actor activation (supply churn gates, demand purchases)
//! - Feedback-driven joins on both sides
//! - Event logging (optional)
//!
//! # Architecture
//!
//! ```text
//! For each day k:
//! 1. Record tracker, emit DayRecord (counters from day k-1)
//! 2. Reset join/churn counters
//! 3. Shuffle the roster, step every actor once
//! 4. Compute join rates
//! 5. Compute spawn caps from post-activation counts
//! 6. Run supply spawn trials, then demand spawn trials
//! 7. Advance the clock
//! ```
//!
//! # Example
//!
//! ```rust
//! use platform_sim_core::{EngineConfig, PlatformEngine, StrategyEffect};
//!
//! let config = EngineConfig::new(110, 7788)
//!     .with_seed(42)
//!     .with_strategies(vec![StrategyEffect::new("Freemium Model", 25.0)]);
//!
//! let mut engine = PlatformEngine::new(config).unwrap();
//! for _ in 0..10 {
//!     let record = engine.day();
//!     println!("Day {}: {:.1}", record.day, record.network_effect);
//! }
//! assert_eq!(engine.records().len(), 10);
//! ```

use crate::core::time::SimulationClock;
use crate::models::actor::{ActorContext, ActorId, ActorKind};
use crate::models::demand::DemandActor;
use crate::models::event::{Event, EventLog};
use crate::models::population::Population;
use crate::models::strategy::StrategyEffect;
use crate::models::supply::SupplyActor;
use crate::network::{tracker_join_rate, NetworkEffectTracker};
use crate::params::ModelParameters;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Supply actors created at construction (ids `0..initial_supply`)
    pub initial_supply: usize,

    /// Demand actors created at construction
    pub initial_demand: usize,

    /// Adopted strategies, summed into the network effect
    #[serde(default)]
    pub strategies: Vec<StrategyEffect>,

    /// RNG seed; `None` draws one from process entropy
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub parameters: ModelParameters,

    /// Keep an `EventLog` of joins, churns and purchases
    #[serde(default)]
    pub record_events: bool,
}

impl EngineConfig {
    pub fn new(initial_supply: usize, initial_demand: usize) -> Self {
        Self {
            initial_supply,
            initial_demand,
            strategies: Vec::new(),
            seed: None,
            parameters: ModelParameters::default(),
            record_events: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<StrategyEffect>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_parameters(mut self, parameters: ModelParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_events(mut self) -> Self {
        self.record_events = true;
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// Platform state at the start of one day
///
/// The join and churn counts are those accumulated during the previous day
/// (all zero for day 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: usize,
    pub supply_count: usize,
    pub demand_count: usize,

    /// Smoothed network effect (mean of the tracker window)
    pub network_effect: f64,

    pub new_supply: usize,
    pub new_demand: usize,
    pub churned_supply: usize,
    pub churned_demand: usize,

    pub supply_join_rate: f64,
    pub demand_join_rate: f64,
}

/// Join and churn counts accumulated during one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounters {
    pub joined_supply: usize,
    pub joined_demand: usize,
    pub churned_supply: usize,
    pub churned_demand: usize,
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Checkpoint (de)serialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Restored state violates an engine invariant
    #[error("State validation error: {0}")]
    StateValidationError(String),
}

// ============================================================================
// Engine
// ============================================================================

/// Two-sided platform simulation engine
///
/// Owns the population, the network-effect tracker, the clock and the single
/// RNG stream, and advances the model one day per `day()` call.
///
/// # Determinism
///
/// All randomness is via one seeded xorshift64* stream consumed in a fixed
/// order: shuffle, actor steps in shuffled order, supply spawn trials, demand
/// spawn trials. Same seed + same config = identical records.
pub struct PlatformEngine {
    /// Configuration with the seed resolved
    pub(crate) config: EngineConfig,

    pub(crate) population: Population,

    pub(crate) tracker: NetworkEffectTracker,

    pub(crate) clock: SimulationClock,

    pub(crate) rng: RngManager,

    /// Next actor id (monotonic, never reused)
    pub(crate) next_id: u64,

    /// Counts of the day in progress (or the last completed day)
    pub(crate) counters: DayCounters,

    pub(crate) records: Vec<DayRecord>,

    pub(crate) event_log: EventLog,
}

impl PlatformEngine {
    /// Create an engine from configuration
    ///
    /// Creates the initial supply actors, then the demand actors, and records
    /// the tracker once so trend queries have a first value before day 0.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidConfig` for a non-finite strategy effect or
    /// out-of-range parameters.
    pub fn new(mut config: EngineConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = RngManager::entropy_seed();
                info!(seed, "no seed given, drew one from entropy");
                seed
            }
        };
        config.seed = Some(seed);

        let mut population = Population::new();
        let mut next_id = 0u64;
        for _ in 0..config.initial_supply {
            population.add_supply(SupplyActor::new(ActorId(next_id)));
            next_id += 1;
        }
        for _ in 0..config.initial_demand {
            population.add_demand(DemandActor::new(ActorId(next_id)));
            next_id += 1;
        }

        let mut tracker = NetworkEffectTracker::new(config.parameters.network.clone());
        tracker.record_day(
            population.supply_count(),
            population.demand_count(),
            &config.strategies,
        );

        info!(
            seed,
            supply = config.initial_supply,
            demand = config.initial_demand,
            strategies = config.strategies.len(),
            "platform engine initialised"
        );

        Ok(Self {
            clock: SimulationClock::new(config.parameters.demand.offer_interval),
            rng: RngManager::new(seed),
            population,
            tracker,
            next_id,
            counters: DayCounters::default(),
            records: Vec::new(),
            event_log: EventLog::new(),
            config,
        })
    }

    pub(crate) fn validate_config(config: &EngineConfig) -> Result<(), SimulationError> {
        for strategy in &config.strategies {
            if !strategy.effect.is_finite() {
                return Err(SimulationError::InvalidConfig(format!(
                    "strategy '{}' has non-finite effect {}",
                    strategy.name, strategy.effect
                )));
            }
        }
        config.parameters.validate()
    }

    // ========================================================================
    // Daily tick
    // ========================================================================

    /// Advance the simulation by one day and return that day's record
    pub fn day(&mut self) -> DayRecord {
        let day = self.clock.current_day();

        // 1. Snapshot before any mutation this day
        let supply_count = self.population.supply_count();
        let demand_count = self.population.demand_count();
        let network_effect =
            self.tracker
                .record_day(supply_count, demand_count, &self.config.strategies);

        let record = DayRecord {
            day,
            supply_count,
            demand_count,
            network_effect,
            new_supply: self.counters.joined_supply,
            new_demand: self.counters.joined_demand,
            churned_supply: self.counters.churned_supply,
            churned_demand: self.counters.churned_demand,
            supply_join_rate: self.supply_join_rate(),
            demand_join_rate: self.demand_join_rate(),
        };
        self.records.push(record.clone());

        // 2. Reset counters
        self.counters = DayCounters::default();

        // 3. Activation
        self.activate_actors(day);

        // 4-6. Joins
        self.spawn_actors(day);

        // 7. Advance
        self.clock.advance_day();

        debug!(
            day,
            supply = self.population.supply_count(),
            demand = self.population.demand_count(),
            network_effect,
            joined_supply = self.counters.joined_supply,
            joined_demand = self.counters.joined_demand,
            churned_supply = self.counters.churned_supply,
            churned_demand = self.counters.churned_demand,
            "day complete"
        );
        if (day + 1) % 30 == 0 {
            info!(
                day,
                supply = self.population.supply_count(),
                demand = self.population.demand_count(),
                network_effect,
                "simulation progress"
            );
        }

        record
    }

    /// Step every registered actor once, in a shuffled order
    fn activate_actors(&mut self, day: usize) {
        let mut roster = self.population.roster();
        self.rng.shuffle(&mut roster);

        for (kind, id) in roster {
            match kind {
                ActorKind::Supply => self.step_supply(day, id),
                ActorKind::Demand => self.step_demand(day, id),
            }
        }
    }

    fn step_supply(&mut self, day: usize, id: ActorId) {
        let Some(actor) = self.population.get_supply(id) else {
            return;
        };

        let mut ctx = ActorContext {
            rng: &mut self.rng,
            tracker: &self.tracker,
            params: &self.config.parameters,
        };
        let Some(reason) = actor.step(&mut ctx) else {
            return;
        };

        self.population.remove_supply(id);
        self.counters.churned_supply += 1;
        self.log_event(Event::SupplyChurned {
            day,
            actor_id: id,
            reason,
        });
    }

    fn step_demand(&mut self, day: usize, id: ActorId) {
        let supply_count = self.population.supply_count();
        let Some(actor) = self.population.get_demand_mut(id) else {
            return;
        };

        let mut ctx = ActorContext {
            rng: &mut self.rng,
            tracker: &self.tracker,
            params: &self.config.parameters,
        };
        let outcome = actor.step(day, supply_count, &mut ctx);

        if let Some(delivery) = outcome.delivery {
            if let Some(supply) = self.population.supply_at_mut(delivery.supply_index) {
                supply.add_rating(delivery.rating);
                let supply_id = supply.id();
                self.log_event(Event::Purchase {
                    day,
                    demand_id: id,
                    supply_id,
                    rating: delivery.rating,
                });
            }
        }

        if outcome.churned {
            self.population.remove_demand(id);
            self.counters.churned_demand += 1;
            self.log_event(Event::DemandChurned { day, actor_id: id });
        }
    }

    /// Bernoulli join trials for both sides
    fn spawn_actors(&mut self, day: usize) {
        let supply_rate = self.supply_join_rate();
        let demand_rate = self.demand_join_rate();

        let params = &self.config.parameters;
        let supply_trials = params.supply_spawn.trials(self.population.supply_count());
        let demand_trials = params.demand_spawn.trials(self.population.demand_count());

        for _ in 0..supply_trials {
            if self.rng.bernoulli(supply_rate) {
                let id = self.issue_id();
                self.population.add_supply(SupplyActor::new(id));
                self.counters.joined_supply += 1;
                self.log_event(Event::SupplyJoined { day, actor_id: id });
            }
        }

        for _ in 0..demand_trials {
            if self.rng.bernoulli(demand_rate) {
                let id = self.issue_id();
                self.population.add_demand(DemandActor::new(id));
                self.counters.joined_demand += 1;
                self.log_event(Event::DemandJoined { day, actor_id: id });
            }
        }
    }

    fn issue_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    fn log_event(&mut self, event: Event) {
        if self.config.record_events {
            self.event_log.log(event);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Days advanced so far
    pub fn day_index(&self) -> usize {
        self.clock.current_day()
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn last_record(&self) -> Option<&DayRecord> {
        self.records.last()
    }

    pub fn tracker(&self) -> &NetworkEffectTracker {
        &self.tracker
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn strategies(&self) -> &[StrategyEffect] {
        &self.config.strategies
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.config.parameters
    }

    /// Configuration with the effective seed filled in
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed the RNG stream started from
    pub fn rng_seed(&self) -> u64 {
        self.config.seed.unwrap_or_default()
    }

    /// Counts accumulated by the most recent day
    pub fn counters(&self) -> DayCounters {
        self.counters
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn supply_join_rate(&self) -> f64 {
        tracker_join_rate(&self.config.parameters.supply_join, &self.tracker)
    }

    pub fn demand_join_rate(&self) -> f64 {
        tracker_join_rate(&self.config.parameters.demand_join, &self.tracker)
    }
}
