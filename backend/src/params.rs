//! Model parameters
//!
//! Every constant of the platform model lives here so experiments can vary
//! them without touching the engine. `ModelParameters::default()` reproduces
//! the reference model exactly.
//!
//! Parameters deserialize with per-field defaults, so a JSON override file
//! only needs the fields it changes:
//!
//! ```
//! use platform_sim_core::ModelParameters;
//!
//! let params: ModelParameters =
//!     serde_json::from_str(r#"{ "demand": { "cooldown_days": 3 } }"#).unwrap();
//! assert_eq!(params.demand.cooldown_days, 3);
//! assert_eq!(params.demand.offer_interval, 60);
//! ```

use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};

/// Complete parameter set for one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Composite network-effect weights and history window
    pub network: NetworkWeights,

    /// Supply-side join rate curve
    pub supply_join: JoinRateParams,

    /// Demand-side join rate curve
    pub demand_join: JoinRateParams,

    /// Daily supply spawn cap
    pub supply_spawn: SpawnCap,

    /// Daily demand spawn cap
    pub demand_spawn: SpawnCap,

    /// Supply churn gates
    pub supply_churn: SupplyChurnParams,

    /// Demand purchasing and churn
    pub demand: DemandParams,
}

/// Weights of the instantaneous network-effect value
///
/// `raw = supply_weight * supply + demand_weight * demand + strategy_weight * sum(effects)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkWeights {
    pub supply_weight: f64,
    pub demand_weight: f64,
    pub strategy_weight: f64,

    /// Number of daily values retained for smoothing
    pub window: usize,

    /// Distance (in held values) used by trend queries
    pub trend_lookback: usize,
}

impl Default for NetworkWeights {
    fn default() -> Self {
        Self {
            supply_weight: 0.4,
            demand_weight: 0.6,
            strategy_weight: 0.3,
            window: 60,
            trend_lookback: 30,
        }
    }
}

/// Join-rate curve: `base + (max - base) * min(1, (delta / normalizer) ^ exponent)`
///
/// Overrides must give every field; the supply and demand curves have
/// different defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRateParams {
    pub base: f64,
    pub max: f64,
    pub normalizer: f64,
    pub exponent: f64,
}

impl JoinRateParams {
    /// Reference supply curve
    pub fn supply() -> Self {
        Self {
            base: 0.015,
            max: 0.2,
            normalizer: 800.0,
            exponent: 0.7,
        }
    }

    /// Reference demand curve
    pub fn demand() -> Self {
        Self {
            base: 0.02,
            max: 0.3,
            normalizer: 600.0,
            exponent: 0.7,
        }
    }
}

/// Daily spawn cap: `max(floor, floor(fraction * current_count))` trials
///
/// Overrides must give every field; the supply and demand caps have
/// different defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnCap {
    pub floor: usize,
    pub fraction: f64,
}

impl SpawnCap {
    pub fn supply() -> Self {
        Self {
            floor: 5,
            fraction: 0.03,
        }
    }

    pub fn demand() -> Self {
        Self {
            floor: 10,
            fraction: 0.01,
        }
    }

    /// Number of join trials for a population of `count`
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::params::SpawnCap;
    ///
    /// assert_eq!(SpawnCap::supply().trials(110), 5);
    /// assert_eq!(SpawnCap::supply().trials(1000), 30);
    /// assert_eq!(SpawnCap::demand().trials(7788), 77);
    /// ```
    pub fn trials(&self, count: usize) -> usize {
        let scaled = (count as f64 * self.fraction).floor() as usize;
        self.floor.max(scaled)
    }
}

/// Supply churn: quality gate (ratings) and trend gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyChurnParams {
    /// Mean rating at or below which the quality gate applies
    pub quality_threshold: f64,
    pub quality_base: f64,
    pub quality_slope: f64,
    pub quality_cap: f64,

    /// Divisor applied to the tracker drift
    pub trend_divisor: f64,
    pub trend_min: f64,
    pub trend_max: f64,
}

impl Default for SupplyChurnParams {
    fn default() -> Self {
        Self {
            quality_threshold: 2.5,
            quality_base: 0.1,
            quality_slope: 0.2,
            quality_cap: 0.9,
            trend_divisor: 1000.0,
            trend_min: 0.05,
            trend_max: 0.2,
        }
    }
}

/// Demand purchasing, cooldown, rating and churn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandParams {
    /// Offer day every `offer_interval` days (day 0 included)
    pub offer_interval: usize,

    /// Purchase probability on regular days
    pub purchase_probability: f64,

    /// Multiplier on offer days
    pub offer_multiplier: f64,

    /// Days of cooldown after a regular-day purchase
    pub cooldown_days: u32,

    /// Categorical weights for ratings 1..=5
    pub rating_weights: [f64; 5],

    pub trend_divisor: f64,
    pub trend_min: f64,
    pub trend_max: f64,
}

impl Default for DemandParams {
    fn default() -> Self {
        Self {
            offer_interval: 60,
            purchase_probability: 0.3,
            offer_multiplier: 2.0,
            cooldown_days: 7,
            rating_weights: [0.05, 0.10, 0.30, 0.30, 0.25],
            trend_divisor: 1500.0,
            trend_min: 0.02,
            trend_max: 0.15,
        }
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            network: NetworkWeights::default(),
            supply_join: JoinRateParams::supply(),
            demand_join: JoinRateParams::demand(),
            supply_spawn: SpawnCap::supply(),
            demand_spawn: SpawnCap::demand(),
            supply_churn: SupplyChurnParams::default(),
            demand: DemandParams::default(),
        }
    }
}

impl ModelParameters {
    /// Reject parameter sets that would make the model ill-defined
    pub fn validate(&self) -> Result<(), SimulationError> {
        let net = &self.network;
        require_finite("network.supply_weight", net.supply_weight)?;
        require_finite("network.demand_weight", net.demand_weight)?;
        require_finite("network.strategy_weight", net.strategy_weight)?;
        if net.window == 0 {
            return Err(invalid("network.window must be > 0"));
        }
        if net.trend_lookback == 0 {
            return Err(invalid("network.trend_lookback must be > 0"));
        }

        for (side, join) in [("supply_join", &self.supply_join), ("demand_join", &self.demand_join)] {
            require_probability(&format!("{}.base", side), join.base)?;
            require_probability(&format!("{}.max", side), join.max)?;
            require_positive(&format!("{}.normalizer", side), join.normalizer)?;
            require_positive(&format!("{}.exponent", side), join.exponent)?;
        }

        for (side, cap) in [("supply_spawn", &self.supply_spawn), ("demand_spawn", &self.demand_spawn)] {
            if !cap.fraction.is_finite() || cap.fraction < 0.0 {
                return Err(invalid(&format!("{}.fraction must be finite and >= 0", side)));
            }
        }

        let supply = &self.supply_churn;
        require_finite("supply_churn.quality_threshold", supply.quality_threshold)?;
        require_finite("supply_churn.quality_slope", supply.quality_slope)?;
        require_probability("supply_churn.quality_base", supply.quality_base)?;
        require_probability("supply_churn.quality_cap", supply.quality_cap)?;
        require_positive("supply_churn.trend_divisor", supply.trend_divisor)?;
        require_bounds("supply_churn", supply.trend_min, supply.trend_max)?;

        let demand = &self.demand;
        if demand.offer_interval == 0 {
            return Err(invalid("demand.offer_interval must be > 0"));
        }
        require_probability("demand.purchase_probability", demand.purchase_probability)?;
        require_positive("demand.offer_multiplier", demand.offer_multiplier)?;
        require_positive("demand.trend_divisor", demand.trend_divisor)?;
        require_bounds("demand", demand.trend_min, demand.trend_max)?;
        if demand
            .rating_weights
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(invalid("demand.rating_weights must be finite and >= 0"));
        }
        if demand.rating_weights.iter().sum::<f64>() <= 0.0 {
            return Err(invalid("demand.rating_weights must not all be zero"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> SimulationError {
    SimulationError::InvalidConfig(msg.to_string())
}

fn require_finite(name: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(&format!("{} must be finite, got {}", name, value)))
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{} must be > 0, got {}", name, value)))
    }
}

fn require_probability(name: &str, value: f64) -> Result<(), SimulationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!("{} must be within [0, 1], got {}", name, value)))
    }
}

fn require_bounds(group: &str, min: f64, max: f64) -> Result<(), SimulationError> {
    require_probability(&format!("{}.trend_min", group), min)?;
    require_probability(&format!("{}.trend_max", group), max)?;
    if min > max {
        return Err(invalid(&format!(
            "{}.trend_min ({}) exceeds trend_max ({})",
            group, min, max
        )));
    }
    Ok(())
}
