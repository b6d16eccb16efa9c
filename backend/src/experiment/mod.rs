//! Experiments: replicate runs, rankings and cross-iteration aggregation
//!
//! An experiment compares scenarios (labelled strategy lists). Each scenario
//! is simulated several times with consecutive seeds; the final day of every
//! run is summarised. A full iteration covers every single measure, every
//! cluster and every cluster combination, each group with its own seed base.
//!
//! # Seeding
//!
//! ```text
//! iteration i (1-based):  base = seed + (i - 1) * 10000
//!   single measures        seeds base + 0 .. base + runs
//!   clusters               seeds base + 1000 ..
//!   combinations           base + 2000, advancing by `runs` per combination
//!
//! Seed arithmetic wraps at `u64::MAX`.
//! ```

pub mod stats;

pub use stats::Stats;

use crate::catalog;
use crate::models::strategy::{total_effect, StrategyEffect};
use crate::orchestrator::{DayRecord, EngineConfig, PlatformEngine, SimulationError};
use crate::params::ModelParameters;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Seed distance between iterations
pub const ITERATION_SEED_STRIDE: u64 = 10_000;
/// Seed offset of the cluster group within an iteration
pub const CLUSTER_SEED_OFFSET: u64 = 1_000;
/// Seed offset of the combination group within an iteration
pub const COMBINATION_SEED_OFFSET: u64 = 2_000;

// ============================================================================
// Scenarios
// ============================================================================

/// Shared settings of every run in an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub initial_supply: usize,
    pub initial_demand: usize,
    pub days: usize,
    #[serde(default)]
    pub parameters: ModelParameters,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            initial_supply: 110,
            initial_demand: 7788,
            days: 365,
            parameters: ModelParameters::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCategory {
    SingleMeasure,
    Cluster,
    Combination,
}

impl fmt::Display for ScenarioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScenarioCategory::SingleMeasure => "single_measure",
            ScenarioCategory::Cluster => "cluster",
            ScenarioCategory::Combination => "combination",
        };
        f.write_str(label)
    }
}

/// A labelled list of adopted strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    pub category: ScenarioCategory,
    pub strategies: Vec<StrategyEffect>,
}

impl Scenario {
    pub fn new(
        label: impl Into<String>,
        category: ScenarioCategory,
        strategies: Vec<StrategyEffect>,
    ) -> Self {
        Self {
            label: label.into(),
            category,
            strategies,
        }
    }

    /// Scenario adopting exactly one measure or cluster
    pub fn single(strategy: StrategyEffect, category: ScenarioCategory) -> Self {
        Self::new(strategy.name.clone(), category, vec![strategy])
    }

    /// Scenario adopting several clusters; labelled by their names
    pub fn combination(strategies: Vec<StrategyEffect>) -> Self {
        let label = if strategies.len() == catalog::clusters().len() {
            catalog::ALL_CLUSTERS.to_string()
        } else {
            strategies
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self::new(label, ScenarioCategory::Combination, strategies)
    }

    /// File-name form of the strategy names
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::catalog;
    /// use platform_sim_core::experiment::{Scenario, ScenarioCategory};
    ///
    /// let scenario = Scenario::single(
    ///     catalog::cluster("Community & Retention").unwrap(),
    ///     ScenarioCategory::Cluster,
    /// );
    /// assert_eq!(scenario.slug(), "community_retention");
    /// ```
    pub fn slug(&self) -> String {
        self.strategies
            .iter()
            .map(|s| s.name.replace(" & ", "_").replace(' ', "_").to_lowercase())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Sum of the adopted effects
    pub fn total_effect(&self) -> f64 {
        total_effect(&self.strategies)
    }
}

// ============================================================================
// Single runs and replicates
// ============================================================================

/// Records of one seeded run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub seed: u64,
    pub records: Vec<DayRecord>,
}

impl RunOutcome {
    pub fn final_record(&self) -> Option<&DayRecord> {
        self.records.last()
    }
}

/// Final-day state of one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    pub seed: u64,
    pub supply: usize,
    pub demand: usize,
    pub network_effect: f64,
}

/// Replicate statistics for one scenario (sample standard deviation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateSummary {
    pub label: String,
    pub category: ScenarioCategory,
    /// Sum of the scenario's strategy effects
    pub total_effect: f64,
    pub network_effect: Stats,
    pub supply: Stats,
    pub demand: Stats,
    pub finals: Vec<FinalState>,
}

/// Outcomes and summary of a replicate batch
#[derive(Debug, Clone)]
pub struct ReplicateSet {
    pub scenario: Scenario,
    pub outcomes: Vec<RunOutcome>,
    pub summary: ReplicateSummary,
}

/// Simulate one scenario for `settings.days` days with a fixed seed
pub fn run_scenario(
    settings: &RunSettings,
    scenario: &Scenario,
    seed: u64,
) -> Result<RunOutcome, SimulationError> {
    let config = EngineConfig::new(settings.initial_supply, settings.initial_demand)
        .with_seed(seed)
        .with_strategies(scenario.strategies.clone())
        .with_parameters(settings.parameters.clone());

    let mut engine = PlatformEngine::new(config)?;
    for _ in 0..settings.days {
        engine.day();
    }

    Ok(RunOutcome {
        seed,
        records: engine.records().to_vec(),
    })
}

/// Run `runs` replicates with seeds `seed_start + i` (wrapping at `u64::MAX`)
pub fn run_replicates(
    settings: &RunSettings,
    scenario: &Scenario,
    runs: usize,
    seed_start: u64,
) -> Result<ReplicateSet, SimulationError> {
    if runs == 0 {
        return Err(SimulationError::InvalidConfig(
            "at least one replicate run is required".to_string(),
        ));
    }
    if settings.days == 0 {
        return Err(SimulationError::InvalidConfig(
            "replicate runs need at least one day".to_string(),
        ));
    }

    let mut outcomes = Vec::with_capacity(runs);
    for i in 0..runs {
        let seed = seed_start.wrapping_add(i as u64);
        let outcome = run_scenario(settings, scenario, seed)?;
        outcomes.push(outcome);
    }

    let summary = summarize(scenario, &outcomes)?;
    info!(
        scenario = %scenario.label,
        runs,
        seed_start,
        network_effect = summary.network_effect.mean,
        "replicates complete"
    );

    Ok(ReplicateSet {
        scenario: scenario.clone(),
        outcomes,
        summary,
    })
}

fn summarize(
    scenario: &Scenario,
    outcomes: &[RunOutcome],
) -> Result<ReplicateSummary, SimulationError> {
    let finals: Vec<FinalState> = outcomes
        .iter()
        .filter_map(|o| {
            o.final_record().map(|r| FinalState {
                seed: o.seed,
                supply: r.supply_count,
                demand: r.demand_count,
                network_effect: r.network_effect,
            })
        })
        .collect();

    let column = |f: fn(&FinalState) -> f64| -> Result<Stats, SimulationError> {
        let values: Vec<f64> = finals.iter().map(f).collect();
        Stats::sample(&values).ok_or_else(|| {
            SimulationError::InvalidConfig(format!("no completed runs for '{}'", scenario.label))
        })
    };

    Ok(ReplicateSummary {
        label: scenario.label.clone(),
        category: scenario.category,
        total_effect: scenario.total_effect(),
        network_effect: column(|f| f.network_effect)?,
        supply: column(|f| f.supply as f64)?,
        demand: column(|f| f.demand as f64)?,
        finals,
    })
}

/// Sort summaries by mean final network effect, highest first
pub fn rank(mut summaries: Vec<ReplicateSummary>) -> Vec<ReplicateSummary> {
    summaries.sort_by(|a, b| descending(a.network_effect.mean, b.network_effect.mean));
    summaries
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

// ============================================================================
// Iterations
// ============================================================================

/// One scenario with the first seed of its replicate batch
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPlan {
    pub scenario: Scenario,
    pub seed_start: u64,
}

/// Base seed of a 1-based iteration
pub fn iteration_seed(seed: u64, iteration: usize) -> u64 {
    let offset = (iteration.saturating_sub(1) as u64).wrapping_mul(ITERATION_SEED_STRIDE);
    seed.wrapping_add(offset)
}

/// Every scenario of one iteration, in execution order
pub fn plan_iteration(base: u64, runs: usize) -> Vec<ScenarioPlan> {
    let mut plans = Vec::new();

    for measure in catalog::single_measures() {
        plans.push(ScenarioPlan {
            scenario: Scenario::single(measure, ScenarioCategory::SingleMeasure),
            seed_start: base,
        });
    }

    for cluster in catalog::clusters() {
        plans.push(ScenarioPlan {
            scenario: Scenario::single(cluster, ScenarioCategory::Cluster),
            seed_start: base.wrapping_add(CLUSTER_SEED_OFFSET),
        });
    }

    let mut seed = base.wrapping_add(COMBINATION_SEED_OFFSET);
    for combination in catalog::cluster_combinations() {
        plans.push(ScenarioPlan {
            scenario: Scenario::combination(combination),
            seed_start: seed,
        });
        seed = seed.wrapping_add(runs as u64);
    }

    plans
}

/// Summaries of one full iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    pub iteration: usize,
    pub seed: u64,
    pub summaries: Vec<ReplicateSummary>,
}

impl IterationResult {
    pub fn category(&self, category: ScenarioCategory) -> Vec<ReplicateSummary> {
        self.summaries
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect()
    }

    /// Every scenario of the iteration, ranked
    pub fn ranking(&self) -> Vec<ReplicateSummary> {
        rank(self.summaries.clone())
    }
}

/// Replicate batches of one iteration, run outcomes included
#[derive(Debug, Clone)]
pub struct IterationRun {
    pub iteration: usize,
    pub seed: u64,
    pub sets: Vec<ReplicateSet>,
}

impl IterationRun {
    /// Drop the per-run records, keeping the summaries
    pub fn summarize(&self) -> IterationResult {
        IterationResult {
            iteration: self.iteration,
            seed: self.seed,
            summaries: self.sets.iter().map(|set| set.summary.clone()).collect(),
        }
    }
}

/// Run every planned scenario of iteration `iteration` (1-based)
pub fn run_iteration(
    settings: &RunSettings,
    iteration: usize,
    seed: u64,
    runs: usize,
) -> Result<IterationRun, SimulationError> {
    let base = iteration_seed(seed, iteration);
    info!(iteration, base, runs, "starting iteration");

    let mut sets = Vec::new();
    for plan in plan_iteration(base, runs) {
        sets.push(run_replicates(settings, &plan.scenario, runs, plan.seed_start)?);
    }

    Ok(IterationRun {
        iteration,
        seed: base,
        sets,
    })
}

// ============================================================================
// Aggregation
// ============================================================================

/// Per-scenario statistics of the per-iteration mean network effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub label: String,
    pub category: ScenarioCategory,
    pub total_effect: f64,
    pub iterations: usize,
    /// Sample statistics over the iteration means
    pub network_effect: Stats,
}

/// Per-scenario statistics over every individual run (population standard deviation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub label: String,
    pub category: ScenarioCategory,
    pub runs: usize,
    pub supply: Stats,
    pub demand: Stats,
    pub network_effect: Stats,
}

/// Combine iterations per scenario label, ranked by mean network effect
pub fn aggregate_iterations(iterations: &[IterationResult]) -> Vec<AggregateSummary> {
    let mut grouped: BTreeMap<&str, (&ReplicateSummary, Vec<f64>)> = BTreeMap::new();
    for iteration in iterations {
        for summary in &iteration.summaries {
            grouped
                .entry(summary.label.as_str())
                .or_insert_with(|| (summary, Vec::new()))
                .1
                .push(summary.network_effect.mean);
        }
    }

    let mut aggregates: Vec<AggregateSummary> = grouped
        .into_iter()
        .filter_map(|(label, (first, means))| {
            Some(AggregateSummary {
                label: label.to_string(),
                category: first.category,
                total_effect: first.total_effect,
                iterations: means.len(),
                network_effect: Stats::sample(&means)?,
            })
        })
        .collect();

    aggregates.sort_by(|a, b| descending(a.network_effect.mean, b.network_effect.mean));
    aggregates
}

/// Final supply, demand and network effect over every run of every iteration
pub fn population_statistics(iterations: &[IterationResult]) -> Vec<PopulationSummary> {
    let mut grouped: BTreeMap<&str, (ScenarioCategory, Vec<FinalState>)> = BTreeMap::new();
    for iteration in iterations {
        for summary in &iteration.summaries {
            grouped
                .entry(summary.label.as_str())
                .or_insert_with(|| (summary.category, Vec::new()))
                .1
                .extend(summary.finals.iter().copied());
        }
    }

    let mut result: Vec<PopulationSummary> = grouped
        .into_iter()
        .filter_map(|(label, (category, finals))| {
            let supply: Vec<f64> = finals.iter().map(|f| f.supply as f64).collect();
            let demand: Vec<f64> = finals.iter().map(|f| f.demand as f64).collect();
            let network: Vec<f64> = finals.iter().map(|f| f.network_effect).collect();
            Some(PopulationSummary {
                label: label.to_string(),
                category,
                runs: finals.len(),
                supply: Stats::population(&supply)?,
                demand: Stats::population(&demand)?,
                network_effect: Stats::population(&network)?,
            })
        })
        .collect();

    result.sort_by(|a, b| descending(a.network_effect.mean, b.network_effect.mean));
    result
}
