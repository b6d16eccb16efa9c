//! platform-sim CLI - run platform simulations and strategy experiments

mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use platform_sim_core::catalog;
use platform_sim_core::experiment::{
    aggregate_iterations, population_statistics, rank, run_iteration, IterationResult,
    RunSettings, ScenarioCategory,
};
use platform_sim_core::{EngineConfig, ModelParameters, PlatformEngine, StrategyEffect};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "platform-sim")]
#[command(about = "Agent-based simulation of a two-sided platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one platform and write its daily time series as CSV
    Run {
        /// Initial number of supply actors
        #[arg(long, default_value_t = 110)]
        supply: i64,

        /// Initial number of demand actors
        #[arg(long, default_value_t = 7788)]
        demand: i64,

        /// Days to simulate
        #[arg(short, long, default_value_t = 365)]
        days: usize,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Adopted measure or cluster, by catalog name (repeatable)
        #[arg(short, long = "strategy", value_name = "NAME")]
        strategies: Vec<String>,

        /// JSON file with model parameter overrides
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,

        /// Output CSV path
        #[arg(short, long, default_value = "simulation.csv")]
        output: PathBuf,

        /// Write the event log as JSON to this path
        #[arg(long, value_name = "FILE")]
        events: Option<PathBuf>,

        /// Save a checkpoint after the last day
        #[arg(long, value_name = "FILE")]
        checkpoint: Option<PathBuf>,

        /// Continue from a checkpoint written with the same settings
        #[arg(long, value_name = "FILE", requires = "seed")]
        resume: Option<PathBuf>,
    },
    /// Run every measure, cluster and cluster combination over several iterations
    Experiment {
        /// Number of iterations
        #[arg(short, long, default_value_t = 4)]
        iterations: usize,

        /// Replicate runs per scenario
        #[arg(short, long, default_value_t = 3)]
        runs: usize,

        /// Days per run
        #[arg(short, long, default_value_t = 365)]
        days: usize,

        /// Base seed of the first iteration
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Initial number of supply actors
        #[arg(long, default_value_t = 110)]
        supply: i64,

        /// Initial number of demand actors
        #[arg(long, default_value_t = 7788)]
        demand: i64,

        /// JSON file with model parameter overrides
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
    /// List the built-in measures and clusters
    Catalog {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            supply,
            demand,
            days,
            seed,
            strategies,
            params,
            output,
            events,
            checkpoint,
            resume,
        } => {
            let mut config = EngineConfig::new(count("supply", supply)?, count("demand", demand)?)
                .with_strategies(resolve_strategies(&strategies)?)
                .with_parameters(load_parameters(params.as_deref())?);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if events.is_some() {
                config = config.with_events();
            }
            run_simulation(
                config,
                days,
                &output,
                events.as_deref(),
                checkpoint.as_deref(),
                resume.as_deref(),
            )?;
        }
        Commands::Experiment {
            iterations,
            runs,
            days,
            seed,
            supply,
            demand,
            params,
            output,
        } => {
            let settings = RunSettings {
                initial_supply: count("supply", supply)?,
                initial_demand: count("demand", demand)?,
                days,
                parameters: load_parameters(params.as_deref())?,
            };
            run_experiment(&settings, iterations, runs, seed, &output)?;
        }
        Commands::Catalog { json } => print_catalog(json)?,
    }

    Ok(())
}

// ============================================================================
// Argument handling
// ============================================================================

fn count(name: &str, value: i64) -> Result<usize> {
    if value < 0 {
        bail!("initial {} count must not be negative, got {}", name, value);
    }
    Ok(value as usize)
}

fn resolve_strategies(names: &[String]) -> Result<Vec<StrategyEffect>> {
    names
        .iter()
        .map(|name| {
            catalog::find(name)
                .with_context(|| format!("unknown strategy '{}' (see `platform-sim catalog`)", name))
        })
        .collect()
}

fn load_parameters(path: Option<&Path>) -> Result<ModelParameters> {
    let Some(path) = path else {
        return Ok(ModelParameters::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parameters from {}", path.display()))?;
    let params: ModelParameters = serde_json::from_str(&text)
        .with_context(|| format!("invalid parameter file {}", path.display()))?;
    Ok(params)
}

// ============================================================================
// Commands
// ============================================================================

fn run_simulation(
    config: EngineConfig,
    days: usize,
    output: &Path,
    events: Option<&Path>,
    checkpoint: Option<&Path>,
    resume: Option<&Path>,
) -> Result<()> {
    let mut engine = match resume {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read checkpoint {}", path.display()))?;
            let engine = PlatformEngine::load_state(config, &json)
                .with_context(|| format!("cannot resume from {}", path.display()))?;
            info!("Resumed at day {} from {}", engine.day_index(), path.display());
            engine
        }
        None => PlatformEngine::new(config).context("invalid simulation config")?,
    };

    info!(
        "Simulating {} days from day {} (seed {})",
        days,
        engine.day_index(),
        engine.rng_seed()
    );
    for _ in 0..days {
        engine.day();
    }

    report::write_records(output, engine.records())?;
    info!("Wrote {} days to {}", engine.records().len(), output.display());

    if let Some(last) = engine.last_record() {
        info!(
            "Final day {}: supply {}, demand {}, network effect {:.2}",
            last.day, last.supply_count, last.demand_count, last.network_effect
        );
    }

    if let Some(path) = events {
        let json = serde_json::to_string_pretty(engine.event_log().events())?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write events to {}", path.display()))?;
        info!("Wrote {} events to {}", engine.event_log().len(), path.display());
    }

    if let Some(path) = checkpoint {
        let json = engine.save_state()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write checkpoint {}", path.display()))?;
        info!("Saved checkpoint to {}", path.display());
    }

    Ok(())
}

fn run_experiment(
    settings: &RunSettings,
    iterations: usize,
    runs: usize,
    seed: u64,
    output: &Path,
) -> Result<()> {
    if iterations == 0 {
        bail!("at least one iteration is required");
    }

    let mut results = Vec::with_capacity(iterations);
    for iteration in 1..=iterations {
        let result = run_one_iteration(settings, iteration, seed, runs, output)?;
        if let Some(best) = result.ranking().first() {
            info!(
                "Iteration {} best: {} (network effect {:.2})",
                iteration, best.label, best.network_effect.mean
            );
        }
        results.push(result);
    }

    let summary_dir = output.join("summary");
    create_dir(&summary_dir)?;
    let aggregates = aggregate_iterations(&results);
    report::write_aggregates(&summary_dir.join("aggregate_ranking.csv"), &aggregates)?;
    report::write_population_statistics(
        &summary_dir.join("population_statistics.csv"),
        &population_statistics(&results),
    )?;

    info!("Overall ranking across {} iterations:", iterations);
    for (position, aggregate) in aggregates.iter().take(10).enumerate() {
        info!(
            "{:>2}. {:<60} {:>10.2} ± {:.2}",
            position + 1,
            aggregate.label,
            aggregate.network_effect.mean,
            aggregate.network_effect.std
        );
    }
    info!("Results written to {}", output.display());

    Ok(())
}

/// Run one iteration and write each replicate's time series and the rankings
fn run_one_iteration(
    settings: &RunSettings,
    iteration: usize,
    seed: u64,
    runs: usize,
    output: &Path,
) -> Result<IterationResult> {
    let dir = output.join(format!("iteration_{}", iteration));
    create_dir(&dir)?;

    let run = run_iteration(settings, iteration, seed, runs)
        .with_context(|| format!("iteration {} failed", iteration))?;
    info!("Iteration {} (seed base {}) complete", iteration, run.seed);

    for set in &run.sets {
        let slug = set.scenario.slug();
        for (k, outcome) in set.outcomes.iter().enumerate() {
            let path = dir.join(format!(
                "simulation_{}_run{}_seed{}.csv",
                slug,
                k + 1,
                outcome.seed
            ));
            report::write_records(&path, &outcome.records)?;
        }
    }

    let result = run.summarize();
    for (category, file) in [
        (ScenarioCategory::SingleMeasure, "single_measures_summary.csv"),
        (ScenarioCategory::Cluster, "clusters_summary.csv"),
        (ScenarioCategory::Combination, "combinations_summary.csv"),
    ] {
        let ranked = rank(result.category(category));
        report::write_summaries(&dir.join(file), &ranked)?;
    }
    report::write_summaries(&dir.join("overall_ranking.csv"), &result.ranking())?;

    Ok(result)
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory {}", path.display()))
}

fn print_catalog(json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "measures": catalog::single_measures(),
            "clusters": catalog::clusters(),
            "synergy_bonus": catalog::SYNERGY_BONUS,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Single measures:");
    for measure in catalog::single_measures() {
        println!("  {:<32} {:>7.2}", measure.name, measure.effect);
    }
    println!();
    println!("Clusters (x{} synergy):", catalog::SYNERGY_BONUS);
    for cluster in catalog::clusters() {
        let members = catalog::cluster_members(&cluster.name).unwrap_or(&[]);
        println!("  {:<32} {:>7.2}  [{}]", cluster.name, cluster.effect, members.join(", "));
    }
    Ok(())
}
