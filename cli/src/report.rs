//! CSV writers for simulation output

use anyhow::{Context, Result};
use platform_sim_core::experiment::{AggregateSummary, PopulationSummary, ReplicateSummary};
use platform_sim_core::DayRecord;
use std::path::Path;

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))
}

/// Daily time series, one row per day
pub fn write_records(path: &Path, records: &[DayRecord]) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "day",
        "supply",
        "demand",
        "network_effect",
        "new_supply",
        "new_demand",
        "churned_supply",
        "churned_demand",
        "supply_join_rate",
        "demand_join_rate",
    ])?;

    for r in records {
        wtr.write_record(&[
            r.day.to_string(),
            r.supply_count.to_string(),
            r.demand_count.to_string(),
            r.network_effect.to_string(),
            r.new_supply.to_string(),
            r.new_demand.to_string(),
            r.churned_supply.to_string(),
            r.churned_demand.to_string(),
            r.supply_join_rate.to_string(),
            r.demand_join_rate.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Replicate summaries in the given order
pub fn write_summaries(path: &Path, summaries: &[ReplicateSummary]) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "rank",
        "scenario",
        "category",
        "total_effect",
        "network_effect_mean",
        "network_effect_std",
        "network_effect_min",
        "network_effect_max",
        "supply_mean",
        "supply_std",
        "demand_mean",
        "demand_std",
        "runs",
    ])?;

    for (i, s) in summaries.iter().enumerate() {
        wtr.write_record(&[
            (i + 1).to_string(),
            s.label.clone(),
            s.category.to_string(),
            s.total_effect.to_string(),
            s.network_effect.mean.to_string(),
            s.network_effect.std.to_string(),
            s.network_effect.min.to_string(),
            s.network_effect.max.to_string(),
            s.supply.mean.to_string(),
            s.supply.std.to_string(),
            s.demand.mean.to_string(),
            s.demand.std.to_string(),
            s.finals.len().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Cross-iteration ranking
pub fn write_aggregates(path: &Path, aggregates: &[AggregateSummary]) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "rank",
        "scenario",
        "category",
        "total_effect",
        "iterations",
        "mean_network_effect",
        "std_network_effect",
        "min_network_effect",
        "max_network_effect",
    ])?;

    for (i, a) in aggregates.iter().enumerate() {
        wtr.write_record(&[
            (i + 1).to_string(),
            a.label.clone(),
            a.category.to_string(),
            a.total_effect.to_string(),
            a.iterations.to_string(),
            a.network_effect.mean.to_string(),
            a.network_effect.std.to_string(),
            a.network_effect.min.to_string(),
            a.network_effect.max.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Final population statistics over every run
pub fn write_population_statistics(path: &Path, stats: &[PopulationSummary]) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "scenario",
        "category",
        "runs",
        "supply_mean",
        "supply_std",
        "supply_min",
        "supply_max",
        "demand_mean",
        "demand_std",
        "demand_min",
        "demand_max",
        "network_effect_mean",
        "network_effect_std",
    ])?;

    for p in stats {
        wtr.write_record(&[
            p.label.clone(),
            p.category.to_string(),
            p.runs.to_string(),
            p.supply.mean.to_string(),
            p.supply.std.to_string(),
            p.supply.min.to_string(),
            p.supply.max.to_string(),
            p.demand.mean.to_string(),
            p.demand.std.to_string(),
            p.demand.min.to_string(),
            p.demand.max.to_string(),
            p.network_effect.mean.to_string(),
            p.network_effect.std.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
