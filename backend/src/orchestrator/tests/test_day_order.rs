// Ordering of the daily tick
//
// The record for day k is taken before any mutation on day k, so it carries
// the counters accumulated on day k-1.

use crate::models::event::Event;
use crate::orchestrator::engine::{EngineConfig, PlatformEngine};

fn run(config: EngineConfig, days: usize) -> PlatformEngine {
    let mut engine = PlatformEngine::new(config).unwrap();
    for _ in 0..days {
        engine.day();
    }
    engine
}

#[test]
fn test_day_zero_record_has_zero_counters() {
    let mut engine = PlatformEngine::new(EngineConfig::new(20, 300).with_seed(9)).unwrap();
    let record = engine.day();

    assert_eq!(record.day, 0);
    assert_eq!(record.supply_count, 20);
    assert_eq!(record.demand_count, 300);
    assert_eq!(record.new_supply, 0);
    assert_eq!(record.new_demand, 0);
    assert_eq!(record.churned_supply, 0);
    assert_eq!(record.churned_demand, 0);

    // Construction recording + day 0 recording of the same population
    assert_eq!(engine.tracker().len(), 2);
    assert!((record.network_effect - (0.4 * 20.0 + 0.6 * 300.0)).abs() < 1e-9);
}

#[test]
fn test_record_carries_previous_day_counters() {
    let mut engine = PlatformEngine::new(EngineConfig::new(30, 500).with_seed(21)).unwrap();
    for _ in 0..40 {
        engine.day();
        let previous = engine.counters();
        let record = engine.day();
        assert_eq!(record.new_supply, previous.joined_supply);
        assert_eq!(record.new_demand, previous.joined_demand);
        assert_eq!(record.churned_supply, previous.churned_supply);
        assert_eq!(record.churned_demand, previous.churned_demand);
    }
}

#[test]
fn test_record_counts_match_population_flow() {
    let engine = run(EngineConfig::new(25, 400).with_seed(5), 90);
    let records = engine.records();

    for pair in records.windows(2) {
        let (today, tomorrow) = (&pair[0], &pair[1]);
        assert_eq!(
            tomorrow.supply_count,
            today.supply_count + tomorrow.new_supply - tomorrow.churned_supply
        );
        assert_eq!(
            tomorrow.demand_count,
            today.demand_count + tomorrow.new_demand - tomorrow.churned_demand
        );
    }
}

#[test]
fn test_events_agree_with_records() {
    let engine = run(EngineConfig::new(15, 250).with_seed(77).with_events(), 75);
    let log = engine.event_log();

    for day in 0..74 {
        let events = log.events_on_day(day);
        let count = |kind: &str| events.iter().filter(|e| e.event_type() == kind).count();
        let next = &engine.records()[day + 1];
        assert_eq!(count("SupplyJoined"), next.new_supply, "day {}", day);
        assert_eq!(count("DemandJoined"), next.new_demand, "day {}", day);
        assert_eq!(count("SupplyChurned"), next.churned_supply, "day {}", day);
        assert_eq!(count("DemandChurned"), next.churned_demand, "day {}", day);
    }

    let joined = log.events_of_type("SupplyJoined").len() + log.events_of_type("DemandJoined").len();
    assert_eq!(engine.next_id(), (15 + 250 + joined) as u64);
}

#[test]
fn test_purchases_rate_live_supply() {
    let engine = run(EngineConfig::new(10, 200).with_seed(3).with_events(), 20);
    let purchases = engine.event_log().events_of_type("Purchase");
    assert!(!purchases.is_empty());
    for event in purchases {
        if let Event::Purchase { rating, .. } = event {
            assert!((1..=5).contains(rating));
        }
    }
}

#[test]
fn test_events_off_by_default() {
    let engine = run(EngineConfig::new(10, 200).with_seed(3), 20);
    assert!(engine.event_log().is_empty());
}

#[test]
fn test_empty_platform_still_spawns() {
    let mut params = crate::params::ModelParameters::default();
    params.supply_join.base = 1.0;
    params.supply_join.max = 1.0;
    let engine = run(
        EngineConfig::new(0, 0).with_seed(1).with_parameters(params),
        1,
    );
    // Floor of five supply trials, every one succeeds
    assert_eq!(engine.population().supply_count(), 5);
    assert_eq!(engine.counters().joined_supply, 5);
    assert_eq!(engine.counters().churned_supply, 0);
}

#[test]
fn test_tracker_grows_to_window() {
    let mut engine = PlatformEngine::new(EngineConfig::new(5, 50).with_seed(2)).unwrap();
    assert_eq!(engine.tracker().len(), 1);
    for day in 1..=80 {
        engine.day();
        assert_eq!(engine.tracker().len(), (day + 1).min(60));
    }
}
