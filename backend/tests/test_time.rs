//! Tests for SimulationClock

use platform_sim_core::SimulationClock;

#[test]
fn test_clock_new() {
    let clock = SimulationClock::new(60);
    assert_eq!(clock.current_day(), 0);
    assert_eq!(clock.offer_interval(), 60);
}

#[test]
fn test_advance_day() {
    let mut clock = SimulationClock::new(60);

    clock.advance_day();
    assert_eq!(clock.current_day(), 1);

    clock.advance_day();
    assert_eq!(clock.current_day(), 2);
}

#[test]
fn test_offer_days_every_interval() {
    let mut clock = SimulationClock::new(60);
    let mut offers = Vec::new();

    for _ in 0..=180 {
        if clock.is_offer_day() {
            offers.push(clock.current_day());
        }
        clock.advance_day();
    }

    assert_eq!(offers, vec![0, 60, 120, 180]);
}

#[test]
fn test_days_until_offer() {
    let mut clock = SimulationClock::new(60);
    assert_eq!(clock.days_until_offer(), 0);

    clock.advance_day();
    assert_eq!(clock.days_until_offer(), 59);

    let clock = SimulationClock::at_day(60, 119);
    assert_eq!(clock.days_until_offer(), 1);
}

#[test]
fn test_resume_at_day() {
    let clock = SimulationClock::at_day(60, 240);
    assert_eq!(clock.current_day(), 240);
    assert!(clock.is_offer_day());
}

#[test]
#[should_panic(expected = "offer_interval must be positive")]
fn test_zero_interval_panics() {
    SimulationClock::new(0);
}
