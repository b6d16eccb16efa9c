//! Rolling network-effect history
//!
//! The tracker turns daily population counts into the composite
//! network-effect metric. Each recording appends the instantaneous value to a
//! bounded FIFO window and reports the mean of the window, which is the
//! "network effect" published in the day's record.
//!
//! # Critical Invariants
//!
//! 1. The history never holds more than `window` values
//! 2. Values are appended once per recording, in day order
//! 3. Trend queries read the history, they never record

use crate::models::strategy::{total_effect, StrategyEffect};
use crate::params::NetworkWeights;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded history of daily network-effect values
///
/// # Example
/// ```
/// use platform_sim_core::NetworkEffectTracker;
/// use platform_sim_core::params::NetworkWeights;
///
/// let mut tracker = NetworkEffectTracker::new(NetworkWeights::default());
/// let smoothed = tracker.record_day(100, 1000, &[]);
/// assert!((smoothed - 640.0).abs() < 1e-9); // 0.4*100 + 0.6*1000
/// assert_eq!(tracker.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEffectTracker {
    history: VecDeque<f64>,
    weights: NetworkWeights,
}

impl NetworkEffectTracker {
    pub fn new(weights: NetworkWeights) -> Self {
        Self {
            history: VecDeque::with_capacity(weights.window),
            weights,
        }
    }

    /// Rebuild a tracker from checkpointed values (oldest first)
    ///
    /// Values beyond the window are dropped from the front.
    pub fn from_values(weights: NetworkWeights, values: &[f64]) -> Self {
        let mut tracker = Self::new(weights);
        for value in values {
            tracker.push(*value);
        }
        tracker
    }

    /// Instantaneous composite value for the given counts and strategies
    pub fn instantaneous(
        &self,
        supply_count: usize,
        demand_count: usize,
        strategies: &[StrategyEffect],
    ) -> f64 {
        self.weights.supply_weight * supply_count as f64
            + self.weights.demand_weight * demand_count as f64
            + self.weights.strategy_weight * total_effect(strategies)
    }

    /// Record one day and return the smoothed network effect
    pub fn record_day(
        &mut self,
        supply_count: usize,
        demand_count: usize,
        strategies: &[StrategyEffect],
    ) -> f64 {
        let raw = self.instantaneous(supply_count, demand_count, strategies);
        self.push(raw);
        self.mean()
    }

    fn push(&mut self, value: f64) {
        if self.history.len() >= self.weights.window {
            self.history.pop_front();
        }
        self.history.push_back(value);
    }

    /// Mean of the held values (0 when empty)
    pub fn mean(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f64>() / self.history.len() as f64
    }

    /// Index of the trend baseline: `max(0, len - trend_lookback)`
    fn baseline_index(&self) -> usize {
        self.history.len().saturating_sub(self.weights.trend_lookback)
    }

    /// True once at least `trend_lookback` values are held and the latest
    /// value is strictly below the baseline
    pub fn is_declining(&self) -> bool {
        if self.history.len() < self.weights.trend_lookback {
            return false;
        }
        match (self.latest(), self.history.get(self.baseline_index())) {
            (Some(latest), Some(baseline)) => latest < *baseline,
            _ => false,
        }
    }

    /// `latest - baseline`, or 0 with fewer than two values held
    pub fn trend_delta(&self) -> f64 {
        if self.history.len() < 2 {
            return 0.0;
        }
        match (self.latest(), self.history.get(self.baseline_index())) {
            (Some(latest), Some(baseline)) => latest - baseline,
            _ => 0.0,
        }
    }

    /// `|latest - oldest|`, the drift both churn gates scale by
    ///
    /// Unlike `trend_delta`, this compares against the oldest retained value
    /// rather than the lookback baseline.
    pub fn churn_drift(&self) -> f64 {
        match (self.latest(), self.first()) {
            (Some(latest), Some(first)) => (latest - first).abs(),
            _ => 0.0,
        }
    }

    pub fn latest(&self) -> Option<f64> {
        self.history.back().copied()
    }

    pub fn first(&self) -> Option<f64> {
        self.history.front().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.weights.window
    }

    /// Held values, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    pub fn weights(&self) -> &NetworkWeights {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> NetworkEffectTracker {
        NetworkEffectTracker::new(NetworkWeights::default())
    }

    #[test]
    fn test_record_includes_strategy_effects() {
        let mut t = tracker();
        let strategies = vec![
            StrategyEffect::new("A", 10.0),
            StrategyEffect::new("B", 20.0),
        ];
        let smoothed = t.record_day(10, 10, &strategies);
        // 4 + 6 + 0.3 * 30
        assert!((smoothed - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_over_window() {
        let mut t = tracker();
        t.record_day(0, 10, &[]); // 6
        let smoothed = t.record_day(0, 20, &[]); // 12
        assert!((smoothed - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_fifo_eviction_at_61st_value() {
        let mut t = tracker();
        for demand in 0..61 {
            t.record_day(0, demand * 10, &[]);
        }
        assert_eq!(t.len(), 60);
        // Value for demand=0 was evicted; oldest is now demand=10 → 6.0
        assert!((t.first().unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_declining_below_lookback() {
        let mut t = tracker();
        for demand in (0..29).rev() {
            t.record_day(0, demand * 10, &[]);
        }
        assert_eq!(t.len(), 29);
        assert!(!t.is_declining(), "needs 30 values before reporting decline");
    }

    #[test]
    fn test_declining_compares_against_thirty_back() {
        let mut t = tracker();
        for demand in (0..30).rev() {
            t.record_day(0, demand * 10, &[]);
        }
        assert!(t.is_declining());

        // Baseline index for 40 values is 10; a rising tail flips the answer
        let mut t = tracker();
        for demand in (0..10).rev() {
            t.record_day(0, demand * 10, &[]);
        }
        for demand in 0..30 {
            t.record_day(0, demand * 10, &[]);
        }
        assert!(!t.is_declining());
    }

    #[test]
    fn test_equal_values_are_not_declining() {
        let mut t = tracker();
        for _ in 0..45 {
            t.record_day(5, 5, &[]);
        }
        assert!(!t.is_declining());
        assert_eq!(t.trend_delta(), 0.0);
    }

    #[test]
    fn test_trend_delta_needs_two_points() {
        let mut t = tracker();
        assert_eq!(t.trend_delta(), 0.0);
        t.record_day(100, 100, &[]);
        assert_eq!(t.trend_delta(), 0.0);
        t.record_day(100, 200, &[]);
        // With 2 values the baseline is index 0
        assert!((t.trend_delta() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_churn_drift_uses_oldest_value() {
        let mut t = tracker();
        t.record_day(0, 1000, &[]); // 600
        for _ in 0..40 {
            t.record_day(0, 500, &[]); // 300
        }
        // Oldest retained is still 600 (41 values < 60)
        assert!((t.churn_drift() - 300.0).abs() < 1e-9);
        // Lookback baseline is already 300
        assert_eq!(t.trend_delta(), 0.0);
    }

    #[test]
    fn test_from_values_truncates_to_window() {
        let values: Vec<f64> = (0..70).map(f64::from).collect();
        let t = NetworkEffectTracker::from_values(NetworkWeights::default(), &values);
        assert_eq!(t.len(), 60);
        assert_eq!(t.first(), Some(10.0));
        assert_eq!(t.latest(), Some(69.0));
    }
}
