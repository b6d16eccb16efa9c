//! Supply-side actor
//!
//! A supply actor collects ratings from demand-side purchases and leaves the
//! platform through one of two gates:
//!
//! - **Gate A (quality)**: a poor mean rating makes churn likely
//! - **Gate B (trend)**: a declining network effect makes churn possible
//!
//! Gate B is only evaluated when Gate A did not fire.

use crate::models::actor::{bounded, ActorContext, ActorId, ChurnReason};
use crate::network::NetworkEffectTracker;
use crate::params::SupplyChurnParams;

/// Supply-side platform participant
///
/// # Example
/// ```
/// use platform_sim_core::models::{ActorId, SupplyActor};
///
/// let mut actor = SupplyActor::new(ActorId(0));
/// actor.add_rating(2);
/// actor.add_rating(4);
/// assert_eq!(actor.mean_rating(), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyActor {
    id: ActorId,
    ratings: Vec<u8>,
    rating_sum: u64,
}

impl SupplyActor {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            ratings: Vec::new(),
            rating_sum: 0,
        }
    }

    /// Restore an actor with previously received ratings
    pub fn with_ratings(id: ActorId, ratings: Vec<u8>) -> Self {
        let rating_sum = ratings.iter().map(|r| u64::from(*r)).sum();
        Self {
            id,
            ratings,
            rating_sum,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Ratings in the order received
    pub fn ratings(&self) -> &[u8] {
        &self.ratings
    }

    /// Append a rating. Values are not range-checked.
    pub fn add_rating(&mut self, value: u8) {
        self.ratings.push(value);
        self.rating_sum += u64::from(value);
    }

    pub fn mean_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        Some(self.rating_sum as f64 / self.ratings.len() as f64)
    }

    /// Gate A probability, or `None` when the gate does not apply
    /// (no ratings, or mean above the threshold)
    pub fn quality_churn_probability(&self, params: &SupplyChurnParams) -> Option<f64> {
        let mean = self.mean_rating()?;
        if mean > params.quality_threshold {
            return None;
        }
        let p = params.quality_base + (params.quality_threshold - mean) * params.quality_slope;
        Some(p.min(params.quality_cap))
    }

    /// Gate B probability, or `None` while the network effect is not declining
    pub fn trend_churn_probability(
        params: &SupplyChurnParams,
        tracker: &NetworkEffectTracker,
    ) -> Option<f64> {
        if !tracker.is_declining() {
            return None;
        }
        let p = tracker.churn_drift() / params.trend_divisor;
        Some(bounded(p, params.trend_min, params.trend_max))
    }

    /// Run today's churn gates
    ///
    /// Returns the gate that fired; the caller removes the actor and counts
    /// the churn. Draws at most one value per evaluated gate.
    pub fn step(&self, ctx: &mut ActorContext<'_>) -> Option<ChurnReason> {
        let params = &ctx.params.supply_churn;

        if let Some(p) = self.quality_churn_probability(params) {
            if ctx.rng.bernoulli(p) {
                return Some(ChurnReason::Ratings);
            }
        }

        if let Some(p) = Self::trend_churn_probability(params, ctx.tracker) {
            if ctx.rng.bernoulli(p) {
                return Some(ChurnReason::Trend);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ModelParameters, NetworkWeights};
    use crate::rng::RngManager;

    fn actor_with(ratings: &[u8]) -> SupplyActor {
        SupplyActor::with_ratings(ActorId(1), ratings.to_vec())
    }

    #[test]
    fn test_no_ratings_no_quality_gate() {
        let actor = SupplyActor::new(ActorId(0));
        assert_eq!(actor.mean_rating(), None);
        assert_eq!(
            actor.quality_churn_probability(&SupplyChurnParams::default()),
            None
        );
    }

    #[test]
    fn test_quality_gate_threshold_inclusive() {
        let params = SupplyChurnParams::default();
        // mean exactly 2.5 → gate applies with base probability
        let p = actor_with(&[2, 3]).quality_churn_probability(&params).unwrap();
        assert!((p - 0.1).abs() < 1e-12);
        // mean 3.0 → gate does not apply
        assert_eq!(actor_with(&[3, 3]).quality_churn_probability(&params), None);
    }

    #[test]
    fn test_quality_gate_all_ones() {
        let params = SupplyChurnParams::default();
        let p = actor_with(&[1; 10]).quality_churn_probability(&params).unwrap();
        assert!((p - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_quality_gate_capped() {
        let params = SupplyChurnParams::default();
        // Mean 0 is impossible from the rating generator but must still clamp
        let p = actor_with(&[0, 0]).quality_churn_probability(&params).unwrap();
        assert!((p - 0.6).abs() < 1e-12);

        let steep = SupplyChurnParams {
            quality_slope: 1.0,
            ..SupplyChurnParams::default()
        };
        let p = actor_with(&[1]).quality_churn_probability(&steep).unwrap();
        assert_eq!(p, 0.9);
    }

    #[test]
    fn test_trend_gate_bounds() {
        let params = SupplyChurnParams::default();
        let mut tracker = NetworkEffectTracker::new(NetworkWeights::default());

        // Small decline → lower bound
        // 30 values: the baseline is the first one
        tracker.record_day(0, 101, &[]);
        for _ in 0..29 {
            tracker.record_day(0, 100, &[]);
        }
        let p = SupplyActor::trend_churn_probability(&params, &tracker).unwrap();
        assert_eq!(p, 0.05);

        // Large decline → upper bound
        let mut tracker = NetworkEffectTracker::new(NetworkWeights::default());
        tracker.record_day(0, 10_000, &[]);
        for _ in 0..29 {
            tracker.record_day(0, 100, &[]);
        }
        let p = SupplyActor::trend_churn_probability(&params, &tracker).unwrap();
        assert_eq!(p, 0.2);
    }

    #[test]
    fn test_step_without_gates_draws_nothing() {
        let params = ModelParameters::default();
        let tracker = NetworkEffectTracker::new(params.network.clone());
        let mut rng = RngManager::new(11);
        let before = rng.get_state();

        let actor = actor_with(&[5, 5, 4]);
        let mut ctx = ActorContext {
            rng: &mut rng,
            tracker: &tracker,
            params: &params,
        };
        assert_eq!(actor.step(&mut ctx), None);
        assert_eq!(rng.get_state(), before);
    }
}
