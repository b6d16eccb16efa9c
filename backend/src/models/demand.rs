//! Demand-side actor
//!
//! A demand actor buys from a random supply actor, rates the purchase, and
//! waits out a cooldown afterwards. Offer days force a purchase and ignore
//! the cooldown without resetting it.
//!
//! # Critical Invariants
//!
//! 1. A cooling-down actor on a regular day consumes no random draws
//! 2. Only regular-day purchases start a cooldown
//! 3. Churn is evaluated after the purchase phase, on every active day

use crate::models::actor::{bounded, ActorContext, ActorId};
use crate::network::NetworkEffectTracker;
use crate::params::DemandParams;

/// Demand-side platform participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandActor {
    id: ActorId,
    cooldown: u32,
}

/// Rating handed to the supply actor at `supply_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingDelivery {
    /// Position in the id-ordered supply collection
    pub supply_index: usize,
    /// Rating in 1..=5
    pub rating: u8,
}

/// Outcome of one demand step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemandStep {
    /// A purchase happened today
    pub purchased: bool,
    /// Rating to deliver; `None` when there was nothing to buy from
    pub delivery: Option<RatingDelivery>,
    /// The actor leaves the platform
    pub churned: bool,
}

impl DemandActor {
    pub fn new(id: ActorId) -> Self {
        Self { id, cooldown: 0 }
    }

    /// Restore an actor mid-cooldown
    pub fn with_cooldown(id: ActorId, cooldown: u32) -> Self {
        Self { id, cooldown }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Remaining cooldown days
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Purchase probability for the day
    pub fn purchase_probability(params: &DemandParams, offer_day: bool) -> f64 {
        if offer_day {
            (params.purchase_probability * params.offer_multiplier).min(1.0)
        } else {
            params.purchase_probability
        }
    }

    /// Trend churn probability, or `None` while the network effect is not declining
    pub fn trend_churn_probability(
        params: &DemandParams,
        tracker: &NetworkEffectTracker,
    ) -> Option<f64> {
        if !tracker.is_declining() {
            return None;
        }
        let p = tracker.churn_drift() / params.trend_divisor;
        Some(bounded(p, params.trend_min, params.trend_max))
    }

    /// Run one day for this actor
    ///
    /// `supply_count` is the current size of the supply collection; the
    /// returned `supply_index` refers to that collection.
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::models::{ActorContext, ActorId, DemandActor};
    /// use platform_sim_core::{ModelParameters, NetworkEffectTracker, RngManager};
    ///
    /// let params = ModelParameters::default();
    /// let tracker = NetworkEffectTracker::new(params.network.clone());
    /// let mut rng = RngManager::new(7);
    /// let mut actor = DemandActor::new(ActorId(3));
    ///
    /// let mut ctx = ActorContext { rng: &mut rng, tracker: &tracker, params: &params };
    /// // Day 0 is an offer day: the purchase always happens
    /// let outcome = actor.step(0, 4, &mut ctx);
    /// assert!(outcome.purchased);
    /// assert!(outcome.delivery.unwrap().supply_index < 4);
    /// assert_eq!(actor.cooldown(), 0);
    /// ```
    pub fn step(
        &mut self,
        day_index: usize,
        supply_count: usize,
        ctx: &mut ActorContext<'_>,
    ) -> DemandStep {
        let params = &ctx.params.demand;
        let offer_day = day_index % params.offer_interval == 0;

        if !offer_day && self.cooldown > 0 {
            self.cooldown -= 1;
            return DemandStep::default();
        }

        let mut outcome = DemandStep::default();

        let p = Self::purchase_probability(params, offer_day);
        outcome.purchased = offer_day || ctx.rng.bernoulli(p);

        if outcome.purchased {
            if supply_count > 0 {
                let supply_index = ctx.rng.index(supply_count);
                outcome.delivery = ctx
                    .rng
                    .weighted_index(&params.rating_weights)
                    .map(|idx| RatingDelivery {
                        supply_index,
                        rating: idx as u8 + 1,
                    });
            }
            if !offer_day {
                self.cooldown = params.cooldown_days;
            }
        }

        if let Some(p) = Self::trend_churn_probability(params, ctx.tracker) {
            outcome.churned = ctx.rng.bernoulli(p);
        }

        outcome
    }
}
