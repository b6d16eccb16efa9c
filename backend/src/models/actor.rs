//! Shared actor types
//!
//! Actors never hold a reference to the engine. Each daily step receives an
//! `ActorContext` (the engine's RNG, tracker and parameters) and reports what
//! happened; the engine applies removals, ratings and counters.

use crate::network::NetworkEffectTracker;
use crate::params::ModelParameters;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique actor identifier, issued monotonically by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Actor kind tag used by the activation roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Supply,
    Demand,
}

/// Which gate removed an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnReason {
    /// Supply quality gate: poor mean rating
    Ratings,
    /// Declining network effect
    Trend,
}

/// Everything an actor may read or draw from during its step
pub struct ActorContext<'a> {
    pub rng: &'a mut RngManager,
    pub tracker: &'a NetworkEffectTracker,
    pub params: &'a ModelParameters,
}

/// `max(min, min(max, value))`
pub(crate) fn bounded(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}
