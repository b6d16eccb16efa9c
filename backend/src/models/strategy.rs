//! Strategy effects
//!
//! A strategy effect is a named numeric contribution to the network-effect
//! formula. The engine only reads the list it is given.

use serde::{Deserialize, Serialize};

/// Named effect of an adopted growth strategy (or bundle of strategies)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEffect {
    pub name: String,
    pub effect: f64,
}

impl StrategyEffect {
    pub fn new(name: impl Into<String>, effect: f64) -> Self {
        Self {
            name: name.into(),
            effect,
        }
    }
}

/// Sum of all effects in the list
pub fn total_effect(strategies: &[StrategyEffect]) -> f64 {
    strategies.iter().map(|s| s.effect).sum()
}
