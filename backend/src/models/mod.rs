//! Domain models for the platform simulator

pub mod actor;
pub mod demand;
pub mod event;
pub mod population;
pub mod strategy;
pub mod supply;

// Re-exports
pub use actor::{ActorContext, ActorId, ActorKind, ChurnReason};
pub use demand::{DemandActor, DemandStep, RatingDelivery};
pub use event::{Event, EventLog};
pub use population::Population;
pub use strategy::{total_effect, StrategyEffect};
pub use supply::SupplyActor;
