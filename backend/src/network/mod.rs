//! Network-effect metric: rolling tracker and join-rate feedback

pub mod join_rate;
pub mod tracker;

pub use join_rate::{join_rate, tracker_join_rate};
pub use tracker::NetworkEffectTracker;
