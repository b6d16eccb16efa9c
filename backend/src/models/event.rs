//! Event log for population changes and purchases
//!
//! Events are only recorded when the engine is built with `record_events`;
//! the day records carry the aggregate counts either way.
//!
//! # Event Types
//!
//! - **Joins**: a spawn trial succeeded on either side
//! - **Churns**: an actor left, with the gate that removed it for supply
//! - **Purchases**: a demand actor rated a supply actor
//!
//! # Example
//!
//! ```rust
//! use platform_sim_core::models::{ActorId, Event};
//!
//! let event = Event::Purchase {
//!     day: 10,
//!     demand_id: ActorId(42),
//!     supply_id: ActorId(3),
//!     rating: 4,
//! };
//!
//! assert_eq!(event.day(), 10);
//! assert!(event.involves(ActorId(3)));
//! ```

use crate::models::actor::{ActorId, ChurnReason};
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// Events are logged in the order they occur within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SupplyJoined {
        day: usize,
        actor_id: ActorId,
    },

    DemandJoined {
        day: usize,
        actor_id: ActorId,
    },

    SupplyChurned {
        day: usize,
        actor_id: ActorId,
        reason: ChurnReason,
    },

    DemandChurned {
        day: usize,
        actor_id: ActorId,
    },

    /// Rating delivered from a demand actor to a supply actor
    Purchase {
        day: usize,
        demand_id: ActorId,
        supply_id: ActorId,
        rating: u8,
    },
}

impl Event {
    /// Day on which this event occurred
    pub fn day(&self) -> usize {
        match self {
            Event::SupplyJoined { day, .. } => *day,
            Event::DemandJoined { day, .. } => *day,
            Event::SupplyChurned { day, .. } => *day,
            Event::DemandChurned { day, .. } => *day,
            Event::Purchase { day, .. } => *day,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SupplyJoined { .. } => "SupplyJoined",
            Event::DemandJoined { .. } => "DemandJoined",
            Event::SupplyChurned { .. } => "SupplyChurned",
            Event::DemandChurned { .. } => "DemandChurned",
            Event::Purchase { .. } => "Purchase",
        }
    }

    /// Whether the event concerns the given actor (either side of a purchase)
    pub fn involves(&self, id: ActorId) -> bool {
        match self {
            Event::SupplyJoined { actor_id, .. }
            | Event::DemandJoined { actor_id, .. }
            | Event::SupplyChurned { actor_id, .. }
            | Event::DemandChurned { actor_id, .. } => *actor_id == id,
            Event::Purchase {
                demand_id,
                supply_id,
                ..
            } => *demand_id == id || *supply_id == id,
        }
    }
}

/// Ordered event storage with simple queries
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_on_day(&self, day: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.day() == day).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_actor(&self, id: ActorId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.involves(id)).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
