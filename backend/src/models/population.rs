//! Platform population
//!
//! Two typed collections, each kept sorted by id. Ids are issued
//! monotonically, so pushing a new actor keeps the order; lookups and
//! removals use binary search.

use crate::models::actor::{ActorId, ActorKind};
use crate::models::demand::DemandActor;
use crate::models::supply::SupplyActor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    supply: Vec<SupplyActor>,
    demand: Vec<DemandActor>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a supply actor
    ///
    /// # Panics
    /// Panics if the id is not greater than every registered supply id
    pub fn add_supply(&mut self, actor: SupplyActor) {
        if let Some(last) = self.supply.last() {
            assert!(actor.id() > last.id(), "supply ids must be increasing");
        }
        self.supply.push(actor);
    }

    /// Register a demand actor
    ///
    /// # Panics
    /// Panics if the id is not greater than every registered demand id
    pub fn add_demand(&mut self, actor: DemandActor) {
        if let Some(last) = self.demand.last() {
            assert!(actor.id() > last.id(), "demand ids must be increasing");
        }
        self.demand.push(actor);
    }

    pub fn remove_supply(&mut self, id: ActorId) -> Option<SupplyActor> {
        let idx = self.supply.binary_search_by_key(&id, |a| a.id()).ok()?;
        Some(self.supply.remove(idx))
    }

    pub fn remove_demand(&mut self, id: ActorId) -> Option<DemandActor> {
        let idx = self.demand.binary_search_by_key(&id, |a| a.id()).ok()?;
        Some(self.demand.remove(idx))
    }

    pub fn supply(&self) -> &[SupplyActor] {
        &self.supply
    }

    pub fn demand(&self) -> &[DemandActor] {
        &self.demand
    }

    pub fn get_supply(&self, id: ActorId) -> Option<&SupplyActor> {
        let idx = self.supply.binary_search_by_key(&id, |a| a.id()).ok()?;
        self.supply.get(idx)
    }

    pub fn get_demand_mut(&mut self, id: ActorId) -> Option<&mut DemandActor> {
        let idx = self.demand.binary_search_by_key(&id, |a| a.id()).ok()?;
        self.demand.get_mut(idx)
    }

    /// Supply actor by position in the id-ordered collection
    pub fn supply_at_mut(&mut self, index: usize) -> Option<&mut SupplyActor> {
        self.supply.get_mut(index)
    }

    pub fn supply_count(&self) -> usize {
        self.supply.len()
    }

    pub fn demand_count(&self) -> usize {
        self.demand.len()
    }

    pub fn total(&self) -> usize {
        self.supply.len() + self.demand.len()
    }

    pub fn contains(&self, kind: ActorKind, id: ActorId) -> bool {
        match kind {
            ActorKind::Supply => self.get_supply(id).is_some(),
            ActorKind::Demand => self
                .demand
                .binary_search_by_key(&id, |a| a.id())
                .is_ok(),
        }
    }

    /// Every registered actor in ascending id order
    ///
    /// This is the registration order: merging the two sorted collections
    /// reproduces the order in which ids were issued.
    pub fn roster(&self) -> Vec<(ActorKind, ActorId)> {
        let mut roster = Vec::with_capacity(self.total());
        let mut supply = self.supply.iter().map(|a| a.id()).peekable();
        let mut demand = self.demand.iter().map(|a| a.id()).peekable();

        loop {
            let next = match (supply.peek(), demand.peek()) {
                (Some(s), Some(d)) if s < d => (ActorKind::Supply, *s),
                (_, Some(d)) => (ActorKind::Demand, *d),
                (Some(s), None) => (ActorKind::Supply, *s),
                (None, None) => break,
            };
            match next.0 {
                ActorKind::Supply => supply.next(),
                ActorKind::Demand => demand.next(),
            };
            roster.push(next);
        }

        roster
    }
}
