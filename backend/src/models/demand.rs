//! Demand ledger: unmatched borrow demand
//!
//! Each order asks to borrow one share and carries the reservation rate the
//! borrower is willing to pay. Orders are never edited in place; a buy-in
//! re-enters the recalled lender as a brand new order.

use crate::error::MarketError;
use crate::models::ids::{DemandId, IdSequence};
use crate::rng::{pick, TieBreaker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A standing request to borrow one share
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandOrder {
    arrival_tick: usize,
    reservation_rate: f64,
}

impl DemandOrder {
    pub fn new(reservation_rate: f64, arrival_tick: usize) -> Self {
        Self {
            arrival_tick,
            reservation_rate,
        }
    }

    /// Tick at which the order entered the ledger
    pub fn arrival_tick(&self) -> usize {
        self.arrival_tick
    }

    pub fn reservation_rate(&self) -> f64 {
        self.reservation_rate
    }
}

/// Outstanding demand orders keyed by handle
///
/// Iteration follows insertion order, which keeps tie-breaks reproducible
/// for a given random source.
#[derive(Debug, Clone, Default)]
pub struct DemandLedger {
    orders: BTreeMap<DemandId, DemandOrder>,
    ids: IdSequence,
}

impl DemandLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new order stamped with `at_tick`
    ///
    /// The rate is not validated here; any sign is allowed.
    pub fn add(&mut self, reservation_rate: f64, at_tick: usize) -> DemandId {
        let id = DemandId::new(self.ids.next_raw());
        self.orders
            .insert(id, DemandOrder::new(reservation_rate, at_tick));
        id
    }

    pub fn get(&self, id: DemandId) -> Option<&DemandOrder> {
        self.orders.get(&id)
    }

    /// Remove a specific order
    pub fn remove(&mut self, id: DemandId) -> Result<DemandOrder, MarketError> {
        self.orders
            .remove(&id)
            .ok_or(MarketError::UnknownDemand(id))
    }

    /// Highest-priority order
    ///
    /// Priority is highest reservation rate, then earliest arrival tick, then
    /// a uniform choice among whatever still ties.
    pub fn top_demand(&self, tie_breaker: &mut dyn TieBreaker) -> Option<DemandId> {
        let max_rate = self.max_rate();
        let top: Vec<(DemandId, usize)> = self
            .orders
            .iter()
            .filter(|(_, order)| order.reservation_rate == max_rate)
            .map(|(id, order)| (*id, order.arrival_tick))
            .collect();

        let earliest = top.iter().map(|(_, tick)| *tick).min()?;
        let earliest_top: Vec<DemandId> = top
            .into_iter()
            .filter(|(_, tick)| *tick == earliest)
            .map(|(id, _)| id)
            .collect();

        pick(&earliest_top, tie_breaker)
    }

    /// Maximum reservation rate, or -inf when empty
    pub fn max_rate(&self) -> f64 {
        self.orders
            .values()
            .map(|order| order.reservation_rate)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Minimum reservation rate, or +inf when empty
    pub fn min_rate(&self) -> f64 {
        self.orders
            .values()
            .map(|order| order.reservation_rate)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DemandId, &DemandOrder)> {
        self.orders.iter().map(|(id, order)| (*id, order))
    }
}
