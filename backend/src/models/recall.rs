//! Recall ledger: loans recalled from their borrowers
//!
//! A recalled share stays with its borrower until the notice matures. Only
//! mature notices can be bought in; any notice can still be cancelled back
//! into an ordinary loan.

use crate::error::MarketError;
use crate::models::ids::{IdSequence, RecallId};
use crate::rng::{pick, TieBreaker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A loan under recall, waiting out its maturation period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecallNotice {
    recall_tick: usize,
    /// Rate of the loan before it was recalled
    reservation_rate: f64,
}

impl RecallNotice {
    pub fn new(reservation_rate: f64, recall_tick: usize) -> Self {
        Self {
            recall_tick,
            reservation_rate,
        }
    }

    pub fn recall_tick(&self) -> usize {
        self.recall_tick
    }

    pub fn reservation_rate(&self) -> f64 {
        self.reservation_rate
    }

    /// True once `recall_age` ticks have passed since the recall
    pub fn is_mature(&self, current_tick: usize, recall_age: usize) -> bool {
        current_tick.saturating_sub(self.recall_tick) >= recall_age
    }
}

/// Outstanding recall notices keyed by handle
#[derive(Debug, Clone, Default)]
pub struct RecallLedger {
    notices: BTreeMap<RecallId, RecallNotice>,
    ids: IdSequence,
}

impl RecallLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reservation_rate: f64, at_tick: usize) -> RecallId {
        let id = RecallId::new(self.ids.next_raw());
        self.notices
            .insert(id, RecallNotice::new(reservation_rate, at_tick));
        id
    }

    pub fn get(&self, id: RecallId) -> Option<&RecallNotice> {
        self.notices.get(&id)
    }

    pub fn remove(&mut self, id: RecallId) -> Result<RecallNotice, MarketError> {
        self.notices
            .remove(&id)
            .ok_or(MarketError::UnknownRecall(id))
    }

    pub fn is_mature(
        &self,
        id: RecallId,
        current_tick: usize,
        recall_age: usize,
    ) -> Result<bool, MarketError> {
        self.get(id)
            .map(|notice| notice.is_mature(current_tick, recall_age))
            .ok_or(MarketError::UnknownRecall(id))
    }

    fn mature(
        &self,
        current_tick: usize,
        recall_age: usize,
    ) -> impl Iterator<Item = (&RecallId, &RecallNotice)> {
        self.notices
            .iter()
            .filter(move |(_, notice)| notice.is_mature(current_tick, recall_age))
    }

    /// Cheapest mature notice, the first candidate for a buy-in
    ///
    /// Ties go to the earliest recall tick, then to a uniform choice.
    pub fn bottom_mature_recall(
        &self,
        current_tick: usize,
        recall_age: usize,
        tie_breaker: &mut dyn TieBreaker,
    ) -> Option<RecallId> {
        let min_rate = self.min_mature_rate(current_tick, recall_age);
        let bottom: Vec<(RecallId, usize)> = self
            .mature(current_tick, recall_age)
            .filter(|(_, notice)| notice.reservation_rate == min_rate)
            .map(|(id, notice)| (*id, notice.recall_tick))
            .collect();

        let earliest = bottom.iter().map(|(_, tick)| *tick).min()?;
        let earliest_bottom: Vec<RecallId> = bottom
            .into_iter()
            .filter(|(_, tick)| *tick == earliest)
            .map(|(id, _)| id)
            .collect();

        pick(&earliest_bottom, tie_breaker)
    }

    /// Most expensive notice, mature or not, the first candidate for
    /// cancellation
    ///
    /// Ties go straight to a uniform choice; recall time plays no part.
    pub fn top_recall(&self, tie_breaker: &mut dyn TieBreaker) -> Option<RecallId> {
        let max_rate = self.max_rate();
        let top: Vec<RecallId> = self
            .notices
            .iter()
            .filter(|(_, notice)| notice.reservation_rate == max_rate)
            .map(|(id, _)| *id)
            .collect();

        pick(&top, tie_breaker)
    }

    pub fn count_mature(&self, current_tick: usize, recall_age: usize) -> usize {
        self.mature(current_tick, recall_age).count()
    }

    pub fn count(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Minimum rate among mature notices, or +inf when none is mature
    pub fn min_mature_rate(&self, current_tick: usize, recall_age: usize) -> f64 {
        self.mature(current_tick, recall_age)
            .map(|(_, notice)| notice.reservation_rate)
            .fold(f64::INFINITY, f64::min)
    }

    /// Minimum rate over all notices, or +inf when empty
    pub fn min_rate(&self) -> f64 {
        self.notices
            .values()
            .map(|notice| notice.reservation_rate)
            .fold(f64::INFINITY, f64::min)
    }

    /// Maximum rate over all notices, or -inf when empty
    pub fn max_rate(&self) -> f64 {
        self.notices
            .values()
            .map(|notice| notice.reservation_rate)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecallId, &RecallNotice)> {
        self.notices.iter().map(|(id, notice)| (*id, notice))
    }
}
