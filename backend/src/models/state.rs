//! Market State
//!
//! Everything the market knows about a single security: the shares sitting
//! idle with lenders, the three ledgers, and the last cleared rate.
//!
//! # Critical Invariants
//!
//! 1. **Share Conservation**: `available + loans + recalls` changes only when
//!    the configuration seeds the market. Lending, buy-in, cancellation,
//!    recall and returns move shares between categories.
//! 2. **Exclusive Membership**: an order, loan or notice lives in exactly
//!    one ledger. Moving between ledgers removes before it inserts.
//! 3. **No Future Recalls**: every notice's recall tick is at most the
//!    current tick.

use crate::models::demand::DemandLedger;
use crate::models::loan::LoanLedger;
use crate::models::recall::RecallLedger;
use serde::{Deserialize, Serialize};

/// Complete market state for one security
///
/// # Example
///
/// ```rust
/// use sl_market_core_rs::MarketState;
///
/// let mut state = MarketState::new(15, 0.5);
/// state.loans_mut().add(1.0);
///
/// assert_eq!(state.available_shares(), 15);
/// assert_eq!(state.total_shares(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct MarketState {
    /// Shares held by lenders and free to lend
    available_shares: u64,

    demand: DemandLedger,
    loans: LoanLedger,
    recalls: RecallLedger,

    /// Last cleared reservation rate
    ///
    /// Only lending changes it; it persists unchanged between clearings.
    market_rate: f64,
}

/// Ledger sizes at a single reservation rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLevel {
    pub rate: f64,
    pub demand: usize,
    pub loans: usize,
    pub recalls: usize,
}

impl MarketState {
    pub fn new(available_shares: u64, market_rate: f64) -> Self {
        Self {
            available_shares,
            demand: DemandLedger::new(),
            loans: LoanLedger::new(),
            recalls: RecallLedger::new(),
            market_rate,
        }
    }

    pub fn available_shares(&self) -> u64 {
        self.available_shares
    }

    /// Take one share out of the available pool
    ///
    /// Returns false, leaving the pool untouched, when it is already empty.
    pub fn take_available_share(&mut self) -> bool {
        if self.available_shares == 0 {
            return false;
        }
        self.available_shares -= 1;
        true
    }

    /// Put one returned share back into the available pool
    pub fn restore_available_share(&mut self) {
        self.available_shares += 1;
    }

    pub fn demand(&self) -> &DemandLedger {
        &self.demand
    }

    pub fn demand_mut(&mut self) -> &mut DemandLedger {
        &mut self.demand
    }

    pub fn loans(&self) -> &LoanLedger {
        &self.loans
    }

    pub fn loans_mut(&mut self) -> &mut LoanLedger {
        &mut self.loans
    }

    pub fn recalls(&self) -> &RecallLedger {
        &self.recalls
    }

    pub fn recalls_mut(&mut self) -> &mut RecallLedger {
        &mut self.recalls
    }

    pub fn market_rate(&self) -> f64 {
        self.market_rate
    }

    pub fn set_market_rate(&mut self, rate: f64) {
        self.market_rate = rate;
    }

    /// Total shares in the market, the conserved quantity
    pub fn total_shares(&self) -> u64 {
        self.available_shares + self.loans.count() as u64 + self.recalls.count() as u64
    }

    /// Ledger sizes at every distinct reservation rate, ascending by rate
    pub fn depth(&self) -> Vec<RateLevel> {
        let mut entries: Vec<(f64, Side)> = self
            .demand
            .iter()
            .map(|(_, order)| (order.reservation_rate(), Side::Demand))
            .chain(
                self.loans
                    .iter()
                    .map(|(_, loan)| (loan.reservation_rate(), Side::Loan)),
            )
            .chain(
                self.recalls
                    .iter()
                    .map(|(_, notice)| (notice.reservation_rate(), Side::Recall)),
            )
            .collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut levels: Vec<RateLevel> = Vec::new();
        for (rate, side) in entries {
            if levels.last().map_or(true, |level| level.rate != rate) {
                levels.push(RateLevel {
                    rate,
                    demand: 0,
                    loans: 0,
                    recalls: 0,
                });
            }
            if let Some(level) = levels.last_mut() {
                match side {
                    Side::Demand => level.demand += 1,
                    Side::Loan => level.loans += 1,
                    Side::Recall => level.recalls += 1,
                }
            }
        }
        levels
    }
}

#[derive(Clone, Copy)]
enum Side {
    Demand,
    Loan,
    Recall,
}
