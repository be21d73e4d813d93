//! Rate oracle
//!
//! Pure queries over the three ledgers. Empty sides contribute the neutral
//! sentinel (+inf for minima, -inf for maxima), so combining with `f64::min`
//! and `f64::max` gives the right answer without special cases.

use crate::models::demand::DemandLedger;
use crate::models::loan::LoanLedger;
use crate::models::recall::RecallLedger;
use crate::models::state::MarketState;

/// Read-only view over the ledgers that answers rate questions
#[derive(Debug, Clone, Copy)]
pub struct RateOracle<'a> {
    demand: &'a DemandLedger,
    loans: &'a LoanLedger,
    recalls: &'a RecallLedger,
}

impl<'a> RateOracle<'a> {
    pub fn new(demand: &'a DemandLedger, loans: &'a LoanLedger, recalls: &'a RecallLedger) -> Self {
        Self {
            demand,
            loans,
            recalls,
        }
    }

    pub fn of(state: &'a MarketState) -> Self {
        Self::new(state.demand(), state.loans(), state.recalls())
    }

    /// Lowest rate held by any borrower, on loan or under recall
    ///
    /// +inf when nobody holds a share.
    pub fn min_borrower_rate(&self) -> f64 {
        self.loans.min_rate().min(self.recalls.min_rate())
    }

    /// Highest rate held by any borrower, -inf when nobody holds a share
    pub fn max_borrower_rate(&self) -> f64 {
        self.loans.max_rate().max(self.recalls.max_rate())
    }

    pub fn global_min_rate(&self) -> f64 {
        self.min_borrower_rate().min(self.demand.min_rate())
    }

    pub fn global_max_rate(&self) -> f64 {
        self.max_borrower_rate().max(self.demand.max_rate())
    }
}
