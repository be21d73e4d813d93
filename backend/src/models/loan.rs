//! Loan ledger: shares currently lent out

use crate::error::MarketError;
use crate::models::ids::{IdSequence, LoanId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An active borrow position backed by one share
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Rate at which the share was lent
    reservation_rate: f64,
}

impl Loan {
    pub fn new(reservation_rate: f64) -> Self {
        Self { reservation_rate }
    }

    pub fn reservation_rate(&self) -> f64 {
        self.reservation_rate
    }
}

/// Active loans keyed by handle
#[derive(Debug, Clone, Default)]
pub struct LoanLedger {
    loans: BTreeMap<LoanId, Loan>,
    ids: IdSequence,
}

impl LoanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reservation_rate: f64) -> LoanId {
        let id = LoanId::new(self.ids.next_raw());
        self.loans.insert(id, Loan::new(reservation_rate));
        id
    }

    pub fn get(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    pub fn contains(&self, id: LoanId) -> bool {
        self.loans.contains_key(&id)
    }

    /// Remove a loan by handle
    ///
    /// # Errors
    /// `UnknownLoan` if the handle does not reference a live loan. A loan
    /// that has been recalled is no longer live.
    pub fn remove(&mut self, id: LoanId) -> Result<Loan, MarketError> {
        self.loans.remove(&id).ok_or(MarketError::UnknownLoan(id))
    }

    /// Minimum reservation rate, or +inf when empty
    pub fn min_rate(&self) -> f64 {
        self.loans
            .values()
            .map(|loan| loan.reservation_rate)
            .fold(f64::INFINITY, f64::min)
    }

    /// Maximum reservation rate, or -inf when empty
    pub fn max_rate(&self) -> f64 {
        self.loans
            .values()
            .map(|loan| loan.reservation_rate)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Handles of every loan priced strictly below `rate`, in ledger order
    pub fn priced_below(&self, rate: f64) -> Vec<LoanId> {
        self.loans
            .iter()
            .filter(|(_, loan)| loan.reservation_rate < rate)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LoanId, &Loan)> {
        self.loans.iter().map(|(id, loan)| (*id, loan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rates_removed_by_identity() {
        let mut ledger = LoanLedger::new();
        let first = ledger.add(2.0);
        let second = ledger.add(2.0);

        ledger.remove(second).unwrap();

        assert!(ledger.contains(first));
        assert!(!ledger.contains(second));
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn test_priced_below_is_strict() {
        let mut ledger = LoanLedger::new();
        let cheap = ledger.add(1.0);
        ledger.add(3.0);

        assert_eq!(ledger.priced_below(3.0), vec![cheap]);
        assert!(ledger.priced_below(f64::NEG_INFINITY).is_empty());
    }
}
