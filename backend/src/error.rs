//! Error taxonomy of the market engine

use crate::models::ids::{DemandId, LoanId, RecallId};
use thiserror::Error;

/// Errors reported by the ledgers and the matching engine
///
/// Every step validates its inputs before touching any ledger, so a step
/// that returns an error leaves the market exactly as it found it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarketError {
    /// A returned loan handle does not reference a live loan
    #[error("Unknown loan: {0}")]
    UnknownLoan(LoanId),

    /// The same loan handle was returned twice in one step
    #[error("Loan returned more than once in a step: {0}")]
    DuplicateReturn(LoanId),

    #[error("Unknown demand order: {0}")]
    UnknownDemand(DemandId),

    #[error("Unknown recall notice: {0}")]
    UnknownRecall(RecallId),

    /// Reservation rates must be finite real numbers
    #[error("Invalid reservation rate: {0}")]
    InvalidRate(f64),

    /// An extremal query found nothing where the caller had checked for
    /// at least one candidate. Indicates a broken engine invariant.
    #[error("Extremal query on empty ledger: {0}")]
    EmptyLedgerQuery(&'static str),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
