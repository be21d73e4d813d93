//! Domain models for the securities-lending market

pub mod demand;
pub mod event;
pub mod ids;
pub mod loan;
pub mod recall;
pub mod state;

// Re-exports
pub use demand::{DemandLedger, DemandOrder};
pub use event::{Event, EventLog};
pub use ids::{DemandId, LoanId, RecallId};
pub use loan::{Loan, LoanLedger};
pub use recall::{RecallLedger, RecallNotice};
pub use state::{MarketState, RateLevel};
