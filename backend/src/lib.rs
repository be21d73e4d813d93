//! Securities Lending Market Core - Rust Engine
//!
//! Discrete-time matching engine for the lending market of a single
//! security. Every tick it clears borrow demand against idle shares and
//! recalled loans and publishes the resulting market reservation rate.
//!
//! # Architecture
//!
//! - **core**: Logical clock
//! - **models**: Ledgers (demand, loans, recalls), market state, event log
//! - **clearing**: Rate oracle and the clearing passes
//! - **orchestrator**: The per-tick matching loop
//! - **rng**: Deterministic, injectable tie-break source
//!
//! # Critical Invariants
//!
//! 1. Shares are conserved: available + loans + recalls is fixed
//! 2. All randomness is deterministic (injected or seeded tie-breaker)
//! 3. Ledger entries are addressed by handle, never by rate value

// Module declarations
pub mod clearing;
pub mod core;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use clearing::RateOracle;
pub use crate::core::time::Clock;
pub use error::MarketError;
pub use models::{
    demand::{DemandLedger, DemandOrder},
    event::{Event, EventLog},
    ids::{DemandId, LoanId, RecallId},
    loan::{Loan, LoanLedger},
    recall::{RecallLedger, RecallNotice},
    state::{MarketState, RateLevel},
};
pub use orchestrator::{MarketConfig, MarketSnapshot, MatchingEngine, StepActivity};
pub use rng::{FirstCandidate, RngManager, TieBreaker};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn sl_market_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::market::PyMarket>()?;
    Ok(())
}
