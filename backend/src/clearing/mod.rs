//! Clearing Module
//!
//! Resolves outstanding demand against available shares, loans and recalls.
//!
//! - [`oracle`]: extremal reservation rates across the ledgers
//! - [`rules`]: the four clearing passes the engine runs every tick
//!
//! # Critical Invariants
//!
//! 1. **Share Conservation**: no pass creates or destroys a share
//! 2. **Rate After Lend**: after every lend the market rate equals the
//!    minimum borrower rate
//! 3. **Termination**: every loop iteration shrinks a ledger or lowers the
//!    maximum recall rate, so each pass ends

pub mod oracle;
pub mod rules;

pub use oracle::RateOracle;
pub use rules::{cancel_stale_recalls, issue_recalls, lend_from_available, lend_via_buy_in};
