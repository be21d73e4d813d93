//! Stable handles into the ledgers
//!
//! Ledgers are arenas keyed by monotonically increasing handles. A handle
//! names one specific order, loan or notice, so two entries with the same
//! reservation rate are never confused with each other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a demand order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandId(u64);

impl DemandId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for DemandId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DemandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dmd_{:08}", self.0)
    }
}

/// Handle of an active loan
///
/// This is what a borrower hands back when returning a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(u64);

impl LoanId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for LoanId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loan_{:08}", self.0)
    }
}

/// Handle of a recall notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecallId(u64);

impl RecallId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecallId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcl_{:08}", self.0)
    }
}

/// Hands out handles in increasing order
#[derive(Debug, Clone, Default)]
pub(crate) struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub(crate) fn next_raw(&mut self) -> u64 {
        let raw = self.next;
        self.next += 1;
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_prefixed() {
        assert_eq!(LoanId::new(42).to_string(), "loan_00000042");
        assert_eq!(DemandId::new(7).to_string(), "dmd_00000007");
        assert_eq!(RecallId::from(3).to_string(), "rcl_00000003");
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let mut seq = IdSequence::default();
        assert_eq!(seq.next_raw(), 0);
        assert_eq!(seq.next_raw(), 1);
        assert_eq!(seq.next_raw(), 2);
    }
}
