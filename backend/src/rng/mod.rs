//! Deterministic random number generation
//!
//! The only randomness in the market is the uniform choice among orders or
//! recall notices that tie on every priority key. It is drawn through the
//! [`TieBreaker`] trait so that callers can inject their own source; the
//! default source is a seeded xorshift64* generator.

mod xorshift;

pub use xorshift::RngManager;

/// Source of uniform tie-break choices
///
/// Implementations should return an index in `0..len`; anything larger is
/// reduced modulo `len`. The engine never calls `choose` with `len == 0`.
pub trait TieBreaker: Send {
    /// Pick one of `len` equally ranked candidates
    fn choose(&mut self, len: usize) -> usize;
}

impl TieBreaker for RngManager {
    fn choose(&mut self, len: usize) -> usize {
        self.index(len)
    }
}

/// Tie-breaker that always picks the first candidate in ledger order
///
/// Ledger order is insertion order, so this yields plain FIFO behaviour.
/// Useful in tests that need exact outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl TieBreaker for FirstCandidate {
    fn choose(&mut self, _len: usize) -> usize {
        0
    }
}

/// Uniformly pick one of `candidates`, or `None` if there are none
///
/// Never fails for a non-empty slice, whatever index the tie-breaker returns.
pub(crate) fn pick<T: Copy>(candidates: &[T], tie_breaker: &mut dyn TieBreaker) -> Option<T> {
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => candidates.get(tie_breaker.choose(n) % n).copied(),
    }
}
