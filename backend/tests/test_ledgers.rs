//! Tests for the demand, loan and recall ledgers

use sl_market_core_rs::{
    DemandLedger, FirstCandidate, LoanId, LoanLedger, MarketError, RecallLedger, RngManager,
    TieBreaker,
};

/// Always picks the last of the tied candidates
struct LastCandidate;

impl TieBreaker for LastCandidate {
    fn choose(&mut self, len: usize) -> usize {
        len - 1
    }
}

// ============================================================================
// DemandLedger
// ============================================================================

#[test]
fn test_demand_add_and_count() {
    let mut ledger = DemandLedger::new();
    assert_eq!(ledger.count(), 0);

    let id = ledger.add(-2.5, 4);
    ledger.add(3.0, 4);

    assert_eq!(ledger.count(), 2);
    let order = ledger.get(id).unwrap();
    assert_eq!(order.reservation_rate(), -2.5, "negative rates are accepted");
    assert_eq!(order.arrival_tick(), 4);
    assert_eq!(ledger.min_rate(), -2.5);
    assert_eq!(ledger.max_rate(), 3.0);
}

#[test]
fn test_top_demand_highest_rate_wins() {
    let mut ledger = DemandLedger::new();
    ledger.add(1.0, 0);
    let best = ledger.add(8.0, 5);
    ledger.add(4.0, 0);

    assert_eq!(ledger.top_demand(&mut LastCandidate), Some(best));
}

#[test]
fn test_top_demand_earliest_arrival_breaks_rate_tie() {
    let mut ledger = DemandLedger::new();
    ledger.add(6.0, 3);
    let early = ledger.add(6.0, 1);
    ledger.add(6.0, 2);

    // time priority decides before the tie-breaker is consulted
    assert_eq!(ledger.top_demand(&mut FirstCandidate), Some(early));
    assert_eq!(ledger.top_demand(&mut LastCandidate), Some(early));
}

#[test]
fn test_top_demand_tie_breaker_decides_full_tie() {
    let mut ledger = DemandLedger::new();
    let first = ledger.add(6.0, 1);
    let last = ledger.add(6.0, 1);

    assert_eq!(ledger.top_demand(&mut FirstCandidate), Some(first));
    assert_eq!(ledger.top_demand(&mut LastCandidate), Some(last));
}

#[test]
fn test_top_demand_tie_break_is_roughly_uniform() {
    let mut ledger = DemandLedger::new();
    let ids = [ledger.add(5.0, 2), ledger.add(5.0, 2), ledger.add(5.0, 2)];
    ledger.add(4.0, 0);

    let mut rng = RngManager::new(31337);
    let mut counts = [0usize; 3];
    let trials = 3000;

    for _ in 0..trials {
        let top = ledger.top_demand(&mut rng).unwrap();
        let slot = ids.iter().position(|id| *id == top).unwrap();
        counts[slot] += 1;
    }

    for count in counts {
        assert!(
            (800..=1200).contains(&count),
            "tie-break not uniform: {:?}",
            counts
        );
    }
}

#[test]
fn test_demand_remove_by_identity() {
    let mut ledger = DemandLedger::new();
    let a = ledger.add(2.0, 0);
    let b = ledger.add(2.0, 0);

    let removed = ledger.remove(a).unwrap();
    assert_eq!(removed.reservation_rate(), 2.0);
    assert!(ledger.get(a).is_none());
    assert!(ledger.get(b).is_some());
}

// ============================================================================
// LoanLedger
// ============================================================================

#[test]
fn test_loan_extrema() {
    let mut ledger = LoanLedger::new();
    assert_eq!(ledger.min_rate(), f64::INFINITY);
    assert_eq!(ledger.max_rate(), f64::NEG_INFINITY);

    ledger.add(3.0);
    ledger.add(-1.0);
    ledger.add(7.5);

    assert_eq!(ledger.min_rate(), -1.0);
    assert_eq!(ledger.max_rate(), 7.5);
    assert_eq!(ledger.count(), 3);
}

#[test]
fn test_loan_remove_unknown_fails() {
    let mut ledger = LoanLedger::new();
    let id = ledger.add(1.0);
    let stranger = LoanId::new(999);

    assert_eq!(ledger.remove(stranger), Err(MarketError::UnknownLoan(stranger)));
    assert_eq!(ledger.count(), 1);

    ledger.remove(id).unwrap();
    assert_eq!(ledger.remove(id), Err(MarketError::UnknownLoan(id)));
}

#[test]
fn test_loan_handles_never_reused() {
    let mut ledger = LoanLedger::new();
    let first = ledger.add(1.0);
    ledger.remove(first).unwrap();
    let second = ledger.add(1.0);

    assert_ne!(first, second);
}

// ============================================================================
// RecallLedger
// ============================================================================

#[test]
fn test_recall_maturity_counts() {
    let mut ledger = RecallLedger::new();
    let old = ledger.add(3.0, 0);
    let young = ledger.add(1.0, 4);

    assert_eq!(ledger.count(), 2);
    assert_eq!(ledger.count_mature(4, 2), 1);
    assert_eq!(ledger.count_mature(6, 2), 2);
    assert_eq!(ledger.is_mature(old, 4, 2), Ok(true));
    assert_eq!(ledger.is_mature(young, 4, 2), Ok(false));
}

#[test]
fn test_recall_age_zero_is_immediately_mature() {
    let mut ledger = RecallLedger::new();
    let id = ledger.add(2.0, 9);

    assert_eq!(ledger.is_mature(id, 9, 0), Ok(true));
    assert_eq!(ledger.count_mature(9, 0), 1);
}

#[test]
fn test_bottom_mature_recall_lowest_mature_rate() {
    let mut ledger = RecallLedger::new();
    ledger.add(4.0, 0);
    let cheapest = ledger.add(2.0, 1);
    ledger.add(0.5, 9); // cheaper but not mature yet

    assert_eq!(ledger.min_mature_rate(5, 2), 2.0);
    assert_eq!(
        ledger.bottom_mature_recall(5, 2, &mut LastCandidate),
        Some(cheapest)
    );
}

#[test]
fn test_bottom_mature_recall_none_when_nothing_mature() {
    let mut ledger = RecallLedger::new();
    ledger.add(4.0, 3);

    assert_eq!(ledger.bottom_mature_recall(3, 1, &mut FirstCandidate), None);
    assert_eq!(ledger.min_mature_rate(3, 1), f64::INFINITY);
}

#[test]
fn test_top_recall_has_no_time_priority() {
    let mut ledger = RecallLedger::new();
    let later = ledger.add(5.0, 3);
    let earlier = ledger.add(5.0, 1);
    ledger.add(2.0, 0);

    // ledger order, not recall time, decides among equal rates
    assert_eq!(ledger.top_recall(&mut FirstCandidate), Some(later));
    assert_eq!(ledger.top_recall(&mut LastCandidate), Some(earlier));

    // whereas the buy-in side does prefer the earlier recall
    let mut buy_in_side = RecallLedger::new();
    buy_in_side.add(5.0, 3);
    let first_recalled = buy_in_side.add(5.0, 1);
    assert_eq!(
        buy_in_side.bottom_mature_recall(10, 1, &mut FirstCandidate),
        Some(first_recalled)
    );
}

#[test]
fn test_recall_max_rate_sentinel() {
    let mut ledger = RecallLedger::new();
    assert_eq!(ledger.max_rate(), f64::NEG_INFINITY);
    assert_eq!(ledger.min_rate(), f64::INFINITY);

    let id = ledger.add(1.0, 0);
    assert_eq!(ledger.max_rate(), 1.0);

    ledger.remove(id).unwrap();
    assert_eq!(ledger.max_rate(), f64::NEG_INFINITY);
    assert!(ledger.remove(id).is_err());
}
