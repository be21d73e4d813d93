//! Tests for deterministic tie-breaking
//!
//! Same seed MUST produce the same sequence, and therefore the same market.

use sl_market_core_rs::{FirstCandidate, RngManager, TieBreaker};

#[test]
fn test_rng_new_with_seed() {
    let rng = RngManager::new(12345);
    assert_eq!(rng.get_state(), 12345);
}

#[test]
fn test_rng_next_deterministic() {
    let mut rng1 = RngManager::new(12345);
    let mut rng2 = RngManager::new(12345);

    for _ in 0..100 {
        assert_eq!(rng1.next(), rng2.next(), "RNG not deterministic!");
    }
}

#[test]
fn test_rng_different_seeds_different_sequences() {
    let mut rng1 = RngManager::new(12345);
    let mut rng2 = RngManager::new(54321);

    assert_ne!(rng1.next(), rng2.next());
}

#[test]
fn test_rng_resume_from_state() {
    let mut rng = RngManager::new(2024);
    rng.next();
    rng.next();

    let mut resumed = RngManager::new(rng.get_state());
    for _ in 0..20 {
        assert_eq!(rng.next(), resumed.next());
    }
}

#[test]
fn test_choose_in_range() {
    let mut rng = RngManager::new(99999);

    for len in 1..20 {
        for _ in 0..50 {
            let pick = rng.choose(len);
            assert!(pick < len, "choose({}) returned {}", len, pick);
        }
    }
}

#[test]
fn test_choose_covers_every_candidate() {
    let mut rng = RngManager::new(7);
    let mut seen = [false; 5];

    for _ in 0..500 {
        seen[rng.choose(5)] = true;
    }

    assert!(seen.iter().all(|hit| *hit), "some candidate never chosen: {:?}", seen);
}

#[test]
fn test_first_candidate_is_constant() {
    let mut first = FirstCandidate;
    assert_eq!(first.choose(1), 0);
    assert_eq!(first.choose(9), 0);
}
