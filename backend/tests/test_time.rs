//! Tests for the logical clock

use sl_market_core_rs::Clock;

#[test]
fn test_clock_new() {
    let clock = Clock::new();
    assert_eq!(clock.current_tick(), 0);
}

#[test]
fn test_advance_tick() {
    let mut clock = Clock::new();

    clock.advance_tick();
    assert_eq!(clock.current_tick(), 1);

    clock.advance_tick();
    assert_eq!(clock.current_tick(), 2);
}

