//! Logical time for the market
//!
//! The market has no notion of wall-clock time. Time is a tick counter that
//! the matching engine advances exactly once per step.

use serde::{Deserialize, Serialize};

/// Monotonic logical tick counter
///
/// # Example
/// ```
/// use sl_market_core_rs::Clock;
///
/// let mut clock = Clock::new();
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance_tick();
/// assert_eq!(clock.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    /// Ticks elapsed since the market opened
    current_tick: usize,
}

impl Clock {
    /// Create a clock at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Advance time by one tick
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Get the current tick
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_starts_at_zero() {
        assert_eq!(Clock::default().current_tick(), 0);
    }
}
