//! Matching Engine
//!
//! Owns the market state and runs one full clearing cycle per step:
//!
//! ```text
//! For each tick t:
//! 1. Ingest new demand (stamped t) and returned loans
//! 2. Lend available shares to the top demand
//! 3. Lend via buy-in of mature recalls
//! 4. Cancel recalls the market no longer justifies
//! 5. Recall loans priced below the best outstanding demand
//! 6. Advance the clock
//! 7. Publish a snapshot
//! ```
//!
//! # Example
//!
//! ```rust
//! use sl_market_core_rs::{MarketConfig, MatchingEngine};
//!
//! let config = MarketConfig {
//!     recall_age: 1,
//!     initial_market_rate: 0.5,
//!     available_shares: 15,
//!     loans: vec![1.0],
//!     ..MarketConfig::default()
//! };
//!
//! let mut engine = MatchingEngine::new(config).unwrap();
//! let snapshot = engine.step(&[3.0], &[]).unwrap();
//!
//! assert_eq!(snapshot.available_shares, 14);
//! assert_eq!(snapshot.loan_count, 2);
//! assert_eq!(snapshot.market_rate, 1.0);
//! ```

use crate::clearing::{self, RateOracle};
use crate::core::time::Clock;
use crate::error::MarketError;
use crate::models::demand::DemandOrder;
use crate::models::event::{Event, EventLog};
use crate::models::ids::{DemandId, LoanId, RecallId};
use crate::models::loan::Loan;
use crate::models::recall::RecallNotice;
use crate::models::state::{MarketState, RateLevel};
use crate::rng::{RngManager, TieBreaker};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

// ============================================================================
// Configuration
// ============================================================================

/// Market configuration
///
/// Only `recall_age` shapes the dynamics. `initial_market_rate` is the rate
/// reported until the first lend clears, and the ledger seeds describe the
/// market as it stands at tick 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Minimum ticks a recall must wait before it can be bought in
    pub recall_age: usize,

    pub initial_market_rate: f64,

    /// Seed for the default tie-break source
    pub rng_seed: u64,

    /// Shares free to lend at tick 0
    pub available_shares: u64,

    /// Reservation rates of loans outstanding at tick 0
    pub loans: Vec<f64>,

    /// Reservation rates of demand orders outstanding at tick 0
    pub demand: Vec<f64>,

    /// Reservation rates of recall notices issued at tick 0
    pub recalls: Vec<f64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            recall_age: 1,
            initial_market_rate: 0.0,
            rng_seed: 0,
            available_shares: 0,
            loans: Vec::new(),
            demand: Vec::new(),
            recalls: Vec::new(),
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Shares moved by one step, by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepActivity {
    pub arrived: usize,
    pub returned: usize,
    pub lent: usize,
    pub bought_in: usize,
    pub cancelled: usize,
    pub recalled: usize,
}

/// Read-only picture of the market after a step
///
/// Taken after the clock advanced: `tick` is the engine's current tick and
/// `mature_recall_count` counts the recalls a buy-in could take at the next
/// step. A step's snapshot equals [`MatchingEngine::snapshot`] taken right
/// after it, apart from `activity`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub tick: usize,
    pub market_rate: f64,
    pub min_borrower_rate: f64,
    pub available_shares: u64,
    pub loan_count: usize,
    pub demand_count: usize,
    pub max_demand_rate: f64,
    pub recall_count: usize,
    pub mature_recall_count: usize,
    pub activity: StepActivity,
}

impl fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time: {}", self.tick)?;
        writeln!(f, "Market Rate: {}", self.market_rate)?;
        writeln!(f, "Min Borrower Reservation Rate: {}", self.min_borrower_rate)?;
        writeln!(f, "Avail Shares: {}", self.available_shares)?;
        writeln!(f, "Borrowed Shares: {}", self.loan_count)?;
        writeln!(f, "Demanded Shares: {}", self.demand_count)?;
        writeln!(f, "Max Demanded Reservation Rate: {}", self.max_demand_rate)?;
        writeln!(f, "Recalled Shares: {}", self.recall_count)?;
        write!(f, "Mature Recalled Shares: {}", self.mature_recall_count)
    }
}

// ============================================================================
// Matching Engine
// ============================================================================

/// Discrete-time securities-lending matching engine
///
/// # Determinism
///
/// The only randomness is the tie-break among equally ranked candidates,
/// drawn from the injected [`TieBreaker`]. Same config + same tie-break
/// source + same inputs = identical market.
pub struct MatchingEngine {
    state: MarketState,

    clock: Clock,

    recall_age: usize,

    tie_breaker: Box<dyn TieBreaker>,

    event_log: EventLog,
}

impl MatchingEngine {
    /// Create an engine whose tie-breaks come from an `RngManager` seeded
    /// with `config.rng_seed`
    pub fn new(config: MarketConfig) -> Result<Self, MarketError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_tie_breaker(config, Box::new(rng))
    }

    /// Create an engine with an explicit tie-break source
    pub fn with_tie_breaker(
        config: MarketConfig,
        tie_breaker: Box<dyn TieBreaker>,
    ) -> Result<Self, MarketError> {
        Self::validate_config(&config)?;

        let mut state = MarketState::new(config.available_shares, config.initial_market_rate);
        for rate in &config.loans {
            state.loans_mut().add(*rate);
        }
        for rate in &config.demand {
            state.demand_mut().add(*rate, 0);
        }
        for rate in &config.recalls {
            state.recalls_mut().add(*rate, 0);
        }

        Ok(Self {
            state,
            clock: Clock::new(),
            recall_age: config.recall_age,
            tie_breaker,
            event_log: EventLog::new(),
        })
    }

    fn validate_config(config: &MarketConfig) -> Result<(), MarketError> {
        if !config.initial_market_rate.is_finite() {
            return Err(MarketError::InvalidConfig(format!(
                "initial_market_rate must be finite, got {}",
                config.initial_market_rate
            )));
        }

        let seeds = [
            ("loans", &config.loans),
            ("demand", &config.demand),
            ("recalls", &config.recalls),
        ];
        for (name, rates) in seeds {
            if let Some(rate) = rates.iter().find(|rate| !rate.is_finite()) {
                return Err(MarketError::InvalidConfig(format!(
                    "{} rates must be finite, got {}",
                    name, rate
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Step
    // ========================================================================

    /// Run one full tick
    ///
    /// `returned_loans` is a set of live loan handles. Inputs are validated
    /// before anything moves: a rejected step leaves the market and the clock
    /// untouched.
    ///
    /// # Errors
    ///
    /// * `InvalidRate` - a demand rate is not finite
    /// * `DuplicateReturn` - a loan handle appears twice
    /// * `UnknownLoan` - a handle does not reference a live loan
    pub fn step(
        &mut self,
        new_demand_rates: &[f64],
        returned_loans: &[LoanId],
    ) -> Result<MarketSnapshot, MarketError> {
        if let Err(err) = self.validate_step(new_demand_rates, returned_loans) {
            warn!(tick = self.current_tick(), error = %err, "step rejected");
            return Err(err);
        }

        let tick = self.current_tick();
        let mut activity = StepActivity::default();

        // STEP 1: INGEST
        for rate in new_demand_rates {
            let demand_id = self.state.demand_mut().add(*rate, tick);
            self.event_log.log(Event::DemandArrived {
                tick,
                demand_id,
                rate: *rate,
            });
            activity.arrived += 1;
        }
        for loan_id in returned_loans {
            let loan = self.state.loans_mut().remove(*loan_id)?;
            self.state.restore_available_share();
            self.event_log.log(Event::LoanReturned {
                tick,
                loan_id: *loan_id,
                rate: loan.reservation_rate(),
            });
            activity.returned += 1;
        }

        // STEP 2: LEND FROM AVAILABLE
        activity.lent = clearing::lend_from_available(
            &mut self.state,
            self.tie_breaker.as_mut(),
            &mut self.event_log,
            tick,
        )?;

        // STEP 3: LEND VIA BUY-IN
        activity.bought_in = clearing::lend_via_buy_in(
            &mut self.state,
            self.tie_breaker.as_mut(),
            &mut self.event_log,
            tick,
            self.recall_age,
        )?;

        // STEP 4: CANCEL STALE RECALLS
        activity.cancelled = clearing::cancel_stale_recalls(
            &mut self.state,
            self.tie_breaker.as_mut(),
            &mut self.event_log,
            tick,
        )?;

        // STEP 5: ISSUE NEW RECALLS
        activity.recalled = clearing::issue_recalls(&mut self.state, &mut self.event_log, tick)?;

        // STEP 6: ADVANCE
        self.clock.advance_tick();

        // STEP 7: PUBLISH
        let snapshot = self.snapshot_at(activity);
        info!(
            tick,
            market_rate = snapshot.market_rate,
            available = snapshot.available_shares,
            loans = snapshot.loan_count,
            demand = snapshot.demand_count,
            recalls = snapshot.recall_count,
            mature_recalls = snapshot.mature_recall_count,
            lent = activity.lent,
            bought_in = activity.bought_in,
            cancelled = activity.cancelled,
            recalled = activity.recalled,
            "step complete"
        );

        Ok(snapshot)
    }

    fn validate_step(
        &self,
        new_demand_rates: &[f64],
        returned_loans: &[LoanId],
    ) -> Result<(), MarketError> {
        if let Some(rate) = new_demand_rates.iter().find(|rate| !rate.is_finite()) {
            return Err(MarketError::InvalidRate(*rate));
        }

        let mut seen = HashSet::with_capacity(returned_loans.len());
        for loan_id in returned_loans {
            if !seen.insert(*loan_id) {
                return Err(MarketError::DuplicateReturn(*loan_id));
            }
            if !self.state.loans().contains(*loan_id) {
                return Err(MarketError::UnknownLoan(*loan_id));
            }
        }

        Ok(())
    }

    fn snapshot_at(&self, activity: StepActivity) -> MarketSnapshot {
        MarketSnapshot {
            tick: self.current_tick(),
            market_rate: self.market_rate(),
            min_borrower_rate: self.min_borrower_rate(),
            available_shares: self.available_shares(),
            loan_count: self.loan_count(),
            demand_count: self.demand_count(),
            max_demand_rate: self.max_demand_rate(),
            recall_count: self.recall_count(),
            mature_recall_count: self.mature_recall_count(),
            activity,
        }
    }

    /// Snapshot of the market as it stands, with no step activity
    pub fn snapshot(&self) -> MarketSnapshot {
        self.snapshot_at(StepActivity::default())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_tick(&self) -> usize {
        self.clock.current_tick()
    }

    pub fn recall_age(&self) -> usize {
        self.recall_age
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Hand over every event logged so far and start a fresh log
    ///
    /// Long-running drivers call this after each step to keep memory flat.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.event_log.drain()
    }

    pub fn market_rate(&self) -> f64 {
        self.state.market_rate()
    }

    pub fn available_shares(&self) -> u64 {
        self.state.available_shares()
    }

    pub fn loan_count(&self) -> usize {
        self.state.loans().count()
    }

    pub fn demand_count(&self) -> usize {
        self.state.demand().count()
    }

    pub fn recall_count(&self) -> usize {
        self.state.recalls().count()
    }

    /// Recalls old enough to be bought in at the current tick
    pub fn mature_recall_count(&self) -> usize {
        self.state
            .recalls()
            .count_mature(self.current_tick(), self.recall_age)
    }

    pub fn max_demand_rate(&self) -> f64 {
        self.state.demand().max_rate()
    }

    pub fn min_demand_rate(&self) -> f64 {
        self.state.demand().min_rate()
    }

    pub fn min_borrower_rate(&self) -> f64 {
        self.oracle().min_borrower_rate()
    }

    pub fn max_borrower_rate(&self) -> f64 {
        self.oracle().max_borrower_rate()
    }

    pub fn global_min_rate(&self) -> f64 {
        self.oracle().global_min_rate()
    }

    pub fn global_max_rate(&self) -> f64 {
        self.oracle().global_max_rate()
    }

    /// Shares in the market across available, loans and recalls
    pub fn total_shares(&self) -> u64 {
        self.state.total_shares()
    }

    pub fn depth(&self) -> Vec<RateLevel> {
        self.state.depth()
    }

    /// Live loans, in the order they were created
    pub fn loans(&self) -> impl Iterator<Item = (LoanId, &Loan)> {
        self.state.loans().iter()
    }

    pub fn demand(&self) -> impl Iterator<Item = (DemandId, &DemandOrder)> {
        self.state.demand().iter()
    }

    pub fn recalls(&self) -> impl Iterator<Item = (RecallId, &RecallNotice)> {
        self.state.recalls().iter()
    }

    fn oracle(&self) -> RateOracle<'_> {
        RateOracle::of(&self.state)
    }
}

// Manual Debug implementation (tie-breakers don't implement Debug)
impl fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("current_tick", &self.current_tick())
            .field("recall_age", &self.recall_age)
            .field("state", &self.state)
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FirstCandidate;

    fn create_test_config() -> MarketConfig {
        MarketConfig {
            recall_age: 1,
            initial_market_rate: 0.5,
            rng_seed: 12345,
            available_shares: 15,
            loans: vec![1.0],
            demand: vec![],
            recalls: vec![],
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = MatchingEngine::new(create_test_config()).unwrap();

        assert_eq!(engine.current_tick(), 0);
        assert_eq!(engine.available_shares(), 15);
        assert_eq!(engine.loan_count(), 1);
        assert_eq!(engine.market_rate(), 0.5);
        assert!(engine.event_log().is_empty());
    }

    #[test]
    fn test_validate_config_rejects_nan_seed() {
        let mut config = create_test_config();
        config.loans.push(f64::NAN);

        let result = MatchingEngine::new(config);
        assert!(matches!(result, Err(MarketError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_config_rejects_infinite_market_rate() {
        let mut config = create_test_config();
        config.initial_market_rate = f64::INFINITY;

        assert!(MatchingEngine::new(config).is_err());
    }

    #[test]
    fn test_seeded_recalls_start_at_tick_zero() {
        let mut config = create_test_config();
        config.recalls = vec![2.0, 3.0];
        let engine = MatchingEngine::with_tie_breaker(config, Box::new(FirstCandidate)).unwrap();

        assert!(engine.recalls().all(|(_, notice)| notice.recall_tick() == 0));
        assert_eq!(engine.mature_recall_count(), 0);
        assert_eq!(engine.total_shares(), 18);
    }

    #[test]
    fn test_snapshot_display_lists_every_field() {
        let engine = MatchingEngine::new(create_test_config()).unwrap();
        let text = engine.snapshot().to_string();

        assert!(text.starts_with("Time: 0"));
        assert!(text.contains("Avail Shares: 15"));
        assert!(text.contains("Borrowed Shares: 1"));
        assert!(text.ends_with("Mature Recalled Shares: 0"));
    }
}
