//! Clearing passes
//!
//! The engine runs these in a fixed order every tick:
//!
//! ```text
//! 1. lend_from_available   idle shares  -> top demand
//! 2. lend_via_buy_in       mature recall -> top demand, lender re-enters as demand
//! 3. cancel_stale_recalls  overpriced recall -> loan
//! 4. issue_recalls         under-priced loan -> recall
//! ```
//!
//! Each pass returns how many shares it moved.

use crate::clearing::oracle::RateOracle;
use crate::error::MarketError;
use crate::models::event::{Event, EventLog};
use crate::models::state::MarketState;
use crate::rng::TieBreaker;
use tracing::debug;

/// Lend idle shares to the highest-priority demand until either runs out
///
/// Sets the market rate to the minimum borrower rate after every lend.
pub fn lend_from_available(
    state: &mut MarketState,
    tie_breaker: &mut dyn TieBreaker,
    events: &mut EventLog,
    tick: usize,
) -> Result<usize, MarketError> {
    let mut lent = 0;

    while !state.demand().is_empty() && state.available_shares() > 0 {
        let demand_id = state
            .demand()
            .top_demand(tie_breaker)
            .ok_or(MarketError::EmptyLedgerQuery("top_demand"))?;
        let order = state.demand_mut().remove(demand_id)?;
        if !state.take_available_share() {
            return Err(MarketError::EmptyLedgerQuery("available_shares"));
        }
        let rate = order.reservation_rate();
        let loan_id = state.loans_mut().add(rate);

        let market_rate = RateOracle::of(state).min_borrower_rate();
        state.set_market_rate(market_rate);

        debug!(tick, %demand_id, %loan_id, rate, market_rate, "lent from available");
        events.log(Event::LentFromAvailable {
            tick,
            demand_id,
            loan_id,
            rate,
        });
        lent += 1;
    }

    Ok(lent)
}

/// Buy in mature recalls while demand outbids the cheapest borrower
///
/// The cheapest mature recall gives up its share to the top demand. Its
/// lender re-enters the demand ledger at the recalled rate, stamped `tick`.
pub fn lend_via_buy_in(
    state: &mut MarketState,
    tie_breaker: &mut dyn TieBreaker,
    events: &mut EventLog,
    tick: usize,
    recall_age: usize,
) -> Result<usize, MarketError> {
    let mut bought_in = 0;

    while state.recalls().count_mature(tick, recall_age) > 0
        && state.demand().max_rate() > RateOracle::of(state).min_borrower_rate()
    {
        let recall_id = state
            .recalls()
            .bottom_mature_recall(tick, recall_age, tie_breaker)
            .ok_or(MarketError::EmptyLedgerQuery("bottom_mature_recall"))?;
        let demand_id = state
            .demand()
            .top_demand(tie_breaker)
            .ok_or(MarketError::EmptyLedgerQuery("top_demand"))?;

        let notice = state.recalls_mut().remove(recall_id)?;
        let order = state.demand_mut().remove(demand_id)?;

        let recalled_rate = notice.reservation_rate();
        let lent_rate = order.reservation_rate();
        let reentered_demand_id = state.demand_mut().add(recalled_rate, tick);
        let loan_id = state.loans_mut().add(lent_rate);

        let market_rate = RateOracle::of(state).min_borrower_rate();
        state.set_market_rate(market_rate);

        debug!(
            tick,
            %recall_id,
            %loan_id,
            recalled_rate,
            lent_rate,
            market_rate,
            "bought in recall"
        );
        events.log(Event::BoughtIn {
            tick,
            recall_id,
            demand_id,
            loan_id,
            reentered_demand_id,
            recalled_rate,
            lent_rate,
        });
        bought_in += 1;
    }

    Ok(bought_in)
}

/// Turn recalls the market no longer justifies back into loans
///
/// A recall is stale while the highest recall rate exceeds both the market
/// rate and the minimum borrower rate. The borrower keeps the share at its
/// original rate.
pub fn cancel_stale_recalls(
    state: &mut MarketState,
    tie_breaker: &mut dyn TieBreaker,
    events: &mut EventLog,
    tick: usize,
) -> Result<usize, MarketError> {
    let mut cancelled = 0;

    loop {
        let threshold = state
            .market_rate()
            .max(RateOracle::of(state).min_borrower_rate());
        if state.recalls().max_rate() <= threshold {
            break;
        }

        let recall_id = state
            .recalls()
            .top_recall(tie_breaker)
            .ok_or(MarketError::EmptyLedgerQuery("top_recall"))?;
        let notice = state.recalls_mut().remove(recall_id)?;
        let rate = notice.reservation_rate();
        let loan_id = state.loans_mut().add(rate);

        debug!(tick, %recall_id, %loan_id, rate, threshold, "cancelled recall");
        events.log(Event::RecallCancelled {
            tick,
            recall_id,
            loan_id,
            rate,
        });
        cancelled += 1;
    }

    Ok(cancelled)
}

/// Recall every loan priced strictly below the best outstanding demand
///
/// The threshold is read once, before any loan moves.
pub fn issue_recalls(
    state: &mut MarketState,
    events: &mut EventLog,
    tick: usize,
) -> Result<usize, MarketError> {
    let threshold = state.demand().max_rate();
    let recallable = state.loans().priced_below(threshold);

    for loan_id in &recallable {
        let loan = state.loans_mut().remove(*loan_id)?;
        let rate = loan.reservation_rate();
        let recall_id = state.recalls_mut().add(rate, tick);

        debug!(tick, %loan_id, %recall_id, rate, threshold, "recalled loan");
        events.log(Event::Recalled {
            tick,
            loan_id: *loan_id,
            recall_id,
            rate,
        });
    }

    Ok(recallable.len())
}
