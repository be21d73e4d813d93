//! Event logging for market replay and auditing.
//!
//! Every share movement the engine makes is recorded as an [`Event`]. The
//! log is the audit trail behind each snapshot: the snapshot says how many
//! shares moved, the log says which ones.
//!
//! # Event Types
//!
//! - **DemandArrived**: a new borrow order entered the demand ledger
//! - **LoanReturned**: a borrower handed a share back
//! - **LentFromAvailable**: an idle share was lent to the top demand
//! - **BoughtIn**: a mature recall was bought in and lent to the top demand
//! - **RecallCancelled**: a recall was abandoned and became a loan again
//! - **Recalled**: an under-priced loan was put under recall

use crate::models::ids::{DemandId, LoanId, RecallId};
use serde::Serialize;

/// Market event capturing a single share movement.
///
/// Events are logged in the order they occur within a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    DemandArrived {
        tick: usize,
        demand_id: DemandId,
        rate: f64,
    },

    LoanReturned {
        tick: usize,
        loan_id: LoanId,
        rate: f64,
    },

    LentFromAvailable {
        tick: usize,
        demand_id: DemandId,
        loan_id: LoanId,
        rate: f64,
    },

    /// The recalled lender re-enters as `reentered_demand_id` at the
    /// recalled rate; the top demand becomes `loan_id` at its own rate.
    BoughtIn {
        tick: usize,
        recall_id: RecallId,
        demand_id: DemandId,
        loan_id: LoanId,
        reentered_demand_id: DemandId,
        recalled_rate: f64,
        lent_rate: f64,
    },

    RecallCancelled {
        tick: usize,
        recall_id: RecallId,
        loan_id: LoanId,
        rate: f64,
    },

    Recalled {
        tick: usize,
        loan_id: LoanId,
        recall_id: RecallId,
        rate: f64,
    },
}

impl Event {
    /// Get the tick number when this event occurred
    pub fn tick(&self) -> usize {
        match self {
            Event::DemandArrived { tick, .. } => *tick,
            Event::LoanReturned { tick, .. } => *tick,
            Event::LentFromAvailable { tick, .. } => *tick,
            Event::BoughtIn { tick, .. } => *tick,
            Event::RecallCancelled { tick, .. } => *tick,
            Event::Recalled { tick, .. } => *tick,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::DemandArrived { .. } => "DemandArrived",
            Event::LoanReturned { .. } => "LoanReturned",
            Event::LentFromAvailable { .. } => "LentFromAvailable",
            Event::BoughtIn { .. } => "BoughtIn",
            Event::RecallCancelled { .. } => "RecallCancelled",
            Event::Recalled { .. } => "Recalled",
        }
    }

    /// Loan created or consumed by this event, if any
    pub fn loan_id(&self) -> Option<LoanId> {
        match self {
            Event::DemandArrived { .. } => None,
            Event::LoanReturned { loan_id, .. }
            | Event::LentFromAvailable { loan_id, .. }
            | Event::BoughtIn { loan_id, .. }
            | Event::RecallCancelled { loan_id, .. }
            | Event::Recalled { loan_id, .. } => Some(*loan_id),
        }
    }
}

/// Append-only log of market events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Every event that touched `loan_id`
    pub fn events_for_loan(&self, loan_id: LoanId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.loan_id() == Some(loan_id))
            .collect()
    }
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Take every logged event, leaving the log empty
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        let mut log = EventLog::new();
        log.log(Event::DemandArrived {
            tick: 0,
            demand_id: DemandId::new(0),
            rate: 3.0,
        });
        log.log(Event::LentFromAvailable {
            tick: 0,
            demand_id: DemandId::new(0),
            loan_id: LoanId::new(4),
            rate: 3.0,
        });
        log.log(Event::Recalled {
            tick: 1,
            loan_id: LoanId::new(4),
            recall_id: RecallId::new(0),
            rate: 3.0,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at_tick(0).len(), 2);
        assert_eq!(log.events_of_type("Recalled").len(), 1);
        assert_eq!(log.events_for_loan(LoanId::new(4)).len(), 2);
    }

    #[test]
    fn test_drain_empties_log() {
        let mut log = EventLog::new();
        log.log(Event::DemandArrived {
            tick: 0,
            demand_id: DemandId::new(0),
            rate: 1.0,
        });
        log.log(Event::DemandArrived {
            tick: 1,
            demand_id: DemandId::new(1),
            rate: 2.0,
        });

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].tick(), 1);
        assert!(log.is_empty());

        log.log(drained[0].clone());
        log.clear();
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_serialized_with_type_tag() {
        let event = Event::RecallCancelled {
            tick: 7,
            recall_id: RecallId::new(2),
            loan_id: LoanId::new(9),
            rate: 4.5,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "RecallCancelled");
        assert_eq!(json["tick"], 7);
        assert_eq!(json["recall_id"], 2);
        assert_eq!(json["loan_id"], 9);
        assert_eq!(json["rate"], 4.5);
    }
}
