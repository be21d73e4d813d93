//! Scenario files
//!
//! ```json
//! {
//!   "market": { "recall_age": 1, "available_shares": 15, "loans": [1] },
//!   "ticks": [ { "demand": [2, 3] }, { "demand": [3, 5], "returns": [0] } ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use sl_market_core_rs::{LoanId, MarketConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub market: MarketConfig,

    #[serde(default)]
    pub ticks: Vec<TickInput>,
}

/// What the driver feeds the engine on one tick
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub demand: Vec<f64>,

    /// Raw handles of loans being returned
    pub returns: Vec<u64>,
}

impl TickInput {
    pub fn loan_ids(&self) -> Vec<LoanId> {
        self.returns.iter().copied().map(LoanId::from).collect()
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
