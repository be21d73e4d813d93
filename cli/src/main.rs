//! Scenario driver for the securities-lending matching engine
//!
//! Reads a JSON scenario, feeds it to the engine tick by tick and reports
//! every snapshot, either through the log or as JSON lines on stdout.

mod scenario;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::scenario::Scenario;
use sl_market_core_rs::MatchingEngine;

#[derive(Debug, Parser)]
#[command(name = "sl-market", version, about = "Replay a securities-lending scenario")]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Override the tie-break seed from the scenario
    #[arg(long)]
    seed: Option<u64>,

    /// Print each snapshot as a JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(&args.log_level);

    let mut scenario = Scenario::load(&args.scenario)?;
    if let Some(seed) = args.seed {
        scenario.market.rng_seed = seed;
    }

    let mut engine =
        MatchingEngine::new(scenario.market.clone()).context("invalid market configuration")?;
    info!(
        ticks = scenario.ticks.len(),
        total_shares = engine.total_shares(),
        recall_age = engine.recall_age(),
        "scenario loaded"
    );

    let mut event_count = 0;
    for (index, input) in scenario.ticks.iter().enumerate() {
        let snapshot = engine
            .step(&input.demand, &input.loan_ids())
            .with_context(|| format!("scenario tick {} rejected", index))?;

        if args.json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            info!("\n{}", snapshot);
        }
        event_count += engine.drain_events().len();
    }

    info!(
        final_tick = engine.current_tick(),
        market_rate = engine.market_rate(),
        events = event_count,
        "scenario complete"
    );
    Ok(())
}
