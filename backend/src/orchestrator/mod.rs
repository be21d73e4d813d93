//! Orchestrator - the per-tick matching loop
//!
//! See `engine.rs` for the full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{MarketConfig, MarketSnapshot, MatchingEngine, StepActivity};
