//! Orchestrator - month loop and results tree
//!
//! See `engine.rs` for the month pipeline.

pub mod engine;
pub mod results;

// Re-export main types for convenience
pub use engine::{BackstopLedger, ForecastEngine, ForecastError, ModelConstants};
pub use results::{MonthResult, QuarterResult, ScenarioResults, YearResult};
