//! Forecast Core - Rust Engine
//!
//! Monthly financial forecast for a stablecoin protocol: supply, revenue,
//! expenses and profit distribution over a horizon of months, driven by
//! declarative scenarios.
//!
//! # Architecture
//!
//! - **core**: Forecast horizon and month calendar
//! - **models**: Pure monthly calculations (rates, agents, supply, revenue, waterfall)
//! - **scenario**: Scenario documents, inheritance and per-month input resolution
//! - **events**: Typed scenario events folded into the schedule
//! - **extensions**: Closed catalogue of monthly adjustments
//! - **orchestrator**: Month loop and results tree
//!
//! # Critical Invariants
//!
//! 1. All money values and rates are `Decimal` (no binary floating point)
//! 2. Months run strictly in order; extension state is per run
//! 3. Missing monthly inputs default to zero

// Module declarations
pub mod core;
pub mod events;
pub mod extensions;
pub mod models;
pub mod orchestrator;
pub mod scenario;

// Re-exports for convenience
pub use crate::core::time::Horizon;
pub use extensions::{
    Extension, ExtensionAdjustment, ExtensionContext, ExtensionKind, ExtensionPhase, ExtensionSet, ExtensionState,
    MonthlyExtension,
};
pub use models::{
    agent::{AgentDefinition, AgentKind},
    rates::RateSet,
};
pub use orchestrator::{
    ForecastEngine, ForecastError, ModelConstants, MonthResult, QuarterResult, ScenarioResults, YearResult,
};
pub use scenario::{resolve_scenario, ConfigError, MonthlyInputs, ResolvedScenario, ScenarioConfig, ScenarioSource};
