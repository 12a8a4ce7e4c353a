//! Scenario description and resolution
//!
//! A scenario is a small declarative language: a baseline, interpolated
//! trajectories, cumulative scheduled changes, one-shot impulses, an events
//! list, and optional inheritance from a parent scenario. Resolution turns it
//! into a [`ResolvedScenario`] whose `get_month_inputs` is a pure projection.
//!
//! ```text
//! ScenarioConfig ──(extends, parent resolved first)──► per level:
//!                     PeriodTable / normalize months
//!                     ScenarioEventHandler (set / impulse / agent_launch)
//!                ──► merge_scenarios + merge_schedules (child over parent)
//!                ──► ResolvedScenario::get_month_inputs(month)
//! ```

pub mod config;
pub mod inputs;
pub mod merge;
pub mod periods;
pub mod resolver;
pub mod source;
pub mod trajectory;

use thiserror::Error;

// Re-exports
pub use config::{MonthRef, ScenarioConfig, TrajectoryConfig, DEFAULT_HORIZON_MONTHS};
pub use inputs::{keys, MonthlyInputs};
pub use merge::{merge_scenarios, merge_schedules};
pub use periods::PeriodTable;
pub use resolver::{resolve_scenario, ResolvedScenario, Schedule};
pub use source::{ScenarioLibrary, ScenarioSource};
pub use trajectory::{Trajectory, TrajectoryMode};

/// Malformed or missing scenario/extension configuration
///
/// Always surfaced to the caller; resolution never falls back to a default
/// when one of these occurs.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Trajectory '{key}' has no control points")]
    EmptyTrajectory { key: String },

    #[error("Trajectory '{key}' has unknown mode '{mode}' (expected 'step' or 'linear')")]
    UnknownTrajectoryMode { key: String, mode: String },

    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    #[error("Period '{0}' lists no months")]
    EmptyPeriod(String),

    #[error("Scenario '{scenario}' extends '{parent}', which was not found")]
    MissingParent { scenario: String, parent: String },

    #[error("Scenario inheritance cycle: {}", chain.join(" -> "))]
    InheritanceCycle { chain: Vec<String> },

    #[error("Scenario horizon must be at least one month, got {0}")]
    InvalidHorizon(u32),

    #[error("Invalid configuration for extension '{name}': {reason}")]
    InvalidExtension { name: String, reason: String },

    #[error("Scenario '{name}' could not be loaded: {reason}")]
    ScenarioLoad { name: String, reason: String },
}
