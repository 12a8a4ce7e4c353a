//! Scenario event types
//!
//! Events are an alternative, list-shaped syntax for scheduling inputs.
//! They are configured in YAML alongside `changes`/`impulses` and folded into
//! those maps during resolution.
//!
//! # Design Principles
//!
//! 1. **Ordered**: events apply in list order; a later event for the same key
//!    and month overrides an earlier one
//! 2. **Symbolic months**: `month` may be a number or a period token
//! 3. **Self-contained**: each event carries all the data it applies

use crate::scenario::config::{MonthRef, ValueMap};
use serde::{Deserialize, Serialize};

/// A scheduled scenario event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// Persistent override from `month` onward
    ///
    /// # Example
    /// Rate cut in Q3: `{type: set, month: q3, values: {sofr: 0.035}}`
    Set {
        month: MonthRef,
        #[serde(default)]
        values: ValueMap,
    },

    /// Override for `month` only
    ///
    /// # Example
    /// One-off withdrawal: `{type: impulse, month: 6, values: {backstop_withdrawal: 5000000}}`
    Impulse {
        month: MonthRef,
        #[serde(default)]
        values: ValueMap,
    },

    /// Launch an agent at `month`
    AgentLaunch { month: MonthRef, agent: String },
}

impl ScenarioEvent {
    /// Month reference this event is scheduled at
    pub fn month(&self) -> &MonthRef {
        match self {
            ScenarioEvent::Set { month, .. }
            | ScenarioEvent::Impulse { month, .. }
            | ScenarioEvent::AgentLaunch { month, .. } => month,
        }
    }
}
