//! Serde model of a scenario document
//!
//! Month keys may be month numbers or period tokens (`q2`, `h2`, custom
//! names); they stay symbolic until resolution.

use crate::events::ScenarioEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Horizon used when neither a scenario nor any ancestor sets `months`
pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// A month given either by number or by period token
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthRef {
    Number(i64),
    Name(String),
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthRef::Number(n) => write!(f, "{}", n),
            MonthRef::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for MonthRef {
    fn from(month: i64) -> Self {
        MonthRef::Number(month)
    }
}

impl From<&str> for MonthRef {
    fn from(name: &str) -> Self {
        MonthRef::Name(name.to_string())
    }
}

/// Sparse control points for one input key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// month → value
    pub points: BTreeMap<u32, Decimal>,

    /// `step` or `linear`; validated at resolution
    #[serde(default = "default_trajectory_mode")]
    pub mode: String,
}

fn default_trajectory_mode() -> String {
    "step".to_string()
}

/// Override values keyed by input name
pub type ValueMap = BTreeMap<String, Decimal>;

/// Full scenario document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,

    pub description: String,

    /// Horizon in months; inherited from the parent when unset
    pub months: Option<u32>,

    /// Parent scenario name
    pub extends: Option<String>,

    /// Named periods: name → months (the first month is the period's start)
    pub periods: BTreeMap<String, Vec<u32>>,

    /// Agent name → launch month or period token
    pub agent_launches: BTreeMap<String, MonthRef>,

    pub baseline: ValueMap,

    pub trajectories: BTreeMap<String, TrajectoryConfig>,

    /// Persistent overrides from a month onward
    pub changes: BTreeMap<MonthRef, ValueMap>,

    /// Overrides for a single month only
    pub impulses: BTreeMap<MonthRef, ValueMap>,

    /// Alternative event-list syntax, applied after `changes`/`impulses`
    pub events: Vec<ScenarioEvent>,
}

impl ScenarioConfig {
    /// Create an empty scenario with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Effective horizon
    pub fn horizon_months(&self) -> u32 {
        self.months.unwrap_or(DEFAULT_HORIZON_MONTHS)
    }
}
