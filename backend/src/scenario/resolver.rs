//! Scenario resolution and monthly input projection
//!
//! Resolution order, for each level of `extends` starting at the root:
//! 1. Build the level's period table (built-ins, ancestors, then its own)
//! 2. Normalize its launch months, `changes` and `impulses` to month numbers
//! 3. Fold its events list into that schedule
//! 4. Lay the schedule over the parent's, child winning per month and key
//!
//! Trajectories are validated once the chain is flattened.
//!
//! Monthly projection order, each layer overwriting the previous key by key:
//! baseline → trajectories → changes at months ≤ m (ascending) → impulses at m.

use crate::core::Horizon;
use crate::events::ScenarioEventHandler;
use crate::models::agent::AgentLaunchMap;
use crate::scenario::config::{MonthRef, ScenarioConfig, ValueMap};
use crate::scenario::inputs::MonthlyInputs;
use crate::scenario::merge::{merge_scenarios, merge_schedules};
use crate::scenario::periods::PeriodTable;
use crate::scenario::source::ScenarioSource;
use crate::scenario::trajectory::Trajectory;
use crate::scenario::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Month-keyed scheduling maps produced by normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// month → overrides that persist from that month onward
    pub changes: BTreeMap<u32, ValueMap>,
    /// month → overrides for that month only
    pub impulses: BTreeMap<u32, ValueMap>,
    pub agent_launches: AgentLaunchMap,
}

/// Fully resolved scenario, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScenario {
    pub name: String,
    pub description: String,
    pub months: u32,
    pub periods: BTreeMap<String, Vec<u32>>,
    pub agent_launches: AgentLaunchMap,
    pub baseline: ValueMap,
    pub trajectories: BTreeMap<String, Trajectory>,
    pub changes: BTreeMap<u32, ValueMap>,
    pub impulses: BTreeMap<u32, ValueMap>,
}

impl ResolvedScenario {
    pub fn horizon(&self) -> Horizon {
        Horizon::new(self.months)
    }

    /// Resolved inputs for `month`
    ///
    /// Pure: repeated calls for the same month return equal results.
    pub fn get_month_inputs(&self, month: u32) -> MonthlyInputs {
        let mut inputs = MonthlyInputs::from(self.baseline.clone());

        for (key, trajectory) in &self.trajectories {
            inputs.set(key.clone(), trajectory.value_at(month));
        }

        for (_, values) in self.changes.range(..=month) {
            inputs.apply(values);
        }

        if let Some(values) = self.impulses.get(&month) {
            inputs.apply(values);
        }

        inputs
    }

    /// Whether any layer of the scenario ever sets `key`
    pub fn mentions(&self, key: &str) -> bool {
        self.baseline.contains_key(key)
            || self.trajectories.contains_key(key)
            || self.changes.values().any(|values| values.contains_key(key))
            || self.impulses.values().any(|values| values.contains_key(key))
    }

    /// Value of `key` in the baseline, zero when absent
    pub fn baseline_value(&self, key: &str) -> Decimal {
        self.baseline.get(key).copied().unwrap_or(Decimal::ZERO)
    }
}

/// One level of the inheritance chain, resolved against its own periods
struct ResolvedLayer {
    /// Unscheduled sections merged down the chain
    config: ScenarioConfig,
    schedule: Schedule,
    events_applied: usize,
}

fn normalize_month_map(
    periods: &PeriodTable,
    map: &BTreeMap<MonthRef, ValueMap>,
) -> Result<BTreeMap<u32, ValueMap>, ConfigError> {
    let mut normalized: BTreeMap<u32, ValueMap> = BTreeMap::new();
    for (month, values) in map {
        let month = periods.resolve_month(month)?;
        let entry = normalized.entry(month).or_default();
        entry.extend(values.iter().map(|(k, v)| (k.clone(), *v)));
    }
    Ok(normalized)
}

/// Schedule written by `config` itself: launches, changes and impulses,
/// then its events in list order
fn own_schedule(config: &ScenarioConfig, periods: &PeriodTable) -> Result<(Schedule, usize), ConfigError> {
    let mut agent_launches = AgentLaunchMap::new();
    for (agent, month) in &config.agent_launches {
        agent_launches.insert(agent.clone(), periods.resolve_month(month)?);
    }

    let mut schedule = Schedule {
        changes: normalize_month_map(periods, &config.changes)?,
        impulses: normalize_month_map(periods, &config.impulses)?,
        agent_launches,
    };
    let applied = ScenarioEventHandler::new(config.events.clone()).apply_all(periods, &mut schedule)?;
    Ok((schedule, applied))
}

/// Resolve `config` and its ancestors, parent first
///
/// Each parent is resolved completely (its own periods, its own events)
/// before the child's schedule is laid over it.
fn resolve_layer(
    config: &ScenarioConfig,
    source: &dyn ScenarioSource,
    chain: &mut Vec<String>,
) -> Result<ResolvedLayer, ConfigError> {
    if chain.contains(&config.name) {
        let mut cycle = chain.clone();
        cycle.push(config.name.clone());
        return Err(ConfigError::InheritanceCycle { chain: cycle });
    }

    let parent = match &config.extends {
        Some(parent_name) => {
            chain.push(config.name.clone());
            let parent = source
                .load(parent_name)?
                .ok_or_else(|| ConfigError::MissingParent {
                    scenario: config.name.clone(),
                    parent: parent_name.clone(),
                })?;
            debug!(scenario = %config.name, parent = %parent_name, "resolving parent scenario");
            let layer = resolve_layer(&parent, source, chain)?;
            chain.pop();
            Some(layer)
        }
        None => None,
    };

    let merged = match &parent {
        Some(parent) => merge_scenarios(&parent.config, config),
        None => merge_scenarios(&ScenarioConfig::default(), config),
    };
    let periods = PeriodTable::new(merged.periods.clone());
    let (own, applied) = own_schedule(config, &periods)?;

    Ok(match parent {
        Some(parent) => ResolvedLayer {
            config: merged,
            schedule: merge_schedules(&parent.schedule, &own),
            events_applied: parent.events_applied + applied,
        },
        None => ResolvedLayer {
            config: merged,
            schedule: own,
            events_applied: applied,
        },
    })
}

/// Resolve a scenario into a concrete per-month input set
///
/// `source` supplies parents for `extends`. Any configuration error aborts
/// resolution; no partial scenario is returned.
pub fn resolve_scenario(
    config: &ScenarioConfig,
    source: &dyn ScenarioSource,
) -> Result<ResolvedScenario, ConfigError> {
    let ResolvedLayer {
        config,
        schedule,
        events_applied,
    } = resolve_layer(config, source, &mut Vec::new())?;

    let months = config.horizon_months();
    if months == 0 {
        return Err(ConfigError::InvalidHorizon(months));
    }

    let periods = PeriodTable::new(config.periods.clone());

    let trajectories = config
        .trajectories
        .iter()
        .map(|(key, trajectory)| {
            Trajectory::from_config(key, trajectory).map(|compiled| (key.clone(), compiled))
        })
        .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

    info!(
        scenario = %config.name,
        months,
        events = events_applied,
        trajectories = trajectories.len(),
        "scenario resolved"
    );

    Ok(ResolvedScenario {
        name: config.name,
        description: config.description,
        months,
        periods: periods.merged(),
        agent_launches: schedule.agent_launches,
        baseline: config.baseline,
        trajectories,
        changes: schedule.changes,
        impulses: schedule.impulses,
    })
}
