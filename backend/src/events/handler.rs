//! Scenario event normalization
//!
//! This module handles:
//! - Resolving each event's month through the period table
//! - Folding events into the cumulative, one-shot and launch schedules

use crate::events::types::ScenarioEvent;
use crate::scenario::periods::PeriodTable;
use crate::scenario::resolver::Schedule;
use crate::scenario::ConfigError;
use tracing::debug;

/// Folds a scenario's events into its schedule
pub struct ScenarioEventHandler {
    events: Vec<ScenarioEvent>,
}

impl ScenarioEventHandler {
    /// Create a new handler with the given events, in application order
    pub fn new(events: Vec<ScenarioEvent>) -> Self {
        Self { events }
    }

    /// Apply every event to `schedule` in list order
    ///
    /// Returns the number of events applied, or the first period that fails
    /// to resolve.
    pub fn apply_all(
        &self,
        periods: &PeriodTable,
        schedule: &mut Schedule,
    ) -> Result<usize, ConfigError> {
        for event in &self.events {
            event.apply(periods, schedule)?;
        }
        Ok(self.events.len())
    }
}

impl ScenarioEvent {
    /// Apply this event to `schedule`
    pub fn apply(&self, periods: &PeriodTable, schedule: &mut Schedule) -> Result<(), ConfigError> {
        let month = periods.resolve_month(self.month())?;

        match self {
            ScenarioEvent::Set { values, .. } => {
                debug!(month, keys = values.len(), "event: set");
                let entry = schedule.changes.entry(month).or_default();
                entry.extend(values.iter().map(|(k, v)| (k.clone(), *v)));
            }
            ScenarioEvent::Impulse { values, .. } => {
                debug!(month, keys = values.len(), "event: impulse");
                let entry = schedule.impulses.entry(month).or_default();
                entry.extend(values.iter().map(|(k, v)| (k.clone(), *v)));
            }
            ScenarioEvent::AgentLaunch { agent, .. } => {
                debug!(month, agent = %agent, "event: agent launch");
                schedule.agent_launches.insert(agent.clone(), month);
            }
        }

        Ok(())
    }
}
