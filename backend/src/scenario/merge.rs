//! Scenario inheritance merge
//!
//! Child wins on every conflict, at the granularity each section allows:
//!
//! - `baseline`: per key
//! - `changes` / `impulses`: per month, then per key within the month
//! - `trajectories` / `agent_launches`: whole entry
//! - `periods`: built-ins, then parent, then child
//!
//! Scheduled sections are merged only after each level has resolved its own
//! month references and folded its own events (see [`merge_schedules`]), so
//! a period token in the parent and a number in the child land on the same
//! month.

use crate::scenario::config::{ScenarioConfig, ValueMap};
use crate::scenario::periods::default_periods;
use crate::scenario::resolver::Schedule;
use std::collections::BTreeMap;

fn merge_month_maps(
    parent: &BTreeMap<u32, ValueMap>,
    child: &BTreeMap<u32, ValueMap>,
) -> BTreeMap<u32, ValueMap> {
    let mut merged = parent.clone();
    for (month, values) in child {
        let entry = merged.entry(*month).or_default();
        for (key, value) in values {
            entry.insert(key.clone(), *value);
        }
    }
    merged
}

fn overlay<K: Ord + Clone, V: Clone>(parent: &BTreeMap<K, V>, child: &BTreeMap<K, V>) -> BTreeMap<K, V> {
    let mut merged = parent.clone();
    merged.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Merge the unscheduled sections of `child` over `parent`
///
/// The result carries the child's name, no `extends`, and the first
/// non-empty description and horizon walking from child to parent. Its
/// `changes`, `impulses`, `agent_launches` and `events` are empty; those
/// are merged as resolved schedules by [`merge_schedules`].
pub fn merge_scenarios(parent: &ScenarioConfig, child: &ScenarioConfig) -> ScenarioConfig {
    let mut periods = default_periods();
    periods.extend(parent.periods.clone());
    periods.extend(child.periods.clone());

    ScenarioConfig {
        name: child.name.clone(),
        description: if child.description.is_empty() {
            parent.description.clone()
        } else {
            child.description.clone()
        },
        months: child.months.or(parent.months),
        extends: None,
        periods,
        baseline: overlay(&parent.baseline, &child.baseline),
        trajectories: overlay(&parent.trajectories, &child.trajectories),
        ..ScenarioConfig::default()
    }
}

/// Lay a child's resolved schedule over its parent's
pub fn merge_schedules(parent: &Schedule, child: &Schedule) -> Schedule {
    Schedule {
        changes: merge_month_maps(&parent.changes, &child.changes),
        impulses: merge_month_maps(&parent.impulses, &child.impulses),
        agent_launches: overlay(&parent.agent_launches, &child.agent_launches),
    }
}
