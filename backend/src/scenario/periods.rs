//! Symbolic period names
//!
//! Period tokens map to the first month of the period. Custom periods
//! declared by a scenario shadow the built-in quarters and halves.

use crate::scenario::config::MonthRef;
use crate::scenario::ConfigError;
use std::collections::BTreeMap;

/// Built-in periods: quarters and halves of the first year
pub fn default_periods() -> BTreeMap<String, Vec<u32>> {
    [
        ("q1", vec![1, 2, 3]),
        ("q2", vec![4, 5, 6]),
        ("q3", vec![7, 8, 9]),
        ("q4", vec![10, 11, 12]),
        ("h1", vec![1, 2, 3, 4, 5, 6]),
        ("h2", vec![7, 8, 9, 10, 11, 12]),
    ]
    .into_iter()
    .map(|(name, months)| (name.to_string(), months))
    .collect()
}

/// Period lookup: custom entries first, then built-ins
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTable {
    custom: BTreeMap<String, Vec<u32>>,
    builtin: BTreeMap<String, Vec<u32>>,
}

impl PeriodTable {
    pub fn new(custom: BTreeMap<String, Vec<u32>>) -> Self {
        Self {
            custom,
            builtin: default_periods(),
        }
    }

    /// Resolve a month reference to a month number
    ///
    /// Numbers pass through unchanged. Names are looked up as custom periods,
    /// then built-ins, then parsed as an integer.
    ///
    /// # Example
    /// ```
    /// use forecast_core_rs::scenario::{MonthRef, PeriodTable};
    /// use std::collections::BTreeMap;
    ///
    /// let periods = PeriodTable::new(BTreeMap::new());
    /// assert_eq!(periods.resolve(&MonthRef::from("q3")).unwrap(), 7);
    /// assert_eq!(periods.resolve(&MonthRef::from("5")).unwrap(), 5);
    /// assert!(periods.resolve(&MonthRef::from("q5")).is_err());
    /// ```
    pub fn resolve(&self, month: &MonthRef) -> Result<i64, ConfigError> {
        let name = match month {
            MonthRef::Number(n) => return Ok(*n),
            MonthRef::Name(name) => name,
        };

        if let Some(months) = self.custom.get(name).or_else(|| self.builtin.get(name)) {
            return months
                .first()
                .map(|first| i64::from(*first))
                .ok_or_else(|| ConfigError::EmptyPeriod(name.clone()));
        }

        name.trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::UnknownPeriod(name.clone()))
    }

    /// Resolve a reference that names a scheduling month; months before 1
    /// are clamped to 0
    pub fn resolve_month(&self, month: &MonthRef) -> Result<u32, ConfigError> {
        let month = self.resolve(month)?;
        Ok(u32::try_from(month.max(0)).unwrap_or(u32::MAX))
    }

    /// All periods visible to the scenario, custom entries winning
    pub fn merged(&self) -> BTreeMap<String, Vec<u32>> {
        let mut merged = self.builtin.clone();
        for (name, months) in &self.custom {
            merged.insert(name.clone(), months.clone());
        }
        merged
    }
}
