//! Trajectory evaluation
//!
//! A trajectory turns sparse (month → value) control points into a value for
//! any month. Queries outside the control points clamp to the nearest
//! boundary; between points the value either holds (`step`) or is linearly
//! interpolated (`linear`) in exact decimal arithmetic.

use crate::scenario::config::TrajectoryConfig;
use crate::scenario::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Interpolation between control points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryMode {
    /// Hold the latest point at or before the month
    Step,
    /// Interpolate linearly between the surrounding points
    Linear,
}

impl FromStr for TrajectoryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "step" => Ok(TrajectoryMode::Step),
            "linear" => Ok(TrajectoryMode::Linear),
            other => Err(other.to_string()),
        }
    }
}

impl TrajectoryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrajectoryMode::Step => "step",
            TrajectoryMode::Linear => "linear",
        }
    }
}

/// Validated trajectory with control points sorted by month
///
/// Serializes in its configured form; deserializing re-runs validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryConfig", into = "TrajectoryConfig")]
pub struct Trajectory {
    points: Vec<(u32, Decimal)>,
    mode: TrajectoryMode,
}

impl Trajectory {
    /// Build a trajectory; at least one control point is required
    ///
    /// # Example
    /// ```
    /// use forecast_core_rs::scenario::{Trajectory, TrajectoryMode};
    /// use rust_decimal_macros::dec;
    ///
    /// let t = Trajectory::new("sofr", [(1, dec!(0.04)), (5, dec!(0.03))], TrajectoryMode::Linear).unwrap();
    /// assert_eq!(t.value_at(3), dec!(0.035));
    /// assert_eq!(t.value_at(9), dec!(0.03));
    /// ```
    pub fn new(
        key: &str,
        points: impl IntoIterator<Item = (u32, Decimal)>,
        mode: TrajectoryMode,
    ) -> Result<Self, ConfigError> {
        let mut points: Vec<(u32, Decimal)> = points.into_iter().collect();
        if points.is_empty() {
            return Err(ConfigError::EmptyTrajectory {
                key: key.to_string(),
            });
        }
        points.sort_by_key(|(month, _)| *month);
        points.dedup_by_key(|(month, _)| *month);
        Ok(Self { points, mode })
    }

    /// Validate a configured trajectory for input `key`
    pub fn from_config(key: &str, config: &TrajectoryConfig) -> Result<Self, ConfigError> {
        let mode = config
            .mode
            .parse::<TrajectoryMode>()
            .map_err(|mode| ConfigError::UnknownTrajectoryMode {
                key: key.to_string(),
                mode,
            })?;
        Self::new(key, config.points.iter().map(|(m, v)| (*m, *v)), mode)
    }

    pub fn mode(&self) -> TrajectoryMode {
        self.mode
    }

    pub fn points(&self) -> &[(u32, Decimal)] {
        &self.points
    }

    /// Value of the trajectory at `month`
    pub fn value_at(&self, month: u32) -> Decimal {
        // Non-empty by construction
        let (first_month, first_value) = self.points[0];
        let (last_month, last_value) = self.points[self.points.len() - 1];

        if month <= first_month {
            return first_value;
        }
        if month >= last_month {
            return last_value;
        }

        // first_month < month < last_month: a bracketing pair exists
        let next_idx = self.points.partition_point(|(m, _)| *m <= month);
        let (prev_month, prev_value) = self.points[next_idx - 1];
        let (next_month, next_value) = self.points[next_idx];

        match self.mode {
            TrajectoryMode::Step => prev_value,
            TrajectoryMode::Linear => {
                let elapsed = Decimal::from(month - prev_month);
                let span = Decimal::from(next_month - prev_month);
                prev_value + (next_value - prev_value) * elapsed / span
            }
        }
    }
}

impl TryFrom<TrajectoryConfig> for Trajectory {
    type Error = ConfigError;

    fn try_from(config: TrajectoryConfig) -> Result<Self, Self::Error> {
        Self::from_config("(unnamed)", &config)
    }
}

impl From<Trajectory> for TrajectoryConfig {
    fn from(trajectory: Trajectory) -> Self {
        TrajectoryConfig {
            points: trajectory.points.into_iter().collect(),
            mode: trajectory.mode.as_str().to_string(),
        }
    }
}
