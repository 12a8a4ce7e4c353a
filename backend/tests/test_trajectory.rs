//! Tests for trajectory evaluation
//!
//! Clamping at both ends, step holds, exact linear interpolation.

use forecast_core_rs::scenario::{ConfigError, Trajectory, TrajectoryConfig, TrajectoryMode};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn decimal() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64, 0u32..6).prop_map(|(n, scale)| Decimal::new(n, scale))
}

fn points() -> impl Strategy<Value = Vec<(u32, Decimal)>> {
    prop::collection::vec((1u32..60, decimal()), 1..8)
}

fn mode() -> impl Strategy<Value = TrajectoryMode> {
    prop_oneof![Just(TrajectoryMode::Step), Just(TrajectoryMode::Linear)]
}

proptest! {
    #[test]
    fn prop_clamps_before_first_point(points in points(), mode in mode(), offset in 0u32..10) {
        let trajectory = Trajectory::new("key", points, mode).unwrap();
        let (first_month, first_value) = trajectory.points()[0];
        prop_assert_eq!(trajectory.value_at(first_month.saturating_sub(offset)), first_value);
    }

    #[test]
    fn prop_clamps_after_last_point(points in points(), mode in mode(), offset in 0u32..100) {
        let trajectory = Trajectory::new("key", points, mode).unwrap();
        let (last_month, last_value) = *trajectory.points().last().unwrap();
        prop_assert_eq!(trajectory.value_at(last_month + offset), last_value);
    }

    #[test]
    fn prop_step_holds_latest_point(points in points(), month in 1u32..70) {
        let trajectory = Trajectory::new("key", points, TrajectoryMode::Step).unwrap();
        let expected = trajectory
            .points()
            .iter()
            .rev()
            .find(|(m, _)| *m <= month)
            .map(|(_, v)| *v)
            .unwrap_or(trajectory.points()[0].1);
        prop_assert_eq!(trajectory.value_at(month), expected);
    }

    #[test]
    fn prop_linear_midpoint_is_exact(a in decimal(), b in decimal(), start in 1u32..20, half_span in 1u32..12) {
        let end = start + 2 * half_span;
        let trajectory = Trajectory::new("key", [(start, a), (end, b)], TrajectoryMode::Linear).unwrap();
        prop_assert_eq!(trajectory.value_at(start + half_span), (a + b) / dec!(2));
    }
}

#[test]
fn test_step_between_points() {
    let trajectory = Trajectory::new(
        "sofr",
        [(1, dec!(0.04)), (4, dec!(0.035)), (7, dec!(0.03))],
        TrajectoryMode::Step,
    )
    .unwrap();

    assert_eq!(trajectory.value_at(3), dec!(0.04));
    assert_eq!(trajectory.value_at(4), dec!(0.035));
    assert_eq!(trajectory.value_at(6), dec!(0.035));
    assert_eq!(trajectory.value_at(12), dec!(0.03));
}

#[test]
fn test_linear_quarter_points() {
    let trajectory = Trajectory::new("x", [(1, dec!(0)), (5, dec!(1))], TrajectoryMode::Linear).unwrap();
    assert_eq!(trajectory.value_at(2), dec!(0.25));
    assert_eq!(trajectory.value_at(3), dec!(0.5));
    assert_eq!(trajectory.value_at(4), dec!(0.75));
}

#[test]
fn test_points_sorted_on_construction() {
    let trajectory = Trajectory::new("x", [(6, dec!(2)), (2, dec!(1))], TrajectoryMode::Step).unwrap();
    assert_eq!(trajectory.points(), &[(2, dec!(1)), (6, dec!(2))]);
    assert_eq!(trajectory.value_at(1), dec!(1));
}

#[test]
fn test_empty_trajectory_rejected() {
    let err = Trajectory::new("sofr", Vec::new(), TrajectoryMode::Step).unwrap_err();
    assert_eq!(err, ConfigError::EmptyTrajectory { key: "sofr".to_string() });
}

#[test]
fn test_unknown_mode_rejected() {
    let config = TrajectoryConfig {
        points: BTreeMap::from([(1, dec!(1))]),
        mode: "cubic".to_string(),
    };
    let err = Trajectory::from_config("sofr", &config).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownTrajectoryMode {
            key: "sofr".to_string(),
            mode: "cubic".to_string()
        }
    );
}
