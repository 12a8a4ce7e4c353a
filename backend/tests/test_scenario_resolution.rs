//! Tests for scenario resolution
//!
//! Inheritance, period tokens, events, layering order of monthly inputs.

use forecast_core_rs::scenario::{
    keys, resolve_scenario, ConfigError, MonthRef, ScenarioConfig, ScenarioLibrary, ScenarioSource,
};
use rust_decimal_macros::dec;
use serde_json::json;

fn scenario(value: serde_json::Value) -> ScenarioConfig {
    serde_json::from_value(value).unwrap()
}

fn base() -> ScenarioConfig {
    scenario(json!({
        "name": "base",
        "description": "Base case",
        "months": 12,
        "baseline": { "sofr": 0.04, "base_usds": 1000000000, "security_rate": 0.1 },
        "changes": { "3": { "sofr": 0.035, "tier2_ratio": 0.2 } },
        "agent_launches": { "spark": 1, "grove": "q3" }
    }))
}

#[test]
fn test_child_overrides_only_named_baseline_key() {
    let child = scenario(json!({
        "name": "low_rates",
        "extends": "base",
        "baseline": { "sofr": 0.02 }
    }));
    let library = ScenarioLibrary::new().with(base());

    let resolved = resolve_scenario(&child, &library).unwrap();

    assert_eq!(resolved.name, "low_rates");
    assert_eq!(resolved.description, "Base case");
    assert_eq!(resolved.months, 12);
    assert_eq!(resolved.baseline[keys::SOFR], dec!(0.02));
    assert_eq!(resolved.baseline[keys::BASE_USDS], dec!(1000000000));
    assert_eq!(resolved.baseline[keys::SECURITY_RATE], dec!(0.1));
    assert_eq!(resolved.agent_launches["grove"], 7);
}

#[test]
fn test_same_month_changes_combine_child_wins_collisions() {
    let child = scenario(json!({
        "name": "child",
        "extends": "base",
        "changes": { "3": { "sofr": 0.03, "tier3_ratio": 0.1 } }
    }));
    let library = ScenarioLibrary::new().with(base());

    let resolved = resolve_scenario(&child, &library).unwrap();
    let month3 = &resolved.changes[&3];
    assert_eq!(month3[keys::SOFR], dec!(0.03));
    assert_eq!(month3[keys::TIER2_RATIO], dec!(0.2));
    assert_eq!(month3[keys::TIER3_RATIO], dec!(0.1));
}

#[test]
fn test_child_month_number_beats_parent_period_token() {
    let parent = scenario(json!({
        "name": "parent",
        "baseline": { "sofr": 0.04 },
        "changes": { "q2": { "sofr": 0.03, "tier2_ratio": 0.2 } }
    }));
    let library = ScenarioLibrary::new().with(parent);

    let json_child = scenario(json!({
        "name": "json_child",
        "extends": "parent",
        "changes": { "4": { "sofr": 0.01 } }
    }));
    let mut typed_child = ScenarioConfig::new("typed_child");
    typed_child.extends = Some("parent".to_string());
    typed_child
        .changes
        .insert(MonthRef::Number(4), [(keys::SOFR.to_string(), dec!(0.01))].into());

    for child in [json_child, typed_child] {
        let resolved = resolve_scenario(&child, &library).unwrap();
        let month4 = resolved.get_month_inputs(4);
        assert_eq!(month4.get(keys::SOFR), dec!(0.01));
        assert_eq!(month4.get(keys::TIER2_RATIO), dec!(0.2));
        assert_eq!(resolved.changes.len(), 1);
    }
}

#[test]
fn test_parent_token_loses_to_child_token_for_same_month() {
    let parent = scenario(json!({
        "name": "parent",
        "changes": { "4": { "sofr": 0.03 } }
    }));
    let child = scenario(json!({
        "name": "child",
        "extends": "parent",
        "changes": { "q2": { "sofr": 0.01 } }
    }));
    let library = ScenarioLibrary::new().with(parent);

    let resolved = resolve_scenario(&child, &library).unwrap();
    assert_eq!(resolved.get_month_inputs(4).get(keys::SOFR), dec!(0.01));
}

#[test]
fn test_parent_set_event_does_not_override_child_changes() {
    let parent = scenario(json!({
        "name": "parent",
        "baseline": { "sofr": 0.04 },
        "events": [
            { "type": "set", "month": 4, "values": { "sofr": 0.03, "security_rate": 0.1 } },
            { "type": "impulse", "month": 6, "values": { "backstop_withdrawal": 5 } }
        ]
    }));
    let child = scenario(json!({
        "name": "child",
        "extends": "parent",
        "changes": { "4": { "sofr": 0.01 } },
        "impulses": { "6": { "backstop_withdrawal": 7 } }
    }));
    let library = ScenarioLibrary::new().with(parent);

    let resolved = resolve_scenario(&child, &library).unwrap();
    let month4 = resolved.get_month_inputs(4);
    assert_eq!(month4.get(keys::SOFR), dec!(0.01));
    assert_eq!(month4.get(keys::SECURITY_RATE), dec!(0.1));
    assert_eq!(resolved.get_month_inputs(6).get(keys::BACKSTOP_WITHDRAWAL), dec!(7));
}

#[test]
fn test_child_events_override_parent_and_own_changes() {
    let parent = scenario(json!({
        "name": "parent",
        "changes": { "4": { "sofr": 0.03 } }
    }));
    let child = scenario(json!({
        "name": "child",
        "extends": "parent",
        "changes": { "4": { "sofr": 0.02 } },
        "events": [{ "type": "set", "month": "q2", "values": { "sofr": 0.01 } }]
    }));
    let library = ScenarioLibrary::new().with(parent);

    let resolved = resolve_scenario(&child, &library).unwrap();
    assert_eq!(resolved.get_month_inputs(4).get(keys::SOFR), dec!(0.01));
}

#[test]
fn test_parent_tokens_resolve_against_parent_periods() {
    let parent = scenario(json!({
        "name": "parent",
        "periods": { "launch": [6, 7] },
        "changes": { "launch": { "sofr": 0.03 } },
        "agent_launches": { "spark": "launch" }
    }));
    let child = scenario(json!({
        "name": "child",
        "extends": "parent",
        "periods": { "launch": [9] },
        "impulses": { "launch": { "backstop_withdrawal": 1 } }
    }));
    let library = ScenarioLibrary::new().with(parent);

    let resolved = resolve_scenario(&child, &library).unwrap();
    assert_eq!(resolved.get_month_inputs(6).get(keys::SOFR), dec!(0.03));
    assert_eq!(resolved.agent_launches["spark"], 6);
    assert_eq!(resolved.get_month_inputs(9).get(keys::BACKSTOP_WITHDRAWAL), dec!(1));
    assert_eq!(resolved.periods["launch"], vec![9]);
}

#[test]
fn test_multi_level_inheritance() {
    let middle = scenario(json!({
        "name": "middle",
        "extends": "base",
        "months": 24,
        "baseline": { "base_usds": 2000000000 }
    }));
    let leaf = scenario(json!({
        "name": "leaf",
        "extends": "middle",
        "baseline": { "security_rate": 0.2 }
    }));
    let library = ScenarioLibrary::new().with(base()).with(middle);

    let resolved = resolve_scenario(&leaf, &library).unwrap();
    assert_eq!(resolved.months, 24);
    assert_eq!(resolved.baseline[keys::SOFR], dec!(0.04));
    assert_eq!(resolved.baseline[keys::BASE_USDS], dec!(2000000000));
    assert_eq!(resolved.baseline[keys::SECURITY_RATE], dec!(0.2));
}

#[test]
fn test_missing_parent() {
    let orphan = scenario(json!({ "name": "orphan", "extends": "nowhere" }));
    let err = resolve_scenario(&orphan, &ScenarioLibrary::new()).unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingParent {
            scenario: "orphan".to_string(),
            parent: "nowhere".to_string()
        }
    );
}

#[test]
fn test_inheritance_cycle_detected() {
    let a = scenario(json!({ "name": "a", "extends": "b" }));
    let b = scenario(json!({ "name": "b", "extends": "a" }));
    let library = ScenarioLibrary::new().with(a.clone()).with(b);

    let err = resolve_scenario(&a, &library).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InheritanceCycle {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()]
        }
    );
}

#[test]
fn test_unknown_period_token_aborts() {
    let config = scenario(json!({
        "name": "bad",
        "changes": { "someday": { "sofr": 0.01 } }
    }));
    let err = resolve_scenario(&config, &ScenarioLibrary::new()).unwrap_err();
    assert_eq!(err, ConfigError::UnknownPeriod("someday".to_string()));
}

#[test]
fn test_zero_month_horizon_rejected() {
    let config = scenario(json!({ "name": "empty", "months": 0 }));
    let err = resolve_scenario(&config, &ScenarioLibrary::new()).unwrap_err();
    assert_eq!(err, ConfigError::InvalidHorizon(0));
}

#[test]
fn test_layering_order() {
    let config = scenario(json!({
        "name": "layers",
        "months": 12,
        "baseline": { "sofr": 0.05, "base_usds": 100 },
        "trajectories": {
            "sofr": { "points": { "1": 0.04, "5": 0.02 }, "mode": "linear" }
        },
        "changes": { "q2": { "sofr": 0.01 } },
        "impulses": { "6": { "base_usds": 999, "backstop_withdrawal": 5 } },
        "events": [
            { "type": "set", "month": 8, "values": { "base_usds": 200 } }
        ]
    }));
    let resolved = resolve_scenario(&config, &ScenarioLibrary::new()).unwrap();

    // Trajectory beats baseline
    assert_eq!(resolved.get_month_inputs(1).get(keys::SOFR), dec!(0.04));
    assert_eq!(resolved.get_month_inputs(2).get(keys::SOFR), dec!(0.035));
    // Change from q2 (month 4) beats trajectory and persists
    assert_eq!(resolved.get_month_inputs(4).get(keys::SOFR), dec!(0.01));
    assert_eq!(resolved.get_month_inputs(12).get(keys::SOFR), dec!(0.01));
    // Impulse only for its month
    assert_eq!(resolved.get_month_inputs(6).get(keys::BASE_USDS), dec!(999));
    assert_eq!(resolved.get_month_inputs(6).get(keys::BACKSTOP_WITHDRAWAL), dec!(5));
    assert_eq!(resolved.get_month_inputs(7).get(keys::BASE_USDS), dec!(100));
    assert!(!resolved.get_month_inputs(7).contains(keys::BACKSTOP_WITHDRAWAL));
    // Event-scheduled change persists
    assert_eq!(resolved.get_month_inputs(8).get(keys::BASE_USDS), dec!(200));
    assert_eq!(resolved.get_month_inputs(11).get(keys::BASE_USDS), dec!(200));
}

#[test]
fn test_missing_keys_default_to_zero() {
    let config = scenario(json!({ "name": "sparse", "months": 1 }));
    let resolved = resolve_scenario(&config, &ScenarioLibrary::new()).unwrap();
    let inputs = resolved.get_month_inputs(1);
    assert!(inputs.is_empty());
    assert_eq!(inputs.get(keys::SOFR), dec!(0));
}

#[test]
fn test_get_month_inputs_is_idempotent() {
    let resolved = resolve_scenario(&base(), &ScenarioLibrary::new()).unwrap();
    for month in 1..=12 {
        assert_eq!(resolved.get_month_inputs(month), resolved.get_month_inputs(month));
    }
}

#[test]
fn test_library_is_a_scenario_source() {
    let library = ScenarioLibrary::new().with(base());
    assert!(library.load("base").unwrap().is_some());
    assert!(library.load("other").unwrap().is_none());
}

#[test]
fn test_resolved_scenario_round_trips_through_json() {
    let config = scenario(json!({
        "name": "shaped",
        "baseline": { "sofr": 0.04 },
        "trajectories": { "base_usds": { "points": { "1": 100, "4": 400 }, "mode": "linear" } }
    }));
    let resolved = resolve_scenario(&config, &ScenarioLibrary::new()).unwrap();

    let value = serde_json::to_value(&resolved).unwrap();
    let restored: forecast_core_rs::ResolvedScenario = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(restored, resolved);
    assert_eq!(restored.get_month_inputs(2).get(keys::BASE_USDS), dec!(200));

    let mut emptied = value;
    emptied["trajectories"]["base_usds"]["points"] = json!({});
    assert!(serde_json::from_value::<forecast_core_rs::ResolvedScenario>(emptied).is_err());
}
