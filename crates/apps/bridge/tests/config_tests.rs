//! Configuration file loading

use bridge::{BridgeConfig, ConfigError};
use lighting::{FixtureTarget, Rgb, TriggerSpec};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = r#"{
    "HomeAssistant": {"Url": "http://ha.local:8123", "Token": "secret", "DebugMode": true},
    "LightingOptions": {"directionSharpness": 3.0, "maxDistance": 600, "tickIntervalMs": 100},
    "DayNightCycle": [
        {"hour": 18, "rgb_color": [255, 120, 60], "brightness_pct": 50},
        {"hour": 6, "rgb_color": [255, 200, 150], "brightness_pct": 80}
    ],
    "Lights": [
        {"entity_id": "light.left", "position": {"x": 0, "y": 200}},
        {"entity_id": "light.right", "position": {"x": 0, "y": -200, "z": 30}},
        {"position": {"x": 1}},
        {"entity_id": "light.nowhere"}
    ],
    "Scenarios": [
        {
            "name": "Combat",
            "priority": 10,
            "trigger": {"type": "player_in_combat"},
            "outcome": [
                {"entity_id": "light.left", "rgb_color": [255, 0, 0], "brightness_pct": 100},
                {"entity_id": "light.right", "inherit": true}
            ]
        },
        {
            "name": "Campfire",
            "priority": 5,
            "trigger": {"type": "near_object", "object_type": "fire", "radius": 900},
            "outcome": "not a list"
        },
        {
            "name": "Raining",
            "priority": 1,
            "trigger": {"type": "is_raining"},
            "outcome": []
        }
    ]
}"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_config_loads() {
    let config = BridgeConfig::from_json(FULL_CONFIG).unwrap();

    assert_eq!(config.home_assistant.url, "http://ha.local:8123");
    assert_eq!(config.home_assistant.token, "secret");
    assert!(config.home_assistant.debug_mode);
    assert_eq!(config.tick_interval, Duration::from_millis(100));

    let lighting = &config.lighting;
    assert_eq!(lighting.options().direction_sharpness, 3.0);
    assert_eq!(lighting.options().max_distance, 600.0);
    assert_eq!(lighting.options().smoothing_factor, 0.2);

    let ids: Vec<_> = lighting.fixtures().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["light.left", "light.right"]);
    assert_eq!(lighting.fixtures()[1].position.z, 30.0);

    let hours: Vec<_> = lighting.day_night().keyframes().iter().map(|k| k.hour).collect();
    assert_eq!(hours, [6, 18]);

    let scenarios = lighting.scenarios();
    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0].priority(), 10);
    assert!(matches!(
        scenarios[0].outcome_for("light.left").map(|s| &s.target),
        Some(FixtureTarget::Set(a)) if a.rgb == Rgb::new(255, 0, 0)
    ));
    assert!(scenarios[0].outcome_for("light.right").unwrap().is_inherit());
    assert!(scenarios[1].outcome().is_empty());
    assert_eq!(*scenarios[2].trigger(), TriggerSpec::Unknown);

    assert_eq!(config.unknown_triggers, ["Raining (is_raining)"]);
    assert_eq!(lighting.scan_radius(), 900.0);
}

#[test]
fn test_load_reads_file() {
    let file = write_config(FULL_CONFIG);
    let config = BridgeConfig::load(file.path()).unwrap();
    assert_eq!(config.lighting.fixtures().len(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BridgeConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let file = write_config("{ not json");
    let err = BridgeConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_incomplete_outcome_rejected() {
    let json = r#"{
        "Scenarios": [{
            "name": "Broken",
            "priority": 1,
            "trigger": {"type": "always"},
            "outcome": [{"entity_id": "light.left", "brightness_pct": 50}]
        }]
    }"#;
    let err = BridgeConfig::from_json(json).unwrap_err();
    assert!(matches!(err, ConfigError::Scenario { scenario, .. } if scenario == "Broken"));
}

#[test]
fn test_hour_range_requires_both_bounds() {
    let json = r#"{
        "Scenarios": [{
            "name": "Evening",
            "priority": 1,
            "trigger": {"type": "game_hour_range", "min_hour": 18}
        }]
    }"#;
    assert!(BridgeConfig::from_json(json).is_err());
}

#[test]
fn test_invalid_options_rejected() {
    let json = r#"{"LightingOptions": {"smoothingFactor": 1.5}}"#;
    let err = BridgeConfig::from_json(json).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_duplicate_fixture_rejected() {
    let json = r#"{
        "Lights": [
            {"entity_id": "light.a", "position": {"x": 1}},
            {"entity_id": "light.a", "position": {"x": 2}}
        ]
    }"#;
    let err = BridgeConfig::from_json(json).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(lighting::Error::DuplicateFixture(_))));
}
