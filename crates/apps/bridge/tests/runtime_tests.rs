//! Tick loop driven by in-memory frames

use bridge::{Bridge, BridgeConfig, FrameReader, LightCatalog};
use controller::{Dispatcher, DryRunService};
use std::fs;
use std::sync::atomic::Ordering;
use std::time::Duration;

const CONFIG: &str = r#"{
    "HomeAssistant": {"Url": "http://ha.local:8123", "Token": "secret"},
    "LightingOptions": {"tickIntervalMs": 1},
    "DayNightCycle": [
        {"hour": 0, "rgb_color": [10, 10, 40], "brightness_pct": 10},
        {"hour": 12, "rgb_color": [255, 240, 220], "brightness_pct": 100}
    ],
    "Lights": [
        {"entity_id": "light.front", "position": {"x": 250}},
        {"entity_id": "light.back", "position": {"x": -250}}
    ],
    "Scenarios": []
}"#;

const FRAMES: &[u8] = b"{\"hour\": 12}
{\"hour\": 12}
garbage
{\"hour\": 12, \"indoors\": true, \"lights\": [{\"position\": {\"x\": 150}}]}
";

fn bridge_for(path: &std::path::Path) -> Bridge<DryRunService> {
    let config = BridgeConfig::load(path).unwrap();
    let dispatcher = Dispatcher::new(DryRunService).with_settle_delay(Duration::ZERO);
    Bridge::new(path, config, LightCatalog::default(), dispatcher)
}

#[tokio::test]
async fn test_run_ticks_once_per_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.json");
    fs::write(&path, CONFIG).unwrap();

    let mut bridge = bridge_for(&path);
    let mut frames = FrameReader::new(FRAMES);
    bridge.run(&mut frames, Duration::ZERO).await.unwrap();

    let stats = bridge.stats();
    assert_eq!(stats.ticks.load(Ordering::Relaxed), 3);
    // Both fixtures on the first tick, nothing new on the second, the
    // front fixture flickers on the third while the back one inherits
    assert_eq!(stats.commands_sent.load(Ordering::Relaxed), 3);
    assert_eq!(stats.commands_skipped.load(Ordering::Relaxed), 3);
    assert_eq!(stats.failed_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_reload_swaps_config_and_keeps_old_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.json");
    fs::write(&path, CONFIG).unwrap();

    let mut bridge = bridge_for(&path);
    let snapshot = lighting::WorldSnapshot {
        hour: 12.0,
        ..Default::default()
    };
    bridge.tick(&snapshot).await;
    assert_eq!(bridge.orchestrator().smoother().len(), 2);

    let trimmed = CONFIG.replace(
        r#"{"entity_id": "light.back", "position": {"x": -250}}"#,
        r#"{"entity_id": "light.side", "position": {"y": 250}}"#,
    );
    fs::write(&path, trimmed).unwrap();
    assert!(bridge.reload());
    assert!(bridge.orchestrator().smoother().is_empty());
    assert_eq!(bridge.config().lighting.fixtures()[1].id, "light.side");
    assert_eq!(bridge.stats().reloads.load(Ordering::Relaxed), 1);

    fs::write(&path, "{ broken").unwrap();
    assert!(!bridge.reload());
    assert_eq!(bridge.config().lighting.fixtures()[1].id, "light.side");
    assert_eq!(bridge.stats().reloads.load(Ordering::Relaxed), 1);
}
