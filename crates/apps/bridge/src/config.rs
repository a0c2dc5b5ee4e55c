use lighting::glam::Vec3;
use lighting::{
    DayNightCurve, DayNightKeyframe, FixturePosition, FixtureState, LightingConfig,
    LightingOptions, ScenarioRule, TriggerSpec,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use thiserror::Error;

/// Default pause between ticks
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Errors raised while loading the bridge configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario '{scenario}': {reason}")]
    Scenario { scenario: String, reason: String },
    #[error(transparent)]
    Invalid(#[from] lighting::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Connection details for Home Assistant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeAssistantSettings {
    pub url: String,
    pub token: String,
    pub debug_mode: bool,
}

impl HomeAssistantSettings {
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.token.is_empty()
    }

    /// Replace URL and token with explicit overrides where present.
    pub fn with_overrides(mut self, url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.url = url;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = token;
        }
        self
    }
}

/// Configuration for the bridge binary.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub home_assistant: HomeAssistantSettings,
    /// Pause between ticks.
    pub tick_interval: Duration,
    /// Everything the lighting pipeline needs.
    pub lighting: LightingConfig,
    /// Scenarios whose trigger type is not recognised, as `name (type)`.
    pub unknown_triggers: Vec<String>,
}

impl BridgeConfig {
    /// Load a configuration file, then apply `HA_URL` / `HA_TOKEN`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&text)?;
        config.home_assistant = config
            .home_assistant
            .with_overrides(env::var("HA_URL").ok(), env::var("HA_TOKEN").ok());
        config.warn_if_incomplete();
        Ok(config)
    }

    /// Parse a configuration document without consulting the environment.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text)?;

        let home_assistant = raw.home_assistant.map(RawHomeAssistant::into_settings).unwrap_or_else(|| {
            tracing::warn!("'HomeAssistant' section not found in config");
            HomeAssistantSettings::default()
        });

        let raw_options = raw.lighting_options.unwrap_or_default();
        let defaults = LightingOptions::default();
        let options = LightingOptions {
            direction_sharpness: raw_options
                .direction_sharpness
                .unwrap_or(defaults.direction_sharpness),
            max_distance: raw_options.max_distance.unwrap_or(defaults.max_distance),
            smoothing_factor: raw_options
                .smoothing_factor
                .unwrap_or(defaults.smoothing_factor),
        };
        let tick_interval = Duration::from_millis(
            raw_options
                .tick_interval_ms
                .unwrap_or(DEFAULT_TICK_INTERVAL_MS)
                .max(1),
        );

        let day_night = match raw.day_night_cycle {
            Some(keyframes) => {
                tracing::info!("Loaded DayNightCycle with {} keyframes", keyframes.len());
                DayNightCurve::new(keyframes)
            }
            None => {
                tracing::warn!("No DayNightCycle found in config; ambient lighting will be static");
                DayNightCurve::default()
            }
        };

        let fixtures = parse_fixtures(raw.lights);

        let mut unknown_triggers = Vec::new();
        let mut scenarios = Vec::new();
        for raw_scenario in raw.scenarios.unwrap_or_else(|| {
            tracing::warn!("'Scenarios' array not found in config; no scenarios configured");
            Vec::new()
        }) {
            let (rule, unknown) = raw_scenario.into_rule()?;
            if let Some(kind) = unknown {
                tracing::warn!(
                    "Scenario '{}' has unknown trigger type '{}'; it will never activate",
                    rule.name(),
                    kind
                );
                unknown_triggers.push(format!("{} ({})", rule.name(), kind));
            }
            scenarios.push(rule);
        }
        tracing::info!("Loaded {} scenarios", scenarios.len());

        let lighting = LightingConfig::new(fixtures, day_night, scenarios, options)?;

        Ok(Self {
            home_assistant,
            tick_interval,
            lighting,
            unknown_triggers,
        })
    }

    fn warn_if_incomplete(&self) {
        if !self.home_assistant.is_complete() || self.lighting.fixtures().is_empty() {
            tracing::warn!(
                "Configuration is incomplete (missing URL, token, or lights); light control may not work"
            );
        }
    }
}

/// Read only `HomeAssistant.DebugMode`, before logging is set up.
pub fn peek_debug_mode(path: impl AsRef<Path>) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(&text).ok())
        .and_then(|doc| doc.get("HomeAssistant")?.get("DebugMode")?.as_bool())
        .unwrap_or(false)
}

fn parse_fixtures(lights: Option<Vec<RawLight>>) -> Vec<FixturePosition> {
    let Some(lights) = lights else {
        tracing::warn!("'Lights' array not found in config; directional lighting is disabled");
        return Vec::new();
    };

    let fixtures: Vec<_> = lights
        .into_iter()
        .filter_map(|light| match (light.entity_id, light.position) {
            (Some(id), Some(position)) => Some(FixturePosition::new(id, position.into())),
            (id, _) => {
                tracing::warn!(
                    "Skipping light entry without entity_id or position ({})",
                    id.as_deref().unwrap_or("unnamed")
                );
                None
            }
        })
        .collect();
    tracing::info!("Loaded {} lamp positions for directional lighting", fixtures.len());
    fixtures
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConfig {
    home_assistant: Option<RawHomeAssistant>,
    lighting_options: Option<RawLightingOptions>,
    day_night_cycle: Option<Vec<DayNightKeyframe>>,
    lights: Option<Vec<RawLight>>,
    scenarios: Option<Vec<RawScenario>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHomeAssistant {
    url: Option<String>,
    token: Option<String>,
    debug_mode: Option<bool>,
}

impl RawHomeAssistant {
    fn into_settings(self) -> HomeAssistantSettings {
        let url = self.url.unwrap_or_else(|| {
            tracing::warn!("'Url' not found in 'HomeAssistant' section; using empty URL");
            String::new()
        });
        let token = self.token.unwrap_or_else(|| {
            tracing::warn!("'Token' not found in 'HomeAssistant' section; using empty token");
            String::new()
        });
        HomeAssistantSettings {
            url,
            token,
            debug_mode: self.debug_mode.unwrap_or(false),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLightingOptions {
    direction_sharpness: Option<f32>,
    max_distance: Option<f32>,
    smoothing_factor: Option<f32>,
    tick_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawLight {
    entity_id: Option<String>,
    position: Option<RawPosition>,
}

/// `{x, y, z}` as written in config and frame files; missing axes are 0.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<RawPosition> for Vec3 {
    fn from(p: RawPosition) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

#[derive(Debug, Deserialize)]
struct RawScenario {
    name: String,
    priority: i32,
    trigger: Value,
    #[serde(default)]
    outcome: Value,
}

impl RawScenario {
    /// Build the rule, reporting the trigger type if it is not recognised
    fn into_rule(self) -> Result<(ScenarioRule, Option<String>)> {
        let scenario_error = |reason: String| ConfigError::Scenario {
            scenario: self.name.clone(),
            reason,
        };

        let kind = self
            .trigger
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| scenario_error("trigger has no 'type'".into()))?;
        let trigger = TriggerSpec::deserialize(&self.trigger)
            .map_err(|e| scenario_error(format!("invalid trigger: {}", e)))?;
        let unknown = (!trigger.is_recognized()).then_some(kind);

        let outcome: Vec<FixtureState> = match &self.outcome {
            Value::Array(_) => Vec::deserialize(&self.outcome)
                .map_err(|e| scenario_error(format!("invalid outcome: {}", e)))?,
            _ => {
                tracing::warn!(
                    "Scenario '{}' has an outcome that is not an array; skipping its light states",
                    self.name
                );
                Vec::new()
            }
        };

        for state in &outcome {
            if let Some(appearance) = state.appearance() {
                if appearance.effect.as_deref() == Some(lighting::EFFECT_SCENE)
                    && appearance.scene.is_none()
                {
                    tracing::warn!(
                        "Light {}: effect is 'scene' but no scene name provided",
                        state.fixture_id
                    );
                }
            }
        }

        let rule = ScenarioRule::new(self.name.clone(), trigger)
            .with_priority(self.priority)
            .then_all(outcome);
        Ok((rule, unknown))
    }
}
