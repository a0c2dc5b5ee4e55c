//! Fixture state values flowing between pipeline stages

use crate::{Error, Rgb};
use serde::{Deserialize, Serialize};

/// Effect name for randomised per-tick flicker
pub const EFFECT_FLICKER: &str = "flicker";

/// Effect name that hands the fixture over to a controller-side scene
pub const EFFECT_SCENE: &str = "scene";

/// Symmetric perturbation bounds applied around a base colour each tick
///
/// Applied by the delivery layer, after smoothing. Configuration uses the
/// short keys `r`, `g`, `b` and `brightness`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickerParams {
    #[serde(rename = "r")]
    pub dr: u8,
    #[serde(rename = "g")]
    pub dg: u8,
    #[serde(rename = "b")]
    pub db: u8,
    #[serde(rename = "brightness")]
    pub dbrightness: u8,
}

impl FlickerParams {
    /// Narrow profile attached to directionally mapped light
    pub const DIRECTIONAL: FlickerParams = FlickerParams::new(60, 40, 20, 20);

    pub const fn new(dr: u8, dg: u8, db: u8, dbrightness: u8) -> Self {
        FlickerParams {
            dr,
            dg,
            db,
            dbrightness,
        }
    }
}

impl Default for FlickerParams {
    fn default() -> Self {
        FlickerParams::new(80, 50, 20, 25)
    }
}

/// Concrete appearance for one fixture
///
/// Equality ignores `flicker`: two appearances that differ only in their
/// flicker bounds produce the same command for a static fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appearance {
    pub rgb: Rgb,
    pub brightness_pct: u8,
    pub effect: Option<String>,
    pub scene: Option<String>,
    pub flicker: Option<FlickerParams>,
}

impl Appearance {
    pub fn new(rgb: Rgb, brightness_pct: u8) -> Self {
        Appearance {
            rgb,
            brightness_pct: brightness_pct.min(crate::color::MAX_BRIGHTNESS),
            effect: None,
            scene: None,
            flicker: None,
        }
    }

    /// Set the effect name (builder pattern)
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }

    /// Set the controller scene name (builder pattern)
    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = Some(scene.into());
        self
    }

    /// Set flicker bounds (builder pattern)
    pub fn with_flicker(mut self, flicker: FlickerParams) -> Self {
        self.flicker = Some(flicker);
        self
    }

    /// Whether this appearance is a `flicker` animation
    pub fn is_animated(&self) -> bool {
        self.effect.as_deref() == Some(EFFECT_FLICKER)
    }

    /// Whether this appearance activates a named controller scene
    pub fn is_scene(&self) -> bool {
        self.effect.as_deref() == Some(EFFECT_SCENE) && self.scene.is_some()
    }
}

impl PartialEq for Appearance {
    fn eq(&self, other: &Self) -> bool {
        self.rgb == other.rgb
            && self.brightness_pct == other.brightness_pct
            && self.effect == other.effect
            && self.scene == other.scene
    }
}

impl Eq for Appearance {}

/// What a stage wants a fixture to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureTarget {
    /// Keep whatever the fixture currently holds
    Inherit,
    /// Show this appearance
    Set(Appearance),
}

/// Target for a single named fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FixtureStateRecord", into = "FixtureStateRecord")]
pub struct FixtureState {
    pub fixture_id: String,
    pub target: FixtureTarget,
}

impl FixtureState {
    /// A state that defers to whatever the fixture already shows
    pub fn inherit(fixture_id: impl Into<String>) -> Self {
        FixtureState {
            fixture_id: fixture_id.into(),
            target: FixtureTarget::Inherit,
        }
    }

    /// A state with a concrete appearance
    pub fn set(fixture_id: impl Into<String>, appearance: Appearance) -> Self {
        FixtureState {
            fixture_id: fixture_id.into(),
            target: FixtureTarget::Set(appearance),
        }
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self.target, FixtureTarget::Inherit)
    }

    /// The concrete appearance, if this state is not `Inherit`
    pub fn appearance(&self) -> Option<&Appearance> {
        match &self.target {
            FixtureTarget::Inherit => None,
            FixtureTarget::Set(appearance) => Some(appearance),
        }
    }
}

/// Flat configuration shape of a fixture state
///
/// `{"entity_id": "...", "inherit": true}` or a full colour record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FixtureStateRecord {
    entity_id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    inherit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rgb_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    brightness_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flicker: Option<FlickerParams>,
}

impl TryFrom<FixtureStateRecord> for FixtureState {
    type Error = Error;

    fn try_from(record: FixtureStateRecord) -> Result<Self, Self::Error> {
        if record.inherit {
            return Ok(FixtureState::inherit(record.entity_id));
        }

        let invalid = |reason: &str| Error::InvalidState {
            fixture_id: record.entity_id.clone(),
            reason: reason.to_string(),
        };
        let rgb = record.rgb_color.ok_or_else(|| invalid("missing rgb_color"))?;
        let brightness_pct = record
            .brightness_pct
            .ok_or_else(|| invalid("missing brightness_pct"))?;
        if brightness_pct > crate::color::MAX_BRIGHTNESS {
            return Err(invalid("brightness_pct above 100"));
        }

        Ok(FixtureState::set(
            record.entity_id,
            Appearance {
                rgb,
                brightness_pct,
                effect: record.effect,
                scene: record.scene,
                flicker: record.flicker,
            },
        ))
    }
}

impl From<FixtureState> for FixtureStateRecord {
    fn from(state: FixtureState) -> Self {
        match state.target {
            FixtureTarget::Inherit => FixtureStateRecord {
                entity_id: state.fixture_id,
                inherit: true,
                rgb_color: None,
                brightness_pct: None,
                effect: None,
                scene: None,
                flicker: None,
            },
            FixtureTarget::Set(a) => FixtureStateRecord {
                entity_id: state.fixture_id,
                inherit: false,
                rgb_color: Some(a.rgb),
                brightness_pct: Some(a.brightness_pct),
                effect: a.effect,
                scene: a.scene,
                flicker: a.flicker,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_flicker() {
        let a = Appearance::new(Rgb::WHITE, 80)
            .with_effect(EFFECT_FLICKER)
            .with_flicker(FlickerParams::DIRECTIONAL);
        let b = Appearance::new(Rgb::WHITE, 80)
            .with_effect(EFFECT_FLICKER)
            .with_flicker(FlickerParams::default());
        assert_eq!(a, b);
        assert_ne!(a, Appearance::new(Rgb::WHITE, 81).with_effect(EFFECT_FLICKER));
    }

    #[test]
    fn test_inherit_record_ignores_other_fields() {
        let json = r#"{"entity_id": "light.desk", "inherit": true, "rgb_color": [1, 2, 3]}"#;
        let state: FixtureState = serde_json::from_str(json).unwrap();
        assert_eq!(state, FixtureState::inherit("light.desk"));
        assert!(state.appearance().is_none());
    }

    #[test]
    fn test_full_record_parses() {
        let json = r#"{
            "entity_id": "light.tv",
            "rgb_color": [255, 0, 0],
            "brightness_pct": 70,
            "effect": null,
            "flicker": {"r": 10}
        }"#;
        let state: FixtureState = serde_json::from_str(json).unwrap();
        let appearance = state.appearance().unwrap();
        assert_eq!(appearance.rgb, Rgb::new(255, 0, 0));
        assert_eq!(appearance.brightness_pct, 70);
        assert_eq!(appearance.effect, None);
        let flicker = appearance.flicker.unwrap();
        assert_eq!(flicker.dr, 10);
        assert_eq!(flicker.dg, 50);
        assert_eq!(flicker.dbrightness, 25);
    }

    #[test]
    fn test_record_without_colour_is_rejected() {
        let json = r#"{"entity_id": "light.tv", "brightness_pct": 70}"#;
        let err = serde_json::from_str::<FixtureState>(json).unwrap_err();
        assert!(err.to_string().contains("missing rgb_color"));
    }

    #[test]
    fn test_brightness_above_range_is_rejected() {
        let json = r#"{"entity_id": "light.tv", "rgb_color": [0, 0, 0], "brightness_pct": 101}"#;
        assert!(serde_json::from_str::<FixtureState>(json).is_err());
    }

    #[test]
    fn test_scene_detection() {
        let scene = Appearance::new(Rgb::BLACK, 50)
            .with_effect(EFFECT_SCENE)
            .with_scene("Campfire");
        assert!(scene.is_scene());
        assert!(!Appearance::new(Rgb::BLACK, 50)
            .with_effect(EFFECT_SCENE)
            .is_scene());
    }
}
