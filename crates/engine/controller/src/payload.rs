//! JSON bodies for Home Assistant service calls

use serde::{Deserialize, Serialize};

/// Body of `light.turn_on`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightCommand {
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_pct: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

impl LightCommand {
    /// Colour and brightness for a fixture
    pub fn color(entity_id: impl Into<String>, rgb: [u8; 3], brightness_pct: u8) -> Self {
        LightCommand {
            entity_id: entity_id.into(),
            rgb_color: Some(rgb),
            brightness_pct: Some(brightness_pct),
            effect: None,
        }
    }

    /// Effect-only command, e.g. `scene` or `off`
    pub fn effect_only(entity_id: impl Into<String>, effect: impl Into<String>) -> Self {
        LightCommand {
            entity_id: entity_id.into(),
            rgb_color: None,
            brightness_pct: None,
            effect: Some(effect.into()),
        }
    }

    /// Set the effect (builder pattern)
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }
}

/// Body of `select.select_option`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectCommand {
    pub entity_id: String,
    pub option: String,
}

impl SelectCommand {
    /// Pick `scene` on the scene selector paired with a light entity
    ///
    /// `light.desk` maps to `select.desk_scene`.
    pub fn scene_for(light_entity_id: &str, scene: impl Into<String>) -> Self {
        let object_id = light_entity_id
            .strip_prefix("light.")
            .unwrap_or(light_entity_id);
        SelectCommand {
            entity_id: format!("select.{}_scene", object_id),
            option: scene.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_command_omits_missing_fields() {
        let body = serde_json::to_value(LightCommand::effect_only("light.desk", "off")).unwrap();
        assert_eq!(body, serde_json::json!({"entity_id": "light.desk", "effect": "off"}));

        let body = serde_json::to_value(LightCommand::color("light.desk", [255, 140, 0], 60)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"entity_id": "light.desk", "rgb_color": [255, 140, 0], "brightness_pct": 60})
        );
    }

    #[test]
    fn test_scene_selector_name() {
        assert_eq!(SelectCommand::scene_for("light.desk", "Fireplace").entity_id, "select.desk_scene");
        assert_eq!(SelectCommand::scene_for("lamp_2", "Ocean").entity_id, "select.lamp_2_scene");
    }
}
