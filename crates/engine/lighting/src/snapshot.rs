//! Per-tick view of the simulation supplied by the host

use crate::geometry::Vec3;
use crate::Rgb;
use serde::{Deserialize, Serialize};

/// A light source near the observer, as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyLight {
    /// Position relative to the observer, in simulation units
    pub relative_position: Vec3,
    /// Category used by `near_object` triggers (e.g. "fire")
    pub object_type: String,
    pub color: Rgb,
    pub intensity: f32,
}

impl NearbyLight {
    pub fn new(
        relative_position: Vec3,
        object_type: impl Into<String>,
        color: Rgb,
        intensity: f32,
    ) -> Self {
        NearbyLight {
            relative_position,
            object_type: object_type.into(),
            color,
            intensity,
        }
    }

    /// Distance from the observer
    pub fn distance(&self) -> f32 {
        self.relative_position.length()
    }
}

/// Light source as seen by the directional mapper
///
/// Rebuilt from the snapshot every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicLightSource {
    pub relative_position: Vec3,
    pub color: Rgb,
    /// Non-negative, finite
    pub intensity: f32,
}

impl From<&NearbyLight> for DynamicLightSource {
    fn from(light: &NearbyLight) -> Self {
        let intensity = if light.intensity.is_finite() {
            light.intensity.max(0.0)
        } else {
            0.0
        };
        DynamicLightSource {
            relative_position: light.relative_position,
            color: light.color,
            intensity,
        }
    }
}

/// Simulation state sampled once per tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    /// In-game hour of day; any value is accepted and wrapped into `[0, 24)`
    pub hour: f32,
    pub in_combat: bool,
    pub torch_equipped: bool,
    /// Observer heading around the vertical axis
    pub observer_yaw: f32,
    pub is_indoors: bool,
    pub nearby_lights: Vec<NearbyLight>,
}

impl WorldSnapshot {
    /// Hour of day wrapped into `[0, 24)`
    pub fn hour_of_day(&self) -> f32 {
        crate::ambient::normalize_hour(self.hour)
    }

    /// Light list handed to the directional mapper
    pub fn dynamic_lights(&self) -> Vec<DynamicLightSource> {
        self.nearby_lights.iter().map(DynamicLightSource::from).collect()
    }

    /// Whether any light of `object_type` lies within `radius` of the observer
    pub fn has_light_within(&self, object_type: &str, radius: f32) -> bool {
        self.nearby_lights
            .iter()
            .any(|light| light.object_type == object_type && light.distance() <= radius)
    }
}
