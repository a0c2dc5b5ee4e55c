//! Directional lamp mapping
//!
//! Projects nearby in-game lights onto real fixtures. Each fixture sits at a
//! known bearing from the player; a game light contributes to the fixture in
//! proportion to how well its bearing lines up with the fixture's bearing,
//! how close it is, and how bright it is. Lights beyond the maximum distance
//! are ignored outright.
//!
//! ```text
//!   weight = max(0, lamp_dir · light_dir) ^ sharpness
//!          × (1 - clamp(distance / max_distance, 0, 1))
//!          × intensity
//! ```

use crate::color::{self, MAX_BRIGHTNESS, MIN_BRIGHTNESS};
use crate::geometry::{alignment, direction, rotate_yaw, Vec3};
use crate::state::EFFECT_FLICKER;
use crate::{Appearance, DynamicLightSource, FixturePosition, FixtureState, FlickerParams, Rgb};

/// Default alignment exponent
pub const DEFAULT_SHARPNESS: f32 = 2.0;

/// Default influence radius, in simulation units
pub const DEFAULT_MAX_DISTANCE: f32 = 400.0;

/// Below this total weight a fixture is treated as unlit
const MIN_TOTAL_WEIGHT: f32 = 0.01;

/// Maps dynamic light sources onto fixtures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalMapper {
    sharpness: f32,
    max_distance: f32,
}

impl Default for DirectionalMapper {
    fn default() -> Self {
        DirectionalMapper::new(DEFAULT_SHARPNESS, DEFAULT_MAX_DISTANCE)
    }
}

impl DirectionalMapper {
    /// Create a mapper
    ///
    /// `sharpness` narrows each fixture's cone of influence: 1 is a plain
    /// cosine falloff, higher values approach a spotlight.
    pub fn new(sharpness: f32, max_distance: f32) -> Self {
        DirectionalMapper {
            sharpness,
            max_distance,
        }
    }

    pub fn sharpness(&self) -> f32 {
        self.sharpness
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Influence of one light on a fixture at bearing `lamp_dir`
    ///
    /// Zero for lights beyond the maximum distance, behind the fixture's
    /// bearing, or at the observer's own position.
    pub fn light_weight(
        &self,
        lamp_dir: Vec3,
        light: &DynamicLightSource,
        observer_yaw: f32,
    ) -> f32 {
        if self.max_distance <= 0.0 {
            return 0.0;
        }

        // Align game forward with the room's forward axis
        let relative = rotate_yaw(light.relative_position, -observer_yaw);
        let distance = relative.length();
        if !distance.is_finite() || distance > self.max_distance {
            return 0.0;
        }

        let dir_alignment = alignment(lamp_dir, relative).powf(self.sharpness);
        let distance_fade = 1.0 - (distance / self.max_distance).clamp(0.0, 1.0);
        dir_alignment * distance_fade * light.intensity
    }

    /// Dynamic target for one fixture
    ///
    /// Lit fixtures get the weighted mean colour of their contributing
    /// lights with a flicker effect; unlit fixtures inherit.
    pub fn map_fixture(
        &self,
        fixture: &FixturePosition,
        lights: &[DynamicLightSource],
        observer_yaw: f32,
    ) -> FixtureState {
        let lamp_dir = direction(fixture.position);

        let mut total_weight = 0.0_f32;
        let mut channels = [0.0_f32; 3];
        let mut brightness = 0.0_f32;

        for light in lights {
            let weight = self.light_weight(lamp_dir, light, observer_yaw);
            if weight <= 0.0 || !weight.is_finite() {
                continue;
            }
            total_weight += weight;
            for (sum, c) in channels.iter_mut().zip(light.color.to_array_f32()) {
                *sum += weight * c;
            }
            brightness += weight * f32::from(MAX_BRIGHTNESS);
        }

        if total_weight <= MIN_TOTAL_WEIGHT {
            return FixtureState::inherit(fixture.id.clone());
        }

        let rgb = Rgb::from_array_f32(channels.map(|sum| sum / total_weight));
        let appearance = Appearance::new(
            rgb,
            color::brightness(brightness / total_weight, MIN_BRIGHTNESS),
        )
        .with_effect(EFFECT_FLICKER)
        .with_flicker(FlickerParams::DIRECTIONAL);

        FixtureState::set(fixture.id.clone(), appearance)
    }

    /// Dynamic targets for every fixture, in fixture order
    pub fn map(
        &self,
        fixtures: &[FixturePosition],
        lights: &[DynamicLightSource],
        observer_yaw: f32,
    ) -> Vec<FixtureState> {
        fixtures
            .iter()
            .map(|fixture| self.map_fixture(fixture, lights, observer_yaw))
            .collect()
    }
}
