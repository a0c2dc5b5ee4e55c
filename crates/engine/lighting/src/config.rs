//! Immutable configuration handed to every tick

use crate::geometry::Vec3;
use crate::mapper::{DEFAULT_MAX_DISTANCE, DEFAULT_SHARPNESS};
use crate::smoother::DEFAULT_SMOOTHING_FACTOR;
use crate::{DayNightCurve, DirectionalMapper, Error, Result, ScenarioRule};
use std::collections::HashSet;

/// A physical fixture and where it sits relative to the player
///
/// Positions are in centimetres in a Z-up frame whose +X axis is the
/// player's forward direction.
#[derive(Debug, Clone, PartialEq)]
pub struct FixturePosition {
    pub id: String,
    pub position: Vec3,
}

impl FixturePosition {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        FixturePosition {
            id: id.into(),
            position,
        }
    }
}

/// Tuning knobs shared by all fixtures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingOptions {
    /// Exponent applied to directional alignment
    pub direction_sharpness: f32,
    /// Radius beyond which dynamic lights are ignored
    pub max_distance: f32,
    /// Per-tick smoothing factor in `(0, 1]`
    pub smoothing_factor: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        LightingOptions {
            direction_sharpness: DEFAULT_SHARPNESS,
            max_distance: DEFAULT_MAX_DISTANCE,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl LightingOptions {
    /// Check every option is inside its valid range
    pub fn validate(&self) -> Result<()> {
        if !(self.direction_sharpness.is_finite() && self.direction_sharpness > 0.0) {
            return Err(Error::InvalidOption {
                name: "directionSharpness",
                reason: format!("expected a positive number, got {}", self.direction_sharpness),
            });
        }
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(Error::InvalidOption {
                name: "maxDistance",
                reason: format!("expected a positive number, got {}", self.max_distance),
            });
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(Error::InvalidOption {
                name: "smoothingFactor",
                reason: format!("expected a value in (0, 1], got {}", self.smoothing_factor),
            });
        }
        Ok(())
    }

    /// Mapper configured from these options
    pub fn mapper(&self) -> DirectionalMapper {
        DirectionalMapper::new(self.direction_sharpness, self.max_distance)
    }
}

/// Everything a tick needs besides the snapshot
#[derive(Debug, Clone, Default)]
pub struct LightingConfig {
    fixtures: Vec<FixturePosition>,
    day_night: DayNightCurve,
    scenarios: Vec<ScenarioRule>,
    options: LightingOptions,
}

impl LightingConfig {
    /// Validate and assemble a configuration
    ///
    /// Fixture ids must be unique. Scenario order is kept: it decides ties
    /// between equal-priority scenarios.
    pub fn new(
        fixtures: Vec<FixturePosition>,
        day_night: DayNightCurve,
        scenarios: Vec<ScenarioRule>,
        options: LightingOptions,
    ) -> Result<Self> {
        options.validate()?;

        let mut seen = HashSet::new();
        for fixture in &fixtures {
            if !seen.insert(fixture.id.as_str()) {
                return Err(Error::DuplicateFixture(fixture.id.clone()));
            }
        }

        Ok(LightingConfig {
            fixtures,
            day_night,
            scenarios,
            options,
        })
    }

    pub fn fixtures(&self) -> &[FixturePosition] {
        &self.fixtures
    }

    pub fn day_night(&self) -> &DayNightCurve {
        &self.day_night
    }

    pub fn scenarios(&self) -> &[ScenarioRule] {
        &self.scenarios
    }

    pub fn options(&self) -> &LightingOptions {
        &self.options
    }

    /// Radius the host should scan for nearby lights
    ///
    /// Large enough for the mapper and every `near_object` trigger.
    pub fn scan_radius(&self) -> f32 {
        self.scenarios
            .iter()
            .filter_map(|rule| rule.trigger().scan_radius())
            .fold(self.options.max_distance, f32::max)
    }
}
