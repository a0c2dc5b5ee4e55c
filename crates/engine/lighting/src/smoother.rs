//! Temporal smoothing of fixture targets
//!
//! Each fixture keeps the last value it emitted. Every tick its colour and
//! brightness move a fixed fraction of the way towards the new target,
//! which hides single-tick jumps in the input. Discrete fields (effect,
//! scene, flicker) switch immediately.
//!
//! The smoother snaps straight to the target, skipping interpolation, the
//! first time it sees a fixture and whenever the fixture comes back from
//! `Inherit`.

use crate::color::{self, lerp};
use crate::{Appearance, FixtureState, FixtureTarget, Rgb};
use std::collections::HashMap;

/// Fraction of the remaining distance covered per tick
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.2;

/// Last emitted value for one fixture
///
/// Numeric fields are kept at full precision so small steps accumulate
/// instead of being rounded away each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SmootherMemory {
    pub rgb: [f32; 3],
    pub brightness_pct: f32,
    pub effect: Option<String>,
    pub inherit: bool,
}

impl SmootherMemory {
    fn snapped(appearance: &Appearance) -> Self {
        SmootherMemory {
            rgb: appearance.rgb.to_array_f32(),
            brightness_pct: f32::from(appearance.brightness_pct),
            effect: appearance.effect.clone(),
            inherit: false,
        }
    }

    fn inherited() -> Self {
        SmootherMemory {
            rgb: [0.0; 3],
            brightness_pct: 0.0,
            effect: None,
            inherit: true,
        }
    }

    fn approach(&mut self, target: &Appearance, factor: f32) {
        let goal = target.rgb.to_array_f32();
        for (current, goal) in self.rgb.iter_mut().zip(goal) {
            *current = lerp(*current, goal, factor);
        }
        self.brightness_pct = lerp(
            self.brightness_pct,
            f32::from(target.brightness_pct),
            factor,
        );
        self.effect = target.effect.clone();
        self.inherit = false;
    }
}

/// Exponential moving average over fixture targets
#[derive(Debug, Default)]
pub struct TemporalSmoother {
    memory: HashMap<String, SmootherMemory>,
}

impl TemporalSmoother {
    pub fn new() -> Self {
        TemporalSmoother::default()
    }

    /// Smooth one fixture's target and return the value to emit
    ///
    /// `factor` is clamped into `(0, 1]`; a non-positive or non-finite
    /// factor falls back to [`DEFAULT_SMOOTHING_FACTOR`].
    pub fn smooth(&mut self, target: &FixtureState, factor: f32) -> FixtureState {
        let factor = sanitize_factor(factor);

        let appearance = match &target.target {
            FixtureTarget::Inherit => {
                self.memory
                    .entry(target.fixture_id.clone())
                    .and_modify(|m| {
                        m.inherit = true;
                        m.effect = None;
                    })
                    .or_insert_with(SmootherMemory::inherited);
                return target.clone();
            }
            FixtureTarget::Set(appearance) => appearance,
        };

        match self.memory.get_mut(&target.fixture_id) {
            Some(memory) if !memory.inherit => {
                memory.approach(appearance, factor);
                let emitted = Appearance {
                    rgb: Rgb::from_array_f32(memory.rgb),
                    brightness_pct: color::brightness(memory.brightness_pct, 0),
                    effect: appearance.effect.clone(),
                    scene: appearance.scene.clone(),
                    flicker: appearance.flicker,
                };
                FixtureState::set(target.fixture_id.clone(), emitted)
            }
            _ => {
                self.memory.insert(
                    target.fixture_id.clone(),
                    SmootherMemory::snapped(appearance),
                );
                target.clone()
            }
        }
    }

    /// Smooth a whole tick's targets, preserving order
    pub fn smooth_all(&mut self, targets: &[FixtureState], factor: f32) -> Vec<FixtureState> {
        targets
            .iter()
            .map(|target| self.smooth(target, factor))
            .collect()
    }

    /// Memory held for a fixture
    pub fn memory(&self, fixture_id: &str) -> Option<&SmootherMemory> {
        self.memory.get(fixture_id)
    }

    /// Number of fixtures with memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Forget all history; every fixture snaps on its next target
    pub fn clear(&mut self) {
        self.memory.clear();
    }
}

fn sanitize_factor(factor: f32) -> f32 {
    if factor.is_finite() && factor > 0.0 {
        factor.min(1.0)
    } else {
        DEFAULT_SMOOTHING_FACTOR
    }
}
