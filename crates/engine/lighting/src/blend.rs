//! Blending dynamic light with the scenario/ambient base layer
//!
//! The dynamic side's brightness sets a "fire influence" through a
//! sub-linear curve, so even modest firelight takes over quickly. The
//! influence snaps to 0 or 1 near the ends of its range.

use crate::color::{self, lerp, MIN_BRIGHTNESS};
use crate::{Appearance, FixtureState, FixtureTarget, Rgb};

/// Exponent of the fire influence curve
pub const FIRE_INFLUENCE_EXPONENT: f32 = 0.4;

/// Influence below this is treated as no dynamic light
const SNAP_TO_BASE: f32 = 0.05;

/// Influence above this is treated as pure dynamic light
const SNAP_TO_DYNAMIC: f32 = 0.95;

/// Weight of the dynamic side for a given dynamic brightness
pub fn fire_influence(brightness_pct: u8) -> f32 {
    let level = (f32::from(brightness_pct) / 100.0).clamp(0.0, 1.0);
    let influence = level.powf(FIRE_INFLUENCE_EXPONENT);
    if influence < SNAP_TO_BASE {
        0.0
    } else if influence > SNAP_TO_DYNAMIC {
        1.0
    } else {
        influence
    }
}

/// Blend one fixture's dynamic target over its base target
///
/// - Base `Inherit`: the dynamic side wins unconditionally.
/// - Dynamic `Inherit`: the base side passes through.
/// - Influence snapped to 0 or 1: the corresponding side is returned as is.
/// - Otherwise colour and brightness are mixed per channel; effect, scene
///   and flicker come from whichever side carries more weight.
pub fn blend(dynamic: &FixtureState, base: &FixtureState) -> FixtureState {
    match (&dynamic.target, &base.target) {
        (_, FixtureTarget::Inherit) => dynamic.clone(),
        (FixtureTarget::Inherit, _) => base.clone(),
        (FixtureTarget::Set(dyn_look), FixtureTarget::Set(base_look)) => {
            let influence = fire_influence(dyn_look.brightness_pct);
            if influence <= 0.0 {
                base.clone()
            } else if influence >= 1.0 {
                dynamic.clone()
            } else {
                FixtureState::set(
                    base.fixture_id.clone(),
                    mix(dyn_look, base_look, influence),
                )
            }
        }
    }
}

fn mix(dynamic: &Appearance, base: &Appearance, influence: f32) -> Appearance {
    // lerp from base towards dynamic by the dynamic weight
    let d = dynamic.rgb.to_array_f32();
    let b = base.rgb.to_array_f32();
    let rgb = Rgb::from_array_f32([
        lerp(b[0], d[0], influence),
        lerp(b[1], d[1], influence),
        lerp(b[2], d[2], influence),
    ]);
    let brightness = color::brightness(
        lerp(
            f32::from(base.brightness_pct),
            f32::from(dynamic.brightness_pct),
            influence,
        ),
        MIN_BRIGHTNESS,
    );

    let dominant = if influence >= 0.5 { dynamic } else { base };
    Appearance {
        rgb,
        brightness_pct: brightness,
        effect: dominant.effect.clone(),
        scene: dominant.scene.clone(),
        flicker: dominant.flicker,
    }
}

/// Blend two target lists, pairing entries by fixture id
///
/// Output follows the order of `dynamic`. A fixture missing from `base`
/// blends against `Inherit`.
pub fn blend_all(dynamic: &[FixtureState], base: &[FixtureState]) -> Vec<FixtureState> {
    dynamic
        .iter()
        .map(|d| match base.iter().find(|b| b.fixture_id == d.fixture_id) {
            Some(b) => blend(d, b),
            None => d.clone(),
        })
        .collect()
}
