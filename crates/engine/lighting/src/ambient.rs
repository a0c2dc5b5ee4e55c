//! Day/night ambient curve
//!
//! The curve is a ring of keyframes sorted by hour. Evaluating it finds the
//! segment that cyclically contains the requested hour (the last keyframe
//! wraps around midnight to the first) and interpolates linearly inside it.

use crate::color::{self, lerp};
use crate::Rgb;
use serde::{Deserialize, Serialize};

const HOURS_PER_DAY: f32 = 24.0;

/// One control point of the day/night curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNightKeyframe {
    /// Hour of day in `[0, 24)`
    pub hour: u8,
    pub rgb_color: Rgb,
    pub brightness_pct: u8,
}

impl DayNightKeyframe {
    pub fn new(hour: u8, rgb_color: Rgb, brightness_pct: u8) -> Self {
        DayNightKeyframe {
            hour,
            rgb_color,
            brightness_pct,
        }
    }

    fn sample(&self) -> AmbientSample {
        AmbientSample {
            rgb: self.rgb_color,
            brightness_pct: self.brightness_pct.min(color::MAX_BRIGHTNESS),
        }
    }
}

/// Ambient colour and brightness at a point in the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientSample {
    pub rgb: Rgb,
    pub brightness_pct: u8,
}

impl AmbientSample {
    /// Value used when the curve has too few keyframes to interpolate
    pub const NEUTRAL: AmbientSample = AmbientSample {
        rgb: Rgb::NEUTRAL_GRAY,
        brightness_pct: 50,
    };
}

/// Keyframe ring, sorted by hour on construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayNightCurve {
    keyframes: Vec<DayNightKeyframe>,
}

impl DayNightCurve {
    /// Build a curve, wrapping hours into `[0, 24)` and sorting by hour
    ///
    /// Keyframes sharing an hour keep their relative order.
    pub fn new(keyframes: impl IntoIterator<Item = DayNightKeyframe>) -> Self {
        let mut keyframes: Vec<_> = keyframes
            .into_iter()
            .map(|mut k| {
                k.hour %= 24;
                k
            })
            .collect();
        keyframes.sort_by_key(|k| k.hour);
        DayNightCurve { keyframes }
    }

    pub fn keyframes(&self) -> &[DayNightKeyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Whether the curve can interpolate (two or more keyframes)
    pub fn is_dynamic(&self) -> bool {
        self.keyframes.len() >= 2
    }

    /// Ambient value at `hour`
    pub fn evaluate(&self, hour: f32) -> AmbientSample {
        evaluate(hour, &self.keyframes)
    }
}

/// Wrap any hour value into `[0, 24)`
///
/// Non-finite input maps to midnight.
pub fn normalize_hour(hour: f32) -> f32 {
    if !hour.is_finite() {
        return 0.0;
    }
    let wrapped = hour.rem_euclid(HOURS_PER_DAY);
    // rem_euclid can round up to exactly 24 for tiny negative inputs
    if wrapped >= HOURS_PER_DAY {
        0.0
    } else {
        wrapped
    }
}

/// Interpolate a sorted keyframe ring at `hour`
///
/// Fewer than two keyframes yield [`AmbientSample::NEUTRAL`].
pub fn evaluate(hour: f32, keyframes: &[DayNightKeyframe]) -> AmbientSample {
    if keyframes.len() < 2 {
        return AmbientSample::NEUTRAL;
    }

    let hour = normalize_hour(hour);
    let Some((a, b, t)) = find_segment(hour, keyframes) else {
        // Every keyframe sits on the same hour: the curve is flat
        return keyframes[0].sample();
    };

    let a = a.sample();
    let b = b.sample();
    AmbientSample {
        rgb: a.rgb.lerp(b.rgb, t),
        brightness_pct: color::brightness(
            lerp(f32::from(a.brightness_pct), f32::from(b.brightness_pct), t),
            0,
        ),
    }
}

/// Segment `[a, b)` containing `hour` and the fraction `t` travelled through it
fn find_segment(
    hour: f32,
    keyframes: &[DayNightKeyframe],
) -> Option<(&DayNightKeyframe, &DayNightKeyframe, f32)> {
    let n = keyframes.len();
    (0..n).find_map(|i| {
        let a = &keyframes[i];
        let b = &keyframes[(i + 1) % n];
        let start = f32::from(a.hour);
        let end = f32::from(b.hour);

        if start < end {
            (hour >= start && hour < end).then(|| (a, b, (hour - start) / (end - start)))
        } else if start > end {
            // Spans midnight
            if hour >= start || hour < end {
                let elapsed = if hour < start {
                    hour + HOURS_PER_DAY - start
                } else {
                    hour - start
                };
                let span = end + HOURS_PER_DAY - start;
                Some((a, b, elapsed / span))
            } else {
                None
            }
        } else {
            None
        }
    })
}
