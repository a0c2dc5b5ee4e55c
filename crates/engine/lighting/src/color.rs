//! RGB colour and brightness helpers

use serde::{Deserialize, Serialize};

/// Lowest brightness emitted by blended or dynamic light
pub const MIN_BRIGHTNESS: u8 = 10;

/// Highest brightness percentage
pub const MAX_BRIGHTNESS: u8 = 100;

/// 8-bit RGB colour
///
/// Serialised as a `[r, g, b]` array to match the controller's `rgb_color`
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const NEUTRAL_GRAY: Rgb = Rgb::new(128, 128, 128);
    /// Stand-in for fire lights whose definition carries no colour
    pub const FIRE_ORANGE: Rgb = Rgb::new(255, 140, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Channels as floats, in `r, g, b` order
    pub fn to_array_f32(self) -> [f32; 3] {
        [f32::from(self.r), f32::from(self.g), f32::from(self.b)]
    }

    /// Build a colour from float channels, rounding and clamping each one
    pub fn from_array_f32(channels: [f32; 3]) -> Self {
        Rgb::new(
            channel(channels[0]),
            channel(channels[1]),
            channel(channels[2]),
        )
    }

    /// Linear interpolation towards `other` by `t` (unclamped `t` is clamped)
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let a = self.to_array_f32();
        let b = other.to_array_f32();
        Rgb::from_array_f32([
            lerp(a[0], b[0], t),
            lerp(a[1], b[1], t),
            lerp(a[2], b[2], t),
        ])
    }

    pub fn is_black(self) -> bool {
        self == Rgb::BLACK
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Round a float colour channel into `[0, 255]`
///
/// Non-finite values collapse to 0.
pub fn channel(value: f32) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

/// Round a float brightness into `[min, MAX_BRIGHTNESS]`
pub fn brightness(value: f32, min: u8) -> u8 {
    if value.is_finite() {
        value
            .round()
            .clamp(f32::from(min), f32::from(MAX_BRIGHTNESS)) as u8
    } else {
        min
    }
}
