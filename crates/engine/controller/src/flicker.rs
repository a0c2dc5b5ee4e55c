//! Per-send flicker perturbation

use lighting::color::{MAX_BRIGHTNESS, MIN_BRIGHTNESS};
use lighting::{FlickerParams, Rgb};
use rand::Rng;

/// Offset a base colour and brightness by uniform random amounts
///
/// Each channel moves by at most its bound in either direction. Colour is
/// clamped to `[0, 255]`, brightness to `[10, 100]`.
pub fn perturb<R: Rng + ?Sized>(
    rng: &mut R,
    base: Rgb,
    brightness_pct: u8,
    params: &FlickerParams,
) -> (Rgb, u8) {
    let rgb = Rgb::new(
        jitter(rng, base.r, params.dr, 0, 255),
        jitter(rng, base.g, params.dg, 0, 255),
        jitter(rng, base.b, params.db, 0, 255),
    );
    let brightness = jitter(
        rng,
        brightness_pct,
        params.dbrightness,
        MIN_BRIGHTNESS,
        MAX_BRIGHTNESS,
    );
    (rgb, brightness)
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, value: u8, bound: u8, min: u8, max: u8) -> u8 {
    let d = i32::from(bound);
    let offset = if d == 0 { 0 } else { rng.random_range(-d..=d) };
    (i32::from(value) + offset).clamp(i32::from(min), i32::from(max)) as u8
}
