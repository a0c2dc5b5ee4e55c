//! Light definitions keyed by game form id
//!
//! The catalog supplies colour and radius for lights the game reports only
//! by form id.

use crate::config::{ConfigError, Result};
use lighting::Rgb;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Intensity assumed for lights with no definition
pub const DEFAULT_RADIUS: f32 = 256.0;

/// One entry of the lights database
#[derive(Debug, Clone, PartialEq)]
pub struct LightDefinition {
    pub form_id: u32,
    pub editor_id: String,
    pub name: String,
    pub color: Rgb,
    pub radius: f32,
    pub duration: f32,
    pub fade: f32,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    form_id: Option<String>,
    #[serde(default)]
    editor_id: String,
    #[serde(default)]
    name: String,
    #[serde(default = "full_channel")]
    color_r: u8,
    #[serde(default = "full_channel")]
    color_g: u8,
    #[serde(default = "full_channel")]
    color_b: u8,
    #[serde(default = "default_radius")]
    radius: f32,
    #[serde(default)]
    duration: f32,
    #[serde(default)]
    fade: f32,
}

fn full_channel() -> u8 {
    255
}

fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

/// Parse a hex form id such as `"0001D4EC"` or `"0x1D4EC"`
pub fn parse_form_id(text: &str) -> Option<u32> {
    let digits = text
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u32::from_str_radix(digits, 16).ok()
}

/// Lookup table of light definitions
#[derive(Debug, Clone, Default)]
pub struct LightCatalog {
    definitions: HashMap<u32, LightDefinition>,
}

impl LightCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&text)?;
        tracing::info!(
            "Loaded {} light definitions from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a JSON array of definitions
    ///
    /// Entries without a form id, or with one that is not valid hex, are
    /// skipped.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Vec<RawDefinition> = serde_json::from_str(text)?;
        let mut definitions = HashMap::with_capacity(raw.len());
        for entry in raw {
            let Some(form_id) = entry.form_id.as_deref().and_then(parse_form_id) else {
                tracing::debug!("Skipping light definition without a valid form_id");
                continue;
            };
            definitions.insert(
                form_id,
                LightDefinition {
                    form_id,
                    editor_id: entry.editor_id,
                    name: entry.name,
                    color: Rgb::new(entry.color_r, entry.color_g, entry.color_b),
                    radius: entry.radius,
                    duration: entry.duration,
                    fade: entry.fade,
                },
            );
        }
        Ok(Self { definitions })
    }

    pub fn get(&self, form_id: u32) -> Option<&LightDefinition> {
        self.definitions.get(&form_id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Colour and intensity to use for an observed light
    ///
    /// Unknown lights are white at [`DEFAULT_RADIUS`]. A definition with no
    /// colour at all is treated as fire.
    pub fn appearance_of(&self, form_id: Option<u32>) -> (Rgb, f32) {
        match form_id.and_then(|id| self.get(id)) {
            Some(def) if def.color.is_black() => (Rgb::FIRE_ORANGE, def.radius),
            Some(def) => (def.color, def.radius),
            None => (Rgb::WHITE, DEFAULT_RADIUS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHTS: &str = r#"[
        {"form_id": "0001D4EC", "editor_id": "Torch01", "color_r": 255, "color_g": 180, "color_b": 90, "radius": 512},
        {"form_id": "00031897", "editor_id": "FireDark", "color_r": 0, "color_g": 0, "color_b": 0},
        {"editor_id": "NoId"},
        {"form_id": "zzz"}
    ]"#;

    #[test]
    fn test_skips_entries_without_valid_id() {
        let catalog = LightCatalog::from_json(LIGHTS).unwrap();
        assert_eq!(catalog.len(), 2);
        let torch = catalog.get(0x0001D4EC).unwrap();
        assert_eq!(torch.editor_id, "Torch01");
        assert_eq!(torch.radius, 512.0);
    }

    #[test]
    fn test_appearance_fallbacks() {
        let catalog = LightCatalog::from_json(LIGHTS).unwrap();
        assert_eq!(
            catalog.appearance_of(Some(0x0001D4EC)),
            (Rgb::new(255, 180, 90), 512.0)
        );
        assert_eq!(
            catalog.appearance_of(Some(0x00031897)),
            (Rgb::FIRE_ORANGE, DEFAULT_RADIUS)
        );
        assert_eq!(catalog.appearance_of(Some(0xDEAD)), (Rgb::WHITE, DEFAULT_RADIUS));
        assert_eq!(catalog.appearance_of(None), (Rgb::WHITE, DEFAULT_RADIUS));
    }

    #[test]
    fn test_parse_form_id() {
        assert_eq!(parse_form_id("0x1D4EC"), Some(0x1D4EC));
        assert_eq!(parse_form_id(" 0001d4ec "), Some(0x1D4EC));
        assert_eq!(parse_form_id(""), None);
    }
}
