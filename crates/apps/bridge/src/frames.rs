//! Observation frames from the running game
//!
//! Frames arrive as JSON lines. Each one holds absolute positions; the
//! conversion makes them observer-relative, resolves light colours through
//! the catalog and drops lights beyond the scan radius.

use crate::catalog::{parse_form_id, LightCatalog};
use crate::config::RawPosition;
use lighting::glam::Vec3;
use lighting::{NearbyLight, WorldSnapshot};
use serde::Deserialize;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

/// One raw observation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Frame {
    pub hour: f32,
    pub in_combat: bool,
    pub torch_equipped: bool,
    pub yaw: f32,
    pub indoors: bool,
    pub player_position: FramePosition,
    pub lights: Vec<FrameLight>,
}

/// Absolute world position
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(from = "RawPosition")]
pub struct FramePosition(pub Vec3);

impl From<RawPosition> for FramePosition {
    fn from(p: RawPosition) -> Self {
        FramePosition(p.into())
    }
}

/// A light reference seen near the player
#[derive(Debug, Deserialize)]
pub struct FrameLight {
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub position: Option<FramePosition>,
    #[serde(default = "default_object_type")]
    pub object_type: String,
}

fn default_object_type() -> String {
    "fire".to_string()
}

impl Frame {
    /// Convert into the snapshot the lighting pipeline consumes
    pub fn to_snapshot(&self, catalog: &LightCatalog, scan_radius: f32) -> WorldSnapshot {
        let player = self.player_position.0;
        let nearby_lights = self
            .lights
            .iter()
            .filter_map(|light| {
                let Some(position) = light.position else {
                    tracing::warn!(
                        "Skipping light {} without a position",
                        light.form_id.as_deref().unwrap_or("(no form id)")
                    );
                    return None;
                };
                let relative = position.0 - player;
                if relative.length() > scan_radius {
                    return None;
                }
                let form_id = light.form_id.as_deref().and_then(parse_form_id);
                let (color, intensity) = catalog.appearance_of(form_id);
                Some(NearbyLight::new(
                    relative,
                    light.object_type.clone(),
                    color,
                    intensity,
                ))
            })
            .collect();

        WorldSnapshot {
            hour: self.hour,
            in_combat: self.in_combat,
            torch_equipped: self.torch_equipped,
            observer_yaw: self.yaw,
            is_indoors: self.indoors,
            nearby_lights,
        }
    }
}

type BoxedReader = Box<dyn AsyncRead + Unpin + Send>;

/// Reads frames line by line from a file or stdin
pub struct FrameReader {
    lines: Lines<BufReader<BoxedReader>>,
    line_number: usize,
}

impl FrameReader {
    pub fn new(reader: impl AsyncRead + Unpin + Send + 'static) -> Self {
        let boxed: BoxedReader = Box::new(reader);
        Self {
            lines: BufReader::new(boxed).lines(),
            line_number: 0,
        }
    }

    /// Open a file, or stdin when `path` is `-`
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        if path == Path::new("-") {
            return Ok(Self::new(tokio::io::stdin()));
        }
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(file))
    }

    /// Next well-formed frame, or `None` at end of input
    ///
    /// Blank lines are ignored; malformed lines are logged and skipped.
    pub async fn next_frame(&mut self) -> std::io::Result<Option<Frame>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Frame>(line) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    tracing::warn!("Skipping malformed frame on line {}: {}", self.line_number, e)
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighting::Rgb;

    fn catalog() -> LightCatalog {
        LightCatalog::from_json(
            r#"[{"form_id": "0001D4EC", "color_r": 255, "color_g": 200, "color_b": 100, "radius": 300}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_positions_become_observer_relative() {
        let frame: Frame = serde_json::from_str(
            r#"{
                "hour": 21.5, "yaw": 1.0, "indoors": true,
                "player_position": {"x": 1000, "y": 500, "z": 0},
                "lights": [
                    {"form_id": "0001D4EC", "position": {"x": 1100, "y": 500, "z": 40}},
                    {"form_id": "00000001", "position": {"x": 5000, "y": 500}}
                ]
            }"#,
        )
        .unwrap();

        let snapshot = frame.to_snapshot(&catalog(), 400.0);
        assert_eq!(snapshot.hour, 21.5);
        assert_eq!(snapshot.observer_yaw, 1.0);
        assert!(snapshot.is_indoors);
        assert_eq!(snapshot.nearby_lights.len(), 1);

        let light = &snapshot.nearby_lights[0];
        assert_eq!(light.relative_position, Vec3::new(100.0, 0.0, 40.0));
        assert_eq!(light.object_type, "fire");
        assert_eq!(light.color, Rgb::new(255, 200, 100));
        assert_eq!(light.intensity, 300.0);
    }

    #[test]
    fn test_light_without_position_is_dropped() {
        let frame: Frame = serde_json::from_str(
            r#"{
                "player_position": {"x": 50},
                "lights": [
                    {"form_id": "0001D4EC"},
                    {"form_id": "0001D4EC", "position": {"x": 0}}
                ]
            }"#,
        )
        .unwrap();
        assert!(frame.lights[0].position.is_none());

        let snapshot = frame.to_snapshot(&catalog(), 400.0);
        assert_eq!(snapshot.nearby_lights.len(), 1);
        assert_eq!(
            snapshot.nearby_lights[0].relative_position,
            Vec3::new(-50.0, 0.0, 0.0)
        );
    }

    #[tokio::test]
    async fn test_reader_skips_bad_lines() {
        let input: &[u8] = b"{\"hour\": 1}\n\nnot json\n{\"hour\": 2, \"in_combat\": true}\n";
        let mut reader = FrameReader::new(input);

        let first = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(first.hour, 1.0);
        let second = reader.next_frame().await.unwrap().unwrap();
        assert!(second.in_combat);
        assert!(reader.next_frame().await.unwrap().is_none());
    }
}
