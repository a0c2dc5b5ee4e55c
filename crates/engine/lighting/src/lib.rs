//! Lighting crate - derives real-world fixture states from game light
//!
//! Each tick the host samples the running game into a [`WorldSnapshot`] and
//! hands it, together with an immutable [`LightingConfig`], to a
//! [`TickOrchestrator`]. The orchestrator returns one [`FixtureState`] per
//! configured fixture, ready for a delivery layer to push to the lighting
//! controller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Tick Orchestrator                     │
//! ├─────────────────────────────────────────────────────────┤
//! │  Dynamic layer                                           │
//! │  └── DirectionalMapper - game lights onto fixtures      │
//! ├─────────────────────────────────────────────────────────┤
//! │  Base layer                                              │
//! │  ├── Scenario resolver - highest-priority trigger       │
//! │  ├── DayNightCurve - ambient colour by hour             │
//! │  └── Indoor inherit - no ambient under a roof           │
//! ├─────────────────────────────────────────────────────────┤
//! │  Output                                                  │
//! │  ├── Blend - fire influence over the base layer         │
//! │  └── TemporalSmoother - per-fixture moving average      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use lighting::glam::Vec3;
//! use lighting::{
//!     DayNightCurve, DayNightKeyframe, FixturePosition, LightingConfig, LightingOptions,
//!     NearbyLight, Rgb, TickOrchestrator, WorldSnapshot,
//! };
//!
//! let config = LightingConfig::new(
//!     vec![FixturePosition::new("light.desk", Vec3::new(150.0, 0.0, 0.0))],
//!     DayNightCurve::new([
//!         DayNightKeyframe::new(6, Rgb::new(255, 200, 150), 80),
//!         DayNightKeyframe::new(22, Rgb::new(20, 20, 60), 10),
//!     ]),
//!     Vec::new(),
//!     LightingOptions::default(),
//! )
//! .unwrap();
//!
//! let snapshot = WorldSnapshot {
//!     hour: 23.0,
//!     nearby_lights: vec![NearbyLight::new(
//!         Vec3::new(120.0, 10.0, 0.0),
//!         "fire",
//!         Rgb::FIRE_ORANGE,
//!         256.0,
//!     )],
//!     ..Default::default()
//! };
//!
//! let mut orchestrator = TickOrchestrator::new();
//! let states = orchestrator.tick(&snapshot, &config);
//! assert_eq!(states.len(), 1);
//! ```

pub mod ambient;
pub mod blend;
pub mod color;
mod config;
mod error;
pub mod geometry;
pub mod mapper;
mod orchestrator;
pub mod scenario;
mod snapshot;
pub mod smoother;
mod state;

pub use ambient::{AmbientSample, DayNightCurve, DayNightKeyframe};
pub use color::Rgb;
pub use config::{FixturePosition, LightingConfig, LightingOptions};
pub use error::{Error, Result};
pub use mapper::DirectionalMapper;
pub use orchestrator::{base_targets, BaseSource, TickOrchestrator};
pub use scenario::{ScenarioRule, TriggerSpec};
pub use smoother::{SmootherMemory, TemporalSmoother};
pub use snapshot::{DynamicLightSource, NearbyLight, WorldSnapshot};
pub use state::{
    Appearance, FixtureState, FixtureTarget, FlickerParams, EFFECT_FLICKER, EFFECT_SCENE,
};

// Re-export glam for convenience
pub use glam;
