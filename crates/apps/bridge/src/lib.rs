//! Bridge crate.
//!
//! Host glue between a running game and Home Assistant: configuration and
//! hot reload, the lights catalog, observation frames, and the tick loop
//! that feeds the `lighting` pipeline into the `controller` dispatcher.

pub mod catalog;
pub mod config;
pub mod frames;
pub mod runtime;
pub mod stats;
pub mod watcher;

pub use catalog::{LightCatalog, LightDefinition};
pub use config::{BridgeConfig, ConfigError, HomeAssistantSettings};
pub use frames::{Frame, FrameReader};
pub use runtime::Bridge;
pub use stats::{start_stats_reporter, TickStats};
pub use watcher::ConfigWatcher;
