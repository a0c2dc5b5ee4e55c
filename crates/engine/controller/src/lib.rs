//! Home Assistant delivery for lighting fixture states
//!
//! The [`Dispatcher`] takes the states produced by a lighting tick and turns
//! them into service calls on a [`LightService`]:
//!
//! - **HomeAssistantClient**: REST client with retry and exponential backoff
//! - **DryRunService**: logs calls instead of sending them
//! - **Scenes**: two-phase activation of controller-side scenes
//! - **Flicker**: randomised colour/brightness around an animated state
//! - **State cache**: unchanged static fixtures are not re-sent
//!
//! # Example
//!
//! ```no_run
//! use controller::{Dispatcher, HomeAssistantClient};
//! use lighting::{Appearance, FixtureState, Rgb};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HomeAssistantClient::new("http://homeassistant.local:8123", "token");
//!     let mut dispatcher = Dispatcher::new(client);
//!
//!     let states = vec![FixtureState::set("light.desk", Appearance::new(Rgb::FIRE_ORANGE, 60))];
//!     let report = dispatcher.dispatch(&states).await?;
//!     println!("{} sent, {} failed", report.sent, report.failed);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dispatcher;
mod error;
pub mod flicker;
pub mod payload;
mod service;

pub use client::HomeAssistantClient;
pub use dispatcher::{DispatchReport, Dispatcher, DEFAULT_SETTLE_DELAY};
pub use error::{ControllerError, Result};
pub use payload::{LightCommand, SelectCommand};
pub use service::{DryRunService, LightService};
