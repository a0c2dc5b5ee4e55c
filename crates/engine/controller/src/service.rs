//! Service seam between the dispatcher and the lighting controller

use crate::{LightCommand, Result, SelectCommand};
use std::future::Future;

/// The two Home Assistant calls the bridge needs
pub trait LightService {
    /// `light.turn_on`
    fn turn_on(&self, command: &LightCommand) -> impl Future<Output = Result<()>> + Send;

    /// `select.select_option`
    fn select_option(&self, command: &SelectCommand) -> impl Future<Output = Result<()>> + Send;

    /// Whether the service has what it needs to send anything at all
    fn is_configured(&self) -> bool {
        true
    }
}

/// Logs every call instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunService;

impl LightService for DryRunService {
    async fn turn_on(&self, command: &LightCommand) -> Result<()> {
        tracing::info!(
            "[dry-run] light.turn_on {}",
            serde_json::to_string(command).unwrap_or_default()
        );
        Ok(())
    }

    async fn select_option(&self, command: &SelectCommand) -> Result<()> {
        tracing::info!(
            "[dry-run] select.select_option {}",
            serde_json::to_string(command).unwrap_or_default()
        );
        Ok(())
    }
}
