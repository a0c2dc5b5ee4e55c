//! The tick loop
//!
//! A single task owns the orchestrator, so each tick (reload check, frame
//! read, pipeline run, dispatch) runs to completion before the next starts.

use crate::catalog::LightCatalog;
use crate::config::BridgeConfig;
use crate::frames::FrameReader;
use crate::stats::TickStats;
use crate::watcher::ConfigWatcher;
use controller::{ControllerError, DispatchReport, Dispatcher, LightService};
use lighting::{TickOrchestrator, WorldSnapshot};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Drives the lighting pipeline from frames to service calls
pub struct Bridge<S> {
    config_path: PathBuf,
    config: BridgeConfig,
    catalog: LightCatalog,
    orchestrator: TickOrchestrator,
    dispatcher: Dispatcher<S>,
    stats: Arc<TickStats>,
    watcher: Option<ConfigWatcher>,
    reported_unconfigured: bool,
}

impl<S: LightService> Bridge<S> {
    pub fn new(
        config_path: impl Into<PathBuf>,
        config: BridgeConfig,
        catalog: LightCatalog,
        dispatcher: Dispatcher<S>,
    ) -> Self {
        Self {
            config_path: config_path.into(),
            config,
            catalog,
            orchestrator: TickOrchestrator::new(),
            dispatcher,
            stats: Arc::new(TickStats::new()),
            watcher: None,
            reported_unconfigured: false,
        }
    }

    /// Reload the configuration whenever the watcher reports a change
    pub fn with_watcher(mut self, watcher: ConfigWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn stats(&self) -> Arc<TickStats> {
        self.stats.clone()
    }

    pub fn orchestrator(&self) -> &TickOrchestrator {
        &self.orchestrator
    }

    /// Re-read the configuration file
    ///
    /// On success the new configuration replaces the old one and smoothing
    /// history is cleared. On failure the previous configuration stays.
    pub fn reload(&mut self) -> bool {
        match BridgeConfig::load(&self.config_path) {
            Ok(config) => {
                if config.home_assistant != self.config.home_assistant {
                    tracing::warn!("Home Assistant settings changed; restart to apply them");
                }
                self.config = config;
                self.orchestrator.clear_history();
                self.stats.record_reload();
                tracing::info!(
                    "Configuration reloaded: {} fixtures, {} scenarios",
                    self.config.lighting.fixtures().len(),
                    self.config.lighting.scenarios().len()
                );
                true
            }
            Err(e) => {
                tracing::error!("Failed to reload configuration, keeping previous: {}", e);
                false
            }
        }
    }

    fn apply_pending_reload(&mut self) -> bool {
        let changed = self
            .watcher
            .as_ref()
            .is_some_and(ConfigWatcher::poll_changed);
        changed && self.reload()
    }

    /// Run the pipeline for one snapshot and deliver the result
    pub async fn tick(&mut self, snapshot: &WorldSnapshot) -> DispatchReport {
        let states = self.orchestrator.tick(snapshot, &self.config.lighting);

        let report = match self.dispatcher.dispatch(&states).await {
            Ok(report) => {
                self.reported_unconfigured = false;
                report
            }
            Err(ControllerError::NotConfigured) => {
                if !self.reported_unconfigured {
                    tracing::error!(
                        "Cannot send light commands: Home Assistant URL or token not configured"
                    );
                    self.reported_unconfigured = true;
                }
                DispatchReport::default()
            }
            Err(e) => {
                tracing::error!("Dispatch failed: {}", e);
                DispatchReport {
                    failed: 1,
                    ..Default::default()
                }
            }
        };

        self.stats.record_tick(&report);
        report
    }

    /// Tick once per interval until the frame source runs dry
    pub async fn run(&mut self, frames: &mut FrameReader, initial_delay: Duration) -> anyhow::Result<()> {
        if !initial_delay.is_zero() {
            tracing::info!("Waiting {:?} before the first tick", initial_delay);
            tokio::time::sleep(initial_delay).await;
        }

        let mut period = self.config.tick_interval;
        let mut clock = tick_clock(period);
        tracing::info!("Tick loop started ({:?} interval)", period);

        loop {
            clock.tick().await;

            if self.apply_pending_reload() && self.config.tick_interval != period {
                period = self.config.tick_interval;
                clock = tick_clock(period);
                tracing::info!("Tick interval changed to {:?}", period);
            }

            let Some(frame) = frames.next_frame().await? else {
                tracing::info!("Frame input ended");
                break;
            };
            let snapshot = frame.to_snapshot(&self.catalog, self.config.lighting.scan_radius());
            self.tick(&snapshot).await;
        }

        self.stats.print_stats();
        Ok(())
    }
}

fn tick_clock(period: Duration) -> Interval {
    let mut clock = interval(period);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    clock
}
