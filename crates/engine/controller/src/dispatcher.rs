//! Turns a tick's fixture states into service calls
//!
//! Scene fixtures go out in two phases so the controller has switched into
//! scene mode before the scene is picked:
//!
//! ```text
//! phase 1: light.turn_on {effect: "scene"}     (every scene fixture)
//!          settle delay                         (once)
//! phase 2: select.select_option {option: name} (fixtures whose phase 1 worked)
//! ```
//!
//! Everything else is a single `light.turn_on`, preceded by `effect: "off"`
//! when the fixture was last left in a scene.

use crate::flicker::perturb;
use crate::{ControllerError, LightCommand, LightService, Result, SelectCommand};
use lighting::{Appearance, FixtureState, FixtureTarget, EFFECT_SCENE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Pause after switching a fixture's effect mode
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Outcome of one [`Dispatcher::dispatch`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Service calls that succeeded
    pub sent: usize,
    /// Fixtures that needed no call (inherit, or unchanged static state)
    pub skipped: usize,
    /// Service calls that failed
    pub failed: usize,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Delivers fixture states and remembers what each fixture was last told
pub struct Dispatcher<S> {
    service: S,
    last_commanded: HashMap<String, Appearance>,
    settle_delay: Duration,
    rng: StdRng,
}

impl<S: LightService> Dispatcher<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            last_commanded: HashMap::new(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Set the pause after effect switches
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Seed the flicker generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Appearance last delivered successfully to a fixture
    pub fn last_commanded(&self, fixture_id: &str) -> Option<&Appearance> {
        self.last_commanded.get(fixture_id)
    }

    /// Deliver one tick's states
    ///
    /// Individual call failures are logged and counted. The only error is a
    /// service that is not configured, in which case nothing is sent.
    pub async fn dispatch(&mut self, states: &[FixtureState]) -> Result<DispatchReport> {
        if !self.service.is_configured() {
            tracing::debug!("Not dispatching: Home Assistant URL or token missing");
            return Err(ControllerError::NotConfigured);
        }

        let mut report = DispatchReport::default();
        let mut scenes = Vec::new();
        let mut normal = Vec::new();

        for state in states {
            match &state.target {
                FixtureTarget::Inherit => report.skipped += 1,
                FixtureTarget::Set(appearance) if appearance.is_scene() => {
                    scenes.push((state.fixture_id.as_str(), appearance))
                }
                FixtureTarget::Set(appearance) => {
                    normal.push((state.fixture_id.as_str(), appearance))
                }
            }
        }

        self.send_scenes(&scenes, &mut report).await;
        for (fixture_id, appearance) in normal {
            self.send_normal(fixture_id, appearance, &mut report).await;
        }

        tracing::debug!(
            "Dispatched {} states: {} sent, {} skipped, {} failed",
            states.len(),
            report.sent,
            report.skipped,
            report.failed
        );
        Ok(report)
    }

    async fn send_scenes(&mut self, scenes: &[(&str, &Appearance)], report: &mut DispatchReport) {
        if scenes.is_empty() {
            return;
        }

        let mut ready = HashSet::new();
        for (fixture_id, _) in scenes {
            let command = LightCommand::effect_only(*fixture_id, EFFECT_SCENE);
            match self.service.turn_on(&command).await {
                Ok(()) => {
                    report.sent += 1;
                    ready.insert(*fixture_id);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Scene mode for {} failed: {}", fixture_id, e);
                }
            }
        }

        self.settle().await;

        for (fixture_id, appearance) in scenes {
            if !ready.contains(fixture_id) {
                tracing::warn!("Skipping scene selection for {}: scene mode failed", fixture_id);
                continue;
            }
            let Some(scene) = appearance.scene.as_deref() else {
                continue;
            };
            let command = SelectCommand::scene_for(fixture_id, scene);
            match self.service.select_option(&command).await {
                Ok(()) => {
                    report.sent += 1;
                    self.last_commanded
                        .insert(fixture_id.to_string(), (*appearance).clone());
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Selecting scene on {} failed: {}", command.entity_id, e);
                }
            }
        }
    }

    async fn send_normal(
        &mut self,
        fixture_id: &str,
        appearance: &Appearance,
        report: &mut DispatchReport,
    ) {
        let last = self.last_commanded.get(fixture_id);
        let was_scene = last.is_some_and(|l| l.effect.as_deref() == Some(EFFECT_SCENE));
        let animated = appearance.is_animated();

        if was_scene {
            let command = LightCommand::effect_only(fixture_id, "off");
            match self.service.turn_on(&command).await {
                Ok(()) => {
                    report.sent += 1;
                    self.settle().await;
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Clearing scene on {} failed: {}", fixture_id, e);
                }
            }
        } else if !animated && last == Some(appearance) {
            tracing::trace!("{} already in desired state", fixture_id);
            report.skipped += 1;
            return;
        }

        let command = if animated {
            let params = appearance.flicker.unwrap_or_default();
            let (rgb, brightness) = perturb(
                &mut self.rng,
                appearance.rgb,
                appearance.brightness_pct,
                &params,
            );
            LightCommand::color(fixture_id, rgb.into(), brightness)
        } else {
            let command =
                LightCommand::color(fixture_id, appearance.rgb.into(), appearance.brightness_pct);
            match &appearance.effect {
                Some(effect) => command.with_effect(effect.clone()),
                None => command,
            }
        };

        match self.service.turn_on(&command).await {
            Ok(()) => {
                report.sent += 1;
                self.last_commanded
                    .insert(fixture_id.to_string(), appearance.clone());
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!("Setting {} failed: {}", fixture_id, e);
            }
        }
    }

    async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }
}
