//! Tick orchestration
//!
//! One call to [`TickOrchestrator::tick`] runs the whole pipeline for a
//! snapshot:
//!
//! ```text
//! snapshot ─┬─ nearby lights ─► DirectionalMapper ──► dynamic targets ─┐
//!           │                                                          ├─► blend ─► smoother ─► states
//!           └─ resolver ─► scenario outcome | ambient | indoor inherit ┘
//! ```
//!
//! The orchestrator performs no I/O. Its only state is the smoother
//! history, so exclusive access (`&mut self`) to it covers a whole tick.

use crate::blend::blend_all;
use crate::scenario::resolve;
use crate::{Appearance, FixtureState, LightingConfig, TemporalSmoother, WorldSnapshot};

/// Where a tick's base layer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSource<'a> {
    /// Outcome of the named scenario
    Scenario(&'a str),
    /// Day/night ambient curve
    Ambient,
    /// Indoors with no scenario: only dynamic light shows
    Indoors,
}

impl std::fmt::Display for BaseSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseSource::Scenario(name) => write!(f, "scenario '{}'", name),
            BaseSource::Ambient => write!(f, "ambient"),
            BaseSource::Indoors => write!(f, "indoors"),
        }
    }
}

/// Base-layer targets for every fixture, in fixture order
///
/// The active scenario's outcome wins; fixtures it does not mention
/// inherit. Without a scenario the ambient curve applies outdoors and
/// every fixture inherits indoors.
pub fn base_targets<'a>(
    snapshot: &WorldSnapshot,
    config: &'a LightingConfig,
) -> (BaseSource<'a>, Vec<FixtureState>) {
    let fixtures = config.fixtures();

    if let Some(rule) = resolve(snapshot, config.scenarios()) {
        let states = fixtures
            .iter()
            .map(|fixture| {
                rule.outcome_for(&fixture.id)
                    .cloned()
                    .unwrap_or_else(|| FixtureState::inherit(fixture.id.clone()))
            })
            .collect();
        return (BaseSource::Scenario(rule.name()), states);
    }

    if snapshot.is_indoors {
        let states = fixtures
            .iter()
            .map(|fixture| FixtureState::inherit(fixture.id.clone()))
            .collect();
        return (BaseSource::Indoors, states);
    }

    let sample = config.day_night().evaluate(snapshot.hour);
    let states = fixtures
        .iter()
        .map(|fixture| {
            FixtureState::set(
                fixture.id.clone(),
                Appearance::new(sample.rgb, sample.brightness_pct),
            )
        })
        .collect();
    (BaseSource::Ambient, states)
}

/// Runs the lighting pipeline once per tick
#[derive(Debug, Default)]
pub struct TickOrchestrator {
    smoother: TemporalSmoother,
}

impl TickOrchestrator {
    pub fn new() -> Self {
        TickOrchestrator::default()
    }

    /// Derive the final state of every configured fixture
    ///
    /// Output has one entry per fixture, in configuration order.
    pub fn tick(&mut self, snapshot: &WorldSnapshot, config: &LightingConfig) -> Vec<FixtureState> {
        let options = config.options();

        let lights = snapshot.dynamic_lights();
        let dynamic = options
            .mapper()
            .map(config.fixtures(), &lights, snapshot.observer_yaw);

        let (source, base) = base_targets(snapshot, config);
        tracing::debug!(
            "Tick at hour {:.2}: base layer from {}, {} nearby lights",
            snapshot.hour_of_day(),
            source,
            lights.len()
        );

        let blended = blend_all(&dynamic, &base);
        let states = self.smoother.smooth_all(&blended, options.smoothing_factor);

        for state in &states {
            tracing::trace!("{} -> {:?}", state.fixture_id, state.target);
        }
        states
    }

    /// Forget smoothing history, e.g. after a configuration reload
    pub fn clear_history(&mut self) {
        self.smoother.clear();
    }

    pub fn smoother(&self) -> &TemporalSmoother {
        &self.smoother
    }
}
