//! Scenario rules and the resolver that picks the active one
//!
//! A scenario pairs a trigger predicate with an outcome: a list of fixture
//! states to show while it is active. Every tick all triggers are evaluated
//! against the snapshot and the matching rule with the highest priority
//! wins. Rules sharing the top priority resolve to the one listed first.

use crate::{FixtureState, WorldSnapshot};
use serde::{Deserialize, Serialize};

/// Search radius used when a `near_object` trigger does not name one
pub const DEFAULT_NEAR_RADIUS: f32 = 400.0;

fn default_near_radius() -> f32 {
    DEFAULT_NEAR_RADIUS
}

/// Condition under which a scenario activates
///
/// Serialised with a `type` tag. Tags that are not recognised deserialise
/// to [`TriggerSpec::Unknown`], which never fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerSpec {
    /// Always active (useful as a low-priority default)
    Always,

    /// Active while the player is in combat
    #[serde(rename = "player_in_combat", alias = "in_combat")]
    InCombat,

    /// Active while a torch is held in either hand
    TorchEquipped,

    /// Active inside an hour window
    ///
    /// Non-wrapping windows are half-open `[min_hour, max_hour)`. When
    /// `min_hour > max_hour` the window spans midnight.
    #[serde(rename = "game_hour_range", alias = "hour_range")]
    HourRange {
        min_hour: u8,
        max_hour: u8,
    },

    /// Active when a light of `object_type` is within `radius` of the player
    NearObject {
        object_type: String,
        #[serde(default = "default_near_radius")]
        radius: f32,
    },

    /// Unrecognised trigger kind
    #[serde(other)]
    Unknown,
}

impl TriggerSpec {
    /// Evaluate the trigger against a snapshot
    pub fn is_met(&self, snapshot: &WorldSnapshot) -> bool {
        match self {
            TriggerSpec::Always => true,

            TriggerSpec::InCombat => snapshot.in_combat,

            TriggerSpec::TorchEquipped => snapshot.torch_equipped,

            TriggerSpec::HourRange { min_hour, max_hour } => {
                hour_in_range(snapshot.hour_of_day(), *min_hour, *max_hour)
            }

            TriggerSpec::NearObject {
                object_type,
                radius,
            } => *radius > 0.0 && snapshot.has_light_within(object_type, *radius),

            TriggerSpec::Unknown => false,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, TriggerSpec::Unknown)
    }

    /// Radius this trigger scans for nearby lights, if any
    pub fn scan_radius(&self) -> Option<f32> {
        match self {
            TriggerSpec::NearObject { radius, .. } => Some(*radius),
            _ => None,
        }
    }
}

/// Whether `hour` (already wrapped into `[0, 24)`) falls in the window
fn hour_in_range(hour: f32, min_hour: u8, max_hour: u8) -> bool {
    let min = f32::from(min_hour);
    let max = f32::from(max_hour);
    if min <= max {
        hour >= min && hour < max
    } else {
        hour >= min || hour < max
    }
}

/// A prioritised scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRule {
    /// Human-readable name, used in logs
    name: String,

    /// Priority (higher wins)
    priority: i32,

    /// Activation condition
    trigger: TriggerSpec,

    /// Fixture states to show while active
    #[serde(default)]
    outcome: Vec<FixtureState>,
}

impl ScenarioRule {
    /// Create a rule with priority 0 and an empty outcome
    pub fn new(name: impl Into<String>, trigger: TriggerSpec) -> Self {
        ScenarioRule {
            name: name.into(),
            priority: 0,
            trigger,
            outcome: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn trigger(&self) -> &TriggerSpec {
        &self.trigger
    }

    pub fn outcome(&self) -> &[FixtureState] {
        &self.outcome
    }

    /// Set the rule's priority (builder pattern)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Add a fixture state to the outcome (builder pattern)
    pub fn then(mut self, state: FixtureState) -> Self {
        self.outcome.push(state);
        self
    }

    /// Add several fixture states to the outcome (builder pattern)
    pub fn then_all(mut self, states: impl IntoIterator<Item = FixtureState>) -> Self {
        self.outcome.extend(states);
        self
    }

    /// Outcome entry for a fixture; the first one wins if listed twice
    pub fn outcome_for(&self, fixture_id: &str) -> Option<&FixtureState> {
        self.outcome.iter().find(|s| s.fixture_id == fixture_id)
    }

    /// Check whether this rule's trigger fires for `snapshot`
    pub fn matches(&self, snapshot: &WorldSnapshot) -> bool {
        self.trigger.is_met(snapshot)
    }
}

/// Pick the active scenario for a snapshot
///
/// Returns the matching rule with the strictly greatest priority; among
/// rules sharing that priority the earliest in `rules` wins. `None` when no
/// trigger fires.
pub fn resolve<'a>(snapshot: &WorldSnapshot, rules: &'a [ScenarioRule]) -> Option<&'a ScenarioRule> {
    rules
        .iter()
        .filter(|rule| rule.matches(snapshot))
        .fold(None, |best: Option<&ScenarioRule>, rule| match best {
            Some(current) if current.priority >= rule.priority => Some(current),
            _ => Some(rule),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::{NearbyLight, Rgb};

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot {
            hour: 12.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_combat_beats_always() {
        let rules = vec![
            ScenarioRule::new("combat", TriggerSpec::InCombat).with_priority(5),
            ScenarioRule::new("default", TriggerSpec::Always).with_priority(1),
        ];

        let mut snap = snapshot();
        snap.in_combat = true;
        assert_eq!(resolve(&snap, &rules).map(|r| r.name()), Some("combat"));

        snap.in_combat = false;
        assert_eq!(resolve(&snap, &rules).map(|r| r.name()), Some("default"));
    }

    #[test]
    fn test_equal_priority_first_listed_wins() {
        let rules = vec![
            ScenarioRule::new("first", TriggerSpec::Always).with_priority(3),
            ScenarioRule::new("second", TriggerSpec::Always).with_priority(3),
            ScenarioRule::new("lower", TriggerSpec::Always).with_priority(1),
        ];
        assert_eq!(resolve(&snapshot(), &rules).map(|r| r.name()), Some("first"));
    }

    #[test]
    fn test_negative_priorities_still_resolve() {
        let rules = vec![ScenarioRule::new("fallback", TriggerSpec::Always).with_priority(-10)];
        assert_eq!(resolve(&snapshot(), &rules).map(|r| r.name()), Some("fallback"));
    }

    #[test]
    fn test_no_match_is_none() {
        let rules = vec![
            ScenarioRule::new("combat", TriggerSpec::InCombat),
            ScenarioRule::new("torch", TriggerSpec::TorchEquipped),
            ScenarioRule::new("mystery", TriggerSpec::Unknown).with_priority(100),
        ];
        assert!(resolve(&snapshot(), &rules).is_none());
    }

    #[test]
    fn test_hour_range_half_open() {
        assert!(hour_in_range(8.0, 8, 18));
        assert!(hour_in_range(17.99, 8, 18));
        assert!(!hour_in_range(18.0, 8, 18));
        assert!(!hour_in_range(7.5, 8, 18));
        assert!(!hour_in_range(5.0, 5, 5));
    }

    #[test]
    fn test_hour_range_wraps_midnight() {
        assert!(hour_in_range(22.0, 20, 6));
        assert!(hour_in_range(0.0, 20, 6));
        assert!(hour_in_range(5.5, 20, 6));
        assert!(!hour_in_range(6.0, 20, 6));
        assert!(!hour_in_range(12.0, 20, 6));
    }

    #[test]
    fn test_near_object_trigger() {
        let trigger = TriggerSpec::NearObject {
            object_type: "fire".into(),
            radius: 400.0,
        };
        let mut snap = snapshot();
        assert!(!trigger.is_met(&snap));

        snap.nearby_lights.push(NearbyLight::new(
            Vec3::new(0.0, 350.0, 0.0),
            "fire",
            Rgb::FIRE_ORANGE,
            256.0,
        ));
        assert!(trigger.is_met(&snap));

        let zero_radius = TriggerSpec::NearObject {
            object_type: "fire".into(),
            radius: 0.0,
        };
        assert!(!zero_radius.is_met(&snap));
    }

    #[test]
    fn test_trigger_deserialization() {
        let trigger: TriggerSpec =
            serde_json::from_str(r#"{"type": "game_hour_range", "min_hour": 20, "max_hour": 6}"#)
                .unwrap();
        assert_eq!(
            trigger,
            TriggerSpec::HourRange {
                min_hour: 20,
                max_hour: 6
            }
        );

        let trigger: TriggerSpec = serde_json::from_str(r#"{"type": "in_combat"}"#).unwrap();
        assert_eq!(trigger, TriggerSpec::InCombat);

        let trigger: TriggerSpec =
            serde_json::from_str(r#"{"type": "near_object", "object_type": "fire"}"#).unwrap();
        assert_eq!(trigger.scan_radius(), Some(DEFAULT_NEAR_RADIUS));

        let trigger: TriggerSpec =
            serde_json::from_str(r#"{"type": "player_is_swimming", "depth": 3}"#).unwrap();
        assert!(!trigger.is_recognized());
    }

    #[test]
    fn test_rule_deserialization() {
        let json = r#"{
            "name": "Night",
            "priority": 2,
            "trigger": {"type": "game_hour_range", "min_hour": 21, "max_hour": 5},
            "outcome": [
                {"entity_id": "light.desk", "rgb_color": [20, 20, 80], "brightness_pct": 15},
                {"entity_id": "light.tv", "inherit": true}
            ]
        }"#;
        let rule: ScenarioRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.name(), "Night");
        assert_eq!(rule.priority(), 2);
        assert_eq!(rule.outcome().len(), 2);
        assert!(rule.outcome_for("light.tv").unwrap().is_inherit());
        assert!(rule.outcome_for("light.hall").is_none());
    }
}
