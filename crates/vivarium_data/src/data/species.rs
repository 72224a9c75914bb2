use super::creature::{BehaviorState, CreatureInstance};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Immutable definition of one species, shared by all of its instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesConfig {
    pub id: String,
    pub base_speed: f32,
    pub detection_radius: f32,
    pub consumption_distance: f32,
    /// Creatures start looking for food once hunger drops below this.
    pub food_seek_threshold: f32,
    pub rates: StatRates,
    pub poke: PokeConfig,
    pub stages: Vec<StageProfile>,
    pub requirements: Vec<EvolutionRequirement>,
    pub animations: Vec<AnimationSet>,
    pub behavior: BehaviorConfig,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            id: "slime".to_string(),
            base_speed: 2.0,
            detection_radius: 15.0,
            consumption_distance: 0.75,
            food_seek_threshold: 60.0,
            rates: StatRates::default(),
            poke: PokeConfig::default(),
            stages: vec![
                StageProfile {
                    stage: 1,
                    ..StageProfile::default()
                },
                StageProfile {
                    stage: 2,
                    max_hunger: 120.0,
                    max_happiness: 120.0,
                    max_health: 120.0,
                    half_extent: 1.5,
                    coin_value: 2,
                    sale_value: 40,
                    ..StageProfile::default()
                },
                StageProfile {
                    stage: 3,
                    max_hunger: 150.0,
                    max_happiness: 150.0,
                    max_health: 150.0,
                    half_extent: 2.0,
                    can_evolve: false,
                    coin_value: 5,
                    sale_value: 100,
                    ..StageProfile::default()
                },
            ],
            requirements: vec![
                EvolutionRequirement {
                    target_stage: 2,
                    min_time_alive: 120.0,
                    min_happiness: 60.0,
                    min_hunger: 40.0,
                    min_food_consumed: 3,
                    min_interactions: 5,
                    label: "Grow up".to_string(),
                    custom: None,
                },
                EvolutionRequirement {
                    target_stage: 3,
                    min_time_alive: 300.0,
                    min_happiness: 80.0,
                    min_hunger: 60.0,
                    min_food_consumed: 8,
                    min_interactions: 15,
                    label: "Reach maturity".to_string(),
                    custom: None,
                },
            ],
            animations: (1..=3)
                .map(|stage| AnimationSet {
                    stage,
                    clips: vec![
                        AnimationClip::new("idle", 1.5),
                        AnimationClip::new("walk", 1.0),
                        AnimationClip::new("run", 0.6),
                        AnimationClip::new("jump", 0.8),
                        AnimationClip::new("itch", 1.2),
                        AnimationClip::new("eat", 2.0),
                    ],
                })
                .collect(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl SpeciesConfig {
    /// Profile for `stage`, falling back to the highest defined stage below it,
    /// then to the first profile, then to built-in defaults.
    #[must_use]
    pub fn stage_profile(&self, stage: u32) -> StageProfile {
        if let Some(p) = self.stages.iter().find(|p| p.stage == stage) {
            return *p;
        }
        self.stages
            .iter()
            .filter(|p| p.stage <= stage)
            .max_by_key(|p| p.stage)
            .or_else(|| self.stages.first())
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn requirement_for(&self, target_stage: u32) -> Option<&EvolutionRequirement> {
        self.requirements
            .iter()
            .find(|r| r.target_stage == target_stage)
    }

    #[must_use]
    pub fn max_stage(&self) -> u32 {
        let from_stages = self.stages.iter().map(|p| p.stage).max().unwrap_or(1);
        let from_reqs = self
            .requirements
            .iter()
            .map(|r| r.target_stage)
            .max()
            .unwrap_or(1);
        from_stages.max(from_reqs)
    }
}

/// Decay and regeneration rates, all per second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct StatRates {
    pub hunger_deplete_rate: f32,
    pub hunger_happiness_threshold: f32,
    pub hunger_happiness_drain_rate: f32,
    pub area_happiness_rate: f32,
    pub starvation_health_drain: f32,
    pub health_regen_rate: f32,
    pub sick_health_threshold: f32,
    pub recover_health_threshold: f32,
    pub sick_speed_multiplier: f32,
}

impl Default for StatRates {
    fn default() -> Self {
        Self {
            hunger_deplete_rate: 0.5,
            hunger_happiness_threshold: 30.0,
            hunger_happiness_drain_rate: 1.0,
            area_happiness_rate: 0.2,
            starvation_health_drain: 2.0,
            health_regen_rate: 0.5,
            sick_health_threshold: 30.0,
            recover_health_threshold: 60.0,
            sick_speed_multiplier: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PokeConfig {
    pub cooldown: f32,
    pub happiness_gain: f32,
    pub reward_value: u32,
}

impl Default for PokeConfig {
    fn default() -> Self {
        Self {
            cooldown: 3.0,
            happiness_gain: 5.0,
            reward_value: 1,
        }
    }
}

/// Per-stage limits, baselines and drop rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageProfile {
    pub stage: u32,
    pub max_hunger: f32,
    pub max_happiness: f32,
    pub max_health: f32,
    pub base_hunger: f32,
    pub base_happiness: f32,
    pub base_health: f32,
    /// Half of the creature's footprint; the arena is deflated by this much.
    pub half_extent: f64,
    pub can_evolve: bool,
    /// Seconds between coin drops; 0 disables.
    pub coin_drop_interval: f32,
    pub coin_value: u32,
    /// Seconds between poop drops; 0 disables.
    pub poop_drop_interval: f32,
    pub sale_value: u32,
}

impl Default for StageProfile {
    fn default() -> Self {
        Self {
            stage: 1,
            max_hunger: 100.0,
            max_happiness: 100.0,
            max_health: 100.0,
            base_hunger: 80.0,
            base_happiness: 50.0,
            base_health: 100.0,
            half_extent: 1.0,
            can_evolve: true,
            coin_drop_interval: 30.0,
            coin_value: 1,
            poop_drop_interval: 90.0,
            sale_value: 10,
        }
    }
}

/// Caller-supplied extra condition on an evolution requirement.
#[derive(Clone)]
pub struct CustomCheck(Arc<dyn Fn(&CreatureInstance) -> bool + Send + Sync>);

impl CustomCheck {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&CreatureInstance) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    #[must_use]
    pub fn check(&self, creature: &CreatureInstance) -> bool {
        (self.0)(creature)
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck(..)")
    }
}

/// Thresholds gating promotion to `target_stage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionRequirement {
    pub target_stage: u32,
    pub min_time_alive: f32,
    pub min_happiness: f32,
    pub min_hunger: f32,
    pub min_food_consumed: u32,
    pub min_interactions: u32,
    pub label: String,
    #[serde(skip)]
    pub custom: Option<CustomCheck>,
}

/// One weighted edge of the behavior graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: BehaviorState,
    pub to: BehaviorState,
    pub weight: f32,
    #[serde(default)]
    pub resource_required: bool,
    #[serde(default)]
    pub min_hunger: f32,
    #[serde(default)]
    pub min_happiness: f32,
}

impl Transition {
    #[must_use]
    pub fn new(from: BehaviorState, to: BehaviorState, weight: f32) -> Self {
        Self {
            from,
            to,
            weight,
            resource_required: false,
            min_hunger: 0.0,
            min_happiness: 0.0,
        }
    }
}

/// Uniform duration range in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: f32,
    pub max: f32,
}

impl DurationRange {
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub transitions: Vec<Transition>,
    pub walking: DurationRange,
    pub running: DurationRange,
    pub flying: DurationRange,
    /// Multipliers of the species base speed.
    pub walk_speed: f32,
    pub run_speed: f32,
    pub fly_speed: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        use BehaviorState::*;
        let hungry_walk = Transition {
            resource_required: true,
            ..Transition::new(Idle, Walking, 3.0)
        };
        let happy_run = Transition {
            min_happiness: 60.0,
            ..Transition::new(Idle, Running, 1.0)
        };
        Self {
            transitions: vec![
                Transition::new(Idle, Idle, 2.0),
                Transition::new(Idle, Walking, 3.0),
                hungry_walk,
                happy_run,
                Transition::new(Idle, Itching, 0.5),
                Transition::new(Walking, Idle, 2.0),
                Transition::new(Walking, Walking, 1.0),
                Transition::new(Walking, Running, 0.5),
                Transition::new(Running, Walking, 1.0),
                Transition::new(Running, Idle, 1.0),
                Transition::new(Jumping, Idle, 1.0),
                Transition::new(Itching, Idle, 1.0),
                Transition::new(Eating, Idle, 1.0),
            ],
            walking: DurationRange::new(2.0, 5.0),
            running: DurationRange::new(1.0, 3.0),
            flying: DurationRange::new(2.0, 4.0),
            walk_speed: 1.0,
            run_speed: 2.0,
            fly_speed: 1.5,
        }
    }
}

impl BehaviorConfig {
    #[must_use]
    pub fn duration_range(&self, state: BehaviorState) -> Option<DurationRange> {
        match state {
            BehaviorState::Walking => Some(self.walking),
            BehaviorState::Running => Some(self.running),
            BehaviorState::Flying => Some(self.flying),
            _ => None,
        }
    }

    /// Speed multiplier for `state`; zero for anything that is not locomotion.
    #[must_use]
    pub fn speed_multiplier(&self, state: BehaviorState) -> f32 {
        match state {
            BehaviorState::Walking => self.walk_speed,
            BehaviorState::Running => self.run_speed,
            BehaviorState::Flying => self.fly_speed,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Intrinsic playback length in seconds.
    pub length: f32,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSet {
    pub stage: u32,
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
}
