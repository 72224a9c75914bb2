use super::geometry::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of a creature: species, current stage and a stable instance suffix.
///
/// Rendered as `species-stage-suffix`, e.g. `slime-2-1f0c...`. The suffix
/// survives evolution; only the stage component changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CreatureId {
    pub species: String,
    pub stage: u32,
    pub instance: Uuid,
}

impl CreatureId {
    #[must_use]
    pub fn new(species: impl Into<String>, stage: u32, instance: Uuid) -> Self {
        Self {
            species: species.into(),
            stage,
            instance,
        }
    }

    /// Same species and suffix, different stage.
    #[must_use]
    pub fn with_stage(&self, stage: u32) -> Self {
        Self {
            species: self.species.clone(),
            stage,
            instance: self.instance,
        }
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.species,
            self.stage,
            self.instance.simple()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCreatureIdError {
    #[error("creature id '{0}' must look like species-stage-suffix")]
    Shape(String),
    #[error("invalid stage in creature id '{0}'")]
    Stage(String),
    #[error("invalid instance suffix in creature id '{0}'")]
    Suffix(String),
}

impl FromStr for CreatureId {
    type Err = ParseCreatureIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, '-');
        let (Some(suffix), Some(stage), Some(species)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseCreatureIdError::Shape(s.to_string()));
        };
        if species.is_empty() {
            return Err(ParseCreatureIdError::Shape(s.to_string()));
        }
        let stage = stage
            .parse::<u32>()
            .map_err(|_| ParseCreatureIdError::Stage(s.to_string()))?;
        let instance =
            Uuid::parse_str(suffix).map_err(|_| ParseCreatureIdError::Suffix(s.to_string()))?;
        Ok(Self::new(species, stage, instance))
    }
}

impl TryFrom<String> for CreatureId {
    type Error = ParseCreatureIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CreatureId> for String {
    fn from(id: CreatureId) -> Self {
        id.to_string()
    }
}

/// Activity a creature is performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    #[default]
    Idle,
    Walking,
    Running,
    Flying,
    Jumping,
    Itching,
    Eating,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 7] = [
        BehaviorState::Idle,
        BehaviorState::Walking,
        BehaviorState::Running,
        BehaviorState::Flying,
        BehaviorState::Jumping,
        BehaviorState::Itching,
        BehaviorState::Eating,
    ];

    /// States that move the creature toward its target.
    #[must_use]
    pub fn is_locomotion(self) -> bool {
        matches!(
            self,
            BehaviorState::Walking | BehaviorState::Running | BehaviorState::Flying
        )
    }

    /// Clip name looked up in a stage's animation set.
    #[must_use]
    pub fn animation_name(self) -> &'static str {
        match self {
            BehaviorState::Idle => "idle",
            BehaviorState::Walking => "walk",
            BehaviorState::Running => "run",
            BehaviorState::Flying => "fly",
            BehaviorState::Jumping => "jump",
            BehaviorState::Itching => "itch",
            BehaviorState::Eating => "eat",
        }
    }
}

/// Opaque handle to a consumable resource owned by the resource locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceHandle(pub u64);

/// Hunger, happiness and health. Hunger is fullness: 0 means starving.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hunger: f32,
    pub happiness: f32,
    pub health: f32,
    pub sick: bool,
}

/// Counters that feed evolution requirements. Reset on every promotion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvolutionProgress {
    pub time_alive: f32,
    pub food_consumed: u32,
    pub interactions: u32,
}

impl EvolutionProgress {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorStatus {
    pub state: BehaviorState,
    /// Seconds left before the state machine re-selects.
    pub remaining: f32,
    /// Seconds spent in the current state.
    pub elapsed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionStatus {
    pub poke_cooldown: f32,
    /// Accepted pokes whose coin has not dropped yet.
    pub rewards_pending: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DropTimers {
    pub coin: f32,
    pub poop: f32,
}

/// A live creature. Owned by the habitat and mutated only by its own tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInstance {
    pub id: CreatureId,
    pub position: Position,
    pub target: Position,
    pub pursuit: Option<ResourceHandle>,
    pub stats: Stats,
    pub progress: EvolutionProgress,
    pub behavior: BehaviorStatus,
    pub interaction: InteractionStatus,
    pub drops: DropTimers,
    /// Cleared by the habitat once an update finishes.
    #[serde(skip)]
    pub promoted_this_tick: bool,
}

impl CreatureInstance {
    #[must_use]
    pub fn stage(&self) -> u32 {
        self.id.stage
    }

    #[must_use]
    pub fn state(&self) -> BehaviorState {
        self.behavior.state
    }

    /// Persistent part of the creature.
    #[must_use]
    pub fn snapshot(&self) -> StatSnapshot {
        StatSnapshot {
            id: self.id.clone(),
            position: self.position,
            stats: self.stats,
            progress: self.progress,
        }
    }

    /// Rebuilds a creature from a snapshot. Transient state (behavior, timers,
    /// pursuit) starts fresh.
    #[must_use]
    pub fn from_snapshot(snapshot: StatSnapshot) -> Self {
        Self {
            id: snapshot.id,
            position: snapshot.position,
            target: snapshot.position,
            pursuit: None,
            stats: snapshot.stats,
            progress: snapshot.progress,
            behavior: BehaviorStatus::default(),
            interaction: InteractionStatus::default(),
            drops: DropTimers::default(),
            promoted_this_tick: false,
        }
    }
}

/// What the persistence service stores per creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub id: CreatureId,
    pub position: Position,
    pub stats: Stats,
    pub progress: EvolutionProgress,
}
