use super::creature::{BehaviorState, CreatureId};
use super::geometry::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Hunger,
    Happiness,
    Health,
}

/// Something dropped into the habitat for the player to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RewardKind {
    Coin { value: u32 },
    Poop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Taken out of the habitat; its state is saved.
    Stored,
    /// Sold; its saved state is deleted.
    Sold,
}

/// Notifications emitted by the simulation, in emission order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum LiveEvent {
    Spawned {
        id: CreatureId,
        restored: bool,
        tick: u64,
    },
    Despawned {
        id: CreatureId,
        reason: DespawnReason,
        tick: u64,
    },
    StatChanged {
        id: CreatureId,
        stat: StatKind,
        value: f32,
        tick: u64,
    },
    SicknessChanged {
        id: CreatureId,
        sick: bool,
        tick: u64,
    },
    StateChanged {
        id: CreatureId,
        from: BehaviorState,
        to: BehaviorState,
        tick: u64,
    },
    FoodConsumed {
        id: CreatureId,
        tick: u64,
    },
    Poked {
        id: CreatureId,
        tick: u64,
    },
    RewardDropped {
        id: CreatureId,
        reward: RewardKind,
        position: Position,
        tick: u64,
    },
    Evolved {
        old_id: CreatureId,
        new_id: CreatureId,
        old_stage: u32,
        new_stage: u32,
        tick: u64,
    },
}

impl LiveEvent {
    #[must_use]
    pub fn tick(&self) -> u64 {
        match self {
            LiveEvent::Spawned { tick, .. }
            | LiveEvent::Despawned { tick, .. }
            | LiveEvent::StatChanged { tick, .. }
            | LiveEvent::SicknessChanged { tick, .. }
            | LiveEvent::StateChanged { tick, .. }
            | LiveEvent::FoodConsumed { tick, .. }
            | LiveEvent::Poked { tick, .. }
            | LiveEvent::RewardDropped { tick, .. }
            | LiveEvent::Evolved { tick, .. } => *tick,
        }
    }
}
