//! Player interaction and the deferred side effects it produces.

use crate::animation;
use crate::behavior::{self, BehaviorContext};
use crate::events::EventLog;
use crate::evolution::{self, EvolutionOutcome};
use crate::stats;
use rand::Rng;
use vivarium_data::{
    BehaviorState, CreatureId, CreatureInstance, DespawnReason, Position, RewardKind, StatSnapshot,
};

/// States a poke plays out in. The reward waits until the creature leaves them.
pub const POKE_STATES: [BehaviorState; 2] = [BehaviorState::Jumping, BehaviorState::Itching];

/// Side effects collected during a tick and applied by the habitat afterwards.
#[derive(Debug, Clone)]
pub enum InteractionCommand {
    EmitReward {
        id: CreatureId,
        kind: RewardKind,
        position: Position,
    },
    PersistEvolution {
        old_id: CreatureId,
        snapshot: StatSnapshot,
    },
    Despawn {
        id: CreatureId,
        reason: DespawnReason,
    },
}

impl InteractionCommand {
    /// Persistence update for a promotion that just happened to `creature`.
    #[must_use]
    pub fn persist_evolution(outcome: &EvolutionOutcome, creature: &CreatureInstance) -> Self {
        InteractionCommand::PersistEvolution {
            old_id: outcome.old_id.clone(),
            snapshot: creature.snapshot(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PokeOutcome {
    /// Cooldown still running.
    Ignored,
    Accepted { evolution: Option<EvolutionOutcome> },
}

impl PokeOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, PokeOutcome::Accepted { .. })
    }
}

/// Handles a poke. No-op while the cooldown runs.
pub fn on_poke<R: Rng + ?Sized>(
    creature: &mut CreatureInstance,
    ctx: &BehaviorContext,
    rng: &mut R,
    log: &mut EventLog,
) -> PokeOutcome {
    if creature.interaction.poke_cooldown > 0.0 {
        return PokeOutcome::Ignored;
    }
    let species = ctx.species;
    creature.interaction.poke_cooldown = species.poke.cooldown;
    log.poked(&creature.id);
    stats::apply_interaction_boost(creature, species, species.poke.happiness_gain, log);
    let evolution = evolution::on_interaction(creature, species, log);
    creature.interaction.rewards_pending += 1;

    let stage = creature.stage();
    let playable: Vec<BehaviorState> = POKE_STATES
        .iter()
        .copied()
        .filter(|s| animation::is_resolvable(ctx.animations, stage, *s))
        .collect();
    if !playable.is_empty() {
        let next = playable[rng.gen_range(0..playable.len())];
        behavior::force_state(creature, next, ctx, rng, log);
    }

    PokeOutcome::Accepted { evolution }
}

/// Runs the cooldown down and releases the pending rewards once the poke
/// reaction is over. Every accepted poke pays one coin.
pub fn tick(
    creature: &mut CreatureInstance,
    reward_value: u32,
    dt: f32,
    log: &mut EventLog,
) -> Vec<InteractionCommand> {
    if dt.is_finite() && dt > 0.0 {
        creature.interaction.poke_cooldown = (creature.interaction.poke_cooldown - dt).max(0.0);
    }
    if creature.interaction.rewards_pending == 0 || POKE_STATES.contains(&creature.state()) {
        return Vec::new();
    }
    let pending = std::mem::take(&mut creature.interaction.rewards_pending);
    let kind = RewardKind::Coin {
        value: reward_value,
    };
    (0..pending)
        .map(|_| {
            log.reward_dropped(&creature.id, kind, creature.position);
            InteractionCommand::EmitReward {
                id: creature.id.clone(),
                kind,
                position: creature.position,
            }
        })
        .collect()
}
