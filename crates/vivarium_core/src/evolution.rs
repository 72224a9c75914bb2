//! Evolution progress and stage promotion.
//!
//! Counters accumulate until every threshold of the requirement targeting the
//! next stage holds, then the creature is promoted and the counters restart.
//! A creature is promoted at most once per tick.

use crate::events::EventLog;
use crate::stats;
use vivarium_data::{CreatureId, CreatureInstance, EvolutionRequirement, SpeciesConfig};

/// Result of a successful promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionOutcome {
    pub old_id: CreatureId,
    pub new_id: CreatureId,
    pub old_stage: u32,
    pub new_stage: u32,
}

/// Requirement targeting the stage after the creature's current one.
#[must_use]
pub fn next_requirement<'a>(
    creature: &CreatureInstance,
    species: &'a SpeciesConfig,
) -> Option<&'a EvolutionRequirement> {
    species.requirement_for(creature.stage().checked_add(1)?)
}

#[must_use]
pub fn can_evolve(creature: &CreatureInstance, species: &SpeciesConfig) -> bool {
    species.stage_profile(creature.stage()).can_evolve
        && next_requirement(creature, species).is_some()
}

/// Whether every threshold of the next requirement currently holds.
#[must_use]
pub fn is_eligible(creature: &CreatureInstance, species: &SpeciesConfig) -> bool {
    if !can_evolve(creature, species) {
        return false;
    }
    let Some(req) = next_requirement(creature, species) else {
        return false;
    };
    let progress = &creature.progress;
    progress.time_alive >= req.min_time_alive
        && progress.food_consumed >= req.min_food_consumed
        && progress.interactions >= req.min_interactions
        && creature.stats.happiness >= req.min_happiness
        && creature.stats.hunger >= req.min_hunger
        && req.custom.as_ref().map_or(true, |c| c.check(creature))
}

/// Promotes the creature if it is eligible and has not been promoted this tick.
pub fn try_evolve(
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    log: &mut EventLog,
) -> Option<EvolutionOutcome> {
    if creature.promoted_this_tick || !is_eligible(creature, species) {
        return None;
    }
    let old_stage = creature.stage();
    let new_stage = old_stage + 1;
    let old_id = creature.id.clone();
    let new_id = old_id.with_stage(new_stage);

    creature.id = new_id.clone();
    creature.progress.reset();
    stats::reclamp(creature, species);
    creature.promoted_this_tick = true;

    tracing::info!(old = %old_id, new = %new_id, "Creature evolved");
    log.evolved(&old_id, &new_id);

    Some(EvolutionOutcome {
        old_id,
        new_id,
        old_stage,
        new_stage,
    })
}

/// Accumulates time alive and checks for promotion.
pub fn tick(
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    dt: f32,
    log: &mut EventLog,
) -> Option<EvolutionOutcome> {
    if dt.is_finite() && dt > 0.0 {
        creature.progress.time_alive += dt;
    }
    try_evolve(creature, species, log)
}

pub fn on_food_consumed(
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    log: &mut EventLog,
) -> Option<EvolutionOutcome> {
    creature.progress.food_consumed = creature.progress.food_consumed.saturating_add(1);
    try_evolve(creature, species, log)
}

pub fn on_interaction(
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    log: &mut EventLog,
) -> Option<EvolutionOutcome> {
    creature.progress.interactions = creature.progress.interactions.saturating_add(1);
    try_evolve(creature, species, log)
}
