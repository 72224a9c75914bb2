//! Weighted behavior state machine.
//!
//! When a state's duration runs out the machine gathers every valid outgoing
//! transition and samples one by weight. Invalid or empty pools fall back to
//! Idle.

use crate::animation;
use crate::events::EventLog;
use crate::services::AnimationResolver;
use rand::Rng;
use vivarium_data::{BehaviorState, CreatureInstance, SpeciesConfig, Transition};

/// Longest a creature may stay in Eating without a fresh consume.
pub const EATING_CEILING: f32 = 2.0;
/// Duration used when a state has neither a range nor a clip length.
pub const FALLBACK_DURATION: f32 = 1.0;

/// Everything the state machine reads besides the creature itself.
#[derive(Clone, Copy)]
pub struct BehaviorContext<'a> {
    pub species: &'a SpeciesConfig,
    pub animations: &'a dyn AnimationResolver,
    pub resource_available: bool,
}

/// Transitions out of the creature's current state that may be taken right now.
#[must_use]
pub fn candidates(creature: &CreatureInstance, ctx: &BehaviorContext) -> Vec<Transition> {
    let current = creature.state();
    let stage = creature.stage();
    ctx.species
        .behavior
        .transitions
        .iter()
        .filter(|t| t.from == current)
        .filter(|t| !t.resource_required || ctx.resource_available)
        .filter(|t| creature.stats.hunger >= t.min_hunger)
        .filter(|t| creature.stats.happiness >= t.min_happiness)
        .filter(|t| animation::is_resolvable(ctx.animations, stage, t.to))
        .copied()
        .collect()
}

#[inline]
fn usable_weight(weight: f32) -> f32 {
    if weight.is_finite() {
        weight.max(0.0)
    } else {
        0.0
    }
}

/// Cumulative-sum weighted pick. Empty pools and zero total weight yield Idle.
pub fn select_weighted<R: Rng + ?Sized>(pool: &[Transition], rng: &mut R) -> BehaviorState {
    let total: f32 = pool.iter().map(|t| usable_weight(t.weight)).sum();
    if total <= 0.0 {
        return BehaviorState::Idle;
    }
    let roll = rng.gen::<f32>() * total;
    let mut cumulative = 0.0;
    let mut last = BehaviorState::Idle;
    for t in pool {
        let w = usable_weight(t.weight);
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last = t.to;
        if roll < cumulative {
            return t.to;
        }
    }
    // Float rounding can leave roll == total.
    last
}

/// How long `state` lasts once entered at `stage`.
pub fn duration_for<R: Rng + ?Sized>(
    state: BehaviorState,
    stage: u32,
    ctx: &BehaviorContext,
    rng: &mut R,
) -> f32 {
    if let Some(range) = ctx.species.behavior.duration_range(state) {
        let (min, max) = (usable_weight(range.min), usable_weight(range.max));
        if max > min {
            return rng.gen_range(min..=max);
        }
        return if min > 0.0 { min } else { FALLBACK_DURATION };
    }
    let length = animation::clip_length(ctx.animations, stage, state)
        .filter(|l| l.is_finite() && *l > 0.0)
        .unwrap_or(FALLBACK_DURATION);
    if state == BehaviorState::Eating {
        length.min(EATING_CEILING)
    } else {
        length
    }
}

fn enter<R: Rng + ?Sized>(
    creature: &mut CreatureInstance,
    next: BehaviorState,
    ctx: &BehaviorContext,
    rng: &mut R,
    log: &mut EventLog,
    restart: bool,
) {
    let previous = creature.state();
    creature.behavior.remaining = duration_for(next, creature.stage(), ctx, rng);
    if previous != next || restart {
        creature.behavior.elapsed = 0.0;
    }
    creature.behavior.state = next;
    if previous != next {
        tracing::debug!(creature = %creature.id, from = ?previous, to = ?next, "State changed");
        log.state_changed(&creature.id, previous, next);
    }
}

/// Enters `state` immediately, skipping the weighted pick.
pub fn force_state<R: Rng + ?Sized>(
    creature: &mut CreatureInstance,
    state: BehaviorState,
    ctx: &BehaviorContext,
    rng: &mut R,
    log: &mut EventLog,
) {
    enter(creature, state, ctx, rng, log, true);
}

/// Advances the current state by `dt` and re-selects when it expires.
pub fn tick<R: Rng + ?Sized>(
    creature: &mut CreatureInstance,
    ctx: &BehaviorContext,
    dt: f32,
    rng: &mut R,
    log: &mut EventLog,
) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    creature.behavior.elapsed += dt;
    creature.behavior.remaining -= dt;

    if creature.state() == BehaviorState::Eating && creature.behavior.elapsed >= EATING_CEILING {
        enter(creature, BehaviorState::Idle, ctx, rng, log, true);
        return;
    }

    if creature.behavior.remaining > 0.0 {
        return;
    }

    let pool = candidates(creature, ctx);
    let next = select_weighted(&pool, rng);
    enter(creature, next, ctx, rng, log, false);
}
