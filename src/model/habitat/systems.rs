//! One creature's slice of a habitat tick.

use rand_chacha::ChaCha8Rng;
use vivarium_core::config::HabitatConfig;
use vivarium_core::spatial_hash::SpatialHash;
use vivarium_core::{
    behavior, drops, evolution, foraging, interaction, movement, stats, AnimationResolver,
    BehaviorContext, EventLog, InteractionCommand, Metrics, ResourceLocator,
};
use vivarium_data::{CreatureInstance, Position, SpeciesConfig};

/// Read-only habitat state plus the mutable services one creature touches.
pub struct SystemContext<'a> {
    pub habitat: &'a HabitatConfig,
    pub spatial_hash: &'a SpatialHash,
    /// Positions captured before any creature moved this tick.
    pub positions: &'a [(f64, f64)],
    pub resources: &'a mut dyn ResourceLocator,
    pub rng: &'a mut ChaCha8Rng,
    pub commands: &'a mut Vec<InteractionCommand>,
    pub metrics: &'a Metrics,
}

/// Stats, evolution, behavior, movement, interaction timers and drops, in
/// that order.
pub fn tick_creature(
    index: usize,
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    animations: &dyn AnimationResolver,
    dt: f32,
    ctx: &mut SystemContext,
    log: &mut EventLog,
) {
    stats::tick(creature, species, dt, log);

    if let Some(outcome) = evolution::tick(creature, species, dt, log) {
        ctx.metrics.increment_counter("evolutions");
        ctx.commands
            .push(InteractionCommand::persist_evolution(&outcome, creature));
    }

    let behavior_ctx = BehaviorContext {
        species,
        animations,
        resource_available: foraging::resource_nearby(creature, species, &*ctx.resources),
    };
    behavior::tick(creature, &behavior_ctx, dt, &mut *ctx.rng, log);

    move_creature(index, creature, species, dt, ctx);

    if let Some(meal) = foraging::try_consume(
        creature,
        &behavior_ctx,
        &mut *ctx.resources,
        &mut *ctx.rng,
        log,
    ) {
        ctx.metrics.increment_counter("meals");
        if let Some(outcome) = meal.evolution {
            ctx.metrics.increment_counter("evolutions");
            ctx.commands
                .push(InteractionCommand::persist_evolution(&outcome, creature));
        }
    }

    ctx.commands
        .extend(interaction::tick(creature, species.poke.reward_value, dt, log));

    drops::tick(creature, species, dt, log, ctx.commands);
}

fn move_creature(
    index: usize,
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    dt: f32,
    ctx: &mut SystemContext,
) {
    let cfg = ctx.habitat;
    let dt = f64::from(dt);

    foraging::update_pursuit(creature, species, &*ctx.resources);

    let speed = movement::locomotion_speed(creature, species);
    let mut next = movement::step_towards(creature.position, creature.target, speed, dt);

    if let Some(&(sx, sy)) = ctx.positions.get(index) {
        let mut peers = Vec::new();
        ctx.spatial_hash
            .query_callback(sx, sy, cfg.separation_radius, |j| {
                if j != index {
                    if let Some(&(px, py)) = ctx.positions.get(j) {
                        peers.push(Position::new(px, py));
                    }
                }
            });
        let push = movement::compute_separation_with_overlap(
            Position::new(sx, sy),
            peers,
            cfg.separation_radius,
            cfg.separation_strength,
            movement::overlap_angle(&creature.id),
        );
        next = next.offset(push, dt);
    }

    let half_extent = species.stage_profile(creature.stage()).half_extent;
    let (clamped, corrected) = movement::clamp_to_bounds(next, &cfg.arena, half_extent);
    creature.position = clamped;

    if corrected {
        creature.pursuit = None;
        creature.target = movement::random_target(&cfg.arena, half_extent, &mut *ctx.rng);
    } else if creature.state().is_locomotion()
        && creature.pursuit.is_none()
        && creature.position.distance(&creature.target) <= cfg.arrival_tolerance
    {
        creature.target = movement::random_target(&cfg.arena, half_extent, &mut *ctx.rng);
    }
}
