//! Hunger, happiness and health for a single creature.
//!
//! Every value is clamped to `[0, stage max]` after each change. Stat-changed
//! events fire when the displayed (whole-number) value moves, and on every
//! explicit boost or feed.

use crate::events::EventLog;
use vivarium_data::{CreatureInstance, SpeciesConfig, StageProfile, StatKind, Stats};

#[inline]
fn rate(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[inline]
fn clamp_stat(value: f32, max: f32) -> f32 {
    let max = rate(max);
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

/// Clamps all stats into the limits of `profile`.
pub fn clamp_to_stage(stats: &mut Stats, profile: &StageProfile) {
    stats.hunger = clamp_stat(stats.hunger, profile.max_hunger);
    stats.happiness = clamp_stat(stats.happiness, profile.max_happiness);
    stats.health = clamp_stat(stats.health, profile.max_health);
}

/// Re-clamps after a stage change.
pub fn reclamp(creature: &mut CreatureInstance, species: &SpeciesConfig) {
    let profile = species.stage_profile(creature.stage());
    clamp_to_stage(&mut creature.stats, &profile);
}

/// Baseline stats for a fresh creature at `stage`.
#[must_use]
pub fn baseline(species: &SpeciesConfig, stage: u32) -> Stats {
    let profile = species.stage_profile(stage);
    let mut stats = Stats {
        hunger: profile.base_hunger,
        happiness: profile.base_happiness,
        health: profile.base_health,
        sick: false,
    };
    clamp_to_stage(&mut stats, &profile);
    stats
}

fn notify_if_displayed_changed(
    log: &mut EventLog,
    creature: &CreatureInstance,
    stat: StatKind,
    before: f32,
    after: f32,
) {
    if before.floor() != after.floor() {
        log.stat_changed(&creature.id, stat, after);
    }
}

/// Advances decay and regeneration by `dt` seconds.
pub fn tick(creature: &mut CreatureInstance, species: &SpeciesConfig, dt: f32, log: &mut EventLog) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let profile = species.stage_profile(creature.stage());
    let rates = &species.rates;
    let before = creature.stats;

    let mut hunger = before.hunger - rate(rates.hunger_deplete_rate) * dt;
    hunger = clamp_stat(hunger, profile.max_hunger);

    let happiness_delta = if hunger < rates.hunger_happiness_threshold {
        -rate(rates.hunger_happiness_drain_rate) * dt
    } else {
        rate(rates.area_happiness_rate) * dt
    };
    let happiness = clamp_stat(before.happiness + happiness_delta, profile.max_happiness);

    let health_delta = if hunger <= 0.0 {
        -rate(rates.starvation_health_drain) * dt
    } else {
        rate(rates.health_regen_rate) * dt
    };
    let health = clamp_stat(before.health + health_delta, profile.max_health);

    creature.stats.hunger = hunger;
    creature.stats.happiness = happiness;
    creature.stats.health = health;

    notify_if_displayed_changed(log, creature, StatKind::Hunger, before.hunger, hunger);
    notify_if_displayed_changed(log, creature, StatKind::Happiness, before.happiness, happiness);
    notify_if_displayed_changed(log, creature, StatKind::Health, before.health, health);

    if !creature.stats.sick && health < rates.sick_health_threshold {
        set_sick(creature, true, log);
    } else if creature.stats.sick && health >= rates.recover_health_threshold {
        set_sick(creature, false, log);
    }
}

/// Raises happiness immediately, clamped to the stage maximum.
pub fn apply_interaction_boost(
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    amount: f32,
    log: &mut EventLog,
) {
    let profile = species.stage_profile(creature.stage());
    creature.stats.happiness = clamp_stat(
        creature.stats.happiness + rate(amount),
        profile.max_happiness,
    );
    log.stat_changed(&creature.id, StatKind::Happiness, creature.stats.happiness);
}

/// Restores hunger after eating.
pub fn feed(creature: &mut CreatureInstance, species: &SpeciesConfig, amount: f32, log: &mut EventLog) {
    let profile = species.stage_profile(creature.stage());
    creature.stats.hunger = clamp_stat(creature.stats.hunger + rate(amount), profile.max_hunger);
    log.stat_changed(&creature.id, StatKind::Hunger, creature.stats.hunger);
}

/// Sets the sickness flag. Returns true and emits an event only on an actual flip.
pub fn set_sick(creature: &mut CreatureInstance, sick: bool, log: &mut EventLog) -> bool {
    if creature.stats.sick == sick {
        return false;
    }
    creature.stats.sick = sick;
    tracing::debug!(creature = %creature.id, sick, "Sickness changed");
    log.sickness_changed(&creature.id, sick);
    true
}

/// Speed factor from sickness.
#[must_use]
pub fn speed_factor(creature: &CreatureInstance, species: &SpeciesConfig) -> f32 {
    if creature.stats.sick {
        rate(species.rates.sick_speed_multiplier)
    } else {
        1.0
    }
}
