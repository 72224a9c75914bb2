//! Species registry: sanitized, shared, read-only species definitions.

use std::collections::BTreeMap;
use std::sync::Arc;
use vivarium_data::{CustomCheck, DurationRange, SpeciesConfig};

fn non_negative(species: &str, field: &str, value: &mut f32) {
    if !value.is_finite() || *value < 0.0 {
        tracing::warn!(species, field, value = *value, "Clamping invalid config value to 0");
        *value = 0.0;
    }
}

fn sanitize_range(species: &str, field: &str, range: &mut DurationRange) {
    non_negative(species, field, &mut range.min);
    non_negative(species, field, &mut range.max);
    if range.max < range.min {
        tracing::warn!(species, field, min = range.min, max = range.max, "Swapping inverted duration range");
        std::mem::swap(&mut range.min, &mut range.max);
    }
}

/// Clamps negative or non-finite rates, durations and weights in place.
pub fn sanitize(species: &mut SpeciesConfig) {
    let id = species.id.clone();
    let id = id.as_str();

    non_negative(id, "base_speed", &mut species.base_speed);
    non_negative(id, "detection_radius", &mut species.detection_radius);
    non_negative(id, "consumption_distance", &mut species.consumption_distance);

    let rates = &mut species.rates;
    non_negative(id, "hunger_deplete_rate", &mut rates.hunger_deplete_rate);
    non_negative(id, "hunger_happiness_drain_rate", &mut rates.hunger_happiness_drain_rate);
    non_negative(id, "area_happiness_rate", &mut rates.area_happiness_rate);
    non_negative(id, "starvation_health_drain", &mut rates.starvation_health_drain);
    non_negative(id, "health_regen_rate", &mut rates.health_regen_rate);
    non_negative(id, "sick_speed_multiplier", &mut rates.sick_speed_multiplier);
    if rates.recover_health_threshold < rates.sick_health_threshold {
        tracing::warn!(species = id, "Recovery threshold below sickness threshold; raising it");
        rates.recover_health_threshold = rates.sick_health_threshold;
    }

    non_negative(id, "poke.cooldown", &mut species.poke.cooldown);
    non_negative(id, "poke.happiness_gain", &mut species.poke.happiness_gain);

    for profile in &mut species.stages {
        non_negative(id, "max_hunger", &mut profile.max_hunger);
        non_negative(id, "max_happiness", &mut profile.max_happiness);
        non_negative(id, "max_health", &mut profile.max_health);
        non_negative(id, "coin_drop_interval", &mut profile.coin_drop_interval);
        non_negative(id, "poop_drop_interval", &mut profile.poop_drop_interval);
        if !profile.half_extent.is_finite() || profile.half_extent < 0.0 {
            tracing::warn!(species = id, stage = profile.stage, "Clamping invalid half extent to 0");
            profile.half_extent = 0.0;
        }
    }

    let behavior = &mut species.behavior;
    sanitize_range(id, "walking", &mut behavior.walking);
    sanitize_range(id, "running", &mut behavior.running);
    sanitize_range(id, "flying", &mut behavior.flying);
    non_negative(id, "walk_speed", &mut behavior.walk_speed);
    non_negative(id, "run_speed", &mut behavior.run_speed);
    non_negative(id, "fly_speed", &mut behavior.fly_speed);
    for transition in &mut behavior.transitions {
        non_negative(id, "transition.weight", &mut transition.weight);
    }

    for set in &mut species.animations {
        for clip in &mut set.clips {
            non_negative(id, "clip.length", &mut clip.length);
        }
    }
}

/// All loaded species, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    species: BTreeMap<String, Arc<SpeciesConfig>>,
}

impl SpeciesRegistry {
    #[must_use]
    pub fn new(configs: impl IntoIterator<Item = SpeciesConfig>) -> Self {
        let mut registry = Self::default();
        for config in configs {
            registry.insert(config);
        }
        registry
    }

    /// Sanitizes and registers `config`, replacing any species with the same id.
    pub fn insert(&mut self, mut config: SpeciesConfig) {
        sanitize(&mut config);
        tracing::debug!(species = %config.id, stages = config.stages.len(), "Registered species");
        self.species.insert(config.id.clone(), Arc::new(config));
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<SpeciesConfig>> {
        self.species.get(id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Attaches a predicate to the requirement targeting `target_stage`.
    ///
    /// Existing `Arc`s handed out earlier keep the old definition; creatures
    /// pick up the new one on their next lookup.
    pub fn attach_custom_check(
        &mut self,
        species: &str,
        target_stage: u32,
        check: CustomCheck,
    ) -> anyhow::Result<()> {
        let Some(entry) = self.species.get_mut(species) else {
            anyhow::bail!("Unknown species '{species}'");
        };
        let config = Arc::make_mut(entry);
        let Some(requirement) = config
            .requirements
            .iter_mut()
            .find(|r| r.target_stage == target_stage)
        else {
            anyhow::bail!("Species '{species}' has no requirement for stage {target_stage}");
        };
        requirement.custom = Some(check);
        Ok(())
    }
}
