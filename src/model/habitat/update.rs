use crate::model::habitat::systems::{self, SystemContext};
use crate::model::habitat::{Habitat, HabitatError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use vivarium_core::services::NoAnimations;
use vivarium_core::{
    foraging, interaction, AnimationResolver, BehaviorContext, EventLog, InteractionCommand,
    PokeOutcome,
};
use vivarium_data::{CreatureId, LiveEvent};

impl Habitat {
    /// Advances the habitat by `dt` seconds.
    ///
    /// Creatures tick in insertion order against a position snapshot taken
    /// before anyone moved. Rewards, persistence updates and despawns queued
    /// during the pass are applied afterwards.
    ///
    /// # Returns
    /// Every event raised since the previous update, in emission order. The
    /// same events have already been published to subscribers.
    pub fn update(&mut self, dt: f32) -> Vec<LiveEvent> {
        let started = Instant::now();
        self.tick += 1;
        let tick = self.tick;

        if self.config.habitat.deterministic {
            let seed = self
                .config
                .habitat
                .seed
                .unwrap_or(0)
                .wrapping_add(tick)
                .wrapping_add(0x5EED);
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }

        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += f64::from(dt);

        let mut events = std::mem::take(&mut self.pending_events);

        self.services.resources.replenish(dt, &mut self.rng);
        self.pass_spatial_indexing();
        self.pass_creatures(dt, &mut events);

        self.process_commands(&mut events);
        // Cleared last so a poke promotion between updates blocks the next one.
        for creature in &mut self.creatures {
            creature.promoted_this_tick = false;
        }

        let interval = self.config.habitat.autosave_interval;
        if interval > 0 && tick % interval == 0 {
            self.autosave();
        }

        self.metrics.record_tick(
            started.elapsed(),
            self.creatures.len(),
            self.services.resources.available(),
        );
        self.observers.publish(&events);
        events
    }

    fn pass_spatial_indexing(&mut self) {
        self.position_snapshot.clear();
        self.position_snapshot
            .extend(self.creatures.iter().map(|c| (c.position.x, c.position.y)));
        self.spatial_hash.build(&self.position_snapshot);
    }

    fn pass_creatures(&mut self, dt: f32, events: &mut Vec<LiveEvent>) {
        let mut log = EventLog::new(self.tick, events);
        let mut ctx = SystemContext {
            habitat: &self.config.habitat,
            spatial_hash: &self.spatial_hash,
            positions: &self.position_snapshot,
            resources: self.services.resources.as_mut(),
            rng: &mut self.rng,
            commands: &mut self.commands,
            metrics: &self.metrics,
        };

        for (index, creature) in self.creatures.iter_mut().enumerate() {
            let Some(species) = self.species.get(&creature.id.species) else {
                tracing::warn!(creature = %creature.id, "Skipping creature of unregistered species");
                continue;
            };
            let resolver = self.animations.get(&creature.id.species);
            let animations: &dyn AnimationResolver = match resolver {
                Some(r) => r.as_ref(),
                None => &NoAnimations,
            };
            systems::tick_creature(index, creature, &species, animations, dt, &mut ctx, &mut log);
        }
    }

    /// Pokes a live creature. The poke reaction and its events show up in the
    /// next update; the reward follows once the creature stops jumping or
    /// itching.
    pub fn poke(&mut self, id: &CreatureId) -> anyhow::Result<PokeOutcome> {
        let Some(index) = self.index_of(id) else {
            return Err(HabitatError::UnknownCreature(id.clone()).into());
        };
        let species_id = self.creatures[index].id.species.clone();
        let Some(species) = self.species.get(&species_id) else {
            return Err(HabitatError::UnknownSpecies(species_id).into());
        };
        let resolver = self.animations.get(&species_id);
        let animations: &dyn AnimationResolver = match resolver {
            Some(r) => r.as_ref(),
            None => &NoAnimations,
        };

        let creature = &mut self.creatures[index];
        let ctx = BehaviorContext {
            species: &species,
            animations,
            resource_available: foraging::resource_nearby(
                creature,
                &species,
                self.services.resources.as_ref(),
            ),
        };
        let mut log = EventLog::new(self.tick, &mut self.pending_events);
        let outcome = interaction::on_poke(creature, &ctx, &mut self.rng, &mut log);

        if let PokeOutcome::Accepted { evolution } = &outcome {
            self.metrics.increment_counter("pokes");
            if let Some(evolved) = evolution {
                self.metrics.increment_counter("evolutions");
                self.commands
                    .push(InteractionCommand::persist_evolution(evolved, creature));
            }
        } else {
            tracing::debug!(creature = %creature.id, "Poke ignored during cooldown");
        }
        Ok(outcome)
    }
}
