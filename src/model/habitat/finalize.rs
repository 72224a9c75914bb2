use crate::model::habitat::{Habitat, HabitatError};
use vivarium_core::InteractionCommand;
use vivarium_data::{CreatureId, DespawnReason, LiveEvent, RewardKind};

impl Habitat {
    /// Queues `id` for removal at the end of the next update.
    pub fn despawn(&mut self, id: &CreatureId, reason: DespawnReason) -> anyhow::Result<()> {
        let Some(index) = self.index_of(id) else {
            return Err(HabitatError::UnknownCreature(id.clone()).into());
        };
        let id = self.creatures[index].id.clone();
        tracing::debug!(creature = %id, ?reason, "Despawn queued");
        self.commands.push(InteractionCommand::Despawn { id, reason });
        Ok(())
    }

    /// Saves every live creature. Stops at the first failure.
    pub fn save_all(&mut self) -> anyhow::Result<usize> {
        for creature in &self.creatures {
            self.services
                .persistence
                .save(&creature.id, &creature.snapshot())?;
        }
        Ok(self.creatures.len())
    }

    pub(crate) fn autosave(&mut self) {
        let mut failures = Vec::new();
        for creature in &self.creatures {
            if let Err(e) = self
                .services
                .persistence
                .save(&creature.id, &creature.snapshot())
            {
                failures.push((creature.id.clone(), e));
            }
        }
        for (id, e) in &failures {
            self.record_persistence_error("autosave", id, e);
        }
        tracing::debug!(
            saved = self.creatures.len() - failures.len(),
            failed = failures.len(),
            "Autosave"
        );
    }

    /// Applies the side effects queued during the tick, then removes
    /// despawned creatures.
    pub(crate) fn process_commands(&mut self, events: &mut Vec<LiveEvent>) {
        let commands = std::mem::take(&mut self.commands);
        let mut removals = Vec::new();

        for command in commands {
            match command {
                InteractionCommand::EmitReward { kind, position, .. } => {
                    self.services.rewards.emit(&kind, position);
                }
                InteractionCommand::PersistEvolution { old_id, snapshot } => {
                    if let Err(e) = self.services.persistence.remove(&old_id) {
                        self.record_persistence_error("remove", &old_id, &e);
                    }
                    if let Err(e) = self.services.persistence.save(&snapshot.id, &snapshot) {
                        self.record_persistence_error("save", &snapshot.id, &e);
                    }
                }
                InteractionCommand::Despawn { id, reason } => removals.push((id, reason)),
            }
        }

        for (id, reason) in removals {
            self.remove_creature(&id, reason, events);
        }
    }

    fn remove_creature(&mut self, id: &CreatureId, reason: DespawnReason, events: &mut Vec<LiveEvent>) {
        // Already gone when the same creature was despawned twice in one tick.
        let Some(index) = self.index_of(id) else {
            return;
        };
        let creature = self.creatures.remove(index);
        let tick = self.tick;

        match reason {
            DespawnReason::Stored => {
                if let Err(e) = self
                    .services
                    .persistence
                    .save(&creature.id, &creature.snapshot())
                {
                    self.record_persistence_error("store", &creature.id, &e);
                }
            }
            DespawnReason::Sold => {
                if let Err(e) = self.services.persistence.remove(&creature.id) {
                    self.record_persistence_error("remove", &creature.id, &e);
                }
                let value = self
                    .species
                    .get(&creature.id.species)
                    .map_or(0, |s| s.stage_profile(creature.stage()).sale_value);
                let reward = RewardKind::Coin { value };
                self.services.rewards.emit(&reward, creature.position);
                events.push(LiveEvent::RewardDropped {
                    id: creature.id.clone(),
                    reward,
                    position: creature.position,
                    tick,
                });
            }
        }

        tracing::info!(creature = %creature.id, ?reason, "Creature despawned");
        self.metrics.increment_counter("despawns");
        events.push(LiveEvent::Despawned {
            id: creature.id,
            reason,
            tick,
        });
    }
}
