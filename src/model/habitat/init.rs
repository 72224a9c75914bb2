use crate::model::habitat::{Habitat, HabitatError, Services, SharedAnimations};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::sync::Arc;
use vivarium_core::animation::ConfigAnimationResolver;
use vivarium_core::config::AppConfig;
use vivarium_core::spatial_hash::SpatialHash;
use vivarium_core::{lifecycle, movement, EventBus, Metrics, SpeciesRegistry};
use vivarium_data::{CreatureId, LiveEvent, Position, StatSnapshot};

impl Habitat {
    /// Builds a habitat and spawns `initial_population` creatures, cycling
    /// through the configured species.
    pub fn new(config: AppConfig, services: Services) -> anyhow::Result<Self> {
        config.validate()?;
        let species = SpeciesRegistry::new(config.species.iter().cloned());
        let animations: BTreeMap<String, SharedAnimations> = config
            .species
            .iter()
            .map(|s| {
                let resolver: SharedAnimations = Arc::new(ConfigAnimationResolver::from_species(s));
                (s.id.clone(), resolver)
            })
            .collect();
        let rng = if let Some(seed) = config.habitat.seed {
            ChaCha8Rng::seed_from_u64(seed)
        } else {
            ChaCha8Rng::from_entropy()
        };
        let spatial_hash = SpatialHash::new(config.habitat.cell_size, config.habitat.arena);

        tracing::info!(
            species = species.len(),
            population = config.habitat.initial_population,
            fingerprint = %config.fingerprint(),
            "Creating habitat"
        );

        let mut habitat = Self {
            tick: 0,
            elapsed: 0.0,
            species,
            animations,
            creatures: Vec::new(),
            rng,
            spatial_hash,
            position_snapshot: Vec::new(),
            observers: EventBus::new(),
            metrics: Metrics::new(),
            services,
            commands: Vec::new(),
            pending_events: Vec::new(),
            last_persistence_error: None,
            config,
        };

        let ids: Vec<String> = habitat.species.ids().map(str::to_string).collect();
        for i in 0..habitat.config.habitat.initial_population {
            let species_id = &ids[i % ids.len()];
            let position = movement::random_target(&habitat.config.habitat.arena, 0.0, &mut habitat.rng);
            habitat.spawn(species_id, position)?;
        }
        Ok(habitat)
    }

    /// Habitat with in-memory persistence and no food or reward sink.
    pub fn with_defaults(config: AppConfig) -> anyhow::Result<Self> {
        Self::new(config, Services::default())
    }

    /// Adds a fresh stage-1 creature. The spawn event is delivered with the
    /// next update.
    pub fn spawn(&mut self, species: &str, position: Position) -> anyhow::Result<CreatureId> {
        let Some(config) = self.species.get(species) else {
            return Err(HabitatError::UnknownSpecies(species.to_string()).into());
        };
        let creature = lifecycle::create_creature_with_rng(
            &config,
            position,
            &self.config.habitat.arena,
            &mut self.rng,
        );
        let id = creature.id.clone();
        tracing::info!(creature = %id, name = %lifecycle::display_name(&id), "Creature spawned");
        self.pending_events.push(LiveEvent::Spawned {
            id: id.clone(),
            restored: false,
            tick: self.tick,
        });
        self.creatures.push(creature);
        Ok(id)
    }

    /// Brings a stored creature back from persistence.
    pub fn restore(&mut self, id: &CreatureId) -> anyhow::Result<CreatureId> {
        if let Some(live) = self.creature(id) {
            return Err(HabitatError::AlreadyLive(live.id.clone()).into());
        }
        let Some(snapshot) = self.load_any_stage(id)? else {
            return Err(HabitatError::NoSavedState(id.clone()).into());
        };
        let Some(config) = self.species.get(&snapshot.id.species) else {
            return Err(HabitatError::UnknownSpecies(snapshot.id.species.clone()).into());
        };
        let creature = lifecycle::restore_creature(
            snapshot,
            &config,
            &self.config.habitat.arena,
            &mut self.rng,
        );
        let id = creature.id.clone();
        tracing::info!(creature = %id, "Creature restored");
        self.pending_events.push(LiveEvent::Spawned {
            id: id.clone(),
            restored: true,
            tick: self.tick,
        });
        self.creatures.push(creature);
        Ok(id)
    }

    /// Loads the record for `id`, or for the same instance at another stage
    /// when the creature evolved after `id` was handed out.
    fn load_any_stage(&mut self, id: &CreatureId) -> anyhow::Result<Option<StatSnapshot>> {
        if let Some(snapshot) = self.services.persistence.load(id)? {
            return Ok(Some(snapshot));
        }
        let max_stage = self.species.get(&id.species).map_or(0, |s| s.max_stage());
        for stage in (1..=max_stage).filter(|s| *s != id.stage) {
            let candidate = CreatureId::new(id.species.clone(), stage, id.instance);
            if let Some(snapshot) = self.services.persistence.load(&candidate)? {
                return Ok(Some(snapshot));
            }
        }
        Ok(None)
    }
}
