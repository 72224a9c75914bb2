//! The habitat: owns every live creature and drives the per-creature engines.

use crate::model::food::FoodField;
use crate::model::rewards::RewardLedger;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::sync::Arc;
use vivarium_core::config::AppConfig;
use vivarium_core::services::{NoResources, NullRewardSink};
use vivarium_core::spatial_hash::SpatialHash;
use vivarium_core::{
    AnimationResolver, EventBus, InteractionCommand, Metrics, PersistenceService, ResourceLocator,
    RewardSink, SpeciesRegistry, SubscriptionId,
};
use vivarium_data::{CreatureId, CreatureInstance, CustomCheck, LiveEvent};
use vivarium_io::MemoryPersistence;

pub mod finalize;
pub mod init;
pub mod systems;
pub mod update;

/// Misuse of the habitat API. Returned wrapped in `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
pub enum HabitatError {
    #[error("unknown species '{0}'")]
    UnknownSpecies(String),
    #[error("no live creature {0}")]
    UnknownCreature(CreatureId),
    #[error("no saved state for {0}")]
    NoSavedState(CreatureId),
    #[error("creature {0} is already live")]
    AlreadyLive(CreatureId),
}

/// External collaborators the habitat calls out to.
pub struct Services {
    pub persistence: Box<dyn PersistenceService + Send>,
    pub resources: Box<dyn ResourceLocator + Send>,
    pub rewards: Box<dyn RewardSink + Send>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            persistence: Box::new(MemoryPersistence::new()),
            resources: Box::new(NoResources),
            rewards: Box::new(NullRewardSink),
        }
    }
}

impl Services {
    /// Shared-handle services: the caller keeps clones to inspect saves,
    /// drop food and count rewards.
    #[must_use]
    pub fn shared(persistence: MemoryPersistence, food: FoodField, rewards: RewardLedger) -> Self {
        Self {
            persistence: Box::new(persistence),
            resources: Box::new(food),
            rewards: Box::new(rewards),
        }
    }
}

pub type SharedAnimations = Arc<dyn AnimationResolver + Send + Sync>;

pub struct Habitat {
    pub config: AppConfig,
    pub tick: u64,
    /// Simulated seconds since creation.
    pub elapsed: f64,
    pub(crate) species: SpeciesRegistry,
    pub(crate) animations: BTreeMap<String, SharedAnimations>,
    pub(crate) creatures: Vec<CreatureInstance>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) spatial_hash: SpatialHash,
    pub(crate) position_snapshot: Vec<(f64, f64)>,
    pub(crate) observers: EventBus,
    pub(crate) metrics: Metrics,
    pub(crate) services: Services,
    pub(crate) commands: Vec<InteractionCommand>,
    /// Events raised between ticks (spawns, pokes), delivered with the next update.
    pub(crate) pending_events: Vec<LiveEvent>,
    pub last_persistence_error: Option<String>,
}

impl Habitat {
    #[must_use]
    pub fn creatures(&self) -> &[CreatureInstance] {
        &self.creatures
    }

    /// Looks a creature up by its instance suffix, so an id taken before an
    /// evolution still finds the creature.
    #[must_use]
    pub fn creature(&self, id: &CreatureId) -> Option<&CreatureInstance> {
        self.creatures.iter().find(|c| c.id.instance == id.instance)
    }

    pub fn creature_mut(&mut self, id: &CreatureId) -> Option<&mut CreatureInstance> {
        self.creatures.iter_mut().find(|c| c.id.instance == id.instance)
    }

    pub(crate) fn index_of(&self, id: &CreatureId) -> Option<usize> {
        self.creatures.iter().position(|c| c.id.instance == id.instance)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    #[must_use]
    pub fn species(&self) -> &SpeciesRegistry {
        &self.species
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Registers an observer. Observers see every event in emission order.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&LiveEvent) + Send + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Adds a caller-supplied condition to the requirement for reaching
    /// `target_stage`.
    pub fn attach_custom_check(
        &mut self,
        species: &str,
        target_stage: u32,
        check: CustomCheck,
    ) -> anyhow::Result<()> {
        self.species.attach_custom_check(species, target_stage, check)
    }

    /// Replaces the animation data used for `species`.
    pub fn set_animation_resolver(&mut self, species: &str, resolver: SharedAnimations) {
        self.animations.insert(species.to_string(), resolver);
    }

    pub(crate) fn record_persistence_error(&mut self, action: &str, id: &CreatureId, e: &anyhow::Error) {
        tracing::error!(creature = %id, action, error = %e, "Persistence failed");
        self.last_persistence_error = Some(format!("{action} {id}: {e}"));
    }
}
