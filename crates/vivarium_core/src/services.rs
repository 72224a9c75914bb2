//! Contracts for the collaborators the simulation calls out to.
//!
//! The habitat receives these as boxed trait objects; nothing in the core
//! looks them up globally.

use rand::RngCore;
use vivarium_data::{CreatureId, Position, ResourceHandle, RewardKind, StatSnapshot};

/// Stores creature snapshots keyed by creature id. Storage format is up to the
/// implementation.
pub trait PersistenceService {
    fn save(&mut self, id: &CreatureId, snapshot: &StatSnapshot) -> anyhow::Result<()>;
    fn load(&mut self, id: &CreatureId) -> anyhow::Result<Option<StatSnapshot>>;
    fn remove(&mut self, id: &CreatureId) -> anyhow::Result<()>;
}

/// Food and other consumables in the arena.
pub trait ResourceLocator {
    fn find_nearest(&self, position: Position, radius: f64) -> Option<ResourceHandle>;
    /// `None` once the resource is gone.
    fn position(&self, handle: ResourceHandle) -> Option<Position>;
    /// Hunger restored by eating the resource.
    fn food_value(&self, handle: ResourceHandle) -> Option<f32>;
    /// Removes the resource. Returns false if it was already gone.
    fn consume(&mut self, handle: ResourceHandle) -> bool;
    /// Called once at the start of every tick.
    fn replenish(&mut self, _dt: f32, _rng: &mut dyn RngCore) {}
    /// Number of resources currently in the arena, for metrics.
    fn available(&self) -> usize {
        0
    }
}

/// Read-only queries against a species' animation data.
pub trait AnimationResolver {
    fn has_animation(&self, stage: u32, name: &str) -> bool;
    fn resolve_animation_set(&self, stage: u32) -> Vec<String>;
    fn clip_length(&self, stage: u32, name: &str) -> Option<f32>;
    fn stage_count(&self) -> u32;
}

/// Receives dropped rewards. Fire and forget.
pub trait RewardSink {
    fn emit(&mut self, kind: &RewardKind, position: Position);
}

/// Habitat without any consumables.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResources;

impl ResourceLocator for NoResources {
    fn find_nearest(&self, _position: Position, _radius: f64) -> Option<ResourceHandle> {
        None
    }

    fn position(&self, _handle: ResourceHandle) -> Option<Position> {
        None
    }

    fn food_value(&self, _handle: ResourceHandle) -> Option<f32> {
        None
    }

    fn consume(&mut self, _handle: ResourceHandle) -> bool {
        false
    }
}

/// Discards every reward.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRewardSink;

impl RewardSink for NullRewardSink {
    fn emit(&mut self, _kind: &RewardKind, _position: Position) {}
}

/// Species without animation data. Everything resolves to the bare idle clip.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAnimations;

impl AnimationResolver for NoAnimations {
    fn has_animation(&self, _stage: u32, _name: &str) -> bool {
        false
    }

    fn resolve_animation_set(&self, _stage: u32) -> Vec<String> {
        Vec::new()
    }

    fn clip_length(&self, _stage: u32, _name: &str) -> Option<f32> {
        None
    }

    fn stage_count(&self) -> u32 {
        0
    }
}
