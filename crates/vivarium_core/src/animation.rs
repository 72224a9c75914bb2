//! Animation lookup with the stage fallback chain.
//!
//! A stage's clip set is taken from, in order: the stage itself, the stage
//! below it, the first stage with any clips, and finally a bare `"idle"`.

use crate::services::AnimationResolver;
use std::collections::BTreeMap;
use vivarium_data::{AnimationClip, BehaviorState, SpeciesConfig};

pub const IDLE_CLIP: &str = "idle";

/// Clip names usable at a stage, and which stage they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSet {
    /// `None` when nothing resolved and the bare idle fallback is in use.
    pub source_stage: Option<u32>,
    pub names: Vec<String>,
}

impl ResolvedSet {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

pub fn resolve_set(animations: &dyn AnimationResolver, stage: u32) -> ResolvedSet {
    let own = animations.resolve_animation_set(stage);
    if !own.is_empty() {
        return ResolvedSet {
            source_stage: Some(stage),
            names: own,
        };
    }
    if stage > 1 {
        let lower = animations.resolve_animation_set(stage - 1);
        if !lower.is_empty() {
            return ResolvedSet {
                source_stage: Some(stage - 1),
                names: lower,
            };
        }
    }
    for s in 1..=animations.stage_count() {
        let names = animations.resolve_animation_set(s);
        if !names.is_empty() {
            return ResolvedSet {
                source_stage: Some(s),
                names,
            };
        }
    }
    ResolvedSet {
        source_stage: None,
        names: vec![IDLE_CLIP.to_string()],
    }
}

/// Whether `state` can be shown at `stage`. Idle always can.
pub fn is_resolvable(animations: &dyn AnimationResolver, stage: u32, state: BehaviorState) -> bool {
    if state == BehaviorState::Idle {
        return true;
    }
    resolve_set(animations, stage)
        .source_stage
        .is_some_and(|source| animations.has_animation(source, state.animation_name()))
}

/// Intrinsic length of the clip `state` would play at `stage`, if known.
pub fn clip_length(
    animations: &dyn AnimationResolver,
    stage: u32,
    state: BehaviorState,
) -> Option<f32> {
    let set = resolve_set(animations, stage);
    let source = set.source_stage?;
    let name = state.animation_name();
    if !set.contains(name) {
        return None;
    }
    animations.clip_length(source, name)
}

/// Resolver backed by the animation sets declared in a species config.
#[derive(Debug, Clone, Default)]
pub struct ConfigAnimationResolver {
    sets: BTreeMap<u32, Vec<AnimationClip>>,
    stage_count: u32,
}

impl ConfigAnimationResolver {
    #[must_use]
    pub fn from_species(species: &SpeciesConfig) -> Self {
        let mut sets: BTreeMap<u32, Vec<AnimationClip>> = BTreeMap::new();
        for set in &species.animations {
            sets.entry(set.stage)
                .or_default()
                .extend(set.clips.iter().cloned());
        }
        let declared = sets.keys().copied().max().unwrap_or(0);
        Self {
            sets,
            stage_count: declared.max(species.max_stage()),
        }
    }
}

impl AnimationResolver for ConfigAnimationResolver {
    fn has_animation(&self, stage: u32, name: &str) -> bool {
        self.sets
            .get(&stage)
            .is_some_and(|clips| clips.iter().any(|c| c.name == name))
    }

    fn resolve_animation_set(&self, stage: u32) -> Vec<String> {
        self.sets
            .get(&stage)
            .map(|clips| clips.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }

    fn clip_length(&self, stage: u32, name: &str) -> Option<f32> {
        self.sets
            .get(&stage)?
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.length)
    }

    fn stage_count(&self) -> u32 {
        self.stage_count
    }
}
