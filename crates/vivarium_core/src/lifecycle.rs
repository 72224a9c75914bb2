use crate::movement;
use crate::stats;
use rand::Rng;
use uuid::Uuid;
use vivarium_data::{
    BehaviorStatus, CreatureId, CreatureInstance, DropTimers, EvolutionProgress,
    InteractionStatus, Position, Rect, SpeciesConfig, StatSnapshot,
};

/// Pet name derived from the instance suffix. Stable across evolution.
#[must_use]
pub fn display_name(id: &CreatureId) -> String {
    let bytes = id.instance.as_bytes();
    let syllables = [
        "bo", "pi", "mu", "ka", "lo", "ne", "ri", "su", "ta", "wi", "zu", "fe", "go", "ha", "mi",
        "no", "pu", "ro", "sa", "ti", "yu", "ze",
    ];
    let prefix = [
        "Blip", "Dot", "Fizz", "Goo", "Jel", "Lum", "Mop", "Nib", "Pud", "Quib", "Sprout", "Tuf",
        "Wob", "Yum",
    ];
    let p_idx = (bytes[0] as usize) % prefix.len();
    let s1_idx = (bytes[1] as usize) % syllables.len();
    let s2_idx = (bytes[2] as usize) % syllables.len();
    format!(
        "{}{}{} (stage {})",
        prefix[p_idx], syllables[s1_idx], syllables[s2_idx], id.stage
    )
}

/// Fresh stage-1 creature with baseline stats, placed inside the arena.
pub fn create_creature_with_rng<R: Rng + ?Sized>(
    species: &SpeciesConfig,
    position: Position,
    arena: &Rect,
    rng: &mut R,
) -> CreatureInstance {
    let instance = Uuid::from_u128(rng.gen::<u128>());
    let id = CreatureId::new(species.id.clone(), 1, instance);
    let half_extent = species.stage_profile(1).half_extent;
    let (position, _) = movement::clamp_to_bounds(position, arena, half_extent);
    CreatureInstance {
        id,
        position,
        target: movement::random_target(arena, half_extent, rng),
        pursuit: None,
        stats: stats::baseline(species, 1),
        progress: EvolutionProgress::default(),
        behavior: BehaviorStatus::default(),
        interaction: InteractionStatus::default(),
        drops: DropTimers::default(),
        promoted_this_tick: false,
    }
}

/// Rebuilds a creature from a persisted snapshot, re-clamping anything the
/// current config no longer allows.
pub fn restore_creature<R: Rng + ?Sized>(
    snapshot: StatSnapshot,
    species: &SpeciesConfig,
    arena: &Rect,
    rng: &mut R,
) -> CreatureInstance {
    let mut creature = CreatureInstance::from_snapshot(snapshot);
    stats::reclamp(&mut creature, species);
    let half_extent = species.stage_profile(creature.stage()).half_extent;
    let (position, corrected) = movement::clamp_to_bounds(creature.position, arena, half_extent);
    if corrected {
        tracing::warn!(creature = %creature.id, "Restored creature was out of bounds");
    }
    creature.position = position;
    creature.target = movement::random_target(arena, half_extent, rng);
    creature
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use vivarium_data::{BehaviorState, Stats};

    #[test]
    fn test_create_is_deterministic_per_seed() {
        let species = SpeciesConfig::default();
        let arena = Rect::default();
        let a = create_creature_with_rng(
            &species,
            Position::new(5.0, 5.0),
            &arena,
            &mut ChaCha8Rng::seed_from_u64(1),
        );
        let b = create_creature_with_rng(
            &species,
            Position::new(5.0, 5.0),
            &arena,
            &mut ChaCha8Rng::seed_from_u64(1),
        );
        assert_eq!(a, b);
        assert_eq!(a.stage(), 1);
        assert_eq!(a.state(), BehaviorState::Idle);
        assert_eq!(a.stats.hunger, 80.0);
        assert!(arena.contains(&a.target));
    }

    #[test]
    fn test_create_clamps_spawn_position() {
        let species = SpeciesConfig::default();
        let arena = Rect::default();
        let c = create_creature_with_rng(
            &species,
            Position::new(-50.0, 500.0),
            &arena,
            &mut ChaCha8Rng::seed_from_u64(1),
        );
        assert_eq!(c.position, Position::new(1.0, 59.0));
    }

    #[test]
    fn test_restore_reclamps_stats() {
        let species = SpeciesConfig::default();
        let snapshot = StatSnapshot {
            id: CreatureId::new("slime", 2, Uuid::from_u128(5)),
            position: Position::new(20.0, 20.0),
            stats: Stats {
                hunger: 999.0,
                happiness: -4.0,
                health: 50.0,
                sick: true,
            },
            progress: EvolutionProgress::default(),
        };
        let c = restore_creature(snapshot, &species, &Rect::default(), &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(c.stage(), 2);
        assert_eq!(c.stats.hunger, 120.0);
        assert_eq!(c.stats.happiness, 0.0);
        assert!(c.stats.sick);
    }

    #[test]
    fn test_display_name_survives_evolution() {
        let id = CreatureId::new("slime", 1, Uuid::from_u128(0xdead_beef));
        let a = display_name(&id);
        let b = display_name(&id.with_stage(2));
        assert_eq!(a.split(' ').next(), b.split(' ').next());
        assert!(b.ends_with("(stage 2)"));
    }
}
