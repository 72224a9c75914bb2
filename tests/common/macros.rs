/// Asserts that a creature with the given id is still in the habitat.
#[macro_export]
macro_rules! assert_creature_live {
    ($habitat:expr, $id:expr) => {
        assert!(
            $habitat.creature(&$id).is_some(),
            "Creature {} should be live but was not found",
            $id
        );
    };
}

/// Asserts how many events in a slice match a pattern.
#[macro_export]
macro_rules! assert_event_count {
    ($events:expr, $pattern:pat, $count:expr) => {
        let found = $events.iter().filter(|e| matches!(e, $pattern)).count();
        assert_eq!(
            found,
            $count,
            "Expected {} events matching {}, found {}",
            $count,
            stringify!($pattern),
            found
        );
    };
}

/// Asserts that hunger and happiness sit inside the creature's stage limits.
#[macro_export]
macro_rules! assert_stats_in_bounds {
    ($habitat:expr, $creature:expr) => {
        let species = $habitat
            .species()
            .get(&$creature.id.species)
            .expect("Creature species not registered");
        let profile = species.stage_profile($creature.stage());
        let stats = &$creature.stats;
        assert!(
            (0.0..=profile.max_hunger).contains(&stats.hunger),
            "Hunger {} outside [0, {}]",
            stats.hunger,
            profile.max_hunger
        );
        assert!(
            (0.0..=profile.max_happiness).contains(&stats.happiness),
            "Happiness {} outside [0, {}]",
            stats.happiness,
            profile.max_happiness
        );
    };
}
