#[macro_use]
mod common;

use common::{CreatureBuilder, HabitatBuilder, TestHabitat};
use vivarium_data::{CustomCheck, DespawnReason, EvolutionRequirement, LiveEvent};

/// Stage 2 needs 60s alive, 3 meals, 5 interactions, happiness 80, hunger 70.
fn with_requirement(creature: CreatureBuilder) -> TestHabitat {
    HabitatBuilder::new()
        .without_drops()
        .with_config(|c| {
            let species = &mut c.species[0];
            species.requirements.retain(|r| r.target_stage != 2);
            species.requirements.push(EvolutionRequirement {
                target_stage: 2,
                min_time_alive: 60.0,
                min_food_consumed: 3,
                min_interactions: 5,
                min_happiness: 80.0,
                min_hunger: 70.0,
                label: "Grow up".to_string(),
                custom: None,
            });
        })
        .with_creature(creature)
        .build()
}

fn ready() -> CreatureBuilder {
    CreatureBuilder::new()
        .at(50.0, 30.0)
        .progress(100.0, 5, 10)
        .happiness(90.0)
        .hunger(80.0)
}

#[test]
fn test_qualified_creature_evolves_exactly_once() {
    let mut t = with_requirement(ready());
    let id = t.ids[0].clone();

    let mut events = Vec::new();
    for _ in 0..10 {
        events.extend(t.habitat.update(0.1));
    }

    assert_event_count!(events, LiveEvent::Evolved { .. }, 1);
    let creature = t.habitat.creature(&id).unwrap();
    assert_eq!(creature.stage(), 2);
    assert_eq!(creature.id.stage, 2);
    assert_eq!(creature.id.instance, id.instance);
    assert!(creature.id.to_string().starts_with("slime-2-"));
    assert_eq!(creature.progress.food_consumed, 0);
    assert_eq!(creature.progress.interactions, 0);
    assert!(creature.progress.time_alive < 1.5);
    assert_eq!(t.habitat.metrics().counter("evolutions"), 1);
}

#[test]
fn test_evolution_moves_saved_record_to_new_id() {
    let mut t = with_requirement(ready());
    let old_id = t.ids[0].clone();
    t.habitat.save_all().unwrap();
    assert!(t.persistence.get(&old_id).is_some());

    t.habitat.update(0.1);

    let new_id = t.habitat.creature(&old_id).unwrap().id.clone();
    assert_ne!(new_id, old_id);
    assert!(t.persistence.get(&old_id).is_none());
    let saved = t.persistence.get(&new_id).expect("Evolved creature not saved");
    assert_eq!(saved.id.stage, 2);
}

#[test]
fn test_unmet_threshold_blocks_evolution() {
    let mut t = with_requirement(ready().hunger(65.0));
    for _ in 0..20 {
        t.habitat.update(0.1);
    }
    assert_eq!(t.habitat.creatures()[0].stage(), 1);
}

#[test]
fn test_custom_check_gates_evolution() {
    let mut t = with_requirement(ready());
    t.habitat
        .attach_custom_check("slime", 2, CustomCheck::new(|c| c.stats.health > 1000.0))
        .unwrap();
    t.habitat.update(0.1);
    assert_eq!(t.habitat.creatures()[0].stage(), 1);
}

#[test]
fn test_one_promotion_per_tick() {
    let mut t = HabitatBuilder::new()
        .without_drops()
        .with_config(|c| {
            for requirement in &mut c.species[0].requirements {
                requirement.min_time_alive = 0.0;
                requirement.min_food_consumed = 0;
                requirement.min_interactions = 0;
                requirement.min_happiness = 0.0;
                requirement.min_hunger = 0.0;
            }
        })
        .with_creature(CreatureBuilder::new())
        .build();
    let id = t.ids[0].clone();

    t.habitat.update(0.1);
    assert_eq!(t.habitat.creature(&id).unwrap().stage(), 2);
    t.habitat.update(0.1);
    assert_eq!(t.habitat.creature(&id).unwrap().stage(), 3);
    let events = t.habitat.update(0.1);
    assert_eq!(t.habitat.creature(&id).unwrap().stage(), 3);
    assert_event_count!(events, LiveEvent::Evolved { .. }, 0);
}

#[test]
fn test_stats_reclamped_to_new_stage() {
    let mut t = with_requirement(ready());
    t.habitat.update(0.1);
    let creature = &t.habitat.creatures()[0];
    assert_stats_in_bounds!(t.habitat, creature);
}

#[test]
fn test_poke_promotion_counts_against_next_tick() {
    let mut t = HabitatBuilder::new()
        .without_drops()
        .with_config(|c| {
            for requirement in &mut c.species[0].requirements {
                requirement.min_time_alive = 0.0;
                requirement.min_food_consumed = 0;
                requirement.min_interactions = u32::from(requirement.target_stage == 2);
                requirement.min_happiness = 0.0;
                requirement.min_hunger = 0.0;
            }
        })
        .with_creature(CreatureBuilder::new())
        .build();
    let id = t.ids[0].clone();

    assert!(t.habitat.poke(&id).unwrap().is_accepted());
    assert_eq!(t.habitat.creature(&id).unwrap().stage(), 2);

    let events = t.habitat.update(0.05);
    assert_event_count!(events, LiveEvent::Evolved { .. }, 1);
    assert_eq!(t.habitat.creature(&id).unwrap().stage(), 2);

    let events = t.habitat.update(0.05);
    assert_event_count!(events, LiveEvent::Evolved { .. }, 1);
    assert_eq!(t.habitat.creature(&id).unwrap().stage(), 3);
}

#[test]
fn test_pre_evolution_id_restores_stored_creature() {
    let mut t = with_requirement(ready());
    let old_id = t.ids[0].clone();
    t.habitat.update(0.1);
    let new_id = t.habitat.creature(&old_id).unwrap().id.clone();
    assert_eq!(new_id.stage, 2);

    t.habitat.despawn(&old_id, DespawnReason::Stored).unwrap();
    t.habitat.update(0.1);
    assert!(t.habitat.is_empty());

    let restored = t.habitat.restore(&old_id).unwrap();
    assert_eq!(restored, new_id);
    assert_eq!(t.habitat.creature(&old_id).unwrap().stage(), 2);
}
