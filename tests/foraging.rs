#[macro_use]
mod common;

use common::{CreatureBuilder, HabitatBuilder};
use vivarium_data::{BehaviorState, LiveEvent};

#[test]
fn test_hungry_creature_finds_and_eats_food() {
    let mut t = HabitatBuilder::new()
        .without_drops()
        .with_food(30.0, 30.0)
        .with_creature(
            CreatureBuilder::new()
                .at(25.0, 30.0)
                .hunger(20.0)
                .state(BehaviorState::Walking, 5.0),
        )
        .build();
    let id = t.ids[0].clone();
    let food_value = t.habitat.config.food.food_value;

    let mut events = Vec::new();
    let mut hunger_before_meal = None;
    for _ in 0..1200 {
        let hunger = t.habitat.creature(&id).unwrap().stats.hunger;
        let batch = t.habitat.update(0.05);
        let ate = batch.iter().any(|e| matches!(e, LiveEvent::FoodConsumed { .. }));
        events.extend(batch);
        if ate {
            hunger_before_meal = Some(hunger);
            break;
        }
    }

    let hunger_before = hunger_before_meal.expect("Creature never reached the food");
    assert_event_count!(events, LiveEvent::FoodConsumed { .. }, 1);
    assert!(t.food.is_empty());

    let creature = t.habitat.creature(&id).unwrap();
    assert_eq!(creature.state(), BehaviorState::Eating);
    assert!(creature.stats.hunger > hunger_before + food_value * 0.9);
    assert_eq!(creature.progress.food_consumed, 1);
    assert!(creature.pursuit.is_none());
    assert_eq!(t.habitat.metrics().counter("meals"), 1);
}

#[test]
fn test_full_creature_ignores_food() {
    let mut t = HabitatBuilder::new()
        .without_drops()
        .with_food(30.0, 30.0)
        .with_creature(
            CreatureBuilder::new()
                .at(25.0, 30.0)
                .hunger(100.0)
                .state(BehaviorState::Walking, 5.0),
        )
        .build();
    let id = t.ids[0].clone();

    t.habitat.update(0.05);
    assert!(t.habitat.creature(&id).unwrap().pursuit.is_none());
    assert_eq!(t.food.len(), 1);
}

#[test]
fn test_food_eaten_by_another_is_dropped_from_pursuit() {
    let mut t = HabitatBuilder::new()
        .without_drops()
        .with_food(30.0, 30.0)
        .with_creature(
            CreatureBuilder::new()
                .at(20.0, 30.0)
                .hunger(20.0)
                .state(BehaviorState::Walking, 5.0),
        )
        .build();
    let id = t.ids[0].clone();

    t.habitat.update(0.05);
    let handle = t
        .habitat
        .creature(&id)
        .unwrap()
        .pursuit
        .expect("Hungry walker should chase nearby food");

    let mut thief = t.food.clone();
    assert!(vivarium_core::ResourceLocator::consume(&mut thief, handle));
    t.habitat.update(0.05);
    assert!(t.habitat.creature(&id).unwrap().pursuit.is_none());
}
