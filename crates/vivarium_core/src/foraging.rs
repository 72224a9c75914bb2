//! Resource pursuit and consumption.

use crate::behavior::{self, BehaviorContext};
use crate::events::EventLog;
use crate::evolution::{self, EvolutionOutcome};
use crate::services::ResourceLocator;
use crate::stats;
use rand::Rng;
use vivarium_data::{BehaviorState, CreatureInstance, SpeciesConfig};

/// A successful meal.
#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    pub value: f32,
    pub evolution: Option<EvolutionOutcome>,
}

/// Whether any resource lies within the species' detection radius.
#[must_use]
pub fn resource_nearby(
    creature: &CreatureInstance,
    species: &SpeciesConfig,
    resources: &dyn ResourceLocator,
) -> bool {
    resources
        .find_nearest(creature.position, f64::from(species.detection_radius))
        .is_some()
}

/// Drops a vanished pursuit, starts a new one when hungry and moving, and
/// keeps the target on the pursued resource.
pub fn update_pursuit(
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    resources: &dyn ResourceLocator,
) {
    if let Some(handle) = creature.pursuit {
        match resources.position(handle) {
            Some(pos) => {
                creature.target = pos;
                return;
            }
            None => {
                tracing::trace!(creature = %creature.id, "Pursued resource vanished");
                creature.pursuit = None;
            }
        }
    }

    if !creature.state().is_locomotion() || creature.stats.hunger >= species.food_seek_threshold {
        return;
    }
    let Some(handle) =
        resources.find_nearest(creature.position, f64::from(species.detection_radius))
    else {
        return;
    };
    if let Some(pos) = resources.position(handle) {
        creature.pursuit = Some(handle);
        creature.target = pos;
    }
}

/// Eats the pursued resource once within consumption distance.
pub fn try_consume<R: Rng + ?Sized>(
    creature: &mut CreatureInstance,
    ctx: &BehaviorContext,
    resources: &mut dyn ResourceLocator,
    rng: &mut R,
    log: &mut EventLog,
) -> Option<Meal> {
    let handle = creature.pursuit?;
    let species = ctx.species;
    let Some(pos) = resources.position(handle) else {
        creature.pursuit = None;
        return None;
    };
    if creature.position.distance(&pos) > f64::from(species.consumption_distance) {
        return None;
    }

    let value = resources.food_value(handle).unwrap_or(0.0);
    creature.pursuit = None;
    if !resources.consume(handle) {
        return None;
    }

    stats::feed(creature, species, value, log);
    log.food_consumed(&creature.id);
    let evolution = evolution::on_food_consumed(creature, species, log);
    behavior::force_state(creature, BehaviorState::Eating, ctx, rng, log);
    tracing::debug!(creature = %creature.id, value, "Food consumed");

    Some(Meal { value, evolution })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ConfigAnimationResolver;
    use crate::lifecycle::create_creature_with_rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;
    use vivarium_data::{LiveEvent, Position, Rect, ResourceHandle};

    #[derive(Default)]
    struct Pantry {
        items: BTreeMap<u64, Position>,
    }

    impl ResourceLocator for Pantry {
        fn find_nearest(&self, position: Position, radius: f64) -> Option<ResourceHandle> {
            self.items
                .iter()
                .filter(|(_, p)| p.distance(&position) <= radius)
                .min_by(|a, b| a.1.distance(&position).total_cmp(&b.1.distance(&position)))
                .map(|(k, _)| ResourceHandle(*k))
        }

        fn position(&self, handle: ResourceHandle) -> Option<Position> {
            self.items.get(&handle.0).copied()
        }

        fn food_value(&self, handle: ResourceHandle) -> Option<f32> {
            self.items.get(&handle.0).map(|_| 20.0)
        }

        fn consume(&mut self, handle: ResourceHandle) -> bool {
            self.items.remove(&handle.0).is_some()
        }
    }

    fn hungry_walker(species: &SpeciesConfig) -> CreatureInstance {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut c = create_creature_with_rng(species, Position::new(10.0, 10.0), &Rect::default(), &mut rng);
        c.behavior.state = BehaviorState::Walking;
        c.stats.hunger = 20.0;
        c
    }

    #[test]
    fn test_hungry_walker_targets_nearest_food() {
        let species = SpeciesConfig::default();
        let mut pantry = Pantry::default();
        pantry.items.insert(1, Position::new(20.0, 10.0));
        pantry.items.insert(2, Position::new(13.0, 10.0));
        let mut c = hungry_walker(&species);
        update_pursuit(&mut c, &species, &pantry);
        assert_eq!(c.pursuit, Some(ResourceHandle(2)));
        assert_eq!(c.target, Position::new(13.0, 10.0));
    }

    #[test]
    fn test_sated_creature_ignores_food() {
        let species = SpeciesConfig::default();
        let mut pantry = Pantry::default();
        pantry.items.insert(1, Position::new(11.0, 10.0));
        let mut c = hungry_walker(&species);
        c.stats.hunger = 95.0;
        update_pursuit(&mut c, &species, &pantry);
        assert_eq!(c.pursuit, None);
    }

    #[test]
    fn test_vanished_pursuit_is_dropped() {
        let species = SpeciesConfig::default();
        let pantry = Pantry::default();
        let mut c = hungry_walker(&species);
        c.pursuit = Some(ResourceHandle(42));
        update_pursuit(&mut c, &species, &pantry);
        assert_eq!(c.pursuit, None);
    }

    #[test]
    fn test_consume_feeds_and_forces_eating() {
        let species = SpeciesConfig::default();
        let animations = ConfigAnimationResolver::from_species(&species);
        let ctx = BehaviorContext {
            species: &species,
            animations: &animations,
            resource_available: true,
        };
        let mut pantry = Pantry::default();
        pantry.items.insert(1, Position::new(10.5, 10.0));
        let mut c = hungry_walker(&species);
        update_pursuit(&mut c, &species, &pantry);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut buf = Vec::new();
        let meal = try_consume(&mut c, &ctx, &mut pantry, &mut rng, &mut EventLog::new(3, &mut buf))
            .unwrap();
        assert_eq!(meal.value, 20.0);
        assert_eq!(c.stats.hunger, 40.0);
        assert_eq!(c.state(), BehaviorState::Eating);
        assert_eq!(c.progress.food_consumed, 1);
        assert_eq!(c.pursuit, None);
        assert!(pantry.items.is_empty());
        assert!(buf.iter().any(|e| matches!(e, LiveEvent::FoodConsumed { tick: 3, .. })));
    }

    #[test]
    fn test_out_of_reach_is_not_consumed() {
        let species = SpeciesConfig::default();
        let animations = ConfigAnimationResolver::from_species(&species);
        let ctx = BehaviorContext {
            species: &species,
            animations: &animations,
            resource_available: true,
        };
        let mut pantry = Pantry::default();
        pantry.items.insert(1, Position::new(14.0, 10.0));
        let mut c = hungry_walker(&species);
        update_pursuit(&mut c, &species, &pantry);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut buf = Vec::new();
        assert!(try_consume(&mut c, &ctx, &mut pantry, &mut rng, &mut EventLog::new(0, &mut buf)).is_none());
        assert_eq!(c.pursuit, Some(ResourceHandle(1)));
    }
}
