pub mod macros;

use vivarium_data::{BehaviorState, CreatureId, Position};
use vivarium_io::MemoryPersistence;
use vivarium_lib::model::config::AppConfig;
use vivarium_lib::model::food::FoodField;
use vivarium_lib::model::habitat::{Habitat, Services};
use vivarium_lib::model::rewards::RewardLedger;

type HabitatMod = Box<dyn FnOnce(&mut Habitat)>;

/// A habitat plus handles on the services it was built with.
#[allow(dead_code)]
pub struct TestHabitat {
    pub habitat: Habitat,
    pub food: FoodField,
    pub rewards: RewardLedger,
    pub persistence: MemoryPersistence,
    pub ids: Vec<CreatureId>,
}

#[allow(dead_code)]
pub struct HabitatBuilder {
    config: AppConfig,
    food: Vec<Position>,
    creatures: Vec<CreatureBuilder>,
    persistence: MemoryPersistence,
    mods: Vec<HabitatMod>,
}

#[allow(dead_code)]
impl HabitatBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.habitat.initial_population = 0;
        config.habitat.seed = Some(1);
        config.food.initial_food = 0;
        config.food.spawn_interval = 0.0;
        Self {
            config,
            food: Vec::new(),
            creatures: Vec::new(),
            persistence: MemoryPersistence::new(),
            mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.habitat.seed = Some(seed);
        self
    }

    pub fn deterministic(mut self) -> Self {
        self.config.habitat.deterministic = true;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Turns off coin and poop timers on every stage of every species.
    pub fn without_drops(self) -> Self {
        self.with_config(|config| {
            for species in &mut config.species {
                for stage in &mut species.stages {
                    stage.coin_drop_interval = 0.0;
                    stage.poop_drop_interval = 0.0;
                }
            }
        })
    }

    pub fn with_food(mut self, x: f64, y: f64) -> Self {
        self.food.push(Position::new(x, y));
        self
    }

    pub fn with_creature(mut self, creature: CreatureBuilder) -> Self {
        self.creatures.push(creature);
        self
    }

    pub fn with_persistence(mut self, persistence: MemoryPersistence) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_mod<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut Habitat) + 'static,
    {
        self.mods.push(Box::new(modifier));
        self
    }

    pub fn build(self) -> TestHabitat {
        let food = FoodField::new(self.config.food.clone(), self.config.habitat.arena);
        for position in &self.food {
            food.place(*position);
        }
        let rewards = RewardLedger::new();
        let services = Services::shared(self.persistence.clone(), food.clone(), rewards.clone());
        let mut habitat =
            Habitat::new(self.config, services).expect("Failed to create habitat in test builder");

        let mut ids = Vec::new();
        for builder in self.creatures {
            ids.push(builder.spawn_into(&mut habitat));
        }
        for modifier in self.mods {
            modifier(&mut habitat);
        }

        TestHabitat {
            habitat,
            food,
            rewards,
            persistence: self.persistence,
            ids,
        }
    }
}

#[allow(dead_code)]
pub struct CreatureBuilder {
    species: String,
    x: f64,
    y: f64,
    hunger: Option<f32>,
    happiness: Option<f32>,
    health: Option<f32>,
    state: Option<(BehaviorState, f32)>,
    progress: Option<(f32, u32, u32)>,
}

#[allow(dead_code)]
impl CreatureBuilder {
    pub fn new() -> Self {
        Self {
            species: "slime".to_string(),
            x: 10.0,
            y: 10.0,
            hunger: None,
            happiness: None,
            health: None,
            state: None,
            progress: None,
        }
    }

    pub fn species(mut self, species: &str) -> Self {
        self.species = species.to_string();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn hunger(mut self, value: f32) -> Self {
        self.hunger = Some(value);
        self
    }

    pub fn happiness(mut self, value: f32) -> Self {
        self.happiness = Some(value);
        self
    }

    pub fn health(mut self, value: f32) -> Self {
        self.health = Some(value);
        self
    }

    /// Puts the creature in `state` with `remaining` seconds left.
    pub fn state(mut self, state: BehaviorState, remaining: f32) -> Self {
        self.state = Some((state, remaining));
        self
    }

    pub fn progress(mut self, time_alive: f32, food_consumed: u32, interactions: u32) -> Self {
        self.progress = Some((time_alive, food_consumed, interactions));
        self
    }

    fn spawn_into(self, habitat: &mut Habitat) -> CreatureId {
        let id = habitat
            .spawn(&self.species, Position::new(self.x, self.y))
            .expect("Failed to spawn creature in test builder");
        let creature = habitat
            .creature_mut(&id)
            .expect("Spawned creature missing");
        // Spawn clamps into the arena; tests that want an exact spot get it.
        creature.position = Position::new(self.x, self.y);
        creature.target = creature.position;
        if let Some(v) = self.hunger {
            creature.stats.hunger = v;
        }
        if let Some(v) = self.happiness {
            creature.stats.happiness = v;
        }
        if let Some(v) = self.health {
            creature.stats.health = v;
        }
        if let Some((state, remaining)) = self.state {
            creature.behavior.state = state;
            creature.behavior.remaining = remaining;
            creature.behavior.elapsed = 0.0;
        }
        if let Some((time_alive, food_consumed, interactions)) = self.progress {
            creature.progress.time_alive = time_alive;
            creature.progress.food_consumed = food_consumed;
            creature.progress.interactions = interactions;
        }
        id
    }
}
