//! Configuration management for habitat parameters.
//!
//! Strongly-typed structures that map to `config.toml`. Every field has a
//! default, so a config file only needs to name what it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [habitat]
//! seed = 42
//! deterministic = true
//! initial_population = 4
//!
//! [habitat.arena]
//! min_x = 0.0
//! min_y = 0.0
//! max_x = 100.0
//! max_y = 60.0
//!
//! [food]
//! initial_food = 10
//! spawn_interval = 5.0
//!
//! [[species]]
//! id = "slime"
//! base_speed = 2.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use vivarium_data::{Rect, SpeciesConfig};

/// Arena, RNG and flocking parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HabitatConfig {
    pub arena: Rect,
    pub seed: Option<u64>,
    pub deterministic: bool,
    pub separation_radius: f64,
    pub separation_strength: f64,
    /// Distance at which a wandering creature counts as arrived.
    pub arrival_tolerance: f64,
    pub cell_size: f64,
    pub initial_population: usize,
    /// Ticks between automatic saves of every creature; 0 disables.
    pub autosave_interval: u64,
}

impl Default for HabitatConfig {
    fn default() -> Self {
        Self {
            arena: Rect::default(),
            seed: None,
            deterministic: false,
            separation_radius: 3.0,
            separation_strength: 4.0,
            arrival_tolerance: 0.5,
            cell_size: 5.0,
            initial_population: 3,
            autosave_interval: 0,
        }
    }
}

/// Food field parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FoodConfig {
    pub initial_food: usize,
    pub max_food: usize,
    /// Seconds between food spawns; 0 disables replenishment.
    pub spawn_interval: f32,
    /// Hunger restored per item.
    pub food_value: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            initial_food: 8,
            max_food: 20,
            spawn_interval: 5.0,
            food_value: 25.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub habitat: HabitatConfig,
    pub food: FoodConfig,
    pub species: Vec<SpeciesConfig>,
    pub target_fps: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            habitat: HabitatConfig::default(),
            food: FoodConfig::default(),
            species: vec![SpeciesConfig::default()],
            target_fps: 60,
        }
    }
}

impl AppConfig {
    /// Validates structural sanity. Out-of-range rates inside a species are
    /// not errors; the registry clamps those with a warning.
    pub fn validate(&self) -> anyhow::Result<()> {
        let arena = &self.habitat.arena;
        anyhow::ensure!(
            arena.min_x.is_finite()
                && arena.min_y.is_finite()
                && arena.max_x.is_finite()
                && arena.max_y.is_finite(),
            "Arena bounds must be finite"
        );
        anyhow::ensure!(
            arena.max_x > arena.min_x && arena.max_y > arena.min_y,
            "Arena must have positive width and height"
        );
        anyhow::ensure!(
            self.habitat.cell_size > 0.0,
            "Spatial hash cell size must be positive"
        );
        anyhow::ensure!(
            self.habitat.separation_radius >= 0.0,
            "Separation radius must be non-negative"
        );
        anyhow::ensure!(
            self.habitat.separation_strength >= 0.0,
            "Separation strength must be non-negative"
        );
        anyhow::ensure!(
            self.habitat.arrival_tolerance >= 0.0,
            "Arrival tolerance must be non-negative"
        );
        anyhow::ensure!(
            self.habitat.initial_population <= 10000,
            "Initial population too large (max 10000)"
        );

        anyhow::ensure!(
            self.food.initial_food <= self.food.max_food,
            "Initial food cannot exceed max food"
        );
        anyhow::ensure!(
            self.food.max_food <= 10000,
            "Max food too large (max 10000)"
        );
        anyhow::ensure!(
            self.food.spawn_interval >= 0.0,
            "Food spawn interval must be non-negative"
        );
        anyhow::ensure!(self.food.food_value > 0.0, "Food value must be positive");

        anyhow::ensure!(!self.species.is_empty(), "At least one species is required");
        for (i, species) in self.species.iter().enumerate() {
            anyhow::ensure!(!species.id.is_empty(), "Species #{i} has an empty id");
            anyhow::ensure!(
                !species.id.chars().any(char::is_whitespace),
                "Species id '{}' must not contain whitespace",
                species.id
            );
            anyhow::ensure!(
                self.species[..i].iter().all(|s| s.id != species.id),
                "Duplicate species id '{}'",
                species.id
            );
            anyhow::ensure!(
                !species.stages.is_empty(),
                "Species '{}' must define at least one stage",
                species.id
            );
        }

        anyhow::ensure!(self.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(self.target_fps <= 240, "Target FPS too high (max 240)");

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or returns the defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Hash of everything that affects simulation outcomes. Two runs with the
    /// same fingerprint and seed replay identically.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.habitat).as_bytes());
        hasher.update(format!("{:?}", self.food).as_bytes());
        for species in &self.species {
            hasher.update(format!("{:?}", species).as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_arena_rejected() {
        let config = AppConfig {
            habitat: HabitatConfig {
                arena: Rect {
                    min_x: 10.0,
                    min_y: 0.0,
                    max_x: 5.0,
                    max_y: 10.0,
                },
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_species_rejected() {
        let config = AppConfig {
            species: vec![SpeciesConfig::default(), SpeciesConfig::default()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_food_value_rejected() {
        let config = AppConfig {
            food: FoodConfig {
                food_value: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = AppConfig::from_toml(
            r#"
            [habitat]
            seed = 7
            deterministic = true

            [[species]]
            id = "moth"
            base_speed = 3.5
            "#,
        )
        .unwrap();
        assert_eq!(config.habitat.seed, Some(7));
        assert_eq!(config.species.len(), 1);
        assert_eq!(config.species[0].id, "moth");
        assert_eq!(config.species[0].base_speed, 3.5);
        assert_eq!(config.species[0].stages.len(), 3);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = AppConfig::load("definitely/not/here.toml").unwrap();
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let a = AppConfig::default();
        let b = AppConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = AppConfig::default();
        c.habitat.separation_strength = 9.0;
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
