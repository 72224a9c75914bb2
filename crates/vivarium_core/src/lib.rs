//! # Vivarium Core
//!
//! Per-creature simulation engines for the Vivarium habitat.
//!
//! Every engine is a set of free functions over a single owned
//! [`CreatureInstance`](vivarium_data::CreatureInstance) plus its shared
//! [`SpeciesConfig`](vivarium_data::SpeciesConfig):
//! - stat decay, regeneration and sickness
//! - the weighted behavior state machine
//! - evolution progress and stage promotion
//! - steering, separation and arena bounds
//! - resource pursuit, poke handling and periodic drops
//!
//! The habitat in the root crate drives them in a fixed order each tick.
//! All randomness comes in through a `&mut impl Rng`, so a seeded
//! `ChaCha8Rng` makes a run reproducible.
//!
//! ## Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use vivarium_core::events::EventLog;
//! use vivarium_core::{lifecycle, stats};
//! use vivarium_data::{Position, Rect, SpeciesConfig};
//!
//! let species = SpeciesConfig::default();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut creature =
//!     lifecycle::create_creature_with_rng(&species, Position::new(10.0, 10.0), &Rect::default(), &mut rng);
//!
//! let mut events = Vec::new();
//! stats::tick(&mut creature, &species, 1.0, &mut EventLog::new(0, &mut events));
//! assert!(creature.stats.hunger < 80.0);
//! ```

/// Animation lookup with stage fallback
pub mod animation;
/// Weighted behavior state machine
pub mod behavior;
/// Configuration management for habitat parameters
pub mod config;
/// Periodic coin and poop drops
pub mod drops;
/// Event buffering and observers
pub mod events;
/// Evolution progress and stage promotion
pub mod evolution;
/// Resource pursuit and consumption
pub mod foraging;
/// Poke handling and deferred commands
pub mod interaction;
/// Creature creation and restoration
pub mod lifecycle;
/// Tick metrics and logging setup
pub mod metrics;
/// Steering, separation and bounds
pub mod movement;
/// Collaborator contracts
pub mod services;
/// Spatial hashing for proximity queries
pub mod spatial_hash;
/// Species registry
pub mod species;
/// Hunger, happiness, health and sickness
pub mod stats;

pub use behavior::BehaviorContext;
pub use config::AppConfig;
pub use events::{EventBus, EventLog, SubscriptionId};
pub use evolution::EvolutionOutcome;
pub use interaction::{InteractionCommand, PokeOutcome};
pub use metrics::{init_logging, Metrics};
pub use services::{AnimationResolver, PersistenceService, ResourceLocator, RewardSink};
pub use species::SpeciesRegistry;
