use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vivarium_core::config::AppConfig;
use vivarium_core::{init_logging, lifecycle, PersistenceService};
use vivarium_io::{JsonFilePersistence, MemoryPersistence};
use vivarium_lib::model::food::FoodField;
use vivarium_lib::model::habitat::{Habitat, Services};
use vivarium_lib::model::rewards::RewardLedger;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Overrides the configured seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seconds per tick (defaults to 1 / target_fps)
    #[arg(long)]
    dt: Option<f32>,

    /// Directory for JSON saves; in-memory when omitted
    #[arg(long)]
    save_dir: Option<String>,

    /// Poke one creature every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    poke_every: u64,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.habitat.seed = Some(seed);
    }
    let dt = args
        .dt
        .unwrap_or_else(|| 1.0 / config.target_fps.max(1) as f32);

    let mut food_rng = match config.habitat.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed ^ 0xF00D),
        None => ChaCha8Rng::from_entropy(),
    };
    let food = FoodField::scattered(config.food.clone(), config.habitat.arena, &mut food_rng);
    let rewards = RewardLedger::new();
    let persistence: Box<dyn PersistenceService + Send> = match &args.save_dir {
        Some(dir) => Box::new(JsonFilePersistence::open(dir)?),
        None => Box::new(MemoryPersistence::new()),
    };
    let services = Services {
        persistence,
        resources: Box::new(food.clone()),
        rewards: Box::new(rewards.clone()),
    };

    let mut habitat = Habitat::new(config, services)?;
    tracing::info!(ticks = args.ticks, dt, "Running headless simulation");

    let mut evolutions = 0usize;
    let mut poke_cursor = 0usize;
    for tick in 1..=args.ticks {
        if args.poke_every > 0 && tick % args.poke_every == 0 && !habitat.is_empty() {
            let id = habitat.creatures()[poke_cursor % habitat.len()].id.clone();
            poke_cursor += 1;
            habitat.poke(&id)?;
        }
        let events = habitat.update(dt);
        evolutions += events
            .iter()
            .filter(|e| matches!(e, vivarium_data::LiveEvent::Evolved { .. }))
            .count();
    }

    let saved = habitat.save_all()?;

    println!("Simulated {} ticks ({:.1}s)", habitat.tick, habitat.elapsed);
    for creature in habitat.creatures() {
        println!(
            "  {:<12} {:<40} hunger {:>6.1} happiness {:>6.1} health {:>6.1}{}",
            lifecycle::display_name(&creature.id),
            creature.id.to_string(),
            creature.stats.hunger,
            creature.stats.happiness,
            creature.stats.health,
            if creature.stats.sick { " (sick)" } else { "" },
        );
    }
    println!(
        "Evolutions: {evolutions}, meals: {}, coins: {}, poops: {}, food left: {}, saved: {saved}",
        habitat.metrics().counter("meals"),
        rewards.coins(),
        rewards.poops(),
        food.len(),
    );
    if let Some(e) = &habitat.last_persistence_error {
        eprintln!("Last persistence error: {e}");
    }
    Ok(())
}
