//! Tick metrics and structured logging setup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Running counters for a habitat.
pub struct Metrics {
    tick_count: AtomicU64,
    creature_count: AtomicU64,
    food_count: AtomicU64,
    counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            creature_count: AtomicU64::new(0),
            food_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick. Logs a summary every 1000 ticks.
    pub fn record_tick(&self, duration: Duration, creatures: usize, food: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.creature_count.store(creatures as u64, Ordering::Relaxed);
        self.food_count.store(food as u64, Ordering::Relaxed);

        if tick % 1000 == 0 {
            tracing::info!(
                tick,
                creatures,
                food,
                duration_us = duration.as_micros() as u64,
                "Habitat tick"
            );
        }
    }

    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn creature_count(&self) -> u64 {
        self.creature_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn food_count(&self) -> u64 {
        self.food_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs a global fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
/// Safe to call more than once.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_millis(16), 4, 9);
        assert_eq!(metrics.tick_count(), 1);
        assert_eq!(metrics.creature_count(), 4);
        assert_eq!(metrics.food_count(), 9);
    }

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.increment_counter("pokes");
        metrics.increment_counter("pokes");
        assert_eq!(metrics.counter("pokes"), 2);
        assert_eq!(metrics.counter("evolutions"), 0);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
    }
}
