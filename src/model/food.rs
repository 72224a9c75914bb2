//! Food scattered around the arena.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use vivarium_core::config::FoodConfig;
use vivarium_core::{movement, ResourceLocator};
use vivarium_data::{Position, Rect, ResourceHandle};

/// Food keeps this far from the walls so creatures of every size can reach it.
pub const EDGE_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub handle: ResourceHandle,
    pub position: Position,
    pub value: f32,
}

#[derive(Debug, Default)]
struct FoodState {
    items: BTreeMap<u64, FoodItem>,
    next_handle: u64,
    spawn_timer: f32,
}

/// Shared food field. Clones point at the same food, so the habitat can own
/// one handle while a caller keeps another to drop food in.
#[derive(Debug, Clone)]
pub struct FoodField {
    config: FoodConfig,
    arena: Rect,
    state: Arc<Mutex<FoodState>>,
}

impl FoodField {
    #[must_use]
    pub fn new(config: FoodConfig, arena: Rect) -> Self {
        Self {
            config,
            arena,
            state: Arc::new(Mutex::new(FoodState::default())),
        }
    }

    /// Field pre-filled with `initial_food` items at random positions.
    pub fn scattered<R: Rng + ?Sized>(config: FoodConfig, arena: Rect, rng: &mut R) -> Self {
        let field = Self::new(config, arena);
        for _ in 0..field.config.initial_food {
            let position = movement::random_target(&field.arena, EDGE_MARGIN, rng);
            field.place(position);
        }
        field
    }

    fn lock(&self) -> MutexGuard<'_, FoodState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drops a food item at `position`, clamped to [`EDGE_MARGIN`] inside the
    /// arena. `None` when the field is full.
    pub fn place(&self, position: Position) -> Option<ResourceHandle> {
        let mut state = self.lock();
        if state.items.len() >= self.config.max_food {
            return None;
        }
        let (position, _) = movement::clamp_to_bounds(position, &self.arena, EDGE_MARGIN);
        let handle = ResourceHandle(state.next_handle);
        state.next_handle += 1;
        state.items.insert(
            handle.0,
            FoodItem {
                handle,
                position,
                value: self.config.food_value,
            },
        );
        Some(handle)
    }

    #[must_use]
    pub fn items(&self) -> Vec<FoodItem> {
        self.lock().items.values().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceLocator for FoodField {
    fn find_nearest(&self, position: Position, radius: f64) -> Option<ResourceHandle> {
        let state = self.lock();
        let radius_sq = radius * radius;
        let mut best: Option<(f64, ResourceHandle)> = None;
        // BTreeMap order makes ties resolve to the oldest item.
        for item in state.items.values() {
            let d = item.position.distance_sq(&position);
            if d > radius_sq {
                continue;
            }
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, item.handle));
            }
        }
        best.map(|(_, handle)| handle)
    }

    fn position(&self, handle: ResourceHandle) -> Option<Position> {
        self.lock().items.get(&handle.0).map(|i| i.position)
    }

    fn food_value(&self, handle: ResourceHandle) -> Option<f32> {
        self.lock().items.get(&handle.0).map(|i| i.value)
    }

    fn consume(&mut self, handle: ResourceHandle) -> bool {
        self.lock().items.remove(&handle.0).is_some()
    }

    fn replenish(&mut self, dt: f32, rng: &mut dyn RngCore) {
        let interval = self.config.spawn_interval;
        if interval <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let due = {
            let mut state = self.lock();
            state.spawn_timer += dt;
            let mut due = 0usize;
            while state.spawn_timer >= interval {
                state.spawn_timer -= interval;
                due += 1;
            }
            due
        };
        for _ in 0..due {
            let position = movement::random_target(&self.arena, EDGE_MARGIN, rng);
            if self.place(position).is_none() {
                break;
            }
        }
    }

    fn available(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> FoodConfig {
        FoodConfig {
            initial_food: 0,
            max_food: 3,
            spawn_interval: 1.0,
            food_value: 10.0,
        }
    }

    #[test]
    fn test_nearest_within_radius() {
        let field = FoodField::new(config(), Rect::default());
        let far = field.place(Position::new(50.0, 50.0)).unwrap();
        let near = field.place(Position::new(12.0, 10.0)).unwrap();
        assert_eq!(field.find_nearest(Position::new(10.0, 10.0), 5.0), Some(near));
        assert_eq!(field.find_nearest(Position::new(48.0, 50.0), 5.0), Some(far));
        assert_eq!(field.find_nearest(Position::new(80.0, 10.0), 5.0), None);
    }

    #[test]
    fn test_consume_is_once() {
        let mut field = FoodField::new(config(), Rect::default());
        let handle = field.place(Position::new(1.0, 1.0)).unwrap();
        assert_eq!(field.food_value(handle), Some(10.0));
        assert!(field.consume(handle));
        assert!(!field.consume(handle));
        assert_eq!(field.position(handle), None);
    }

    #[test]
    fn test_replenish_respects_max() {
        let mut field = FoodField::new(config(), Rect::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        field.replenish(10.0, &mut rng);
        assert_eq!(field.len(), 3);
        assert!(field.place(Position::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_clones_share_food() {
        let field = FoodField::new(config(), Rect::default());
        let mut other = field.clone();
        let handle = field.place(Position::new(5.0, 5.0)).unwrap();
        assert!(other.consume(handle));
        assert!(field.is_empty());
    }
}
