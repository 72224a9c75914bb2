//! Reward sink that keeps a running tally.

use std::sync::{Arc, Mutex, MutexGuard};
use vivarium_core::RewardSink;
use vivarium_data::{Position, RewardKind};

#[derive(Debug, Default)]
struct LedgerState {
    coins: u64,
    poops: u64,
    drops: Vec<(RewardKind, Position)>,
}

/// Shared tally of every reward emitted. Clones see the same totals.
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl RewardLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Total coin value received.
    #[must_use]
    pub fn coins(&self) -> u64 {
        self.lock().coins
    }

    #[must_use]
    pub fn poops(&self) -> u64 {
        self.lock().poops
    }

    /// Every reward in emission order.
    #[must_use]
    pub fn drops(&self) -> Vec<(RewardKind, Position)> {
        self.lock().drops.clone()
    }
}

impl RewardSink for RewardLedger {
    fn emit(&mut self, kind: &RewardKind, position: Position) {
        let mut state = self.lock();
        match kind {
            RewardKind::Coin { value } => state.coins += u64::from(*value),
            RewardKind::Poop => state.poops += 1,
        }
        state.drops.push((*kind, position));
    }
}
