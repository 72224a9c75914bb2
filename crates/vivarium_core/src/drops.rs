//! Periodic coin and poop drops driven by the creature's stage profile.

use crate::events::EventLog;
use crate::interaction::InteractionCommand;
use vivarium_data::{CreatureInstance, RewardKind, SpeciesConfig};

/// Adds `dt` to `timer`; true when `interval` elapsed. At most one drop per
/// call, any further overflow is discarded.
fn advance(timer: &mut f32, interval: f32, dt: f32) -> bool {
    if !interval.is_finite() || interval <= 0.0 {
        *timer = 0.0;
        return false;
    }
    *timer += dt;
    if *timer < interval {
        return false;
    }
    *timer = (*timer - interval).min(interval - f32::EPSILON).max(0.0);
    true
}

/// Advances both drop timers and queues whatever dropped.
pub fn tick(
    creature: &mut CreatureInstance,
    species: &SpeciesConfig,
    dt: f32,
    log: &mut EventLog,
    commands: &mut Vec<InteractionCommand>,
) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let profile = species.stage_profile(creature.stage());
    let mut dropped = Vec::with_capacity(2);
    if advance(&mut creature.drops.coin, profile.coin_drop_interval, dt) {
        dropped.push(RewardKind::Coin {
            value: profile.coin_value,
        });
    }
    if advance(&mut creature.drops.poop, profile.poop_drop_interval, dt) {
        dropped.push(RewardKind::Poop);
    }
    for kind in dropped {
        log.reward_dropped(&creature.id, kind, creature.position);
        commands.push(InteractionCommand::EmitReward {
            id: creature.id.clone(),
            kind,
            position: creature.position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::create_creature_with_rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use vivarium_data::{Position, Rect, StageProfile};

    fn species(coin: f32, poop: f32) -> SpeciesConfig {
        SpeciesConfig {
            stages: vec![StageProfile {
                stage: 1,
                coin_drop_interval: coin,
                coin_value: 3,
                poop_drop_interval: poop,
                ..StageProfile::default()
            }],
            ..SpeciesConfig::default()
        }
    }

    fn run(species: &SpeciesConfig, steps: usize, dt: f32) -> Vec<InteractionCommand> {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut c = create_creature_with_rng(species, Position::new(3.0, 3.0), &Rect::default(), &mut rng);
        let mut buf = Vec::new();
        let mut log = EventLog::new(0, &mut buf);
        let mut commands = Vec::new();
        for _ in 0..steps {
            tick(&mut c, species, dt, &mut log, &mut commands);
        }
        commands
    }

    #[test]
    fn test_coin_drops_on_interval() {
        let commands = run(&species(1.0, 0.0), 35, 0.1);
        assert_eq!(commands.len(), 3);
        assert!(commands.iter().all(|c| matches!(
            c,
            InteractionCommand::EmitReward {
                kind: RewardKind::Coin { value: 3 },
                ..
            }
        )));
    }

    #[test]
    fn test_zero_interval_disables() {
        assert!(run(&species(0.0, 0.0), 100, 1.0).is_empty());
    }

    #[test]
    fn test_huge_dt_drops_once() {
        let commands = run(&species(0.0, 2.0), 1, 500.0);
        assert_eq!(commands.len(), 1);
    }
}
