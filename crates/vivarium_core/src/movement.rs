//! Steering, separation and arena bounds.

use crate::stats;
use rand::Rng;
use std::f64::consts::TAU;
use vivarium_data::{CreatureId, CreatureInstance, Position, Rect, SpeciesConfig, Velocity};

/// Repulsion from peers closer than `radius`, averaged over contributing peers.
///
/// Peers at exactly the same position are ignored; use
/// [`compute_separation_with_overlap`] to push those apart.
pub fn compute_separation(
    self_pos: Position,
    peers: impl IntoIterator<Item = Position>,
    radius: f64,
    strength: f64,
) -> Velocity {
    separation_inner(self_pos, peers, radius, strength, None)
}

/// Like [`compute_separation`], but a coincident peer pushes along
/// `overlap_angle` (radians) at full strength.
pub fn compute_separation_with_overlap(
    self_pos: Position,
    peers: impl IntoIterator<Item = Position>,
    radius: f64,
    strength: f64,
    overlap_angle: f64,
) -> Velocity {
    separation_inner(self_pos, peers, radius, strength, Some(overlap_angle))
}

fn separation_inner(
    self_pos: Position,
    peers: impl IntoIterator<Item = Position>,
    radius: f64,
    strength: f64,
    overlap_angle: Option<f64>,
) -> Velocity {
    if radius.is_nan() || radius <= 0.0 || !strength.is_finite() || !self_pos.is_finite() {
        return Velocity::ZERO;
    }
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0u32;
    for peer in peers {
        if !peer.is_finite() {
            continue;
        }
        let dx = self_pos.x - peer.x;
        let dy = self_pos.y - peer.y;
        let d = (dx * dx + dy * dy).sqrt();
        if d >= radius {
            continue;
        }
        if d == 0.0 {
            if let Some(angle) = overlap_angle {
                sum_x += angle.cos() * strength;
                sum_y += angle.sin() * strength;
                count += 1;
            }
            continue;
        }
        let scale = (radius - d) / radius * strength;
        sum_x += dx / d * scale;
        sum_y += dy / d * scale;
        count += 1;
    }
    if count == 0 {
        return Velocity::ZERO;
    }
    Velocity {
        vx: sum_x / f64::from(count),
        vy: sum_y / f64::from(count),
    }
}

/// Push direction for a creature sitting exactly on top of another.
#[must_use]
pub fn overlap_angle(id: &CreatureId) -> f64 {
    let bytes = id.instance.as_bytes();
    let mixed = bytes[0] ^ bytes[15];
    f64::from(mixed) / 256.0 * TAU
}

/// Moves toward `target` by at most `speed * dt`, never past it.
#[must_use]
pub fn step_towards(current: Position, target: Position, speed: f64, dt: f64) -> Position {
    let step = speed * dt;
    if !step.is_finite() || step <= 0.0 || !target.is_finite() {
        return current;
    }
    let d = current.distance(&target);
    if d <= step {
        return target;
    }
    Position {
        x: current.x + (target.x - current.x) / d * step,
        y: current.y + (target.y - current.y) / d * step,
    }
}

/// Clamps into the arena shrunk by `half_extent`. The flag is true when the
/// position had to be corrected.
#[must_use]
pub fn clamp_to_bounds(position: Position, arena: &Rect, half_extent: f64) -> (Position, bool) {
    let inner = arena.deflate(half_extent);
    if position.is_finite() && inner.contains(&position) {
        return (position, false);
    }
    (inner.clamp(&position), true)
}

/// Uniform point inside the arena shrunk by `half_extent`.
pub fn random_target<R: Rng + ?Sized>(arena: &Rect, half_extent: f64, rng: &mut R) -> Position {
    let inner = arena.deflate(half_extent);
    let x = if inner.max_x > inner.min_x {
        rng.gen_range(inner.min_x..=inner.max_x)
    } else {
        inner.min_x
    };
    let y = if inner.max_y > inner.min_y {
        rng.gen_range(inner.min_y..=inner.max_y)
    } else {
        inner.min_y
    };
    Position { x, y }
}

/// Current speed in units per second. Zero outside locomotion states.
#[must_use]
pub fn locomotion_speed(creature: &CreatureInstance, species: &SpeciesConfig) -> f64 {
    let multiplier = species.behavior.speed_multiplier(creature.state());
    let speed = species.base_speed * multiplier * stats::speed_factor(creature, species);
    if speed.is_finite() {
        f64::from(speed.max(0.0))
    } else {
        0.0
    }
}
