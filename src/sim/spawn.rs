//! Spawn director
//!
//! Periodically inserts collectibles and hostiles, subject to live-count
//! caps. Entities enter at arena edges with inward velocity so they visibly
//! drift into play; rover ground placements are validated against obstacles
//! and a clearance around the vehicle. Placement that cannot be validated
//! within the allowed attempts is skipped for the cycle - spawning never
//! blocks the tick.
//!
//! Hostile pressure scales monotonically with the difficulty input: a higher
//! value raises both the live cap and the odds of the more dangerous subtype.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::collision;
use super::state::{Collectible, CollectibleKind, Crate, Effect, Hostile, HostileKind, Obstacle, RoundState};
use super::variant::Variant;
use crate::config::Difficulty;
use crate::consts::*;

/// Attempts allowed when validating a ground placement
const PLACEMENT_ATTEMPTS: u32 = 20;
/// Obstacles are inflated by this much when validating ground placements
const OBSTACLE_CLEARANCE: f32 = 40.0;
/// Minimum distance between a fresh ground spawn and the vehicle
const VEHICLE_CLEARANCE: f32 = 150.0;
/// Live crate cap once the field is running
const CRATE_RESPAWN_CAP: usize = 12;
/// Lifetime of a free energy drop (rover)
const ENERGY_DROP_TTL: u32 = 1200;

/// One spawn-director pass. Called every tick; does its work only on the
/// variant's spawn interval.
pub fn run(state: &mut RoundState) {
    let tuning = state.variant.tuning();
    if state.ticks % tuning.spawn_interval != 0 {
        return;
    }

    match state.variant {
        Variant::Drone | Variant::Sub => {
            spawn_drifting_collectible(state);
            spawn_hostile(state);
        }
        Variant::Rover => {
            spawn_hostile(state);
            respawn_crate(state);
            drop_free_energy(state);
        }
    }
}

/// Live-hostile cap for a variant at a given difficulty. Monotone in the
/// difficulty value.
pub fn hostile_cap(variant: Variant, difficulty: Difficulty) -> usize {
    let d = difficulty.value();
    match variant {
        Variant::Drone => 5 + (d / 10.0) as usize,
        Variant::Sub => 6 + (d / 25.0) as usize,
        Variant::Rover => 12 + (d / 6.0) as usize,
    }
}

/// Position on a random arena edge plus the matching inward unit axis
fn edge_entry(rng: &mut Pcg32) -> (Vec2, Vec2) {
    let off = EDGE_SPAWN_OFFSET;
    match rng.random_range(0..4) {
        0 => (
            Vec2::new(rng.random_range(0.0..ARENA_WIDTH), -off),
            Vec2::new(0.0, 1.0),
        ),
        1 => (
            Vec2::new(ARENA_WIDTH + off, rng.random_range(0.0..ARENA_HEIGHT)),
            Vec2::new(-1.0, 0.0),
        ),
        2 => (
            Vec2::new(rng.random_range(0.0..ARENA_WIDTH), ARENA_HEIGHT + off),
            Vec2::new(0.0, -1.0),
        ),
        _ => (
            Vec2::new(-off, rng.random_range(0.0..ARENA_HEIGHT)),
            Vec2::new(1.0, 0.0),
        ),
    }
}

fn spawn_drifting_collectible(state: &mut RoundState) {
    let tuning = state.variant.tuning();
    if state.collectibles.len() >= tuning.collectible_cap {
        return;
    }

    let roll: f32 = state.rng.random();
    let kind = if roll < tuning.rare_chance {
        CollectibleKind::Rare
    } else if roll < tuning.rare_chance + tuning.resource_chance {
        CollectibleKind::Resource
    } else {
        CollectibleKind::Hazard
    };

    let (pos, inward) = edge_entry(&mut state.rng);
    let (speed, lateral, radius) = match state.variant {
        Variant::Drone => {
            let radius = match kind {
                CollectibleKind::Rare => 15.0,
                CollectibleKind::Resource => 10.0,
                CollectibleKind::Hazard => 12.0,
            };
            (
                1.0 + state.rng.random::<f32>(),
                state.rng.random_range(-1.0..1.0),
                radius,
            )
        }
        _ => {
            let radius = if kind == CollectibleKind::Rare { 20.0 } else { 18.0 };
            (0.5 + state.rng.random::<f32>() * 0.5, 0.0, radius)
        }
    };
    // Lateral jitter is perpendicular to the inward axis
    let vel = inward * speed + inward.perp() * lateral;

    let value = if kind == CollectibleKind::Hazard {
        tuning.hazard_value
    } else {
        0
    };
    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        kind,
        pos,
        vel,
        radius,
        value,
        ttl: None,
    });
}

fn spawn_hostile(state: &mut RoundState) {
    if state.hostiles.len() >= hostile_cap(state.variant, state.difficulty) {
        return;
    }

    let frac = state.difficulty.fraction();
    let roll: f32 = state.rng.random();
    let (kind, radius, speed, hp) = match state.variant {
        Variant::Drone => {
            if roll < 0.4 * frac {
                (HostileKind::Seeker, 15.0, 2.0 + state.rng.random::<f32>(), 1)
            } else {
                (
                    HostileKind::Cloud,
                    30.0 + state.rng.random::<f32>() * 30.0,
                    0.5 + state.rng.random::<f32>(),
                    1,
                )
            }
        }
        Variant::Sub => {
            if roll < 0.1 + 0.2 * frac {
                (HostileKind::Shark, 45.0, 1.2, 1)
            } else if roll < 0.4 + 0.2 * frac {
                (HostileKind::Mine, 35.0, 0.2, 1)
            } else {
                (HostileKind::Fish, 30.0, 1.5, 1)
            }
        }
        Variant::Rover => {
            if roll < 0.1 + 0.1 * frac {
                (HostileKind::Gunner, 14.0, 1.8, 2)
            } else if roll < 0.4 + 0.1 * frac {
                (HostileKind::Tank, 28.0, 1.0, 6)
            } else {
                (HostileKind::Beetle, 16.0, 3.2, 2)
            }
        }
    };

    let (pos, _) = edge_entry(&mut state.rng);
    let phase = state.rng.random_range(0.0..TAU);
    let id = state.next_entity_id();
    state.hostiles.push(Hostile {
        id,
        kind,
        pos,
        radius,
        speed,
        hp,
        cooldown: 0,
        phase,
    });
}

/// Rover crates trickle back in after being smashed
fn respawn_crate(state: &mut RoundState) {
    if state.crates.len() >= CRATE_RESPAWN_CAP || state.rng.random::<f32>() < 0.5 {
        return;
    }
    let Some(pos) = free_ground_position(state, 5) else {
        log::debug!("crate respawn skipped, no clear ground");
        return;
    };
    state.add_effect(Effect::ring(pos, 20.0, 5.0));
    let id = state.next_entity_id();
    state.crates.push(Crate {
        id,
        pos,
        radius: 20.0,
        hp: 3,
    });
}

/// Occasional free energy so a starved rover can recover
fn drop_free_energy(state: &mut RoundState) {
    let tuning = state.variant.tuning();
    if state.collectibles.len() >= tuning.collectible_cap || state.rng.random::<f32>() < 0.9 {
        return;
    }
    let pos = Vec2::new(
        state.rng.random_range(50.0..ARENA_WIDTH - 50.0),
        state.rng.random_range(50.0..ARENA_HEIGHT - 50.0),
    );
    if state.obstacles.iter().any(|o| o.contains(pos)) {
        return;
    }
    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        kind: CollectibleKind::Resource,
        pos,
        vel: Vec2::ZERO,
        radius: 12.0,
        value: 0,
        ttl: Some(ENERGY_DROP_TTL),
    });
}

/// Pick a ground position clear of obstacles, crates, and the vehicle.
/// Bounded attempts; `None` means skip this cycle.
fn free_ground_position(state: &mut RoundState, attempts: u32) -> Option<Vec2> {
    for _ in 0..attempts {
        let pos = Vec2::new(
            state.rng.random_range(50.0..ARENA_WIDTH - 50.0),
            state.rng.random_range(50.0..ARENA_HEIGHT - 50.0),
        );
        let blocked = state
            .obstacles
            .iter()
            .any(|o| collision::circle_blocked_by(pos, OBSTACLE_CLEARANCE, o))
            || state
                .crates
                .iter()
                .any(|c| collision::circles_overlap(pos, 20.0, c.pos, c.radius));
        if blocked {
            continue;
        }
        if pos.distance(state.vehicle.pos) < VEHICLE_CLEARANCE {
            continue;
        }
        return Some(pos);
    }
    None
}

/// Build the rover's static field: border walls, interior blocks, starter
/// crates, and a little free energy. Runs once at round start.
pub fn generate_field(state: &mut RoundState) {
    let (w, h) = (ARENA_WIDTH, ARENA_HEIGHT);
    state.obstacles = vec![
        Obstacle::new(-50.0, 0.0, 50.0, h),
        Obstacle::new(w, 0.0, 50.0, h),
        Obstacle::new(0.0, -50.0, w, 50.0),
        Obstacle::new(0.0, h, w, 50.0),
    ];

    // Interior blocks, kept off the starting corner
    for _ in 0..8 {
        let bw = 60.0 + state.rng.random::<f32>() * 100.0;
        let bh = 60.0 + state.rng.random::<f32>() * 100.0;
        let x = 100.0 + state.rng.random::<f32>() * (w - 200.0 - bw);
        let y = 100.0 + state.rng.random::<f32>() * (h - 200.0 - bh);
        if Vec2::new(x, y).distance(state.vehicle.pos) > 200.0 {
            state.obstacles.push(Obstacle::new(x, y, bw, bh));
        }
    }

    for _ in 0..20 {
        if let Some(pos) = free_ground_position(state, PLACEMENT_ATTEMPTS) {
            let id = state.next_entity_id();
            state.crates.push(Crate {
                id,
                pos,
                radius: 20.0,
                hp: 3,
            });
        }
    }

    // Starter energy packs, free loot
    for _ in 0..5 {
        let pos = Vec2::new(
            state.rng.random_range(200.0..w - 200.0),
            state.rng.random_range(200.0..h - 200.0),
        );
        if state.obstacles.iter().any(|o| o.contains(pos)) {
            continue;
        }
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: CollectibleKind::Resource,
            pos,
            vel: Vec2::ZERO,
            radius: 12.0,
            value: 0,
            ttl: None,
        });
    }
}
