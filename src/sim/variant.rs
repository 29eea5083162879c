//! The three minigame variants and their tuning tables
//!
//! One shared simulation realized three times with per-variant parameters.
//! The variant is an explicit tag supplied by the host at round start; the
//! simulation never infers it from content.

use serde::{Deserialize, Serialize};

/// Which minigame is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Aerial drone: pointer steering, EMP pulse ability
    Drone,
    /// Submersible: pointer steering, sonar ability, protected wildlife
    Sub,
    /// Ground rover: key steering, turret + projectiles, obstacles and crates
    Rover,
}

impl Variant {
    pub fn tuning(self) -> &'static Tuning {
        match self {
            Variant::Drone => &DRONE,
            Variant::Sub => &SUB,
            Variant::Rover => &ROVER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Drone => "drone",
            Variant::Sub => "sub",
            Variant::Rover => "rover",
        }
    }
}

/// Per-variant balance numbers. All rates are per tick.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Score that wins the round
    pub target_score: u32,
    /// Vehicle collision radius
    pub vehicle_radius: f32,
    /// Acceleration toward the steering target
    pub accel: f32,
    /// Velocity damping factor applied every tick (< 1)
    pub drag: f32,
    /// Speed cap per loadout speed unit
    pub speed_cap: f32,
    /// Speed cap multiplier while boosting (1.0 = variant has no boost)
    pub boost_cap_mult: f32,
    /// Energy drained per boosting tick
    pub boost_drain: f32,
    /// Ambient life-support energy drain per tick
    pub ambient_drain: f32,
    /// Ticks between spawn-director passes
    pub spawn_interval: u64,
    /// Live collectible cap
    pub collectible_cap: usize,
    /// Weighted-draw chance of a rare token collectible
    pub rare_chance: f32,
    /// Weighted-draw chance of an energy collectible
    pub resource_chance: f32,
    /// Score value of one hazard pickup
    pub hazard_value: u32,
    /// Energy restored by one energy pickup
    pub energy_refill: f32,
    /// Distance at which a collectible is consumed
    pub capture_radius: f32,
    /// Easing factor of the magnet pull inside the attraction radius
    pub magnet_ease: f32,
}

const DRONE: Tuning = Tuning {
    target_score: 500,
    vehicle_radius: 10.0,
    accel: 0.5,
    drag: 0.92,
    speed_cap: 3.0,
    boost_cap_mult: 2.0,
    boost_drain: 0.5,
    ambient_drain: 0.01,
    spawn_interval: 12,
    collectible_cap: 45,
    rare_chance: 0.01,
    resource_chance: 0.19,
    hazard_value: 25,
    energy_refill: 10.0,
    capture_radius: 15.0,
    magnet_ease: 0.15,
};

const SUB: Tuning = Tuning {
    target_score: 500,
    vehicle_radius: 15.0,
    accel: 0.2,
    drag: 0.95,
    speed_cap: 1.5,
    boost_cap_mult: 1.8,
    boost_drain: 0.4,
    ambient_drain: 0.01,
    spawn_interval: 12,
    collectible_cap: 35,
    rare_chance: 0.01,
    resource_chance: 0.14,
    hazard_value: 20,
    energy_refill: 15.0,
    capture_radius: 20.0,
    magnet_ease: 0.05,
};

// Rover collectibles come out of smashed crates; the spawn caps here only
// govern the free energy drops.
const ROVER: Tuning = Tuning {
    target_score: 600,
    vehicle_radius: 22.0,
    accel: 0.15,
    drag: 0.92,
    speed_cap: 2.8,
    boost_cap_mult: 1.0,
    boost_drain: 0.0,
    ambient_drain: 0.015,
    spawn_interval: 48,
    collectible_cap: 8,
    rare_chance: 0.0,
    resource_chance: 1.0,
    hazard_value: 50,
    energy_refill: 35.0,
    capture_radius: 25.0,
    magnet_ease: 0.1,
};
