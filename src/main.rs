//! Headless round driver
//!
//! Runs rounds to completion with a small autopilot and prints the outcome
//! as JSON. Useful for balance checks without a frontend:
//!
//! ```text
//! eco-sweep [variant] [difficulty] [seed] [max-ticks]
//! eco-sweep rover 70 42
//! ```
//!
//! A loadout can be supplied as JSON in `ECO_SWEEP_LOADOUT`; anything
//! malformed falls back to stock stats.

use glam::Vec2;

use eco_sweep::sim::{CollectibleKind, RoundState};
use eco_sweep::{Difficulty, Loadout, NullAudio, Round, TickInput, Variant};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let variant = match args.get(1).map(String::as_str) {
        Some("sub") => Variant::Sub,
        Some("rover") => Variant::Rover,
        None | Some("drone") => Variant::Drone,
        Some(other) => {
            eprintln!("unknown variant '{other}' (expected drone, sub, or rover)");
            std::process::exit(2);
        }
    };
    let difficulty = Difficulty::new(
        args.get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(50.0),
    );
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(1);
    let max_ticks: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(120_000);

    let loadout = match std::env::var("ECO_SWEEP_LOADOUT") {
        Ok(json) => Loadout::from_json(&json),
        Err(_) => Loadout::default(),
    };

    let mut round = Round::new(variant, loadout, difficulty, seed, NullAudio);
    let mut ticks = 0u64;
    while !round.is_over() && ticks < max_ticks {
        let input = autopilot(round.state());
        round.tick(&input);
        ticks += 1;
    }

    match round.take_outcome() {
        Some(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
        }
        None => {
            log::warn!("round still running after {max_ticks} ticks, aborting");
            std::process::exit(1);
        }
    }
}

/// Minimal stand-in pilot: chase the nearest worthwhile pickup, keep the
/// trigger down on the rover, pulse when hostiles crowd in.
fn autopilot(state: &RoundState) -> TickInput {
    let vehicle = state.vehicle.pos;
    let target = state
        .collectibles
        .iter()
        .filter(|c| c.kind != CollectibleKind::Rare || state.tokens < 5)
        .min_by(|a, b| {
            a.pos
                .distance_squared(vehicle)
                .partial_cmp(&b.pos.distance_squared(vehicle))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|c| c.pos)
        .unwrap_or(Vec2::new(
            eco_sweep::consts::ARENA_WIDTH / 2.0,
            eco_sweep::consts::ARENA_HEIGHT / 2.0,
        ));

    let crowded = state
        .hostiles
        .iter()
        .filter(|h| h.pos.distance(vehicle) < 120.0)
        .count()
        >= 2;

    let mut input = TickInput {
        pointer: Some(target),
        ability: crowded,
        ..TickInput::default()
    };

    if state.variant == Variant::Rover {
        // Rough key steering toward the target
        input.left = target.x < vehicle.x - 10.0;
        input.right = target.x > vehicle.x + 10.0;
        input.up = target.y < vehicle.y - 10.0;
        input.down = target.y > vehicle.y + 10.0;
        // Aim at the nearest hostile and hold the trigger
        if let Some(enemy) = state.hostiles.iter().min_by(|a, b| {
            a.pos
                .distance_squared(vehicle)
                .partial_cmp(&b.pos.distance_squared(vehicle))
                .unwrap_or(std::cmp::Ordering::Equal)
        }) {
            input.pointer = Some(enemy.pos);
            input.fire = true;
        }
    }

    input
}
