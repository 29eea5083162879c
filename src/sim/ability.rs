//! Gated special actions
//!
//! One ability per variant, unlocked by the loadout (`ability_radius > 0`)
//! and paid for in energy. The pulse is edge-triggered so holding the key
//! cannot chain discharges; the sonar bleeds energy continuously while held.

use rand::Rng;

use super::collision;
use super::state::{Effect, Notice, RoundState};
use super::variant::Variant;
use crate::audio::{AudioEvent, AudioSink};

/// Energy cost of one pulse discharge. Activation below this is refused.
pub const PULSE_COST: f32 = 30.0;
/// Score awarded per hostile destroyed by the pulse
pub const PULSE_KILL_BONUS: u32 = 50;
/// Sonar repels predators inside this radius
pub const SONAR_REPEL_RADIUS: f32 = 250.0;
/// Attraction-radius multiplier while the sonar is active
pub const SONAR_RANGE_MULT: f32 = 3.0;
/// Probability per held tick that the sonar bleeds one energy
const SONAR_BLEED_CHANCE: f32 = 0.05;
/// Per-tick fire probability of the rover trigger, stock vs rapid-fire
pub const FIRE_CHANCE_BASE: f32 = 0.06;
pub const FIRE_CHANCE_RAPID: f32 = 0.20;

/// One ability pass. `held` is the raw trigger state this tick.
pub fn run(state: &mut RoundState, held: bool, audio: &mut dyn AudioSink) {
    match state.variant {
        Variant::Drone => pulse(state, held, audio),
        Variant::Sub => sonar(state, held, audio),
        // The rover's rapid-fire upgrade is applied where shots are rolled;
        // there is nothing to do per tick.
        Variant::Rover => state.sonar_active = false,
    }
    state.ability_held = held;
}

/// Effective per-tick fire probability for the rover trigger
pub fn fire_chance(state: &RoundState) -> f32 {
    if state.loadout.has_ability() {
        FIRE_CHANCE_RAPID
    } else {
        FIRE_CHANCE_BASE
    }
}

/// Area-denial discharge: destroys every hostile in range, bonus score per
/// kill. Requires a fresh press and enough energy; refusal mutates nothing
/// but the low-energy notice.
fn pulse(state: &mut RoundState, held: bool, audio: &mut dyn AudioSink) {
    if !held || state.ability_held || !state.loadout.has_ability() {
        return;
    }
    if state.vehicle.energy <= PULSE_COST {
        state.push_notice(Notice::LowEnergy);
        return;
    }

    state.vehicle.energy -= PULSE_COST;
    state.push_notice(Notice::AbilityFired);
    audio.play(AudioEvent::AbilityFire);
    let center = state.vehicle.pos;
    state.add_effect(Effect::ring(center, 10.0, 10.0));

    for i in (0..state.hostiles.len()).rev() {
        if collision::circles_overlap(center, state.loadout.ability_radius, state.hostiles[i].pos, 0.0)
        {
            let downed = state.hostiles.remove(i);
            state.score += PULSE_KILL_BONUS;
            state.add_effect(Effect::ring(downed.pos, downed.radius, 8.0));
            audio.play(AudioEvent::Explosion);
        }
    }
}

/// Attraction-range burst: while held, widens the collectible magnet and
/// repels predators, bleeding energy a point at a time.
fn sonar(state: &mut RoundState, held: bool, audio: &mut dyn AudioSink) {
    let active = held && state.loadout.has_ability() && state.vehicle.energy > 0.0;
    if active && !state.sonar_active {
        audio.play(AudioEvent::AbilityFire);
    }
    state.sonar_active = active;
    if !active {
        return;
    }

    if state.rng.random::<f32>() < 0.1 {
        let pos = state.vehicle.pos;
        state.add_effect(Effect::ring(pos, 20.0, 5.0));
    }
    if state.rng.random::<f32>() < SONAR_BLEED_CHANCE {
        state.vehicle.energy -= 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::state::{Hostile, HostileKind, Phase};
    use crate::audio::NullAudio;
    use crate::config::{Difficulty, Loadout};
    use glam::Vec2;

    fn unlocked_loadout() -> Loadout {
        Loadout {
            ability_radius: 150.0,
            ..Loadout::default()
        }
    }

    fn add_hostile_at(state: &mut RoundState, kind: HostileKind, pos: Vec2) {
        let id = state.next_entity_id();
        state.hostiles.push(Hostile {
            id,
            kind,
            pos,
            radius: 15.0,
            speed: 1.0,
            hp: 1,
            cooldown: 0,
            phase: 0.0,
        });
    }

    #[test]
    fn pulse_clears_hostiles_in_range_and_scores() {
        let mut state = RoundState::new(
            Variant::Drone,
            unlocked_loadout(),
            Difficulty::new(50.0),
            1,
        );
        let center = state.vehicle.pos;
        add_hostile_at(&mut state, HostileKind::Seeker, center + Vec2::new(50.0, 0.0));
        add_hostile_at(&mut state, HostileKind::Cloud, center + Vec2::new(400.0, 0.0));

        run(&mut state, true, &mut NullAudio);

        assert_eq!(state.hostiles.len(), 1, "only the far hostile survives");
        assert_eq!(state.score, PULSE_KILL_BONUS);
        assert_eq!(state.vehicle.energy, 100.0 - PULSE_COST);
    }

    #[test]
    fn pulse_refused_below_cost_mutates_nothing() {
        let mut state = RoundState::new(
            Variant::Drone,
            unlocked_loadout(),
            Difficulty::new(50.0),
            1,
        );
        state.vehicle.energy = PULSE_COST - 5.0;
        let center = state.vehicle.pos;
        add_hostile_at(&mut state, HostileKind::Seeker, center);

        run(&mut state, true, &mut NullAudio);

        assert_eq!(state.vehicle.energy, PULSE_COST - 5.0);
        assert_eq!(state.hostiles.len(), 1);
        assert_eq!(state.score, 0);
        assert!(state.notices.contains(&Notice::LowEnergy));
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn pulse_requires_a_fresh_press() {
        let mut state = RoundState::new(
            Variant::Drone,
            unlocked_loadout(),
            Difficulty::new(50.0),
            1,
        );
        run(&mut state, true, &mut NullAudio);
        let after_first = state.vehicle.energy;
        // Held across the next tick: no second discharge
        run(&mut state, true, &mut NullAudio);
        assert_eq!(state.vehicle.energy, after_first);
        // Released, then pressed again: discharges
        run(&mut state, false, &mut NullAudio);
        run(&mut state, true, &mut NullAudio);
        assert_eq!(state.vehicle.energy, after_first - PULSE_COST);
    }

    #[test]
    fn locked_loadout_cannot_activate() {
        let mut state = RoundState::new(
            Variant::Drone,
            Loadout::default(),
            Difficulty::new(50.0),
            1,
        );
        run(&mut state, true, &mut NullAudio);
        assert_eq!(state.vehicle.energy, 100.0);
    }

    #[test]
    fn sonar_is_hold_based_and_bleeds() {
        let mut state = RoundState::new(
            Variant::Sub,
            unlocked_loadout(),
            Difficulty::new(50.0),
            1,
        );
        for _ in 0..400 {
            run(&mut state, true, &mut NullAudio);
            assert!(state.sonar_active);
        }
        assert!(state.vehicle.energy < 100.0, "holding sonar costs energy");

        run(&mut state, false, &mut NullAudio);
        assert!(!state.sonar_active);
    }

    #[test]
    fn rover_fire_chance_tracks_unlock() {
        let stock = RoundState::new(
            Variant::Rover,
            Loadout::default(),
            Difficulty::new(50.0),
            1,
        );
        let upgraded = RoundState::new(
            Variant::Rover,
            unlocked_loadout(),
            Difficulty::new(50.0),
            1,
        );
        assert_eq!(fire_chance(&stock), FIRE_CHANCE_BASE);
        assert_eq!(fire_chance(&upgraded), FIRE_CHANCE_RAPID);
    }
}
