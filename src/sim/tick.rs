//! Fixed-cadence simulation tick
//!
//! Advances one round by one step in a fixed order: terminal check, vehicle
//! control, spawning, entity advance + collision resolution, ability, ambient
//! drain, outcome, cosmetic decay. The input snapshot is read-only for the
//! whole tick, and nothing is evaluated after the outcome turns terminal.

use glam::Vec2;
use rand::Rng;

use super::ability;
use super::collision;
use super::spawn;
use super::state::{
    Collectible, CollectibleKind, Effect, HostileKind, Notice, Phase, Projectile, ProjectileOwner,
    RoundState,
};
use super::variant::Variant;
use crate::audio::{AudioEvent, AudioSink};
use crate::consts::*;
use crate::normalize_angle;

/// Rover body-turn easing per tick
const ROVER_TURN_EASE: f32 = 0.05;
/// Velocity kept (inverted) on a blocked rover axis
const ROVER_BOUNCE: f32 = -0.2;
/// Recoil impulse per rover shot
const ROVER_RECOIL: f32 = 0.4;
/// Score deducted for ramming protected wildlife
const WILDLIFE_PENALTY: u32 = 50;
/// Projectile lifetime in ticks
const PROJECTILE_LIFE: u32 = 60;
/// Health damage of one hostile shot against the vehicle
const ENEMY_SHOT_DAMAGE: f32 = 8.0;

/// Input snapshot for one tick. Event handlers fill it between ticks; the
/// simulation only reads it.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer target in arena coordinates: steering for drone/sub, turret
    /// aim for the rover
    pub pointer: Option<Vec2>,
    /// Directional keys (rover)
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Boost modifier held
    pub boost: bool,
    /// Ability trigger held
    pub ability: bool,
    /// Weapon trigger held (rover)
    pub fire: bool,
}

/// Advance the round by one fixed step
pub fn tick(state: &mut RoundState, input: &TickInput, audio: &mut dyn AudioSink) {
    // Terminal states are absorbing; no gameplay runs after the round ends.
    if state.phase != Phase::Playing {
        return;
    }

    state.ticks += 1;
    state.notices.clear();

    steer_vehicle(state, input, audio);
    spawn::run(state);
    advance_hostiles(state, audio);
    advance_collectibles(state, audio);
    fire_weapon(state, input, audio);
    advance_projectiles(state, audio);
    ability::run(state, input.ability, audio);

    // Ambient life-support drain, paid every playing tick
    state.vehicle.energy -= state.variant.tuning().ambient_drain;

    evaluate_outcome(state, audio);
    decay_cosmetics(state);
}

// ---------------------------------------------------------------------------
// Vehicle controller

fn steer_vehicle(state: &mut RoundState, input: &TickInput, audio: &mut dyn AudioSink) {
    match state.variant {
        Variant::Drone | Variant::Sub => steer_pointer_vehicle(state, input, audio),
        Variant::Rover => steer_rover(state, input),
    }
}

/// Accelerate toward the pointer with exponential drag; boost raises the
/// speed cap while draining energy, and is refused when energy runs short.
fn steer_pointer_vehicle(state: &mut RoundState, input: &TickInput, audio: &mut dyn AudioSink) {
    let tuning = state.variant.tuning();
    let target = input.pointer.unwrap_or(state.vehicle.pos);
    let to_target = target - state.vehicle.pos;
    let dist = to_target.length();

    let mut cap = tuning.speed_cap * state.loadout.speed;
    if input.boost {
        if state.vehicle.energy > tuning.boost_drain {
            cap *= tuning.boost_cap_mult;
            state.vehicle.energy -= tuning.boost_drain;
            if state.rng.random::<f32>() < 0.2 {
                audio.play(AudioEvent::Boost);
            }
        } else {
            state.push_notice(Notice::LowEnergy);
        }
    }

    // Dead zone around the pointer so the vehicle settles instead of orbiting
    if dist > 5.0 {
        state.vehicle.vel += to_target / dist * tuning.accel;
    }
    state.vehicle.vel *= tuning.drag;
    let speed = state.vehicle.vel.length();
    if speed > cap {
        state.vehicle.vel *= cap / speed;
    }
    state.vehicle.pos += state.vehicle.vel;

    if dist > f32::EPSILON {
        state.vehicle.facing = to_target.y.atan2(to_target.x);
        state.vehicle.body_angle = state.vehicle.facing;
    }

    state.vehicle.pos = state.vehicle.pos.clamp(
        Vec2::splat(WALL_MARGIN),
        Vec2::new(ARENA_WIDTH - WALL_MARGIN, ARENA_HEIGHT - WALL_MARGIN),
    );
}

/// Key-steered rover: heavy acceleration, smoothed body rotation, instant
/// turret aim, and axis-separated blocking against obstacles and crates.
fn steer_rover(state: &mut RoundState, input: &TickInput) {
    let tuning = state.variant.tuning();

    let mut axis = Vec2::ZERO;
    if input.up {
        axis.y -= 1.0;
    }
    if input.down {
        axis.y += 1.0;
    }
    if input.left {
        axis.x -= 1.0;
    }
    if input.right {
        axis.x += 1.0;
    }

    if axis != Vec2::ZERO {
        let dir = axis.normalize();
        state.vehicle.vel += dir * tuning.accel;
        // Body eases toward the travel direction, never snaps
        let target = dir.y.atan2(dir.x);
        let diff = normalize_angle(target - state.vehicle.body_angle);
        state.vehicle.body_angle = normalize_angle(state.vehicle.body_angle + diff * ROVER_TURN_EASE);
    }

    state.vehicle.vel *= tuning.drag;
    let cap = tuning.speed_cap * state.loadout.speed.max(1.0);
    let speed = state.vehicle.vel.length();
    if speed > cap {
        state.vehicle.vel *= cap / speed;
    }

    if let Some(aim) = input.pointer {
        let to_aim = aim - state.vehicle.pos;
        if to_aim.length_squared() > f32::EPSILON {
            state.vehicle.facing = to_aim.y.atan2(to_aim.x);
        }
    }

    // X and Y moves attempted independently; a blocked axis cancels the move
    // and inverts that axis's velocity.
    let r = state.vehicle.radius;
    let try_x = Vec2::new(
        state.vehicle.pos.x + state.vehicle.vel.x,
        state.vehicle.pos.y,
    );
    if !collision::position_blocked(try_x, r, &state.obstacles, &state.crates) {
        state.vehicle.pos.x = try_x.x;
    } else {
        state.vehicle.vel.x *= ROVER_BOUNCE;
        state.add_shake(1.0);
    }
    let try_y = Vec2::new(
        state.vehicle.pos.x,
        state.vehicle.pos.y + state.vehicle.vel.y,
    );
    if !collision::position_blocked(try_y, r, &state.obstacles, &state.crates) {
        state.vehicle.pos.y = try_y.y;
    } else {
        state.vehicle.vel.y *= ROVER_BOUNCE;
        state.add_shake(1.0);
    }
}

// ---------------------------------------------------------------------------
// Hostiles

fn advance_hostiles(state: &mut RoundState, audio: &mut dyn AudioSink) {
    let t = state.ticks as f32;

    for i in (0..state.hostiles.len()).rev() {
        let (kind, pos, radius, speed, phase) = {
            let h = &state.hostiles[i];
            (h.kind, h.pos, h.radius, h.speed, h.phase)
        };
        let to_vehicle = state.vehicle.pos - pos;
        let dist = to_vehicle.length();

        // Behavior-mode movement
        let mut next = pos;
        match kind {
            HostileKind::Cloud => {
                next.x += (t * 0.017 + phase).sin() * 0.5;
                next.y += speed;
            }
            HostileKind::Seeker => {
                if dist > 0.0 {
                    next += to_vehicle / dist * speed;
                }
            }
            HostileKind::Fish => {
                next.x += speed * if pos.x < ARENA_WIDTH / 2.0 { 1.0 } else { -1.0 };
                next.y += (t * 0.083 + phase).sin() * 0.5;
            }
            HostileKind::Mine => {
                next.y += (t * 0.033 + phase).sin() * 0.2;
            }
            HostileKind::Shark => {
                if dist > 1.0 {
                    let dir = to_vehicle / dist;
                    if state.sonar_active && dist < ability::SONAR_REPEL_RADIUS {
                        next -= dir * speed * 1.5;
                    } else {
                        next += dir * speed;
                    }
                }
            }
            HostileKind::Beetle | HostileKind::Tank => {
                if dist > 0.0 {
                    let mut step = to_vehicle / dist * speed;
                    // Separation so the pack does not stack into one blob
                    for (j, other) in state.hostiles.iter().enumerate() {
                        if j == i || !other.kind.is_ground() {
                            continue;
                        }
                        if pos.distance(other.pos) < radius * 2.0 {
                            step -= (other.pos - pos) * 0.05;
                        }
                    }
                    // Ground units obey the same axis-separated blocking as
                    // the vehicle
                    let try_x = Vec2::new(pos.x + step.x, pos.y);
                    if !state
                        .obstacles
                        .iter()
                        .any(|o| collision::circle_blocked_by(try_x, radius, o))
                    {
                        next.x = try_x.x;
                    }
                    let try_y = Vec2::new(next.x, pos.y + step.y);
                    if !state
                        .obstacles
                        .iter()
                        .any(|o| collision::circle_blocked_by(try_y, radius, o))
                    {
                        next.y = try_y.y;
                    }
                }
            }
            HostileKind::Gunner => {
                if dist > 0.0 {
                    next += to_vehicle / dist * speed;
                }
                // Hover sway
                next.x += (t * 0.083 + phase).sin() * 0.5;
                next.y += (t * 0.083 + phase).cos() * 0.5;
            }
        }
        state.hostiles[i].pos = next;

        if RoundState::out_of_bounds(next) {
            state.hostiles.remove(i);
            continue;
        }

        if kind.is_armed() {
            hostile_gunnery(state, i, dist, to_vehicle, audio);
        }

        let contact_dist = state.vehicle.pos.distance(state.hostiles[i].pos);
        if contact_dist < radius + state.vehicle.radius {
            resolve_hostile_contact(state, i, audio);
        }
    }
}

/// Cooldown-gated cannon fire from tanks and gunners
fn hostile_gunnery(
    state: &mut RoundState,
    i: usize,
    dist: f32,
    to_vehicle: Vec2,
    audio: &mut dyn AudioSink,
) {
    let cd = state.hostiles[i].cooldown;
    if cd > 0 {
        state.hostiles[i].cooldown = cd - 1;
        return;
    }
    let (range, rate) = if state.hostiles[i].kind == HostileKind::Gunner {
        (200.0, 80)
    } else {
        (300.0, 100)
    };
    if dist >= range || dist <= 0.0 {
        return;
    }
    state.hostiles[i].cooldown = rate + state.rng.random_range(0..20);
    let dir = to_vehicle / dist;
    let origin = state.hostiles[i].pos + dir * 20.0;
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        owner: ProjectileOwner::Hostile,
        pos: origin,
        vel: dir * 5.0,
        life: PROJECTILE_LIFE,
        damage: ENEMY_SHOT_DAMAGE,
    });
    audio.play(AudioEvent::Shot);
}

/// Contact between the vehicle and the hostile at index `i`
fn resolve_hostile_contact(state: &mut RoundState, i: usize, audio: &mut dyn AudioSink) {
    let kind = state.hostiles[i].kind;
    let hpos = state.hostiles[i].pos;
    let vpos = state.vehicle.pos;

    // Protected wildlife: careless play costs score, not health, and the
    // animal is shoved clear instead of removed.
    if kind == HostileKind::Fish {
        state.score = state.score.saturating_sub(WILDLIFE_PENALTY);
        state.push_notice(Notice::WildlifeWarning);
        audio.play(AudioEvent::Damage);
        state.hostiles[i].pos += (hpos - vpos) * 5.0;
        return;
    }

    state.vehicle.health -= kind.contact_damage();
    audio.play(AudioEvent::Damage);
    state.add_shake(5.0);

    let impulse = match state.variant {
        Variant::Drone => collision::knockback(vpos, hpos, 10.0),
        Variant::Sub => collision::knockback(vpos, hpos, 15.0),
        Variant::Rover => (vpos - hpos) * 0.1,
    };
    state.vehicle.vel += impulse;

    if kind.dies_on_contact() {
        let downed = state.hostiles.remove(i);
        state.add_effect(Effect::ring(downed.pos, 10.0, 8.0));
        audio.play(AudioEvent::Explosion);
        return;
    }

    // Durable hostiles bounce clear so they cannot saw through the hull
    let bounce = match kind {
        HostileKind::Shark => 50.0,
        HostileKind::Gunner => 20.0,
        HostileKind::Beetle | HostileKind::Tank => 10.0,
        _ => 0.0,
    };
    if bounce > 0.0 {
        state.hostiles[i].pos += collision::knockback(hpos, vpos, bounce);
    }
    if kind == HostileKind::Shark {
        state.push_notice(Notice::PredatorBite);
        state.add_effect(Effect::ring((vpos + hpos) * 0.5, 10.0, 5.0));
    }
}

// ---------------------------------------------------------------------------
// Collectibles

/// Attraction radius for the current tick
fn attraction_radius(state: &RoundState) -> f32 {
    match state.variant {
        Variant::Drone => state.loadout.collection_radius,
        Variant::Sub => {
            let mult = if state.sonar_active {
                ability::SONAR_RANGE_MULT
            } else {
                1.0
            };
            state.loadout.collection_radius * mult
        }
        // Ground pickup reach; an upgraded loadout widens it
        Variant::Rover => {
            60.0 * if state.loadout.collection_radius > 50.0 {
                1.5
            } else {
                1.0
            }
        }
    }
}

fn advance_collectibles(state: &mut RoundState, audio: &mut dyn AudioSink) {
    let tuning = state.variant.tuning();
    let attraction = attraction_radius(state);
    let ease = if state.variant == Variant::Sub && state.sonar_active {
        0.1
    } else {
        tuning.magnet_ease
    };

    for i in (0..state.collectibles.len()).rev() {
        let vel = state.collectibles[i].vel;
        state.collectibles[i].pos += vel;
        let pos = state.collectibles[i].pos;

        if RoundState::out_of_bounds(pos) {
            state.collectibles.remove(i);
            continue;
        }

        let dist = state.vehicle.pos.distance(pos);
        if dist < attraction {
            // Magnet pull eases the pickup toward the vehicle
            let to_vehicle = state.vehicle.pos - pos;
            state.collectibles[i].pos += to_vehicle * ease;

            if dist < tuning.capture_radius {
                let captured = state.collectibles.remove(i);
                capture(state, &captured, audio);
                continue;
            }
        }

        if let Some(ttl) = state.collectibles[i].ttl {
            if ttl <= 1 {
                state.collectibles.remove(i);
            } else {
                state.collectibles[i].ttl = Some(ttl - 1);
            }
        }
    }
}

/// Apply exactly one reward for a captured collectible
fn capture(state: &mut RoundState, captured: &Collectible, audio: &mut dyn AudioSink) {
    let tuning = state.variant.tuning();
    match captured.kind {
        CollectibleKind::Hazard => {
            state.score += captured.value;
            audio.play(AudioEvent::Collect);
        }
        CollectibleKind::Resource => {
            state.vehicle.energy =
                (state.vehicle.energy + tuning.energy_refill).min(state.loadout.max_energy);
            state.push_notice(Notice::EnergyRecharged);
            audio.play(AudioEvent::EnergyPickup);
        }
        CollectibleKind::Rare => {
            state.tokens += 1;
            state.push_notice(Notice::TokenFound);
            audio.play(AudioEvent::TokenPickup);
        }
    }
}

// ---------------------------------------------------------------------------
// Projectiles (rover)

/// Roll the rover trigger. Fire probability is per tick, raised by the
/// rapid-fire unlock.
fn fire_weapon(state: &mut RoundState, input: &TickInput, audio: &mut dyn AudioSink) {
    if state.variant != Variant::Rover || !input.fire {
        return;
    }
    if state.rng.random::<f32>() >= ability::fire_chance(state) {
        return;
    }

    audio.play(AudioEvent::Shot);
    state.add_shake(3.0);
    let dir = Vec2::new(state.vehicle.facing.cos(), state.vehicle.facing.sin());
    state.vehicle.vel -= dir * ROVER_RECOIL;

    let origin = state.vehicle.pos + dir * 30.0;
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        owner: ProjectileOwner::Player,
        pos: origin,
        vel: dir * 12.0,
        life: PROJECTILE_LIFE,
        damage: 0.0,
    });
    state.add_effect(Effect::flash(state.vehicle.pos + dir * 40.0, 15.0));
}

/// Advance every projectile and resolve its first hit in fixed priority
/// order: wall, opposing vehicle, crate, opposing entity. One hit per tick.
fn advance_projectiles(state: &mut RoundState, audio: &mut dyn AudioSink) {
    for i in (0..state.projectiles.len()).rev() {
        let vel = state.projectiles[i].vel;
        state.projectiles[i].pos += vel;
        state.projectiles[i].life = state.projectiles[i].life.saturating_sub(1);

        let (owner, pos, damage) = {
            let p = &state.projectiles[i];
            (p.owner, p.pos, p.damage)
        };
        let mut hit = false;

        // Walls block everything
        if state.obstacles.iter().any(|o| o.contains(pos)) {
            hit = true;
        }

        // Hostile shots against the vehicle
        if !hit
            && owner == ProjectileOwner::Hostile
            && pos.distance(state.vehicle.pos) < state.vehicle.radius
        {
            state.vehicle.health -= damage;
            state.add_shake(4.0);
            state.add_effect(Effect::ring(pos, 10.0, 3.0));
            audio.play(AudioEvent::Damage);
            hit = true;
        }

        // Crates soak shots from either side
        if !hit {
            for c in (0..state.crates.len()).rev() {
                if pos.distance(state.crates[c].pos) < state.crates[c].radius + 5.0 {
                    hit = true;
                    state.crates[c].hp -= 1;
                    if state.crates[c].hp == 0 {
                        let smashed = state.crates.remove(c);
                        state.crates_destroyed += 1;
                        state.add_effect(Effect::ring(smashed.pos, smashed.radius, 6.0));
                        audio.play(AudioEvent::Explosion);
                        drop_crate_loot(state, smashed.pos);
                    } else {
                        let cpos = state.crates[c].pos;
                        let cradius = state.crates[c].radius;
                        state.add_effect(Effect::flash(cpos, cradius));
                        audio.play(AudioEvent::Damage);
                    }
                    break;
                }
            }
        }

        // Player shots against hostiles
        if !hit && owner == ProjectileOwner::Player {
            for h in (0..state.hostiles.len()).rev() {
                // Slightly generous hitbox
                if pos.distance(state.hostiles[h].pos) < state.hostiles[h].radius + 10.0 {
                    hit = true;
                    state.hostiles[h].hp -= 1;
                    if state.hostiles[h].hp == 0 {
                        let downed = state.hostiles.remove(h);
                        state.enemies_defeated += 1;
                        state.score += downed.kind.kill_score();
                        state.add_effect(Effect::ring(downed.pos, downed.radius, 4.0));
                        audio.play(AudioEvent::Explosion);
                    } else {
                        let hpos = state.hostiles[h].pos;
                        let hradius = state.hostiles[h].radius;
                        state.add_effect(Effect::flash(hpos, hradius));
                    }
                    break;
                }
            }
        }

        if hit || state.projectiles[i].life == 0 {
            if hit {
                state.add_effect(Effect::flash(pos, 5.0));
            }
            state.projectiles.remove(i);
        }
    }
}

/// Smashed crates spill one pickup
fn drop_crate_loot(state: &mut RoundState, pos: Vec2) {
    let roll: f32 = state.rng.random();
    let (kind, value) = if roll > 0.9 {
        (CollectibleKind::Rare, 0)
    } else if roll > 0.5 {
        (CollectibleKind::Resource, 0)
    } else if roll > 0.3 {
        // Field sample
        (CollectibleKind::Hazard, 30)
    } else {
        // Salvage data, the better haul
        (CollectibleKind::Hazard, 50)
    };
    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        kind,
        pos,
        vel: Vec2::ZERO,
        radius: 12.0,
        value,
        ttl: Some(800),
    });
}

// ---------------------------------------------------------------------------
// Outcome

/// Terminal transitions. The win condition is checked before the loss
/// condition, so reaching the target and hitting zero resources on the same
/// tick resolves as a win.
fn evaluate_outcome(state: &mut RoundState, audio: &mut dyn AudioSink) {
    let tuning = state.variant.tuning();
    if state.score >= tuning.target_score {
        state.phase = Phase::Won;
        audio.play(AudioEvent::Win);
        audio.play(AudioEvent::AmbientStop);
        log::info!(
            "round won: variant={} score={} ticks={}",
            state.variant.as_str(),
            state.score,
            state.ticks
        );
    } else if state.vehicle.health <= 0.0 || state.vehicle.energy <= 0.0 {
        state.phase = Phase::Lost;
        audio.play(AudioEvent::Lose);
        audio.play(AudioEvent::AmbientStop);
        log::info!(
            "round lost: variant={} score={} health={:.1} energy={:.1} ticks={}",
            state.variant.as_str(),
            state.score,
            state.vehicle.health,
            state.vehicle.energy,
            state.ticks
        );
    }
}

fn decay_cosmetics(state: &mut RoundState) {
    for effect in state.effects.iter_mut() {
        effect.radius += effect.growth;
        effect.life -= 0.05;
    }
    state.effects.retain(|e| e.life > 0.0);

    state.shake *= 0.9;
    if state.shake < 0.5 {
        state.shake = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullAudio, RecordingAudio};
    use crate::config::{Difficulty, Loadout};
    use crate::sim::state::{Hostile, Obstacle};
    use proptest::prelude::*;

    fn round(variant: Variant) -> RoundState {
        RoundState::new(variant, Loadout::default(), Difficulty::new(0.0), 1234)
    }

    fn plant_hazard(state: &mut RoundState, pos: Vec2, value: u32) -> u32 {
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: CollectibleKind::Hazard,
            pos,
            vel: Vec2::ZERO,
            radius: 12.0,
            value,
            ttl: None,
        });
        id
    }

    fn plant_hostile(state: &mut RoundState, kind: HostileKind, pos: Vec2) {
        let id = state.next_entity_id();
        state.hostiles.push(Hostile {
            id,
            kind,
            pos,
            radius: 45.0,
            speed: 1.2,
            hp: 1,
            cooldown: 0,
            phase: 0.0,
        });
    }

    #[test]
    fn twenty_hazards_win_at_exactly_target() {
        let mut state = round(Variant::Drone);
        let input = TickInput::default();
        for _ in 0..20 {
            let pos = state.vehicle.pos;
            plant_hazard(&mut state, pos, 25);
            tick(&mut state, &input, &mut NullAudio);
        }
        assert_eq!(state.phase, Phase::Won);
        assert_eq!(state.score, 500);
    }

    #[test]
    fn seven_predator_bites_lose_the_round() {
        let mut state = round(Variant::Sub);
        let input = TickInput::default();
        for _ in 0..7 {
            assert_eq!(state.phase, Phase::Playing);
            let pos = state.vehicle.pos;
            state.hostiles.clear();
            plant_hostile(&mut state, HostileKind::Shark, pos);
            tick(&mut state, &input, &mut NullAudio);
        }
        assert_eq!(state.phase, Phase::Lost);
        assert!(state.vehicle.health <= 0.0);
    }

    #[test]
    fn win_beats_loss_on_the_same_tick() {
        let mut state = round(Variant::Drone);
        state.score = 500;
        state.vehicle.health = 0.0;
        tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert_eq!(state.phase, Phase::Won);
    }

    #[test]
    fn terminal_state_is_absorbing() {
        let mut state = round(Variant::Drone);
        state.score = 500;
        tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert_eq!(state.phase, Phase::Won);

        let ticks = state.ticks;
        let mut sink = RecordingAudio::default();
        tick(&mut state, &TickInput::default(), &mut sink);
        assert_eq!(state.phase, Phase::Won);
        assert_eq!(state.ticks, ticks, "no gameplay after the round ends");
        assert!(sink.events.is_empty(), "no cues after the round ends");
    }

    #[test]
    fn terminal_cues_fire_once() {
        let mut state = round(Variant::Drone);
        state.score = 500;
        let mut sink = RecordingAudio::default();
        tick(&mut state, &TickInput::default(), &mut sink);
        tick(&mut state, &TickInput::default(), &mut sink);
        let wins = sink
            .events
            .iter()
            .filter(|e| **e == AudioEvent::Win)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn capture_is_idempotent() {
        let mut state = round(Variant::Drone);
        let pos = state.vehicle.pos;
        plant_hazard(&mut state, pos, 25);
        let before = state.collectibles.len();

        tick(&mut state, &TickInput::default(), &mut NullAudio);

        assert_eq!(state.score, 25, "exactly one reward");
        assert_eq!(
            state.collectibles.len(),
            before - 1,
            "exactly one entity removed"
        );
    }

    #[test]
    fn energy_pickup_clamps_to_max() {
        let mut state = round(Variant::Drone);
        state.vehicle.energy = 99.0;
        let pos = state.vehicle.pos;
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: CollectibleKind::Resource,
            pos,
            vel: Vec2::ZERO,
            radius: 10.0,
            value: 0,
            ttl: None,
        });
        tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert!(state.vehicle.energy <= state.loadout.max_energy);
    }

    #[test]
    fn boost_without_energy_is_refused_with_notice() {
        let mut state = round(Variant::Drone);
        state.vehicle.energy = 0.3;
        let input = TickInput {
            pointer: Some(Vec2::new(1000.0, 600.0)),
            boost: true,
            ..TickInput::default()
        };
        tick(&mut state, &input, &mut NullAudio);
        assert!(state.notices.contains(&Notice::LowEnergy));
        // Only the ambient drain was paid
        let drained = 0.3 - state.variant.tuning().ambient_drain;
        assert!((state.vehicle.energy - drained).abs() < 1e-4);
    }

    #[test]
    fn projectile_expires_exactly_at_lifetime() {
        let mut state = round(Variant::Rover);
        state.obstacles.clear();
        state.crates.clear();
        state.collectibles.clear();
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            owner: ProjectileOwner::Player,
            pos: Vec2::new(640.0, 360.0),
            vel: Vec2::ZERO,
            life: 10,
            damage: 0.0,
        });

        let input = TickInput::default();
        for _ in 0..9 {
            tick(&mut state, &input, &mut NullAudio);
            assert_eq!(state.projectiles.len(), 1, "not removed early");
        }
        tick(&mut state, &input, &mut NullAudio);
        assert!(state.projectiles.is_empty(), "removed exactly at expiry");
    }

    #[test]
    fn hostile_shot_priority_wall_wins() {
        let mut state = round(Variant::Rover);
        state.obstacles.clear();
        state.crates.clear();
        state.hostiles.clear();
        // The shot lands inside the wall while also overlapping the vehicle;
        // the wall is tested first and absorbs it
        state.obstacles.push(Obstacle::new(300.0, 80.0, 40.0, 80.0));
        state.vehicle.pos = Vec2::new(320.0, 140.0);
        let health = state.vehicle.health;
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            owner: ProjectileOwner::Hostile,
            pos: Vec2::new(320.0, 125.0),
            vel: Vec2::new(0.0, 10.0),
            life: 60,
            damage: 8.0,
        });
        tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert!(state.projectiles.is_empty(), "wall absorbed the shot");
        assert_eq!(state.vehicle.health, health);
    }

    #[test]
    fn wildlife_collision_penalizes_score_and_keeps_the_animal() {
        let mut state = round(Variant::Sub);
        state.score = 80;
        let pos = state.vehicle.pos;
        plant_hostile(&mut state, HostileKind::Fish, pos + Vec2::new(5.0, 0.0));
        let health = state.vehicle.health;

        tick(&mut state, &TickInput::default(), &mut NullAudio);

        assert_eq!(state.score, 30, "penalty applied");
        assert_eq!(state.vehicle.health, health, "no hull damage");
        assert_eq!(state.hostiles.len(), 1, "the animal is repelled, not removed");
        assert!(state.notices.contains(&Notice::WildlifeWarning));

        // Penalty floors at zero
        state.score = 10;
        let pos = state.vehicle.pos;
        state.hostiles[0].pos = pos + Vec2::new(5.0, 0.0);
        tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn contact_applies_knockback_away_from_hostile() {
        let mut state = round(Variant::Drone);
        let pos = state.vehicle.pos;
        plant_hostile(&mut state, HostileKind::Cloud, pos + Vec2::new(20.0, 0.0));
        tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert!(state.vehicle.health < 100.0);
        assert!(state.vehicle.vel.x < 0.0, "pushed away from the hostile");
    }

    #[test]
    fn rover_blocked_axis_cancels_and_bounces() {
        let mut state = round(Variant::Rover);
        state.obstacles.clear();
        state.crates.clear();
        state.hostiles.clear();
        state.vehicle.pos = Vec2::new(200.0, 200.0);
        // Wall immediately to the right
        state
            .obstacles
            .push(Obstacle::new(225.0, 100.0, 50.0, 200.0));
        state.vehicle.vel = Vec2::new(5.0, 0.0);

        tick(&mut state, &TickInput::default(), &mut NullAudio);

        assert!(
            state.vehicle.pos.x + state.vehicle.radius <= 225.0 + 1e-3,
            "never enters the wall"
        );
        assert!(state.vehicle.vel.x <= 0.0, "blocked axis velocity inverted");
    }

    proptest! {
        #[test]
        fn vehicle_stays_in_bounds(
            targets in proptest::collection::vec((-500.0f32..2000.0, -500.0f32..1500.0), 1..60),
            boost in proptest::bool::ANY,
        ) {
            let mut state = round(Variant::Drone);
            for (x, y) in targets {
                let input = TickInput {
                    pointer: Some(Vec2::new(x, y)),
                    boost,
                    ..TickInput::default()
                };
                tick(&mut state, &input, &mut NullAudio);
                prop_assert!(state.vehicle.pos.x >= WALL_MARGIN);
                prop_assert!(state.vehicle.pos.x <= ARENA_WIDTH - WALL_MARGIN);
                prop_assert!(state.vehicle.pos.y >= WALL_MARGIN);
                prop_assert!(state.vehicle.pos.y <= ARENA_HEIGHT - WALL_MARGIN);
            }
        }

        #[test]
        fn energy_never_exceeds_max(seed in 0u64..1000) {
            let mut state = RoundState::new(
                Variant::Sub,
                Loadout::default(),
                Difficulty::new(20.0),
                seed,
            );
            for _ in 0..200 {
                let pos = state.vehicle.pos;
                let id = state.next_entity_id();
                state.collectibles.push(Collectible {
                    id,
                    kind: CollectibleKind::Resource,
                    pos,
                    vel: Vec2::ZERO,
                    radius: 10.0,
                    value: 0,
                    ttl: None,
                });
                tick(&mut state, &TickInput::default(), &mut NullAudio);
                prop_assert!(state.vehicle.energy <= state.loadout.max_energy);
                if state.is_over() {
                    break;
                }
            }
        }
    }
}
