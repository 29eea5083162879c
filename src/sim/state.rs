//! Round state and entity types
//!
//! Everything a round mutates lives here as plain data. The tick function is
//! the only writer; the presentation layer reads snapshots between ticks.
//! In-round state is never persisted across reloads - a restart is a fresh
//! `RoundState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::variant::Variant;
use crate::config::{Difficulty, Loadout};
use crate::consts::*;

/// Current phase of a round. `Won` and `Lost` are terminal; there is no
/// transition out of either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

/// Collectible categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectibleKind {
    /// The primary scoring pickup (pollution, salvage data, samples)
    Hazard,
    /// Energy refill
    Resource,
    /// Bonus currency token
    Rare,
}

/// A pickup drifting through the arena
#[derive(Debug, Clone, Serialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Score granted on capture (hazards only)
    pub value: u32,
    /// Remaining ticks before despawn; `None` lives until captured or culled
    pub ttl: Option<u32>,
}

/// Hostile archetypes across the three variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HostileKind {
    /// Drifting smog bank (drone)
    Cloud,
    /// Homing interceptor, explodes on contact (drone)
    Seeker,
    /// Protected wildlife - ramming it costs score instead of health (sub)
    Fish,
    /// Stationary floating mine (sub)
    Mine,
    /// Pursuing predator (sub)
    Shark,
    /// Ground swarmer (rover)
    Beetle,
    /// Armored ground unit with a cannon (rover)
    Tank,
    /// Flying gun platform, overflies obstacles (rover)
    Gunner,
}

impl HostileKind {
    /// Ground units are blocked by obstacles; everything else flies over.
    pub fn is_ground(self) -> bool {
        matches!(self, HostileKind::Beetle | HostileKind::Tank)
    }

    /// Units that fire projectiles at the vehicle
    pub fn is_armed(self) -> bool {
        matches!(self, HostileKind::Tank | HostileKind::Gunner)
    }

    /// Health damage dealt on contact with the vehicle
    pub fn contact_damage(self) -> f32 {
        match self {
            HostileKind::Cloud => 0.5,
            HostileKind::Seeker => 10.0,
            HostileKind::Fish => 0.0,
            HostileKind::Mine => 25.0,
            HostileKind::Shark => 15.0,
            HostileKind::Beetle => 3.0,
            HostileKind::Tank => 1.0,
            HostileKind::Gunner => 3.0,
        }
    }

    /// One-shot hostiles are destroyed by their own contact hit
    pub fn dies_on_contact(self) -> bool {
        matches!(self, HostileKind::Seeker | HostileKind::Mine)
    }

    /// Score credited when a projectile kill lands
    pub fn kill_score(self) -> u32 {
        match self {
            HostileKind::Tank => 100,
            HostileKind::Gunner => 60,
            HostileKind::Beetle => 40,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Hostile {
    pub id: u32,
    pub kind: HostileKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Movement rate in pixels per tick
    pub speed: f32,
    pub hp: u8,
    /// Ticks until an armed hostile may fire again
    pub cooldown: u32,
    /// Per-entity phase offset for drift and hover sway
    pub phase: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectileOwner {
    Player,
    Hostile,
}

#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: ProjectileOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks; removed exactly when it reaches zero
    pub life: u32,
    /// Health damage applied to the vehicle (hostile shots)
    pub damage: f32,
}

/// Static axis-aligned blocker (rover). Immutable for the round.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Obstacle {
    pub min: Vec2,
    pub max: Vec2,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// Destructible supply crate (rover)
#[derive(Debug, Clone, Serialize)]
pub struct Crate {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u8,
}

/// Expanding cosmetic ring. No gameplay effect.
#[derive(Debug, Clone, Serialize)]
pub struct Effect {
    pub pos: Vec2,
    pub radius: f32,
    /// Radius growth per tick
    pub growth: f32,
    /// 1.0 -> 0.0, removed at zero
    pub life: f32,
}

impl Effect {
    pub fn ring(pos: Vec2, radius: f32, growth: f32) -> Self {
        Self {
            pos,
            radius,
            growth,
            life: 1.0,
        }
    }

    /// Two-tick blip for muzzle flashes and impact sparks
    pub fn flash(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            growth: 0.0,
            life: 0.1,
        }
    }
}

/// The player-controlled vehicle
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Aim direction: pointer for drone/sub, turret for the rover
    pub facing: f32,
    /// Hull orientation; eased toward the travel direction on the rover
    pub body_angle: f32,
    pub radius: f32,
    pub health: f32,
    pub energy: f32,
}

/// Transient notices surfaced to the player between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Notice {
    LowEnergy,
    TokenFound,
    EnergyRecharged,
    AbilityFired,
    WildlifeWarning,
    PredatorBite,
}

/// Complete simulation state for one round
#[derive(Debug, Clone, Serialize)]
pub struct RoundState {
    pub variant: Variant,
    pub loadout: Loadout,
    pub difficulty: Difficulty,
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    /// Simulation tick counter
    pub ticks: u64,
    pub phase: Phase,
    pub score: u32,
    pub tokens: u32,
    pub enemies_defeated: u32,
    pub crates_destroyed: u32,
    pub vehicle: Vehicle,
    pub collectibles: Vec<Collectible>,
    pub hostiles: Vec<Hostile>,
    pub projectiles: Vec<Projectile>,
    pub crates: Vec<Crate>,
    pub obstacles: Vec<Obstacle>,
    /// Cosmetic rings/bursts (no gameplay effect)
    pub effects: Vec<Effect>,
    /// Notices raised this tick, drained by the presentation layer
    pub notices: Vec<Notice>,
    /// Screen-shake intensity hint for the presentation layer; decays
    pub shake: f32,
    /// Sonar held and paid for this tick (widened attraction, shark repel)
    pub sonar_active: bool,
    /// Ability trigger state last tick (edge detection for the pulse)
    pub ability_held: bool,
    next_id: u32,
}

impl RoundState {
    pub fn new(variant: Variant, loadout: Loadout, difficulty: Difficulty, seed: u64) -> Self {
        let loadout = loadout.sanitized();
        let tuning = variant.tuning();
        // The rover starts in the cleared corner of its field; the flying
        // variants start mid-arena.
        let start = match variant {
            Variant::Rover => Vec2::new(100.0, 100.0),
            _ => Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
        };

        let mut state = Self {
            variant,
            loadout,
            difficulty,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
            phase: Phase::Playing,
            score: 0,
            tokens: 0,
            enemies_defeated: 0,
            crates_destroyed: 0,
            vehicle: Vehicle {
                pos: start,
                vel: Vec2::ZERO,
                facing: 0.0,
                body_angle: 0.0,
                radius: tuning.vehicle_radius,
                health: loadout.max_health,
                energy: loadout.max_energy,
            },
            collectibles: Vec::new(),
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            crates: Vec::new(),
            obstacles: Vec::new(),
            effects: Vec::new(),
            notices: Vec::new(),
            shake: 0.0,
            sonar_active: false,
            ability_held: false,
            next_id: 1,
        };

        if variant == Variant::Rover {
            super::spawn::generate_field(&mut state);
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Bump the shake hint, capped so stacked hits stay readable
    pub fn add_shake(&mut self, amount: f32) {
        self.shake = (self.shake + amount).min(10.0);
    }

    /// True once the outcome is terminal
    pub fn is_over(&self) -> bool {
        self.phase != Phase::Playing
    }

    /// True if a point has drifted past the arena plus the cleanup margin
    pub fn out_of_bounds(pos: Vec2) -> bool {
        pos.x < -CLEANUP_MARGIN
            || pos.x > ARENA_WIDTH + CLEANUP_MARGIN
            || pos.y < -CLEANUP_MARGIN
            || pos.y > ARENA_HEIGHT + CLEANUP_MARGIN
    }
}
