//! Deterministic simulation module
//!
//! All gameplay logic lives here. The module is pure and single-threaded:
//! - Fixed cadence only, one tick at a time
//! - Seeded RNG only
//! - Removal during resolution iterates in reverse index order
//! - No rendering or audio-backend dependencies; side effects go through
//!   the injected sink

pub mod ability;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod variant;

pub use spawn::hostile_cap;
pub use state::{
    Collectible, CollectibleKind, Crate, Effect, Hostile, HostileKind, Notice, Obstacle, Phase,
    Projectile, ProjectileOwner, RoundState, Vehicle,
};
pub use tick::{TickInput, tick};
pub use variant::{Tuning, Variant};
