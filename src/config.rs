//! Round entry parameters from the progression layer
//!
//! The host hands over a loadout (stat multipliers earned outside the round)
//! and a difficulty scalar. Both are immutable for the round. Malformed
//! loadout input falls back to the stock stats rather than failing the round.

use serde::{Deserialize, Serialize};

/// Vehicle stat multipliers for one round.
///
/// Missing fields take the stock values; see [`Loadout::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loadout {
    /// Movement speed multiplier (1.0 = stock vehicle)
    pub speed: f32,
    /// Energy capacity
    pub max_energy: f32,
    /// Collection (attraction) radius in pixels
    pub collection_radius: f32,
    /// Health capacity
    pub max_health: f32,
    /// Special-ability radius in pixels; 0 = ability not unlocked
    pub ability_radius: f32,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_energy: 100.0,
            collection_radius: 50.0,
            max_health: 100.0,
            ability_radius: 0.0,
        }
    }
}

impl Loadout {
    /// Parse a loadout from the host's JSON. Any parse failure falls back to
    /// stock stats with a warning; a round never fails on bad configuration.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Loadout>(json) {
            Ok(loadout) => loadout.sanitized(),
            Err(err) => {
                log::warn!("malformed loadout ({err}), using stock stats");
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values to something the simulation can run with.
    /// Capacities below 1 would end the round on the first drain tick.
    pub fn sanitized(mut self) -> Self {
        let stock = Self::default();
        if !self.speed.is_finite() || self.speed <= 0.0 {
            self.speed = stock.speed;
        }
        if !self.max_energy.is_finite() || self.max_energy < 1.0 {
            self.max_energy = stock.max_energy;
        }
        if !self.collection_radius.is_finite() || self.collection_radius < 0.0 {
            self.collection_radius = stock.collection_radius;
        }
        if !self.max_health.is_finite() || self.max_health < 1.0 {
            self.max_health = stock.max_health;
        }
        if !self.ability_radius.is_finite() || self.ability_radius < 0.0 {
            self.ability_radius = stock.ability_radius;
        }
        self
    }

    /// Whether the special ability is unlocked at all
    pub fn has_ability(&self) -> bool {
        self.ability_radius > 0.0
    }
}

/// Hostile-pressure scalar supplied by the host, clamped to 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(f32);

impl Difficulty {
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 100.0))
        } else {
            Self(0.0)
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Normalized 0.0..=1.0 form used by spawn-pressure formulas
    pub fn fraction(&self) -> f32 {
        self.0 / 100.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(50.0)
    }
}
