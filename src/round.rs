//! Round lifecycle
//!
//! Owns one simulation state plus the injected audio sink, reports the
//! outcome to the progression layer exactly once, and guarantees the ambient
//! loop stops on every exit path - normal completion, forced close, or
//! unwind.

use serde::Serialize;

use crate::audio::{AudioEvent, AudioSink};
use crate::config::{Difficulty, Loadout};
use crate::sim::{Phase, RoundState, TickInput, Variant, tick};

/// Result handed to the progression layer when a round ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub score: u32,
    pub won: bool,
    pub tokens_collected: u32,
    pub enemies_defeated: u32,
    pub crates_destroyed: u32,
    pub health_remaining: f32,
    pub energy_remaining: f32,
}

/// One play session, from start to WON/LOST
pub struct Round<A: AudioSink> {
    state: RoundState,
    audio: A,
    reported: bool,
}

impl<A: AudioSink> Round<A> {
    pub fn new(
        variant: Variant,
        loadout: Loadout,
        difficulty: Difficulty,
        seed: u64,
        mut audio: A,
    ) -> Self {
        log::info!(
            "round start: variant={} difficulty={} seed={seed}",
            variant.as_str(),
            difficulty.value()
        );
        audio.play(AudioEvent::AmbientStart);
        Self {
            state: RoundState::new(variant, loadout, difficulty, seed),
            audio,
            reported: false,
        }
    }

    /// Advance one fixed step. A no-op once the outcome is terminal.
    pub fn tick(&mut self, input: &TickInput) {
        tick(&mut self.state, input, &mut self.audio);
    }

    /// Read-only state snapshot for the presentation layer
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Final report for the progression layer. `Some` exactly once, after
    /// the round has ended; `None` on every other call.
    pub fn take_outcome(&mut self) -> Option<RoundOutcome> {
        if !self.is_over() || self.reported {
            return None;
        }
        self.reported = true;
        Some(RoundOutcome {
            score: self.state.score,
            won: self.state.phase == Phase::Won,
            tokens_collected: self.state.tokens,
            enemies_defeated: self.state.enemies_defeated,
            crates_destroyed: self.state.crates_destroyed,
            health_remaining: self.state.vehicle.health.max(0.0),
            energy_remaining: self.state.vehicle.energy.max(0.0),
        })
    }
}

impl<A: AudioSink> Drop for Round<A> {
    // Teardown is unconditional: closing a round mid-play must still stop
    // the ambient loop.
    fn drop(&mut self) {
        self.audio.play(AudioEvent::AmbientStop);
    }
}
