//! Game state and simulation events
//!
//! Everything the simulation mutates during a tick lives in `GameState`.
//! The renderer, HUD and camera only read it between ticks.

use glam::Vec3;

use super::body::{BoostMeter, DynamicBody};
use super::level::Level;
use super::progress::{CompletionReport, GemField, ProgressTracker, SessionPhase};
use crate::tuning::PhysicsTuning;

/// Notifications for presentation (particles, audio, HUD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A gem was picked up at `position`
    GemCollected { position: Vec3, remaining: usize },
    /// The marble left the ground from `position`
    Jumped { position: Vec3 },
    /// Start pad reached, run clock started
    SessionStarted,
    /// Finish pad reached
    LevelCompleted(CompletionReport),
    /// Gems recreated and marble respawned
    LevelReset,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: PhysicsTuning,
    /// Immutable after construction
    pub level: Level,
    pub body: DynamicBody,
    pub boost: BoostMeter,
    pub gems: GemField,
    pub progress: ProgressTracker,
    /// Simulation clock (seconds)
    pub clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Jump button state last tick, for edge detection
    pub(crate) jump_held: bool,
    /// Events raised since the last drain
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: PhysicsTuning, level: Level) -> Self {
        let body = DynamicBody::new(tuning.spawn_point, tuning.radius);
        let boost = BoostMeter::full(&tuning.boost);
        let gems = GemField::new(level.gem_spawns.clone());
        let progress = ProgressTracker::new(gems.remaining());

        Self {
            tuning,
            level,
            body,
            boost,
            gems,
            progress,
            clock: 0.0,
            time_ticks: 0,
            jump_held: false,
            events: Vec::new(),
        }
    }

    /// Default tuning on the standard course
    pub fn default_course() -> Self {
        Self::new(PhysicsTuning::default(), Level::default_course())
    }

    /// Explicit session start, same as touching the start pad
    pub fn start_session(&mut self) {
        if self.progress.start(self.clock) {
            self.events.push(GameEvent::SessionStarted);
        }
    }

    /// Restart the level: full gem set, respawned marble, cleared run clock
    pub fn reset_level(&mut self) {
        self.gems.respawn_all();
        self.progress.reset(self.gems.remaining());
        self.body.respawn(self.tuning.spawn_point);
        self.boost = BoostMeter::full(&self.tuning.boost);
        self.jump_held = false;
        self.events.push(GameEvent::LevelReset);
        log::info!("Level reset ({} gems)", self.gems.remaining());
    }

    pub fn phase(&self) -> SessionPhase {
        self.progress.phase()
    }

    /// Seconds on the run clock
    pub fn elapsed(&self) -> f64 {
        self.progress.elapsed(self.clock)
    }

    pub fn gems_collected(&self) -> usize {
        self.progress.collected_count(self.gems.remaining())
    }

    /// Events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::default_course();
        assert_eq!(state.phase(), SessionPhase::NotStarted);
        assert_eq!(state.gems.remaining(), 8);
        assert_eq!(state.progress.initial_gem_count(), 8);
        assert_eq!(state.body.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(state.boost.value, 100.0);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut state = GameState::default_course();
        state.gems.collect(0);
        state.gems.collect(3);
        state.body.position = Vec3::new(50.0, -20.0, 3.0);
        state.boost.value = 0.0;

        state.reset_level();

        assert_eq!(state.gems.remaining(), 8);
        assert_eq!(state.progress.initial_gem_count(), 8);
        assert_eq!(state.phase(), SessionPhase::Running);
        assert_eq!(state.body.position, state.tuning.spawn_point);
        assert_eq!(state.boost.value, state.tuning.boost.meter_max);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelReset]);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_explicit_start_once() {
        let mut state = GameState::default_course();
        state.start_session();
        state.start_session();
        assert_eq!(state.drain_events(), vec![GameEvent::SessionStarted]);
        assert_eq!(state.phase(), SessionPhase::Running);
    }
}
