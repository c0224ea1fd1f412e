//! Collectibles and session progress
//!
//! Session phases:
//! `NotStarted → Running → Completed`, and any phase → `Running` on reset.
//! Every transition method is total: a signal that means nothing in the
//! current phase is ignored.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A collectible gem
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    pub id: u32,
    pub position: Vec3,
    pub collected: bool,
}

/// The level's gems, remembering where they spawned so a reset can recreate them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GemField {
    spawn_points: Vec<Vec3>,
    gems: Vec<Gem>,
}

impl GemField {
    pub fn new(spawn_points: Vec<Vec3>) -> Self {
        let mut field = Self {
            spawn_points,
            gems: Vec::new(),
        };
        field.respawn_all();
        field
    }

    /// Recreate the full gem set at the original positions
    pub fn respawn_all(&mut self) {
        self.gems = self
            .spawn_points
            .iter()
            .enumerate()
            .map(|(i, &position)| Gem {
                id: i as u32,
                position,
                collected: false,
            })
            .collect();
    }

    /// Replace the active set (snapshot restore). Spawn points are left alone.
    pub fn replace(&mut self, gems: Vec<Gem>) {
        self.gems = gems;
    }

    /// All gems including collected ones, in id order
    pub fn all(&self) -> &[Gem] {
        &self.gems
    }

    /// Gems still in play
    pub fn active(&self) -> impl Iterator<Item = &Gem> {
        self.gems.iter().filter(|g| !g.collected)
    }

    pub fn remaining(&self) -> usize {
        self.active().count()
    }

    /// Collect every active gem strictly closer than `reach` to `point`
    pub fn collect_within(&mut self, point: Vec3, reach: f32) -> Vec<Vec3> {
        let mut picked = Vec::new();
        for gem in self.gems.iter_mut().filter(|g| !g.collected) {
            if gem.position.distance(point) < reach {
                gem.collected = true;
                picked.push(gem.position);
            }
        }
        picked
    }

    /// Collect one gem by id. Already-collected or unknown ids are a no-op.
    pub fn collect(&mut self, id: u32) -> bool {
        match self.gems.iter_mut().find(|g| g.id == id && !g.collected) {
            Some(gem) => {
                gem.collected = true;
                true
            }
            None => false,
        }
    }
}

/// Phase of the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Running,
    Completed,
}

/// Final result of a run, reported on reaching the finish pad
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    /// Seconds from start to finish
    pub completion_time: f64,
    pub gems_collected: usize,
    pub perfect_score: bool,
}

/// Tracks timing and gem counts for one run of the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressTracker {
    phase: SessionPhase,
    /// Simulation-clock time the run started (seconds)
    start_time: Option<f64>,
    /// Gem count snapshot taken at load/reset
    initial_gem_count: usize,
    completion: Option<CompletionReport>,
}

impl ProgressTracker {
    pub fn new(initial_gem_count: usize) -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            start_time: None,
            initial_gem_count,
            completion: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn initial_gem_count(&self) -> usize {
        self.initial_gem_count
    }

    pub fn completion(&self) -> Option<&CompletionReport> {
        self.completion.as_ref()
    }

    pub fn collected_count(&self, remaining: usize) -> usize {
        self.initial_gem_count.saturating_sub(remaining)
    }

    /// Start the run (start-pad proximity or explicit start).
    /// Returns true only on the `NotStarted → Running` transition.
    pub fn start(&mut self, now: f64) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.start_time = Some(now);
        log::info!("Run started at t={now:.2}s");
        true
    }

    /// Finish-pad proximity. Completes a running session; ignored otherwise.
    pub fn finish(&mut self, now: f64, remaining: usize) -> Option<CompletionReport> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        let report = self.complete_level(now, remaining);
        self.phase = SessionPhase::Completed;
        self.completion = Some(report);
        log::info!(
            "Level complete in {:.2}s with {}/{} gems{}",
            report.completion_time,
            report.gems_collected,
            self.initial_gem_count,
            if report.perfect_score { " (perfect)" } else { "" }
        );
        Some(report)
    }

    /// Score the run as if it ended at `now` with `remaining` gems left
    pub fn complete_level(&self, now: f64, remaining: usize) -> CompletionReport {
        let completion_time = self.start_time.map_or(0.0, |start| (now - start).max(0.0));
        let gems_collected = self.collected_count(remaining);
        CompletionReport {
            completion_time,
            gems_collected,
            perfect_score: gems_collected == self.initial_gem_count,
        }
    }

    /// Restart from any phase: the clock is cleared and the gem count re-snapshotted.
    pub fn reset(&mut self, fresh_gem_count: usize) {
        self.phase = SessionPhase::Running;
        self.start_time = None;
        self.initial_gem_count = fresh_gem_count;
        self.completion = None;
    }

    /// Stamp the start time of a running session whose clock was cleared by a reset
    pub fn stamp(&mut self, now: f64) {
        if self.phase == SessionPhase::Running && self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    /// Seconds on the run clock
    pub fn elapsed(&self, now: f64) -> f64 {
        match (self.phase, self.completion) {
            (SessionPhase::Completed, Some(report)) => report.completion_time,
            (SessionPhase::Running, _) => self.start_time.map_or(0.0, |s| (now - s).max(0.0)),
            _ => 0.0,
        }
    }

    /// Overwrite counters from a snapshot. A restored clock implies a running session.
    pub fn restore(&mut self, start_time: Option<f64>, initial_gem_count: usize) {
        self.start_time = start_time;
        self.initial_gem_count = initial_gem_count;
        self.completion = None;
        self.phase = if start_time.is_some() {
            SessionPhase::Running
        } else {
            SessionPhase::NotStarted
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn five_gems() -> GemField {
        GemField::new((0..5).map(|i| Vec3::new(i as f32 * 10.0, 1.0, 0.0)).collect())
    }

    #[test]
    fn test_completion_arithmetic() {
        let mut gems = five_gems();
        let mut tracker = ProgressTracker::new(gems.remaining());
        assert!(tracker.start(1.0));
        for id in 0..3 {
            assert!(gems.collect(id));
        }
        let report = tracker.finish(11.5, gems.remaining()).unwrap();
        assert_eq!(report.gems_collected, 3);
        assert!(!report.perfect_score);
        assert!((report.completion_time - 10.5).abs() < 1e-9);
        assert_eq!(tracker.phase(), SessionPhase::Completed);

        let mut gems = five_gems();
        let mut tracker = ProgressTracker::new(gems.remaining());
        tracker.start(0.0);
        for id in 0..5 {
            gems.collect(id);
        }
        let report = tracker.finish(3.0, gems.remaining()).unwrap();
        assert_eq!(report.gems_collected, 5);
        assert!(report.perfect_score);
    }

    #[test]
    fn test_unexpected_signals_ignored() {
        let mut tracker = ProgressTracker::new(5);
        // Finish before start
        assert!(tracker.finish(1.0, 5).is_none());
        assert_eq!(tracker.phase(), SessionPhase::NotStarted);

        tracker.start(2.0);
        // Lingering on the start pad does not restart the clock
        assert!(!tracker.start(3.0));
        assert_eq!(tracker.start_time(), Some(2.0));

        tracker.finish(4.0, 5);
        // Completed ignores further pads
        assert!(tracker.finish(9.0, 0).is_none());
        assert!(!tracker.start(9.0));
        assert!((tracker.elapsed(100.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut tracker = ProgressTracker::new(5);
        tracker.reset(7);
        assert_eq!(tracker.phase(), SessionPhase::Running);
        assert_eq!(tracker.initial_gem_count(), 7);
        assert_eq!(tracker.start_time(), None);
        assert_eq!(tracker.elapsed(50.0), 0.0);

        tracker.stamp(50.0);
        assert_eq!(tracker.start_time(), Some(50.0));
        tracker.finish(60.0, 0);
        assert_eq!(tracker.phase(), SessionPhase::Completed);

        tracker.reset(7);
        assert_eq!(tracker.phase(), SessionPhase::Running);
        assert!(tracker.completion().is_none());
    }

    #[test]
    fn test_reset_idempotent() {
        let mut gems = five_gems();
        gems.collect(1);
        let mut once = ProgressTracker::new(5);
        once.start(1.0);
        let mut twice = once.clone();

        gems.respawn_all();
        once.reset(gems.remaining());
        let after_once = gems.remaining();

        gems.respawn_all();
        twice.reset(gems.remaining());
        gems.respawn_all();
        twice.reset(gems.remaining());

        assert_eq!(after_once, gems.remaining());
        assert_eq!(once, twice);
        assert_eq!(twice.elapsed(42.0), 0.0);
    }

    #[test]
    fn test_collect_is_one_shot() {
        let mut gems = five_gems();
        assert!(gems.collect(2));
        assert!(!gems.collect(2));
        assert!(!gems.collect(99));
        assert_eq!(gems.remaining(), 4);
        assert!(gems.collect_within(Vec3::new(20.0, 1.0, 0.0), 5.0).is_empty());
        gems.respawn_all();
        assert_eq!(gems.remaining(), 5);
    }

    #[test]
    fn test_restore_sets_phase() {
        let mut tracker = ProgressTracker::new(0);
        tracker.restore(Some(3.0), 9);
        assert_eq!(tracker.phase(), SessionPhase::Running);
        assert_eq!(tracker.initial_gem_count(), 9);
        tracker.restore(None, 9);
        assert_eq!(tracker.phase(), SessionPhase::NotStarted);
    }

    proptest! {
        #[test]
        fn prop_remaining_never_increases(
            points in proptest::collection::vec((-20.0f32..20.0, -20.0f32..20.0), 1..40)
        ) {
            let mut gems = five_gems();
            let mut last = gems.remaining();
            let mut picked_total = 0;
            for (x, z) in points {
                picked_total += gems.collect_within(Vec3::new(x + 20.0, 1.0, z), 1.5).len();
                let now = gems.remaining();
                prop_assert!(now <= last);
                last = now;
            }
            prop_assert_eq!(picked_total + gems.remaining(), 5);
        }
    }
}
