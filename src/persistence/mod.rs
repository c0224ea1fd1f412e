//! Save/restore of level progress
//!
//! A snapshot holds the collectible set and the progress counters only; static
//! geometry and the marble itself are never saved. The JSON envelope carries a
//! version so old saves are rejected instead of misread.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::platform;
use crate::sim::progress::Gem;
use crate::sim::state::GameState;

/// Envelope version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

/// LocalStorage key for the save slot
pub const SAVE_KEY: &str = "marble_run_save";

/// One collectible in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GemRecord {
    pub position: [f32; 3],
    pub collected: bool,
}

/// Serializable progress snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub gems: Vec<GemRecord>,
    /// Run start on the simulation clock, `None` before the run started
    pub start_time: Option<f64>,
    pub initial_gem_count: usize,
    /// Simulation clock when the snapshot was taken
    #[serde(default)]
    pub saved_at: f64,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and version-check a snapshot
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GameError::SnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// Collected count as the HUD would show it
    pub fn collected_count(&self) -> usize {
        let remaining = self.gems.iter().filter(|g| !g.collected).count();
        self.initial_gem_count.saturating_sub(remaining)
    }
}

impl GameState {
    /// Capture the collectible set and progress counters
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            gems: self
                .gems
                .all()
                .iter()
                .map(|g| GemRecord {
                    position: g.position.to_array(),
                    collected: g.collected,
                })
                .collect(),
            start_time: self.progress.start_time(),
            initial_gem_count: self.progress.initial_gem_count(),
            saved_at: self.clock,
        }
    }

    /// Replace the collectible set and progress counters from a snapshot.
    ///
    /// Static colliders and the marble are left alone. The run start is rebased onto
    /// the current clock so elapsed time carries over.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        let gems = snapshot
            .gems
            .iter()
            .enumerate()
            .map(|(i, record)| Gem {
                id: i as u32,
                position: record.position.into(),
                collected: record.collected,
            })
            .collect();
        self.gems.replace(gems);

        let start_time = snapshot
            .start_time
            .map(|start| self.clock - (snapshot.saved_at - start).max(0.0));
        self.progress
            .restore(start_time, snapshot.initial_gem_count);

        log::info!(
            "Restored snapshot: {}/{} gems collected",
            snapshot.collected_count(),
            snapshot.initial_gem_count
        );
    }

    /// Write the current snapshot to storage
    pub fn save(&self) -> Result<(), GameError> {
        let json = self.snapshot().to_json()?;
        platform::storage_set(SAVE_KEY, &json)?;
        log::debug!("Progress saved ({} bytes)", json.len());
        Ok(())
    }

    /// Restore from storage. Returns `Ok(false)` when there is no save.
    pub fn load(&mut self) -> Result<bool, GameError> {
        let Some(json) = platform::storage_get(SAVE_KEY)? else {
            return Ok(false);
        };
        let snapshot = Snapshot::from_json(&json)?;
        self.restore(&snapshot);
        Ok(true)
    }
}

/// Drop the saved snapshot
pub fn clear_save() -> Result<(), GameError> {
    platform::storage_remove(SAVE_KEY)
}
