//! Error types
//!
//! The simulation itself never fails: degenerate inputs are clamped. Only the
//! edges that touch untrusted data (tuning overrides, save snapshots, browser
//! storage) return `Result<T, GameError>`.

use std::fmt;

/// Unified error type for the fallible edges of the game.
#[derive(Clone, Debug, PartialEq)]
pub enum GameError {
    /// A tuning value is out of its valid range.
    InvalidTuning {
        /// Which parameter was rejected and why
        reason: &'static str,
    },
    /// Snapshot JSON could not be parsed.
    SnapshotDecode {
        /// Parser message
        message: String,
    },
    /// Snapshot envelope version is not one this build understands.
    SnapshotVersion {
        /// Version found in the envelope
        found: u32,
        /// Version this build writes
        expected: u32,
    },
    /// Browser storage is unavailable or rejected a write.
    Storage {
        /// Description of the storage failure
        message: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTuning { reason } => write!(f, "invalid tuning: {reason}"),
            Self::SnapshotDecode { message } => write!(f, "snapshot decode failed: {message}"),
            Self::SnapshotVersion { found, expected } => {
                write!(f, "unsupported snapshot version {found} (expected {expected})")
            }
            Self::Storage { message } => write!(f, "storage error: {message}"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::SnapshotDecode {
            message: err.to_string(),
        }
    }
}
