//! Simulation core
//!
//! All gameplay physics lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One tick per rendered frame, variable clamped Δt
//! - Stable iteration order (collider list order, gem id order)
//! - No randomness

pub mod body;
pub mod collision;
pub mod geometry;
pub mod integrator;
pub mod level;
pub mod progress;
pub mod state;
pub mod tick;

pub use body::{BoostMeter, DynamicBody};
pub use collision::{CollisionResult, PadKind, ResolveReport, resolve, sphere_aabb_collision};
pub use geometry::{Aabb, Collider, GeometryRegistry, StaticCollider};
pub use integrator::{InputIntent, TickInput, integrate};
pub use level::{Level, Pad};
pub use progress::{CompletionReport, Gem, GemField, ProgressTracker, SessionPhase};
pub use state::{GameEvent, GameState};
pub use tick::tick;
