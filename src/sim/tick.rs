//! Per-frame simulation step
//!
//! input → integrate (tentative position) → resolve (ground, walls, triggers)
//! → progress tracker. One call per rendered frame.

use super::collision::{PadKind, resolve};
use super::integrator::{TickInput, integrate};
use super::state::{GameEvent, GameState};
use crate::clamp_dt;

/// Advance the game state by one frame of `dt` seconds.
///
/// `dt` is clamped to `[0, tuning.max_dt]`; a zero-length frame changes nothing
/// beyond an optional reset.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.reset {
        state.reset_level();
    }

    let dt = clamp_dt(dt, state.tuning.max_dt);
    if dt <= 0.0 {
        return;
    }

    state.time_ticks += 1;
    state.clock += f64::from(dt);
    state.progress.stamp(state.clock);

    let outcome = integrate(
        &mut state.body,
        &mut state.boost,
        &mut state.jump_held,
        input,
        dt,
        &state.tuning,
    );
    if outcome.jumped {
        state.events.push(GameEvent::Jumped {
            position: state.body.position,
        });
    }

    let pads = state.level.pads();
    let report = resolve(
        &mut state.body,
        state.level.geometry.platforms(),
        state.level.geometry.walls(),
        &mut state.gems,
        &pads,
        &state.tuning,
        outcome.jumped,
    );

    let remaining = state.gems.remaining();
    for position in report.gems_collected {
        log::debug!("Gem collected at {position:?}, {remaining} left");
        state
            .events
            .push(GameEvent::GemCollected { position, remaining });
    }

    for pad in report.pads {
        match pad {
            PadKind::Start => {
                if state.progress.start(state.clock) {
                    state.events.push(GameEvent::SessionStarted);
                }
            }
            PadKind::Finish => {
                if let Some(result) = state.progress.finish(state.clock, remaining) {
                    state.events.push(GameEvent::LevelCompleted(result));
                }
            }
        }
    }
}
