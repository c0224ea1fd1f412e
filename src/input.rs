//! Input abstraction
//!
//! Collects raw key, button and tilt state between frames and turns it into one
//! `TickInput` per tick. Browser event wiring lives in the binary; this module
//! only sees key codes and numbers so it can be tested headless.

use glam::Vec2;

use crate::sim::integrator::{InputIntent, TickInput};

/// Action bound to a physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Boost,
    Reset,
}

impl KeyAction {
    /// Map a `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Self::Forward),
            "KeyS" | "ArrowDown" => Some(Self::Backward),
            "KeyA" | "ArrowLeft" => Some(Self::Left),
            "KeyD" | "ArrowRight" => Some(Self::Right),
            "Space" => Some(Self::Jump),
            "ShiftLeft" | "ShiftRight" => Some(Self::Boost),
            "KeyR" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Held-state of every input source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    jump: bool,
    boost: bool,
    /// On-screen buttons (touch devices)
    jump_button: bool,
    boost_button: bool,
    /// Device tilt stick, replaces keys when present
    tilt: Option<Vec2>,
    /// Latched on press so a tap shorter than a frame still jumps
    jump_pending: bool,
    /// One-shot, cleared when taken
    reset_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key down/up by `KeyboardEvent.code`. Returns true if the key is bound.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        let Some(action) = KeyAction::from_code(code) else {
            return false;
        };
        match action {
            KeyAction::Forward => self.forward = pressed,
            KeyAction::Backward => self.backward = pressed,
            KeyAction::Left => self.left = pressed,
            KeyAction::Right => self.right = pressed,
            KeyAction::Jump => {
                self.jump = pressed;
                self.jump_pending |= pressed;
            }
            KeyAction::Boost => self.boost = pressed,
            KeyAction::Reset => {
                if pressed {
                    self.reset_pending = true;
                }
            }
        }
        true
    }

    pub fn set_jump_button(&mut self, pressed: bool) {
        self.jump_button = pressed;
        self.jump_pending |= pressed;
    }

    pub fn set_boost_button(&mut self, pressed: bool) {
        self.boost_button = pressed;
    }

    /// Device orientation in degrees: gamma tilts left/right, beta forward/back.
    /// `range_degrees` of tilt is full deflection.
    pub fn set_tilt(&mut self, gamma: f64, beta: f64, range_degrees: f32) {
        if !gamma.is_finite() || !beta.is_finite() || range_degrees <= 0.0 {
            return;
        }
        let x = (gamma as f32 / range_degrees).clamp(-1.0, 1.0);
        let z = (beta as f32 / range_degrees).clamp(-1.0, 1.0);
        // Tilting the top of the device away rolls forward (-z)
        self.tilt = Some(Vec2::new(x, -z));
    }

    pub fn clear_tilt(&mut self) {
        self.tilt = None;
    }

    /// Release everything (focus lost)
    pub fn release_all(&mut self) {
        *self = Self {
            tilt: self.tilt,
            ..Self::default()
        };
    }

    /// Planar direction: tilt when available, otherwise normalized key state
    pub fn direction(&self) -> Vec2 {
        if let Some(tilt) = self.tilt {
            return tilt.clamp_length_max(1.0);
        }
        let mut dir = Vec2::ZERO;
        if self.forward {
            dir.y -= 1.0;
        }
        if self.backward {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }

    pub fn intent(&self) -> InputIntent {
        InputIntent {
            direction: self.direction(),
            jump_requested: self.jump || self.jump_button || self.jump_pending,
            boost_held: self.boost || self.boost_button,
        }
    }

    /// Build this tick's input and consume one-shot requests
    pub fn take_tick_input(&mut self, camera_yaw: f32) -> TickInput {
        let reset = std::mem::take(&mut self.reset_pending);
        let intent = self.intent();
        self.jump_pending = false;
        TickInput {
            intent,
            camera_yaw,
            reset,
        }
    }
}
